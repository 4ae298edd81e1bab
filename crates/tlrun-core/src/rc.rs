//! Per-user preload rc file (`~/.tlrun_preloadrc`).

use crate::config::RcEnable;
use crate::errors::{PreloadError, Result};
use crate::fs::FileSystem;
use crate::specifier::RawSpecifier;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Reads rc specifiers when the rc gate is open
pub struct RcLoader {
    enable: RcEnable,
    path: Option<PathBuf>,
    file_system: Arc<dyn FileSystem>,
}

impl RcLoader {
    pub fn new(enable: RcEnable, path: Option<PathBuf>, file_system: Arc<dyn FileSystem>) -> Self {
        Self {
            enable,
            path,
            file_system,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Load the rc specifiers in file order. A closed gate, an unknown home
    /// directory and a missing file all yield an empty list.
    pub fn load(&self) -> Result<Vec<RawSpecifier>> {
        if !self.enable.is_enabled() {
            debug!("preload rc disabled");
            return Ok(Vec::new());
        }
        let Some(path) = self.path.as_deref() else {
            debug!("no home directory, skipping preload rc");
            return Ok(Vec::new());
        };

        let content = match self.file_system.read_file(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("preload rc {} not found", path.display());
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(PreloadError::ConfigRead {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let specifiers = parse_rc(&content);
        debug!(
            "read {} specifier(s) from {}",
            specifiers.len(),
            path.display()
        );
        Ok(specifiers)
    }
}

/// One specifier per non-blank line. No comments, no escaping.
pub fn parse_rc(content: &str) -> Vec<RawSpecifier> {
    content
        .lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let line = line.trim();
            (!line.is_empty()).then(|| RawSpecifier::rc(line, index + 1))
        })
        .collect()
}
