//! Mapping of preload specifiers to canonical module identities.
//!
//! Path specifiers (absolute, or starting with `./` or `../`) resolve against
//! a base directory. Anything else is a bare name. Command-line bare names
//! are looked up in the `tl_modules` folder of the base directory and each
//! of its ancestors, nearest first, then in the global module root. Rc bare
//! names are looked up in the global module root only.
//!
//! For every candidate path `P` the resolver probes `P`, `P.tl` and
//! `P/init.tl`, and canonicalizes the first regular file it finds.

use crate::config::{GlobalModuleRoot, DIRECTORY_ENTRY, MODULES_DIR_NAME, MODULE_EXTENSION};
use crate::errors::{PreloadError, Result};
use crate::fs::FileSystem;
use crate::specifier::{ModuleId, RawSpecifier, ResolvedModule, SourceKind};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace};

pub struct ModuleResolver {
    fs: Arc<dyn FileSystem>,
    global_root: GlobalModuleRoot,
}

impl ModuleResolver {
    pub fn new(fs: Arc<dyn FileSystem>, global_root: GlobalModuleRoot) -> Self {
        Self { fs, global_root }
    }

    pub fn global_root(&self) -> &GlobalModuleRoot {
        &self.global_root
    }

    /// Resolve `specifier` relative to `base_dir`
    pub fn resolve(&self, specifier: &RawSpecifier, base_dir: &Path) -> Result<ResolvedModule> {
        let text = specifier.text();
        let mut tried = Vec::new();

        let found = if is_path_specifier(text) {
            self.probe(&base_dir.join(text), &mut tried)
        } else {
            let dirs = match specifier.source().kind() {
                SourceKind::Cli => search_paths(base_dir, self.global_root.path()),
                SourceKind::Rc => vec![self.global_root.path().to_path_buf()],
            };
            dirs.iter()
                .find_map(|dir| self.probe(&dir.join(text), &mut tried))
        };

        match found {
            Some(path) => {
                debug!("resolved '{}' to {}", text, path.display());
                Ok(ResolvedModule::new(ModuleId::new(path), specifier.clone()))
            }
            None => Err(PreloadError::Resolution {
                specifier: text.to_string(),
                origin: specifier.source(),
                tried,
            }),
        }
    }

    fn probe(&self, candidate: &Path, tried: &mut Vec<PathBuf>) -> Option<PathBuf> {
        for path in candidate_files(candidate) {
            trace!("probing {}", path.display());
            tried.push(path.clone());
            if !self.fs.is_file(&path) {
                continue;
            }
            match self.fs.canonicalize(&path) {
                Ok(canonical) => return Some(canonical),
                Err(e) => debug!("cannot canonicalize {}: {}", path.display(), e),
            }
        }
        None
    }
}

/// True for specifiers that name a filesystem path rather than a bare module
pub fn is_path_specifier(specifier: &str) -> bool {
    Path::new(specifier).is_absolute()
        || specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
}

/// Directories searched for a bare name, nearest first
///
/// `base_dir` and each ancestor contribute their `tl_modules` folder
/// (ancestors that are themselves `tl_modules` folders are skipped); the
/// global root comes last.
pub fn search_paths(base_dir: &Path, global_root: &Path) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = base_dir
        .ancestors()
        .filter(|dir| dir.file_name() != Some(OsStr::new(MODULES_DIR_NAME)))
        .map(|dir| dir.join(MODULES_DIR_NAME))
        .collect();
    dirs.push(global_root.to_path_buf());
    dirs
}

/// Files probed for one candidate path, in order
fn candidate_files(candidate: &Path) -> [PathBuf; 3] {
    let mut with_extension = candidate.as_os_str().to_owned();
    with_extension.push(".");
    with_extension.push(MODULE_EXTENSION);

    [
        candidate.to_path_buf(),
        PathBuf::from(with_extension),
        candidate.join(DIRECTORY_ENTRY),
    ]
}
