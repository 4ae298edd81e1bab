//! Trust boundary for rc-sourced preloads.
//!
//! An rc entry survives only if its canonical identity lies inside the global
//! module root. Containment is checked component-wise on normalized absolute
//! paths, so `..` segments and look-alike siblings (`tl_modules_old`) never
//! pass. Command-line entries are always kept.

use crate::config::GlobalModuleRoot;
use crate::fs::{normalize_path, FileSystem};
use crate::specifier::{ResolvedModule, SourceKind};
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct TrustFilter {
    root: PathBuf,
}

impl TrustFilter {
    /// The root is canonicalized once so it compares equal to canonical
    /// module identities; a root that does not exist is normalized lexically.
    pub fn new(global_root: &GlobalModuleRoot, fs: &dyn FileSystem) -> Self {
        let root = fs
            .canonicalize(global_root.path())
            .unwrap_or_else(|_| normalize_path(global_root.path()));
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn contains(&self, path: &Path) -> bool {
        path.is_absolute() && normalize_path(path).starts_with(&self.root)
    }

    pub fn is_trusted(&self, module: &ResolvedModule) -> bool {
        match module.source().kind() {
            SourceKind::Cli => true,
            SourceKind::Rc => self.contains(module.path()),
        }
    }

    /// Drop untrusted entries, preserving the order of the rest
    pub fn apply(&self, modules: Vec<ResolvedModule>) -> Vec<ResolvedModule> {
        modules
            .into_iter()
            .filter(|module| {
                let trusted = self.is_trusted(module);
                if !trusted {
                    debug!(
                        "ignoring preload rc entry '{}': {} is outside {}",
                        module.origin().text(),
                        module.identity(),
                        self.root.display()
                    );
                }
                trusted
            })
            .collect()
    }
}
