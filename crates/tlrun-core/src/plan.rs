use crate::specifier::{ModuleId, ResolvedModule};
use rustc_hash::FxHashSet;
use serde::Serialize;

/// Ordered, duplicate-free list of modules to preload
///
/// Command-line entries come first in collection order, followed by the
/// trusted rc entries in file order. Each identity appears once, at the
/// position of its first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PreloadPlan {
    modules: Vec<ResolvedModule>,
}

impl PreloadPlan {
    /// Concatenate both sources and drop every repeated identity
    pub fn sequence(cli: Vec<ResolvedModule>, rc: Vec<ResolvedModule>) -> Self {
        let mut seen: FxHashSet<ModuleId> = FxHashSet::default();
        let modules = cli
            .into_iter()
            .chain(rc)
            .filter(|module| seen.insert(module.identity().clone()))
            .collect();
        Self { modules }
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn modules(&self) -> &[ResolvedModule] {
        &self.modules
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResolvedModule> {
        self.modules.iter()
    }

    pub fn identities(&self) -> impl Iterator<Item = &ModuleId> {
        self.modules.iter().map(ResolvedModule::identity)
    }
}

impl<'a> IntoIterator for &'a PreloadPlan {
    type Item = &'a ResolvedModule;
    type IntoIter = std::slice::Iter<'a, ResolvedModule>;

    fn into_iter(self) -> Self::IntoIter {
        self.modules.iter()
    }
}
