//! Preload specifiers and the modules they resolve to.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Where a preload request came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Source {
    /// A `-r`/`--require` directive; `index` is its collection order
    Cli { index: usize },
    /// A line of the preload rc file (1-based)
    Rc { line: usize },
}

/// Data-less discriminant of [`Source`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Cli,
    Rc,
}

impl Source {
    pub fn kind(&self) -> SourceKind {
        match self {
            Source::Cli { .. } => SourceKind::Cli,
            Source::Rc { .. } => SourceKind::Rc,
        }
    }

    pub fn is_rc(&self) -> bool {
        self.kind() == SourceKind::Rc
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Cli { index } => write!(f, "command line, preload #{}", index + 1),
            Source::Rc { line } => write!(f, "preload rc file, line {}", line),
        }
    }
}

/// A specifier exactly as the user wrote it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawSpecifier {
    text: String,
    source: Source,
}

impl RawSpecifier {
    pub fn cli(text: impl Into<String>, index: usize) -> Self {
        Self {
            text: text.into(),
            source: Source::Cli { index },
        }
    }

    pub fn rc(text: impl Into<String>, line: usize) -> Self {
        Self {
            text: text.into(),
            source: Source::Rc { line },
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source(&self) -> Source {
        self.source
    }
}

/// Canonical identity of a module: its normalized absolute path
///
/// Two specifiers name the same module iff their `ModuleId`s are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ModuleId(PathBuf);

impl ModuleId {
    pub fn new(path: PathBuf) -> Self {
        ModuleId(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// A specifier that resolved to a concrete module
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedModule {
    identity: ModuleId,
    origin: RawSpecifier,
}

impl ResolvedModule {
    pub fn new(identity: ModuleId, origin: RawSpecifier) -> Self {
        Self { identity, origin }
    }

    pub fn identity(&self) -> &ModuleId {
        &self.identity
    }

    pub fn path(&self) -> &Path {
        self.identity.path()
    }

    pub fn origin(&self) -> &RawSpecifier {
        &self.origin
    }

    pub fn source(&self) -> Source {
        self.origin.source()
    }
}
