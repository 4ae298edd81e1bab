use rustc_hash::{FxHashMap, FxHashSet};
use std::io;
use std::path::{Component, Path, PathBuf};

/// File system abstraction used by the preload pipeline
/// This allows for dependency injection and testing against an in-memory tree
pub trait FileSystem: Send + Sync {
    fn read_file(&self, path: &Path) -> io::Result<String>;

    /// True if `path` names a regular file
    fn is_file(&self, path: &Path) -> bool;

    /// True if `path` names a directory
    fn is_dir(&self, path: &Path) -> bool;

    fn exists(&self, path: &Path) -> bool {
        self.is_file(path) || self.is_dir(path)
    }

    /// Absolute, normalized form of an existing path
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;
}

/// File system backed by the real disk
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFileSystem;

impl RealFileSystem {
    pub fn new() -> Self {
        RealFileSystem
    }
}

impl FileSystem for RealFileSystem {
    fn read_file(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        std::fs::canonicalize(path)
    }
}

/// In-memory file system for testing
///
/// Paths are normalized lexically on insertion and lookup, so `/a/b/../c.tl`
/// and `/a/c.tl` name the same file. Directories exist implicitly whenever a
/// file lives beneath them.
#[derive(Debug, Default, Clone)]
pub struct MockFileSystem {
    files: FxHashMap<PathBuf, String>,
    unreadable: FxHashSet<PathBuf>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, path: impl AsRef<Path>, content: impl Into<String>) {
        self.files
            .insert(normalize_path(path.as_ref()), content.into());
    }

    /// Register a file that exists but fails to read with `PermissionDenied`
    pub fn add_unreadable(&mut self, path: impl AsRef<Path>) {
        let path = normalize_path(path.as_ref());
        self.files.entry(path.clone()).or_default();
        self.unreadable.insert(path);
    }

    pub fn remove_file(&mut self, path: impl AsRef<Path>) -> Option<String> {
        let path = normalize_path(path.as_ref());
        self.unreadable.remove(&path);
        self.files.remove(&path)
    }
}

impl FileSystem for MockFileSystem {
    fn read_file(&self, path: &Path) -> io::Result<String> {
        let path = normalize_path(path);
        if self.unreadable.contains(&path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("permission denied: {}", path.display()),
            ));
        }
        if self.is_dir(&path) {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("is a directory: {}", path.display()),
            ));
        }
        self.files.get(&path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {}", path.display()),
            )
        })
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.contains_key(&normalize_path(path))
    }

    fn is_dir(&self, path: &Path) -> bool {
        let path = normalize_path(path);
        self.files
            .keys()
            .any(|file| file != &path && file.starts_with(&path))
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        let normalized = normalize_path(path);
        if self.exists(&normalized) {
            Ok(normalized)
        } else {
            Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file or directory: {}", path.display()),
            ))
        }
    }
}

/// Lexically normalize a path: drop `.` components and fold `..` into the
/// preceding component. `..` never climbs above the root.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            Component::Normal(name) => out.push(name),
        }
    }
    if out.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        out
    }
}
