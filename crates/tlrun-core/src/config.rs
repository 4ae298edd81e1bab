use crate::fs::normalize_path;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Name of the host binary; the rc file and environment variables derive from it
pub const HOST_NAME: &str = "tlrun";

/// Environment variable that turns on the preload rc file
pub const RC_ENABLE_ENV: &str = "TLRUN_PRELOADRC_ENABLE";

/// Environment variable that overrides the global module root
pub const GLOBAL_MODULES_ENV: &str = "TLRUN_GLOBAL_MODULES";

/// Per-directory module folder searched for bare names
pub const MODULES_DIR_NAME: &str = "tl_modules";

/// Source file extension probed when a specifier omits it
pub const MODULE_EXTENSION: &str = "tl";

/// Entry point probed when a specifier names a directory
pub const DIRECTORY_ENTRY: &str = "init.tl";

/// File name of the per-user preload rc file (`.tlrun_preloadrc`)
pub fn rc_file_name() -> String {
    format!(".{}_preloadrc", HOST_NAME)
}

/// Whether the rc gate is open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RcEnable(bool);

impl RcEnable {
    pub fn enabled() -> Self {
        RcEnable(true)
    }

    pub fn disabled() -> Self {
        RcEnable(false)
    }

    pub fn is_enabled(self) -> bool {
        self.0
    }

    /// Interpret the raw value of the enable variable. Absent or unrecognized
    /// values leave the gate closed.
    pub fn from_env_value(value: Option<&str>) -> Self {
        let enabled = value
            .map(|v| v.trim().to_ascii_lowercase())
            .is_some_and(|v| matches!(v.as_str(), "true" | "1" | "yes" | "on"));
        RcEnable(enabled)
    }
}

/// Trusted installation directory for globally installed modules
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GlobalModuleRoot(PathBuf);

impl GlobalModuleRoot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        GlobalModuleRoot(normalize_path(&path.into()))
    }

    /// Derive the root from the host binary's installation layout:
    /// `<prefix>/bin/tlrun` maps to `<prefix>/lib/tl_modules`.
    pub fn from_executable(exe: &Path) -> Self {
        let prefix = exe
            .parent()
            .and_then(Path::parent)
            .unwrap_or_else(|| Path::new("/"));
        Self::new(prefix.join("lib").join(MODULES_DIR_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

/// Process-wide preload configuration
///
/// Built once at startup and shared read-only with every pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreloadConfig {
    /// Trust boundary and fallback root for bare names
    pub global_root: GlobalModuleRoot,

    /// Gate for the rc file loader (default: disabled)
    pub rc_enable: RcEnable,

    /// Location of the rc file, `None` when no home directory is known
    pub rc_path: Option<PathBuf>,

    /// Base directory for command-line specifiers
    pub working_dir: PathBuf,
}

impl PreloadConfig {
    /// Configuration with the rc gate closed
    pub fn new(global_root: GlobalModuleRoot, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            global_root,
            rc_enable: RcEnable::disabled(),
            rc_path: None,
            working_dir: working_dir.into(),
        }
    }

    pub fn with_rc(mut self, rc_enable: RcEnable, rc_path: Option<PathBuf>) -> Self {
        self.rc_enable = rc_enable;
        self.rc_path = rc_path;
        self
    }

    /// Read the process environment once
    pub fn from_env() -> std::io::Result<Self> {
        let exe = std::env::current_exe()?;
        let working_dir = std::env::current_dir()?;
        Ok(Self::from_vars(
            |name| std::env::var(name).ok(),
            &exe,
            working_dir,
            dirs::home_dir(),
        ))
    }

    /// Build the configuration from explicit inputs
    pub fn from_vars(
        lookup: impl Fn(&str) -> Option<String>,
        exe: &Path,
        working_dir: PathBuf,
        home_dir: Option<PathBuf>,
    ) -> Self {
        let global_root = match lookup(GLOBAL_MODULES_ENV).filter(|v| !v.trim().is_empty()) {
            Some(dir) => GlobalModuleRoot::new(working_dir.join(dir.trim())),
            None => GlobalModuleRoot::from_executable(exe),
        };
        let rc_enable = RcEnable::from_env_value(lookup(RC_ENABLE_ENV).as_deref());
        let rc_path = home_dir.map(|home| home.join(rc_file_name()));

        Self::new(global_root, working_dir).with_rc(rc_enable, rc_path)
    }

    /// Base directory for rc specifiers: the directory holding the rc file
    pub fn rc_base_dir(&self) -> &Path {
        self.rc_path
            .as_deref()
            .and_then(Path::parent)
            .unwrap_or(&self.working_dir)
    }
}
