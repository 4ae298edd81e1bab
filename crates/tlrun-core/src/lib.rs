//! Preload engine for the tlrun script host.
//!
//! Decides which modules load before the host's entry program, in what
//! order, and whether the host may proceed at all.

pub mod collector;
pub mod config;
pub mod di;
pub mod errors;
pub mod executor;
pub mod fs;
pub mod module_resolver;
pub mod plan;
pub mod rc;
pub mod specifier;
pub mod trust;

pub use collector::{cli_specifiers_from_values, collect_cli_specifiers};
pub use config::{GlobalModuleRoot, PreloadConfig, RcEnable};
pub use di::Preloader;
pub use errors::PreloadError;
pub use executor::{ExecutorState, ModuleEvaluator, PreloadExecutor};
pub use fs::{FileSystem, MockFileSystem, RealFileSystem};
pub use module_resolver::ModuleResolver;
pub use plan::PreloadPlan;
pub use rc::RcLoader;
pub use specifier::{ModuleId, RawSpecifier, ResolvedModule, Source, SourceKind};
pub use trust::TrustFilter;
