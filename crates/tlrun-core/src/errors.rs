use crate::specifier::Source;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal outcomes of preload planning and execution
///
/// Every variant aborts the host before its entry mode starts. Rc entries
/// rejected by the trust filter are not represented here; they are dropped
/// without an error.
#[derive(Debug, Error)]
pub enum PreloadError {
    #[error("preload directive '{flag}' (argument {position}) is missing a module")]
    MissingDirectiveValue { flag: String, position: usize },

    #[error(
        "cannot find preload module '{specifier}' ({origin}); tried: {}",
        format_tried(.tried)
    )]
    Resolution {
        specifier: String,
        origin: Source,
        tried: Vec<PathBuf>,
    },

    #[error("failed to read preload configuration {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("preload module {} failed to load: {message}", .module.display())]
    Load {
        index: usize,
        module: PathBuf,
        message: String,
    },

    #[error("preload executor has already run")]
    ExecutorReused,
}

fn format_tried(tried: &[PathBuf]) -> String {
    if tried.is_empty() {
        return "nothing".to_string();
    }
    tried
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, PreloadError>;
