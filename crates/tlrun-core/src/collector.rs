//! Extraction of preload directives from the raw command line.
//!
//! The collector sees every token the host was invoked with and knows only
//! about preload directives. Everything else (entry file, `-e` code, other
//! flags) is skipped, so directives are honoured wherever they appear. A bare
//! `--` ends option scanning; later tokens belong to the script.
//!
//! Hosts that already parse their arguments pass the parsed directive values
//! to [`cli_specifiers_from_values`] instead.

use crate::errors::{PreloadError, Result};
use crate::specifier::RawSpecifier;

pub const SHORT_FLAG: &str = "-r";
pub const LONG_FLAG: &str = "--require";

/// Collect every preload directive in order of appearance
pub fn collect_cli_specifiers<I, S>(tokens: I) -> Result<Vec<RawSpecifier>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut specifiers = Vec::new();
    let mut tokens = tokens.into_iter().enumerate();

    while let Some((position, token)) = tokens.next() {
        let token = token.as_ref();
        if token == "--" {
            break;
        }

        let value = if token == SHORT_FLAG || token == LONG_FLAG {
            match tokens.next() {
                Some((_, value)) => value.as_ref().to_string(),
                None => {
                    return Err(PreloadError::MissingDirectiveValue {
                        flag: token.to_string(),
                        position,
                    })
                }
            }
        } else if let Some(value) = token.strip_prefix("--require=") {
            value.to_string()
        } else if let Some(value) = token.strip_prefix(SHORT_FLAG) {
            value.strip_prefix('=').unwrap_or(value).to_string()
        } else {
            continue;
        };

        if value.is_empty() {
            return Err(PreloadError::MissingDirectiveValue {
                flag: token.to_string(),
                position,
            });
        }

        specifiers.push(RawSpecifier::cli(value, specifiers.len()));
    }

    Ok(specifiers)
}

/// Wrap directive values already extracted by an argument parser
pub fn cli_specifiers_from_values<I, S>(values: I) -> Vec<RawSpecifier>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| RawSpecifier::cli(value, index))
        .collect()
}
