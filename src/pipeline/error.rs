use std::path::PathBuf;

use thiserror::Error;

use crate::config::MatcherError;
use crate::input::dictionary::DictionaryError;
use crate::store::StoreError;
use crate::types::Locale;

/// Defines errors that abort a maintenance command.
///
/// Individual bad batch entries are not errors; they are skipped and counted.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Dictionary(#[from] DictionaryError),

    #[error(transparent)]
    Matcher(#[from] MatcherError),

    #[error("Failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize '{}': {source}", path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("'{0}' is the default locale; merge targets must be a translation locale")]
    DefaultLocaleTarget(Locale),

    #[error("Locale '{0}' is not listed in supportedLocales")]
    UnsupportedLocale(Locale),

    #[error("No input files given")]
    NoInputFiles,

    #[error("Failed to edit '{}': the document is not a JSON object", path.display())]
    InvalidTarget { path: PathBuf },
}
