//! Core types used throughout the project.

use std::fmt;
use std::str::FromStr;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

/// A supported UI locale.
///
/// The set is closed: every dictionary, session and CLI argument is checked
/// against it. [`Locale::En`] is the canonical (default) locale.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Fr,
    Nl,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unsupported locale '{0}'. Supported locales: en, fr, nl")]
pub struct LocaleParseError(pub String);

impl Locale {
    /// All supported locales, default first.
    pub const ALL: [Self; 3] = [Self::En, Self::Fr, Self::Nl];

    /// Lowercase ISO 639-1 code (`"en"`, `"fr"`, `"nl"`).
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Fr => "fr",
            Self::Nl => "nl",
        }
    }
}

/// Normalize locale code (lowercase and replace - with _)
fn normalize_locale_code(code: &str) -> String {
    code.trim().to_lowercase().replace('-', "_")
}

impl FromStr for Locale {
    type Err = LocaleParseError;

    /// Accepts plain codes and region-qualified ones (`fr-BE`, `nl_NL`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_locale_code(s);
        let base = normalized.split('_').next().unwrap_or_default();

        Self::ALL
            .into_iter()
            .find(|locale| locale.code() == base)
            .ok_or_else(|| LocaleParseError(s.to_string()))
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
