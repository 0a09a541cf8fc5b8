use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::rewrite::SkipPolicy;
use crate::types::Locale;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "supportedLocales[0]")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Numbered, one-per-line rendering of validation errors.
fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct I18nSettings {
    /// Directory holding one `<code>.json` dictionary per locale.
    pub locales_dir: String,

    /// Canonical locale; its key set is the complete set.
    pub default_locale: String,
    pub supported_locales: Vec<String>,

    pub key_separator: String,

    pub batch: BatchConfig,
    pub coverage: CoverageConfig,
    pub skip: SkipConfig,
    pub session: SessionConfig,

    /// Globs excluded when expanding merge input patterns.
    pub merge_input_exclude: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BatchConfig {
    /// Entries per exported batch file.
    pub size: usize,
    pub output_dir: String,
    /// File name prefix; files are named `<prefix>_<NNN>.json`.
    pub file_prefix: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            size: 200,
            output_dir: "i18n-batches".to_string(),
            file_prefix: "batch".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoverageConfig {
    /// Missing keys listed per locale in the report.
    pub sample_size: usize,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self { sample_size: 10 }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkipConfig {
    /// Texts whose trimmed length is at most this many chars are left alone.
    pub min_length: usize,
    /// Leave texts made only of digits, whitespace and punctuation alone.
    pub skip_symbolic: bool,
}

impl Default for SkipConfig {
    fn default() -> Self {
        let policy = SkipPolicy::default();
        Self { min_length: policy.min_length, skip_symbolic: policy.skip_symbolic }
    }
}

impl From<SkipConfig> for SkipPolicy {
    fn from(config: SkipConfig) -> Self {
        Self { min_length: config.min_length, skip_symbolic: config.skip_symbolic }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionConfig {
    /// File backing the persisted locale choice.
    pub storage_file: String,
    /// Slot name inside the storage file.
    pub storage_key: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_file: ".market-i18n-session.json".to_string(),
            storage_key: "locale".to_string(),
        }
    }
}

impl I18nSettings {
    /// # Errors
    /// - Required field is empty
    /// - Unknown locale code
    /// - Default locale not in the supported set
    /// - Invalid glob pattern
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.key_separator.is_empty() {
            errors.push(ValidationError::new(
                "keySeparator",
                "The separator cannot be empty. Please specify a separator, for example: \".\" (dot)",
            ));
        }

        if self.locales_dir.is_empty() {
            errors.push(ValidationError::new(
                "localesDir",
                "The directory cannot be empty. Example: \"locales\"",
            ));
        }

        let default_locale = self.default_locale.parse::<Locale>();
        if let Err(e) = &default_locale {
            errors.push(ValidationError::new("defaultLocale", e.to_string()));
        }

        if self.supported_locales.is_empty() {
            errors.push(ValidationError::new(
                "supportedLocales",
                "At least one locale is required. Example: [\"en\", \"fr\", \"nl\"]",
            ));
        }

        let mut supported = Vec::new();
        for (index, code) in self.supported_locales.iter().enumerate() {
            match code.parse::<Locale>() {
                Ok(locale) => supported.push(locale),
                Err(e) => errors
                    .push(ValidationError::new(format!("supportedLocales[{index}]"), e.to_string())),
            }
        }

        if let Ok(default_locale) = default_locale
            && !self.supported_locales.is_empty()
            && !supported.contains(&default_locale)
        {
            errors.push(ValidationError::new(
                "defaultLocale",
                format!("Default locale '{default_locale}' must be listed in 'supportedLocales'"),
            ));
        }

        if self.batch.size == 0 {
            errors.push(ValidationError::new(
                "batch.size",
                "The batch size must be a positive integer. Example: 200",
            ));
        }

        if self.batch.output_dir.is_empty() {
            errors.push(ValidationError::new(
                "batch.outputDir",
                "The directory cannot be empty. Example: \"i18n-batches\"",
            ));
        }

        if self.batch.file_prefix.is_empty() {
            errors.push(ValidationError::new(
                "batch.filePrefix",
                "The prefix cannot be empty. Example: \"batch\"",
            ));
        } else if self.batch.file_prefix.contains(['/', '\\', '*', '?', '[', '{']) {
            errors.push(ValidationError::new(
                "batch.filePrefix",
                format!(
                    "Invalid prefix '{}': path separators and glob characters are not allowed",
                    self.batch.file_prefix
                ),
            ));
        }

        if self.session.storage_key.is_empty() {
            errors.push(ValidationError::new(
                "session.storageKey",
                "The storage key cannot be empty. Example: \"locale\"",
            ));
        }

        for (index, pattern) in self.merge_input_exclude.iter().enumerate() {
            if let Err(e) = globset::Glob::new(pattern) {
                errors.push(ValidationError::new(
                    format!("mergeInputExclude[{index}]"),
                    format!("Invalid glob pattern '{pattern}': {e}"),
                ));
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Default locale, assuming [`Self::validate`] passed.
    #[must_use]
    pub fn default_locale(&self) -> Locale {
        self.default_locale.parse().unwrap_or_default()
    }

    /// Supported locales in configured order, unknown codes dropped.
    #[must_use]
    pub fn supported_locales(&self) -> Vec<Locale> {
        let mut locales: Vec<Locale> = Vec::new();
        for locale in self.supported_locales.iter().filter_map(|code| code.parse().ok()) {
            if !locales.contains(&locale) {
                locales.push(locale);
            }
        }
        locales
    }

    /// Supported locales other than the default one.
    #[must_use]
    pub fn translation_targets(&self) -> Vec<Locale> {
        let default_locale = self.default_locale();
        self.supported_locales().into_iter().filter(|l| *l != default_locale).collect()
    }
}

impl Default for I18nSettings {
    fn default() -> Self {
        Self {
            locales_dir: "locales".to_string(),
            default_locale: Locale::default().code().to_string(),
            supported_locales: Locale::ALL.iter().map(|l| l.code().to_string()).collect(),
            key_separator: ".".to_string(),
            batch: BatchConfig::default(),
            coverage: CoverageConfig::default(),
            skip: SkipConfig::default(),
            session: SessionConfig::default(),
            merge_input_exclude: vec!["node_modules/**".to_string()],
        }
    }
}
