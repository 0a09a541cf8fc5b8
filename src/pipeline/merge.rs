//! Merge of externally translated batches into a locale dictionary.

use std::collections::HashMap;
use std::fmt;
use std::path::{
    Path,
    PathBuf,
};

use jsonc_parser::ParseOptions;
use serde::Serialize;
use serde_json::{
    Map,
    Value,
};

use super::error::PipelineError;
use super::json_edit::set_values_in_json_text;
use crate::input::dictionary::{
    Dictionary,
    DictionaryEntry,
    DictionaryError,
    read_json_object,
};
use crate::store::{
    DictionaryStore,
    dictionary_path,
};
use crate::types::Locale;

/// How batch keys are matched to default entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MergeMode {
    /// Batch keys are default key paths.
    #[default]
    Key,
    /// Batch keys are default source strings; every key with that value is set.
    SourceText,
}

/// Counters of one or more merged batches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeOutcome {
    /// Entries written to the target, including ones already equal.
    pub applied: usize,
    /// Applied entries whose value differed from the target's.
    pub changed: usize,
    /// Keys absent from the default dictionary.
    pub skipped_unknown: usize,
    /// Values that are not strings or are blank.
    pub skipped_invalid: usize,
    /// Paths blocked by a non-object value in the target.
    pub skipped_conflict: usize,
    /// Changed leaves, in application order.
    #[serde(skip)]
    pub edits: Vec<(Vec<String>, String)>,
}

impl MergeOutcome {
    /// Adds the counters and edits of `other`.
    pub fn absorb(&mut self, other: Self) {
        self.applied += other.applied;
        self.changed += other.changed;
        self.skipped_unknown += other.skipped_unknown;
        self.skipped_invalid += other.skipped_invalid;
        self.skipped_conflict += other.skipped_conflict;
        self.edits.extend(other.edits);
    }

    #[must_use]
    pub const fn skipped(&self) -> usize {
        self.skipped_unknown + self.skipped_invalid + self.skipped_conflict
    }
}

/// Applies one batch object to `target`.
///
/// An entry is applied when its key matches the default dictionary (per
/// `options.mode`) and its value is a string that is non-empty after
/// trimming. The value is stored as given: where the target already holds the
/// key (the leaf a lookup would return, flat or nested), otherwise at the
/// default entry's path. Everything else is skipped and counted. Applying the
/// same batch again changes nothing.
pub fn merge_batch(
    default_entries: &[DictionaryEntry],
    target: &mut Dictionary,
    batch: &Map<String, Value>,
    options: &MergeOptions,
) -> MergeOutcome {
    let index = match options.mode {
        MergeMode::Key => index_by(default_entries, |entry| entry.key.as_str()),
        MergeMode::SourceText => index_by(default_entries, |entry| entry.value.as_str()),
    };

    let mut outcome = MergeOutcome::default();
    for (batch_key, value) in batch {
        let Some(value) = value.as_str().filter(|v| !v.trim().is_empty()) else {
            tracing::debug!(key = %batch_key, "Skipping entry with blank or non-string value");
            outcome.skipped_invalid += 1;
            continue;
        };
        let Some(matches) = index.get(batch_key.as_str()) else {
            tracing::debug!(key = %batch_key, "Skipping entry unknown to the default dictionary");
            outcome.skipped_unknown += 1;
            continue;
        };

        for entry in matches {
            let path = target
                .locate(&entry.key, &options.key_separator)
                .unwrap_or_else(|| entry.path.clone());
            match target.set_path(&path, value) {
                Ok(previous) => {
                    outcome.applied += 1;
                    if previous.as_deref() != Some(value) {
                        outcome.changed += 1;
                        outcome.edits.push((path, value.to_string()));
                    }
                }
                Err(e) => {
                    tracing::warn!(key = %entry.key, "Skipping entry: {e}");
                    outcome.skipped_conflict += 1;
                }
            }
        }
    }

    outcome
}

/// Groups entries by a borrowed field, keeping default order within a group.
fn index_by<'a>(
    entries: &'a [DictionaryEntry],
    field: impl Fn(&'a DictionaryEntry) -> &'a str,
) -> HashMap<&'a str, Vec<&'a DictionaryEntry>> {
    let mut index: HashMap<&str, Vec<&DictionaryEntry>> = HashMap::new();
    for entry in entries {
        index.entry(field(entry)).or_default().push(entry);
    }
    index
}

/// Settings of a [`merge_files`] run.
#[derive(Debug, Clone)]
pub struct MergeOptions {
    pub mode: MergeMode,
    pub key_separator: String,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self { mode: MergeMode::Key, key_separator: ".".to_string() }
    }
}

/// Result of a [`merge_files`] run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeReport {
    pub locale: Locale,
    pub target: PathBuf,
    pub files: usize,
    pub outcome: MergeOutcome,
    /// False when nothing changed and the target was left alone.
    pub written: bool,
}

impl fmt::Display for MergeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "[{}] merged {} file(s) into {}",
            self.locale,
            self.files,
            self.target.display()
        )?;
        writeln!(f, "  applied: {} ({} changed)", self.outcome.applied, self.outcome.changed)?;
        write!(
            f,
            "  skipped: {} (unknown key {}, invalid value {}, path conflict {})",
            self.outcome.skipped(),
            self.outcome.skipped_unknown,
            self.outcome.skipped_invalid,
            self.outcome.skipped_conflict
        )
    }
}

/// Merges batch files into `<locales_dir>/<locale>.json`.
///
/// Every batch is read before anything is written, so an unreadable batch
/// leaves the target untouched. The target is edited in place, keeping its
/// formatting, and written at most once. A missing target starts as `{}`.
pub fn merge_files(
    store: &DictionaryStore,
    locales_dir: &Path,
    locale: Locale,
    supported: &[Locale],
    files: &[PathBuf],
    options: &MergeOptions,
) -> Result<MergeReport, PipelineError> {
    if locale == store.default_locale() {
        return Err(PipelineError::DefaultLocaleTarget(locale));
    }
    if !supported.contains(&locale) {
        return Err(PipelineError::UnsupportedLocale(locale));
    }
    if files.is_empty() {
        return Err(PipelineError::NoInputFiles);
    }

    let batches = files
        .iter()
        .map(|path| read_json_object(path))
        .collect::<Result<Vec<_>, _>>()?;

    let target_path = dictionary_path(locales_dir, locale);
    let original_text = read_target_text(&target_path)?;
    let mut target = parse_target(&target_path, &original_text)?;

    let default_entries = store.default_dictionary().entries(&options.key_separator);
    let mut outcome = MergeOutcome::default();
    for (path, batch) in files.iter().zip(&batches) {
        let batch_outcome = merge_batch(&default_entries, &mut target, batch, options);
        tracing::debug!(
            file = %path.display(),
            applied = batch_outcome.applied,
            skipped = batch_outcome.skipped(),
            "Batch merged"
        );
        outcome.absorb(batch_outcome);
    }

    let written = !outcome.edits.is_empty();
    if written {
        let new_text = set_values_in_json_text(&original_text, &outcome.edits)
            .ok_or_else(|| PipelineError::InvalidTarget { path: target_path.clone() })?;
        if let Some(parent) = target_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|source| PipelineError::Write { path: parent.to_path_buf(), source })?;
        }
        std::fs::write(&target_path, new_text)
            .map_err(|source| PipelineError::Write { path: target_path.clone(), source })?;
    }

    tracing::info!(
        %locale,
        files = files.len(),
        applied = outcome.applied,
        changed = outcome.changed,
        skipped = outcome.skipped(),
        "Merge finished"
    );
    Ok(MergeReport { locale, target: target_path, files: files.len(), outcome, written })
}

/// Target file content; a missing file reads as an empty object.
fn read_target_text(path: &Path) -> Result<String, PipelineError> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "Target dictionary missing, starting from {{}}");
            Ok("{}\n".to_string())
        }
        Err(source) => Err(DictionaryError::Io { path: path.to_path_buf(), source }.into()),
    }
}

/// Parses the target text read by [`read_target_text`]; comments are allowed.
fn parse_target(path: &Path, text: &str) -> Result<Dictionary, DictionaryError> {
    let value = jsonc_parser::parse_to_serde_value(text, &ParseOptions::default())
        .map_err(|e| DictionaryError::Syntax { path: path.to_path_buf(), message: e.to_string() })?;
    value
        .and_then(Dictionary::from_value)
        .ok_or_else(|| DictionaryError::NotAnObject { path: path.to_path_buf() })
}
