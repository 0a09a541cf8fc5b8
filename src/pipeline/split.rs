//! Export of the default dictionary as fixed-size batch files.

use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::path::{
    Path,
    PathBuf,
};

use globset::Glob;
use serde_json::{
    Map,
    Value,
};

use super::error::PipelineError;
use crate::config::MatcherError;
use crate::input::dictionary::DictionaryEntry;

/// Minimum number of digits in a batch file number.
const MIN_INDEX_WIDTH: usize = 3;

/// One ordered chunk of default entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    /// 1-based position.
    pub index: usize,
    /// Zero-padding width shared by every batch of a split.
    pub width: usize,
    pub entries: Vec<DictionaryEntry>,
}

impl Batch {
    /// `<prefix>_<NNN>.json`
    #[must_use]
    pub fn file_name(&self, prefix: &str) -> String {
        format!("{prefix}_{:0width$}.json", self.index, width = self.width)
    }

    /// Flat `key -> value` object in entry order.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .entries
            .iter()
            .map(|entry| (entry.key.clone(), Value::String(entry.value.clone())))
            .collect();
        Value::Object(map)
    }
}

/// Chunks `entries` into batches of at most `batch_size`, preserving order.
///
/// Entries whose joined key repeats an earlier one (a literal dotted key next
/// to the same nested path) are dropped with a warning, since a flat batch
/// object cannot hold both.
#[must_use]
pub fn split_batches(entries: &[DictionaryEntry], batch_size: NonZeroUsize) -> Vec<Batch> {
    let mut seen = HashSet::new();
    let unique: Vec<&DictionaryEntry> = entries
        .iter()
        .filter(|entry| {
            let first = seen.insert(entry.key.as_str());
            if !first {
                tracing::warn!(key = %entry.key, "Duplicate flattened key, keeping the first");
            }
            first
        })
        .collect();

    let chunks: Vec<&[&DictionaryEntry]> = unique.chunks(batch_size.get()).collect();
    let width = index_width(chunks.len());

    chunks
        .into_iter()
        .enumerate()
        .map(|(i, chunk)| Batch {
            index: i + 1,
            width,
            entries: chunk.iter().map(|entry| (*entry).clone()).collect(),
        })
        .collect()
}

/// `max(3, digits(count))`
fn index_width(count: usize) -> usize {
    let digits = count.checked_ilog10().map_or(1, |log| log as usize + 1);
    digits.max(MIN_INDEX_WIDTH)
}

/// Writes every batch into `dir` and returns the written paths in order.
///
/// The directory is created when missing. Files left over from an earlier
/// split with the same prefix are removed first.
pub fn write_batches(
    dir: &Path,
    prefix: &str,
    batches: &[Batch],
) -> Result<Vec<PathBuf>, PipelineError> {
    std::fs::create_dir_all(dir)
        .map_err(|source| PipelineError::Write { path: dir.to_path_buf(), source })?;
    remove_stale_batches(dir, prefix)?;

    let mut written = Vec::with_capacity(batches.len());
    for batch in batches {
        let path = dir.join(batch.file_name(prefix));
        let content = serde_json::to_string_pretty(&batch.to_json())
            .map_err(|source| PipelineError::Serialize { path: path.clone(), source })?;
        std::fs::write(&path, content + "\n")
            .map_err(|source| PipelineError::Write { path: path.clone(), source })?;
        tracing::debug!(path = %path.display(), entries = batch.entries.len(), "Batch written");
        written.push(path);
    }

    Ok(written)
}

/// Deletes `<prefix>_*.json` files directly inside `dir`.
fn remove_stale_batches(dir: &Path, prefix: &str) -> Result<(), PipelineError> {
    let pattern = format!("{}_*.json", globset::escape(prefix));
    let matcher = Glob::new(&pattern).map_err(MatcherError::from)?.compile_matcher();

    let read_dir = std::fs::read_dir(dir)
        .map_err(|source| PipelineError::Write { path: dir.to_path_buf(), source })?;
    for entry in read_dir.flatten() {
        let path = entry.path();
        if !path.is_file() || !matcher.is_match(entry.file_name()) {
            continue;
        }
        tracing::debug!(path = %path.display(), "Removing stale batch");
        std::fs::remove_file(&path)
            .map_err(|source| PipelineError::Write { path: path.clone(), source })?;
    }

    Ok(())
}
