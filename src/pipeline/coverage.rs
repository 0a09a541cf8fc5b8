//! Translation coverage of each locale against the default dictionary.

use std::fmt;

use serde::Serialize;

use crate::input::dictionary::{
    Dictionary,
    DictionaryEntry,
};
use crate::store::DictionaryStore;
use crate::types::Locale;

/// Coverage of one non-default locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocaleCoverage {
    pub locale: Locale,
    pub translated: usize,
    pub missing: usize,
    /// Whole percent of default keys translated, rounded down.
    pub percent: usize,
    /// First missing keys in default order.
    pub missing_sample: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageReport {
    pub default_locale: Locale,
    pub total_keys: usize,
    pub locales: Vec<LocaleCoverage>,
}

impl CoverageReport {
    #[must_use]
    pub fn get(&self, locale: Locale) -> Option<&LocaleCoverage> {
        self.locales.iter().find(|coverage| coverage.locale == locale)
    }
}

/// Measures `targets` against the default dictionary of `store`.
///
/// A key counts as translated when the target holds a string for it that is
/// non-empty after trimming. Targets without a loaded dictionary report every
/// key missing; the default locale itself is never reported.
#[must_use]
pub fn coverage_report(
    store: &DictionaryStore,
    targets: &[Locale],
    separator: &str,
    sample_size: usize,
) -> CoverageReport {
    let default_entries = store.default_dictionary().entries(separator);
    let total_keys = default_entries.len();

    let locales = targets
        .iter()
        .filter(|locale| **locale != store.default_locale())
        .map(|&locale| {
            let dictionary = store.get(locale).ok();
            if dictionary.is_none() {
                tracing::warn!(%locale, "No dictionary loaded, reporting every key as missing");
            }
            locale_coverage(locale, dictionary, &default_entries, separator, sample_size)
        })
        .collect();

    CoverageReport { default_locale: store.default_locale(), total_keys, locales }
}

/// Counts one locale.
fn locale_coverage(
    locale: Locale,
    dictionary: Option<&Dictionary>,
    default_entries: &[DictionaryEntry],
    separator: &str,
    sample_size: usize,
) -> LocaleCoverage {
    let mut translated = 0;
    let mut missing_sample = Vec::new();

    for entry in default_entries {
        if dictionary.is_some_and(|d| is_translated(d, entry, separator)) {
            translated += 1;
        } else if missing_sample.len() < sample_size {
            missing_sample.push(entry.key.clone());
        }
    }

    let total = default_entries.len();
    let missing = total - translated;
    tracing::debug!(%locale, translated, missing, "Coverage computed");
    LocaleCoverage { locale, translated, missing, percent: percent(translated, total), missing_sample }
}

/// Looks the entry up the way the resolver does, then by its exact path.
fn is_translated(dictionary: &Dictionary, entry: &DictionaryEntry, separator: &str) -> bool {
    dictionary
        .lookup(&entry.key, separator)
        .or_else(|| dictionary.get_path(&entry.path))
        .is_some_and(|value| !value.trim().is_empty())
}

/// `part` of `total` in whole percent; an empty total is fully covered.
const fn percent(part: usize, total: usize) -> usize {
    if total == 0 { 100 } else { part * 100 / total }
}

impl fmt::Display for CoverageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Default locale: {} ({} keys)", self.default_locale, self.total_keys)?;
        for coverage in &self.locales {
            writeln!(f)?;
            writeln!(
                f,
                "[{}] translated {}/{} ({}%), missing {}",
                coverage.locale, coverage.translated, self.total_keys, coverage.percent, coverage.missing
            )?;
            if !coverage.missing_sample.is_empty() {
                writeln!(f, "  missing (first {}):", coverage.missing_sample.len())?;
                for key in &coverage.missing_sample {
                    writeln!(f, "    - {key}")?;
                }
            }
        }
        Ok(())
    }
}
