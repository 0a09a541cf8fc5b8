//! Dictionary store: one dictionary per locale plus the designated default.

use std::path::{
    Path,
    PathBuf,
};

use serde_json::Value;
use thiserror::Error;

use crate::input::dictionary::{
    Dictionary,
    DictionaryError,
    load_dictionary_file,
};
use crate::types::Locale;

#[derive(Error, Debug)]
pub enum StoreError {
    /// Callers fall back to the default locale; this never reaches the UI.
    #[error("No dictionary registered for locale '{0}'")]
    MissingLocale(Locale),

    #[error("Dictionary document for locale '{0}' is not a JSON object")]
    InvalidDocument(Locale),

    #[error(transparent)]
    Dictionary(#[from] DictionaryError),
}

/// Immutable locale → dictionary mapping.
///
/// The default locale's dictionary is always present; its key set is the
/// canonical one every other locale is measured against.
#[derive(Debug, Clone)]
pub struct DictionaryStore {
    default_locale: Locale,
    default_dictionary: Dictionary,
    /// Non-default dictionaries in registration order.
    others: Vec<(Locale, Dictionary)>,
}

/// Conventional location of a locale's dictionary: `<dir>/<code>.json`.
#[must_use]
pub fn dictionary_path(locales_dir: &Path, locale: Locale) -> PathBuf {
    locales_dir.join(format!("{}.json", locale.code()))
}

impl DictionaryStore {
    #[must_use]
    pub const fn new(default_locale: Locale, default_dictionary: Dictionary) -> Self {
        Self { default_locale, default_dictionary, others: Vec::new() }
    }

    /// Registers (or replaces) a locale's dictionary.
    #[must_use]
    pub fn with_dictionary(mut self, locale: Locale, dictionary: Dictionary) -> Self {
        self.insert(locale, dictionary);
        self
    }

    /// Registers (or replaces) a locale's dictionary.
    pub fn insert(&mut self, locale: Locale, dictionary: Dictionary) {
        if locale == self.default_locale {
            self.default_dictionary = dictionary;
        } else if let Some(slot) = self.others.iter_mut().find(|(l, _)| *l == locale) {
            slot.1 = dictionary;
        } else {
            self.others.push((locale, dictionary));
        }
    }

    /// Builds a store from in-memory JSON documents.
    ///
    /// # Errors
    /// - The default locale has no document
    /// - A document is not a JSON object
    pub fn from_documents(
        default_locale: Locale,
        documents: impl IntoIterator<Item = (Locale, Value)>,
    ) -> Result<Self, StoreError> {
        let mut default_dictionary = None;
        let mut others = Vec::new();

        for (locale, document) in documents {
            let dictionary =
                Dictionary::from_value(document).ok_or(StoreError::InvalidDocument(locale))?;
            if locale == default_locale {
                default_dictionary = Some(dictionary);
            } else {
                others.push((locale, dictionary));
            }
        }

        let default_dictionary =
            default_dictionary.ok_or(StoreError::MissingLocale(default_locale))?;
        let mut store = Self::new(default_locale, default_dictionary);
        for (locale, dictionary) in others {
            store.insert(locale, dictionary);
        }
        Ok(store)
    }

    /// Loads `<dir>/<code>.json` for every supported locale.
    ///
    /// The default dictionary is required. Other locales whose file is
    /// missing or unreadable are skipped with a warning, so lookups in them
    /// fall back to the default.
    ///
    /// # Errors
    /// Read or parse failure of the default dictionary.
    pub fn load(
        locales_dir: &Path,
        default_locale: Locale,
        supported: &[Locale],
    ) -> Result<Self, StoreError> {
        let default_path = dictionary_path(locales_dir, default_locale);
        tracing::debug!(path = %default_path.display(), "Loading default dictionary");
        let mut store = Self::new(default_locale, load_dictionary_file(&default_path)?);

        for &locale in supported.iter().filter(|l| **l != default_locale) {
            let path = dictionary_path(locales_dir, locale);
            match load_dictionary_file(&path) {
                Ok(dictionary) => store.insert(locale, dictionary),
                Err(e) => tracing::warn!(%locale, "Skipping locale dictionary: {e}"),
            }
        }

        tracing::debug!(locales = ?store.locales(), "Dictionary store loaded");
        Ok(store)
    }

    /// Dictionary of `locale`.
    ///
    /// # Errors
    /// [`StoreError::MissingLocale`] when nothing is registered for it.
    pub fn get(&self, locale: Locale) -> Result<&Dictionary, StoreError> {
        if locale == self.default_locale {
            return Ok(&self.default_dictionary);
        }
        self.others
            .iter()
            .find(|(l, _)| *l == locale)
            .map(|(_, dictionary)| dictionary)
            .ok_or(StoreError::MissingLocale(locale))
    }

    #[must_use]
    pub const fn default_locale(&self) -> Locale {
        self.default_locale
    }

    #[must_use]
    pub const fn default_dictionary(&self) -> &Dictionary {
        &self.default_dictionary
    }

    #[must_use]
    pub fn contains(&self, locale: Locale) -> bool {
        self.get(locale).is_ok()
    }

    /// Registered locales, default first.
    #[must_use]
    pub fn locales(&self) -> Vec<Locale> {
        std::iter::once(self.default_locale).chain(self.others.iter().map(|(l, _)| *l)).collect()
    }
}
