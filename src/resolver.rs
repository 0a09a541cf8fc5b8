//! Key resolution with locale fallback.
//!
//! Lookup order: active locale, then the default locale, then the key path
//! itself. A miss is never an error; an untranslated key shows up verbatim in
//! the UI so it is easy to spot.

use crate::store::DictionaryStore;
use crate::types::Locale;

/// Where a resolved string came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// Found in the requested locale.
    Found(&'a str),
    /// Missing in the requested locale, found in the default one.
    Fallback(&'a str),
    /// Missing everywhere; the key path is returned as is.
    Identity,
}

/// Resolves dot-separated key paths against a [`DictionaryStore`].
#[derive(Debug, Clone, Copy)]
pub struct KeyResolver<'a> {
    store: &'a DictionaryStore,
    separator: &'a str,
}

impl<'a> KeyResolver<'a> {
    #[must_use]
    pub const fn new(store: &'a DictionaryStore, separator: &'a str) -> Self {
        Self { store, separator }
    }

    #[must_use]
    pub const fn store(&self) -> &'a DictionaryStore {
        self.store
    }

    /// Looks `key_path` up in `locale`, falling back to the default locale.
    #[must_use]
    pub fn lookup(&self, locale: Locale, key_path: &str) -> Resolution<'a> {
        // 未登録ロケールはデフォルトへフォールバック
        if let Ok(dictionary) = self.store.get(locale)
            && let Some(value) = dictionary.lookup(key_path, self.separator)
        {
            return Resolution::Found(value);
        }

        if locale != self.store.default_locale()
            && let Some(value) = self.store.default_dictionary().lookup(key_path, self.separator)
        {
            return Resolution::Fallback(value);
        }

        Resolution::Identity
    }

    /// Translated string for `key_path`, or `key_path` itself on a miss.
    #[must_use]
    pub fn resolve(&self, locale: Locale, key_path: &str) -> String {
        match self.lookup(locale, key_path) {
            Resolution::Found(value) | Resolution::Fallback(value) => value.to_string(),
            Resolution::Identity => {
                tracing::debug!(%locale, key_path, "Translation missing, using key");
                key_path.to_string()
            }
        }
    }
}

/// Free-function form of [`KeyResolver::resolve`].
#[must_use]
pub fn resolve(store: &DictionaryStore, locale: Locale, key_path: &str, separator: &str) -> String {
    KeyResolver::new(store, separator).resolve(locale, key_path)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;
    use serde_json::json;

    use super::*;

    #[fixture]
    fn store() -> DictionaryStore {
        DictionaryStore::from_documents(
            Locale::En,
            [
                (
                    Locale::En,
                    json!({
                        "nav": { "home": "Home", "artists": "Artists" },
                        "Buy now": "Buy now",
                        "empty": ""
                    }),
                ),
                (
                    Locale::Fr,
                    json!({
                        "nav": { "home": "Accueil" },
                        "Buy now": "Acheter",
                        "empty": ""
                    }),
                ),
            ],
        )
        .unwrap()
    }

    #[rstest]
    #[case::found(Locale::Fr, "nav.home", "Accueil")]
    #[case::fallback_to_default(Locale::Fr, "nav.artists", "Artists")]
    #[case::identity(Locale::Fr, "nav.sell", "nav.sell")]
    #[case::unregistered_locale(Locale::Nl, "nav.home", "Home")]
    #[case::unregistered_locale_identity(Locale::Nl, "missing", "missing")]
    #[case::default_locale(Locale::En, "nav.home", "Home")]
    #[case::literal_sentence(Locale::Fr, "Buy now", "Acheter")]
    #[case::ends_on_object(Locale::Fr, "nav", "nav")]
    #[case::empty_string_is_a_value(Locale::Fr, "empty", "")]
    fn resolve_cases(
        store: DictionaryStore,
        #[case] locale: Locale,
        #[case] key: &str,
        #[case] expected: &str,
    ) {
        assert_that!(resolve(&store, locale, key, "."), eq(expected));
    }

    #[rstest]
    fn lookup_reports_source(store: DictionaryStore) {
        let resolver = KeyResolver::new(&store, ".");

        assert_that!(resolver.lookup(Locale::Fr, "nav.home"), eq(Resolution::Found("Accueil")));
        assert_that!(resolver.lookup(Locale::Fr, "nav.artists"), eq(Resolution::Fallback("Artists")));
        assert_that!(resolver.lookup(Locale::En, "nav.sell"), eq(Resolution::Identity));
    }

    /// Keys present only in the default locale resolve the same from every locale.
    #[rstest]
    #[googletest::test]
    fn default_only_keys_match_default_resolution(store: DictionaryStore) {
        let resolver = KeyResolver::new(&store, ".");

        for entry in store.default_dictionary().entries(".") {
            let missing_in_fr = store.get(Locale::Fr).unwrap().lookup(&entry.key, ".").is_none();
            if missing_in_fr {
                expect_that!(
                    resolver.resolve(Locale::Fr, &entry.key),
                    eq(&resolver.resolve(Locale::En, &entry.key))
                );
            }
        }
    }

    /// Keys missing everywhere come back unchanged.
    #[rstest]
    #[case("checkout.total")]
    #[case("Some sentence. With dots.")]
    #[case("")]
    #[googletest::test]
    fn missing_keys_resolve_to_themselves(store: DictionaryStore, #[case] key: &str) {
        for locale in Locale::ALL {
            expect_that!(resolve(&store, locale, key, "."), eq(key));
        }
    }
}
