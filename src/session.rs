//! Locale session: the current locale, its persistence, and translation.
//!
//! One session exists per active user session. It is constructed explicitly
//! and handed to whatever renders UI; there is no global locale state.

pub mod storage;

use std::fmt;

use crate::config::I18nSettings;
use crate::resolver::KeyResolver;
use crate::rewrite::{
    Node,
    Rewriter,
    SkipPolicy,
};
use crate::session::storage::LocaleStorage;
use crate::store::DictionaryStore;
use crate::types::Locale;

/// Handle returned by [`LocaleSession::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Callback run after the locale changes.
type Subscriber = Box<dyn FnMut(Locale)>;

/// Session construction options.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Storage slot holding the last selected locale code.
    pub storage_key: String,
    pub key_separator: String,
    /// Locales a user may select. Anything else falls back to the default.
    pub supported: Vec<Locale>,
    pub skip_policy: SkipPolicy,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            storage_key: "locale".to_string(),
            key_separator: ".".to_string(),
            supported: Locale::ALL.to_vec(),
            skip_policy: SkipPolicy::default(),
        }
    }
}

impl From<&I18nSettings> for SessionOptions {
    fn from(settings: &I18nSettings) -> Self {
        Self {
            storage_key: settings.session.storage_key.clone(),
            key_separator: settings.key_separator.clone(),
            supported: settings.supported_locales(),
            skip_policy: settings.skip.into(),
        }
    }
}

/// Locale state of one user session.
pub struct LocaleSession<S: LocaleStorage> {
    store: DictionaryStore,
    storage: S,
    options: SessionOptions,
    rewriter: Rewriter,
    locale: Locale,
    /// Incremented on every effective locale change.
    revision: u64,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl<S: LocaleStorage> LocaleSession<S> {
    /// Starts a session, restoring the persisted locale when it is valid.
    ///
    /// A missing, unreadable or unsupported persisted value selects the
    /// default locale; initialization itself never fails.
    pub fn init(store: DictionaryStore, storage: S, options: SessionOptions) -> Self {
        let default_locale = store.default_locale();
        let locale = match storage.read(&options.storage_key) {
            Ok(Some(code)) => match code.parse::<Locale>() {
                Ok(locale) if options.supported.contains(&locale) => locale,
                Ok(locale) => {
                    tracing::debug!(%locale, "Persisted locale is not enabled, using default");
                    default_locale
                }
                Err(e) => {
                    tracing::debug!("Ignoring persisted locale: {e}");
                    default_locale
                }
            },
            Ok(None) => default_locale,
            Err(e) => {
                tracing::warn!("Failed to read persisted locale: {e}");
                default_locale
            }
        };

        tracing::debug!(%locale, "Locale session initialized");
        let rewriter = Rewriter::new(options.skip_policy);
        Self {
            store,
            storage,
            options,
            rewriter,
            locale,
            revision: 0,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    #[must_use]
    pub const fn locale(&self) -> Locale {
        self.locale
    }

    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub const fn store(&self) -> &DictionaryStore {
        &self.store
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Switches the locale, persists it and notifies subscribers.
    ///
    /// Unsupported locales are replaced by the default locale. Subscribers
    /// run only when the effective locale actually changes. Returns the
    /// locale now in effect.
    pub fn set_locale(&mut self, requested: Locale) -> Locale {
        let locale = if self.options.supported.contains(&requested) {
            requested
        } else {
            tracing::debug!(%requested, "Locale not enabled, using default");
            self.store.default_locale()
        };

        if let Err(e) = self.storage.write(&self.options.storage_key, locale.code()) {
            tracing::warn!(%locale, "Failed to persist locale: {e}");
        }

        if locale != self.locale {
            tracing::debug!(from = %self.locale, to = %locale, "Locale changed");
            self.locale = locale;
            self.revision += 1;
            for (_, subscriber) in &mut self.subscribers {
                subscriber(locale);
            }
        }

        locale
    }

    /// Like [`Self::set_locale`], from a raw code; unknown codes select the default.
    pub fn set_locale_code(&mut self, code: &str) -> Locale {
        let requested = code.parse().unwrap_or_else(|e| {
            tracing::debug!("{e}");
            self.store.default_locale()
        });
        self.set_locale(requested)
    }

    /// Translation of `key_path` in the current locale.
    #[must_use]
    pub fn translate(&self, key_path: &str) -> String {
        KeyResolver::new(&self.store, &self.options.key_separator).resolve(self.locale, key_path)
    }

    /// Rewrites a UI subtree with [`Self::translate`].
    #[must_use]
    pub fn auto_translate(&self, node: &Node) -> Node {
        self.rewriter.rewrite(node, |text| self.translate(text))
    }

    /// Registers a callback invoked with the new locale after each change.
    pub fn subscribe(&mut self, subscriber: impl FnMut(Locale) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Removes a callback. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        self.subscribers.len() != before
    }
}

impl<S: LocaleStorage> fmt::Debug for LocaleSession<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocaleSession")
            .field("locale", &self.locale)
            .field("revision", &self.revision)
            .field("store", &self.store.locales())
            .field("options", &self.options)
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use googletest::prelude::*;
    use rstest::*;
    use serde_json::json;

    use super::storage::MemoryStorage;
    use super::*;
    use crate::rewrite::Element;

    #[fixture]
    fn store() -> DictionaryStore {
        DictionaryStore::from_documents(
            Locale::En,
            [
                (Locale::En, json!({"Buy now": "Buy now", "nav": {"home": "Home", "shop": "Shop"}})),
                (Locale::Fr, json!({"Buy now": "Acheter", "nav": {"home": "Accueil"}})),
                (Locale::Nl, json!({"Buy now": "Nu kopen", "nav": {"home": "Start"}})),
            ],
        )
        .unwrap()
    }

    #[rstest]
    #[case::absent(None, Locale::En)]
    #[case::persisted(Some("nl"), Locale::Nl)]
    #[case::region_code(Some("fr-FR"), Locale::Fr)]
    #[case::unsupported(Some("de"), Locale::En)]
    #[case::garbage(Some("???"), Locale::En)]
    fn init_restores_persisted_locale(
        store: DictionaryStore,
        #[case] persisted: Option<&str>,
        #[case] expected: Locale,
    ) {
        let storage = persisted.map_or_else(MemoryStorage::new, |code| {
            MemoryStorage::with_slot("locale", code)
        });

        let session = LocaleSession::init(store, storage, SessionOptions::default());

        assert_that!(session.locale(), eq(expected));
    }

    #[rstest]
    fn init_ignores_locale_outside_enabled_set(store: DictionaryStore) {
        let options =
            SessionOptions { supported: vec![Locale::En, Locale::Fr], ..SessionOptions::default() };

        let session = LocaleSession::init(store, MemoryStorage::with_slot("locale", "nl"), options);

        assert_that!(session.locale(), eq(Locale::En));
    }

    #[rstest]
    #[googletest::test]
    fn set_locale_persists_and_translates(store: DictionaryStore) {
        let mut session = LocaleSession::init(store, MemoryStorage::new(), SessionOptions::default());

        let effective = session.set_locale(Locale::Fr);

        expect_that!(effective, eq(Locale::Fr));
        expect_that!(session.translate("nav.home"), eq("Accueil"));
        expect_that!(session.translate("nav.shop"), eq("Shop"));
        expect_that!(session.translate("nav.cart"), eq("nav.cart"));
        expect_that!(session.storage().read("locale").unwrap(), some(eq("fr")));
    }

    #[rstest]
    #[googletest::test]
    fn set_locale_code_falls_back_to_default(store: DictionaryStore) {
        let mut session =
            LocaleSession::init(store, MemoryStorage::with_slot("locale", "nl"), SessionOptions::default());

        let effective = session.set_locale_code("klingon");

        expect_that!(effective, eq(Locale::En));
        expect_that!(session.storage().read("locale").unwrap(), some(eq("en")));
    }

    #[rstest]
    #[googletest::test]
    fn set_locale_outside_enabled_set_uses_default(store: DictionaryStore) {
        let options =
            SessionOptions { supported: vec![Locale::En, Locale::Fr], ..SessionOptions::default() };
        let mut session =
            LocaleSession::init(store, MemoryStorage::with_slot("locale", "fr"), options);

        expect_that!(session.set_locale(Locale::Nl), eq(Locale::En));
        expect_that!(session.locale(), eq(Locale::En));
    }

    #[rstest]
    #[googletest::test]
    fn subscribers_notified_on_change_only(store: DictionaryStore) {
        let mut session = LocaleSession::init(store, MemoryStorage::new(), SessionOptions::default());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let id = session.subscribe(move |locale| sink.borrow_mut().push(locale));

        session.set_locale(Locale::Nl);
        session.set_locale(Locale::Nl);
        session.set_locale(Locale::Fr);
        expect_that!(session.unsubscribe(id), eq(true));
        session.set_locale(Locale::En);

        let seen = seen.borrow().clone();
        expect_that!(seen, elements_are![eq(&Locale::Nl), eq(&Locale::Fr)]);
        expect_that!(session.revision(), eq(3));
        expect_that!(session.unsubscribe(id), eq(false));
    }

    #[rstest]
    #[googletest::test]
    fn auto_translate_follows_current_locale(store: DictionaryStore) {
        let mut session = LocaleSession::init(store, MemoryStorage::new(), SessionOptions::default());
        let tree: Node = Element::new("button")
            .with_attribute("title", "Buy now")
            .with_children(Node::Sequence(vec![Node::text("Buy now"), Node::text("€ 120")]))
            .into();

        let english = session.auto_translate(&tree);
        session.set_locale(Locale::Nl);
        let dutch = session.auto_translate(&tree);

        expect_that!(english, eq(&tree));
        let expected: Node = Element::new("button")
            .with_attribute("title", "Nu kopen")
            .with_children(Node::Sequence(vec![Node::text("Nu kopen"), Node::text("€ 120")]))
            .into();
        expect_that!(dutch, eq(&expected));
    }

    #[rstest]
    #[googletest::test]
    fn options_from_settings() {
        let settings = I18nSettings {
            supported_locales: vec!["en".to_string(), "nl".to_string()],
            key_separator: "/".to_string(),
            ..I18nSettings::default()
        };

        let options = SessionOptions::from(&settings);

        expect_that!(options.supported, elements_are![eq(&Locale::En), eq(&Locale::Nl)]);
        expect_that!(options.key_separator, eq("/"));
        expect_that!(options.storage_key, eq("locale"));
    }

    #[rstest]
    #[googletest::test]
    fn debug_impl_works(store: DictionaryStore) {
        let session = LocaleSession::init(store, MemoryStorage::new(), SessionOptions::default());

        let debug_str = format!("{session:?}");

        expect_that!(debug_str, contains_substring("LocaleSession"));
        expect_that!(debug_str, contains_substring("locale: En"));
    }
}
