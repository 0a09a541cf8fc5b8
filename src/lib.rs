//! market-i18n
//!
//! Runtime auto-translation for the marketplace front-end (dictionary store,
//! key resolution with fallback, locale session, UI tree rewriter) and the
//! offline tools that keep the dictionaries complete.

pub mod cli;
pub mod config;
pub mod input;
pub mod pipeline;
pub mod resolver;
pub mod rewrite;
pub mod session;
pub mod store;
pub mod types;

#[cfg(test)]
mod test_utils;
