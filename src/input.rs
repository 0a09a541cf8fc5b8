//! Persisted inputs: dictionary documents and batch files.
pub mod dictionary;
