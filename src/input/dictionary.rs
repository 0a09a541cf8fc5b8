//! Persisted dictionary documents.
//!
//! One JSON object per locale. Nested objects are namespaces and string
//! leaves are translations; arrays and other scalars are carried through but
//! are never translation entries.

use std::path::{
    Path,
    PathBuf,
};

use serde_json::{
    Map,
    Value,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DictionaryError {
    #[error("Failed to read dictionary file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON in '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse '{}': {message}", path.display())]
    Syntax { path: PathBuf, message: String },

    #[error("Expected a JSON object at the top level of '{}'", path.display())]
    NotAnObject { path: PathBuf },
}

/// A write was blocked by a non-object value on the path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Cannot set '{0}': a non-object value is in the way")]
pub struct PathConflict(pub String);

/// One translatable string leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryEntry {
    /// `path` joined with the key separator (e.g. `"auth.login.title"`).
    pub key: String,
    /// Object keys leading to the leaf, outermost first.
    pub path: Vec<String>,
    pub value: String,
}

/// A locale's dictionary document. Key order follows the source file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dictionary {
    root: Map<String, Value>,
}

impl Dictionary {
    #[must_use]
    pub const fn new(root: Map<String, Value>) -> Self {
        Self { root }
    }

    /// Wraps a JSON value; anything but an object yields `None`.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(root) => Some(Self { root }),
            _ => None,
        }
    }

    #[must_use]
    pub const fn root(&self) -> &Map<String, Value> {
        &self.root
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Resolves a key path to a string leaf.
    ///
    /// At each level the remaining path is first tried as a literal key, so
    /// flat dictionaries and keys containing the separator (full sentences)
    /// resolve. Otherwise the path is split at each separator occurrence,
    /// left to right, descending into the first object that matches.
    #[must_use]
    pub fn lookup(&self, key_path: &str, separator: &str) -> Option<&str> {
        self.get_path(&self.locate(key_path, separator)?)
    }

    /// Object path of the string leaf [`Self::lookup`] resolves `key_path` to.
    #[must_use]
    pub fn locate(&self, key_path: &str, separator: &str) -> Option<Vec<String>> {
        if key_path.is_empty() || separator.is_empty() {
            return self
                .root
                .get(key_path)
                .filter(|value| value.is_string())
                .map(|_| vec![key_path.to_string()]);
        }
        let mut path = Vec::new();
        locate_in(&self.root, key_path, separator, &mut path).then_some(path)
    }

    /// Follows an exact object path.
    #[must_use]
    pub fn get_path(&self, path: &[String]) -> Option<&str> {
        let (last, parents) = path.split_last()?;
        let mut current = &self.root;
        for segment in parents {
            current = current.get(segment)?.as_object()?;
        }
        current.get(last).and_then(Value::as_str)
    }

    /// Sets a string leaf, creating intermediate objects as needed.
    ///
    /// Returns the previous string value (`None` when the leaf is new).
    /// Nothing is modified when a non-object value sits on the path, the
    /// leaf holds a non-string value, or the path is empty.
    pub fn set_path(&mut self, path: &[String], value: &str) -> Result<Option<String>, PathConflict> {
        let conflict = || PathConflict(path.join("/"));
        let (last, parents) = path.split_last().ok_or_else(conflict)?;

        if !is_settable(&self.root, parents, last) {
            return Err(conflict());
        }

        let mut current = &mut self.root;
        for segment in parents {
            current = current
                .entry(segment.clone())
                .or_insert_with(|| Value::Object(Map::new()))
                .as_object_mut()
                .ok_or_else(conflict)?;
        }
        let previous = current.insert(last.clone(), Value::String(value.to_string()));
        Ok(previous.and_then(|v| v.as_str().map(str::to_string)))
    }

    /// All string leaves in document order.
    #[must_use]
    pub fn entries(&self, separator: &str) -> Vec<DictionaryEntry> {
        let mut result = Vec::new();
        flatten_object(&self.root, separator, &mut Vec::new(), &mut result);
        result
    }
}

/// Recursive step of [`Dictionary::locate`]; on success `path` holds the leaf's path.
fn locate_in(map: &Map<String, Value>, rest: &str, separator: &str, path: &mut Vec<String>) -> bool {
    if map.get(rest).is_some_and(Value::is_string) {
        path.push(rest.to_string());
        return true;
    }

    for (index, _) in rest.match_indices(separator) {
        let (Some(head), Some(tail)) = (rest.get(..index), rest.get(index + separator.len()..))
        else {
            continue;
        };
        if let Some(child) = map.get(head).and_then(Value::as_object) {
            path.push(head.to_string());
            if locate_in(child, tail, separator, path) {
                return true;
            }
            path.pop();
        }
    }

    false
}

/// True when `parents` is free of non-object values and the leaf is absent or a string.
fn is_settable(root: &Map<String, Value>, parents: &[String], last: &str) -> bool {
    let mut current = root;
    for segment in parents {
        match current.get(segment) {
            Some(Value::Object(child)) => current = child,
            Some(_) => return false,
            None => return true,
        }
    }
    current.get(last).is_none_or(Value::is_string)
}

/// Flatten nested JSON object into separator-joined entries.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use market_i18n::input::dictionary::flatten_json;
///
/// let json = json!({
///     "common": {
///         "hello": "Hello",
///         "goodbye": "Goodbye"
///     }
/// });
///
/// let flattened = flatten_json(&json, ".");
/// assert_eq!(flattened[0].key, "common.hello");
/// assert_eq!(flattened[1].value, "Goodbye");
/// ```
#[must_use]
pub fn flatten_json(json: &Value, separator: &str) -> Vec<DictionaryEntry> {
    let mut result = Vec::new();
    if let Value::Object(map) = json {
        flatten_object(map, separator, &mut Vec::new(), &mut result);
    }
    result
}

/// Depth-first walk collecting string leaves.
fn flatten_object(
    map: &Map<String, Value>,
    separator: &str,
    path: &mut Vec<String>,
    result: &mut Vec<DictionaryEntry>,
) {
    for (key, value) in map {
        path.push(key.clone());
        match value {
            Value::Object(child) => flatten_object(child, separator, path, result),
            Value::String(s) => result.push(DictionaryEntry {
                key: path.join(separator),
                path: path.clone(),
                value: s.clone(),
            }),
            _ => {
                tracing::debug!(key = %path.join(separator), "Skipping non-string dictionary value");
            }
        }
        path.pop();
    }
}

/// Reads a file that must contain a top-level JSON object.
///
/// # Errors
/// Returns error if file read or JSON parse fails, or the document is not an object.
pub fn read_json_object(file_path: &Path) -> Result<Map<String, Value>, DictionaryError> {
    let content = std::fs::read_to_string(file_path)
        .map_err(|source| DictionaryError::Io { path: file_path.to_path_buf(), source })?;

    let json: Value = serde_json::from_str(&content)
        .map_err(|source| DictionaryError::Parse { path: file_path.to_path_buf(), source })?;

    match json {
        Value::Object(map) => Ok(map),
        _ => Err(DictionaryError::NotAnObject { path: file_path.to_path_buf() }),
    }
}

/// Load a dictionary file.
///
/// # Errors
/// Returns error if file read or JSON parse fails.
pub fn load_dictionary_file(file_path: &Path) -> Result<Dictionary, DictionaryError> {
    read_json_object(file_path).map(Dictionary::new)
}
