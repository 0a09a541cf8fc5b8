//! Merge input expansion: literal paths and glob patterns.

use std::path::{
    Path,
    PathBuf,
};

use globset::{
    Glob,
    GlobSet,
    GlobSetBuilder,
};
use ignore::WalkBuilder;

use super::I18nSettings;

#[derive(Debug, thiserror::Error)]
pub enum MatcherError {
    #[error("Invalid input pattern '{pattern}': {source}")]
    InvalidInputPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Invalid exclude pattern '{pattern}': {source}")]
    InvalidExcludePattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Failed to build glob set: {0}")]
    GlobSetBuild(#[from] globset::Error),
}

/// Resolves merge input arguments against the workspace.
///
/// Arguments without glob metacharacters are taken as literal paths (relative
/// ones are joined onto the workspace root). Patterns are matched against
/// workspace-relative paths of the files found by walking the workspace.
#[derive(Debug, Clone)]
pub struct InputMatcher {
    workspace_root: PathBuf,
    exclude_set: GlobSet,
}

impl InputMatcher {
    /// Creates a new matcher from settings.
    pub fn new(workspace_root: PathBuf, settings: &I18nSettings) -> Result<Self, MatcherError> {
        let exclude_set = Self::build_glob_set(&settings.merge_input_exclude, |pattern, source| {
            MatcherError::InvalidExcludePattern { pattern, source }
        })?;

        Ok(Self { workspace_root, exclude_set })
    }

    /// Compiles `patterns`, reporting the first invalid one via `make_error`.
    fn build_glob_set<F>(patterns: &[String], make_error: F) -> Result<GlobSet, MatcherError>
    where
        F: Fn(String, globset::Error) -> MatcherError,
    {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern).map_err(|e| make_error(pattern.clone(), e))?;
            builder.add(glob);
        }
        Ok(builder.build()?)
    }

    #[must_use]
    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// Expands the given arguments into a deduplicated list of files.
    ///
    /// Literal paths keep their argument order; files matched by a pattern
    /// are appended in sorted order.
    pub fn expand(&self, inputs: &[String]) -> Result<Vec<PathBuf>, MatcherError> {
        let mut files: Vec<PathBuf> = Vec::new();
        let mut patterns = Vec::new();

        for input in inputs {
            if is_glob_pattern(input) {
                patterns.push(input.clone());
            } else {
                let path = Path::new(input);
                let path = if path.is_absolute() {
                    path.to_path_buf()
                } else {
                    self.workspace_root.join(path)
                };
                if !files.contains(&path) {
                    files.push(path);
                }
            }
        }

        if patterns.is_empty() {
            return Ok(files);
        }

        let include_set = Self::build_glob_set(&patterns, |pattern, source| {
            MatcherError::InvalidInputPattern { pattern, source }
        })?;

        let mut matched = self.walk_matching(&include_set);
        if matched.is_empty() {
            tracing::warn!(?patterns, "No files matched the input patterns");
        }
        matched.sort();

        for path in matched {
            if !files.contains(&path) {
                files.push(path);
            }
        }

        Ok(files)
    }

    /// Walks the workspace and returns the files matching `include_set`.
    fn walk_matching(&self, include_set: &GlobSet) -> Vec<PathBuf> {
        let mut found_files = Vec::new();

        for result in WalkBuilder::new(&self.workspace_root)
            .hidden(false)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .follow_links(false)
            .build()
        {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::debug!(?err, "Failed to read directory entry");
                    continue;
                }
            };

            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let path = entry.path();

            let Ok(relative_path) = path.strip_prefix(&self.workspace_root) else {
                continue;
            };
            if !include_set.is_match(relative_path) || self.exclude_set.is_match(relative_path) {
                continue;
            }

            found_files.push(path.to_path_buf());
        }

        found_files
    }
}

/// Returns true when the argument contains glob metacharacters.
fn is_glob_pattern(input: &str) -> bool {
    input.contains(['*', '?', '[', '{'])
}
