//! Heuristic for strings not worth sending through translation.

/// Decides which texts the rewriter leaves untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkipPolicy {
    /// Skip when the trimmed text has at most this many chars.
    pub min_length: usize,
    /// Skip texts made only of digits, whitespace, punctuation and symbols.
    pub skip_symbolic: bool,
}

impl Default for SkipPolicy {
    fn default() -> Self {
        Self { min_length: 1, skip_symbolic: true }
    }
}

impl SkipPolicy {
    #[must_use]
    pub fn should_skip(&self, text: &str) -> bool {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return true;
        }

        if trimmed.chars().count() <= self.min_length {
            return true;
        }

        self.skip_symbolic && trimmed.chars().all(is_symbolic)
    }
}

/// Anything but a letter: digits, whitespace, punctuation and symbols of any script.
fn is_symbolic(c: char) -> bool {
    !c.is_alphabetic()
}

/// [`SkipPolicy::should_skip`] with the default policy.
#[must_use]
pub fn should_skip(text: &str) -> bool {
    SkipPolicy::default().should_skip(text)
}
