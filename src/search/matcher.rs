use regex::{Regex, RegexBuilder};

/// Case-insensitive literal matcher for a search term
///
/// Search and highlighting share one matcher so that every message counted as a hit also
/// shows a highlighted span.
#[derive(Debug, Clone)]
pub struct TermMatcher {
    term: String,
    re: Regex,
}

impl TermMatcher {
    /// Returns `None` for an empty term
    pub fn new(term: &str) -> Option<Self> {
        if term.is_empty() {
            return None;
        }
        let re = RegexBuilder::new(&regex::escape(term)).case_insensitive(true).build().ok()?;
        Some(Self { term: term.to_string(), re })
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.re.is_match(text)
    }

    /// Byte ranges of every non-overlapping match in `text`
    pub fn find_ranges(&self, text: &str) -> Vec<std::ops::Range<usize>> {
        self.re.find_iter(text).map(|m| m.range()).collect()
    }
}
