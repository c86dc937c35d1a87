use std::collections::HashSet;
use std::fmt;
use std::io;
use std::ops::RangeInclusive;
use thiserror::Error;
use tracing::debug;

/// Custom error types for the outreach generators
#[derive(Error, Debug)]
pub enum GenError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed spintax at byte {position}: {reason}")]
    MalformedSpintax { position: usize, reason: String },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("Unknown template: {0}")]
    UnknownTemplate(String),
}

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, GenError>;

/// Trait for post-processing generated text
pub trait TextFilter: Send + Sync + fmt::Debug {
    /// Transform generated text
    fn filter(&self, text: &str) -> String;

    /// Get the name of this filter
    fn name(&self) -> &str;

    /// Check if this filter applies to a given text
    fn applies_to(&self, _text: &str) -> bool {
        true
    }

    /// Clone this filter as a box
    fn clone_box(&self) -> Box<dyn TextFilter>;
}

impl Clone for Box<dyn TextFilter> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Trait for creating filter chains
pub trait FilterExt: TextFilter + Sized {
    /// Chain this filter with another one
    fn chain<F: TextFilter + 'static>(self, other: F) -> FilterChain
    where
        Self: 'static,
    {
        FilterChain::new(Box::new(self), Box::new(other))
    }
}

impl<T: TextFilter + 'static> FilterExt for T {}

/// A chain of filters that are applied in sequence
#[derive(Debug)]
pub struct FilterChain {
    filters: Vec<Box<dyn TextFilter>>,
    name: String,
}

impl FilterChain {
    /// Create a new filter chain from two filters
    pub fn new(first: Box<dyn TextFilter>, second: Box<dyn TextFilter>) -> Self {
        let name = format!("{}+{}", first.name(), second.name());
        FilterChain {
            filters: vec![first, second],
            name,
        }
    }

    /// Add another filter to the chain
    pub fn add<F: TextFilter + 'static>(mut self, filter: F) -> Self {
        self.name = format!("{}+{}", self.name, filter.name());
        self.filters.push(Box::new(filter));
        self
    }
}

impl TextFilter for FilterChain {
    fn filter(&self, text: &str) -> String {
        let mut result = text.to_string();
        for filter in &self.filters {
            if filter.applies_to(&result) {
                result = filter.filter(&result);
            }
        }
        result
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn clone_box(&self) -> Box<dyn TextFilter> {
        Box::new(FilterChain {
            filters: self.filters.iter().map(|f| f.clone_box()).collect(),
            name: self.name.clone(),
        })
    }
}

/// Leaves text untouched
#[derive(Debug, Clone)]
pub struct NoopFilter;

impl TextFilter for NoopFilter {
    fn filter(&self, text: &str) -> String {
        text.to_string()
    }

    fn name(&self) -> &str {
        "noop"
    }

    fn clone_box(&self) -> Box<dyn TextFilter> {
        Box::new(self.clone())
    }
}

/// Punctuation that never takes a space before it
const CLOSING_PUNCTUATION: [char; 4] = ['.', ',', '!', '?'];

/// Collapses runs of spaces (left behind by empty alternatives) and trims the ends
#[derive(Debug, Clone)]
pub struct WhitespaceFilter;

impl TextFilter for WhitespaceFilter {
    fn filter(&self, text: &str) -> String {
        let mut result = String::with_capacity(text.len());
        let mut last_space = false;
        for ch in text.chars() {
            if ch == ' ' {
                if !last_space {
                    result.push(ch);
                }
                last_space = true;
            } else {
                // "word ." -> "word."
                if last_space && CLOSING_PUNCTUATION.contains(&ch) {
                    result.pop();
                }
                result.push(ch);
                last_space = false;
            }
        }
        result.trim().to_string()
    }

    fn name(&self) -> &str {
        "whitespace"
    }

    fn applies_to(&self, text: &str) -> bool {
        text.contains("  ")
            || text.starts_with(' ')
            || text.ends_with(' ')
            || CLOSING_PUNCTUATION
                .iter()
                .any(|p| text.contains(&format!(" {}", p)))
    }

    fn clone_box(&self) -> Box<dyn TextFilter> {
        Box::new(self.clone())
    }
}

/// Upper-cases the first letter of the text and of every sentence
#[derive(Debug, Clone)]
pub struct SentenceCaseFilter;

impl TextFilter for SentenceCaseFilter {
    fn filter(&self, text: &str) -> String {
        let mut result = String::with_capacity(text.len());
        let mut capitalize = true;
        for ch in text.chars() {
            if capitalize && ch.is_alphabetic() {
                result.extend(ch.to_uppercase());
                capitalize = false;
            } else {
                result.push(ch);
                if matches!(ch, '.' | '!' | '?') {
                    capitalize = true;
                } else if !ch.is_whitespace() {
                    capitalize = false;
                }
            }
        }
        result
    }

    fn name(&self) -> &str {
        "sentence_case"
    }

    fn clone_box(&self) -> Box<dyn TextFilter> {
        Box::new(self.clone())
    }
}

/// Create a no-op filter that doesn't change the input
pub fn noop_filter() -> Box<dyn TextFilter> {
    Box::new(NoopFilter)
}

/// Create a filter that tidies whitespace and restores sentence case
pub fn tidy_filter() -> Box<dyn TextFilter> {
    Box::new(WhitespaceFilter.chain(SentenceCaseFilter))
}

/// Look up a built-in filter by name
pub fn filter_by_name(name: &str) -> Option<Box<dyn TextFilter>> {
    match name {
        "noop" => Some(noop_filter()),
        "whitespace" => Some(Box::new(WhitespaceFilter)),
        "sentence_case" => Some(Box::new(SentenceCaseFilter)),
        "tidy" => Some(tidy_filter()),
        _ => None,
    }
}

/// Collects generated candidates into an ordered, duplicate-free list.
///
/// A candidate is kept when it has not been seen before and, if a length range
/// is set, its character count lies inside the range. Collection ends when the
/// target is reached or the attempt budget runs out.
#[derive(Debug, Clone)]
pub struct UniqueCollector {
    target: usize,
    attempts_left: usize,
    length: Option<RangeInclusive<usize>>,
    seen: HashSet<String>,
    items: Vec<String>,
}

impl UniqueCollector {
    pub fn new(target: usize, attempt_budget: usize) -> Self {
        UniqueCollector {
            target,
            attempts_left: attempt_budget,
            length: None,
            seen: HashSet::new(),
            items: Vec::new(),
        }
    }

    /// Only accept candidates whose character count lies in `range`
    pub fn with_length(mut self, range: RangeInclusive<usize>) -> Self {
        self.length = Some(range);
        self
    }

    /// Offer a candidate; returns true if it was kept.
    ///
    /// Every offer consumes one attempt, whether or not it is kept.
    pub fn offer(&mut self, candidate: String) -> bool {
        if self.is_done() {
            return false;
        }
        self.attempts_left -= 1;

        if let Some(range) = &self.length {
            if !range.contains(&candidate.chars().count()) {
                return false;
            }
        }
        if !self.seen.insert(candidate.clone()) {
            return false;
        }
        self.items.push(candidate);
        true
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.target
    }

    pub fn is_done(&self) -> bool {
        self.is_full() || self.attempts_left == 0
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn finish(self) -> Vec<String> {
        if !self.is_full() {
            debug!(
                target_count = self.target,
                collected = self.items.len(),
                "attempt budget exhausted before target"
            );
        }
        self.items
    }
}

/// Generate candidates with `make` until `target` unique ones are collected or
/// `budget` attempts are used. `make` returning `None` still costs an attempt.
pub fn collect_unique<F>(
    target: usize,
    budget: usize,
    length: Option<RangeInclusive<usize>>,
    mut make: F,
) -> Vec<String>
where
    F: FnMut() -> Option<String>,
{
    let mut collector = UniqueCollector::new(target, budget);
    if let Some(range) = length {
        collector = collector.with_length(range);
    }
    while !collector.is_done() {
        match make() {
            Some(candidate) => {
                collector.offer(candidate);
            }
            None => collector.attempts_left -= 1,
        }
    }
    collector.finish()
}

/// Reject a blank required field
pub fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(GenError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_whitespace_filter() {
        let filter = WhitespaceFilter;
        assert_eq!(filter.filter("Hi  there ."), "Hi there.");
        assert_eq!(filter.filter(" leading and trailing "), "leading and trailing");
    }

    #[test]
    fn test_sentence_case_filter() {
        let filter = SentenceCaseFilter;
        assert_eq!(
            filter.filter("hello there. how are you? fine"),
            "Hello there. How are you? Fine"
        );
    }

    #[test]
    fn test_filter_chain() {
        let chain = WhitespaceFilter.chain(SentenceCaseFilter);
        assert_eq!(chain.name(), "whitespace+sentence_case");
        assert_eq!(chain.filter("  quick  note ."), "Quick note.");
    }

    #[test]
    fn test_tidy_handles_every_closing_mark() {
        let tidy = tidy_filter();
        assert_eq!(tidy.filter("thanks !"), "Thanks!");
        assert_eq!(tidy.filter("got a minute ?"), "Got a minute?");
        assert_eq!(tidy.filter("thanks ."), "Thanks.");
        assert!(WhitespaceFilter.applies_to("great work !"));
        assert!(!WhitespaceFilter.applies_to("great work!"));
    }

    #[test]
    fn test_filter_by_name() {
        assert!(filter_by_name("tidy").is_some());
        assert!(filter_by_name("nope").is_none());
        assert_eq!(filter_by_name("noop").unwrap().filter(" x "), " x ");
    }

    #[test]
    fn test_collector_dedup_and_length() {
        let mut collector = UniqueCollector::new(3, 10).with_length(2..=4);
        assert!(collector.offer("ab".to_string()));
        assert!(!collector.offer("ab".to_string()));
        assert!(!collector.offer("a".to_string()));
        assert!(!collector.offer("abcde".to_string()));
        assert!(collector.offer("abcd".to_string()));
        assert!(collector.offer("xyz".to_string()));
        assert!(collector.is_full());
        assert!(!collector.offer("efg".to_string()));
        assert_eq!(collector.finish(), vec!["ab", "abcd", "xyz"]);
    }

    #[test]
    fn test_collect_unique_respects_budget() {
        let mut calls = 0;
        let items = collect_unique(5, 4, None, || {
            calls += 1;
            Some("same".to_string())
        });
        assert_eq!(items, vec!["same"]);
        assert_eq!(calls, 4);
    }

    #[test]
    fn test_require_non_empty() {
        assert!(require_non_empty("keyword", "launch").is_ok());
        let err = require_non_empty("keyword", "   ").unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: keyword is required");
    }
}
