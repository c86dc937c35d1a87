//! `[token]` placeholders: detection and substitution.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]").expect("placeholder pattern is valid"));

/// Distinct `[token]` placeholders in order of first appearance
pub fn detect_placeholders(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    PLACEHOLDER
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .filter(|token| seen.insert(token.clone()))
        .collect()
}

/// Whether detected placeholders get filled or are left as they are
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillPolicy {
    /// Replace every placeholder that has a non-empty value
    #[default]
    Fill,
    /// Leave all placeholders untouched
    Skip,
}

/// Ordered mapping from placeholder token to replacement value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceholderMap {
    entries: Vec<(String, String)>,
}

impl PlaceholderMap {
    pub fn new() -> Self {
        PlaceholderMap::default()
    }

    /// One empty entry per placeholder found in `text`
    pub fn from_detected(text: &str) -> Self {
        let mut map = PlaceholderMap::new();
        for token in detect_placeholders(text) {
            map.insert(&token, "");
        }
        map
    }

    /// Set a value. `token` may be given as `first_name` or `[first_name]`.
    pub fn insert(&mut self, token: &str, value: &str) -> &mut Self {
        let key = bracketed(token);
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.entries.push((key, value.to_string())),
        }
        self
    }

    pub fn with(mut self, token: &str, value: &str) -> Self {
        self.insert(token, value);
        self
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        let key = bracketed(token);
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Tokens that still have no value
    pub fn unfilled(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, v)| v.is_empty())
            .map(|(k, _)| k.as_str())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn bracketed(token: &str) -> String {
    let trimmed = token.trim();
    if trimmed.starts_with('[') && trimmed.ends_with(']') {
        trimmed.to_string()
    } else {
        format!("[{}]", trimmed)
    }
}

/// Replace mapped placeholders with their values.
///
/// Substitution is a single pass: a value that itself looks like a
/// placeholder is copied literally and never expanded. Tokens with an empty
/// or missing value are kept verbatim.
pub fn substitute(text: &str, map: &PlaceholderMap, policy: FillPolicy) -> String {
    if policy == FillPolicy::Skip || map.is_empty() {
        return text.to_string();
    }
    PLACEHOLDER
        .replace_all(text, |caps: &Captures| {
            let token = &caps[0];
            match map.get(token) {
                Some(value) if !value.is_empty() => value.to_string(),
                _ => token.to_string(),
            }
        })
        .into_owned()
}
