//! Rewrites known phrases in plain text into spintax groups.
//!
//! The input is split once into plain spans, existing `{...}` groups and
//! `[...]` placeholders; only the plain spans are rewritten. Every phrase is
//! matched in a single pass, so a freshly inserted group is never scanned
//! again and running the synthesizer on its own output changes nothing that
//! was already wrapped.

use once_cell::sync::Lazy;
use regex::{Captures, Regex, RegexBuilder};
use std::collections::HashMap;

use crate::utils::{GenError, Result};

/// Built-in phrase table: phrase, then the options of its group
pub const DEFAULT_PHRASES: &[(&str, &[&str])] = &[
    (
        "I hope this email finds you well",
        &[
            "I hope this email finds you well",
            "I hope you're doing well",
            "I trust this message finds you well",
            "I hope your week is going well",
        ],
    ),
    (
        "I'm reaching out",
        &[
            "I'm reaching out",
            "I wanted to reach out",
            "I'm getting in touch",
            "I'm contacting you",
        ],
    ),
    (
        "would you be open to",
        &[
            "would you be open to",
            "are you open to",
            "would you be interested in",
        ],
    ),
    (
        "schedule a call",
        &["schedule a call", "set up a call", "book a quick chat"],
    ),
    (
        "looking forward to",
        &["looking forward to", "excited about", "eager for"],
    ),
    (
        "quick question",
        &["quick question", "brief question", "short question"],
    ),
    (
        "best regards",
        &["best regards", "kind regards", "warm regards", "all the best"],
    ),
    (
        "let me know",
        &["let me know", "tell me", "drop me a line", "give me a shout"],
    ),
    ("interested", &["interested", "curious", "keen"]),
    ("improve", &["improve", "boost", "enhance", "increase"]),
    ("thanks", &["thanks", "thank you", "many thanks", "cheers"]),
    ("great", &["great", "excellent", "fantastic", "terrific"]),
    ("help", &["help", "assist", "support"]),
    ("Hi", &["Hi", "Hello", "Hey"]),
];

static DEFAULT_SYNTHESIZER: Lazy<SpintaxSynthesizer> = Lazy::new(|| {
    SpintaxSynthesizer::with_phrases(DEFAULT_PHRASES).expect("built-in phrase table is valid")
});

/// Wrap known phrases in `text` using the built-in phrase table
pub fn synthesize(text: &str) -> String {
    DEFAULT_SYNTHESIZER.synthesize(text)
}

/// Phrase-to-spintax rewriter
#[derive(Debug, Clone)]
pub struct SpintaxSynthesizer {
    pattern: Regex,
    /// Lower-cased phrase -> options
    groups: HashMap<String, Vec<String>>,
}

impl SpintaxSynthesizer {
    /// Build from a phrase table. Longer phrases take precedence over shorter
    /// ones that overlap them.
    pub fn with_phrases<S: AsRef<str>>(phrases: &[(S, &[S])]) -> Result<Self> {
        let mut groups = HashMap::new();
        let mut keys: Vec<String> = Vec::new();
        for (phrase, options) in phrases {
            let phrase = phrase.as_ref().trim();
            if phrase.is_empty() || options.len() < 2 {
                return Err(GenError::Validation(format!(
                    "phrase '{}' needs at least two options",
                    phrase
                )));
            }
            let options: Vec<String> = options.iter().map(|o| o.as_ref().to_string()).collect();
            if options.iter().any(|o| o.contains(['{', '}', '|'])) {
                return Err(GenError::Validation(format!(
                    "options for '{}' must not contain spintax syntax",
                    phrase
                )));
            }
            let key = phrase.to_lowercase();
            if groups.insert(key.clone(), options).is_none() {
                keys.push(key);
            }
        }

        // Leftmost-first alternation: the first listed alternative wins at a
        // given position, so list longer phrases first.
        keys.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        let alternation = keys
            .iter()
            .map(|k| regex::escape(k))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = RegexBuilder::new(&format!(r"\b(?:{})\b", alternation))
            .case_insensitive(true)
            .build()
            .map_err(|e| GenError::Validation(format!("phrase table: {}", e)))?;

        Ok(SpintaxSynthesizer { pattern, groups })
    }

    /// Rewrite known phrases in the plain spans of `text`
    pub fn synthesize(&self, text: &str) -> String {
        let mut result = String::with_capacity(text.len() * 2);
        for span in split_spans(text) {
            match span {
                Span::Plain(plain) => result.push_str(&self.rewrite_plain(plain)),
                Span::Protected(raw) => result.push_str(raw),
            }
        }
        result
    }

    fn rewrite_plain(&self, plain: &str) -> String {
        self.pattern
            .replace_all(plain, |caps: &Captures| {
                let matched = &caps[0];
                match self.groups.get(&matched.to_lowercase()) {
                    Some(options) => render_group(options, Casing::of(matched)),
                    None => matched.to_string(),
                }
            })
            .into_owned()
    }

    pub fn phrase_count(&self) -> usize {
        self.groups.len()
    }
}

/// How options are cased to follow the matched text
#[derive(Debug, Clone, Copy, PartialEq)]
enum Casing {
    Upper,
    Lower,
    AsWritten,
}

impl Casing {
    fn of(matched: &str) -> Self {
        match matched.chars().next() {
            Some(c) if c.is_uppercase() => Casing::Upper,
            Some(c) if c.is_lowercase() => Casing::Lower,
            _ => Casing::AsWritten,
        }
    }
}

fn render_group(options: &[String], casing: Casing) -> String {
    let rendered: Vec<String> = options
        .iter()
        .map(|option| match casing {
            Casing::Upper => capitalize_first(option),
            Casing::Lower if !starts_with_pronoun_i(option) => lowercase_first(option),
            _ => option.clone(),
        })
        .collect();
    format!("{{{}}}", rendered.join("|"))
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn lowercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// "I", "I'm", "I wanted": the pronoun stays upper-case
fn starts_with_pronoun_i(text: &str) -> bool {
    let mut chars = text.chars();
    chars.next() == Some('I') && chars.next().is_none_or(|c| !c.is_alphanumeric())
}

#[derive(Debug, PartialEq)]
enum Span<'a> {
    Plain(&'a str),
    /// A `{...}` group or `[...]` placeholder, copied unchanged
    Protected(&'a str),
}

/// Split into plain and protected spans. An unclosed `{` or `[` protects the
/// rest of the text.
fn split_spans(text: &str) -> Vec<Span<'_>> {
    let mut spans = Vec::new();
    let mut plain_start = 0;
    let mut pos = 0;

    while pos < text.len() {
        let rest = &text[pos..];
        let close = match rest.as_bytes()[0] {
            b'{' => Some('}'),
            b'[' => Some(']'),
            _ => None,
        };
        let Some(close) = close else {
            pos += rest.chars().next().map_or(1, char::len_utf8);
            continue;
        };

        if plain_start < pos {
            spans.push(Span::Plain(&text[plain_start..pos]));
        }
        let end = rest.find(close).map_or(text.len(), |i| pos + i + 1);
        spans.push(Span::Protected(&text[pos..end]));
        pos = end;
        plain_start = end;
    }
    if plain_start < text.len() {
        spans.push(Span::Plain(&text[plain_start..]));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_spans() {
        assert_eq!(
            split_spans("Hi [name], {a|b} ok"),
            vec![
                Span::Plain("Hi "),
                Span::Protected("[name]"),
                Span::Plain(", "),
                Span::Protected("{a|b}"),
                Span::Plain(" ok"),
            ]
        );
        assert_eq!(
            split_spans("open {never closed"),
            vec![Span::Plain("open "), Span::Protected("{never closed")]
        );
    }

    #[test]
    fn test_synthesize_wraps_phrases() {
        let out = synthesize("I'm reaching out because this looks great.");
        assert_eq!(
            out,
            "{I'm reaching out|I wanted to reach out|I'm getting in touch|I'm contacting you} \
             because this looks {great|excellent|fantastic|terrific}."
        );
    }

    #[test]
    fn test_capitalizes_options_for_capitalized_match() {
        let out = synthesize("Thanks!");
        assert_eq!(out, "{Thanks|Thank you|Many thanks|Cheers}!");
    }

    #[test]
    fn test_lowercases_options_for_lowercase_match() {
        assert_eq!(
            synthesize("say hi to the team"),
            "say {hi|hello|hey} to the team"
        );
        assert_eq!(
            synthesize("oh hi there, say hi to the team"),
            "oh {hi|hello|hey} there, say {hi|hello|hey} to the team"
        );
    }

    #[test]
    fn test_lowercase_match_keeps_pronoun_i() {
        let out = synthesize("so i'm reaching out today");
        assert_eq!(
            out,
            "so {I'm reaching out|I wanted to reach out|I'm getting in touch|I'm contacting you} today"
        );
        assert!(starts_with_pronoun_i("I"));
        assert!(!starts_with_pronoun_i("Interested"));
    }

    #[test]
    fn test_longest_phrase_wins() {
        let out = synthesize("Let me know if you have a quick question");
        assert!(out.starts_with("{Let me know|Tell me|"));
        assert!(out.ends_with("{quick question|brief question|short question}"));
    }

    #[test]
    fn test_does_not_touch_groups_or_placeholders() {
        let text = "{great|good} work [great_name]";
        assert_eq!(synthesize(text), text);
    }

    #[test]
    fn test_rerun_is_stable() {
        let once = synthesize("Hi there, let me know. Thanks, this will help.");
        assert_eq!(synthesize(&once), once);
    }

    #[test]
    fn test_word_boundaries() {
        // "helpful" and "Hiking" contain phrases but are different words
        assert_eq!(synthesize("helpful Hiking"), "helpful Hiking");
    }

    #[test]
    fn test_custom_table_validation() {
        let bad: &[(&str, &[&str])] = &[("x", &["only"])];
        assert!(SpintaxSynthesizer::with_phrases(bad).is_err());
        let good: &[(&str, &[&str])] = &[("cheap", &["affordable", "budget-friendly"])];
        let synth = SpintaxSynthesizer::with_phrases(good).unwrap();
        assert_eq!(synth.synthesize("cheap plan"), "{affordable|budget-friendly} plan");
    }
}
