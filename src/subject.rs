//! Subject-line generation and a spam-likelihood heuristic.

use serde::{Deserialize, Serialize};

use crate::placeholder::{FillPolicy, PlaceholderMap, detect_placeholders, substitute};
use crate::random::{RandomSource, shuffle};
use crate::utils::{Result, UniqueCollector, require_non_empty};

/// Voice of the generated subject lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Professional,
    Casual,
    Urgent,
    Curious,
}

impl Tone {
    fn patterns(self) -> &'static [&'static str] {
        match self {
            Tone::Professional => &[
                "[topic] for [company]",
                "Improving [topic] at [company]",
                "A question about [topic]",
                "[first_name], a note on [topic]",
                "Ideas for [company]'s [topic]",
                "[topic]: a short proposal",
                "How teams like [company] handle [topic]",
            ],
            Tone::Casual => &[
                "Quick thought on [topic]",
                "Hey [first_name], got a sec?",
                "[topic] idea for you",
                "Saw this and thought of [company]",
                "Coffee and [topic]?",
                "[first_name] + [topic]",
            ],
            Tone::Urgent => &[
                "Time-sensitive: [topic]",
                "Before Friday: [topic] at [company]",
                "[first_name], quick decision on [topic]",
                "Closing the loop on [topic]",
                "This week only: [topic] review",
            ],
            Tone::Curious => &[
                "Is [topic] on your radar?",
                "Curious how [company] approaches [topic]",
                "[first_name], can I ask about [topic]?",
                "What if [topic] took half the time?",
                "The [topic] question nobody asks",
            ],
        }
    }
}

/// Input for subject-line generation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubjectRequest {
    pub topic: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub tone: Tone,
    pub count: usize,
}

/// Generate up to `request.count` distinct subject lines.
///
/// Patterns that reference a field the request does not provide are skipped.
pub fn generate_subjects(request: &SubjectRequest, rng: &mut dyn RandomSource) -> Result<Vec<String>> {
    require_non_empty("topic", &request.topic)?;

    let mut map = PlaceholderMap::new().with("topic", request.topic.trim());
    for (token, value) in [("company", &request.company), ("first_name", &request.first_name)] {
        if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            map.insert(token, value);
        }
    }

    let mut patterns: Vec<&str> = request
        .tone
        .patterns()
        .iter()
        .copied()
        .filter(|pattern| {
            detect_placeholders(pattern)
                .iter()
                .all(|token| map.get(token).is_some())
        })
        .collect();
    shuffle(rng, &mut patterns);

    let mut collector = UniqueCollector::new(request.count, patterns.len());
    for pattern in patterns {
        collector.offer(substitute(pattern, &map, FillPolicy::Fill));
    }
    Ok(collector.finish())
}

/// Overall verdict derived from the spam score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Good,
    Fair,
    Poor,
}

impl Rating {
    fn from_score(score: u8) -> Self {
        match score {
            0..30 => Rating::Good,
            30..60 => Rating::Fair,
            _ => Rating::Poor,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rating::Good => "good",
            Rating::Fair => "fair",
            Rating::Poor => "poor",
        }
    }
}

/// Result of scoring one subject line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectAnalysis {
    pub subject: String,
    pub length: usize,
    pub word_count: usize,
    /// 0 (clean) to 100 (very likely filtered)
    pub spam_score: u8,
    pub issues: Vec<String>,
    pub rating: Rating,
}

pub const SPAM_TRIGGERS: &[&str] = &[
    "100%",
    "act now",
    "buy now",
    "cash",
    "click here",
    "free",
    "guarantee",
    "limited time",
    "no cost",
    "risk-free",
    "urgent",
    "winner",
    "congratulations",
    "earn money",
    "double your",
];

const TRIGGER_POINTS: u32 = 15;
const CAPS_POINTS: u32 = 10;
const EXCLAMATION_POINTS: u32 = 10;
const CURRENCY_POINTS: u32 = 10;
const TOO_LONG_POINTS: u32 = 10;
const TOO_SHORT_POINTS: u32 = 5;
const MAX_LENGTH: usize = 60;
const MIN_LENGTH: usize = 10;

/// Score how likely a subject line is to trip spam filters
pub fn score_subject(subject: &str) -> SubjectAnalysis {
    let length = subject.chars().count();
    let word_count = subject.split_whitespace().count();
    let lower = subject.to_lowercase();
    let mut points = 0u32;
    let mut issues = Vec::new();

    for trigger in SPAM_TRIGGERS {
        if contains_phrase(&lower, trigger) {
            points += TRIGGER_POINTS;
            issues.push(format!("contains spam trigger \"{}\"", trigger));
        }
    }

    let shouting = subject
        .split_whitespace()
        .filter(|word| {
            let letters: Vec<char> = word.chars().filter(|c| c.is_alphabetic()).collect();
            letters.len() >= 3 && letters.iter().all(|c| c.is_uppercase())
        })
        .count() as u32;
    if shouting > 0 {
        points += CAPS_POINTS * shouting;
        issues.push(format!("{} all-caps word(s)", shouting));
    }

    let exclamations = subject.matches('!').count() as u32;
    if exclamations > 0 {
        points += EXCLAMATION_POINTS * exclamations;
        issues.push(format!("{} exclamation mark(s)", exclamations));
    }

    if subject.contains('$') {
        points += CURRENCY_POINTS;
        issues.push("mentions money ($)".to_string());
    }

    if length > MAX_LENGTH {
        points += TOO_LONG_POINTS;
        issues.push(format!("longer than {} characters", MAX_LENGTH));
    } else if length < MIN_LENGTH {
        points += TOO_SHORT_POINTS;
        issues.push(format!("shorter than {} characters", MIN_LENGTH));
    }

    let spam_score = points.min(100) as u8;
    SubjectAnalysis {
        subject: subject.to_string(),
        length,
        word_count,
        spam_score,
        issues,
        rating: Rating::from_score(spam_score),
    }
}

/// Phrase match that does not fire inside longer words ("free" vs "freedom")
fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    haystack.match_indices(phrase).any(|(start, matched)| {
        let end = start + matched.len();
        let before = haystack[..start].chars().next_back();
        let after = haystack[end..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SeededRandom;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_clean_subject() {
        let analysis = score_subject("A question about deliverability");
        assert_eq!(analysis.spam_score, 0);
        assert_eq!(analysis.rating, Rating::Good);
        assert_eq!(analysis.word_count, 4);
        assert!(analysis.issues.is_empty());
    }

    #[test]
    fn test_spammy_subject() {
        let analysis = score_subject("FREE cash!!! Act now");
        // free + cash + act now = 45, FREE = 10, three ! = 30
        assert_eq!(analysis.spam_score, 85);
        assert_eq!(analysis.rating, Rating::Poor);
    }

    #[test]
    fn test_score_is_clamped() {
        let analysis = score_subject("FREE CASH WINNER!!!!!!!!!! $$$ guarantee urgent click here");
        assert_eq!(analysis.spam_score, 100);
    }

    #[test]
    fn test_length_rules() {
        assert_eq!(score_subject("Hi").spam_score, 5);
        let long = "a ".repeat(40);
        assert_eq!(score_subject(long.trim()).spam_score, 10);
    }

    #[test]
    fn test_trigger_needs_word_boundary() {
        assert_eq!(score_subject("Freedom to choose your stack").spam_score, 0);
    }

    #[test]
    fn test_generate_subjects() {
        let request = SubjectRequest {
            topic: "deliverability".to_string(),
            company: Some("Acme".to_string()),
            first_name: None,
            tone: Tone::Professional,
            count: 4,
        };
        let mut rng = SeededRandom::new(5);
        let subjects = generate_subjects(&request, &mut rng).unwrap();
        assert_eq!(subjects.len(), 4);
        for subject in &subjects {
            assert!(!subject.contains('['), "unfilled token in {}", subject);
        }
    }

    #[test]
    fn test_generate_subjects_caps_at_available_patterns() {
        let request = SubjectRequest {
            topic: "onboarding".to_string(),
            tone: Tone::Curious,
            count: 50,
            ..Default::default()
        };
        let subjects = generate_subjects(&request, &mut SeededRandom::new(1)).unwrap();
        // only patterns that use nothing but [topic]
        assert_eq!(subjects.len(), 3);
    }

    #[test]
    fn test_generate_requires_topic() {
        let request = SubjectRequest {
            count: 3,
            ..Default::default()
        };
        assert!(generate_subjects(&request, &mut SeededRandom::new(1)).is_err());
    }
}
