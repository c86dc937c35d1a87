//! Username generation from a person's name or from word combinations.

use serde::{Deserialize, Serialize};

use crate::random::{RandomSource, pick};
use crate::utils::{GenError, Result, collect_unique};

const ADJECTIVES: &[&str] = &[
    "bright", "swift", "clever", "bold", "calm", "sharp", "lucky", "noble", "quiet", "rapid",
    "sunny", "brave", "keen", "prime", "true", "vivid",
];

const NOUNS: &[&str] = &[
    "falcon", "maple", "river", "pixel", "comet", "harbor", "summit", "otter", "cedar", "orbit",
    "ember", "signal", "meadow", "beacon", "atlas", "quill",
];

/// Attempts allowed per requested username
const ATTEMPTS_PER_ITEM: usize = 25;

/// Input for username generation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UsernameRequest {
    pub first_name: String,
    pub last_name: String,
    /// Optional word mixed into word-based names
    pub keyword: String,
    pub include_numbers: bool,
    /// Separators to choose from; an empty string means "no separator"
    pub separators: Vec<String>,
    pub min_length: usize,
    pub max_length: usize,
    pub quantity: usize,
}

impl Default for UsernameRequest {
    fn default() -> Self {
        UsernameRequest {
            first_name: String::new(),
            last_name: String::new(),
            keyword: String::new(),
            include_numbers: true,
            separators: vec![String::new(), ".".to_string(), "_".to_string()],
            min_length: 4,
            max_length: 20,
            quantity: 10,
        }
    }
}

impl UsernameRequest {
    fn validate(&self) -> Result<()> {
        if self.quantity == 0 {
            return Err(GenError::Validation("quantity must be at least 1".to_string()));
        }
        if self.min_length == 0 || self.min_length > self.max_length {
            return Err(GenError::Validation(format!(
                "invalid length range {}..={}",
                self.min_length, self.max_length
            )));
        }
        for sep in &self.separators {
            if sep.chars().any(|c| c.is_alphanumeric() || c.is_whitespace()) {
                return Err(GenError::Validation(format!("invalid separator '{}'", sep)));
            }
        }
        Ok(())
    }
}

/// Lower-case ASCII letters and digits only
fn clean(word: &str) -> String {
    word.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Generate up to `quantity` distinct usernames within the length range
pub fn generate_usernames(request: &UsernameRequest, rng: &mut dyn RandomSource) -> Result<Vec<String>> {
    request.validate()?;

    let first = clean(&request.first_name);
    let last = clean(&request.last_name);
    let keyword = clean(&request.keyword);
    let separators: Vec<&str> = if request.separators.is_empty() {
        vec![""]
    } else {
        request.separators.iter().map(String::as_str).collect()
    };

    let budget = request.quantity.saturating_mul(ATTEMPTS_PER_ITEM);
    let range = request.min_length..=request.max_length;

    let usernames = collect_unique(request.quantity, budget, Some(range), || {
        let sep = pick(rng, &separators).copied().unwrap_or("");
        let base = if !first.is_empty() {
            name_candidate(rng, &first, &last, sep)
        } else {
            word_candidate(rng, &keyword, sep)
        };
        if request.include_numbers && rng.chance(0.4) {
            Some(format!("{}{}", base, rng.between(1, 999)))
        } else {
            Some(base)
        }
    });
    Ok(usernames)
}

fn name_candidate(rng: &mut dyn RandomSource, first: &str, last: &str, sep: &str) -> String {
    let f = &first[..1];
    if last.is_empty() {
        let word = pick(rng, NOUNS).copied().unwrap_or("mail");
        return match rng.next_index(3) {
            0 => first.to_string(),
            1 => format!("{}{}{}", first, sep, word),
            _ => format!("{}{}{}", word, sep, first),
        };
    }
    let l = &last[..1];
    match rng.next_index(6) {
        0 => format!("{}{}{}", first, sep, last),
        1 => format!("{}{}{}", f, sep, last),
        2 => format!("{}{}{}", first, sep, l),
        3 => format!("{}{}{}", last, sep, first),
        4 => format!("{}{}{}", last, sep, f),
        _ => format!("{}{}", first, last),
    }
}

fn word_candidate(rng: &mut dyn RandomSource, keyword: &str, sep: &str) -> String {
    let adjective = pick(rng, ADJECTIVES).copied().unwrap_or("bright");
    let noun = pick(rng, NOUNS).copied().unwrap_or("falcon");
    if keyword.is_empty() {
        return format!("{}{}{}", adjective, sep, noun);
    }
    match rng.next_index(3) {
        0 => format!("{}{}{}", adjective, sep, keyword),
        1 => format!("{}{}{}", keyword, sep, noun),
        _ => format!("{}{}{}{}{}", adjective, sep, keyword, sep, noun),
    }
}
