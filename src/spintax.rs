use tracing::debug;

use crate::random::{RandomSource, shuffle};
use crate::utils::{GenError, Result, TextFilter, UniqueCollector, noop_filter};

/// A piece of spintax text, either literal or an alternation group
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Literal text copied to every variant
    Text(String),
    /// `{a|b|c}`: exactly one option is chosen per variant
    Group(Vec<String>),
}

/// Parsed spintax: literal text interleaved with `{a|b}` groups.
///
/// Groups cannot nest. Parsing rejects nested or unbalanced braces rather
/// than guessing at what was meant.
#[derive(Debug, Clone, PartialEq)]
pub struct SpintaxText {
    segments: Vec<Segment>,
}

impl SpintaxText {
    /// Parse text containing zero or more `{opt1|opt2|...}` groups
    pub fn parse(input: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut group: Option<(usize, String)> = None;

        for (pos, ch) in input.char_indices() {
            match (ch, group.as_mut()) {
                ('{', None) => {
                    if !literal.is_empty() {
                        segments.push(Segment::Text(std::mem::take(&mut literal)));
                    }
                    group = Some((pos, String::new()));
                }
                ('{', Some((start, _))) => {
                    return Err(GenError::MalformedSpintax {
                        position: pos,
                        reason: format!("nested group inside group opened at byte {}", start),
                    });
                }
                ('}', None) => {
                    return Err(GenError::MalformedSpintax {
                        position: pos,
                        reason: "closing brace without an open group".to_string(),
                    });
                }
                ('}', Some(_)) => {
                    if let Some((_, body)) = group.take() {
                        let options = body.split('|').map(str::to_string).collect();
                        segments.push(Segment::Group(options));
                    }
                }
                (_, Some((_, body))) => body.push(ch),
                (_, None) => literal.push(ch),
            }
        }

        if let Some((start, _)) = group {
            return Err(GenError::MalformedSpintax {
                position: start,
                reason: "group is never closed".to_string(),
            });
        }
        if !literal.is_empty() {
            segments.push(Segment::Text(literal));
        }

        debug!(segments = segments.len(), "parsed spintax");
        Ok(SpintaxText { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of `{...}` groups
    pub fn group_count(&self) -> usize {
        self.groups().count()
    }

    fn groups(&self) -> impl Iterator<Item = &Vec<String>> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Group(options) => Some(options),
            Segment::Text(_) => None,
        })
    }

    /// Product of the option counts of every group; 1 when there are none.
    ///
    /// Saturates at `u128::MAX`: the count is only ever displayed.
    pub fn variation_count(&self) -> u128 {
        self.groups()
            .fold(1u128, |acc, options| acc.saturating_mul(options.len() as u128))
    }

    /// Resolve every group to one uniformly chosen option
    pub fn resolve(&self, rng: &mut dyn RandomSource) -> String {
        let mut result = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => result.push_str(text),
                Segment::Group(options) => {
                    let idx = rng.next_index(options.len());
                    result.push_str(&options[idx]);
                }
            }
        }
        result
    }

    /// Resolve using an explicit option index per group
    fn resolve_with(&self, choices: &[usize]) -> String {
        let mut result = String::new();
        let mut choice = choices.iter();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => result.push_str(text),
                Segment::Group(options) => {
                    let idx = choice.next().copied().unwrap_or(0);
                    result.push_str(&options[idx]);
                }
            }
        }
        result
    }

    /// Every variant, in odometer order. Only sensible for small spaces.
    fn enumerate(&self) -> Vec<String> {
        let sizes: Vec<usize> = self.groups().map(Vec::len).collect();
        let mut choices = vec![0usize; sizes.len()];
        let mut all = Vec::new();
        loop {
            all.push(self.resolve_with(&choices));

            // Advance the rightmost group that still has options left
            let mut i = sizes.len();
            loop {
                if i == 0 {
                    return all;
                }
                i -= 1;
                choices[i] += 1;
                if choices[i] < sizes[i] {
                    break;
                }
                choices[i] = 0;
            }
        }
    }
}

/// Count the variants reachable from `text`
pub fn count_variations(text: &str) -> Result<u128> {
    Ok(SpintaxText::parse(text)?.variation_count())
}

/// Configuration options for variant expansion
#[derive(Debug, Clone)]
pub struct ExpanderConfig {
    /// Random sampling gives up after `attempt_factor * n` draws
    pub attempt_factor: usize,
    /// Spaces up to this size are enumerated instead of sampled
    pub exhaustive_limit: u64,
}

impl Default for ExpanderConfig {
    fn default() -> Self {
        ExpanderConfig {
            attempt_factor: 2,
            exhaustive_limit: 4096,
        }
    }
}

/// Produces distinct variants from spintax text
#[derive(Debug, Clone)]
pub struct SpintaxExpander {
    config: ExpanderConfig,
    filter: Box<dyn TextFilter>,
}

impl Default for SpintaxExpander {
    fn default() -> Self {
        SpintaxExpander::new()
    }
}

impl SpintaxExpander {
    pub fn new() -> Self {
        SpintaxExpander {
            config: ExpanderConfig::default(),
            filter: noop_filter(),
        }
    }

    pub fn with_config(config: ExpanderConfig) -> Self {
        SpintaxExpander {
            config,
            filter: noop_filter(),
        }
    }

    /// Set a filter applied to every variant
    pub fn with_filter(mut self, filter: Box<dyn TextFilter>) -> Self {
        self.filter = filter;
        self
    }

    pub fn config(&self) -> &ExpanderConfig {
        &self.config
    }

    /// Up to `n` distinct variants of `text`.
    ///
    /// Small combination spaces are enumerated and shuffled, so they always
    /// yield `min(n, space)` variants. Larger spaces are sampled and may come
    /// back short when draws keep colliding.
    pub fn expand(&self, text: &SpintaxText, n: usize, rng: &mut dyn RandomSource) -> Vec<String> {
        if n == 0 {
            return Vec::new();
        }
        let space = text.variation_count();

        let variants = if space <= u128::from(self.config.exhaustive_limit) {
            let mut all = text.enumerate();
            shuffle(rng, &mut all);
            let mut collector = UniqueCollector::new(n, all.len());
            for variant in all {
                collector.offer(self.filter.filter(&variant));
            }
            collector.finish()
        } else {
            let budget = self.config.attempt_factor.max(1).saturating_mul(n);
            let mut collector = UniqueCollector::new(n, budget);
            while !collector.is_done() {
                collector.offer(self.filter.filter(&text.resolve(rng)));
            }
            collector.finish()
        };

        debug!(
            requested = n,
            delivered = variants.len(),
            space = %space,
            "expanded spintax"
        );
        variants
    }

    /// Parse `text` and expand it
    pub fn expand_str(&self, text: &str, n: usize, rng: &mut dyn RandomSource) -> Result<Vec<String>> {
        let parsed = SpintaxText::parse(text)?;
        Ok(self.expand(&parsed, n, rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{FixedSequence, SeededRandom};
    use crate::utils::tidy_filter;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_segments() {
        let text = SpintaxText::parse("{Hi|Hello} [name], {thanks|cheers}!").unwrap();
        assert_eq!(
            text.segments(),
            &[
                Segment::Group(vec!["Hi".to_string(), "Hello".to_string()]),
                Segment::Text(" [name], ".to_string()),
                Segment::Group(vec!["thanks".to_string(), "cheers".to_string()]),
                Segment::Text("!".to_string()),
            ]
        );
        assert_eq!(text.group_count(), 2);
    }

    #[test]
    fn test_parse_keeps_empty_options() {
        let text = SpintaxText::parse("team{|s}").unwrap();
        assert_eq!(text.variation_count(), 2);
        let mut rng = FixedSequence::new(vec![0, 1]);
        assert_eq!(text.resolve(&mut rng), "team");
        assert_eq!(text.resolve(&mut rng), "teams");
    }

    #[test]
    fn test_nested_group_rejected() {
        let err = SpintaxText::parse("{a|{b|c}}").unwrap_err();
        match err {
            GenError::MalformedSpintax { position, .. } => assert_eq!(position, 3),
            other => panic!("Expected MalformedSpintax, got {:?}", other),
        }
    }

    #[test]
    fn test_unbalanced_rejected() {
        assert!(matches!(
            SpintaxText::parse("oops}"),
            Err(GenError::MalformedSpintax { position: 4, .. })
        ));
        assert!(matches!(
            SpintaxText::parse("hello {world|there"),
            Err(GenError::MalformedSpintax { position: 6, .. })
        ));
    }

    #[test]
    fn test_variation_count() {
        assert_eq!(count_variations("no groups here").unwrap(), 1);
        assert_eq!(count_variations("{a|b} {c|d|e} {f|g|h|i}").unwrap(), 24);
        assert_eq!(count_variations("").unwrap(), 1);
    }

    #[test]
    fn test_variation_count_saturates() {
        let text = "{a|b|c|d|e|f|g|h|i|j}".repeat(60);
        assert_eq!(count_variations(&text).unwrap(), u128::MAX);
    }

    #[test]
    fn test_enumerate_small_space() {
        let text = SpintaxText::parse("{a|b}{1|2}").unwrap();
        assert_eq!(text.enumerate(), vec!["a1", "a2", "b1", "b2"]);
    }

    #[test]
    fn test_expand_delivers_whole_small_space() {
        let expander = SpintaxExpander::new();
        let mut rng = SeededRandom::new(1);
        let mut variants = expander.expand_str("{x|y|z}", 10, &mut rng).unwrap();
        variants.sort();
        assert_eq!(variants, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_expand_sampling_large_space() {
        let config = ExpanderConfig {
            attempt_factor: 4,
            exhaustive_limit: 0,
        };
        let expander = SpintaxExpander::with_config(config);
        let mut rng = SeededRandom::new(9);
        let text = "{a|b|c|d} {e|f|g|h} {i|j|k|l} {m|n|o|p}";
        let variants = expander.expand_str(text, 5, &mut rng).unwrap();
        assert!(variants.len() <= 5);
        assert!(!variants.is_empty());
        for v in &variants {
            assert!(!v.contains(['{', '}', '|']));
        }
    }

    #[test]
    fn test_expand_zero() {
        let expander = SpintaxExpander::new();
        assert!(expander.expand_str("{a|b}", 0, &mut SeededRandom::new(1)).unwrap().is_empty());
    }

    #[test]
    fn test_expand_with_filter() {
        let expander = SpintaxExpander::new().with_filter(tidy_filter());
        let mut rng = FixedSequence::zeros();
        let variants = expander.expand_str("{|really }great  work .", 1, &mut rng).unwrap();
        assert_eq!(variants.len(), 1);
        assert!(variants[0] == "Great work." || variants[0] == "Really great work.");
    }
}
