//! Domain-name generation around a keyword.

use serde::{Deserialize, Serialize};

use crate::random::{RandomSource, shuffle};
use crate::utils::{GenError, Result, UniqueCollector, require_non_empty};

pub const PREFIXES: &[&str] = &["get", "try", "use", "go", "my", "the", "join", "hello"];
pub const SUFFIXES: &[&str] = &["hq", "app", "hub", "labs", "mail", "send", "now", "ly"];

/// Input for domain generation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainRequest {
    pub keyword: String,
    pub extensions: Vec<String>,
    pub quantity: usize,
    pub use_prefixes: bool,
    pub use_suffixes: bool,
    /// Length bounds for the name label, extension excluded
    pub min_length: usize,
    pub max_length: usize,
}

impl Default for DomainRequest {
    fn default() -> Self {
        DomainRequest {
            keyword: String::new(),
            extensions: vec![".com".to_string()],
            quantity: 10,
            use_prefixes: true,
            use_suffixes: true,
            min_length: 3,
            max_length: 20,
        }
    }
}

/// Lower-case `[a-z0-9-]`, no leading or trailing hyphen
fn sanitize_label(keyword: &str) -> String {
    let label: String = keyword
        .trim()
        .chars()
        .filter_map(|c| {
            if c.is_ascii_alphanumeric() {
                Some(c.to_ascii_lowercase())
            } else if c == '-' {
                Some('-')
            } else {
                None
            }
        })
        .collect();
    label.trim_matches('-').to_string()
}

fn normalize_extension(ext: &str) -> Option<String> {
    let ext = ext.trim().trim_start_matches('.').to_ascii_lowercase();
    if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric() || c == '.') {
        return None;
    }
    Some(format!(".{}", ext))
}

/// Generate up to `quantity` distinct domains.
///
/// The bare keyword comes first, once per extension in the given order.
/// Prefixed and suffixed names follow in random order.
pub fn generate_domains(request: &DomainRequest, rng: &mut dyn RandomSource) -> Result<Vec<String>> {
    require_non_empty("keyword", &request.keyword)?;
    let label = sanitize_label(&request.keyword);
    if label.is_empty() {
        return Err(GenError::Validation(format!(
            "keyword '{}' has no usable characters",
            request.keyword
        )));
    }
    if request.min_length > request.max_length {
        return Err(GenError::Validation(format!(
            "invalid length range {}..={}",
            request.min_length, request.max_length
        )));
    }
    let extensions = request
        .extensions
        .iter()
        .map(|ext| {
            normalize_extension(ext)
                .ok_or_else(|| GenError::Validation(format!("invalid extension '{}'", ext)))
        })
        .collect::<Result<Vec<_>>>()?;
    if extensions.is_empty() {
        return Err(GenError::Validation("at least one extension is required".to_string()));
    }

    let mut modified = Vec::new();
    if request.use_prefixes {
        modified.extend(PREFIXES.iter().map(|p| format!("{}{}", p, label)));
    }
    if request.use_suffixes {
        modified.extend(SUFFIXES.iter().map(|s| format!("{}{}", label, s)));
    }
    if request.use_prefixes && request.use_suffixes {
        for p in PREFIXES {
            modified.extend(SUFFIXES.iter().map(|s| format!("{}{}{}", p, label, s)));
        }
    }

    let mut candidates: Vec<(String, &str)> = Vec::new();
    for ext in &extensions {
        candidates.push((label.clone(), ext.as_str()));
    }
    let mut crossed: Vec<(String, &str)> = modified
        .into_iter()
        .flat_map(|name| extensions.iter().map(move |ext| (name.clone(), ext.as_str())))
        .collect();
    shuffle(rng, &mut crossed);
    candidates.extend(crossed);

    let range = request.min_length..=request.max_length;
    let mut collector = UniqueCollector::new(request.quantity, candidates.len());
    for (name, ext) in candidates {
        if !range.contains(&name.chars().count()) {
            continue;
        }
        collector.offer(format!("{}{}", name, ext));
        if collector.is_done() {
            break;
        }
    }
    Ok(collector.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SeededRandom;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize_label("  My Launch! "), "mylaunch");
        assert_eq!(sanitize_label("-send-fast-"), "send-fast");
        assert_eq!(normalize_extension("IO"), Some(".io".to_string()));
        assert_eq!(normalize_extension(".co.uk"), Some(".co.uk".to_string()));
        assert_eq!(normalize_extension("c m"), None);
    }

    #[test]
    fn test_bare_keyword_only() {
        let request = DomainRequest {
            keyword: "launch".to_string(),
            extensions: vec![".com".to_string(), ".io".to_string()],
            quantity: 5,
            use_prefixes: false,
            use_suffixes: false,
            ..Default::default()
        };
        let domains = generate_domains(&request, &mut SeededRandom::new(1)).unwrap();
        assert_eq!(domains, vec!["launch.com", "launch.io"]);
    }

    #[test]
    fn test_modifiers_respect_quantity_and_length() {
        let request = DomainRequest {
            keyword: "inbox".to_string(),
            extensions: vec!["com".to_string()],
            quantity: 12,
            min_length: 5,
            max_length: 9,
            ..Default::default()
        };
        let domains = generate_domains(&request, &mut SeededRandom::new(2)).unwrap();
        assert_eq!(domains.len(), 12);
        assert_eq!(domains[0], "inbox.com");
        for domain in &domains {
            let name = domain.trim_end_matches(".com");
            assert!((5..=9).contains(&name.len()), "{}", domain);
        }
    }

    #[test]
    fn test_validation() {
        let empty = DomainRequest::default();
        assert!(generate_domains(&empty, &mut SeededRandom::new(1)).is_err());

        let no_ext = DomainRequest {
            keyword: "launch".to_string(),
            extensions: vec![],
            ..Default::default()
        };
        assert!(generate_domains(&no_ext, &mut SeededRandom::new(1)).is_err());
    }
}
