//! UTM-tagged campaign links.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::utils::{Result, require_non_empty};

pub const UTM_KEYS: [&str; 5] = [
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
];

/// The five UTM fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UtmParams {
    pub source: String,
    pub medium: String,
    pub campaign: String,
    #[serde(default)]
    pub term: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl UtmParams {
    pub fn new(source: &str, medium: &str, campaign: &str) -> Self {
        UtmParams {
            source: source.to_string(),
            medium: medium.to_string(),
            campaign: campaign.to_string(),
            term: None,
            content: None,
        }
    }

    pub fn term(mut self, term: &str) -> Self {
        self.term = Some(term.to_string());
        self
    }

    pub fn content(mut self, content: &str) -> Self {
        self.content = Some(content.to_string());
        self
    }

    pub fn validate(&self) -> Result<()> {
        require_non_empty("utm_source", &self.source)?;
        require_non_empty("utm_medium", &self.medium)?;
        require_non_empty("utm_campaign", &self.campaign)
    }

    /// Trimmed, lower-cased, spaces replaced by `_`
    pub fn normalized(&self) -> Self {
        let norm = |value: &str| {
            value
                .trim()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join("_")
                .to_lowercase()
        };
        let norm_opt = |value: &Option<String>| {
            value
                .as_deref()
                .map(norm)
                .filter(|v| !v.is_empty())
        };
        UtmParams {
            source: norm(&self.source),
            medium: norm(&self.medium),
            campaign: norm(&self.campaign),
            term: norm_opt(&self.term),
            content: norm_opt(&self.content),
        }
    }

    fn pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = vec![
            (UTM_KEYS[0], self.source.as_str()),
            (UTM_KEYS[1], self.medium.as_str()),
            (UTM_KEYS[2], self.campaign.as_str()),
        ];
        if let Some(term) = self.term.as_deref().filter(|t| !t.trim().is_empty()) {
            pairs.push((UTM_KEYS[3], term));
        }
        if let Some(content) = self.content.as_deref().filter(|c| !c.trim().is_empty()) {
            pairs.push((UTM_KEYS[4], content));
        }
        pairs
    }
}

/// Options for link building
#[derive(Debug, Clone)]
pub struct UtmBuilder {
    /// Normalise values before appending them
    pub normalize: bool,
}

impl Default for UtmBuilder {
    fn default() -> Self {
        UtmBuilder { normalize: true }
    }
}

impl UtmBuilder {
    /// Append UTM parameters to `base`.
    ///
    /// `https://` is assumed when `base` has no scheme. Existing `utm_*`
    /// parameters are replaced; other query parameters are kept in order.
    pub fn build(&self, base: &str, params: &UtmParams) -> Result<String> {
        params.validate()?;
        let params = if self.normalize {
            params.normalized()
        } else {
            params.clone()
        };

        let mut url = parse_lenient(base)?;
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(k, _)| {
                let key: &str = k;
                !UTM_KEYS.contains(&key)
            })
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        {
            let mut query = url.query_pairs_mut();
            query.clear();
            for (k, v) in &kept {
                query.append_pair(k, v);
            }
            for (k, v) in params.pairs() {
                query.append_pair(k, v);
            }
        }
        Ok(url.to_string())
    }
}

fn parse_lenient(base: &str) -> Result<Url> {
    let base = base.trim();
    require_non_empty("url", base)?;
    match Url::parse(base) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => Ok(Url::parse(&format!("https://{}", base))?),
        Err(e) => Err(e.into()),
    }
}

/// Append UTM parameters with the default (normalising) builder
pub fn build_utm_url(base: &str, params: &UtmParams) -> Result<String> {
    UtmBuilder::default().build(base, params)
}

/// Read the UTM parameters back out of a URL
pub fn extract_utm(url: &str) -> Result<UtmParams> {
    let url = parse_lenient(url)?;
    let mut params = UtmParams::default();
    for (k, v) in url.query_pairs() {
        match &*k {
            "utm_source" => params.source = v.into_owned(),
            "utm_medium" => params.medium = v.into_owned(),
            "utm_campaign" => params.campaign = v.into_owned(),
            "utm_term" => params.term = Some(v.into_owned()),
            "utm_content" => params.content = Some(v.into_owned()),
            _ => {}
        }
    }
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::GenError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_build_basic() {
        let params = UtmParams::new("Newsletter", "email", "Spring Launch");
        let url = build_utm_url("https://example.com/pricing", &params).unwrap();
        assert_eq!(
            url,
            "https://example.com/pricing?utm_source=newsletter&utm_medium=email&utm_campaign=spring_launch"
        );
    }

    #[test]
    fn test_build_adds_scheme_and_keeps_query() {
        let params = UtmParams::new("li", "social", "q3").content("hero cta");
        let url = build_utm_url("example.com/?ref=abc&utm_source=old", &params).unwrap();
        assert_eq!(
            url,
            "https://example.com/?ref=abc&utm_source=li&utm_medium=social&utm_campaign=q3&utm_content=hero_cta"
        );
    }

    #[test]
    fn test_build_without_normalizing() {
        let builder = UtmBuilder { normalize: false };
        let params = UtmParams::new("News Letter", "email", "launch");
        let url = builder.build("https://example.com", &params).unwrap();
        assert!(url.contains("utm_source=News+Letter"));
    }

    #[test]
    fn test_missing_required_field() {
        let params = UtmParams::new("", "email", "launch");
        assert!(matches!(
            build_utm_url("https://example.com", &params),
            Err(GenError::Validation(_))
        ));
    }

    #[test]
    fn test_extract_round_trip() {
        let params = UtmParams::new("google", "cpc", "brand").term("cold email");
        let url = build_utm_url("https://example.com", &params).unwrap();
        let back = extract_utm(&url).unwrap();
        assert_eq!(back, params.normalized());
    }
}
