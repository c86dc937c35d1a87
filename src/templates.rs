use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::placeholder::{FillPolicy, PlaceholderMap, detect_placeholders, substitute};
use crate::random::RandomSource;
use crate::spintax::{SpintaxExpander, SpintaxText};
use crate::utils::{GenError, Result};

/// A named spintax template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpintaxTemplate {
    pub id: String,
    pub name: String,
    pub category: String,
    pub template: String,
    #[serde(default)]
    pub description: String,
}

impl SpintaxTemplate {
    pub fn new(id: &str, name: &str, category: &str, template: &str, description: &str) -> Self {
        SpintaxTemplate {
            id: id.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            template: template.to_string(),
            description: description.to_string(),
        }
    }

    pub fn placeholders(&self) -> Vec<String> {
        detect_placeholders(&self.template)
    }

    pub fn parse(&self) -> Result<SpintaxText> {
        SpintaxText::parse(&self.template)
    }
}

static BUILTIN: Lazy<Vec<SpintaxTemplate>> = Lazy::new(|| {
    vec![
        SpintaxTemplate::new(
            "cold-intro",
            "Cold introduction",
            "cold-outreach",
            "{Hi|Hello|Hey} [first_name],\n\n\
             {I'm reaching out|I wanted to reach out|I'm getting in touch} because \
             [company] {looks like a great fit|seems like a strong match|came up in my research} \
             for [product]. {Would you be open to|Are you open to|Would you be interested in} \
             a {quick|short|brief} {call|chat} next week?\n\n\
             {Best|Cheers|Thanks},\n[sender_name]",
            "First touch to a prospect who has never heard from you.",
        ),
        SpintaxTemplate::new(
            "follow-up",
            "Gentle follow-up",
            "follow-up",
            "{Hi|Hello} [first_name], {just following up|circling back|bumping this up} on my \
             {last|previous} {email|note}. {Any thoughts|Did you get a chance to look}? \
             {Thanks|Appreciate it},\n[sender_name]",
            "Second touch, a few days after the introduction.",
        ),
        SpintaxTemplate::new(
            "meeting-request",
            "Meeting request",
            "meeting",
            "{Hi|Hello} [first_name], {do you have|could you spare} {15|20} minutes \
             {this week|next week} to {talk about|discuss} how [company] {handles|manages} \
             [topic]? {Let me know|Tell me} what {works|suits you}.\n[sender_name]",
            "Asks for a short call with a concrete time box.",
        ),
        SpintaxTemplate::new(
            "breakup",
            "Break-up email",
            "follow-up",
            "{Hi|Hey} [first_name], {I haven't heard back|I didn't hear back}, so I'll \
             {assume|take it} [topic] {isn't a priority|isn't on your radar} right now. \
             {If that changes|Should that change}, {just reply|reply here} and I'll \
             {pick it up|follow up}.\n[sender_name]",
            "Last message in a sequence; closes the loop politely.",
        ),
        SpintaxTemplate::new(
            "referral",
            "Referral ask",
            "cold-outreach",
            "{Hi|Hello} [first_name], {could you point me to|who would be} the {right person|best contact} \
             at [company] for [topic]? {Thanks in advance|Much appreciated}.\n[sender_name]",
            "Asks a contact to route you to the decision maker.",
        ),
        SpintaxTemplate::new(
            "case-study",
            "Case study share",
            "nurture",
            "{Hi|Hello} [first_name], {we recently helped|we just worked with} a team like \
             [company] {improve|boost|increase} [metric] by [result]. {Happy to share|I can send over} \
             the {details|case study} if {useful|helpful}.\n[sender_name]",
            "Shares proof from a similar customer.",
        ),
    ]
});

/// A collection of spintax templates
#[derive(Debug, Clone, Default)]
pub struct TemplateLibrary {
    templates: Vec<SpintaxTemplate>,
}

impl TemplateLibrary {
    /// The templates shipped with the crate
    pub fn builtin() -> Self {
        TemplateLibrary {
            templates: BUILTIN.clone(),
        }
    }

    pub fn from_templates(templates: Vec<SpintaxTemplate>) -> Result<Self> {
        for template in &templates {
            if template.id.trim().is_empty() {
                return Err(GenError::Validation("template id is required".to_string()));
            }
            template.parse()?;
        }
        Ok(TemplateLibrary { templates })
    }

    /// Load a JSON array of templates
    pub fn from_json_str(json: &str) -> Result<Self> {
        let templates: Vec<SpintaxTemplate> = serde_json::from_str(json)?;
        Self::from_templates(templates)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.templates)?)
    }

    pub fn get(&self, id: &str) -> Option<&SpintaxTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn by_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a SpintaxTemplate> {
        self.templates.iter().filter(move |t| t.category == category)
    }

    /// Distinct categories, sorted
    pub fn categories(&self) -> Vec<&str> {
        self.templates
            .iter()
            .map(|t| t.category.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpintaxTemplate> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Fill a template's placeholders, then expand `n` variants
    pub fn render(
        &self,
        id: &str,
        map: &PlaceholderMap,
        policy: FillPolicy,
        n: usize,
        expander: &SpintaxExpander,
        rng: &mut dyn RandomSource,
    ) -> Result<Vec<String>> {
        let template = self
            .get(id)
            .ok_or_else(|| GenError::UnknownTemplate(id.to_string()))?;
        let filled = substitute(&template.template, map, policy);
        expander.expand_str(&filled, n, rng)
    }
}

/// Plain-text dump of a template and its generated variants
pub fn to_text_report(template: &SpintaxTemplate, variants: &[String]) -> String {
    let mut report = format!("{} ({})\n", template.name, template.category);
    if !template.description.is_empty() {
        report.push_str(&template.description);
        report.push('\n');
    }
    report.push_str(&"=".repeat(40));
    report.push('\n');
    for (i, variant) in variants.iter().enumerate() {
        report.push_str(&format!("\n--- Variant {} ---\n{}\n", i + 1, variant));
    }
    report
}
