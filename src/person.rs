//! Fake prospect personas for testing templates and sequences.

use serde::{Deserialize, Serialize};

use crate::random::{RandomSource, pick};
use crate::utils::{GenError, Result, UniqueCollector};

const FIRST_NAMES: &[&str] = &[
    "Ada", "Alex", "Amara", "Ben", "Chloe", "Daniel", "Elena", "Farah", "Grace", "Hiro", "Isla",
    "Jonas", "Kai", "Leila", "Marco", "Nina", "Omar", "Priya", "Quinn", "Rosa", "Sam", "Tariq",
    "Uma", "Victor", "Wen", "Yusuf", "Zoe",
];

const LAST_NAMES: &[&str] = &[
    "Adams", "Baker", "Chen", "Diaz", "Evans", "Fischer", "Garcia", "Hughes", "Ito", "Jensen",
    "Khan", "Lopez", "Miller", "Nakamura", "Okafor", "Patel", "Rossi", "Schmidt", "Taylor",
    "Usman", "Varga", "Walsh", "Young", "Zimmer",
];

const JOB_TITLES: &[&str] = &[
    "Head of Growth",
    "VP of Sales",
    "Marketing Manager",
    "Founder & CEO",
    "Revenue Operations Lead",
    "Demand Generation Manager",
    "Sales Development Rep",
    "Chief Marketing Officer",
    "Email Marketing Specialist",
    "Account Executive",
];

const COMPANIES: &[&str] = &[
    "Northwind", "Brightpath", "Cobalt Labs", "Lumen Analytics", "Harbor Freight Co", "Quanta",
    "Pinecrest", "Redline Media", "Solstice", "Tidewater", "Vertex Systems", "Willow & Finch",
];

/// One generated persona
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: String,
    pub job_title: String,
    pub company: String,
}

/// Input for persona generation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonRequest {
    pub quantity: usize,
    /// Use this domain for every email instead of one derived from the company
    #[serde(default)]
    pub email_domain: Option<String>,
}

fn company_domain(company: &str) -> String {
    let slug: String = company
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    format!("{}.com", slug)
}

/// Generate up to `quantity` personas with distinct email addresses.
///
/// With a forced `email_domain` the name pools bound how many distinct
/// addresses exist, so large requests can come back short.
pub fn generate_people(request: &PersonRequest, rng: &mut dyn RandomSource) -> Result<Vec<Person>> {
    if request.quantity == 0 {
        return Err(GenError::Validation("quantity must be at least 1".to_string()));
    }
    let forced_domain = request
        .email_domain
        .as_deref()
        .map(|d| d.trim().trim_start_matches('@').to_ascii_lowercase())
        .filter(|d| !d.is_empty());

    let mut collector = UniqueCollector::new(request.quantity, request.quantity.saturating_mul(20));
    let mut people = Vec::new();
    while !collector.is_done() {
        let first = pick(rng, FIRST_NAMES).copied().unwrap_or("Alex");
        let last = pick(rng, LAST_NAMES).copied().unwrap_or("Taylor");
        let company = pick(rng, COMPANIES).copied().unwrap_or("Northwind");
        let title = pick(rng, JOB_TITLES).copied().unwrap_or("Founder & CEO");
        let domain = forced_domain
            .clone()
            .unwrap_or_else(|| company_domain(company));
        let email = format!("{}.{}@{}", first.to_lowercase(), last.to_lowercase(), domain);

        if collector.offer(email.clone()) {
            people.push(Person {
                first_name: first.to_string(),
                last_name: last.to_string(),
                full_name: format!("{} {}", first, last),
                email,
                job_title: title.to_string(),
                company: company.to_string(),
            });
        }
    }
    collector.finish();
    Ok(people)
}
