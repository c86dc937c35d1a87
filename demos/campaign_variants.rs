use outreach_gen::placeholder::substitute;
use outreach_gen::subject::{SubjectRequest, Tone, generate_subjects, score_subject};
use outreach_gen::utils::tidy_filter;
use outreach_gen::utm::{UtmParams, build_utm_url};
use outreach_gen::{FillPolicy, PlaceholderMap, SeededRandom, SpintaxExpander, TemplateLibrary, count_variations};
use std::error::Error;

/// Builds a small cold-email campaign from the built-in templates
fn main() -> Result<(), Box<dyn Error>> {
    let mut rng = SeededRandom::new(2024);
    let library = TemplateLibrary::builtin();

    // Example 1: list what is available
    println!("Templates:");
    for template in library.iter() {
        println!(
            "  {:<16} {:<14} {} variations",
            template.id,
            template.category,
            count_variations(&template.template)?
        );
    }

    // Example 2: fill a template and expand it
    let map = PlaceholderMap::new()
        .with("first_name", "Priya")
        .with("company", "Northwind")
        .with("sender_name", "Alex");
    let expander = SpintaxExpander::new().with_filter(tidy_filter());
    let variants = library.render("cold-intro", &map, FillPolicy::Fill, 3, &expander, &mut rng)?;
    println!("\ncold-intro variants:");
    for (i, variant) in variants.iter().enumerate() {
        println!("--- {} ---\n{}", i + 1, variant);
    }

    // Example 3: ad-hoc spintax with a placeholder left for later
    let text = "{Quick|Short} note for [first_name]: {see|check out} [link]";
    let partly = substitute(text, &PlaceholderMap::new().with("first_name", "Priya"), FillPolicy::Fill);
    println!("\n{}", partly);

    // Example 4: subject lines and a tracked link
    let request = SubjectRequest {
        topic: "deliverability".to_string(),
        company: Some("Northwind".to_string()),
        tone: Tone::Curious,
        count: 3,
        ..Default::default()
    };
    println!("\nSubjects:");
    for subject in generate_subjects(&request, &mut rng)? {
        let analysis = score_subject(&subject);
        println!("  [{:>3}] {}", analysis.spam_score, subject);
    }

    let link = build_utm_url(
        "example.com/demo",
        &UtmParams::new("newsletter", "email", "Spring Launch").content("cta"),
    )?;
    println!("\nTracked link: {}", link);

    Ok(())
}
