use clap::{Parser, Subcommand, ValueEnum};
use outreach_gen::config::Config;
use outreach_gen::domain::{DomainRequest, generate_domains};
use outreach_gen::export::{CsvTable, write_file};
use outreach_gen::person::{PersonRequest, generate_people};
use outreach_gen::placeholder::{FillPolicy, PlaceholderMap, detect_placeholders, substitute};
use outreach_gen::signature::{SignatureDetails, SignatureStyle, render_html, render_text};
use outreach_gen::spintax::{SpintaxExpander, count_variations};
use outreach_gen::subject::{SubjectAnalysis, SubjectRequest, Tone, generate_subjects, score_subject};
use outreach_gen::synthesizer::synthesize;
use outreach_gen::templates::{TemplateLibrary, to_text_report};
use outreach_gen::timezone::{SendTimeCalculator, convert_named, find_zone, recommended_windows};
use outreach_gen::username::{UsernameRequest, generate_usernames};
use outreach_gen::utils::filter_by_name;
use outreach_gen::utm::{UtmBuilder, UtmParams};
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Spintax expansion and cold-outreach copy generators
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed for reproducible output
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Write output to a file instead of stdout (.csv files get CSV)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand spintax into distinct variants
    Spin {
        /// Spintax text, or @path to read it from a file
        text: String,
        /// Number of variants
        #[arg(short = 'n', long)]
        count: Option<usize>,
        /// Fill a placeholder before expanding (name=value)
        #[arg(long = "set", value_parser = parse_assignment)]
        values: Vec<(String, String)>,
        /// Post-processing filter: noop, whitespace, sentence_case, tidy
        #[arg(long, default_value = "noop")]
        filter: String,
    },
    /// Count the variants a spintax text can produce
    Count {
        /// Spintax text, or @path
        text: String,
    },
    /// List the [placeholders] in a text
    Placeholders {
        /// Text, or @path
        text: String,
    },
    /// Replace placeholders with values
    Fill {
        /// Text, or @path
        text: String,
        /// Placeholder value (name=value)
        #[arg(long = "set", value_parser = parse_assignment)]
        values: Vec<(String, String)>,
        /// Leave every placeholder as it is
        #[arg(long)]
        skip: bool,
    },
    /// Wrap known phrases in spintax groups
    Synth {
        /// Plain text, or @path
        text: String,
        /// Also print this many expanded variants
        #[arg(long)]
        expand: Option<usize>,
    },
    /// List spintax templates
    Templates {
        /// Template library (JSON) instead of the built-in one
        #[arg(long)]
        library: Option<PathBuf>,
        /// Only this category
        #[arg(long)]
        category: Option<String>,
    },
    /// Generate variants from a template
    Template {
        /// Template id
        id: String,
        #[arg(long)]
        library: Option<PathBuf>,
        #[arg(long = "set", value_parser = parse_assignment)]
        values: Vec<(String, String)>,
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },
    /// Generate subject lines with spam scores
    Subjects {
        #[arg(long)]
        topic: String,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long, value_enum, default_value = "professional")]
        tone: ToneArg,
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },
    /// Score subject lines for spam triggers
    Score {
        #[arg(required = true)]
        subjects: Vec<String>,
    },
    /// Generate usernames
    Usernames {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        keyword: Option<String>,
        /// Never append numbers
        #[arg(long)]
        no_numbers: bool,
        /// Separator to use; repeat for several, "" for none
        #[arg(long = "separator")]
        separators: Vec<String>,
        #[arg(long, default_value_t = 4)]
        min_length: usize,
        #[arg(long, default_value_t = 20)]
        max_length: usize,
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },
    /// Generate domain names around a keyword
    Domains {
        keyword: String,
        /// Extension; repeat for several
        #[arg(long = "ext", default_values_t = [".com".to_string()])]
        extensions: Vec<String>,
        #[arg(long)]
        no_prefixes: bool,
        #[arg(long)]
        no_suffixes: bool,
        #[arg(long, default_value_t = 3)]
        min_length: usize,
        #[arg(long, default_value_t = 20)]
        max_length: usize,
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },
    /// Generate fake prospect personas
    People {
        #[arg(short = 'n', long)]
        count: Option<usize>,
        /// Email domain for every persona
        #[arg(long)]
        email_domain: Option<String>,
    },
    /// Build a UTM-tagged link
    Utm {
        url: String,
        #[arg(long)]
        source: String,
        #[arg(long)]
        medium: String,
        #[arg(long)]
        campaign: String,
        #[arg(long)]
        term: Option<String>,
        #[arg(long)]
        content: Option<String>,
        /// Keep values exactly as given
        #[arg(long)]
        raw: bool,
    },
    /// Convert a time between zones
    Convert {
        time: String,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },
    /// When to send so mail lands at a local time for each recipient zone
    SendTime {
        /// Sender's zone
        #[arg(long)]
        sender: String,
        /// Recipient zone; repeat for several
        #[arg(long = "to", required = true)]
        recipients: Vec<String>,
        /// Recipient-local arrival time
        #[arg(long, default_value = "10:00")]
        at: String,
    },
    /// Render an email signature
    Signature {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        website: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long, value_enum, default_value = "professional")]
        style: StyleArg,
        /// Plain text instead of HTML
        #[arg(long)]
        text: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ToneArg {
    Professional,
    Casual,
    Urgent,
    Curious,
}

impl From<ToneArg> for Tone {
    fn from(arg: ToneArg) -> Self {
        match arg {
            ToneArg::Professional => Tone::Professional,
            ToneArg::Casual => Tone::Casual,
            ToneArg::Urgent => Tone::Urgent,
            ToneArg::Curious => Tone::Curious,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum StyleArg {
    Minimal,
    Professional,
    Modern,
}

impl From<StyleArg> for SignatureStyle {
    fn from(arg: StyleArg) -> Self {
        match arg {
            StyleArg::Minimal => SignatureStyle::Minimal,
            StyleArg::Professional => SignatureStyle::Professional,
            StyleArg::Modern => SignatureStyle::Modern,
        }
    }
}

fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{}'", s))?;
    if key.trim().is_empty() {
        return Err(format!("missing placeholder name in '{}'", s));
    }
    Ok((key.trim().to_string(), value.to_string()))
}

/// `@path` reads the text from a file
fn read_text(arg: &str) -> Result<String, Box<dyn Error>> {
    match arg.strip_prefix('@') {
        Some(path) => Ok(fs::read_to_string(path)?),
        None => Ok(arg.to_string()),
    }
}

fn placeholder_map(values: &[(String, String)]) -> PlaceholderMap {
    let mut map = PlaceholderMap::new();
    for (key, value) in values {
        map.insert(key, value);
    }
    map
}

fn load_library(path: Option<&PathBuf>) -> Result<TemplateLibrary, Box<dyn Error>> {
    Ok(match path {
        Some(path) => TemplateLibrary::from_json_file(path)?,
        None => TemplateLibrary::builtin(),
    })
}

fn numbered(items: &[String]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item))
        .collect::<Vec<_>>()
        .join("\n")
}

fn analyses_text(analyses: &[SubjectAnalysis]) -> String {
    analyses
        .iter()
        .map(|a| {
            let mut line = format!("[{:>3} {:<4}] {}", a.spam_score, a.rating.as_str(), a.subject);
            if !a.issues.is_empty() {
                line.push_str(&format!("\n           {}", a.issues.join("; ")));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// What a command produced: always text, sometimes a table for .csv output
struct Output {
    text: String,
    table: Option<CsvTable>,
}

impl Output {
    fn text(text: String) -> Self {
        Output { text, table: None }
    }

    fn with_table(text: String, table: CsvTable) -> Self {
        Output {
            text,
            table: Some(table),
        }
    }
}

fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = Config::load(cli.config.as_deref())?;
    init_logging(&config.log_filter);
    info!(seed = ?cli.seed.or(config.seed), "configuration loaded");

    let mut rng = config.random_source(cli.seed);
    let default_count = config.default_count;

    let output = match cli.command {
        Commands::Spin {
            text,
            count,
            values,
            filter,
        } => {
            let filter = filter_by_name(&filter).ok_or_else(|| format!("unknown filter '{}'", filter))?;
            let text = substitute(&read_text(&text)?, &placeholder_map(&values), FillPolicy::Fill);
            let expander = SpintaxExpander::with_config(config.expander_config()).with_filter(filter);
            let variants = expander.expand_str(&text, count.unwrap_or(default_count), rng.as_mut())?;
            Output::with_table(numbered(&variants), CsvTable::single_column("variant", &variants))
        }
        Commands::Count { text } => {
            let count = count_variations(&read_text(&text)?)?;
            Output::text(count.to_string())
        }
        Commands::Placeholders { text } => {
            let tokens = detect_placeholders(&read_text(&text)?);
            Output::with_table(tokens.join("\n"), CsvTable::single_column("placeholder", &tokens))
        }
        Commands::Fill { text, values, skip } => {
            let policy = if skip { FillPolicy::Skip } else { FillPolicy::Fill };
            Output::text(substitute(&read_text(&text)?, &placeholder_map(&values), policy))
        }
        Commands::Synth { text, expand } => {
            let spun = synthesize(&read_text(&text)?);
            let mut out = spun.clone();
            if let Some(n) = expand {
                let expander = SpintaxExpander::with_config(config.expander_config());
                let variants = expander.expand_str(&spun, n, rng.as_mut())?;
                out.push_str(&format!(
                    "\n\n{} variations possible\n{}",
                    count_variations(&spun)?,
                    numbered(&variants)
                ));
            }
            Output::text(out)
        }
        Commands::Templates { library, category } => {
            let library = load_library(library.as_ref())?;
            let mut lines = Vec::new();
            let mut table = CsvTable::new(&["id", "name", "category", "variations", "description"]);
            for template in library.iter() {
                if category.as_deref().is_some_and(|c| c != template.category) {
                    continue;
                }
                let variations = count_variations(&template.template)?;
                lines.push(format!(
                    "{:<16} {:<20} {:<14} {:>8}  {}",
                    template.id, template.name, template.category, variations, template.description
                ));
                table.push_row(vec![
                    template.id.clone(),
                    template.name.clone(),
                    template.category.clone(),
                    variations.to_string(),
                    template.description.clone(),
                ]);
            }
            Output::with_table(lines.join("\n"), table)
        }
        Commands::Template {
            id,
            library,
            values,
            count,
        } => {
            let library = load_library(library.as_ref())?;
            let map = placeholder_map(&values);
            let expander = SpintaxExpander::with_config(config.expander_config());
            let n = count.unwrap_or(default_count);
            let variants = library.render(&id, &map, FillPolicy::Fill, n, &expander, rng.as_mut())?;
            let template = library
                .get(&id)
                .ok_or_else(|| format!("unknown template '{}'", id))?;
            Output::text(to_text_report(template, &variants))
        }
        Commands::Subjects {
            topic,
            company,
            first_name,
            tone,
            count,
        } => {
            let request = SubjectRequest {
                topic,
                company,
                first_name,
                tone: tone.into(),
                count: count.unwrap_or(default_count),
            };
            let analyses: Vec<SubjectAnalysis> = generate_subjects(&request, rng.as_mut())?
                .iter()
                .map(|s| score_subject(s))
                .collect();
            Output::with_table(analyses_text(&analyses), CsvTable::from_records(&analyses))
        }
        Commands::Score { subjects } => {
            let analyses: Vec<SubjectAnalysis> = subjects.iter().map(|s| score_subject(s)).collect();
            Output::with_table(analyses_text(&analyses), CsvTable::from_records(&analyses))
        }
        Commands::Usernames {
            first_name,
            last_name,
            keyword,
            no_numbers,
            separators,
            min_length,
            max_length,
            count,
        } => {
            let mut request = UsernameRequest {
                first_name: first_name.unwrap_or_default(),
                last_name: last_name.unwrap_or_default(),
                keyword: keyword.unwrap_or_default(),
                include_numbers: !no_numbers,
                min_length,
                max_length,
                quantity: count.unwrap_or(default_count),
                ..Default::default()
            };
            if !separators.is_empty() {
                request.separators = separators;
            }
            let usernames = generate_usernames(&request, rng.as_mut())?;
            Output::with_table(usernames.join("\n"), CsvTable::single_column("username", &usernames))
        }
        Commands::Domains {
            keyword,
            extensions,
            no_prefixes,
            no_suffixes,
            min_length,
            max_length,
            count,
        } => {
            let request = DomainRequest {
                keyword,
                extensions,
                quantity: count.unwrap_or(default_count),
                use_prefixes: !no_prefixes,
                use_suffixes: !no_suffixes,
                min_length,
                max_length,
            };
            let domains = generate_domains(&request, rng.as_mut())?;
            Output::with_table(domains.join("\n"), CsvTable::single_column("domain", &domains))
        }
        Commands::People {
            count,
            email_domain,
        } => {
            let request = PersonRequest {
                quantity: count.unwrap_or(default_count),
                email_domain,
            };
            let people = generate_people(&request, rng.as_mut())?;
            let text = people
                .iter()
                .map(|p| format!("{} <{}>, {} at {}", p.full_name, p.email, p.job_title, p.company))
                .collect::<Vec<_>>()
                .join("\n");
            Output::with_table(text, CsvTable::from_records(&people))
        }
        Commands::Utm {
            url,
            source,
            medium,
            campaign,
            term,
            content,
            raw,
        } => {
            let params = UtmParams {
                source,
                medium,
                campaign,
                term,
                content,
            };
            let builder = UtmBuilder { normalize: !raw };
            Output::text(builder.build(&url, &params)?)
        }
        Commands::Convert { time, from, to } => {
            let converted = convert_named(&time, &from, &to)?;
            let day = match converted.day_offset {
                0 => String::new(),
                d if d > 0 => format!(" (+{} day)", d),
                d => format!(" ({} day)", d),
            };
            Output::text(format!(
                "{} {} = {} ({}) {}{}",
                time.trim(),
                find_zone(&from)?.id,
                converted.time,
                converted.time.to_12h(),
                find_zone(&to)?.id,
                day
            ))
        }
        Commands::SendTime {
            sender,
            recipients,
            at,
        } => {
            let calculator = SendTimeCalculator::for_zone(&sender)?;
            let names: Vec<&str> = recipients.iter().map(String::as_str).collect();
            let slots = calculator.schedule_named(&names, &at)?;
            let mut lines: Vec<String> = slots
                .iter()
                .map(|slot| {
                    format!(
                        "{:<20} {} local -> send at {} {}{}{}",
                        slot.recipient_zone,
                        slot.recipient_local,
                        slot.sender_local,
                        calculator.sender().abbreviation,
                        if slot.day_offset != 0 {
                            format!(" (day {:+})", slot.day_offset)
                        } else {
                            String::new()
                        },
                        if slot.business_hours { "" } else { " [outside your business hours]" }
                    )
                })
                .collect();
            lines.push(String::new());
            lines.push("Recommended recipient-local windows:".to_string());
            for window in recommended_windows() {
                lines.push(format!(
                    "  {:<8} {}-{}  {}",
                    window.days, window.start, window.end, window.note
                ));
            }
            Output::text(lines.join("\n"))
        }
        Commands::Signature {
            name,
            email,
            title,
            company,
            phone,
            website,
            color,
            style,
            text,
        } => {
            let mut details = SignatureDetails {
                full_name: name,
                email,
                job_title: title.unwrap_or_default(),
                company: company.unwrap_or_default(),
                phone: phone.unwrap_or_default(),
                website: website.unwrap_or_default(),
                ..Default::default()
            };
            if let Some(color) = color {
                details.accent_color = color;
            }
            let rendered = if text {
                render_text(&details)?
            } else {
                render_html(&details, style.into())?
            };
            Output::text(rendered)
        }
    };

    match cli.output {
        Some(path) => {
            let is_csv = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            let contents = match (&output.table, is_csv) {
                (Some(table), true) => table.to_csv(),
                _ => output.text,
            };
            write_file(&path, &contents)?;
            println!("Wrote {}", path.display());
        }
        None => println!("{}", output.text),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("first_name=Ada").unwrap(),
            ("first_name".to_string(), "Ada".to_string())
        );
        assert_eq!(
            parse_assignment(" topic =a=b").unwrap(),
            ("topic".to_string(), "a=b".to_string())
        );
        assert!(parse_assignment("=v").is_err());
        assert!(parse_assignment("no_equals").is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
