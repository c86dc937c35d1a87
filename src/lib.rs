//! Outreach-Gen expands spintax and generates cold-outreach copy.
//!
//! Text containing `{option|option}` groups and `[placeholder]` tokens flows
//! through a small pipeline: detect placeholders, fill them, optionally wrap
//! known phrases in new groups, then expand distinct variants. Alongside it
//! sit the generators for subject lines, usernames, domains, personas, UTM
//! links, send times and signatures.
//!
//! # Example
//!
//! ```rust
//! use outreach_gen::{FillPolicy, PlaceholderMap, SeededRandom, SpintaxExpander};
//! use outreach_gen::placeholder::substitute;
//!
//! let text = "{Hi|Hello} [first_name], {thanks|cheers}!";
//! let map = PlaceholderMap::new().with("first_name", "Ada");
//! let filled = substitute(text, &map, FillPolicy::Fill);
//!
//! let mut rng = SeededRandom::new(7);
//! let variants = SpintaxExpander::new().expand_str(&filled, 4, &mut rng).unwrap();
//! assert_eq!(variants.len(), 4);
//! assert!(variants.iter().all(|v| v.contains("Ada")));
//! ```

pub mod config;
pub mod domain;
pub mod export;
pub mod person;
pub mod placeholder;
pub mod random;
pub mod signature;
pub mod spintax;
pub mod subject;
pub mod synthesizer;
pub mod templates;
pub mod timezone;
pub mod username;
pub mod utils;
pub mod utm;

pub use config::Config;
pub use placeholder::{FillPolicy, PlaceholderMap, detect_placeholders};
pub use random::{FixedSequence, RandomSource, SeededRandom, ThreadRandom};
pub use spintax::{ExpanderConfig, SpintaxExpander, SpintaxText, count_variations};
pub use synthesizer::{SpintaxSynthesizer, synthesize};
pub use templates::{SpintaxTemplate, TemplateLibrary};
pub use utils::{GenError, Result};
