//! CLI argument parsing for the blog generator

use crate::{
    config::DEFAULT_CONFIG_FILE,
    input::{Intent, Tone},
    prompts::DEFAULT_PROMPTS_FILE,
};
use blog_generator_sdk::Inputs;
use clap::{ArgAction, Parser};
use serde_json::json;
use std::path::PathBuf;

/// Topic used in flag mode when `--topic` is not given
pub const DEFAULT_TOPIC: &str = "Case Vacanza in Costiera Amalfitana 2025";
pub const DEFAULT_LOG_FILE: &str = "blog_generator.log";

/// SEO Blog Generator CLI Arguments
#[derive(Parser, Debug, Clone)]
#[command(
    name = "blog-generator",
    version,
    about = "Generate SEO-optimized blog articles: research → analysis → outline → drafting → optimization"
)]
pub struct Args {
    /// Article topic
    #[arg(short, long)]
    pub topic: Option<String>,

    /// Purpose of the article
    #[arg(long, value_enum)]
    pub intent: Option<Intent>,

    /// Website the article is written for
    #[arg(long)]
    pub website: Option<String>,

    /// Business activity or service to promote
    #[arg(long)]
    pub business: Option<String>,

    /// Target audience
    #[arg(long)]
    pub audience: Option<String>,

    /// Tone of voice
    #[arg(long, value_enum)]
    pub tone: Option<Tone>,

    /// Article language code (e.g. it, en)
    #[arg(long)]
    pub language: Option<String>,

    /// Target word count
    #[arg(short, long)]
    pub words: Option<u32>,

    /// Leave out the call to action
    #[arg(long)]
    pub no_cta: bool,

    /// Skip SEO targets in the drafting and optimization prompts
    #[arg(long)]
    pub no_seo: bool,

    /// Ask for every field interactively
    #[arg(short, long, conflicts_with = "input_file")]
    pub interactive: bool,

    /// YAML or JSON file with the full input
    #[arg(long)]
    pub input_file: Option<PathBuf>,

    /// Write an input template and exit
    #[arg(long)]
    pub generate_template: bool,

    /// Save the article to a file (`--save false` prints it instead)
    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = true,
        default_missing_value = "true"
    )]
    pub save: bool,

    /// Directory for every output file
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Prompt templates file
    #[arg(long, default_value = DEFAULT_PROMPTS_FILE)]
    pub prompts: PathBuf,

    /// Log file
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,
}

impl Args {
    /// Input fields given on the command line
    ///
    /// Flags that were not passed are left out so the input defaults apply.
    /// A missing topic becomes [`DEFAULT_TOPIC`].
    pub fn to_fields(&self) -> Inputs {
        let mut fields = Inputs::new();
        fields.insert(
            "topic".to_string(),
            json!(self.topic.as_deref().unwrap_or(DEFAULT_TOPIC)),
        );

        let mut set = |key: &str, value: serde_json::Value| {
            fields.insert(key.to_string(), value);
        };
        if let Some(intent) = self.intent {
            set("intent", json!(intent.as_str()));
        }
        if let Some(website) = &self.website {
            set("target_website", json!(website));
        }
        if let Some(business) = &self.business {
            set("business_activity", json!(business));
        }
        if let Some(audience) = &self.audience {
            set("target_audience", json!(audience));
        }
        if let Some(tone) = self.tone {
            set("tone", json!(tone.as_str()));
        }
        if let Some(language) = &self.language {
            set("language", json!(language));
        }
        if let Some(words) = self.words {
            set("word_count", json!(words));
        }
        if self.no_cta {
            set("include_cta", json!(false));
        }
        if self.no_seo {
            set("seo_focus", json!(false));
        }

        fields
    }
}
