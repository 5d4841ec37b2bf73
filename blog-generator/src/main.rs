/*
┌─────────────────────────────────────────────────────────────────────────────┐
│                          SEO BLOG GENERATOR                                  │
└─────────────────────────────────────────────────────────────────────────────┘

  Stage 1: RESEARCH       web search (Tavily) → facts, sources, keywords
         ↓
  Stage 2: ANALYSIS       research → strategic recommendations
         ↓
  Stage 3: OUTLINE        research + analysis → article structure
         ↓
  Stage 4: DRAFTING       all of the above → Markdown draft
         ↓
  Stage 5: OPTIMIZATION   all of the above → final article

  Output: blog_<topic>_<timestamp>.md
          blog_<topic>_<timestamp>_analytics.json     (output.generate_analytics)
          intermediate_<stage>_<topic>_<timestamp>.json (output.save_intermediate)

EXAMPLE COMMANDS:

  # Flag mode
  cargo run -- --topic "Local SEO Basics" --intent informativo --words 1500

  # Interactive mode
  cargo run -- --interactive

  # From an input file
  cargo run -- --generate-template
  cargo run -- --input-file input_template.yaml --output-dir articles

  # Print instead of saving
  cargo run -- --topic "Local SEO Basics" --save false

Requires OPENROUTER_API_KEY and TAVILY_API_KEY (a .env file is read).
*/

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;

use blog_generator::{
    artifact::final_text,
    cli::Args,
    engine::SequentialEngine,
    input::DEFAULT_TEMPLATE_FILE,
    interactive,
    llm::{OpenRouterClient, ProviderSettings},
    logging,
    persistence::ResultWriter,
    search::{SearchTool, TavilySearch},
    BlogGenerator, BlogInput, GeneratorConfig, PromptSet,
};
use blog_generator_sdk::{log_elapsed, log_file_saved, log_info, log_warning};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    logging::init(&args.log_file)?;

    if args.generate_template {
        let path = args.output_dir.join(DEFAULT_TEMPLATE_FILE);
        BlogInput::save_template(&path).await?;
        log_file_saved!(path.display());
        return Ok(());
    }

    let config = GeneratorConfig::load(&args.config);
    let prompts = PromptSet::load(&args.prompts).context("Cannot start without prompt templates")?;

    let blog_input = if args.interactive {
        interactive::input_interactive()?
    } else if let Some(path) = &args.input_file {
        BlogInput::from_file(path).await?
    } else {
        BlogInput::from_fields(args.to_fields())?
    };

    let settings = ProviderSettings::from_env()?;
    let model = Arc::new(OpenRouterClient::new(settings));
    let search = Arc::new(SearchTool::new(Arc::new(TavilySearch::from_env()?)));
    let generator = BlogGenerator::new(
        config,
        prompts,
        Arc::new(SequentialEngine::new(model)),
        search,
    );

    log_info!("Generating article: {}", blog_input.topic);
    tracing::info!(topic = %blog_input.topic, "Starting generation");

    let interrupted = || {
        tracing::warn!("Run interrupted by user");
        log_warning!("Interrupted, nothing was saved");
    };

    let result = if args.save {
        let writer = ResultWriter::new(&args.output_dir, generator.config().output_config());
        let (result, saved) = tokio::select! {
            outcome = generator.run_and_save(&blog_input, &writer) => outcome?,
            _ = tokio::signal::ctrl_c() => {
                interrupted();
                return Ok(());
            }
        };
        for path in &saved.intermediate {
            log_file_saved!(path.display());
        }
        log_file_saved!(saved.article.display());
        if let Some(analytics_path) = &saved.analytics {
            log_file_saved!(analytics_path.display());
        }
        result
    } else {
        let result = tokio::select! {
            result = generator.run(&blog_input) => result?,
            _ = tokio::signal::ctrl_c() => {
                interrupted();
                return Ok(());
            }
        };
        println!("\n{}", "=".repeat(50));
        println!("FINAL RESULT:");
        println!("{}", "=".repeat(50));
        println!("{}", final_text(&result.result));
        result
    };

    log_elapsed!(result.execution_time);
    Ok(())
}
