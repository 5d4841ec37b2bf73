//! SEO blog generator
//!
//! A five-stage LLM pipeline (research, analysis, outline, drafting,
//! optimization) that turns a [`input::BlogInput`] into a Markdown article.
//! Stage execution is delegated to an [`blog_generator_sdk::ExecutionEngine`];
//! [`engine::SequentialEngine`] is the default one.

// Stage artifact helpers
pub mod artifact;

// Command-line interface
pub mod cli;

// YAML configuration
pub mod config;

// Sequential execution engine
pub mod engine;

// Error types
pub mod error;

// Article request model
pub mod input;

// Interactive input
pub mod interactive;

// Chat model client
pub mod llm;

// Tracing setup
pub mod logging;

// Output files
pub mod persistence;

// Stage pipeline and orchestration
pub mod pipeline;

// Prompt templates
pub mod prompts;

// Web search tool
pub mod search;

// Re-export commonly used types
pub use config::GeneratorConfig;
pub use error::{GeneratorError, Result};
pub use input::{BlogInput, Intent, Tone};
pub use pipeline::{AnalyticsReport, BlogGenerator, RunResult, SavedFiles, Stage};
pub use prompts::PromptSet;
