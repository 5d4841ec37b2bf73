//! SEO article pipeline
//!
//! Five stages run in a fixed order: research, analysis, outline, drafting
//! and optimization. Each stage sees the outputs of every stage before it.

pub mod builder;
pub mod generator;
pub mod stage;

// Re-export commonly used types
pub use builder::{build_stage_graph, seo_guidelines};
pub use generator::{AnalyticsReport, BlogGenerator, RunResult, SavedFiles, PIPELINE_ID};
pub use stage::{Persona, Stage};
