//! Run orchestration: validate, build the graph, execute once, report
//!
//! The entry point is [`BlogGenerator::run`]. It hands the whole stage graph
//! to the configured [`ExecutionEngine`] in a single call and blocks until
//! every stage has finished.

use anyhow::{Context, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::PathBuf, sync::Arc, time::Instant};

use blog_generator_sdk::{
    log_run_complete, log_run_failed, log_run_start, ExecutionEngine, RunHandle, StageOutput,
    Tool,
};

use crate::{
    config::{GeneratorConfig, SeoConfig},
    error::GeneratorError,
    input::BlogInput,
    persistence::ResultWriter,
    pipeline::{build_stage_graph, Stage},
    prompts::PromptSet,
};

pub const PIPELINE_ID: &str = "seo_blog";
pub const STATUS_COMPLETED: &str = "completed";

/// Summary of a completed run, written next to the article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    /// RFC 3339 local time
    pub timestamp: String,
    pub input_config: BlogInput,
    pub execution_time_seconds: f64,
    pub models_used: BTreeMap<String, String>,
    pub seo_config: SeoConfig,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunResult {
    /// Final artifact as returned by the last stage
    pub result: String,
    pub stages: Vec<StageOutput>,
    /// `None` when analytics are disabled
    pub analytics: Option<AnalyticsReport>,
    pub execution_time: f64,
}

/// Files written by [`BlogGenerator::run_and_save`]
#[derive(Debug, Clone, PartialEq)]
pub struct SavedFiles {
    pub article: PathBuf,
    pub analytics: Option<PathBuf>,
    pub intermediate: Vec<PathBuf>,
}

pub struct BlogGenerator {
    config: Arc<GeneratorConfig>,
    prompts: Arc<PromptSet>,
    engine: Arc<dyn ExecutionEngine>,
    search_tool: Arc<dyn Tool>,
}

impl BlogGenerator {
    pub fn new(
        config: GeneratorConfig,
        prompts: PromptSet,
        engine: Arc<dyn ExecutionEngine>,
        search_tool: Arc<dyn Tool>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            prompts: Arc::new(prompts),
            engine,
            search_tool,
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Run all five stages for `input`
    ///
    /// Fails with [`GeneratorError::InvalidInput`] before any stage runs when
    /// the topic is empty, and with [`GeneratorError::Engine`] when a stage
    /// fails. There is no partial result.
    pub async fn run(&self, input: &BlogInput) -> Result<RunResult> {
        input.ensure_valid()?;

        let graph = build_stage_graph(input, &self.prompts, &self.config, self.search_tool.clone())
            .context("Failed to build stage graph")?;

        let handle = RunHandle::new(PIPELINE_ID);
        log_run_start!(handle, graph.len());
        tracing::info!(run_id = %handle.id, topic = %input.topic, "Starting blog generation");

        let started = Instant::now();
        let output = match self.engine.execute(&graph, &input.to_fields()).await {
            Ok(output) => output,
            Err(e) => {
                log_run_failed!(handle, e);
                tracing::error!(run_id = %handle.id, error = %e, "Blog generation failed");
                return Err(GeneratorError::from(e).into());
            }
        };
        let execution_time = started.elapsed().as_secs_f64();

        log_run_complete!(handle, execution_time);
        tracing::info!(
            run_id = %handle.id,
            seconds = execution_time,
            "Blog generation completed"
        );

        Ok(RunResult {
            result: output.final_output,
            stages: output.stages,
            analytics: self.generate_analytics_report(input, execution_time),
            execution_time,
        })
    }

    /// Run all stages, then write the results through `writer`
    ///
    /// Nothing is written until every stage has completed, so dropping the
    /// future mid-run leaves the output directory untouched.
    pub async fn run_and_save(
        &self,
        input: &BlogInput,
        writer: &ResultWriter,
    ) -> Result<(RunResult, SavedFiles)> {
        let result = self.run(input).await?;

        let intermediate = writer.save_intermediate(&result.stages, input).await;
        let article = writer
            .save_final(&result, input)
            .await
            .context("Failed to save the article")?;
        let analytics = writer
            .save_analytics(result.analytics.as_ref(), &article)
            .await?;

        Ok((
            result,
            SavedFiles {
                article,
                analytics,
                intermediate,
            },
        ))
    }

    /// Build the analytics record, or `None` when analytics are disabled
    pub fn generate_analytics_report(
        &self,
        input: &BlogInput,
        execution_time: f64,
    ) -> Option<AnalyticsReport> {
        if !self.config.output_config().generate_analytics {
            return None;
        }

        let models_used = Stage::ALL
            .iter()
            .map(|stage| {
                (
                    stage.to_string(),
                    self.config.model_for(stage.as_str()).to_string(),
                )
            })
            .collect();

        Some(AnalyticsReport {
            timestamp: Local::now().to_rfc3339(),
            input_config: input.clone(),
            execution_time_seconds: execution_time,
            models_used,
            seo_config: self.config.seo_config().clone(),
            status: STATUS_COMPLETED.to_string(),
        })
    }
}
