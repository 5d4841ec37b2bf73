//! Writes run results to disk
//!
//! File names:
//! - final article: `blog_<topic>_<timestamp>.md`
//! - analytics: `<article stem>_analytics.json`
//! - per stage: `intermediate_<stage>_<topic>_<timestamp>.json`
//!
//! `<topic>` is [`sanitize_topic`] of the input topic and `<timestamp>` is
//! local time as `YYYYmmdd_HHMMSS`, shared by every file of one writer.

use crate::{
    artifact::{final_text, intermediate_value},
    config::OutputConfig,
    error::{GeneratorError, Result},
    input::BlogInput,
    pipeline::{AnalyticsReport, RunResult},
};
use blog_generator_sdk::{log_artifact_saved, StageOutput};
use chrono::Local;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Lower-case the topic and replace spaces and path separators with `_`
pub fn sanitize_topic(topic: &str) -> String {
    topic
        .to_lowercase()
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            other => other,
        })
        .collect()
}

pub struct ResultWriter {
    output_dir: PathBuf,
    save_intermediate: bool,
    timestamp: String,
}

fn persist_error(path: &Path) -> impl FnOnce(std::io::Error) -> GeneratorError + '_ {
    move |source| GeneratorError::Persist {
        path: path.to_path_buf(),
        source,
    }
}

impl ResultWriter {
    pub fn new(output_dir: impl Into<PathBuf>, output: &OutputConfig) -> Self {
        Self {
            output_dir: output_dir.into(),
            save_intermediate: output.save_intermediate,
            timestamp: Local::now().format("%Y%m%d_%H%M%S").to_string(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    pub fn final_path(&self, input: &BlogInput) -> PathBuf {
        self.output_dir.join(format!(
            "blog_{}_{}.md",
            sanitize_topic(&input.topic),
            self.timestamp
        ))
    }

    /// Write the final article and return its path
    ///
    /// The text goes to a hidden temporary file first and is renamed into
    /// place, so the article path only ever holds a complete file.
    pub async fn save_final(&self, result: &RunResult, input: &BlogInput) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)
            .await
            .map_err(persist_error(&self.output_dir))?;

        let path = self.final_path(input);
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let tmp_path = self.output_dir.join(format!(".{}.tmp", file_name));

        if let Err(source) = fs::write(&tmp_path, final_text(&result.result)).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(GeneratorError::Persist {
                path: tmp_path,
                source,
            });
        }
        if let Err(source) = fs::rename(&tmp_path, &path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(GeneratorError::Persist { path, source });
        }

        tracing::info!(path = %path.display(), "Article saved");
        log_artifact_saved!(path.display(), "final article");
        Ok(path)
    }

    /// Write one JSON file per stage when intermediate output is enabled
    ///
    /// Failures are logged and skipped. Returns the paths actually written.
    pub async fn save_intermediate(&self, stages: &[StageOutput], input: &BlogInput) -> Vec<PathBuf> {
        if !self.save_intermediate {
            return Vec::new();
        }
        if let Err(e) = fs::create_dir_all(&self.output_dir).await {
            tracing::error!(path = %self.output_dir.display(), error = %e, "Cannot create output directory");
            return Vec::new();
        }

        let topic = sanitize_topic(&input.topic);
        let mut written = Vec::with_capacity(stages.len());

        for stage in stages {
            let path = self.output_dir.join(format!(
                "intermediate_{}_{}_{}.json",
                stage.stage, topic, self.timestamp
            ));

            let json = match serde_json::to_string_pretty(&intermediate_value(&stage.raw)) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!(stage = %stage.stage, error = %e, "Failed to serialize intermediate result");
                    continue;
                }
            };

            match fs::write(&path, json).await {
                Ok(()) => {
                    tracing::debug!(stage = %stage.stage, path = %path.display(), "Intermediate result saved");
                    log_artifact_saved!(path.display(), format!("{} output", stage.stage));
                    written.push(path);
                }
                Err(e) => {
                    tracing::error!(stage = %stage.stage, path = %path.display(), error = %e, "Failed to save intermediate result");
                }
            }
        }

        written
    }

    /// Write `<article stem>_analytics.json` next to the article
    ///
    /// Returns `Ok(None)` without touching the disk when there is no report.
    pub async fn save_analytics(
        &self,
        report: Option<&AnalyticsReport>,
        final_path: &Path,
    ) -> Result<Option<PathBuf>> {
        let Some(report) = report else {
            return Ok(None);
        };

        let stem = final_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let path = final_path.with_file_name(format!("{}_analytics.json", stem));

        let json = serde_json::to_string_pretty(report).map_err(|e| GeneratorError::Persist {
            path: path.clone(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        })?;
        fs::write(&path, json).await.map_err(persist_error(&path))?;

        tracing::info!(path = %path.display(), "Analytics saved");
        log_artifact_saved!(path.display(), "analytics report");
        Ok(Some(path))
    }
}
