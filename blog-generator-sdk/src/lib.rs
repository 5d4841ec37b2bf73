// Stage graph contract
pub mod graph;

pub use graph::{
    AgentProfile, EngineError, EngineOutput, ExecutionEngine, Inputs, StageGraph, StageNode,
    StageOutput, Tool,
};

// Re-export async trait for convenience
pub use async_trait::async_trait;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prefix marking structured pipeline events on stderr
pub const EVENT_PREFIX: &str = "__BLOG_EVENT__:";

/// Handle identifying one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunHandle {
    pub id: Uuid,
    pub pipeline_id: String,
}

impl RunHandle {
    pub fn new(pipeline_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            pipeline_id: pipeline_id.into(),
        }
    }

    pub fn id(&self) -> &Uuid {
        &self.id
    }
}

/// Structured logging events emitted while a pipeline runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineLog {
    RunStarted {
        run_id: Uuid,
        pipeline: String,
        total_stages: usize,
    },
    RunCompleted {
        run_id: Uuid,
        elapsed_seconds: f64,
    },
    RunFailed {
        run_id: Uuid,
        error: String,
    },
    StageStarted {
        stage: String,
        index: usize,
        total_stages: usize,
        model: String,
    },
    StageCompleted {
        stage: String,
        output_chars: usize,
    },
    StageFailed {
        stage: String,
        error: String,
    },
    /// A stage's model invoked a tool
    ToolCalled {
        stage: String,
        tool: String,
        arguments: String,
    },
    /// An output file was written
    ArtifactSaved {
        file_path: String,
        description: String,
    },
}

impl PipelineLog {
    /// Serialize with the event prefix, as written by [`PipelineLog::emit`]
    pub fn to_line(&self) -> Option<String> {
        serde_json::to_string(self)
            .ok()
            .map(|json| format!("{}{}", EVENT_PREFIX, json))
    }

    /// Parse a line produced by [`PipelineLog::to_line`]
    pub fn parse_line(line: &str) -> Option<Self> {
        let json = line.trim().strip_prefix(EVENT_PREFIX)?;
        serde_json::from_str(json).ok()
    }

    /// Emit this event to stderr for progress consumers
    pub fn emit(&self) {
        if let Some(line) = self.to_line() {
            use std::io::Write;
            eprintln!("{}", line);
            let _ = std::io::stderr().flush();
        }
    }
}

#[macro_export]
macro_rules! log_run_start {
    ($handle:expr, $total:expr) => {
        $crate::PipelineLog::RunStarted {
            run_id: $handle.id,
            pipeline: $handle.pipeline_id.to_string(),
            total_stages: $total,
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_run_complete {
    ($handle:expr, $elapsed:expr) => {
        $crate::PipelineLog::RunCompleted {
            run_id: $handle.id,
            elapsed_seconds: $elapsed,
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_run_failed {
    ($handle:expr, $error:expr) => {
        $crate::PipelineLog::RunFailed {
            run_id: $handle.id,
            error: $error.to_string(),
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_stage_start {
    ($stage:expr, $index:expr, $total:expr, $model:expr) => {
        $crate::PipelineLog::StageStarted {
            stage: $stage.to_string(),
            index: $index,
            total_stages: $total,
            model: $model.to_string(),
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_stage_complete {
    ($stage:expr, $chars:expr) => {
        $crate::PipelineLog::StageCompleted {
            stage: $stage.to_string(),
            output_chars: $chars,
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_stage_failed {
    ($stage:expr, $error:expr) => {
        $crate::PipelineLog::StageFailed {
            stage: $stage.to_string(),
            error: $error.to_string(),
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_tool_call {
    ($stage:expr, $tool:expr, $args:expr) => {
        $crate::PipelineLog::ToolCalled {
            stage: $stage.to_string(),
            tool: $tool.to_string(),
            arguments: $args.to_string(),
        }
        .emit();
    };
}

#[macro_export]
macro_rules! log_artifact_saved {
    ($path:expr, $desc:expr) => {
        $crate::PipelineLog::ArtifactSaved {
            file_path: $path.to_string(),
            description: $desc.to_string(),
        }
        .emit();
    };
}

// ============================================================================
// Console Logging Macros
// ============================================================================
// Colored human-readable output for the CLI, complementing the structured
// PipelineLog events.
// ============================================================================

/// Logs an informational message.
///
/// # Example
/// ```
/// use blog_generator_sdk::log_info;
/// log_info!("Loading prompts.yaml...");
/// ```
#[macro_export]
macro_rules! log_info {
    ($message:expr) => {
        println!("\x1b[36mℹ {}\x1b[0m", $message);
    };
    ($fmt:expr, $($arg:tt)*) => {
        println!("\x1b[36mℹ {}\x1b[0m", format!($fmt, $($arg)*));
    };
}

/// Logs a warning message.
///
/// # Example
/// ```
/// use blog_generator_sdk::log_warning;
/// log_warning!("Analytics disabled");
/// ```
#[macro_export]
macro_rules! log_warning {
    ($message:expr) => {
        println!("\x1b[33m⚠ Warning: {}\x1b[0m", $message);
    };
    ($fmt:expr, $($arg:tt)*) => {
        println!("\x1b[33m⚠ Warning: {}\x1b[0m", format!($fmt, $($arg)*));
    };
}

/// Logs that a file has been saved.
///
/// # Example
/// ```
/// use blog_generator_sdk::log_file_saved;
/// log_file_saved!("./blog_topic_20250101_120000.md");
/// ```
///
/// Outputs:
/// ```text
/// ✓ Saved: ./blog_topic_20250101_120000.md
/// ```
#[macro_export]
macro_rules! log_file_saved {
    ($path:expr) => {
        println!("\x1b[32m✓ Saved: {}\x1b[0m", $path);
    };
}

/// Logs the elapsed time of a run in seconds.
///
/// # Example
/// ```
/// use blog_generator_sdk::log_elapsed;
/// log_elapsed!(12.5_f64);
/// ```
///
/// Outputs:
/// ```text
/// ⏱ Execution time: 12.50 seconds
/// ```
#[macro_export]
macro_rules! log_elapsed {
    ($seconds:expr) => {
        println!("\x1b[2m⏱ Execution time: {:.2} seconds\x1b[0m", $seconds);
    };
}
