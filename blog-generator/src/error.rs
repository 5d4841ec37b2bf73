//! Error taxonomy for the blog generator
//!
//! Config problems never show up here: the config loader recovers with
//! built-in defaults. Search failures are returned to the model as data.

use blog_generator_sdk::EngineError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("invalid input: missing required field '{0}'")]
    InvalidInput(&'static str),

    #[error("invalid input fields: {0}")]
    InvalidFields(String),

    #[error("failed to load input from {}: {message}", .path.display())]
    InputLoad { path: PathBuf, message: String },

    #[error("failed to load prompts: {0}")]
    PromptLoad(String),

    #[error("prompt template for '{stage}' uses unknown placeholder '{{{placeholder}}}'")]
    UnknownPlaceholder { stage: String, placeholder: String },

    #[error("missing setting: {0}")]
    Settings(String),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("failed to write {}: {source}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, GeneratorError>;
