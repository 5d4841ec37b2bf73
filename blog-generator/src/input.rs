//! Article request model
//!
//! [`BlogInput`] is built once per run from CLI flags, interactive answers or
//! an input file. All three paths go through [`BlogInput::from_fields`], which
//! takes a plain field mapping and fills in defaults for absent keys.

use crate::error::{GeneratorError, Result};
use blog_generator_sdk::Inputs;
use serde::{Deserialize, Serialize};
use std::{fmt, path::Path};
use tokio::fs;

/// Field names accepted by [`BlogInput::from_fields`] and usable as prompt placeholders
pub const FIELD_NAMES: [&str; 10] = [
    "topic",
    "intent",
    "target_website",
    "business_activity",
    "target_audience",
    "tone",
    "language",
    "word_count",
    "include_cta",
    "seo_focus",
];

pub const DEFAULT_AUDIENCE: &str = "pubblico generale";
pub const DEFAULT_LANGUAGE: &str = "it";
pub const DEFAULT_WORD_COUNT: u32 = 2000;
pub const DEFAULT_TEMPLATE_FILE: &str = "input_template.yaml";

/// Purpose of the article
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum Intent {
    #[default]
    #[serde(rename = "informativo", alias = "informative")]
    #[value(name = "informativo", alias = "informative")]
    Informative,
    #[serde(rename = "commerciale", alias = "commercial")]
    #[value(name = "commerciale", alias = "commercial")]
    Commercial,
    #[serde(rename = "educativo", alias = "educational")]
    #[value(name = "educativo", alias = "educational")]
    Educational,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Informative => "informativo",
            Intent::Commercial => "commerciale",
            Intent::Educational => "educativo",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tone of voice
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum Tone {
    #[default]
    #[serde(rename = "professionale", alias = "professional")]
    #[value(name = "professionale", alias = "professional")]
    Professional,
    #[serde(rename = "casual")]
    #[value(name = "casual")]
    Casual,
    #[serde(rename = "tecnico", alias = "technical")]
    #[value(name = "tecnico", alias = "technical")]
    Technical,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Professional => "professionale",
            Tone::Casual => "casual",
            Tone::Technical => "tecnico",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The article request. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlogInput {
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub intent: Intent,
    #[serde(default)]
    pub target_website: String,
    #[serde(default)]
    pub business_activity: String,
    #[serde(default = "default_audience")]
    pub target_audience: String,
    #[serde(default)]
    pub tone: Tone,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_word_count")]
    pub word_count: u32,
    #[serde(default = "default_true")]
    pub include_cta: bool,
    #[serde(default = "default_true")]
    pub seo_focus: bool,
}

fn default_audience() -> String {
    DEFAULT_AUDIENCE.to_string()
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_word_count() -> u32 {
    DEFAULT_WORD_COUNT
}

fn default_true() -> bool {
    true
}

impl Default for BlogInput {
    fn default() -> Self {
        Self::new("")
    }
}

impl BlogInput {
    /// Request for `topic` with every other field at its default
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            intent: Intent::default(),
            target_website: String::new(),
            business_activity: String::new(),
            target_audience: default_audience(),
            tone: Tone::default(),
            language: default_language(),
            word_count: DEFAULT_WORD_COUNT,
            include_cta: true,
            seo_focus: true,
        }
    }

    /// Build from named fields. Absent keys take defaults, unknown keys are rejected.
    pub fn from_fields(fields: Inputs) -> Result<Self> {
        serde_json::from_value(serde_json::Value::Object(fields))
            .map_err(|e| GeneratorError::InvalidFields(e.to_string()))
    }

    /// Load from a YAML (`.yaml`/`.yml`) or JSON file holding a flat object
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let load_error = |message: String| GeneratorError::InputLoad {
            path: path.to_path_buf(),
            message,
        };

        let content = fs::read_to_string(path)
            .await
            .map_err(|e| load_error(e.to_string()))?;

        let is_yaml = matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("yaml") | Some("yml")
        );
        let value: serde_json::Value = if is_yaml {
            serde_yaml::from_str(&content).map_err(|e| load_error(e.to_string()))?
        } else {
            serde_json::from_str(&content).map_err(|e| load_error(e.to_string()))?
        };

        match value {
            serde_json::Value::Object(fields) => {
                Self::from_fields(fields).map_err(|e| load_error(e.to_string()))
            }
            other => Err(load_error(format!(
                "expected a flat object of input fields, found {}",
                json_kind(&other)
            ))),
        }
    }

    /// Check required fields, logging the first one that is missing
    pub fn validate(&self) -> bool {
        if self.topic.trim().is_empty() {
            tracing::error!(field = "topic", "Missing required input field");
            return false;
        }
        true
    }

    /// Like [`BlogInput::validate`] but returns the failure as an error
    pub fn ensure_valid(&self) -> Result<()> {
        if self.validate() {
            Ok(())
        } else {
            Err(GeneratorError::InvalidInput("topic"))
        }
    }

    /// Flat field → value mapping used as the prompt substitution context
    pub fn to_fields(&self) -> Inputs {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => Inputs::new(),
        }
    }

    /// Sample request written by `--generate-template`
    pub fn template() -> Self {
        Self {
            topic: "Inserisci il topic qui".to_string(),
            target_website: "https://tuosito.it".to_string(),
            business_activity: "Descrivi la tua attività".to_string(),
            target_audience: "Descrivi il pubblico target".to_string(),
            ..Self::new("")
        }
    }

    /// Write [`BlogInput::template`] as YAML
    pub async fn save_template(path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let yaml = serde_yaml::to_string(&Self::template())
            .map_err(|e| GeneratorError::InvalidFields(e.to_string()))?;
        let persist = |source: std::io::Error| GeneratorError::Persist {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(persist)?;
        }
        fs::write(path, yaml).await.map_err(persist)?;
        tracing::info!(path = %path.display(), "Input template saved");
        Ok(())
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
