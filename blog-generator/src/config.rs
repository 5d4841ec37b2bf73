//! Generator configuration loaded from `config.yaml`
//!
//! Loading never fails: a missing or unparsable file falls back to
//! [`GeneratorConfig::builtin`].

use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::Path};

pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Model used for a stage that has no entry under `models`
pub const FALLBACK_MODEL: &str = "gpt-4o";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordDensity {
    pub primary: f64,
    pub secondary: f64,
}

impl Default for KeywordDensity {
    fn default() -> Self {
        Self {
            primary: 1.5,
            secondary: 0.8,
        }
    }
}

/// SEO targets. Passed through to prompts and analytics, never enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeoConfig {
    pub keyword_density: KeywordDensity,
    pub readability_target: f64,
    pub internal_links_min: f64,
    pub external_links_min: f64,
}

impl Default for SeoConfig {
    fn default() -> Self {
        Self {
            keyword_density: KeywordDensity::default(),
            readability_target: 65.0,
            internal_links_min: 3.0,
            external_links_min: 5.0,
        }
    }
}

/// Output switches. Flags absent from a config file are off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub save_intermediate: bool,
    pub generate_analytics: bool,
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            save_intermediate: false,
            generate_analytics: false,
            format: "markdown".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Stage name → model identifier
    pub models: BTreeMap<String, String>,
    pub seo_config: SeoConfig,
    pub output: OutputConfig,
}

impl GeneratorConfig {
    /// Configuration used when no usable config file exists
    pub fn builtin() -> Self {
        let models = [
            ("research", "gpt-4o-mini"),
            ("analysis", "gpt-4o-mini"),
            ("outline", "gpt-4o"),
            ("drafting", "gpt-4o"),
            ("optimization", "gpt-4o"),
        ]
        .into_iter()
        .map(|(stage, model)| (stage.to_string(), model.to_string()))
        .collect();

        Self {
            models,
            seo_config: SeoConfig::default(),
            output: OutputConfig {
                save_intermediate: true,
                generate_analytics: true,
                format: "markdown".to_string(),
            },
        }
    }

    /// Load from YAML, falling back to [`GeneratorConfig::builtin`] on any failure
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "Config file not found, using default configuration");
                return Self::builtin();
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Failed to read config file, using default configuration");
                return Self::builtin();
            }
        };

        match Self::parse(&content) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "Loaded configuration");
                config
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Failed to parse config file, using default configuration");
                Self::builtin()
            }
        }
    }

    fn parse(content: &str) -> Result<Self, serde_yaml::Error> {
        // Non-mapping roots, including an empty document, are parse errors
        let value: serde_yaml::Value = serde_yaml::from_str(content)?;
        if !value.is_mapping() {
            return Err(serde::de::Error::custom("config root must be a mapping"));
        }
        serde_yaml::from_value(value)
    }

    /// Model for `stage`, or [`FALLBACK_MODEL`] when not configured
    pub fn model_for(&self, stage: &str) -> &str {
        self.models
            .get(stage)
            .map(String::as_str)
            .unwrap_or(FALLBACK_MODEL)
    }

    pub fn seo_config(&self) -> &SeoConfig {
        &self.seo_config
    }

    pub fn output_config(&self) -> &OutputConfig {
        &self.output
    }
}
