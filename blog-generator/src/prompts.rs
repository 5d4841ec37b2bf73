//! Prompt templates, one per stage, loaded from `prompts.yaml`
//!
//! Templates use `{field}` placeholders naming [`BlogInput`] fields; `{{` and
//! `}}` produce literal braces. A prompt file is usable only when every stage
//! has a template and every placeholder is a known field.

use crate::{
    error::{GeneratorError, Result},
    input::{BlogInput, FIELD_NAMES},
    pipeline::Stage,
};
use blog_generator_sdk::Inputs;
use std::{collections::BTreeMap, path::Path};

pub const DEFAULT_PROMPTS_FILE: &str = "prompts.yaml";

#[derive(Debug, Clone, PartialEq)]
pub struct PromptSet {
    templates: BTreeMap<Stage, String>,
}

/// One piece of a parsed template
#[derive(Debug, Clone, PartialEq)]
enum Segment<'a> {
    Text(&'a str),
    Brace(char),
    Field(&'a str),
}

fn parse_template(template: &str) -> std::result::Result<Vec<Segment<'_>>, String> {
    let mut segments = Vec::new();
    let mut rest = template;

    while let Some(pos) = rest.find(|c: char| c == '{' || c == '}') {
        if pos > 0 {
            segments.push(Segment::Text(&rest[..pos]));
        }
        let tail = &rest[pos..];
        if tail.starts_with("{{") {
            segments.push(Segment::Brace('{'));
            rest = &tail[2..];
        } else if tail.starts_with("}}") {
            segments.push(Segment::Brace('}'));
            rest = &tail[2..];
        } else if tail.starts_with('{') {
            let end = tail
                .find('}')
                .ok_or_else(|| "unclosed '{' in template".to_string())?;
            let name = tail[1..end].trim();
            if name.is_empty() || name.contains('{') {
                return Err(format!("malformed placeholder '{}'", &tail[..=end]));
            }
            segments.push(Segment::Field(name));
            rest = &tail[end + 1..];
        } else {
            return Err("single '}' in template".to_string());
        }
    }
    if !rest.is_empty() {
        segments.push(Segment::Text(rest));
    }
    Ok(segments)
}

/// Placeholder names used by `template`, in order of appearance
pub fn placeholders(template: &str) -> std::result::Result<Vec<String>, String> {
    Ok(parse_template(template)?
        .into_iter()
        .filter_map(|segment| match segment {
            Segment::Field(name) => Some(name.to_string()),
            _ => None,
        })
        .collect())
}

/// Substitute `{field}` placeholders from `context`
pub fn render_template(template: &str, context: &Inputs) -> std::result::Result<String, String> {
    let mut out = String::with_capacity(template.len());
    for segment in parse_template(template)? {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Brace(c) => out.push(c),
            Segment::Field(name) => match context.get(name) {
                Some(serde_json::Value::String(s)) => out.push_str(s),
                Some(serde_json::Value::Null) => {}
                Some(other) => out.push_str(&other.to_string()),
                None => return Err(format!("no value for placeholder '{{{}}}'", name)),
            },
        }
    }
    Ok(out)
}

/// Compare two paths by the file they resolve to
///
/// Falls back to comparing the paths as written when either cannot be resolved.
fn same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Keep the string-valued entries of a prompt file
///
/// Other keys may hold any YAML value, but a stage template must be a string.
fn string_entries(mapping: serde_yaml::Mapping) -> Result<BTreeMap<String, String>> {
    let stage_keys: Vec<String> = Stage::ALL.iter().map(|s| s.prompt_key()).collect();
    let mut raw = BTreeMap::new();

    for (key, value) in mapping {
        let Some(key) = key.as_str().map(str::to_string) else {
            continue;
        };
        match value {
            serde_yaml::Value::String(template) => {
                raw.insert(key, template);
            }
            _ if stage_keys.contains(&key) => {
                return Err(GeneratorError::PromptLoad(format!(
                    "template '{}' is not a string",
                    key
                )));
            }
            _ => {}
        }
    }
    Ok(raw)
}

impl PromptSet {
    /// Load `path`, falling back to [`DEFAULT_PROMPTS_FILE`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with_fallback(path, DEFAULT_PROMPTS_FILE)
    }

    /// Load `primary`; on failure load `fallback` unless it is the same file.
    pub fn load_with_fallback(primary: impl AsRef<Path>, fallback: impl AsRef<Path>) -> Result<Self> {
        let primary = primary.as_ref();
        let fallback = fallback.as_ref();

        let primary_err = match Self::load_file(primary) {
            Ok(prompts) => return Ok(prompts),
            Err(e) => e,
        };

        if same_file(primary, fallback) {
            tracing::error!(path = %primary.display(), error = %primary_err, "Unable to load prompts");
            return Err(primary_err);
        }

        tracing::warn!(
            path = %primary.display(),
            fallback = %fallback.display(),
            error = %primary_err,
            "Prompt file unusable, loading fallback prompts"
        );

        Self::load_file(fallback).map_err(|fallback_err| {
            tracing::error!(path = %fallback.display(), error = %fallback_err, "Unable to load fallback prompts");
            GeneratorError::PromptLoad(format!(
                "{} ({}); fallback {} ({})",
                primary.display(),
                primary_err,
                fallback.display(),
                fallback_err
            ))
        })
    }

    fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| GeneratorError::PromptLoad(format!("{}: {}", path.display(), e)))?;
        let mapping: serde_yaml::Mapping = serde_yaml::from_str(&content)
            .map_err(|e| GeneratorError::PromptLoad(format!("{}: {}", path.display(), e)))?;
        let prompts = Self::from_map(string_entries(mapping)?)?;
        tracing::debug!(path = %path.display(), "Loaded prompt templates");
        Ok(prompts)
    }

    /// Validate a `<stage>_description` → template mapping. Extra keys are ignored.
    pub fn from_map(mut raw: BTreeMap<String, String>) -> Result<Self> {
        let mut templates = BTreeMap::new();
        for stage in Stage::ALL {
            let key = stage.prompt_key();
            let template = raw
                .remove(&key)
                .ok_or_else(|| GeneratorError::PromptLoad(format!("missing template '{}'", key)))?;

            let names = placeholders(&template)
                .map_err(|e| GeneratorError::PromptLoad(format!("{}: {}", key, e)))?;
            if let Some(unknown) = names.into_iter().find(|n| !FIELD_NAMES.contains(&n.as_str())) {
                return Err(GeneratorError::UnknownPlaceholder {
                    stage: stage.to_string(),
                    placeholder: unknown,
                });
            }
            templates.insert(stage, template);
        }
        Ok(Self { templates })
    }

    pub fn template(&self, stage: Stage) -> &str {
        self.templates
            .get(&stage)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Render the stage template with the full input as context
    pub fn render(&self, stage: Stage, input: &BlogInput) -> Result<String> {
        render_template(self.template(stage), &input.to_fields())
            .map_err(|e| GeneratorError::PromptLoad(format!("{}: {}", stage.prompt_key(), e)))
    }
}
