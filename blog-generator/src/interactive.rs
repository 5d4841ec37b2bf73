//! Interactive input collection

use crate::{
    error::GeneratorError,
    input::{BlogInput, Intent, Tone, DEFAULT_AUDIENCE, DEFAULT_WORD_COUNT},
};
use anyhow::Result;
use blog_generator_sdk::Inputs;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use serde_json::json;

/// Raw answers to the interactive questions
#[derive(Debug, Clone, PartialEq)]
pub struct InteractiveAnswers {
    pub topic: String,
    pub intent: Intent,
    pub target_website: String,
    pub business_activity: String,
    pub target_audience: String,
    pub tone: Tone,
    pub word_count: u32,
    pub include_cta: bool,
}

impl InteractiveAnswers {
    /// Blank optional answers are dropped; a blank audience falls back to the default.
    pub fn to_fields(&self) -> Inputs {
        let mut fields = Inputs::new();
        fields.insert("topic".to_string(), json!(self.topic.trim()));
        fields.insert("intent".to_string(), json!(self.intent.as_str()));
        fields.insert("tone".to_string(), json!(self.tone.as_str()));
        fields.insert("word_count".to_string(), json!(self.word_count));
        fields.insert("include_cta".to_string(), json!(self.include_cta));

        for (key, value) in [
            ("target_website", &self.target_website),
            ("business_activity", &self.business_activity),
            ("target_audience", &self.target_audience),
        ] {
            let value = value.trim();
            if !value.is_empty() {
                fields.insert(key.to_string(), json!(value));
            }
        }
        fields
    }
}

/// Ask every question on the terminal
pub fn prompt_answers() -> Result<InteractiveAnswers> {
    let theme = ColorfulTheme::default();
    println!("\n=== SEO Blog Generator ===\n");

    let topic: String = Input::with_theme(&theme)
        .with_prompt("Article topic")
        .allow_empty(true)
        .interact_text()?;
    if topic.trim().is_empty() {
        return Err(GeneratorError::InvalidInput("topic").into());
    }

    let intents = [Intent::Informative, Intent::Commercial, Intent::Educational];
    let intent = Select::with_theme(&theme)
        .with_prompt("Article intent")
        .items(&intents.map(|i| i.as_str()))
        .default(0)
        .interact()?;

    let target_website: String = Input::with_theme(&theme)
        .with_prompt("Target website (optional)")
        .allow_empty(true)
        .interact_text()?;

    let business_activity: String = Input::with_theme(&theme)
        .with_prompt("Business activity to promote (optional)")
        .allow_empty(true)
        .interact_text()?;

    let target_audience: String = Input::with_theme(&theme)
        .with_prompt("Target audience")
        .default(DEFAULT_AUDIENCE.to_string())
        .interact_text()?;

    let tones = [Tone::Professional, Tone::Casual, Tone::Technical];
    let tone = Select::with_theme(&theme)
        .with_prompt("Tone of voice")
        .items(&tones.map(|t| t.as_str()))
        .default(0)
        .interact()?;

    let word_count: u32 = Input::with_theme(&theme)
        .with_prompt("Target word count")
        .default(DEFAULT_WORD_COUNT)
        .interact_text()?;

    let include_cta = Confirm::with_theme(&theme)
        .with_prompt("Include a call to action?")
        .default(true)
        .interact()?;

    Ok(InteractiveAnswers {
        topic,
        intent: intents[intent],
        target_website,
        business_activity,
        target_audience,
        tone: tones[tone],
        word_count,
        include_cta,
    })
}

/// Build the input from terminal answers
pub fn input_interactive() -> Result<BlogInput> {
    let answers = prompt_answers()?;
    Ok(BlogInput::from_fields(answers.to_fields())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers() -> InteractiveAnswers {
        InteractiveAnswers {
            topic: "  Case Vacanza  ".to_string(),
            intent: Intent::Commercial,
            target_website: String::new(),
            business_activity: "Affitti brevi".to_string(),
            target_audience: "   ".to_string(),
            tone: Tone::Casual,
            word_count: 1200,
            include_cta: false,
        }
    }

    #[test]
    fn test_answers_build_input() {
        let input = BlogInput::from_fields(answers().to_fields()).unwrap();

        assert_eq!(input.topic, "Case Vacanza");
        assert_eq!(input.intent, Intent::Commercial);
        assert_eq!(input.business_activity, "Affitti brevi");
        assert_eq!(input.tone, Tone::Casual);
        assert_eq!(input.word_count, 1200);
        assert!(!input.include_cta);
    }

    #[test]
    fn test_blank_answers_use_defaults() {
        let fields = answers().to_fields();

        assert!(!fields.contains_key("target_website"));
        assert!(!fields.contains_key("target_audience"));
        let input = BlogInput::from_fields(fields).unwrap();
        assert_eq!(input.target_audience, DEFAULT_AUDIENCE);
        assert_eq!(input.language, "it");
    }
}
