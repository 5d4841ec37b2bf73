//! The five pipeline stages and their fixed order

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Research,
    Analysis,
    Outline,
    Drafting,
    Optimization,
}

/// Persona of the agent that runs a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Persona {
    pub role: &'static str,
    pub goal: &'static str,
    pub backstory: &'static str,
}

impl Stage {
    /// Execution order
    pub const ALL: [Stage; 5] = [
        Stage::Research,
        Stage::Analysis,
        Stage::Outline,
        Stage::Drafting,
        Stage::Optimization,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Research => "research",
            Stage::Analysis => "analysis",
            Stage::Outline => "outline",
            Stage::Drafting => "drafting",
            Stage::Optimization => "optimization",
        }
    }

    /// Position in [`Stage::ALL`]
    pub fn index(&self) -> usize {
        Self::ALL
            .iter()
            .position(|s| s == self)
            .unwrap_or_default()
    }

    /// Every strictly earlier stage, in order
    pub fn upstream(&self) -> &'static [Stage] {
        &Self::ALL[..self.index()]
    }

    /// Key of this stage's template in the prompt file
    pub fn prompt_key(&self) -> String {
        format!("{}_description", self.as_str())
    }

    /// Only research may search the web
    pub fn uses_search(&self) -> bool {
        matches!(self, Stage::Research)
    }

    pub fn expected_output(&self) -> &'static str {
        match self {
            Stage::Research => {
                "Structured JSON report with facts, sources, keywords, opportunities and market_insights"
            }
            Stage::Analysis => "JSON with strategic recommendations for the outline and the content",
            Stage::Outline => {
                "Detailed YAML structure for the article with sections, bullet points and word estimates"
            }
            Stage::Drafting => "Complete Markdown draft of the article with word count and SEO notes",
            Stage::Optimization => "Final optimized Markdown article and a report of the changes",
        }
    }

    pub fn persona(&self) -> Persona {
        match self {
            Stage::Research => Persona {
                role: "Expert Researcher",
                goal: "Gather web information through search to support writing a blog article",
                backstory: "You specialize in web research, extracting key facts, statistics and \
                    reliable sources. You focus on recent, factual information and never invent data.",
            },
            Stage::Analysis => Persona {
                role: "Content Strategist",
                goal: "Analyze the research and identify strategic opportunities for the content",
                backstory: "You are an SEO content analyst who spots information gaps, unique angles \
                    and positioning opportunities that make an article stand out.",
            },
            Stage::Outline => Persona {
                role: "SEO Editor",
                goal: "Design a detailed article structure grounded in the research",
                backstory: "You design engaging, search-optimized article structures with a logical \
                    flow, clear headings and word estimates that guarantee full coverage.",
            },
            Stage::Drafting => Persona {
                role: "Blog Copywriter",
                goal: "Write a complete draft of the article from the outline and the research",
                backstory: "You write engaging, conversational content that weaves in facts naturally, \
                    follows SEO best practice and stays readable for the target audience.",
            },
            Stage::Optimization => Persona {
                role: "SEO Optimizer and Reviewer",
                goal: "Optimize the draft for SEO, length, coherence and quality",
                backstory: "You critique and refine content for search visibility, factual accuracy \
                    and a professional finish.",
            },
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| format!("unknown stage '{}'", s))
    }
}
