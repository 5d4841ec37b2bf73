//! Builds the five-stage graph for one article request

use crate::{
    config::{GeneratorConfig, SeoConfig},
    error::Result,
    input::BlogInput,
    pipeline::Stage,
    prompts::PromptSet,
};
use blog_generator_sdk::{AgentProfile, StageGraph, StageNode, Tool};
use std::sync::Arc;

/// SEO targets appended to the drafting and optimization prompts
pub fn seo_guidelines(seo: &SeoConfig) -> String {
    format!(
        "SEO targets: primary keyword density {:.1}%, secondary keywords {:.1}%, \
         readability score at least {}, at least {} internal and {} external links.",
        seo.keyword_density.primary,
        seo.keyword_density.secondary,
        seo.readability_target,
        seo.internal_links_min,
        seo.external_links_min
    )
}

fn agent_for(stage: Stage, config: &GeneratorConfig) -> AgentProfile {
    let persona = stage.persona();
    AgentProfile {
        role: persona.role.to_string(),
        goal: persona.goal.to_string(),
        backstory: persona.backstory.to_string(),
        model: config.model_for(stage.as_str()).to_string(),
    }
}

/// Render every stage prompt and wire the accumulating upstream context
///
/// Stage *k* lists all of stages 1..k-1 as context. Only research gets
/// `search_tool`.
pub fn build_stage_graph(
    input: &BlogInput,
    prompts: &PromptSet,
    config: &GeneratorConfig,
    search_tool: Arc<dyn Tool>,
) -> Result<StageGraph> {
    let mut graph = StageGraph::new();

    for stage in Stage::ALL {
        let mut description = prompts.render(stage, input)?;
        if input.seo_focus && matches!(stage, Stage::Drafting | Stage::Optimization) {
            description.push_str("\n\n");
            description.push_str(&seo_guidelines(config.seo_config()));
        }

        let mut node = StageNode::new(
            stage.as_str(),
            agent_for(stage, config),
            description,
            stage.expected_output(),
        )
        .with_context(stage.upstream().iter().map(Stage::as_str));

        if stage.uses_search() {
            node = node.with_tool(search_tool.clone());
        }

        graph.add_stage(node)?;
    }

    tracing::debug!(stages = graph.len(), topic = %input.topic, "Built stage graph");
    Ok(graph)
}
