//! Sequential execution engine backed by a chat model
//!
//! Stages run one at a time in graph order. Each stage's model sees its
//! persona as the system message and its task prompt plus the raw outputs of
//! its upstream stages as the user message. Tools attached to a node are
//! offered through function calling for a bounded number of rounds.

use crate::llm::{ChatMessage, ChatModel, ChatRequest, LlmError, ToolSpec};
use async_trait::async_trait;
use blog_generator_sdk::{
    log_stage_complete, log_stage_failed, log_stage_start, log_tool_call, EngineError,
    EngineOutput, ExecutionEngine, Inputs, StageGraph, StageNode, StageOutput,
};
use serde_json::{json, Value};
use std::sync::Arc;

pub const DEFAULT_MAX_TOOL_ROUNDS: usize = 5;

pub struct SequentialEngine {
    model: Arc<dyn ChatModel>,
    max_tool_rounds: usize,
}

impl SequentialEngine {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self {
            model,
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
        }
    }

    pub fn with_max_tool_rounds(mut self, rounds: usize) -> Self {
        self.max_tool_rounds = rounds;
        self
    }

    async fn run_stage(
        &self,
        node: &StageNode,
        upstream: &[&StageOutput],
        inputs: &Inputs,
    ) -> Result<String, LlmError> {
        let mut messages = vec![
            ChatMessage::system(system_prompt(node, inputs)),
            ChatMessage::user(task_prompt(node, upstream)),
        ];
        let specs: Vec<ToolSpec> = node
            .tools
            .iter()
            .map(|tool| ToolSpec::from_tool(tool.as_ref()))
            .collect();

        for round in 0..=self.max_tool_rounds {
            // The last round withholds tools so the model has to answer
            let offer_tools = !specs.is_empty() && round < self.max_tool_rounds;
            let request = ChatRequest {
                model: node.agent.model.clone(),
                messages: messages.clone(),
                tools: if offer_tools { specs.clone() } else { Vec::new() },
            };

            let response = self.model.chat(request).await?;
            if let Some(usage) = response.usage {
                tracing::debug!(
                    stage = %node.name,
                    round,
                    prompt_tokens = usage.prompt_tokens,
                    completion_tokens = usage.completion_tokens,
                    "Model responded"
                );
            }

            if response.truncated() {
                tracing::warn!(stage = %node.name, round, "Model output truncated at the token limit");
            }
            let message = response.message;
            if !offer_tools || message.tool_calls.is_empty() {
                return message
                    .content
                    .filter(|text| !text.trim().is_empty())
                    .ok_or(LlmError::EmptyResponse);
            }

            let calls = message.tool_calls.clone();
            messages.push(message);
            for call in calls {
                log_tool_call!(node.name, call.function.name, call.function.arguments);
                let result = match node.find_tool(&call.function.name) {
                    Some(tool) => {
                        let arguments = serde_json::from_str(&call.function.arguments)
                            .unwrap_or(Value::Object(Default::default()));
                        tool.call(arguments).await
                    }
                    None => {
                        tracing::warn!(stage = %node.name, tool = %call.function.name, "Model called an unknown tool");
                        json!({ "error": format!("unknown tool '{}'", call.function.name) })
                            .to_string()
                    }
                };
                messages.push(ChatMessage::tool_result(call.id, result));
            }
        }

        Err(LlmError::EmptyResponse)
    }
}

fn system_prompt(node: &StageNode, inputs: &Inputs) -> String {
    let mut prompt = format!(
        "You are {}.\n{}\n\nYour goal: {}",
        node.agent.role, node.agent.backstory, node.agent.goal
    );
    if let Some(language) = inputs.get("language").and_then(Value::as_str) {
        prompt.push_str(&format!(
            "\nWrite every answer in the language with code '{}'.",
            language
        ));
    }
    prompt
}

fn task_prompt(node: &StageNode, upstream: &[&StageOutput]) -> String {
    let mut prompt = format!(
        "{}\n\nExpected output: {}",
        node.description.trim_end(),
        node.expected_output
    );
    if !upstream.is_empty() {
        prompt.push_str("\n\n# Context from previous stages\n");
        for output in upstream {
            prompt.push_str(&format!("\n## {}\n{}\n", output.stage, output.raw.trim_end()));
        }
    }
    prompt
}

#[async_trait]
impl ExecutionEngine for SequentialEngine {
    async fn execute(&self, graph: &StageGraph, inputs: &Inputs) -> Result<EngineOutput, EngineError> {
        graph.validate()?;
        let total = graph.len();
        let mut outputs: Vec<StageOutput> = Vec::with_capacity(total);

        for (i, node) in graph.nodes().iter().enumerate() {
            log_stage_start!(node.name, i + 1, total, node.agent.model);
            tracing::info!(stage = %node.name, model = %node.agent.model, "Running stage {}/{}", i + 1, total);

            let upstream: Vec<&StageOutput> = node
                .context
                .iter()
                .filter_map(|name| outputs.iter().find(|o| &o.stage == name))
                .collect();

            match self.run_stage(node, &upstream, inputs).await {
                Ok(raw) => {
                    log_stage_complete!(node.name, raw.chars().count());
                    outputs.push(StageOutput {
                        stage: node.name.clone(),
                        raw,
                    });
                }
                Err(e) => {
                    log_stage_failed!(node.name, e);
                    tracing::error!(stage = %node.name, error = %e, "Stage failed");
                    return Err(EngineError::Stage {
                        stage: node.name.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        Ok(EngineOutput::from_stages(outputs))
    }
}
