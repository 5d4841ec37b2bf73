//! Stage graph contract between the pipeline and an execution engine
//!
//! A [`StageGraph`] is an ordered list of [`StageNode`]s. Each node names the
//! upstream stages whose outputs it needs as context, so dependencies are
//! explicit data instead of shared mutable state. Engines receive the whole
//! graph in one call and return an [`EngineOutput`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fmt, sync::Arc};
use thiserror::Error;

/// Flat field → value mapping handed to the engine alongside the graph
pub type Inputs = serde_json::Map<String, serde_json::Value>;

/// Persona and model assigned to the agent that runs a stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentProfile {
    pub role: String,
    pub goal: String,
    pub backstory: String,
    /// Provider model identifier (e.g. `gpt-4o-mini`)
    pub model: String,
}

/// A callable an engine may expose to a stage's model
///
/// Tools report failures as data in their return value. An engine never
/// aborts a stage because a tool call went wrong.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    /// JSON schema describing the tool arguments
    fn parameters(&self) -> serde_json::Value;
    async fn call(&self, arguments: serde_json::Value) -> String;
}

/// One step of the pipeline
#[derive(Clone)]
pub struct StageNode {
    pub name: String,
    pub agent: AgentProfile,
    /// Rendered task prompt
    pub description: String,
    /// Human-readable contract for the output, not machine-validated
    pub expected_output: String,
    /// Upstream stages whose outputs are passed as context
    pub context: Vec<String>,
    pub tools: Vec<Arc<dyn Tool>>,
}

impl StageNode {
    pub fn new(
        name: impl Into<String>,
        agent: AgentProfile,
        description: impl Into<String>,
        expected_output: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            agent,
            description: description.into(),
            expected_output: expected_output.into(),
            context: Vec::new(),
            tools: Vec::new(),
        }
    }

    pub fn with_context<I, S>(mut self, upstream: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.context = upstream.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn find_tool(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }
}

impl fmt::Debug for StageNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StageNode")
            .field("name", &self.name)
            .field("agent", &self.agent)
            .field("description", &self.description)
            .field("expected_output", &self.expected_output)
            .field("context", &self.context)
            .field("tools", &self.tool_names())
            .finish()
    }
}

/// Ordered stage graph. Upstream references always point backwards.
#[derive(Debug, Clone, Default)]
pub struct StageGraph {
    nodes: Vec<StageNode>,
}

impl StageGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node, rejecting duplicate names and references to stages
    /// not added before it.
    pub fn add_stage(&mut self, node: StageNode) -> Result<&mut Self, EngineError> {
        if self.get(&node.name).is_some() {
            return Err(EngineError::DuplicateStage(node.name));
        }
        for upstream in &node.context {
            if self.get(upstream).is_none() {
                return Err(EngineError::UnknownUpstream {
                    stage: node.name.clone(),
                    upstream: upstream.clone(),
                });
            }
        }
        self.nodes.push(node);
        Ok(self)
    }

    /// Re-check the ordering invariant on an already built graph
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.nodes.is_empty() {
            return Err(EngineError::EmptyGraph);
        }
        let mut seen = HashSet::new();
        for node in &self.nodes {
            for upstream in &node.context {
                if !seen.contains(upstream.as_str()) {
                    return Err(EngineError::UnknownUpstream {
                        stage: node.name.clone(),
                        upstream: upstream.clone(),
                    });
                }
            }
            if !seen.insert(node.name.as_str()) {
                return Err(EngineError::DuplicateStage(node.name.clone()));
            }
        }
        Ok(())
    }

    pub fn nodes(&self) -> &[StageNode] {
        &self.nodes
    }

    pub fn get(&self, name: &str) -> Option<&StageNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Artifact produced by one stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageOutput {
    pub stage: String,
    pub raw: String,
}

/// Everything an engine returns for a completed graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineOutput {
    /// Output of the last stage
    pub final_output: String,
    /// Outputs of every stage in execution order
    pub stages: Vec<StageOutput>,
}

impl EngineOutput {
    /// Build from per-stage outputs; the final output is the last stage's.
    pub fn from_stages(stages: Vec<StageOutput>) -> Self {
        let final_output = stages.last().map(|s| s.raw.clone()).unwrap_or_default();
        Self {
            final_output,
            stages,
        }
    }

    pub fn stage(&self, name: &str) -> Option<&StageOutput> {
        self.stages.iter().find(|s| s.stage == name)
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("stage '{stage}' failed: {message}")]
    Stage { stage: String, message: String },

    #[error("stage '{stage}' references '{upstream}', which is not defined before it")]
    UnknownUpstream { stage: String, upstream: String },

    #[error("duplicate stage name '{0}'")]
    DuplicateStage(String),

    #[error("stage graph is empty")]
    EmptyGraph,
}

/// Runs a stage graph to completion in dependency order
///
/// Implementations block until every stage has finished. Any stage failure
/// fails the whole run; there is no partial result.
#[async_trait]
pub trait ExecutionEngine: Send + Sync {
    async fn execute(&self, graph: &StageGraph, inputs: &Inputs) -> Result<EngineOutput, EngineError>;
}
