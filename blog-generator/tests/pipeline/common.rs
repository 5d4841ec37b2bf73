//! Common test utilities for pipeline tests

#![allow(dead_code)]

use async_trait::async_trait;
use blog_generator::{
    search::{SearchError, SearchProvider, SearchTool},
    BlogGenerator, BlogInput, GeneratorConfig, PromptSet,
};
use blog_generator_sdk::{
    EngineError, EngineOutput, ExecutionEngine, Inputs, StageGraph, StageOutput,
};
use serde_json::{json, Value};
use std::{
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

/// Prompt file shipped at the repository root
pub fn shipped_prompts() -> PromptSet {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../prompts.yaml");
    PromptSet::load_with_fallback(&path, &path).unwrap()
}

/// Configuration loaded from a path that does not exist
pub fn default_config() -> GeneratorConfig {
    GeneratorConfig::load("definitely/not/here/config.yaml")
}

pub fn config_without_analytics() -> GeneratorConfig {
    let mut config = default_config();
    config.output.generate_analytics = false;
    config
}

/// `{topic: "Local SEO Basics", intent: "informativo", word_count: 1500}`
pub fn local_seo_input() -> BlogInput {
    let fields = json!({
        "topic": "Local SEO Basics",
        "intent": "informativo",
        "word_count": 1500
    });
    BlogInput::from_fields(fields.as_object().cloned().unwrap()).unwrap()
}

pub fn files_in(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    files.sort();
    files
}

/// Returns "ARTIFACT" for every stage but the last, which returns "ARTICLE"
pub struct StubEngine {
    pub calls: AtomicUsize,
    pub contexts: Mutex<Vec<(String, Vec<String>)>>,
    pub inputs: Mutex<Option<Inputs>>,
}

impl StubEngine {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            contexts: Mutex::new(Vec::new()),
            inputs: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExecutionEngine for StubEngine {
    async fn execute(&self, graph: &StageGraph, inputs: &Inputs) -> Result<EngineOutput, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.inputs.lock().unwrap() = Some(inputs.clone());

        let last = graph.len() - 1;
        let mut stages = Vec::new();
        for (i, node) in graph.nodes().iter().enumerate() {
            self.contexts
                .lock()
                .unwrap()
                .push((node.name.clone(), node.context.clone()));
            stages.push(StageOutput {
                stage: node.name.clone(),
                raw: if i == last { "ARTICLE" } else { "ARTIFACT" }.to_string(),
            });
        }
        Ok(EngineOutput::from_stages(stages))
    }
}

/// Fails on the drafting stage
pub struct FailingEngine;

#[async_trait]
impl ExecutionEngine for FailingEngine {
    async fn execute(&self, _graph: &StageGraph, _inputs: &Inputs) -> Result<EngineOutput, EngineError> {
        Err(EngineError::Stage {
            stage: "drafting".to_string(),
            message: "provider returned 503: overloaded".to_string(),
        })
    }
}

/// Never finishes
pub struct PendingEngine;

#[async_trait]
impl ExecutionEngine for PendingEngine {
    async fn execute(&self, _graph: &StageGraph, _inputs: &Inputs) -> Result<EngineOutput, EngineError> {
        std::future::pending().await
    }
}

/// Search provider returning `count` canned results
pub struct StubSearch {
    pub count: usize,
    pub queries: Mutex<Vec<String>>,
}

impl StubSearch {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            queries: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl SearchProvider for StubSearch {
    async fn search(&self, query: &str, _max_results: usize) -> Result<Vec<Value>, SearchError> {
        self.queries.lock().unwrap().push(query.to_string());
        Ok((0..self.count)
            .map(|i| json!({"title": format!("Result {}", i), "url": format!("https://example.com/{}", i), "content": "..."}))
            .collect())
    }
}

pub fn search_tool() -> Arc<SearchTool> {
    Arc::new(SearchTool::new(Arc::new(StubSearch::new(2))))
}

pub fn generator(config: GeneratorConfig, engine: Arc<dyn ExecutionEngine>) -> BlogGenerator {
    BlogGenerator::new(config, shipped_prompts(), engine, search_tool())
}
