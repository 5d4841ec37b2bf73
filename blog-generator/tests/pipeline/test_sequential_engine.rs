//! The sequential engine driven through the real five-stage graph

use super::common::*;
use async_trait::async_trait;
use blog_generator::{
    engine::SequentialEngine,
    llm::{ChatMessage, ChatModel, ChatRequest, ChatResponse, FunctionCall, LlmError, Role, ToolCall},
    search::SearchTool,
    BlogGenerator,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

/// Calls `web_search` once when tools are offered, then answers every
/// request with a numbered output.
struct SearchingModel {
    requests: Mutex<Vec<ChatRequest>>,
}

#[async_trait]
impl ChatModel for SearchingModel {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, LlmError> {
        let searched = request.messages.iter().any(|m| m.role == Role::Tool);
        let wants_search = !request.tools.is_empty() && !searched;

        let mut requests = self.requests.lock().unwrap();
        let n = requests.len();
        requests.push(request);

        let message = if wants_search {
            ChatMessage {
                role: Role::Assistant,
                content: None,
                tool_calls: vec![ToolCall {
                    id: "call_search".to_string(),
                    kind: "function".to_string(),
                    function: FunctionCall {
                        name: "web_search".to_string(),
                        arguments: json!({"query": "local seo basics"}).to_string(),
                    },
                }],
                tool_call_id: None,
            }
        } else {
            ChatMessage::assistant(format!("output #{}", n))
        };

        Ok(ChatResponse {
            message,
            finish_reason: None,
            usage: None,
        })
    }
}

#[tokio::test]
async fn test_full_pipeline_with_tool_call() {
    let model = Arc::new(SearchingModel {
        requests: Mutex::new(Vec::new()),
    });
    let search = Arc::new(StubSearch::new(2));
    let generator = BlogGenerator::new(
        default_config(),
        shipped_prompts(),
        Arc::new(SequentialEngine::new(model.clone())),
        Arc::new(SearchTool::new(search.clone())),
    );

    let result = generator.run(&local_seo_input()).await.unwrap();

    // One tool-call round for research, then one answer per stage
    let requests = model.requests.lock().unwrap();
    assert_eq!(requests.len(), 6);
    assert_eq!(result.stages.len(), 5);
    assert_eq!(result.stages[0].raw, "output #1");
    assert_eq!(result.result, "output #5");
    assert_eq!(
        search.queries.lock().unwrap().as_slice(),
        &["local seo basics".to_string()]
    );

    // Search results were fed back as the tool message
    let tool_message = requests[1]
        .messages
        .iter()
        .find(|m| m.role == Role::Tool)
        .unwrap();
    let results: Value = serde_json::from_str(tool_message.content.as_deref().unwrap()).unwrap();
    assert_eq!(results.as_array().unwrap().len(), 2);

    // Only research is offered tools
    assert!(requests[2..].iter().all(|r| r.tools.is_empty()));

    // Models come from the configuration
    assert_eq!(requests[0].model, "gpt-4o-mini");
    assert_eq!(requests[5].model, "gpt-4o");
}

#[tokio::test]
async fn test_each_stage_sees_every_upstream_output() {
    let model = Arc::new(SearchingModel {
        requests: Mutex::new(Vec::new()),
    });
    let generator = BlogGenerator::new(
        default_config(),
        shipped_prompts(),
        Arc::new(SequentialEngine::new(model.clone())),
        search_tool(),
    );

    let result = generator.run(&local_seo_input()).await.unwrap();

    let requests = model.requests.lock().unwrap();
    // requests[1..] are the final calls of research..optimization
    let stage_requests = &requests[1..];
    for (k, request) in stage_requests.iter().enumerate() {
        let task = request.messages[1].content.clone().unwrap();
        assert!(task.contains("Local SEO Basics"));
        for upstream in &result.stages[..k] {
            assert!(
                task.contains(&format!("## {}\n{}", upstream.stage, upstream.raw)),
                "stage {} is missing {}",
                k,
                upstream.stage
            );
        }
        for downstream in &result.stages[k..] {
            assert!(!task.contains(&format!("## {}\n", downstream.stage)));
        }
    }
}
