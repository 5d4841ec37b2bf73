//! Failure handling: nothing runs or persists after a fatal error

use super::common::*;
use blog_generator::{persistence::ResultWriter, BlogInput, GeneratorError};
use blog_generator_sdk::EngineError;
use std::{sync::Arc, time::Duration};

#[tokio::test]
async fn test_empty_topic_aborts_before_engine() {
    let engine = Arc::new(StubEngine::new());
    let generator = generator(default_config(), engine.clone());

    let err = generator.run(&BlogInput::new("   ")).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<GeneratorError>(),
        Some(GeneratorError::InvalidInput("topic"))
    ));
    assert_eq!(engine.calls(), 0);
}

#[tokio::test]
async fn test_stage_failure_fails_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let generator = generator(default_config(), Arc::new(FailingEngine));

    let err = generator.run(&local_seo_input()).await.unwrap_err();

    match err.downcast_ref::<GeneratorError>() {
        Some(GeneratorError::Engine(EngineError::Stage { stage, .. })) => {
            assert_eq!(stage, "drafting")
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(err.to_string().contains("overloaded"));
    assert!(files_in(dir.path()).is_empty());
}

#[tokio::test]
async fn test_interrupted_run_leaves_no_article() {
    let dir = tempfile::tempdir().unwrap();
    let generator = generator(default_config(), Arc::new(PendingEngine));
    let writer = ResultWriter::new(dir.path(), generator.config().output_config());

    let outcome = tokio::time::timeout(
        Duration::from_millis(50),
        generator.run_and_save(&local_seo_input(), &writer),
    )
    .await;

    assert!(outcome.is_err());
    assert!(files_in(dir.path()).is_empty());
}

#[tokio::test]
async fn test_failed_run_saves_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("articles");
    let generator = generator(default_config(), Arc::new(FailingEngine));
    let writer = ResultWriter::new(&out, generator.config().output_config());

    let err = generator
        .run_and_save(&local_seo_input(), &writer)
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<GeneratorError>(),
        Some(GeneratorError::Engine(_))
    ));
    assert!(!out.exists());
}

#[tokio::test]
async fn test_missing_prompt_files_are_fatal() {
    let dir = tempfile::tempdir().unwrap();

    let err = blog_generator::PromptSet::load_with_fallback(
        dir.path().join("custom_prompts.yaml"),
        dir.path().join("prompts.yaml"),
    )
    .unwrap_err();

    assert!(matches!(err, GeneratorError::PromptLoad(_)));
}
