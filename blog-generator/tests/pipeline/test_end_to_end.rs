//! End-to-end runs with a stub execution engine

use super::common::*;
use blog_generator::{persistence::ResultWriter, Stage};
use std::sync::Arc;

#[tokio::test]
async fn test_local_seo_basics_run_and_save() {
    let dir = tempfile::tempdir().unwrap();
    let engine = Arc::new(StubEngine::new());
    let generator = generator(default_config(), engine.clone());
    let input = local_seo_input();

    let result = generator.run(&input).await.unwrap();

    assert_eq!(result.result, "ARTICLE");
    assert_eq!(result.analytics.as_ref().unwrap().status, "completed");
    assert_eq!(engine.calls(), 1);

    let writer = ResultWriter::new(dir.path(), generator.config().output_config());
    let path = writer.save_final(&result, &input).await.unwrap();

    let name = path.file_name().unwrap().to_str().unwrap();
    let timestamp = name
        .strip_prefix("blog_local_seo_basics_")
        .and_then(|rest| rest.strip_suffix(".md"))
        .unwrap();
    assert_eq!(timestamp.len(), "20250101_120000".len());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "ARTICLE");
}

#[tokio::test]
async fn test_run_and_save_writes_every_file() {
    let dir = tempfile::tempdir().unwrap();
    let generator = generator(default_config(), Arc::new(StubEngine::new()));
    let input = local_seo_input();
    let writer = ResultWriter::new(dir.path(), generator.config().output_config())
        .with_timestamp("20250101_120000");

    let (result, saved) = generator.run_and_save(&input, &writer).await.unwrap();

    assert_eq!(result.result, "ARTICLE");
    assert_eq!(
        saved.article,
        dir.path().join("blog_local_seo_basics_20250101_120000.md")
    );
    assert_eq!(std::fs::read_to_string(&saved.article).unwrap(), "ARTICLE");
    assert_eq!(
        saved.analytics.as_deref(),
        Some(dir.path().join("blog_local_seo_basics_20250101_120000_analytics.json").as_path())
    );
    assert_eq!(saved.intermediate.len(), Stage::ALL.len());
    assert_eq!(files_in(dir.path()).len(), Stage::ALL.len() + 2);
}

#[tokio::test]
async fn test_analytics_file_next_to_article() {
    let dir = tempfile::tempdir().unwrap();
    let generator = generator(default_config(), Arc::new(StubEngine::new()));
    let input = local_seo_input();

    let result = generator.run(&input).await.unwrap();
    let writer = ResultWriter::new(dir.path(), generator.config().output_config());
    let path = writer.save_final(&result, &input).await.unwrap();
    let analytics_path = writer
        .save_analytics(result.analytics.as_ref(), &path)
        .await
        .unwrap()
        .unwrap();

    let stem = path.file_stem().unwrap().to_str().unwrap();
    assert_eq!(
        analytics_path.file_name().unwrap().to_str().unwrap(),
        format!("{}_analytics.json", stem)
    );

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&analytics_path).unwrap()).unwrap();
    assert_eq!(report["status"], "completed");
    assert_eq!(report["input_config"]["topic"], "Local SEO Basics");
    assert_eq!(report["input_config"]["word_count"], 1500);
    assert_eq!(report["models_used"]["research"], "gpt-4o-mini");
    assert_eq!(report["models_used"]["optimization"], "gpt-4o");
    assert_eq!(report["seo_config"]["readability_target"], 65.0);
    assert!(report["execution_time_seconds"].is_number());
}

#[tokio::test]
async fn test_analytics_disabled_writes_no_report() {
    let dir = tempfile::tempdir().unwrap();
    let generator = generator(config_without_analytics(), Arc::new(StubEngine::new()));
    let input = local_seo_input();

    let result = generator.run(&input).await.unwrap();
    assert!(result.analytics.is_none());
    assert!(generator.generate_analytics_report(&input, 1.0).is_none());

    let writer = ResultWriter::new(dir.path(), generator.config().output_config());
    let path = writer.save_final(&result, &input).await.unwrap();
    let saved = writer
        .save_analytics(result.analytics.as_ref(), &path)
        .await
        .unwrap();

    assert!(saved.is_none());
    assert_eq!(files_in(dir.path()), vec![path]);
}

#[tokio::test]
async fn test_engine_receives_accumulating_context() {
    let engine = Arc::new(StubEngine::new());
    let generator = generator(default_config(), engine.clone());

    generator.run(&local_seo_input()).await.unwrap();

    let contexts = engine.contexts.lock().unwrap();
    let names: Vec<&str> = Stage::ALL.iter().map(|s| s.as_str()).collect();
    assert_eq!(contexts.len(), 5);
    for (k, (stage, context)) in contexts.iter().enumerate() {
        assert_eq!(stage, names[k]);
        assert_eq!(context, &names[..k]);
    }
}

#[tokio::test]
async fn test_engine_receives_flat_input_mapping() {
    let engine = Arc::new(StubEngine::new());
    let generator = generator(default_config(), engine.clone());

    generator.run(&local_seo_input()).await.unwrap();

    let inputs = engine.inputs.lock().unwrap().clone().unwrap();
    assert_eq!(inputs["topic"], "Local SEO Basics");
    assert_eq!(inputs["intent"], "informativo");
    assert_eq!(inputs["word_count"], 1500);
    assert_eq!(inputs["target_audience"], "pubblico generale");
}

#[tokio::test]
async fn test_intermediate_results_saved_per_stage() {
    let dir = tempfile::tempdir().unwrap();
    let generator = generator(default_config(), Arc::new(StubEngine::new()));
    let input = local_seo_input();

    let result = generator.run(&input).await.unwrap();
    let writer = ResultWriter::new(dir.path(), generator.config().output_config());
    let written = writer.save_intermediate(&result.stages, &input).await;

    assert_eq!(written.len(), 5);
    for (path, stage) in written.iter().zip(Stage::ALL) {
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with(&format!("intermediate_{}_local_seo_basics_", stage)));
        assert!(name.ends_with(".json"));
    }
    let drafting: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&written[3]).unwrap()).unwrap();
    assert_eq!(drafting, serde_json::json!("ARTIFACT"));
}
