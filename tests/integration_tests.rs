//! Integration tests for the skill normalizer

use skill_normalizer::input::InputManager;
use skill_normalizer::normalizer::model::MatchOutcome;
use skill_normalizer::output::{save_report_to_file, NormalizationReport, ReportGenerator, ReportMetadata};
use skill_normalizer::{AliasTable, Config, MatchStrategy, SkillNormalizer, SkillNormalizerError};
use std::path::Path;

#[tokio::test]
async fn test_file_pipeline_end_to_end() {
    let mut manager = InputManager::new();
    let mentions = manager.load_mentions(Path::new("tests/fixtures/mentions.json")).await.unwrap();
    let vocabulary = manager.load_vocabulary(Path::new("tests/fixtures/vocabulary.json")).await.unwrap();
    let aliases = manager.load_aliases(Path::new("tests/fixtures/aliases.toml")).await.unwrap();

    let results = SkillNormalizer::new().normalize(&mentions, &vocabulary, &aliases);
    assert_eq!(results.len(), mentions.len());

    let labels: Vec<&str> = results.iter().map(|r| r.input_label.as_str()).collect();
    assert_eq!(labels, vec!["Node.js", "Pyt hon", "Quantum Computing", "ACAD", "excel"]);

    assert_eq!(results[0].reference_id(), Some("s1"));
    assert_eq!(results[0].strategy(), Some(MatchStrategy::Alias));
    assert_eq!(results[1].reference_id(), Some("s2"));
    assert_eq!(results[1].strategy(), Some(MatchStrategy::Fuzzy));
    assert_eq!(results[1].similarity_score(), Some(6.0 / 7.0));
    assert!(!results[2].is_matched());
    assert_eq!(results[3].reference_id(), Some("s3"));
    assert_eq!(results[3].proficiency(), 10);
    assert_eq!(results[4].strategy(), Some(MatchStrategy::Exact));

    match &results[4].outcome {
        MatchOutcome::Matched { sector, proficiency, .. } => {
            assert_eq!(sector, "General");
            assert_eq!(*proficiency, 5);
        }
        other => panic!("expected a match, got {:?}", other),
    }
}

#[tokio::test]
async fn test_toml_and_json_vocabularies_agree() {
    let mut manager = InputManager::new().with_defaults("Unclassified", 5);
    let from_json = manager.load_vocabulary(Path::new("tests/fixtures/vocabulary.json")).await.unwrap();
    let from_toml = manager.load_vocabulary(Path::new("tests/fixtures/vocabulary.toml")).await.unwrap();

    // The JSON fixture carries one extra blank entry
    assert_eq!(from_json.len(), from_toml.len() + 1);
    assert_eq!(from_json[..4], from_toml[..]);
    assert_eq!(from_toml[3].sector, "Unclassified");
}

#[tokio::test]
async fn test_mentions_from_model_response_text() {
    let mut manager = InputManager::new();
    let mentions = manager.load_mentions(Path::new("tests/fixtures/llm_response.txt")).await.unwrap();
    assert_eq!(mentions.len(), 3);
    assert_eq!(mentions[1].label, "Pyt hon");
    assert_eq!(mentions[1].proficiency, 6);
}

#[tokio::test]
async fn test_invalid_request_degrades_to_unmatched() {
    let mut manager = InputManager::new();
    let request = manager.load_request(Path::new("tests/fixtures/request_invalid.json")).await.unwrap();

    let normalizer = SkillNormalizer::new();
    let err = normalizer.normalize_request(&request, &AliasTable::new()).unwrap_err();
    assert!(err.is_invalid_input());

    let results = normalizer.normalize_or_unmatched(&request, &AliasTable::new());
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| !r.is_matched()));
    assert_eq!(results[1].input_label, "Excel");
}

#[tokio::test]
async fn test_caching_functionality() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/vocabulary.json");

    let first = manager.load_vocabulary(path).await.unwrap();
    assert_eq!(manager.cache_size(), 1);

    let second = manager.load_vocabulary(path).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(manager.cache_size(), 1);

    manager.clear_cache();
    assert_eq!(manager.cache_size(), 0);
}

#[tokio::test]
async fn test_unsupported_file_type() {
    let mut manager = InputManager::new();
    let result = manager.load_vocabulary(Path::new("tests/fixtures/unsupported.xyz")).await;
    assert!(matches!(result, Err(SkillNormalizerError::UnsupportedFormat(_))));
}

#[tokio::test]
async fn test_nonexistent_file() {
    let mut manager = InputManager::new();
    let result = manager.load_mentions(Path::new("tests/fixtures/nonexistent.json")).await;
    assert!(matches!(result, Err(SkillNormalizerError::InvalidInput(_))));
}

#[test]
fn test_concurrent_normalization_on_shared_vocabulary() {
    use skill_normalizer::{RawSkillMention, ReferenceSkill};
    use std::sync::Arc;
    use std::thread;

    let vocabulary = Arc::new(vec![
        ReferenceSkill::new("s1", "Node"),
        ReferenceSkill::new("s2", "Python"),
    ]);
    let aliases = Arc::new(Config::default().aliases);
    let expected = SkillNormalizer::new().normalize(
        &[RawSkillMention::new("nodejs", 7), RawSkillMention::new("pythn", 4)],
        &vocabulary,
        &aliases,
    );

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let vocabulary = Arc::clone(&vocabulary);
            let aliases = Arc::clone(&aliases);
            thread::spawn(move || {
                SkillNormalizer::new().normalize(
                    &[RawSkillMention::new("nodejs", 7), RawSkillMention::new("pythn", 4)],
                    &vocabulary,
                    &aliases,
                )
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
    assert_eq!(expected[0].strategy(), Some(MatchStrategy::Alias));
}

#[tokio::test]
async fn test_report_saved_to_disk() {
    let mut manager = InputManager::new();
    let mentions = manager.load_mentions(Path::new("tests/fixtures/mentions.json")).await.unwrap();
    let vocabulary = manager.load_vocabulary(Path::new("tests/fixtures/vocabulary.json")).await.unwrap();
    let results = SkillNormalizer::new().normalize(&mentions, &vocabulary, &AliasTable::new());

    let report = NormalizationReport::new(results, ReportMetadata::new("mentions.json", "vocabulary.json"));
    let rendered = ReportGenerator::with_options(false, false, true, true, true)
        .generate_report(&report, &skill_normalizer::config::OutputFormat::Json)
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out").join("report.json");
    save_report_to_file(&rendered, &path).unwrap();

    let saved: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(saved["summary"]["total"], 5);
}
