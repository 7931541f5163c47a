use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use super::*;
use crate::extraction::{ExtractedFeatures, ExtractionError, MockFeatureExtractor};
use crate::ledger::{MatchLedger, MatchStatus, UpsertAction};
use crate::model::{AgeBucket, Attributes, Candidate, FeatureVector, SizeBucket};
use crate::ranking::MatchRanker;
use crate::tasks::{BackgroundTask, TaskRegistry, TaskStatus};

fn dog(values: &[f32], color: &str) -> Candidate {
    Candidate::from_vector(Uuid::new_v4(), &FeatureVector::new(values.to_vec())).with_attributes(
        Attributes::default()
            .with_species("dog")
            .with_breed("Labrador Retriever", 0.9)
            .with_colors([color])
            .with_age(AgeBucket::Adult)
            .with_size(SizeBucket::Large),
    )
}

fn cat(values: &[f32]) -> Candidate {
    Candidate::from_vector(Uuid::new_v4(), &FeatureVector::new(values.to_vec()))
        .with_attributes(Attributes::default().with_species("cat"))
}

struct Fixture {
    pipeline: Arc<MatchPipeline>,
    source: Arc<InMemoryCandidateSource>,
    found: Candidate,
    close: Candidate,
    far: Candidate,
}

fn fixture() -> Fixture {
    let source = Arc::new(InMemoryCandidateSource::new());
    let found = dog(&[1.0, 0.0, 0.0], "black");
    let close = dog(&[0.95, 0.05, 0.0], "black");
    let far = dog(&[0.0, 1.0, 0.0], "white");
    source.insert_found(found.clone());
    source.insert_lost(close.clone());
    source.insert_lost(far.clone());
    source.insert_lost(cat(&[1.0, 0.0, 0.0]));

    let pipeline = MatchPipeline::new(
        MatchRanker::new(),
        Arc::new(MatchLedger::new()),
        source.clone(),
    );
    Fixture {
        pipeline: Arc::new(pipeline),
        source,
        found,
        close,
        far,
    }
}

async fn wait_terminal(registry: &TaskRegistry, id: &str) -> BackgroundTask {
    for _ in 0..500 {
        if let Some(task) = registry.get_status(id).into_option()
            && task.status.is_terminal()
        {
            return task;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("task {id} did not finish");
}

#[test]
fn test_find_matches_upserts_pending_records() {
    let f = fixture();

    let outcomes = f
        .pipeline
        .find_matches_for_found_pet(f.found.id)
        .unwrap();

    assert_eq!(outcomes.len(), 1);
    let record = &outcomes[0].record;
    assert_eq!(outcomes[0].action, UpsertAction::Created);
    assert_eq!(record.lost_pet_id, f.close.id);
    assert_eq!(record.found_pet_id, f.found.id);
    assert_eq!(record.status, MatchStatus::Pending);
    assert!(record.matching_features.contains(&"color:black".to_string()));
    assert!(f.pipeline.ledger().get_by_pet_ids(f.far.id, f.found.id).is_none());
    assert_eq!(f.pipeline.ledger().len(), 1);
}

#[test]
fn test_find_matches_rerun_is_unchanged() {
    let f = fixture();

    f.pipeline.find_matches_for_found_pet(f.found.id).unwrap();
    let again = f.pipeline.find_matches_for_found_pet(f.found.id).unwrap();

    assert_eq!(again.len(), 1);
    assert_eq!(again[0].action, UpsertAction::Unchanged);
    assert_eq!(f.pipeline.ledger().len(), 1);
}

#[test]
fn test_find_matches_only_compares_same_species() {
    let f = fixture();
    let lost_cats = f.source.lost_candidates(Some("CAT"), 10).unwrap();
    assert_eq!(lost_cats.len(), 1);
    assert_eq!(f.source.lost_candidates(None, 2).unwrap().len(), 2);
    assert_eq!(f.source.lost_count(), 3);
}

#[test]
fn test_unknown_found_pet() {
    let f = fixture();
    let id = Uuid::new_v4();

    let err = f.pipeline.find_matches_for_found_pet(id).unwrap_err();
    assert_eq!(err, PipelineError::FoundPetNotFound { id });
}

#[test]
fn test_no_candidates_is_empty_not_error() {
    let source = Arc::new(InMemoryCandidateSource::new());
    let found = cat(&[1.0, 0.0]);
    source.insert_found(found.clone());
    let pipeline = MatchPipeline::new(MatchRanker::new(), Arc::new(MatchLedger::new()), source);

    assert!(pipeline.find_matches_for_found_pet(found.id).unwrap().is_empty());
}

#[test]
fn test_found_pet_without_embedding_is_ranking_error() {
    let f = fixture();
    let broken = Candidate::new(Uuid::new_v4(), Vec::new())
        .with_attributes(Attributes::default().with_species("dog"));
    f.source.insert_found(broken.clone());

    let err = f.pipeline.find_matches_for_found_pet(broken.id).unwrap_err();
    assert!(matches!(err, PipelineError::Ranking(_)));
}

#[tokio::test]
async fn test_submit_find_matches_completes_with_summary() {
    let f = fixture();
    let registry = TaskRegistry::default();

    let task_id = f.pipeline.submit_find_matches(&registry, f.found.id).unwrap();
    assert_eq!(task_id, format!("find_matches_{}", f.found.id));

    let task = wait_terminal(&registry, &task_id).await;
    assert_eq!(task.status, TaskStatus::Completed);
    let summary = task.result_summary.unwrap();
    assert_eq!(summary["matches_found"], 1);
    assert_eq!(summary["created"], 1);
    assert_eq!(summary["improved"], 0);
}

#[tokio::test]
async fn test_submit_find_matches_unknown_pet_fails_task() {
    let f = fixture();
    let registry = TaskRegistry::default();

    let task_id = f
        .pipeline
        .submit_find_matches(&registry, Uuid::new_v4())
        .unwrap();

    let task = wait_terminal(&registry, &task_id).await;
    assert_eq!(task.status, TaskStatus::Failed);
    assert!(task.error.unwrap().contains("found pet not found"));
}

#[tokio::test]
async fn test_photo_processing_reports_features() {
    let features = ExtractedFeatures {
        species: "dog".to_string(),
        attributes: Attributes::default().with_breed("Beagle", 0.8),
        feature_vector: FeatureVector::new(vec![0.1; 8]),
    };
    let extractor = MockFeatureExtractor::new().with_features(b"beagle.jpg".to_vec(), features);
    let f = fixture();
    let pipeline = MatchPipeline::new(MatchRanker::new(), Arc::new(MatchLedger::new()), f.source)
        .with_extractor(Arc::new(extractor));
    let registry = TaskRegistry::default();

    let task_id = pipeline
        .submit_photo_processing(&registry, "42", b"beagle.jpg".to_vec())
        .unwrap();
    assert_eq!(task_id, "proc_photo_42");

    let task = wait_terminal(&registry, &task_id).await;
    assert_eq!(task.status, TaskStatus::Completed);
    let summary = task.result_summary.unwrap();
    assert_eq!(summary["species"], "dog");
    assert_eq!(summary["feature_dim"], 8);
    assert_eq!(summary["attributes"]["breed"]["name"], "Beagle");
}

#[tokio::test]
async fn test_photo_without_pet_fails_task() {
    let f = fixture();
    let extractor = Arc::new(MockFeatureExtractor::new());
    let pipeline = MatchPipeline::new(MatchRanker::new(), Arc::new(MatchLedger::new()), f.source)
        .with_extractor(extractor.clone());
    let registry = TaskRegistry::default();

    let task_id = pipeline
        .submit_photo_processing(&registry, "7", b"empty-yard.jpg".to_vec())
        .unwrap();

    let task = wait_terminal(&registry, &task_id).await;
    assert_eq!(task.status, TaskStatus::Failed);
    assert!(task.error.unwrap().contains("no pet detected"));
    assert_eq!(extractor.call_count(), 1);
}

#[tokio::test]
async fn test_extract_pet_propagates_model_error() {
    let extractor = MockFeatureExtractor::new()
        .with_error(b"corrupt".to_vec(), ExtractionError::Model("bad tensor".to_string()));

    let err = extract_pet(&extractor, "9", b"corrupt").await.unwrap_err();
    assert_eq!(
        err,
        PipelineError::Extraction(ExtractionError::Model("bad tensor".to_string()))
    );

    let err = extract_pet(&extractor, "9", b"").await.unwrap_err();
    assert_eq!(err, PipelineError::Extraction(ExtractionError::EmptyImage));
}

#[test]
fn test_photo_processing_requires_extractor() {
    let f = fixture();
    let registry = TaskRegistry::default();

    let err = f
        .pipeline
        .submit_photo_processing(&registry, "1", vec![1, 2, 3])
        .unwrap_err();
    assert_eq!(err, PipelineError::ExtractorUnavailable);
    assert!(registry.is_empty());
}
