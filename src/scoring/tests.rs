use chrono::NaiveDate;

use super::*;
use crate::model::{AgeBucket, Attributes, GeoDistance, GeoPoint, PetProfile, SizeBucket};

fn profile(values: &[f32]) -> PetProfile {
    PetProfile::new(values.to_vec())
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn labrador(color: &str) -> Attributes {
    Attributes::default()
        .with_breed("Labrador Retriever", 0.9)
        .with_colors([color])
        .with_age(AgeBucket::Adult)
        .with_size(SizeBucket::Large)
}

struct FixedDistance(f64);

impl GeoDistance for FixedDistance {
    fn distance_km(&self, _a: GeoPoint, _b: GeoPoint) -> f64 {
        self.0
    }
}

#[test]
fn test_normalized_weights_sum_to_one_for_any_subset() {
    let defaults = WeightVector::default();
    let cases = [
        FeatureWeights::default(),
        FeatureWeights::default().visual(3.0),
        FeatureWeights::default().attribute(0.7).time(0.9),
        FeatureWeights::default().visual(1.0).attribute(1.0).location(1.0).time(1.0),
        FeatureWeights::default().location(1e-6),
        FeatureWeights::default().visual(123.456).location(0.001),
    ];

    for weights in cases {
        let normalized = weights.normalize(&defaults);
        assert!(
            (normalized.sum() - 1.0).abs() <= 1e-9,
            "{weights:?} -> {normalized:?}"
        );
        assert!(normalized.is_normalized());
    }
}

#[test]
fn test_missing_weights_filled_from_defaults() {
    let normalized = FeatureWeights::default().normalize(&WeightVector::default());
    assert!((normalized.visual - 0.6).abs() < 1e-12);
    assert!((normalized.attribute - 0.2).abs() < 1e-12);
    assert!((normalized.location - 0.1).abs() < 1e-12);
    assert!((normalized.time - 0.1).abs() < 1e-12);

    // visual=0.2 + defaults 0.2/0.1/0.1 -> total 0.6
    let normalized = FeatureWeights::default()
        .visual(0.2)
        .normalize(&WeightVector::default());
    assert!((normalized.visual - 0.2 / 0.6).abs() < 1e-12);
    assert!((normalized.attribute - 0.2 / 0.6).abs() < 1e-12);
}

#[test]
fn test_all_zero_weights_fall_back_to_defaults() {
    let weights = FeatureWeights::default()
        .visual(0.0)
        .attribute(0.0)
        .location(0.0)
        .time(0.0);
    let normalized = weights.normalize(&WeightVector::default());
    assert!((normalized.visual - 0.6).abs() < 1e-12);
    assert!(normalized.is_normalized());
}

#[test]
fn test_negative_and_nan_weights_count_as_zero() {
    let weights = FeatureWeights::default()
        .visual(-1.0)
        .attribute(f64::NAN)
        .location(1.0)
        .time(1.0);
    let normalized = weights.normalize(&WeightVector::default());
    assert_eq!(normalized.visual, 0.0);
    assert_eq!(normalized.attribute, 0.0);
    assert!((normalized.location - 0.5).abs() < 1e-12);
}

#[test]
fn test_visual_self_similarity_is_one() {
    let scorer = SimilarityScorer::new();
    let a = profile(&[0.3, -1.2, 4.5, 0.0, 2.2]);
    let result = scorer.compare(&a, &a, &FeatureWeights::default());
    assert!((result.visual - 1.0).abs() < 1e-9);
    assert!(result.is_usable());
}

#[test]
fn test_visual_symmetric() {
    let scorer = SimilarityScorer::new();
    let a = profile(&[1.0, 2.0, 3.0, 4.0]);
    let b = profile(&[4.0, 1.0, 0.5, 2.0]);
    let w = FeatureWeights::default();

    let ab = scorer.compare(&a, &b, &w);
    let ba = scorer.compare(&b, &a, &w);
    assert!((ab.visual - ba.visual).abs() < 1e-12);
    assert!((ab.overall - ba.overall).abs() < 1e-12);
}

#[test]
fn test_overall_symmetric_with_all_components() {
    let scorer = SimilarityScorer::new();
    let a = profile(&[1.0, 0.5, 0.2])
        .with_attributes(labrador("black").with_age(AgeBucket::Young))
        .with_geo_point(GeoPoint::new(55.75, 37.61))
        .with_observed_date(date(2024, 5, 1));
    let b = profile(&[0.9, 0.6, 0.1])
        .with_attributes(labrador("black"))
        .with_geo_point(GeoPoint::new(55.80, 37.70))
        .with_observed_date(date(2024, 5, 9));
    let w = FeatureWeights::default();

    let ab = scorer.compare(&a, &b, &w);
    let ba = scorer.compare(&b, &a, &w);
    assert!((ab.overall - ba.overall).abs() < 1e-12);
    assert!((ab.attribute - ba.attribute).abs() < 1e-12);
}

#[test]
fn test_negative_cosine_clipped_to_zero() {
    let scorer = SimilarityScorer::new();
    let a = profile(&[1.0, 0.0]);
    let b = profile(&[-1.0, 0.0]);
    let result = scorer.compare(&a, &b, &FeatureWeights::default());
    assert_eq!(result.visual, 0.0);
    assert_eq!(result.overall, 0.0);
}

#[test]
fn test_dimension_mismatch_is_unusable_and_zero() {
    let scorer = SimilarityScorer::new();
    let a = profile(&[1.0, 2.0, 3.0]);
    let b = profile(&[1.0, 2.0]).with_attributes(labrador("black"));
    let result = scorer.compare(&a, &b, &FeatureWeights::default());

    assert!(!result.is_usable());
    assert_eq!(
        result.unusable,
        Some(UnusableReason::DimensionMismatch {
            source_dim: 3,
            candidate_dim: 2
        })
    );
    assert_eq!(result.overall, 0.0);
    assert_eq!(result.attribute, 0.0);
}

#[test]
fn test_attribute_score_three_of_four() {
    let a = labrador("black");
    let b = labrador("brown");
    let score = attribute_score(Some(&a), Some(&b));
    assert!((score - 0.75).abs() < 1e-12, "got {score}");
}

#[test]
fn test_attribute_score_bucket_partial_credit() {
    let a = Attributes::default()
        .with_age(AgeBucket::Young)
        .with_size(SizeBucket::Small);
    let b = Attributes::default()
        .with_age(AgeBucket::Senior)
        .with_size(SizeBucket::Small);
    let score = attribute_score(Some(&a), Some(&b));
    assert!((score - 0.75).abs() < 1e-12);
}

#[test]
fn test_attribute_score_only_shared_facets_count() {
    let a = Attributes::default().with_breed("Beagle", 0.5);
    let b = Attributes::default()
        .with_breed("Beagle", 0.7)
        .with_size(SizeBucket::Medium);
    assert_eq!(attribute_score(Some(&a), Some(&b)), 1.0);
}

#[test]
fn test_attribute_score_no_shared_facets_is_zero() {
    let a = Attributes::default().with_breed("Beagle", 0.5);
    let b = Attributes::default().with_size(SizeBucket::Medium);
    assert_eq!(attribute_score(Some(&a), Some(&b)), 0.0);
    assert_eq!(attribute_score(None, Some(&b)), 0.0);
    assert_eq!(attribute_score(None, None), 0.0);
}

#[test]
fn test_color_any_overlap_matches() {
    let a = Attributes::default().with_colors(["white", "brown"]);
    let b = Attributes::default().with_colors(["black", "brown"]);
    assert_eq!(attribute_score(Some(&a), Some(&b)), 1.0);
}

#[test]
fn test_location_score_linear_falloff() {
    let scorer = SimilarityScorer::with_distance(ScoringConfig::default(), FixedDistance(10.0));
    let a = profile(&[1.0]).with_geo_point(GeoPoint::new(0.0, 0.0));
    let b = profile(&[1.0]).with_geo_point(GeoPoint::new(0.1, 0.1));
    let result = scorer.compare(&a, &b, &FeatureWeights::default());
    assert!((result.location - 0.8).abs() < 1e-12);
}

#[test]
fn test_location_score_beyond_radius_is_zero() {
    let scorer = SimilarityScorer::with_distance(ScoringConfig::default(), FixedDistance(75.0));
    let a = profile(&[1.0]).with_geo_point(GeoPoint::new(0.0, 0.0));
    let b = profile(&[1.0]).with_geo_point(GeoPoint::new(1.0, 1.0));
    assert_eq!(scorer.compare(&a, &b, &FeatureWeights::default()).location, 0.0);
}

#[test]
fn test_location_absent_or_invalid_is_zero() {
    let scorer = SimilarityScorer::new();
    let a = profile(&[1.0]).with_geo_point(GeoPoint::new(0.0, 0.0));
    let b = profile(&[1.0]);
    assert_eq!(scorer.compare(&a, &b, &FeatureWeights::default()).location, 0.0);

    let c = profile(&[1.0]).with_geo_point(GeoPoint::new(120.0, 0.0));
    assert_eq!(scorer.compare(&a, &c, &FeatureWeights::default()).location, 0.0);
}

#[test]
fn test_time_score() {
    let scorer = SimilarityScorer::new();
    let a = profile(&[1.0]).with_observed_date(date(2024, 3, 1));
    let b = profile(&[1.0]).with_observed_date(date(2024, 3, 16));
    let result = scorer.compare(&a, &b, &FeatureWeights::default());
    assert!((result.time - 0.5).abs() < 1e-12);

    let c = profile(&[1.0]).with_observed_date(date(2024, 6, 1));
    assert_eq!(scorer.compare(&a, &c, &FeatureWeights::default()).time, 0.0);
    assert_eq!(
        scorer
            .compare(&a, &profile(&[1.0]), &FeatureWeights::default())
            .time,
        0.0
    );
}

#[test]
fn test_overall_is_weighted_sum() {
    let scorer = SimilarityScorer::new();
    let a = profile(&[1.0, 0.0])
        .with_attributes(labrador("black"))
        .with_observed_date(date(2024, 1, 1));
    let b = profile(&[1.0, 0.0])
        .with_attributes(labrador("brown"))
        .with_observed_date(date(2024, 1, 1));
    let result = scorer.compare(&a, &b, &FeatureWeights::default());

    // visual 1.0 * 0.6 + attribute 0.75 * 0.2 + location 0 * 0.1 + time 1.0 * 0.1
    assert!((result.overall - 0.85).abs() < 1e-9, "got {}", result.overall);
}

#[test]
fn test_custom_default_weights_from_config() {
    let config = ScoringConfig {
        default_weights: WeightVector {
            visual: 1.0,
            attribute: 0.0,
            location: 0.0,
            time: 0.0,
        },
        ..Default::default()
    };
    let scorer = SimilarityScorer::with_config(config);
    let a = profile(&[1.0, 1.0]);
    let result = scorer.compare(&a, &a, &FeatureWeights::default());
    assert!((result.overall - 1.0).abs() < 1e-9);
}

#[test]
fn test_matching_features_lists_exact_agreements() {
    let a = labrador("black").with_colors(["black", "white"]);
    let b = labrador("brown").with_colors(["white"]);
    assert_eq!(
        matching_features(Some(&a), Some(&b)),
        vec![
            "breed:Labrador Retriever".to_string(),
            "color:white".to_string(),
            "age:adult".to_string(),
            "size:large".to_string(),
        ]
    );
}

#[test]
fn test_matching_features_skips_partial_buckets() {
    let a = Attributes::default().with_age(AgeBucket::Young);
    let b = Attributes::default().with_age(AgeBucket::Adult);
    assert!(matching_features(Some(&a), Some(&b)).is_empty());
    assert!(matching_features(None, Some(&b)).is_empty());
}

#[test]
fn test_scoring_error_kind() {
    let err = ScoringError::DimensionMismatch {
        expected: 512,
        actual: 256,
    };
    assert_eq!(err.kind(), "dimension_mismatch");
    assert!(err.to_string().contains("512"));
}
