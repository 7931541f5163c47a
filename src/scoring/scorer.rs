use chrono::NaiveDate;
use tracing::debug;

use crate::constants::{BUCKET_MISMATCH_CREDIT, DEFAULT_MAX_DAYS, DEFAULT_MAX_DISTANCE_KM};
use crate::model::{Attributes, GeoDistance, GeoPoint, Haversine, PetProfile, cosine_similarity};

use super::types::{ComparisonResult, FeatureWeights, UnusableReason, WeightVector};

/// Scoring parameters. See [`crate::config::Config::scoring_config`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    /// Weights substituted for components the caller leaves unset.
    pub default_weights: WeightVector,
    /// Distance (km) at which the location score reaches zero.
    pub max_distance_km: f64,
    /// Day gap at which the time score reaches zero.
    pub max_days: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            default_weights: WeightVector::default(),
            max_distance_km: DEFAULT_MAX_DISTANCE_KM,
            max_days: DEFAULT_MAX_DAYS,
        }
    }
}

/// Four-component similarity between two pet reports.
///
/// Stateless apart from its configuration; `compare` is pure and can be called from any
/// thread concurrently.
#[derive(Debug, Clone)]
pub struct SimilarityScorer<D: GeoDistance = Haversine> {
    config: ScoringConfig,
    distance: D,
}

impl SimilarityScorer<Haversine> {
    pub fn new() -> Self {
        Self::with_config(ScoringConfig::default())
    }

    pub fn with_config(config: ScoringConfig) -> Self {
        Self {
            config,
            distance: Haversine,
        }
    }
}

impl Default for SimilarityScorer<Haversine> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: GeoDistance> SimilarityScorer<D> {
    /// Uses a custom geodesic distance implementation.
    pub fn with_distance(config: ScoringConfig, distance: D) -> Self {
        Self { config, distance }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Fills and normalizes `weights` against the configured defaults.
    pub fn normalize_weights(&self, weights: &FeatureWeights) -> WeightVector {
        weights.normalize(&self.config.default_weights)
    }

    /// Compares `source` against `candidate`, normalizing `weights` first.
    pub fn compare(
        &self,
        source: &PetProfile,
        candidate: &PetProfile,
        weights: &FeatureWeights,
    ) -> ComparisonResult {
        let weights = self.normalize_weights(weights);
        self.compare_normalized(source, candidate, &weights)
    }

    /// Compares with weights that are already normalized.
    ///
    /// A dimension mismatch yields an all-zero result flagged unusable. Every other missing
    /// input just zeroes its own component.
    pub fn compare_normalized(
        &self,
        source: &PetProfile,
        candidate: &PetProfile,
        weights: &WeightVector,
    ) -> ComparisonResult {
        let source_dim = source.feature_vector.dim();
        let candidate_dim = candidate.feature_vector.dim();
        if source_dim != candidate_dim {
            debug!(source_dim, candidate_dim, "Feature dimension mismatch");
            return ComparisonResult::unusable(UnusableReason::DimensionMismatch {
                source_dim,
                candidate_dim,
            });
        }

        let visual = visual_score(
            source.feature_vector.as_slice(),
            candidate.feature_vector.as_slice(),
        );
        let attribute = attribute_score(source.attributes.as_ref(), candidate.attributes.as_ref());
        let location = self.location_score(source.geo_point, candidate.geo_point);
        let time = self.time_score(source.observed_date, candidate.observed_date);

        let overall = weights.visual * visual
            + weights.attribute * attribute
            + weights.location * location
            + weights.time * time;

        ComparisonResult {
            visual,
            attribute,
            location,
            time,
            overall: overall.clamp(0.0, 1.0),
            unusable: None,
        }
    }

    fn location_score(&self, a: Option<GeoPoint>, b: Option<GeoPoint>) -> f64 {
        let (Some(a), Some(b)) = (a, b) else {
            return 0.0;
        };
        if !a.is_valid() || !b.is_valid() {
            debug!(?a, ?b, "Ignoring invalid coordinates");
            return 0.0;
        }

        let distance = self.distance.distance_km(a, b);
        if !distance.is_finite() {
            return 0.0;
        }
        (1.0 - distance / self.config.max_distance_km).max(0.0)
    }

    fn time_score(&self, a: Option<NaiveDate>, b: Option<NaiveDate>) -> f64 {
        let (Some(a), Some(b)) = (a, b) else {
            return 0.0;
        };

        let days = a.signed_duration_since(b).num_days().abs() as f64;
        (1.0 - days / self.config.max_days).max(0.0)
    }
}

/// Cosine similarity clipped to `[0, 1]`; anti-correlated vectors count as unrelated.
pub fn visual_score(a: &[f32], b: &[f32]) -> f64 {
    cosine_similarity(a, b).clamp(0.0, 1.0)
}

/// Mean of the facet scores present on both sides; `0.0` when no facet is shared.
pub fn attribute_score(a: Option<&Attributes>, b: Option<&Attributes>) -> f64 {
    let (Some(a), Some(b)) = (a, b) else {
        return 0.0;
    };

    let mut total = 0.0;
    let mut count = 0usize;

    if let (Some(ba), Some(bb)) = (&a.breed, &b.breed) {
        total += if ba.name == bb.name { 1.0 } else { 0.0 };
        count += 1;
    }

    if let (Some(ca), Some(cb)) = (&a.colors, &b.colors) {
        let any_shared = ca.iter().any(|x| cb.iter().any(|y| x.name == y.name));
        total += if any_shared { 1.0 } else { 0.0 };
        count += 1;
    }

    if let (Some(aa), Some(ab)) = (a.estimated_age, b.estimated_age) {
        total += if aa == ab { 1.0 } else { BUCKET_MISMATCH_CREDIT };
        count += 1;
    }

    if let (Some(sa), Some(sb)) = (a.estimated_size, b.estimated_size) {
        total += if sa == sb { 1.0 } else { BUCKET_MISMATCH_CREDIT };
        count += 1;
    }

    if count == 0 { 0.0 } else { total / count as f64 }
}

/// Facets on which both sides agree exactly, e.g. `"breed:Labrador Retriever"`.
///
/// Order is breed, colors (source order), age, size.
pub fn matching_features(a: Option<&Attributes>, b: Option<&Attributes>) -> Vec<String> {
    let (Some(a), Some(b)) = (a, b) else {
        return Vec::new();
    };

    let mut features = Vec::new();

    if let (Some(ba), Some(bb)) = (&a.breed, &b.breed)
        && ba.name == bb.name
    {
        features.push(format!("breed:{}", ba.name));
    }

    if let (Some(ca), Some(cb)) = (&a.colors, &b.colors) {
        for color in ca.iter().filter(|x| cb.iter().any(|y| x.name == y.name)) {
            let feature = format!("color:{}", color.name);
            if !features.contains(&feature) {
                features.push(feature);
            }
        }
    }

    if let (Some(aa), Some(ab)) = (a.estimated_age, b.estimated_age)
        && aa == ab
    {
        features.push(format!("age:{aa}"));
    }

    if let (Some(sa), Some(sb)) = (a.estimated_size, b.estimated_size)
        && sa == sb
    {
        features.push(format!("size:{sa}"));
    }

    features
}
