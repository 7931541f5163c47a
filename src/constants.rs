//! Cross-cutting, shared constants.
//!
//! Component configs ([`crate::scoring::ScoringConfig`], [`crate::ranking::RankerConfig`],
//! [`crate::tasks::TaskRegistryConfig`]) default to these values; [`crate::config::Config`]
//! lets the environment override them.

/// Default weight of the visual (embedding cosine) component.
pub const DEFAULT_WEIGHT_VISUAL: f64 = 0.6;
/// Default weight of the attribute component.
pub const DEFAULT_WEIGHT_ATTRIBUTE: f64 = 0.2;
/// Default weight of the location component.
pub const DEFAULT_WEIGHT_LOCATION: f64 = 0.1;
/// Default weight of the time component.
pub const DEFAULT_WEIGHT_TIME: f64 = 0.1;

/// Minimum overall score for a candidate to survive ranking.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.6;

/// Distance at which the location score reaches zero.
pub const DEFAULT_MAX_DISTANCE_KM: f64 = 50.0;

/// Day gap at which the time score reaches zero.
pub const DEFAULT_MAX_DAYS: f64 = 30.0;

/// Maximum number of ranked comparisons kept by the matching pipeline.
pub const DEFAULT_MAX_RESULTS: usize = 5;

/// Maximum number of lost-pet candidates loaded per matching run.
pub const DEFAULT_CANDIDATE_LIMIT: usize = 1000;

/// Partial credit for coarse buckets (age, size) that disagree.
pub const BUCKET_MISMATCH_CREDIT: f64 = 0.5;

/// Size in bytes of one wire-format element (little-endian f32).
pub const F32_WIRE_BYTES: usize = 4;

/// Tolerance used when checking that normalized weights sum to one.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Mean Earth radius used by the haversine distance.
pub const EARTH_RADIUS_KM: f64 = 6371.0088;
