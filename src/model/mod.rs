//! Data model shared by scoring, ranking and the matching pipeline.
//!
//! - [`FeatureVector`] is the decoded embedding; [`Candidate`] keeps it in wire format
//!   (flat little-endian f32) until the ranker decodes it.
//! - [`Attributes`] is the structured attribute map produced by the feature extractor.

pub mod attributes;
pub mod candidate;
pub mod geo;
pub mod vector;


pub use attributes::{AgeBucket, Attributes, BreedGuess, ColorGuess, SizeBucket};
pub use candidate::{Candidate, PetProfile};
pub use geo::{GeoDistance, GeoPoint, Haversine};
pub use vector::{FeatureVector, VectorError, cosine_similarity};
