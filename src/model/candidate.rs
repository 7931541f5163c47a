use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::attributes::Attributes;
use super::geo::GeoPoint;
use super::vector::{FeatureVector, VectorError};

/// Decoded scoring input for one pet report.
#[derive(Debug, Clone, PartialEq)]
pub struct PetProfile {
    pub feature_vector: FeatureVector,
    pub attributes: Option<Attributes>,
    pub geo_point: Option<GeoPoint>,
    pub observed_date: Option<NaiveDate>,
}

impl PetProfile {
    pub fn new(feature_vector: impl Into<FeatureVector>) -> Self {
        Self {
            feature_vector: feature_vector.into(),
            attributes: None,
            geo_point: None,
            observed_date: None,
        }
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = Some(attributes);
        self
    }

    pub fn with_geo_point(mut self, point: GeoPoint) -> Self {
        self.geo_point = Some(point);
        self
    }

    pub fn with_observed_date(mut self, date: NaiveDate) -> Self {
        self.observed_date = Some(date);
        self
    }
}

/// A pet report as supplied by the caller: the embedding is still in wire format.
///
/// The core never mutates a candidate; decoding produces a separate [`PetProfile`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: Uuid,
    #[serde(default)]
    pub embedding: Vec<u8>,
    #[serde(default)]
    pub attributes: Option<Attributes>,
    #[serde(default)]
    pub geo_point: Option<GeoPoint>,
    #[serde(default)]
    pub observed_date: Option<NaiveDate>,
}

impl Candidate {
    pub fn new(id: Uuid, embedding: Vec<u8>) -> Self {
        Self {
            id,
            embedding,
            attributes: None,
            geo_point: None,
            observed_date: None,
        }
    }

    /// Builds a candidate from an already-decoded vector.
    pub fn from_vector(id: Uuid, vector: &FeatureVector) -> Self {
        Self::new(id, vector.to_le_bytes())
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = Some(attributes);
        self
    }

    pub fn with_geo_point(mut self, point: GeoPoint) -> Self {
        self.geo_point = Some(point);
        self
    }

    pub fn with_observed_date(mut self, date: NaiveDate) -> Self {
        self.observed_date = Some(date);
        self
    }

    /// Species as reported by the extractor, if any.
    pub fn species(&self) -> Option<&str> {
        self.attributes.as_ref().and_then(|a| a.species.as_deref())
    }

    /// Decodes the embedding. With `dim = Some(d)` the vector must have exactly `d` elements.
    pub fn decode(&self, dim: Option<usize>) -> Result<PetProfile, VectorError> {
        let feature_vector = match dim {
            Some(d) => FeatureVector::from_le_bytes_with_dim(&self.embedding, d)?,
            None => FeatureVector::from_le_bytes(&self.embedding)?,
        };

        Ok(PetProfile {
            feature_vector,
            attributes: self.attributes.clone(),
            geo_point: self.geo_point,
            observed_date: self.observed_date,
        })
    }
}
