//! Test fixtures for integration tests.

use chrono::NaiveDate;
use uuid::Uuid;

use petradar::model::{AgeBucket, Attributes, Candidate, FeatureVector, GeoPoint, SizeBucket};

pub const DOWNTOWN: GeoPoint = GeoPoint {
    latitude: 40.7128,
    longitude: -74.0060,
};

pub fn fixed_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

pub fn labrador_attributes(color: &str) -> Attributes {
    Attributes::default()
        .with_species("dog")
        .with_breed("Labrador Retriever", 0.92)
        .with_colors([color])
        .with_age(AgeBucket::Adult)
        .with_size(SizeBucket::Large)
}

#[derive(Default)]
pub struct CandidateBuilder {
    id: Option<Uuid>,
    vector: Option<Vec<f32>>,
    attributes: Option<Attributes>,
    geo_point: Option<GeoPoint>,
    observed_date: Option<NaiveDate>,
}

impl CandidateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    pub fn vector(mut self, values: &[f32]) -> Self {
        self.vector = Some(values.to_vec());
        self
    }

    pub fn attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = Some(attributes);
        self
    }

    pub fn at(mut self, point: GeoPoint) -> Self {
        self.geo_point = Some(point);
        self
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.observed_date = Some(date);
        self
    }

    pub fn build(self) -> Candidate {
        let vector = FeatureVector::new(self.vector.unwrap_or_else(|| vec![1.0, 0.0, 0.0]));
        let mut candidate = Candidate::from_vector(self.id.unwrap_or_else(Uuid::new_v4), &vector);
        if let Some(attributes) = self.attributes {
            candidate = candidate.with_attributes(attributes);
        }
        if let Some(point) = self.geo_point {
            candidate = candidate.with_geo_point(point);
        }
        if let Some(date) = self.observed_date {
            candidate = candidate.with_observed_date(date);
        }
        candidate
    }
}

/// A black Labrador seen downtown on [`fixed_date`].
pub fn black_labrador(values: &[f32]) -> Candidate {
    CandidateBuilder::new()
        .vector(values)
        .attributes(labrador_attributes("black"))
        .at(DOWNTOWN)
        .on(fixed_date())
        .build()
}
