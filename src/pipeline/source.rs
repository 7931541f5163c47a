use std::collections::HashMap;

use parking_lot::RwLock;
use uuid::Uuid;

use super::error::PipelineResult;
use crate::model::Candidate;

/// Read access to stored pet reports.
pub trait CandidateSource: Send + Sync {
    /// Loads a found-pet report by id.
    fn found_pet(&self, id: Uuid) -> PipelineResult<Option<Candidate>>;

    /// Lost-pet reports to rank against, at most `limit`. `species = None` means any.
    fn lost_candidates(
        &self,
        species: Option<&str>,
        limit: usize,
    ) -> PipelineResult<Vec<Candidate>>;
}

/// [`CandidateSource`] over in-memory maps, in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryCandidateSource {
    found: RwLock<HashMap<Uuid, Candidate>>,
    lost: RwLock<Vec<Candidate>>,
}

impl InMemoryCandidateSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_found(&self, pet: Candidate) {
        self.found.write().insert(pet.id, pet);
    }

    /// Adds a lost-pet report, replacing any report with the same id.
    pub fn insert_lost(&self, pet: Candidate) {
        let mut lost = self.lost.write();
        match lost.iter_mut().find(|c| c.id == pet.id) {
            Some(existing) => *existing = pet,
            None => lost.push(pet),
        }
    }

    pub fn lost_count(&self) -> usize {
        self.lost.read().len()
    }
}

impl CandidateSource for InMemoryCandidateSource {
    fn found_pet(&self, id: Uuid) -> PipelineResult<Option<Candidate>> {
        Ok(self.found.read().get(&id).cloned())
    }

    fn lost_candidates(
        &self,
        species: Option<&str>,
        limit: usize,
    ) -> PipelineResult<Vec<Candidate>> {
        Ok(self
            .lost
            .read()
            .iter()
            .filter(|c| match species {
                Some(wanted) => c.species().is_some_and(|s| s.eq_ignore_ascii_case(wanted)),
                None => true,
            })
            .take(limit)
            .cloned()
            .collect())
    }
}
