use std::collections::HashMap;

use chrono::Utc;
use parking_lot::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use super::error::{LedgerError, LedgerResult};
use super::types::{MatchRecord, MatchStatus, UpsertAction, UpsertOutcome};

#[derive(Debug, Default)]
struct LedgerState {
    records: HashMap<Uuid, MatchRecord>,
    by_pair: HashMap<(Uuid, Uuid), Uuid>,
    /// Record ids in insertion order.
    order: Vec<Uuid>,
}

/// In-memory store of match records, unique per `(lost_pet_id, found_pet_id)`.
///
/// A single lock guards both the records and the pair index, so the
/// lookup-then-insert in [`MatchLedger::upsert`] is one critical section and two
/// concurrent first sightings of a pair always resolve to one record.
#[derive(Debug, Default)]
pub struct MatchLedger {
    state: Mutex<LedgerState>,
}

impl MatchLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a pending match or raises the stored similarity (keep-best).
    pub fn upsert(
        &self,
        lost_pet_id: Uuid,
        found_pet_id: Uuid,
        similarity: f64,
        matching_features: Vec<String>,
    ) -> LedgerResult<MatchRecord> {
        self.upsert_tracked(lost_pet_id, found_pet_id, similarity, matching_features)
            .map(|outcome| outcome.record)
    }

    /// Same as [`MatchLedger::upsert`], also reporting which branch was taken.
    ///
    /// Status is never touched here: a confirmed or rejected record may still have its
    /// similarity raised, but it is not reopened.
    pub fn upsert_tracked(
        &self,
        lost_pet_id: Uuid,
        found_pet_id: Uuid,
        similarity: f64,
        matching_features: Vec<String>,
    ) -> LedgerResult<UpsertOutcome> {
        if !(0.0..=1.0).contains(&similarity) {
            return Err(LedgerError::InvalidSimilarity { value: similarity });
        }

        let mut state = self.state.lock();
        let key = (lost_pet_id, found_pet_id);

        let existing = state.by_pair.get(&key).copied();
        if let Some(id) = existing
            && let Some(record) = state.records.get_mut(&id)
        {
            if similarity > record.similarity {
                let previous = record.similarity;
                record.similarity = similarity;
                record.matching_features = matching_features;
                record.updated_at = Utc::now();
                info!(
                    match_id = %id,
                    %lost_pet_id,
                    %found_pet_id,
                    previous,
                    similarity,
                    "Match improved"
                );
                return Ok(UpsertOutcome {
                    record: record.clone(),
                    action: UpsertAction::Improved,
                });
            }

            debug!(
                match_id = %id,
                stored = record.similarity,
                offered = similarity,
                "Keeping stored similarity"
            );
            return Ok(UpsertOutcome {
                record: record.clone(),
                action: UpsertAction::Unchanged,
            });
        }

        let now = Utc::now();
        let record = MatchRecord {
            id: Uuid::new_v4(),
            lost_pet_id,
            found_pet_id,
            similarity,
            status: MatchStatus::Pending,
            matching_features,
            confirmation_date: None,
            created_at: now,
            updated_at: now,
        };
        state.by_pair.insert(key, record.id);
        state.order.push(record.id);
        state.records.insert(record.id, record.clone());

        info!(
            match_id = %record.id,
            %lost_pet_id,
            %found_pet_id,
            similarity,
            "Match created"
        );
        Ok(UpsertOutcome {
            record,
            action: UpsertAction::Created,
        })
    }

    /// Moves a pending match to `confirmed` or `rejected`.
    ///
    /// Confirming stamps `confirmation_date`. Any other transition, including a move
    /// back to `pending`, is [`LedgerError::InvalidTransition`].
    pub fn update_status(
        &self,
        match_id: Uuid,
        new_status: MatchStatus,
    ) -> LedgerResult<MatchRecord> {
        let mut state = self.state.lock();
        let record = state
            .records
            .get_mut(&match_id)
            .ok_or(LedgerError::NotFound { id: match_id })?;

        if record.status.is_terminal() || new_status == MatchStatus::Pending {
            return Err(LedgerError::InvalidTransition {
                id: match_id,
                from: record.status,
                to: new_status,
            });
        }

        let now = Utc::now();
        record.status = new_status;
        record.updated_at = now;
        if new_status == MatchStatus::Confirmed {
            record.confirmation_date = Some(now);
        }

        info!(match_id = %match_id, status = %new_status, "Match status updated");
        Ok(record.clone())
    }

    pub fn get(&self, match_id: Uuid) -> LedgerResult<MatchRecord> {
        self.state
            .lock()
            .records
            .get(&match_id)
            .cloned()
            .ok_or(LedgerError::NotFound { id: match_id })
    }

    pub fn get_by_pet_ids(&self, lost_pet_id: Uuid, found_pet_id: Uuid) -> Option<MatchRecord> {
        let state = self.state.lock();
        state
            .by_pair
            .get(&(lost_pet_id, found_pet_id))
            .and_then(|id| state.records.get(id))
            .cloned()
    }

    /// Matches involving `lost_pet_id`, newest first.
    pub fn list_for_lost_pet(
        &self,
        lost_pet_id: Uuid,
        status: Option<MatchStatus>,
        skip: usize,
        limit: usize,
    ) -> Vec<MatchRecord> {
        self.list_where(|r| r.lost_pet_id == lost_pet_id, status, skip, limit)
    }

    /// Matches involving `found_pet_id`, newest first.
    pub fn list_for_found_pet(
        &self,
        found_pet_id: Uuid,
        status: Option<MatchStatus>,
        skip: usize,
        limit: usize,
    ) -> Vec<MatchRecord> {
        self.list_where(|r| r.found_pet_id == found_pet_id, status, skip, limit)
    }

    pub fn len(&self) -> usize {
        self.state.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn list_where(
        &self,
        predicate: impl Fn(&MatchRecord) -> bool,
        status: Option<MatchStatus>,
        skip: usize,
        limit: usize,
    ) -> Vec<MatchRecord> {
        let state = self.state.lock();
        state
            .order
            .iter()
            .rev()
            .filter_map(|id| state.records.get(id))
            .filter(|r| predicate(r) && status.is_none_or(|s| r.status == s))
            .skip(skip)
            .take(limit)
            .cloned()
            .collect()
    }
}
