//! Match ledger: deduplicated match records with a guarded status lifecycle.

pub mod error;
pub mod store;
pub mod types;


pub use error::{LedgerError, LedgerResult};
pub use store::MatchLedger;
pub use types::{MatchRecord, MatchStatus, UpsertAction, UpsertOutcome};
