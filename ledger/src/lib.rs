//! Checkpointed balance ledger.
//!
//! Every balance change appends a `(sequence, balance)` checkpoint to the
//! affected account's history, so the ledger can answer both "what is the
//! balance now" (O(1)) and "what was the balance at sequence N" (O(log n))
//! without replaying transactions.
//!
//! This crate handles:
//! - Current and historical balance queries
//! - Transfer / mint / burn / force-transfer with atomic failure
//! - Optional checkpoint compaction (bounded history)
//! - Bincode persistence through the `tally-store` traits

pub mod checkpoint;
pub mod compaction;
pub mod error;
pub mod ledger;

pub use checkpoint::{AccountHistory, Checkpoint};
pub use compaction::{CompactResult, CompactionConfig, LedgerCompactor};
pub use error::LedgerError;
pub use ledger::SnapshotLedger;
