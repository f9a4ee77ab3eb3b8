//! Checkpoint compaction — bound history growth.
//!
//! The ledger is append-only by default; nothing requires unbounded
//! retention beyond query correctness. Compaction drops checkpoints older
//! than a configured depth below the current sequence, always keeping, per
//! account, the newest checkpoint at or below the cutoff. Queries at or
//! after the cutoff stay exact; queries before it may see the balance as of
//! the surviving anchor checkpoint instead of the dropped one.
//!
//! Compaction is explicit and disabled by default — it never runs as a side
//! effect of a ledger operation.

use crate::ledger::SnapshotLedger;
use tally_types::SeqNo;

/// Configuration for checkpoint compaction.
pub struct CompactionConfig {
    /// Whether compaction is enabled.
    pub enabled: bool,
    /// How many sequence numbers of full-resolution history to keep below
    /// the current sequence.
    pub keep_depth: u64,
    /// Maximum number of checkpoints to remove per call (bounds the work of
    /// one compaction cycle).
    pub batch_size: usize,
}

impl Default for CompactionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            keep_depth: 100_000,
            batch_size: 10_000,
        }
    }
}

/// Result of a compaction cycle.
pub struct CompactResult {
    /// Total checkpoints removed.
    pub removed: usize,
    /// Number of accounts that lost at least one checkpoint.
    pub accounts_touched: usize,
    /// The cutoff sequence used for this cycle.
    pub cutoff: SeqNo,
}

/// Compaction engine — decides which checkpoints to remove.
pub struct LedgerCompactor {
    config: CompactionConfig,
}

impl LedgerCompactor {
    pub fn new(config: CompactionConfig) -> Self {
        Self { config }
    }

    /// Run one compaction cycle over the ledger.
    ///
    /// The amount of work is bounded by `batch_size`; call again to continue
    /// where a saturated cycle left off.
    pub fn compact(&self, ledger: &mut SnapshotLedger) -> CompactResult {
        let cutoff = ledger.sequence().back(self.config.keep_depth);
        let mut result = CompactResult {
            removed: 0,
            accounts_touched: 0,
            cutoff,
        };
        if !self.config.enabled {
            return result;
        }

        for history in ledger.accounts.values_mut() {
            let budget = self.config.batch_size - result.removed;
            if budget == 0 {
                break;
            }
            let removed = history.compact_before(cutoff, budget);
            if removed > 0 {
                result.removed += removed;
                result.accounts_touched += 1;
            }
        }
        result
    }

    pub fn config(&self) -> &CompactionConfig {
        &self.config
    }
}
