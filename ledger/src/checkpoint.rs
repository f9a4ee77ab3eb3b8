//! Per-account checkpoint history.
//!
//! A checkpoint records an account's total balance immediately after a
//! balance change, keyed by the global sequence number of the operation.
//! Histories are append-only under normal operation; sequence numbers are
//! strictly increasing within one history.

use serde::{Deserialize, Serialize};
use tally_types::SeqNo;

/// A `(sequence, balance)` pair marking an account's balance right after a
/// change. The balance is the full post-operation balance, not a delta.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub seq: SeqNo,
    pub balance: u128,
}

/// The ordered checkpoint history of a single account.
///
/// Checkpoints are kept sorted by sequence (strictly increasing), which makes
/// `balance_at` a binary search. Recording is O(1): the global sequence
/// counter only moves forward, so every new checkpoint lands at the tail.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AccountHistory {
    checkpoints: Vec<Checkpoint>,
}

impl AccountHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a balance at a sequence number.
    ///
    /// If the tail checkpoint already carries `seq` (the account was touched
    /// twice by one operation, e.g. a self-transfer), the tail is overwritten
    /// so at most one checkpoint exists per sequence.
    pub fn record(&mut self, seq: SeqNo, balance: u128) {
        match self.checkpoints.last_mut() {
            Some(last) if last.seq == seq => last.balance = balance,
            Some(last) => {
                debug_assert!(last.seq < seq, "sequence numbers must increase");
                self.checkpoints.push(Checkpoint { seq, balance });
            }
            None => self.checkpoints.push(Checkpoint { seq, balance }),
        }
    }

    /// The latest recorded balance, or zero for an empty history.
    pub fn latest_balance(&self) -> u128 {
        self.checkpoints.last().map_or(0, |c| c.balance)
    }

    /// The balance recorded by the latest checkpoint at or before `seq`.
    ///
    /// The checkpoint's own sequence is inclusive: a balance recorded at
    /// sequence N is visible to `balance_at(N)`. Returns zero if the account
    /// had no checkpoint at or before `seq`. O(log n) binary search.
    pub fn balance_at(&self, seq: SeqNo) -> u128 {
        let pos = self.checkpoints.partition_point(|c| c.seq <= seq);
        if pos == 0 {
            0
        } else {
            self.checkpoints[pos - 1].balance
        }
    }

    /// Sequence of the first (oldest) checkpoint, if any.
    pub fn first_seq(&self) -> Option<SeqNo> {
        self.checkpoints.first().map(|c| c.seq)
    }

    /// Sequence of the last (newest) checkpoint, if any.
    pub fn latest_seq(&self) -> Option<SeqNo> {
        self.checkpoints.last().map(|c| c.seq)
    }

    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    /// Drop every checkpoint strictly older than the newest one at or below
    /// `cutoff`, up to `budget` removals. That newest at-or-below checkpoint
    /// is always retained, so `balance_at(s)` stays exact for any
    /// `s >= cutoff`. Returns the number of checkpoints removed.
    pub(crate) fn compact_before(&mut self, cutoff: SeqNo, budget: usize) -> usize {
        let pos = self.checkpoints.partition_point(|c| c.seq <= cutoff);
        // pos-1 is the checkpoint that must survive; everything before it may go.
        let removable = pos.saturating_sub(1).min(budget);
        if removable > 0 {
            self.checkpoints.drain(..removable);
        }
        removable
    }
}
