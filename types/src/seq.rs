//! Sequence numbers — the ledger's event clock.
//!
//! A `SeqNo` stands in for blockchain block/transaction height: a strictly
//! increasing counter shared by all accounts, advanced exactly once per
//! successful balance-changing operation. It is never derived from wall-clock
//! time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A strictly increasing event-ordering counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SeqNo(u64);

impl SeqNo {
    /// Sequence zero — no operation has happened yet.
    pub const ZERO: Self = Self(0);

    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// The next sequence number.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// The sequence `depth` steps back, clamped at zero.
    pub fn back(&self, depth: u64) -> Self {
        Self(self.0.saturating_sub(depth))
    }
}

impl fmt::Display for SeqNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
