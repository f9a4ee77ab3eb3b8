//! Abstract storage for the tally ledger.
//!
//! Any storage backend implements the [`LedgerStore`] trait; the rest of the
//! codebase depends only on the trait. The crate ships a thread-safe
//! in-memory backend ([`MemoryStore`]) for tests and embedded use.

pub mod error;
pub mod ledger;
pub mod memory;

pub use error::StoreError;
pub use ledger::LedgerStore;
pub use memory::MemoryStore;
