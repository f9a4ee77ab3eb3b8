//! Ledger storage trait.

use crate::StoreError;
use tally_types::Address;

/// Store trait for persisting ledger state to durable storage.
///
/// Uses opaque `Vec<u8>` payloads so the store does not depend on the
/// `tally-ledger` crate (which would create a circular dependency). The
/// ledger serializes/deserializes its own types.
pub trait LedgerStore {
    /// Fetch the serialized checkpoint history for one account.
    fn get_history(&self, account: &Address) -> Result<Option<Vec<u8>>, StoreError>;

    /// Write the serialized checkpoint history for one account.
    fn put_history(&self, account: &Address, bytes: &[u8]) -> Result<(), StoreError>;

    /// Remove an account's history.
    fn delete_history(&self, account: &Address) -> Result<(), StoreError>;

    /// All stored account histories.
    fn iter_histories(&self) -> Result<Vec<(Address, Vec<u8>)>, StoreError>;

    /// Fetch a ledger metadata value (sequence counter, total supply, ...).
    fn get_meta(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    /// Write a ledger metadata value.
    fn put_meta(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;
}
