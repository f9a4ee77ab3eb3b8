//! In-memory store — thread-safe backend for tests and embedded use.

use crate::ledger::LedgerStore;
use crate::StoreError;
use std::collections::HashMap;
use std::sync::Mutex;
use tally_types::Address;

/// A `LedgerStore` kept entirely in memory.
///
/// Thread-safe; queries may be issued from multiple threads. Writes are
/// serialized by the interior mutexes.
pub struct MemoryStore {
    histories: Mutex<HashMap<String, Vec<u8>>>,
    meta: Mutex<HashMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            histories: Mutex::new(HashMap::new()),
            meta: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerStore for MemoryStore {
    fn get_history(&self, account: &Address) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self
            .histories
            .lock()
            .unwrap()
            .get(account.as_str())
            .cloned())
    }

    fn put_history(&self, account: &Address, bytes: &[u8]) -> Result<(), StoreError> {
        self.histories
            .lock()
            .unwrap()
            .insert(account.as_str().to_string(), bytes.to_vec());
        Ok(())
    }

    fn delete_history(&self, account: &Address) -> Result<(), StoreError> {
        self.histories.lock().unwrap().remove(account.as_str());
        Ok(())
    }

    fn iter_histories(&self) -> Result<Vec<(Address, Vec<u8>)>, StoreError> {
        Ok(self
            .histories
            .lock()
            .unwrap()
            .iter()
            .map(|(k, v)| (Address::new(k.clone()), v.clone()))
            .collect())
    }

    fn get_meta(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.meta.lock().unwrap().get(key).cloned())
    }

    fn put_meta(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.meta
            .lock()
            .unwrap()
            .insert(key.to_vec(), value.to_vec());
        Ok(())
    }
}
