//! The snapshot ledger — balances, history, and the global sequence counter.

use std::collections::HashMap;

use crate::checkpoint::AccountHistory;
use crate::error::LedgerError;
use tally_store::{LedgerStore, StoreError};
use tally_types::{Address, SeqNo};

/// Tracks current balances and enough history to answer "what was this
/// account's balance at or before sequence N".
///
/// Every successful mutation advances the global sequence counter exactly
/// once and appends one checkpoint per touched account. Mutations take
/// `&mut self` — callers serialize writes externally, matching a chain's
/// sequential transaction ordering. Failed operations mutate nothing.
pub struct SnapshotLedger {
    /// Sequence of the most recent operation (`SeqNo::ZERO` before the first).
    seq: SeqNo,
    /// Per-account checkpoint histories, created lazily.
    pub(crate) accounts: HashMap<Address, AccountHistory>,
    /// Cached sum of all current balances, updated incrementally on mint/burn.
    total_supply: u128,
}

impl SnapshotLedger {
    pub fn new() -> Self {
        Self {
            seq: SeqNo::ZERO,
            accounts: HashMap::new(),
            total_supply: 0,
        }
    }

    /// Sequence number of the latest operation.
    pub fn sequence(&self) -> SeqNo {
        self.seq
    }

    /// Sum of all accounts' current balances.
    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    /// The latest recorded balance, or zero for an unseen account.
    pub fn current_balance(&self, account: &Address) -> u128 {
        self.accounts
            .get(account)
            .map_or(0, AccountHistory::latest_balance)
    }

    /// The account's balance as of `seq` (checkpoint sequence inclusive).
    ///
    /// Zero if the account had no checkpoint at or before `seq`; equal to
    /// `current_balance` for any `seq` at or past the latest checkpoint.
    /// O(log n) in the length of the account's history.
    pub fn balance_at(&self, account: &Address, seq: SeqNo) -> u128 {
        self.accounts.get(account).map_or(0, |h| h.balance_at(seq))
    }

    /// Move `amount` from `from` to `to`.
    ///
    /// Debits, credits, advances the sequence once, and checkpoints both
    /// accounts at the new sequence. A self-transfer is legal: it records a
    /// single unchanged checkpoint but still consumes a sequence number.
    /// Returns the sequence at which the transfer was recorded.
    pub fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<SeqNo, LedgerError> {
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }
        let from_balance = self.current_balance(from);
        if from_balance < amount {
            return Err(LedgerError::InsufficientBalance {
                needed: amount,
                available: from_balance,
            });
        }

        if from == to {
            let seq = self.seq.next();
            self.history_mut(from).record(seq, from_balance);
            self.seq = seq;
            return Ok(seq);
        }

        // Validate the credit side before touching any state.
        let to_balance = self
            .current_balance(to)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;

        let seq = self.seq.next();
        self.history_mut(from).record(seq, from_balance - amount);
        self.history_mut(to).record(seq, to_balance);
        self.seq = seq;
        Ok(seq)
    }

    /// Credit `to` by `amount` unconditionally, growing total supply.
    ///
    /// Used for initial issuance and re-issuance; authorization is the
    /// caller's concern.
    pub fn mint(&mut self, to: &Address, amount: u128) -> Result<SeqNo, LedgerError> {
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }
        let new_balance = self
            .current_balance(to)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        let new_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;

        let seq = self.seq.next();
        self.history_mut(to).record(seq, new_balance);
        self.total_supply = new_supply;
        self.seq = seq;
        Ok(seq)
    }

    /// Debit `from` by `amount`, shrinking total supply.
    pub fn burn(&mut self, from: &Address, amount: u128) -> Result<SeqNo, LedgerError> {
        if amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }
        let balance = self.current_balance(from);
        if balance < amount {
            return Err(LedgerError::InsufficientBalance {
                needed: amount,
                available: balance,
            });
        }

        let seq = self.seq.next();
        self.history_mut(from).record(seq, balance - amount);
        // Supply is the sum of balances, so it can never be below `balance`.
        self.total_supply = self
            .total_supply
            .checked_sub(amount)
            .ok_or(LedgerError::Overflow)?;
        self.seq = seq;
        Ok(seq)
    }

    /// Administrative transfer: identical to `transfer` at this layer.
    ///
    /// Balance sufficiency is still enforced; the bypass is of allowance and
    /// authorization checks, which live in the caller. Supply is preserved.
    pub fn force_transfer(
        &mut self,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<SeqNo, LedgerError> {
        self.transfer(from, to, amount)
    }

    /// Number of accounts that have ever been touched.
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    /// Number of checkpoints stored for an account.
    pub fn checkpoint_count(&self, account: &Address) -> usize {
        self.accounts.get(account).map_or(0, AccountHistory::len)
    }

    /// Iterate all accounts with their current balances.
    pub fn balances(&self) -> impl Iterator<Item = (&Address, u128)> {
        self.accounts
            .iter()
            .map(|(addr, h)| (addr, h.latest_balance()))
    }

    fn history_mut(&mut self, account: &Address) -> &mut AccountHistory {
        self.accounts.entry(account.clone()).or_default()
    }
}

impl Default for SnapshotLedger {
    fn default() -> Self {
        Self::new()
    }
}

const META_SEQUENCE: &[u8] = b"sequence";
const META_TOTAL_SUPPLY: &[u8] = b"total_supply";

impl SnapshotLedger {
    /// Persist the full ledger state to a store.
    pub fn save_to_store(&self, store: &dyn LedgerStore) -> Result<(), LedgerError> {
        store.put_meta(META_SEQUENCE, &self.seq.as_u64().to_be_bytes())?;
        store.put_meta(META_TOTAL_SUPPLY, &self.total_supply.to_be_bytes())?;

        for (account, history) in &self.accounts {
            let bytes = bincode::serialize(history)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            store.put_history(account, &bytes)?;
        }
        Ok(())
    }

    /// Restore a ledger from a store.
    ///
    /// If the metadata keys are missing (partial store), the sequence counter
    /// and total supply are rederived from the stored histories.
    pub fn load_from_store(store: &dyn LedgerStore) -> Result<Self, LedgerError> {
        let mut accounts = HashMap::new();
        for (account, bytes) in store.iter_histories()? {
            let history: AccountHistory = bincode::deserialize(&bytes)
                .map_err(|e| StoreError::Corruption(e.to_string()))?;
            accounts.insert(account, history);
        }

        let seq = match store.get_meta(META_SEQUENCE)? {
            Some(bytes) if bytes.len() >= 8 => {
                SeqNo::new(u64::from_be_bytes(bytes[..8].try_into().unwrap()))
            }
            _ => accounts
                .values()
                .filter_map(AccountHistory::latest_seq)
                .max()
                .unwrap_or(SeqNo::ZERO),
        };

        let total_supply = match store.get_meta(META_TOTAL_SUPPLY)? {
            Some(bytes) if bytes.len() >= 16 => {
                u128::from_be_bytes(bytes[..16].try_into().unwrap())
            }
            _ => accounts.values().map(AccountHistory::latest_balance).sum(),
        };

        Ok(Self {
            seq,
            accounts,
            total_supply,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_store::MemoryStore;

    fn addr(s: &str) -> Address {
        Address::new(s)
    }

    #[test]
    fn untouched_accounts_read_zero() {
        let ledger = SnapshotLedger::new();
        assert_eq!(ledger.current_balance(&addr("nobody")), 0);
        assert_eq!(ledger.balance_at(&addr("nobody"), SeqNo::new(999_999)), 0);
        assert_eq!(ledger.total_supply(), 0);
        assert_eq!(ledger.sequence(), SeqNo::ZERO);
    }

    #[test]
    fn mint_credits_and_grows_supply() {
        let mut ledger = SnapshotLedger::new();
        let seq = ledger.mint(&addr("alice"), 1000).unwrap();

        assert_eq!(seq, SeqNo::new(1));
        assert_eq!(ledger.current_balance(&addr("alice")), 1000);
        assert_eq!(ledger.total_supply(), 1000);
    }

    #[test]
    fn reissue_doubles_supply() {
        // 999,999,999 tokens at 18 decimals.
        let supply = 999_999_999_000_000_000_000_000_000u128;
        let mut ledger = SnapshotLedger::new();

        ledger.mint(&addr("treasury"), supply).unwrap();
        assert_eq!(ledger.current_balance(&addr("treasury")), supply);

        ledger.mint(&addr("treasury"), supply).unwrap();
        assert_eq!(ledger.current_balance(&addr("treasury")), supply * 2);
        assert_eq!(ledger.total_supply(), supply * 2);
    }

    #[test]
    fn transfer_moves_balance_and_preserves_supply() {
        let mut ledger = SnapshotLedger::new();
        ledger.mint(&addr("alice"), 1000).unwrap();

        ledger.transfer(&addr("alice"), &addr("bob"), 100).unwrap();
        assert_eq!(ledger.current_balance(&addr("alice")), 900);
        assert_eq!(ledger.current_balance(&addr("bob")), 100);
        assert_eq!(ledger.total_supply(), 1000);
    }

    #[test]
    fn transfer_checkpoints_both_accounts_at_one_sequence() {
        let mut ledger = SnapshotLedger::new();
        ledger.mint(&addr("alice"), 1000).unwrap(); // seq 1
        let seq = ledger.transfer(&addr("alice"), &addr("bob"), 300).unwrap();

        assert_eq!(seq, SeqNo::new(2));
        assert_eq!(ledger.sequence(), SeqNo::new(2));
        assert_eq!(ledger.checkpoint_count(&addr("alice")), 2);
        assert_eq!(ledger.checkpoint_count(&addr("bob")), 1);
    }

    #[test]
    fn insufficient_transfer_fails_without_mutation() {
        let mut ledger = SnapshotLedger::new();
        ledger.mint(&addr("alice"), 50).unwrap();

        let err = ledger
            .transfer(&addr("alice"), &addr("bob"), 100)
            .unwrap_err();
        match err {
            LedgerError::InsufficientBalance { needed, available } => {
                assert_eq!(needed, 100);
                assert_eq!(available, 50);
            }
            other => panic!("expected InsufficientBalance, got {other:?}"),
        }

        // Atomic failure: nothing moved, sequence did not advance.
        assert_eq!(ledger.current_balance(&addr("alice")), 50);
        assert_eq!(ledger.current_balance(&addr("bob")), 0);
        assert_eq!(ledger.sequence(), SeqNo::new(1));
        assert_eq!(ledger.checkpoint_count(&addr("bob")), 0);
    }

    #[test]
    fn zero_amounts_are_rejected() {
        let mut ledger = SnapshotLedger::new();
        ledger.mint(&addr("alice"), 10).unwrap();

        assert!(matches!(
            ledger.mint(&addr("alice"), 0),
            Err(LedgerError::ZeroAmount)
        ));
        assert!(matches!(
            ledger.transfer(&addr("alice"), &addr("bob"), 0),
            Err(LedgerError::ZeroAmount)
        ));
        assert!(matches!(
            ledger.burn(&addr("alice"), 0),
            Err(LedgerError::ZeroAmount)
        ));
        assert_eq!(ledger.sequence(), SeqNo::new(1));
    }

    #[test]
    fn credit_overflow_is_detected_before_mutation() {
        let mut ledger = SnapshotLedger::new();
        ledger.mint(&addr("alice"), u128::MAX).unwrap();

        assert!(matches!(
            ledger.mint(&addr("alice"), 1),
            Err(LedgerError::Overflow)
        ));
        assert_eq!(ledger.current_balance(&addr("alice")), u128::MAX);
        assert_eq!(ledger.sequence(), SeqNo::new(1));
    }

    #[test]
    fn burn_shrinks_supply() {
        let mut ledger = SnapshotLedger::new();
        ledger.mint(&addr("alice"), 1000).unwrap();
        ledger.burn(&addr("alice"), 400).unwrap();

        assert_eq!(ledger.current_balance(&addr("alice")), 600);
        assert_eq!(ledger.total_supply(), 600);
    }

    #[test]
    fn burn_more_than_balance_fails() {
        let mut ledger = SnapshotLedger::new();
        ledger.mint(&addr("alice"), 10).unwrap();
        assert!(matches!(
            ledger.burn(&addr("alice"), 11),
            Err(LedgerError::InsufficientBalance { .. })
        ));
        assert_eq!(ledger.total_supply(), 10);
    }

    #[test]
    fn transfer_all_to_self_then_burn_leaves_one() {
        let supply = 999_999_999_000_000_000_000_000_000u128;
        let mut ledger = SnapshotLedger::new();
        ledger.mint(&addr("alice"), supply).unwrap();

        ledger
            .transfer(&addr("alice"), &addr("alice"), supply)
            .unwrap();
        assert_eq!(ledger.current_balance(&addr("alice")), supply);

        ledger.burn(&addr("alice"), supply - 1).unwrap();
        assert_eq!(ledger.total_supply(), 1);
        assert_eq!(ledger.current_balance(&addr("alice")), 1);
    }

    #[test]
    fn self_transfer_records_one_checkpoint_and_advances_sequence() {
        let mut ledger = SnapshotLedger::new();
        ledger.mint(&addr("alice"), 100).unwrap(); // seq 1
        let seq = ledger
            .transfer(&addr("alice"), &addr("alice"), 100)
            .unwrap();

        assert_eq!(seq, SeqNo::new(2));
        assert_eq!(ledger.checkpoint_count(&addr("alice")), 2);
        assert_eq!(ledger.current_balance(&addr("alice")), 100);
        assert_eq!(ledger.total_supply(), 100);
    }

    #[test]
    fn force_transfer_preserves_supply() {
        let mut ledger = SnapshotLedger::new();
        ledger.mint(&addr("treasury"), 5000).unwrap();

        ledger
            .force_transfer(&addr("treasury"), &addr("customer"), 5000)
            .unwrap();
        assert_eq!(ledger.current_balance(&addr("treasury")), 0);
        assert_eq!(ledger.current_balance(&addr("customer")), 5000);
        assert_eq!(ledger.total_supply(), 5000);
    }

    #[test]
    fn balance_at_transfer_boundary_is_inclusive() {
        let mut ledger = SnapshotLedger::new();
        ledger.mint(&addr("treasury"), 1000).unwrap(); // seq 1
        let seq = ledger
            .transfer(&addr("treasury"), &addr("customer"), 100)
            .unwrap(); // seq 2

        // Before the transfer the receiver had nothing.
        assert_eq!(ledger.balance_at(&addr("customer"), SeqNo::new(1)), 0);
        // At the transfer's own sequence the post-transfer balance is visible.
        assert_eq!(ledger.balance_at(&addr("customer"), seq), 100);
        // Far in the future the query matches the current balance.
        assert_eq!(
            ledger.balance_at(&addr("customer"), SeqNo::new(999_999)),
            100
        );
    }

    #[test]
    fn alternating_transfers_keep_exact_history() {
        let mut ledger = SnapshotLedger::new();
        ledger.mint(&addr("treasury"), 1_000_000).unwrap();

        // Record the expected customer balance after every operation.
        let mut expected = vec![0u128; 1]; // index 0 = seq 0
        expected.push(0); // seq 1: mint touched only the treasury

        for _ in 0..3 {
            ledger
                .transfer(&addr("treasury"), &addr("customer"), 100)
                .unwrap();
            expected.push(100);
            assert_eq!(ledger.current_balance(&addr("customer")), 100);

            ledger
                .transfer(&addr("customer"), &addr("treasury"), 100)
                .unwrap();
            expected.push(0);
            assert_eq!(ledger.current_balance(&addr("customer")), 0);
        }

        for (s, want) in expected.iter().enumerate() {
            assert_eq!(
                ledger.balance_at(&addr("customer"), SeqNo::new(s as u64)),
                *want,
                "wrong balance at sequence {s}"
            );
        }
    }

    #[test]
    fn save_load_roundtrip() {
        let mut ledger = SnapshotLedger::new();
        ledger.mint(&addr("alice"), 1000).unwrap();
        ledger.transfer(&addr("alice"), &addr("bob"), 250).unwrap();
        ledger.burn(&addr("bob"), 50).unwrap();

        let store = MemoryStore::new();
        ledger.save_to_store(&store).unwrap();
        let restored = SnapshotLedger::load_from_store(&store).unwrap();

        assert_eq!(restored.sequence(), ledger.sequence());
        assert_eq!(restored.total_supply(), ledger.total_supply());
        assert_eq!(restored.current_balance(&addr("alice")), 750);
        assert_eq!(restored.current_balance(&addr("bob")), 200);
        assert_eq!(
            restored.balance_at(&addr("bob"), SeqNo::new(2)),
            ledger.balance_at(&addr("bob"), SeqNo::new(2))
        );
    }

    #[test]
    fn load_without_meta_rederives_counters() {
        let mut ledger = SnapshotLedger::new();
        ledger.mint(&addr("alice"), 1000).unwrap();
        ledger.transfer(&addr("alice"), &addr("bob"), 100).unwrap();

        // Persist histories only, not the metadata keys.
        let store = MemoryStore::new();
        for (account, history) in &ledger.accounts {
            let bytes = bincode::serialize(history).unwrap();
            store.put_history(account, &bytes).unwrap();
        }

        let restored = SnapshotLedger::load_from_store(&store).unwrap();
        assert_eq!(restored.sequence(), SeqNo::new(2));
        assert_eq!(restored.total_supply(), 1000);
    }
}
