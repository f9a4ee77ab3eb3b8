//! The token engine — authorization and bookkeeping over the ledger.

use std::collections::{HashMap, HashSet};

use crate::error::TokenError;
use tally_ledger::SnapshotLedger;
use tally_types::{Address, SeqNo, TokenInfo};

/// A token with checkpointed balances.
///
/// All balance math lives in the [`SnapshotLedger`]; the engine enforces who
/// may call what (owner, whitelist, allowances) and keeps the metadata. Every
/// operation takes the caller's address explicitly — the engine trusts that
/// the caller identity was authenticated upstream.
pub struct TokenEngine {
    info: TokenInfo,
    owner: Address,
    /// Addresses allowed to issue and burn tokens.
    whitelist: HashSet<Address>,
    /// `(owner, spender)` → remaining approved amount.
    allowances: HashMap<(Address, Address), u128>,
    ledger: SnapshotLedger,
}

impl TokenEngine {
    /// Create a token with the given metadata and owner.
    ///
    /// The whitelist starts empty — even the owner must be whitelisted
    /// before issuing.
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, owner: Address) -> Self {
        Self {
            info: TokenInfo::new(name, symbol),
            owner,
            whitelist: HashSet::new(),
            allowances: HashMap::new(),
            ledger: SnapshotLedger::new(),
        }
    }

    pub fn info(&self) -> &TokenInfo {
        &self.info
    }

    pub fn owner(&self) -> &Address {
        &self.owner
    }

    pub fn ledger(&self) -> &SnapshotLedger {
        &self.ledger
    }

    /// Update name and symbol. Owner-only; does not advance the ledger
    /// sequence (no balance is touched).
    pub fn set_token_information(
        &mut self,
        caller: &Address,
        name: impl Into<String>,
        symbol: impl Into<String>,
    ) -> Result<(), TokenError> {
        self.require_owner(caller, "change token information")?;
        self.info.name = name.into();
        self.info.symbol = symbol.into();
        tracing::debug!(name = %self.info.name, symbol = %self.info.symbol, "token renamed");
        Ok(())
    }

    /// Grant issuance rights to an address. Owner-only.
    pub fn add_to_whitelist(&mut self, caller: &Address, addr: Address) -> Result<(), TokenError> {
        self.require_owner(caller, "manage the whitelist")?;
        tracing::debug!(address = %addr, "address whitelisted");
        self.whitelist.insert(addr);
        Ok(())
    }

    pub fn is_whitelisted(&self, addr: &Address) -> bool {
        self.whitelist.contains(addr)
    }

    /// Mint `amount` new tokens to the caller. Whitelist-gated; repeat
    /// issuance is legal and grows supply each time.
    pub fn issue(&mut self, caller: &Address, amount: u128) -> Result<SeqNo, TokenError> {
        self.require_whitelisted(caller, "issue tokens")?;
        let seq = self.ledger.mint(caller, amount)?;
        tracing::debug!(%seq, to = %caller, amount, "tokens issued");
        Ok(seq)
    }

    /// Burn `amount` of the caller's own tokens. Whitelist-gated.
    pub fn burn_tokens(&mut self, caller: &Address, amount: u128) -> Result<SeqNo, TokenError> {
        self.require_whitelisted(caller, "burn tokens")?;
        let seq = self.ledger.burn(caller, amount)?;
        tracing::debug!(%seq, from = %caller, amount, "tokens burned");
        Ok(seq)
    }

    /// Transfer the caller's own tokens. Open to anyone with balance.
    pub fn transfer(
        &mut self,
        caller: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<SeqNo, TokenError> {
        let seq = self.ledger.transfer(caller, to, amount)?;
        tracing::debug!(%seq, from = %caller, %to, amount, "transfer");
        Ok(seq)
    }

    /// Approve `spender` to spend up to `amount` of the caller's tokens.
    /// Overwrites any previous approval; approving zero revokes it.
    pub fn approve(&mut self, caller: &Address, spender: &Address, amount: u128) {
        tracing::debug!(owner = %caller, %spender, amount, "approval set");
        if amount == 0 {
            self.allowances.remove(&(caller.clone(), spender.clone()));
        } else {
            self.allowances
                .insert((caller.clone(), spender.clone()), amount);
        }
    }

    /// Remaining amount `spender` may spend on behalf of `owner`.
    pub fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.allowances
            .get(&(owner.clone(), spender.clone()))
            .copied()
            .unwrap_or(0)
    }

    /// Spend from `from`'s balance within the caller's allowance.
    ///
    /// The allowance is checked before the ledger is touched and decremented
    /// only after the ledger transfer succeeds, so a failed transfer leaves
    /// the allowance intact.
    pub fn transfer_from(
        &mut self,
        caller: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<SeqNo, TokenError> {
        let approved = self.allowance(from, caller);
        if approved < amount {
            return Err(TokenError::AllowanceExceeded {
                needed: amount,
                approved,
            });
        }

        let seq = self.ledger.transfer(from, to, amount)?;
        let remaining = approved - amount;
        self.approve_internal(from, caller, remaining);
        tracing::debug!(%seq, spender = %caller, %from, %to, amount, remaining, "transfer_from");
        Ok(seq)
    }

    /// Administrative transfer bypassing allowances. Owner-only; preserves
    /// total supply and still requires the source to have the balance.
    pub fn force_transfer(
        &mut self,
        caller: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<SeqNo, TokenError> {
        self.require_owner(caller, "force a transfer")?;
        let seq = self.ledger.force_transfer(from, to, amount)?;
        tracing::debug!(%seq, %from, %to, amount, "forced transfer");
        Ok(seq)
    }

    pub fn balance_of(&self, account: &Address) -> u128 {
        self.ledger.current_balance(account)
    }

    pub fn balance_at(&self, account: &Address, seq: SeqNo) -> u128 {
        self.ledger.balance_at(account, seq)
    }

    pub fn total_supply(&self) -> u128 {
        self.ledger.total_supply()
    }

    pub fn sequence(&self) -> SeqNo {
        self.ledger.sequence()
    }

    fn approve_internal(&mut self, owner: &Address, spender: &Address, amount: u128) {
        if amount == 0 {
            self.allowances.remove(&(owner.clone(), spender.clone()));
        } else {
            self.allowances
                .insert((owner.clone(), spender.clone()), amount);
        }
    }

    fn require_owner(&self, caller: &Address, action: &'static str) -> Result<(), TokenError> {
        if caller != &self.owner {
            tracing::warn!(caller = %caller, action, "unauthorized call rejected");
            return Err(TokenError::NotAuthorized {
                caller: caller.to_string(),
                action,
            });
        }
        Ok(())
    }

    fn require_whitelisted(&self, caller: &Address, action: &'static str) -> Result<(), TokenError> {
        if !self.whitelist.contains(caller) {
            tracing::warn!(caller = %caller, action, "unauthorized call rejected");
            return Err(TokenError::NotAuthorized {
                caller: caller.to_string(),
                action,
            });
        }
        Ok(())
    }
}
