//! Token-layer errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("{caller} is not authorized to {action}")]
    NotAuthorized { caller: String, action: &'static str },

    #[error("allowance exceeded: need {needed}, approved {approved}")]
    AllowanceExceeded { needed: u128, approved: u128 },

    #[error(transparent)]
    Ledger(#[from] tally_ledger::LedgerError),
}
