//! Token metadata — name, symbol, decimals.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default number of decimal places for display purposes.
/// Balances are stored as raw integer units; decimals only affect rendering.
pub const DEFAULT_DECIMALS: u8 = 18;

/// Descriptive token metadata.
///
/// Metadata is independent of the balance ledger: changing the name or symbol
/// does not advance the ledger sequence and has no effect on balances.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl TokenInfo {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals: DEFAULT_DECIMALS,
        }
    }
}

impl fmt::Display for TokenInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.symbol)
    }
}
