//! Token engine layered over the snapshot ledger.
//!
//! The ledger below enforces balance sufficiency; this crate adds everything
//! a caller-facing token needs on top of it:
//! - Metadata (name, symbol, decimals) and owner-gated renaming
//! - An issuance whitelist for mint/burn rights
//! - Allowances (approve / transfer_from)
//! - Owner-only force transfers

pub mod engine;
pub mod error;

pub use engine::TokenEngine;
pub use error::TokenError;
