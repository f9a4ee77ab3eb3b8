//! Fundamental types for the tally token ledger.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: account addresses, sequence numbers, and token metadata.

pub mod address;
pub mod info;
pub mod seq;

pub use address::Address;
pub use info::TokenInfo;
pub use seq::SeqNo;
