//! Two-party escrow token swap.
//!
//! A creator locks tokens of one mint into an escrow account owned by this
//! program and states how much of another mint it wants back. Until the swap
//! is taken, the creator can cancel it and reclaim the locked tokens.

pub mod accounts;
pub mod custody;
pub mod error;
pub mod instruction;
pub mod pda;
pub mod processor;
pub mod state;

#[cfg(not(feature = "no-entrypoint"))]
pub mod entrypoint;

pub use solana_program;

// Flow of one instruction:
// entrypoint -> processor -> instruction (decode) -> accounts (validate)
//   -> state (transition) -> custody (token moves, storage reclaim)
//
// Transactions are atomic, so any error after a CPI still rolls back every
// account the instruction touched.

solana_program::declare_id!("RguigFdFWUa2oSDGSD66LC22YWEq11GJ4MbnZSs7Fsk");
