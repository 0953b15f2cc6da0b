//! Program derived addresses for swap records and escrow accounts.
//!
//! Both addresses are seeded with a domain tag followed by the raw bytes of
//! the creator's offered-asset holding account, so every holding account maps
//! to exactly one swap slot and one escrow slot. Neither address has a
//! private key; only this program can sign for them.

use solana_program::{msg, pubkey::Pubkey};

use crate::error::SwapError;

/// Domain tag of the swap record address.
pub const SWAP_SEED: &[u8] = b"swap";
/// Domain tag of the escrow token account address.
pub const ESCROW_SEED: &[u8] = b"escrow";

/// Finds the canonical address and bump for `tag` and `seed_key`.
pub fn derive_address(
    tag: &[u8],
    seed_key: &Pubkey,
    program_id: &Pubkey,
) -> Result<(Pubkey, u8), SwapError> {
    Pubkey::try_find_program_address(&[tag, seed_key.as_ref()], program_id)
        .ok_or(SwapError::DerivationFailed)
}

pub fn find_swap_address(
    creator_holding: &Pubkey,
    program_id: &Pubkey,
) -> Result<(Pubkey, u8), SwapError> {
    derive_address(SWAP_SEED, creator_holding, program_id)
}

pub fn find_escrow_address(
    creator_holding: &Pubkey,
    program_id: &Pubkey,
) -> Result<(Pubkey, u8), SwapError> {
    derive_address(ESCROW_SEED, creator_holding, program_id)
}

/// Re-derives an address from a recorded bump.
pub fn create_address(
    tag: &[u8],
    seed_key: &Pubkey,
    bump: u8,
    program_id: &Pubkey,
) -> Result<Pubkey, SwapError> {
    Pubkey::create_program_address(&[tag, seed_key.as_ref(), &[bump]], program_id)
        .map_err(|_| SwapError::DerivationFailed)
}

/// Fails unless `address` is exactly the one derived from the recorded bump.
pub fn check_address(
    address: &Pubkey,
    tag: &[u8],
    seed_key: &Pubkey,
    bump: u8,
    program_id: &Pubkey,
) -> Result<(), SwapError> {
    match create_address(tag, seed_key, bump, program_id) {
        Ok(expected) if expected == *address => Ok(()),
        _ => {
            msg!("Derived address mismatch for {}", address);
            Err(SwapError::AccountContractViolation)
        }
    }
}
