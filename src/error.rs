use std::convert::TryFrom;

use thiserror::Error;

use solana_program::program_error::ProgramError;

/// Rejection reasons surfaced to clients as `ProgramError::Custom(code)`.
///
/// The discriminants are part of the wire contract: clients map the custom
/// code back to a kind to decide whether to resubmit, fix the signing
/// authority, or fix the account list. Codes start at 6000 so they never
/// collide with the system or token program codes a failed CPI reports.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum SwapError {
    /// Unknown instruction discriminant
    #[error("Unknown instruction")]
    UnknownInstruction = 6000,
    /// Instruction data shorter than its fixed layout
    #[error("Truncated instruction payload")]
    TruncatedPayload = 6001,
    /// Account list does not satisfy the instruction's account contract
    #[error("Account contract violation")]
    AccountContractViolation = 6002,
    /// A swap already exists at the derived address
    #[error("Swap already exists")]
    AlreadyExists = 6003,
    /// No swap exists at the derived address
    #[error("Swap not found")]
    NotFound = 6004,
    /// Signer is not the swap creator
    #[error("Unauthorized")]
    Unauthorized = 6005,
    /// Source token account holds less than the transfer amount
    #[error("Insufficient funds")]
    InsufficientFunds = 6006,
    /// Offered or desired amount is zero
    #[error("Invalid amount")]
    InvalidAmount = 6007,
    /// No viable bump seed for a derived address
    #[error("Address derivation failed")]
    DerivationFailed = 6008,
    /// Lamport arithmetic overflowed while reclaiming storage
    #[error("Amount overflow")]
    AmountOverflow = 6009,
}

impl SwapError {
    /// Recovers the kind from a ledger-reported program error.
    pub fn from_program_error(error: &ProgramError) -> Option<Self> {
        match error {
            ProgramError::Custom(code) => Self::try_from(*code).ok(),
            _ => None,
        }
    }
}

impl From<SwapError> for ProgramError {
    fn from(e: SwapError) -> Self {
        ProgramError::Custom(e as u32)
    }
}

impl TryFrom<u32> for SwapError {
    type Error = u32;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        Ok(match code {
            6000 => Self::UnknownInstruction,
            6001 => Self::TruncatedPayload,
            6002 => Self::AccountContractViolation,
            6003 => Self::AlreadyExists,
            6004 => Self::NotFound,
            6005 => Self::Unauthorized,
            6006 => Self::InsufficientFunds,
            6007 => Self::InvalidAmount,
            6008 => Self::DerivationFailed,
            6009 => Self::AmountOverflow,
            _ => return Err(code),
        })
    }
}
