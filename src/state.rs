use arrayref::{array_mut_ref, array_ref, array_refs, mut_array_refs};
use solana_program::{
    account_info::AccountInfo,
    msg,
    program_error::ProgramError,
    program_pack::{IsInitialized, Pack, Sealed},
    pubkey::Pubkey,
};

use crate::error::SwapError;

/// On-ledger record of one open swap offer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Swap {
    pub is_initialized: bool,
    pub creator: Pubkey,
    pub offered_mint: Pubkey,
    pub desired_mint: Pubkey,
    pub offered_amount: u64,
    pub desired_amount: u64,
    pub escrow: Pubkey,
    /// The creator's offered-mint token account; seed key of both derived addresses.
    pub creator_holding: Pubkey,
    pub swap_bump: u8,
    pub escrow_bump: u8,
}

impl Sealed for Swap {}

impl IsInitialized for Swap {
    fn is_initialized(&self) -> bool {
        self.is_initialized
    }
}

impl Pack for Swap {
    const LEN: usize = 1 + (5 * 32) + (2 * 8) + (2 * 1);

    fn unpack_from_slice(src: &[u8]) -> Result<Self, ProgramError> {
        let src = array_ref![src, 0, Swap::LEN];
        let (
            is_initialized,
            creator,
            offered_mint,
            desired_mint,
            offered_amount,
            desired_amount,
            escrow,
            creator_holding,
            swap_bump,
            escrow_bump,
        ) = array_refs![src, 1, 32, 32, 32, 8, 8, 32, 32, 1, 1];

        Ok(Swap {
            is_initialized: match is_initialized {
                [0] => false,
                [1] => true,
                _ => return Err(ProgramError::InvalidAccountData),
            },
            creator: Pubkey::new_from_array(*creator),
            offered_mint: Pubkey::new_from_array(*offered_mint),
            desired_mint: Pubkey::new_from_array(*desired_mint),
            offered_amount: u64::from_le_bytes(*offered_amount),
            desired_amount: u64::from_le_bytes(*desired_amount),
            escrow: Pubkey::new_from_array(*escrow),
            creator_holding: Pubkey::new_from_array(*creator_holding),
            swap_bump: swap_bump[0],
            escrow_bump: escrow_bump[0],
        })
    }

    fn pack_into_slice(&self, dst: &mut [u8]) {
        let dst = array_mut_ref![dst, 0, Swap::LEN];
        let (
            is_initialized,
            creator,
            offered_mint,
            desired_mint,
            offered_amount,
            desired_amount,
            escrow,
            creator_holding,
            swap_bump,
            escrow_bump,
        ) = mut_array_refs![dst, 1, 32, 32, 32, 8, 8, 32, 32, 1, 1];

        is_initialized[0] = self.is_initialized as u8;
        creator.copy_from_slice(self.creator.as_ref());
        offered_mint.copy_from_slice(self.offered_mint.as_ref());
        desired_mint.copy_from_slice(self.desired_mint.as_ref());
        *offered_amount = self.offered_amount.to_le_bytes();
        *desired_amount = self.desired_amount.to_le_bytes();
        escrow.copy_from_slice(self.escrow.as_ref());
        creator_holding.copy_from_slice(self.creator_holding.as_ref());
        swap_bump[0] = self.swap_bump;
        escrow_bump[0] = self.escrow_bump;
    }
}

/// Lifecycle of the swap slot at one derived address.
///
/// A closed swap has its storage reclaimed, so it loads back as
/// `Uninitialized` and the slot can be reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwapState {
    Uninitialized,
    Open(Swap),
}

impl SwapState {
    /// Reads the slot from the swap record account.
    pub fn load(program_id: &Pubkey, account: &AccountInfo) -> Result<Self, ProgramError> {
        let data = account.try_borrow_data()?;
        if data.is_empty() {
            return Ok(Self::Uninitialized);
        }
        if account.owner != program_id || data.len() != Swap::LEN {
            msg!("Swap record {} is not owned by this program", account.key);
            return Err(SwapError::AccountContractViolation.into());
        }
        let swap = Swap::unpack_unchecked(&data)?;
        Ok(if swap.is_initialized() {
            Self::Open(swap)
        } else {
            Self::Uninitialized
        })
    }

    /// `Uninitialized -> Open`. Returns the record to persist.
    pub fn create(self, terms: Swap) -> Result<Swap, SwapError> {
        match self {
            Self::Open(_) => Err(SwapError::AlreadyExists),
            Self::Uninitialized => {
                if terms.offered_amount == 0 || terms.desired_amount == 0 {
                    return Err(SwapError::InvalidAmount);
                }
                Ok(Swap {
                    is_initialized: true,
                    ..terms
                })
            }
        }
    }

    /// `Open -> Closed`. Returns the record whose escrow must be refunded.
    pub fn cancel(self, signer: &Pubkey) -> Result<Swap, SwapError> {
        match self {
            Self::Uninitialized => Err(SwapError::NotFound),
            Self::Open(swap) if swap.creator != *signer => Err(SwapError::Unauthorized),
            Self::Open(swap) => Ok(swap),
        }
    }
}
