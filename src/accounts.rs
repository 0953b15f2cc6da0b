//! Positional account contracts of each instruction.
//!
//! Every check here runs before the processor touches any account, so a
//! rejected list never leaves partial state behind.

use solana_program::{
    account_info::{next_account_info, AccountInfo},
    msg,
    program_error::ProgramError,
    program_pack::Pack,
    pubkey::Pubkey,
    system_program,
};
use spl_token::state::{Account as TokenAccount, Mint};

use crate::{error::SwapError, pda};

fn violation(reason: &str) -> ProgramError {
    msg!("Account contract violation: {}", reason);
    SwapError::AccountContractViolation.into()
}

fn check_count(accounts: &[AccountInfo], expected: usize) -> Result<(), ProgramError> {
    if accounts.len() != expected {
        msg!("Expected {} accounts, got {}", expected, accounts.len());
        return Err(violation("account count"));
    }
    Ok(())
}

fn check_signer(account: &AccountInfo, role: &str) -> Result<(), ProgramError> {
    if !account.is_signer {
        return Err(violation(role));
    }
    Ok(())
}

fn check_writable(account: &AccountInfo, role: &str) -> Result<(), ProgramError> {
    if !account.is_writable {
        return Err(violation(role));
    }
    Ok(())
}

fn check_program(account: &AccountInfo, expected: &Pubkey, role: &str) -> Result<(), ProgramError> {
    if account.key != expected {
        return Err(violation(role));
    }
    Ok(())
}

fn check_mint(account: &AccountInfo) -> Result<(), ProgramError> {
    if *account.owner != spl_token::id() {
        return Err(violation("mint is not owned by the token program"));
    }
    Mint::unpack(&account.try_borrow_data()?).map_err(|_| violation("malformed mint"))?;
    Ok(())
}

fn unpack_token_account(account: &AccountInfo) -> Result<TokenAccount, ProgramError> {
    if *account.owner != spl_token::id() {
        return Err(violation("holding account is not owned by the token program"));
    }
    TokenAccount::unpack(&account.try_borrow_data()?)
        .map_err(|_| violation("malformed holding account"))
}

fn check_derived(
    account: &AccountInfo,
    tag: &[u8],
    creator_holding: &Pubkey,
    program_id: &Pubkey,
) -> Result<u8, ProgramError> {
    let (expected, bump) = pda::derive_address(tag, creator_holding, program_id)?;
    if *account.key != expected {
        msg!("Expected derived address {}, got {}", expected, account.key);
        return Err(violation("derived address mismatch"));
    }
    Ok(bump)
}

/// Validated account list of `CreateSwap`.
pub struct CreateSwapAccounts<'a, 'info> {
    pub creator: &'a AccountInfo<'info>,
    pub offered_mint: &'a AccountInfo<'info>,
    pub creator_holding: &'a AccountInfo<'info>,
    pub desired_mint: &'a AccountInfo<'info>,
    pub swap: &'a AccountInfo<'info>,
    pub escrow: &'a AccountInfo<'info>,
    pub token_program: &'a AccountInfo<'info>,
    pub system_program: &'a AccountInfo<'info>,
    pub swap_bump: u8,
    pub escrow_bump: u8,
}

impl<'a, 'info> CreateSwapAccounts<'a, 'info> {
    pub const LEN: usize = 8;

    pub fn validate(
        program_id: &Pubkey,
        accounts: &'a [AccountInfo<'info>],
    ) -> Result<Self, ProgramError> {
        check_count(accounts, Self::LEN)?;
        let account_info_iter = &mut accounts.iter();
        let creator = next_account_info(account_info_iter)?;
        let offered_mint = next_account_info(account_info_iter)?;
        let creator_holding = next_account_info(account_info_iter)?;
        let desired_mint = next_account_info(account_info_iter)?;
        let swap = next_account_info(account_info_iter)?;
        let escrow = next_account_info(account_info_iter)?;
        let token_program = next_account_info(account_info_iter)?;
        let system_program = next_account_info(account_info_iter)?;

        check_program(token_program, &spl_token::id(), "token program")?;
        check_program(system_program, &system_program::id(), "system program")?;

        check_signer(creator, "creator must sign")?;
        check_writable(creator, "creator must be writable")?;

        check_mint(offered_mint)?;
        check_mint(desired_mint)?;
        if offered_mint.key == desired_mint.key {
            return Err(violation("offered and desired mints are the same"));
        }

        check_writable(creator_holding, "holding account must be writable")?;
        let holding = unpack_token_account(creator_holding)?;
        if holding.mint != *offered_mint.key {
            return Err(violation("holding account mint differs from offered mint"));
        }
        if holding.owner != *creator.key {
            return Err(violation("holding account is not owned by the creator"));
        }

        check_writable(swap, "swap record must be writable")?;
        check_writable(escrow, "escrow must be writable")?;
        let swap_bump = check_derived(swap, pda::SWAP_SEED, creator_holding.key, program_id)?;
        let escrow_bump =
            check_derived(escrow, pda::ESCROW_SEED, creator_holding.key, program_id)?;

        Ok(Self {
            creator,
            offered_mint,
            creator_holding,
            desired_mint,
            swap,
            escrow,
            token_program,
            system_program,
            swap_bump,
            escrow_bump,
        })
    }
}

/// Validated account list of `CancelSwap`.
///
/// The holding account's owner is not compared with the signer; the swap
/// record decides who may cancel.
pub struct CancelSwapAccounts<'a, 'info> {
    pub creator: &'a AccountInfo<'info>,
    pub creator_holding: &'a AccountInfo<'info>,
    pub swap: &'a AccountInfo<'info>,
    pub escrow: &'a AccountInfo<'info>,
    pub token_program: &'a AccountInfo<'info>,
    pub system_program: &'a AccountInfo<'info>,
}

impl<'a, 'info> CancelSwapAccounts<'a, 'info> {
    pub const LEN: usize = 6;

    pub fn validate(
        program_id: &Pubkey,
        accounts: &'a [AccountInfo<'info>],
    ) -> Result<Self, ProgramError> {
        check_count(accounts, Self::LEN)?;
        let account_info_iter = &mut accounts.iter();
        let creator = next_account_info(account_info_iter)?;
        let creator_holding = next_account_info(account_info_iter)?;
        let swap = next_account_info(account_info_iter)?;
        let escrow = next_account_info(account_info_iter)?;
        let token_program = next_account_info(account_info_iter)?;
        let system_program = next_account_info(account_info_iter)?;

        check_program(token_program, &spl_token::id(), "token program")?;
        check_program(system_program, &system_program::id(), "system program")?;

        check_signer(creator, "creator must sign")?;
        check_writable(creator, "creator must be writable")?;

        check_writable(creator_holding, "holding account must be writable")?;
        unpack_token_account(creator_holding)?;

        check_writable(swap, "swap record must be writable")?;
        check_writable(escrow, "escrow must be writable")?;
        check_derived(swap, pda::SWAP_SEED, creator_holding.key, program_id)?;
        check_derived(escrow, pda::ESCROW_SEED, creator_holding.key, program_id)?;

        Ok(Self {
            creator,
            creator_holding,
            swap,
            escrow,
            token_program,
            system_program,
        })
    }
}
