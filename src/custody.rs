//! Token movements between a creator's holding account and the escrow,
//! plus reclamation of the swap's storage.

use solana_program::{
    account_info::AccountInfo,
    entrypoint::ProgramResult,
    msg,
    program::invoke_signed,
    program_error::ProgramError,
    program_memory::sol_memset,
    program_pack::Pack,
};
use spl_token::state::Account as TokenAccount;

use crate::error::SwapError;

/// Reads the token balance of an SPL token account.
pub fn token_balance(account: &AccountInfo) -> Result<u64, ProgramError> {
    Ok(TokenAccount::unpack(&account.try_borrow_data()?)?.amount)
}

/// Moves `amount` tokens from `from` to `to` under `authority`.
///
/// An empty `signer_seeds` means `authority` signed the transaction itself;
/// otherwise the seeds must re-derive `authority` exactly or the token
/// program rejects the missing signature.
pub fn transfer<'a>(
    token_program: &AccountInfo<'a>,
    from: &AccountInfo<'a>,
    to: &AccountInfo<'a>,
    authority: &AccountInfo<'a>,
    amount: u64,
    signer_seeds: &[&[&[u8]]],
) -> ProgramResult {
    let balance = token_balance(from)?;
    if balance < amount {
        msg!(
            "Token account {} holds {} but {} was requested",
            from.key,
            balance,
            amount
        );
        return Err(SwapError::InsufficientFunds.into());
    }

    let transfer_ix = spl_token::instruction::transfer(
        token_program.key,
        from.key,
        to.key,
        authority.key,
        &[authority.key],
        amount,
    )?;
    msg!("Transferring {} tokens from {} to {}", amount, from.key, to.key);
    invoke_signed(
        &transfer_ix,
        &[
            from.clone(),
            to.clone(),
            authority.clone(),
            token_program.clone(),
        ],
        signer_seeds,
    )
}

/// Returns the whole escrow balance to `destination` and closes the escrow.
///
/// The escrow is its own authority, so `escrow_seeds` are the seeds it was
/// created with. Rent lamports go to `rent_recipient`.
pub fn refund_escrow<'a>(
    token_program: &AccountInfo<'a>,
    escrow: &AccountInfo<'a>,
    destination: &AccountInfo<'a>,
    rent_recipient: &AccountInfo<'a>,
    expected_amount: u64,
    escrow_seeds: &[&[u8]],
) -> Result<u64, ProgramError> {
    let balance = token_balance(escrow)?;
    if balance < expected_amount {
        msg!(
            "Escrow {} holds {} but the swap locked {}",
            escrow.key,
            balance,
            expected_amount
        );
        return Err(SwapError::InsufficientFunds.into());
    }

    transfer(
        token_program,
        escrow,
        destination,
        escrow,
        balance,
        &[escrow_seeds],
    )?;

    let close_ix = spl_token::instruction::close_account(
        token_program.key,
        escrow.key,
        rent_recipient.key,
        escrow.key,
        &[escrow.key],
    )?;
    msg!("Closing escrow {}", escrow.key);
    invoke_signed(
        &close_ix,
        &[
            escrow.clone(),
            rent_recipient.clone(),
            escrow.clone(),
            token_program.clone(),
        ],
        &[escrow_seeds],
    )?;

    Ok(balance)
}

/// Drains a program-owned account into `destination` and wipes its data.
pub fn close_program_account(account: &AccountInfo, destination: &AccountInfo) -> ProgramResult {
    **destination.try_borrow_mut_lamports()? = destination
        .lamports()
        .checked_add(account.lamports())
        .ok_or(SwapError::AmountOverflow)?;
    **account.try_borrow_mut_lamports()? = 0;

    let mut data = account.try_borrow_mut_data()?;
    let len = data.len();
    sol_memset(&mut data, 0, len);
    Ok(())
}
