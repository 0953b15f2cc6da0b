use solana_program::{
    account_info::AccountInfo,
    entrypoint::ProgramResult,
    msg,
    program::{invoke, invoke_signed},
    program_pack::Pack,
    pubkey::Pubkey,
    system_instruction,
    sysvar::{rent::Rent, Sysvar},
};

use spl_token::state::Account as TokenAccount;

use crate::{
    accounts::{CancelSwapAccounts, CreateSwapAccounts},
    custody,
    error::SwapError,
    instruction::SwapInstruction,
    pda::{self, ESCROW_SEED, SWAP_SEED},
    state::{Swap, SwapState},
};

pub struct Processor;
impl Processor {
    pub fn process(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        instruction_data: &[u8],
    ) -> ProgramResult {
        let instruction = SwapInstruction::unpack(instruction_data)?;

        match instruction {
            SwapInstruction::CreateSwap {
                offered_amount,
                desired_amount,
            } => {
                msg!("Instruction: CreateSwap");
                Self::process_create_swap(program_id, accounts, offered_amount, desired_amount)
            }
            SwapInstruction::CancelSwap => {
                msg!("Instruction: CancelSwap");
                Self::process_cancel_swap(program_id, accounts)
            }
        }
    }

    fn process_create_swap(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        offered_amount: u64,
        desired_amount: u64,
    ) -> ProgramResult {
        let accounts = CreateSwapAccounts::validate(program_id, accounts)?;

        let swap = SwapState::load(program_id, accounts.swap)?.create(Swap {
            is_initialized: false,
            creator: *accounts.creator.key,
            offered_mint: *accounts.offered_mint.key,
            desired_mint: *accounts.desired_mint.key,
            offered_amount,
            desired_amount,
            escrow: *accounts.escrow.key,
            creator_holding: *accounts.creator_holding.key,
            swap_bump: accounts.swap_bump,
            escrow_bump: accounts.escrow_bump,
        })?;

        let holding_balance = custody::token_balance(accounts.creator_holding)?;
        if holding_balance < offered_amount {
            msg!(
                "Holding account has {} tokens, swap offers {}",
                holding_balance,
                offered_amount
            );
            return Err(SwapError::InsufficientFunds.into());
        }

        let rent = Rent::get()?;
        let swap_bump = [swap.swap_bump];
        let swap_seeds: &[&[u8]] = &[SWAP_SEED, swap.creator_holding.as_ref(), &swap_bump];
        let escrow_bump = [swap.escrow_bump];
        let escrow_seeds: &[&[u8]] = &[ESCROW_SEED, swap.creator_holding.as_ref(), &escrow_bump];

        msg!("Creating swap record {}", accounts.swap.key);
        Self::create_program_account(
            accounts.creator,
            accounts.swap,
            accounts.system_program,
            &rent,
            Swap::LEN,
            program_id,
            swap_seeds,
        )?;

        msg!("Creating escrow {}", accounts.escrow.key);
        Self::create_program_account(
            accounts.creator,
            accounts.escrow,
            accounts.system_program,
            &rent,
            TokenAccount::LEN,
            &spl_token::id(),
            escrow_seeds,
        )?;
        let init_escrow_ix = spl_token::instruction::initialize_account3(
            accounts.token_program.key,
            accounts.escrow.key,
            accounts.offered_mint.key,
            accounts.escrow.key,
        )?;
        invoke_signed(
            &init_escrow_ix,
            &[
                accounts.escrow.clone(),
                accounts.offered_mint.clone(),
                accounts.token_program.clone(),
            ],
            &[],
        )?;

        Swap::pack(swap, &mut accounts.swap.try_borrow_mut_data()?)?;

        custody::transfer(
            accounts.token_program,
            accounts.creator_holding,
            accounts.escrow,
            accounts.creator,
            offered_amount,
            &[],
        )?;

        msg!(
            "Swap opened: {} of {} for {} of {}",
            swap.offered_amount,
            swap.offered_mint,
            swap.desired_amount,
            swap.desired_mint
        );
        Ok(())
    }

    fn process_cancel_swap(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
        let accounts = CancelSwapAccounts::validate(program_id, accounts)?;

        let swap = SwapState::load(program_id, accounts.swap)?.cancel(accounts.creator.key)?;

        if swap.creator_holding != *accounts.creator_holding.key
            || swap.escrow != *accounts.escrow.key
        {
            msg!("Swap record does not match the supplied accounts");
            return Err(SwapError::AccountContractViolation.into());
        }
        pda::check_address(
            accounts.swap.key,
            SWAP_SEED,
            &swap.creator_holding,
            swap.swap_bump,
            program_id,
        )?;
        pda::check_address(
            accounts.escrow.key,
            ESCROW_SEED,
            &swap.creator_holding,
            swap.escrow_bump,
            program_id,
        )?;

        let escrow_bump = [swap.escrow_bump];
        let escrow_seeds: &[&[u8]] = &[ESCROW_SEED, swap.creator_holding.as_ref(), &escrow_bump];
        let refunded = custody::refund_escrow(
            accounts.token_program,
            accounts.escrow,
            accounts.creator_holding,
            accounts.creator,
            swap.offered_amount,
            escrow_seeds,
        )?;

        custody::close_program_account(accounts.swap, accounts.creator)?;

        msg!(
            "Swap cancelled: {} tokens returned to {}",
            refunded,
            accounts.creator_holding.key
        );
        Ok(())
    }

    /// Allocates a rent-exempt account at a derived address, signing with its seeds.
    ///
    /// Anyone can send lamports to a derived address before the swap exists, so
    /// an address that already holds lamports is topped up to the rent-exempt
    /// minimum and then allocated and assigned instead of created.
    fn create_program_account<'a>(
        payer: &AccountInfo<'a>,
        new_account: &AccountInfo<'a>,
        system_program: &AccountInfo<'a>,
        rent: &Rent,
        space: usize,
        owner: &Pubkey,
        signer_seeds: &[&[u8]],
    ) -> ProgramResult {
        let required_lamports = rent.minimum_balance(space).max(1);

        if new_account.lamports() > 0 {
            let top_up = required_lamports.saturating_sub(new_account.lamports());
            if top_up > 0 {
                invoke(
                    &system_instruction::transfer(payer.key, new_account.key, top_up),
                    &[payer.clone(), new_account.clone(), system_program.clone()],
                )?;
            }

            invoke_signed(
                &system_instruction::allocate(new_account.key, space as u64),
                &[new_account.clone(), system_program.clone()],
                &[signer_seeds],
            )?;

            invoke_signed(
                &system_instruction::assign(new_account.key, owner),
                &[new_account.clone(), system_program.clone()],
                &[signer_seeds],
            )
        } else {
            invoke_signed(
                &system_instruction::create_account(
                    payer.key,
                    new_account.key,
                    required_lamports,
                    space as u64,
                    owner,
                ),
                &[payer.clone(), new_account.clone(), system_program.clone()],
                &[signer_seeds],
            )
        }
    }
}
