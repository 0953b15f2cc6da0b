use solana_program::{
    account_info::AccountInfo, entrypoint, entrypoint::ProgramResult, msg, pubkey::Pubkey,
};

use crate::{error::SwapError, processor::Processor};

entrypoint!(process_instruction);
fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    if let Err(error) = Processor::process(program_id, accounts, instruction_data) {
        match SwapError::from_program_error(&error) {
            Some(kind) => msg!("Error: {}", kind),
            None => msg!("Error: {}", error),
        }
        return Err(error);
    }
    Ok(())
}
