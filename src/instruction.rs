use solana_program::{
    instruction::{AccountMeta, Instruction},
    program_error::ProgramError,
    pubkey::Pubkey,
    system_program,
};
use std::{convert::TryInto, mem::size_of};

use crate::{error::SwapError, pda};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SwapInstruction {
    /// Opens a swap and moves the offered tokens into escrow.
    ///
    /// Accounts expected:
    ///
    /// 0. `[writable, signer]` The creator, pays for both new accounts
    /// 1. `[]` Mint of the offered token
    /// 2. `[writable]` The creator's token account for the offered mint
    /// 3. `[]` Mint of the desired token
    /// 4. `[writable]` Swap record, created here. Seeds = [b"swap", creator holding]
    /// 5. `[writable]` Escrow token account, created here and owned by itself.
    ///    Seeds = [b"escrow", creator holding]
    /// 6. `[]` The token program
    /// 7. `[]` The system program
    CreateSwap {
        /// Amount of the offered token locked into escrow
        offered_amount: u64,
        /// Amount of the desired token wanted in return
        desired_amount: u64,
    },

    /// Cancels a swap, refunds the escrow and closes both accounts.
    ///
    /// Accounts expected:
    ///
    /// 0. `[writable, signer]` The creator, receives the reclaimed rent
    /// 1. `[writable]` The creator's token account for the offered mint
    /// 2. `[writable]` Swap record, closed here
    /// 3. `[writable]` Escrow token account, closed here
    /// 4. `[]` The token program
    /// 5. `[]` The system program
    CancelSwap,
}

impl SwapInstruction {
    pub const CREATE_SWAP_LEN: usize = 1 + 2 * size_of::<u64>();

    /// Unpacks a byte buffer into a [SwapInstruction](enum.SwapInstruction.html).
    pub fn unpack(input: &[u8]) -> Result<Self, ProgramError> {
        let (tag, rest) = input
            .split_first()
            .ok_or(SwapError::TruncatedPayload)?;

        Ok(match tag {
            0 => {
                let (offered_amount, rest) = Self::unpack_u64(rest)?;
                let (desired_amount, _rest) = Self::unpack_u64(rest)?;
                Self::CreateSwap {
                    offered_amount,
                    desired_amount,
                }
            }
            1 => Self::CancelSwap,
            _ => return Err(SwapError::UnknownInstruction.into()),
        })
    }

    pub fn pack(&self) -> Vec<u8> {
        match self {
            Self::CreateSwap {
                offered_amount,
                desired_amount,
            } => {
                let mut buf = Vec::with_capacity(Self::CREATE_SWAP_LEN);
                buf.push(0);
                buf.extend_from_slice(&offered_amount.to_le_bytes());
                buf.extend_from_slice(&desired_amount.to_le_bytes());
                buf
            }
            Self::CancelSwap => vec![1],
        }
    }

    fn unpack_u64(input: &[u8]) -> Result<(u64, &[u8]), ProgramError> {
        if input.len() < size_of::<u64>() {
            return Err(SwapError::TruncatedPayload.into());
        }
        let (amount, rest) = input.split_at(size_of::<u64>());
        let amount = amount
            .try_into()
            .map(u64::from_le_bytes)
            .map_err(|_| SwapError::TruncatedPayload)?;
        Ok((amount, rest))
    }
}

/// Builds a `CreateSwap` instruction for `creator_holding`.
pub fn create_swap(
    program_id: &Pubkey,
    creator: &Pubkey,
    offered_mint: &Pubkey,
    creator_holding: &Pubkey,
    desired_mint: &Pubkey,
    offered_amount: u64,
    desired_amount: u64,
) -> Result<Instruction, ProgramError> {
    let (swap, _) = pda::find_swap_address(creator_holding, program_id)?;
    let (escrow, _) = pda::find_escrow_address(creator_holding, program_id)?;

    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*creator, true),
            AccountMeta::new_readonly(*offered_mint, false),
            AccountMeta::new(*creator_holding, false),
            AccountMeta::new_readonly(*desired_mint, false),
            AccountMeta::new(swap, false),
            AccountMeta::new(escrow, false),
            AccountMeta::new_readonly(spl_token::id(), false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data: SwapInstruction::CreateSwap {
            offered_amount,
            desired_amount,
        }
        .pack(),
    })
}

/// Builds a `CancelSwap` instruction for the swap opened from `creator_holding`.
pub fn cancel_swap(
    program_id: &Pubkey,
    creator: &Pubkey,
    creator_holding: &Pubkey,
) -> Result<Instruction, ProgramError> {
    let (swap, _) = pda::find_swap_address(creator_holding, program_id)?;
    let (escrow, _) = pda::find_escrow_address(creator_holding, program_id)?;

    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*creator, true),
            AccountMeta::new(*creator_holding, false),
            AccountMeta::new(swap, false),
            AccountMeta::new(escrow, false),
            AccountMeta::new_readonly(spl_token::id(), false),
            AccountMeta::new_readonly(system_program::id(), false),
        ],
        data: SwapInstruction::CancelSwap.pack(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_swap_wire_layout() {
        let data = SwapInstruction::CreateSwap {
            offered_amount: 20_000_000_000,
            desired_amount: 5_000_000_000,
        }
        .pack();

        let mut expected = vec![0u8];
        expected.extend_from_slice(&[0x00, 0xc8, 0x17, 0xa8, 0x04, 0x00, 0x00, 0x00]);
        expected.extend_from_slice(&[0x00, 0xf2, 0x05, 0x2a, 0x01, 0x00, 0x00, 0x00]);
        assert_eq!(data, expected);
        assert_eq!(data.len(), SwapInstruction::CREATE_SWAP_LEN);

        assert_eq!(
            SwapInstruction::unpack(&data).unwrap(),
            SwapInstruction::CreateSwap {
                offered_amount: 20_000_000_000,
                desired_amount: 5_000_000_000,
            }
        );
    }

    #[test]
    fn cancel_swap_is_a_single_byte() {
        assert_eq!(SwapInstruction::CancelSwap.pack(), vec![1]);
        assert_eq!(
            SwapInstruction::unpack(&[1]).unwrap(),
            SwapInstruction::CancelSwap
        );
    }

    #[test]
    fn short_create_payload_is_truncated() {
        let data = SwapInstruction::CreateSwap {
            offered_amount: 1,
            desired_amount: 2,
        }
        .pack();

        assert_eq!(
            SwapInstruction::unpack(&data[..16]),
            Err(SwapError::TruncatedPayload.into())
        );
        assert_eq!(
            SwapInstruction::unpack(&data[..1]),
            Err(SwapError::TruncatedPayload.into())
        );
        assert_eq!(
            SwapInstruction::unpack(&[]),
            Err(SwapError::TruncatedPayload.into())
        );
    }

    #[test]
    fn unknown_discriminant_is_rejected() {
        assert_eq!(
            SwapInstruction::unpack(&[2]),
            Err(SwapError::UnknownInstruction.into())
        );
        assert_eq!(
            SwapInstruction::unpack(&[255, 0, 0]),
            Err(SwapError::UnknownInstruction.into())
        );
    }

    #[test]
    fn create_swap_account_contract() {
        let program_id = crate::id();
        let creator = Pubkey::new_unique();
        let offered_mint = Pubkey::new_unique();
        let holding = Pubkey::new_unique();
        let desired_mint = Pubkey::new_unique();

        let ix = create_swap(
            &program_id,
            &creator,
            &offered_mint,
            &holding,
            &desired_mint,
            10,
            3,
        )
        .unwrap();
        let (swap, _) = pda::find_swap_address(&holding, &program_id).unwrap();
        let (escrow, _) = pda::find_escrow_address(&holding, &program_id).unwrap();

        let keys: Vec<Pubkey> = ix.accounts.iter().map(|meta| meta.pubkey).collect();
        assert_eq!(
            keys,
            vec![
                creator,
                offered_mint,
                holding,
                desired_mint,
                swap,
                escrow,
                spl_token::id(),
                system_program::id(),
            ]
        );
        let signers: Vec<bool> = ix.accounts.iter().map(|meta| meta.is_signer).collect();
        assert_eq!(
            signers,
            vec![true, false, false, false, false, false, false, false]
        );
        let writable: Vec<bool> = ix.accounts.iter().map(|meta| meta.is_writable).collect();
        assert_eq!(
            writable,
            vec![true, false, true, false, true, true, false, false]
        );
    }

    #[test]
    fn cancel_swap_account_contract() {
        let program_id = crate::id();
        let creator = Pubkey::new_unique();
        let holding = Pubkey::new_unique();

        let ix = cancel_swap(&program_id, &creator, &holding).unwrap();
        let (swap, _) = pda::find_swap_address(&holding, &program_id).unwrap();
        let (escrow, _) = pda::find_escrow_address(&holding, &program_id).unwrap();

        let keys: Vec<Pubkey> = ix.accounts.iter().map(|meta| meta.pubkey).collect();
        assert_eq!(
            keys,
            vec![
                creator,
                holding,
                swap,
                escrow,
                spl_token::id(),
                system_program::id(),
            ]
        );
        assert!(ix.accounts[0].is_signer);
        assert!(ix.accounts[1..].iter().all(|meta| !meta.is_signer));
        let writable: Vec<bool> = ix.accounts.iter().map(|meta| meta.is_writable).collect();
        assert_eq!(writable, vec![true, true, true, true, false, false]);
        assert_eq!(ix.data, vec![1]);
    }
}
