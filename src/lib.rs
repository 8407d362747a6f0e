// SolPot - a self-contained raffle program on Solana
//
// Participants deposit a fixed entrance fee; once the configured interval
// has elapsed an external automation trigger closes entries and requests a
// random value, and the oracle's callback pays the winner and reopens the
// round.

pub mod error;
pub mod event;
pub mod instruction;
pub mod processor;
pub mod state;
pub mod utils;

#[cfg(not(feature = "no-entrypoint"))]
pub mod entrypoint;

use solana_program::{
    account_info::AccountInfo, entrypoint::ProgramResult, pubkey::Pubkey,
};

pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    processor::Processor::process_instruction(program_id, accounts, instruction_data)
}
