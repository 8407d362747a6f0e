// SolPot Raffle Program - Events
//
// Events are the machine-readable record of the round lifecycle: one per
// entry, one per randomness request, one per payout. They are logged as
// `sol_log_data(&[name, borsh payload])` so indexers can follow entry order
// and correlate a draw with its fulfillment by request id.
use borsh::BorshSerialize;
use solana_program::{log::sol_log_data, program_error::ProgramError, pubkey::Pubkey};

/// A participant entered the current round
#[derive(BorshSerialize, Debug)]
pub struct EntryRecorded {
    pub player: Pubkey,
}

/// Entries closed and a randomness request was issued
#[derive(BorshSerialize, Debug)]
pub struct DrawRequested {
    pub request_id: u64,
}

/// A winner was selected and paid
#[derive(BorshSerialize, Debug)]
pub struct WinnerPicked {
    pub winner: Pubkey,
    pub prize: u64,
}

/// Emit an event as structured log data
pub fn emit<E: BorshSerialize>(name: &str, event: &E) -> Result<(), ProgramError> {
    let payload = event
        .try_to_vec()
        .map_err(|e| ProgramError::BorshIoError(e.to_string()))?;
    sol_log_data(&[name.as_bytes(), &payload]);
    Ok(())
}

pub const ENTRY_RECORDED: &str = "EntryRecorded";
pub const DRAW_REQUESTED: &str = "DrawRequested";
pub const WINNER_PICKED: &str = "WinnerPicked";
