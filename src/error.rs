// SolPot Raffle Program - Errors
use solana_program::{
    decode_error::DecodeError, msg, program_error::PrintProgramError,
    program_error::ProgramError,
};
use thiserror::Error;

/// Errors that may be returned by the SolPot raffle program
#[derive(Error, Debug, Copy, Clone, PartialEq)]
pub enum RaffleError {
    /// Instruction data could not be decoded
    #[error("Invalid instruction")]
    InvalidInstruction,

    /// Raffle account is already initialized
    #[error("Raffle already initialized")]
    AlreadyInitialized,

    /// Raffle account is not initialized
    #[error("Raffle not initialized")]
    NotInitialized,

    /// Deposit is below the entrance fee
    #[error("Deposit is below the entrance fee")]
    NotEnoughDeposit,

    /// Raffle is not open for entries
    #[error("Raffle is not open for entries")]
    RaffleNotOpen,

    /// Player list for this round is full
    #[error("Player list for this round is full")]
    RaffleFull,

    /// Upkeep conditions are not met
    #[error("Upkeep is not needed")]
    UpkeepNotNeeded,

    /// Randomness callback does not match the outstanding request
    #[error("Randomness request id does not match the outstanding request")]
    InvalidRequest,

    /// Randomness callback was not signed by the registered oracle
    #[error("Caller is not the registered oracle authority")]
    UnauthorizedOracle,

    /// Winner account passed in does not match the selected player
    #[error("Winner account does not match the selected player")]
    WinnerAccountMismatch,

    /// Prize transfer to the winner could not be applied
    #[error("Payout transfer failed")]
    PayoutTransferFailed,
}

impl From<RaffleError> for ProgramError {
    fn from(e: RaffleError) -> Self {
        ProgramError::Custom(e as u32)
    }
}

impl<T> DecodeError<T> for RaffleError {
    fn type_of() -> &'static str {
        "Raffle Error"
    }
}

impl PrintProgramError for RaffleError {
    fn print<E>(&self) {
        msg!(&self.to_string());
    }
}
