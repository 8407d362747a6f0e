// SolPot Raffle Program - Instructions
use solana_program::{
    instruction::{AccountMeta, Instruction},
    program_error::ProgramError,
    pubkey::Pubkey,
    system_program,
};

use crate::error::RaffleError;

#[derive(Clone, Debug, PartialEq)]
pub enum RaffleInstruction {
    /// Create a new raffle, open for entries.
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` The authority creating the raffle (pays rent)
    /// 1. `[writable]` The raffle account (PDA of `["raffle", authority]`)
    /// 2. `[]` The oracle authority allowed to fulfill randomness requests
    /// 3. `[]` The system program
    InitializeRaffle {
        /// Minimum deposit per entry in lamports
        entrance_fee: u64,
        /// Minimum seconds between round start and draw eligibility
        interval: u64,
    },

    /// Enter the current round by depositing at least the entrance fee.
    /// Overpayment is accepted and not refunded.
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` The player entering the raffle
    /// 1. `[writable]` The raffle account
    /// 2. `[]` The system program
    Enter {
        /// Deposit in lamports; must be at least the entrance fee
        amount: u64,
    },

    /// Evaluate the upkeep predicate without side effects. The result is
    /// logged and placed in the transaction return data.
    ///
    /// Accounts expected:
    /// 0. `[]` The raffle account
    CheckUpkeep {},

    /// Close entries and issue a randomness request. Fails unless the
    /// upkeep predicate holds at call time.
    ///
    /// Accounts expected:
    /// 0. `[signer]` Any caller (the automation trigger; fully decentralized)
    /// 1. `[writable]` The raffle account
    PerformUpkeep {},

    /// Oracle callback delivering the random value for an outstanding
    /// request. Pays the winner and reopens the round.
    ///
    /// Accounts expected:
    /// 0. `[signer]` The oracle authority registered with the raffle
    /// 1. `[writable]` The raffle account
    /// 2. `[writable]` The winning player (`players[random_value % count]`)
    FulfillRandomness {
        /// Must match the raffle's outstanding request id
        request_id: u64,
        /// The oracle's random value
        random_value: u64,
    },
}

impl RaffleInstruction {
    /// Unpacks a byte buffer into a RaffleInstruction
    pub fn unpack(input: &[u8]) -> Result<Self, ProgramError> {
        let (tag, rest) = input
            .split_first()
            .ok_or(RaffleError::InvalidInstruction)?;

        Ok(match tag {
            0 => {
                let (entrance_fee, rest) = Self::unpack_u64(rest)?;
                let (interval, _) = Self::unpack_u64(rest)?;
                Self::InitializeRaffle {
                    entrance_fee,
                    interval,
                }
            }
            1 => {
                let (amount, _) = Self::unpack_u64(rest)?;
                Self::Enter { amount }
            }
            2 => Self::CheckUpkeep {},
            3 => Self::PerformUpkeep {},
            4 => {
                let (request_id, rest) = Self::unpack_u64(rest)?;
                let (random_value, _) = Self::unpack_u64(rest)?;
                Self::FulfillRandomness {
                    request_id,
                    random_value,
                }
            }
            _ => return Err(RaffleError::InvalidInstruction.into()),
        })
    }

    /// Packs a RaffleInstruction into a byte buffer
    pub fn pack(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(17);
        match *self {
            Self::InitializeRaffle {
                entrance_fee,
                interval,
            } => {
                buf.push(0);
                buf.extend_from_slice(&entrance_fee.to_le_bytes());
                buf.extend_from_slice(&interval.to_le_bytes());
            }
            Self::Enter { amount } => {
                buf.push(1);
                buf.extend_from_slice(&amount.to_le_bytes());
            }
            Self::CheckUpkeep {} => buf.push(2),
            Self::PerformUpkeep {} => buf.push(3),
            Self::FulfillRandomness {
                request_id,
                random_value,
            } => {
                buf.push(4);
                buf.extend_from_slice(&request_id.to_le_bytes());
                buf.extend_from_slice(&random_value.to_le_bytes());
            }
        }
        buf
    }

    fn unpack_u64(input: &[u8]) -> Result<(u64, &[u8]), ProgramError> {
        let value = input
            .get(..8)
            .and_then(|slice| slice.try_into().ok())
            .map(u64::from_le_bytes)
            .ok_or(RaffleError::InvalidInstruction)?;
        Ok((value, &input[8..]))
    }
}

/// Create an initialize_raffle instruction
pub fn initialize_raffle(
    program_id: &Pubkey,
    authority: &Pubkey,
    raffle_account: &Pubkey,
    oracle_authority: &Pubkey,
    entrance_fee: u64,
    interval: u64,
) -> Instruction {
    let data = RaffleInstruction::InitializeRaffle {
        entrance_fee,
        interval,
    }
    .pack();

    let accounts = vec![
        AccountMeta::new(*authority, true),
        AccountMeta::new(*raffle_account, false),
        AccountMeta::new_readonly(*oracle_authority, false),
        AccountMeta::new_readonly(system_program::id(), false),
    ];

    Instruction {
        program_id: *program_id,
        accounts,
        data,
    }
}

/// Create an enter instruction
pub fn enter(
    program_id: &Pubkey,
    player: &Pubkey,
    raffle_account: &Pubkey,
    amount: u64,
) -> Instruction {
    let data = RaffleInstruction::Enter { amount }.pack();

    let accounts = vec![
        AccountMeta::new(*player, true),
        AccountMeta::new(*raffle_account, false),
        AccountMeta::new_readonly(system_program::id(), false),
    ];

    Instruction {
        program_id: *program_id,
        accounts,
        data,
    }
}

/// Create a check_upkeep instruction
pub fn check_upkeep(program_id: &Pubkey, raffle_account: &Pubkey) -> Instruction {
    let data = RaffleInstruction::CheckUpkeep {}.pack();

    let accounts = vec![AccountMeta::new_readonly(*raffle_account, false)];

    Instruction {
        program_id: *program_id,
        accounts,
        data,
    }
}

/// Create a perform_upkeep instruction
pub fn perform_upkeep(
    program_id: &Pubkey,
    caller: &Pubkey,
    raffle_account: &Pubkey,
) -> Instruction {
    let data = RaffleInstruction::PerformUpkeep {}.pack();

    let accounts = vec![
        AccountMeta::new_readonly(*caller, true),
        AccountMeta::new(*raffle_account, false),
    ];

    Instruction {
        program_id: *program_id,
        accounts,
        data,
    }
}

/// Create a fulfill_randomness instruction
pub fn fulfill_randomness(
    program_id: &Pubkey,
    oracle_authority: &Pubkey,
    raffle_account: &Pubkey,
    winner: &Pubkey,
    request_id: u64,
    random_value: u64,
) -> Instruction {
    let data = RaffleInstruction::FulfillRandomness {
        request_id,
        random_value,
    }
    .pack();

    let accounts = vec![
        AccountMeta::new_readonly(*oracle_authority, true),
        AccountMeta::new(*raffle_account, false),
        AccountMeta::new(*winner, false),
    ];

    Instruction {
        program_id: *program_id,
        accounts,
        data,
    }
}
