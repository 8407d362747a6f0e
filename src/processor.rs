// SolPot Raffle Program - Instruction Processor
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    account_info::{next_account_info, AccountInfo},
    clock::Clock,
    entrypoint::ProgramResult,
    msg,
    program::{invoke, invoke_signed, set_return_data},
    program_error::ProgramError,
    program_pack::IsInitialized,
    pubkey::Pubkey,
    rent::Rent,
    system_instruction,
    sysvar::Sysvar,
};

use crate::{
    error::RaffleError,
    event,
    instruction::RaffleInstruction,
    state::{Raffle, RaffleState, MAX_PLAYERS},
    utils,
};

/// Program state handler.
pub struct Processor;

impl Processor {
    /// Process a SolPot raffle instruction
    pub fn process_instruction(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        instruction_data: &[u8],
    ) -> ProgramResult {
        let instruction = RaffleInstruction::unpack(instruction_data)?;

        match instruction {
            RaffleInstruction::InitializeRaffle {
                entrance_fee,
                interval,
            } => {
                msg!("Instruction: Initialize Raffle");
                Self::process_initialize_raffle(program_id, accounts, entrance_fee, interval)
            }
            RaffleInstruction::Enter { amount } => {
                msg!("Instruction: Enter");
                Self::process_enter(program_id, accounts, amount)
            }
            RaffleInstruction::CheckUpkeep {} => {
                msg!("Instruction: Check Upkeep");
                Self::process_check_upkeep(program_id, accounts)
            }
            RaffleInstruction::PerformUpkeep {} => {
                msg!("Instruction: Perform Upkeep");
                Self::process_perform_upkeep(program_id, accounts)
            }
            RaffleInstruction::FulfillRandomness {
                request_id,
                random_value,
            } => {
                msg!("Instruction: Fulfill Randomness");
                Self::process_fulfill_randomness(program_id, accounts, request_id, random_value)
            }
        }
    }

    /// Process InitializeRaffle: create the raffle PDA and open the first
    /// round. `entrance_fee` and `interval` are immutable afterwards.
    fn process_initialize_raffle(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        entrance_fee: u64,
        interval: u64,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let authority_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;
        let oracle_info = next_account_info(account_info_iter)?;
        let system_program_info = next_account_info(account_info_iter)?;

        if !authority_info.is_signer {
            msg!("Authority must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }

        if interval == 0 || interval > i64::MAX as u64 {
            msg!("Interval must be between 1 and {} seconds", i64::MAX);
            return Err(ProgramError::InvalidArgument);
        }

        let (expected_raffle_pubkey, bump_seed) =
            utils::find_raffle_address(program_id, authority_info.key);
        if *raffle_info.key != expected_raffle_pubkey {
            msg!("Invalid raffle account address");
            return Err(ProgramError::InvalidArgument);
        }

        // Create the account if it does not exist yet
        if raffle_info.owner != program_id {
            let rent = Rent::get()?;
            let rent_lamports = rent.minimum_balance(Raffle::MAX_LEN);

            invoke_signed(
                &system_instruction::create_account(
                    authority_info.key,
                    raffle_info.key,
                    rent_lamports,
                    Raffle::MAX_LEN as u64,
                    program_id,
                ),
                &[
                    authority_info.clone(),
                    raffle_info.clone(),
                    system_program_info.clone(),
                ],
                &[&[b"raffle", authority_info.key.as_ref(), &[bump_seed]]],
            )?;
        }

        if let Ok(raffle) = Raffle::deserialize(&mut &raffle_info.data.borrow()[..]) {
            if raffle.is_initialized() {
                msg!("Raffle account is already initialized");
                return Err(RaffleError::AlreadyInitialized.into());
            }
        }

        let clock = Clock::get()?;
        let raffle = Raffle::new(
            *authority_info.key,
            *oracle_info.key,
            entrance_fee,
            interval,
            clock.unix_timestamp,
        );
        raffle.serialize(&mut &mut raffle_info.data.borrow_mut()[..])?;

        msg!(
            "Raffle initialized: fee={} lamports, interval={}s, oracle={}",
            entrance_fee,
            interval,
            oracle_info.key
        );
        Ok(())
    }

    /// Process Enter: append the player to the current round and credit the
    /// pool with the full deposit. Overpayment is kept, not refunded.
    fn process_enter(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        amount: u64,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let player_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;
        let system_program_info = next_account_info(account_info_iter)?;

        if !player_info.is_signer {
            msg!("Player must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }

        if raffle_info.owner != program_id {
            msg!("Raffle account must be owned by this program");
            return Err(ProgramError::IncorrectProgramId);
        }

        let mut raffle = Raffle::deserialize(&mut &raffle_info.data.borrow()[..])?;
        if !raffle.is_initialized() {
            return Err(RaffleError::NotInitialized.into());
        }

        if amount < raffle.entrance_fee {
            msg!(
                "Deposit of {} lamports is below the entrance fee of {}",
                amount,
                raffle.entrance_fee
            );
            return Err(RaffleError::NotEnoughDeposit.into());
        }

        if raffle.state != RaffleState::Open {
            msg!("Raffle is calculating a winner; entries are closed");
            return Err(RaffleError::RaffleNotOpen.into());
        }

        if raffle.players.len() >= MAX_PLAYERS {
            msg!("Round already holds {} entries", MAX_PLAYERS);
            return Err(RaffleError::RaffleFull.into());
        }

        // Deposit the full amount into the pool held on the raffle account
        invoke(
            &system_instruction::transfer(player_info.key, raffle_info.key, amount),
            &[
                player_info.clone(),
                raffle_info.clone(),
                system_program_info.clone(),
            ],
        )?;

        raffle.pool_balance = raffle
            .pool_balance
            .checked_add(amount)
            .ok_or(ProgramError::InvalidArgument)?;
        raffle.players.push(*player_info.key);
        raffle.serialize(&mut &mut raffle_info.data.borrow_mut()[..])?;

        event::emit(
            event::ENTRY_RECORDED,
            &event::EntryRecorded {
                player: *player_info.key,
            },
        )?;
        msg!(
            "Player {} entered with {} SOL; {} entries this round",
            player_info.key,
            utils::lamports_to_sol(amount),
            raffle.players.len()
        );
        Ok(())
    }

    /// Process CheckUpkeep: evaluate the draw-readiness predicate without
    /// side effects. The diagnostic triple goes to the log and the borsh
    /// result into the transaction return data.
    fn process_check_upkeep(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let raffle_info = next_account_info(account_info_iter)?;

        if raffle_info.owner != program_id {
            msg!("Raffle account must be owned by this program");
            return Err(ProgramError::IncorrectProgramId);
        }

        let raffle = Raffle::deserialize(&mut &raffle_info.data.borrow()[..])?;
        if !raffle.is_initialized() {
            return Err(RaffleError::NotInitialized.into());
        }

        let clock = Clock::get()?;
        let check = raffle.check_upkeep(clock.unix_timestamp);

        msg!(
            "Upkeep check: ready={}, state={:?}, balance={}, players={}",
            check.ready,
            check.state,
            check.pool_balance,
            check.player_count
        );
        let data = check
            .try_to_vec()
            .map_err(|e| ProgramError::BorshIoError(e.to_string()))?;
        set_return_data(&data);
        Ok(())
    }

    /// Process PerformUpkeep: close entries and issue the round's single
    /// randomness request. The predicate is re-evaluated here; a caller's
    /// earlier CheckUpkeep read is not trusted.
    fn process_perform_upkeep(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let caller_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;

        if !caller_info.is_signer {
            msg!("Caller must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }

        if raffle_info.owner != program_id {
            msg!("Raffle account must be owned by this program");
            return Err(ProgramError::IncorrectProgramId);
        }

        let mut raffle = Raffle::deserialize(&mut &raffle_info.data.borrow()[..])?;
        if !raffle.is_initialized() {
            return Err(RaffleError::NotInitialized.into());
        }

        let clock = Clock::get()?;
        let check = raffle.check_upkeep(clock.unix_timestamp);
        if !check.ready {
            msg!(
                "Upkeep not needed: state={:?}, balance={}, players={}",
                check.state,
                check.pool_balance,
                check.player_count
            );
            return Err(RaffleError::UpkeepNotNeeded.into());
        }

        // This is the only path that sets Calculating, and it is guarded by
        // the Open check above, so at most one request is ever outstanding.
        let request_id = raffle
            .request_counter
            .checked_add(1)
            .ok_or(ProgramError::InvalidArgument)?;
        raffle.request_counter = request_id;
        raffle.pending_request_id = Some(request_id);
        raffle.state = RaffleState::Calculating;
        raffle.serialize(&mut &mut raffle_info.data.borrow_mut()[..])?;

        event::emit(event::DRAW_REQUESTED, &event::DrawRequested { request_id })?;
        msg!("Draw requested: request_id={}", request_id);
        Ok(())
    }

    /// Process FulfillRandomness: the oracle callback. Selects the winner,
    /// pays out the pool and reopens the round. Internal state is finalized
    /// before any lamports move, and the whole instruction aborts with no
    /// effect if the transfer cannot be applied.
    fn process_fulfill_randomness(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        request_id: u64,
        random_value: u64,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let oracle_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;
        let winner_info = next_account_info(account_info_iter)?;

        if !oracle_info.is_signer {
            msg!("Oracle authority must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }

        if raffle_info.owner != program_id {
            msg!("Raffle account must be owned by this program");
            return Err(ProgramError::IncorrectProgramId);
        }

        let mut raffle = Raffle::deserialize(&mut &raffle_info.data.borrow()[..])?;
        if !raffle.is_initialized() {
            return Err(RaffleError::NotInitialized.into());
        }

        if *oracle_info.key != raffle.oracle_authority {
            msg!(
                "Security: randomness delivery from {} rejected; registered oracle is {}",
                oracle_info.key,
                raffle.oracle_authority
            );
            return Err(RaffleError::UnauthorizedOracle.into());
        }

        // Replay guard: the id must match the single outstanding request.
        // A fulfilled id was cleared on processing, so re-delivery lands here.
        match raffle.pending_request_id {
            Some(pending) if pending == request_id => {}
            _ => {
                msg!(
                    "Security: randomness delivery for request {} rejected; outstanding={:?}",
                    request_id,
                    raffle.pending_request_id
                );
                return Err(RaffleError::InvalidRequest.into());
            }
        }

        let winner_index = raffle
            .winner_index(random_value)
            .ok_or(RaffleError::InvalidRequest)?;
        let winner = raffle.players[winner_index];
        if *winner_info.key != winner {
            msg!(
                "Winner account {} does not match selected player {} at index {}",
                winner_info.key,
                winner,
                winner_index
            );
            return Err(RaffleError::WinnerAccountMismatch.into());
        }

        let clock = Clock::get()?;
        let prize = raffle.pool_balance;

        // Checks-effects-interactions: finalize the round before lamports move
        raffle.recent_winner = Some(winner);
        raffle.players.clear();
        raffle.pool_balance = 0;
        raffle.pending_request_id = None;
        raffle.state = RaffleState::Open;
        raffle.last_timestamp = clock.unix_timestamp;
        raffle.serialize(&mut &mut raffle_info.data.borrow_mut()[..])?;

        // Pay the pool out of the raffle account, keeping its rent reserve
        let raffle_lamports = raffle_info
            .lamports()
            .checked_sub(prize)
            .ok_or(RaffleError::PayoutTransferFailed)?;
        let winner_lamports = winner_info
            .lamports()
            .checked_add(prize)
            .ok_or(RaffleError::PayoutTransferFailed)?;
        **raffle_info.lamports.borrow_mut() = raffle_lamports;
        **winner_info.lamports.borrow_mut() = winner_lamports;

        event::emit(event::WINNER_PICKED, &event::WinnerPicked { winner, prize })?;
        msg!(
            "Winner {} paid {} SOL for request {}",
            winner,
            utils::lamports_to_sol(prize),
            request_id
        );
        Ok(())
    }
}
