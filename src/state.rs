// SolPot Raffle Program - State
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    clock::UnixTimestamp,
    program_pack::{IsInitialized, Sealed},
    pubkey::Pubkey,
};

/// Maximum number of entries per round. The raffle account is allocated with
/// space for this many players, so entry beyond it must be rejected.
pub const MAX_PLAYERS: usize = 128;

/// Lifecycle state of a raffle round
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq)]
pub enum RaffleState {
    /// Accepting entries
    Open,
    /// Entries closed, waiting for the randomness callback
    Calculating,
}

/// Result of evaluating the upkeep predicate, with enough context to
/// explain a rejection to the automation trigger.
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq)]
pub struct UpkeepCheck {
    pub ready: bool,
    pub state: RaffleState,
    pub pool_balance: u64,
    pub player_count: u64,
}

/// Raffle account data
#[derive(BorshSerialize, BorshDeserialize, Debug)]
pub struct Raffle {
    /// Is the account initialized
    pub is_initialized: bool,
    /// Open for entries or waiting on a randomness request
    pub state: RaffleState,
    /// Creator of the raffle (informational; no privileged operations)
    pub authority: Pubkey,
    /// The only signer accepted for the randomness callback
    pub oracle_authority: Pubkey,
    /// Minimum deposit per entry in lamports
    pub entrance_fee: u64,
    /// Minimum seconds between round start and draw eligibility
    pub interval: u64,
    /// Round start / most recent successful draw
    pub last_timestamp: UnixTimestamp,
    /// Entries for the current round, in entry order; duplicates allowed
    pub players: Vec<Pubkey>,
    /// Most recently paid participant
    pub recent_winner: Option<Pubkey>,
    /// The single outstanding randomness request, if any
    pub pending_request_id: Option<u64>,
    /// Last issued request id; ids are sequential and never reused
    pub request_counter: u64,
    /// Deposits collected since the last payout, in lamports
    pub pool_balance: u64,
}

impl Sealed for Raffle {}

impl IsInitialized for Raffle {
    fn is_initialized(&self) -> bool {
        self.is_initialized
    }
}

impl Raffle {
    /// Serialized size with a full player list; accounts are allocated at
    /// this size so the state always fits.
    pub const MAX_LEN: usize = 1  // is_initialized
        + 1                       // state
        + 32                      // authority
        + 32                      // oracle_authority
        + 8                       // entrance_fee
        + 8                       // interval
        + 8                       // last_timestamp
        + 4 + 32 * MAX_PLAYERS    // players
        + 1 + 32                  // recent_winner
        + 1 + 8                   // pending_request_id
        + 8                       // request_counter
        + 8; // pool_balance

    /// Create a new raffle, open for entries
    pub fn new(
        authority: Pubkey,
        oracle_authority: Pubkey,
        entrance_fee: u64,
        interval: u64,
        now: UnixTimestamp,
    ) -> Self {
        Self {
            is_initialized: true,
            state: RaffleState::Open,
            authority,
            oracle_authority,
            entrance_fee,
            interval,
            last_timestamp: now,
            players: Vec::new(),
            recent_winner: None,
            pending_request_id: None,
            request_counter: 0,
            pool_balance: 0,
        }
    }

    /// Has the configured interval elapsed since the round started?
    /// Intervals beyond the timestamp range can never elapse.
    pub fn interval_elapsed(&self, now: UnixTimestamp) -> bool {
        match i64::try_from(self.interval) {
            Ok(interval) => now.saturating_sub(self.last_timestamp) >= interval,
            Err(_) => false,
        }
    }

    pub fn player_count(&self) -> u64 {
        self.players.len() as u64
    }

    pub fn player(&self, index: usize) -> Option<&Pubkey> {
        self.players.get(index)
    }

    /// Evaluate the upkeep predicate without side effects. The raffle is
    /// ready for a draw only when it is open, the interval has elapsed, at
    /// least one player has entered and the pool holds value.
    pub fn check_upkeep(&self, now: UnixTimestamp) -> UpkeepCheck {
        let ready = self.state == RaffleState::Open
            && self.interval_elapsed(now)
            && !self.players.is_empty()
            && self.pool_balance > 0;

        UpkeepCheck {
            ready,
            state: self.state,
            pool_balance: self.pool_balance,
            player_count: self.player_count(),
        }
    }

    /// Map a random value onto the current player list. `None` when there
    /// are no players to pick from.
    pub fn winner_index(&self, random_value: u64) -> Option<usize> {
        if self.players.is_empty() {
            return None;
        }
        Some((random_value % self.players.len() as u64) as usize)
    }
}
