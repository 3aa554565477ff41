use cosmwasm_std::{StdError, Uint128};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("round {round_id} not found")]
    RoundNotFound { round_id: u64 },

    #[error("no snapshot recorded for round {round_id}")]
    SnapshotNotFound { round_id: u64 },

    #[error("no drawing recorded for round {round_id}")]
    DrawingNotFound { round_id: u64 },

    #[error("round {round_id}: {stage} stage is already {status}")]
    StageConflict {
        round_id: u64,
        stage: &'static str,
        status: &'static str,
    },

    #[error("round {round_id}: {required} must be confirmed before {attempted}")]
    PrerequisiteNotMet {
        round_id: u64,
        required: &'static str,
        attempted: &'static str,
    },

    #[error("round window is invalid: start {start} is not before end {end}")]
    InvalidTimeWindow { start: u64, end: u64 },

    #[error("scheduled draw time {draw} precedes round end {end}")]
    DrawTimeBeforeEnd { draw: u64, end: u64 },

    #[error("invalid address: {address}")]
    InvalidAddress { address: String },

    #[error("invalid tier {tier}, expected 1..=4")]
    InvalidTier { tier: u8 },

    #[error("duplicate wallet in snapshot entries: {wallet}")]
    DuplicateWallet { wallet: String },

    #[error("snapshot for round {round_id} has no entries")]
    NoParticipants { round_id: u64 },

    #[error("round {round_id} has no tier winners to pay")]
    NoWinners { round_id: u64 },

    #[error("round {round_id} has an empty prize pool")]
    EmptyPool { round_id: u64 },

    #[error("beacon for round {round} unavailable from randomness source")]
    BeaconUnavailable { round: u64 },

    #[error("randomness source returned malformed data: {reason}")]
    InvalidRandomness { reason: String },

    #[error("allocated {allocated} does not match prize pool {pool}; re-run harvest preparation")]
    AllocationMismatch { pool: Uint128, allocated: Uint128 },

    #[error("must send {denom} to fund the pool")]
    NoFundsSent { denom: String },

    #[error("wrong denom {denom}, pool accepts {expected}")]
    WrongDenom { denom: String, expected: String },

    #[error("pool denom must not be empty")]
    InvalidDenom,
}
