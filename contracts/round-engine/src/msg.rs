use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Timestamp, Uint128};
use tierlotto_common::types::TierPayouts;

use crate::state::{
    DrawingRecord, EngineConfig, EngineState, Participant, Round, SnapshotRecord, SwapRoute,
};

#[cw_serde]
pub struct InstantiateMsg {
    pub operator: String,
    /// Beacon oracle contract queried for verified randomness
    pub randomness_source: String,
    /// Denom of the prize pool asset (six decimals)
    pub pool_denom: String,
    /// Wallets excluded from every round
    pub hard_blacklist: Vec<String>,
}

/// Round configuration submitted by the operator.
#[cw_serde]
pub struct CreateRoundParams {
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    /// Target time for the drawing; must not precede the round end
    pub scheduled_draw_time: Option<Timestamp>,
    /// Wallets excluded from this round, merged with the config hard
    /// blacklist
    pub blacklist: Vec<String>,
}

/// One wallet in the participant snapshot. Tier assignment happens
/// upstream; the engine validates and freezes what it is given.
#[cw_serde]
pub struct SnapshotEntry {
    pub wallet: String,
    pub token_balance: Uint128,
    /// Tier number, 1..=4
    pub tier: u8,
    pub eligibility_score: Uint128,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Create a round from control configuration. Operator only.
    CreateRound { params: CreateRoundParams },
    /// Add attached funds to a round's prize pool. Allowed until the
    /// round is released. Operator only.
    FundPool { round_id: u64 },
    /// Ingest the participant set for a round, replacing any unconfirmed
    /// prior set. Operator only.
    RunSnapshot {
        round_id: u64,
        entries: Vec<SnapshotEntry>,
    },
    /// Freeze the participant set. Operator only.
    ConfirmSnapshot { round_id: u64 },
    /// Select one winner per non-empty tier from beacon randomness.
    /// Operator only.
    RunDrawing { round_id: u64, beacon_round: u64 },
    /// Lock in winners and open the harvest stage. Operator only.
    ConfirmDrawing { round_id: u64 },
    /// Discard an unconfirmed drawing so it can be re-run. Operator only.
    ResetDrawing { round_id: u64 },
    /// Compute tier payouts from the prize pool. May be re-run until the
    /// round is released. Operator only.
    PrepareHarvest { round_id: u64 },
    /// Pay every winning tier and record the release audit. Operator only.
    Release {
        round_id: u64,
        swap: Option<SwapRoute>,
    },
    /// Update configuration. Admin only.
    UpdateConfig {
        operator: Option<String>,
        randomness_source: Option<String>,
    },
    /// Update the hard blacklist. Applies to rounds created afterwards.
    /// Admin only.
    UpdateBlacklist {
        add: Vec<String>,
        remove: Vec<String>,
    },
}

#[cw_serde]
pub struct MigrateMsg {}

/// Query message for the beacon oracle contract.
#[cw_serde]
pub enum RandomnessQueryMsg {
    Beacon { round: u64 },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(EngineConfig)]
    Config {},
    #[returns(EngineState)]
    State {},
    #[returns(Round)]
    Round { round_id: u64 },
    /// Rounds newest-first.
    #[returns(RoundsResponse)]
    Rounds {
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    /// Participants of a round, optionally filtered to one tier. The
    /// continuation key is (tier, seq); with a tier filter only the seq
    /// component is used.
    #[returns(ParticipantsResponse)]
    Participants {
        round_id: u64,
        tier: Option<u8>,
        start_after: Option<(u8, u32)>,
        limit: Option<u32>,
    },
    #[returns(Option<SnapshotRecord>)]
    Snapshot { round_id: u64 },
    #[returns(Option<DrawingRecord>)]
    Drawing { round_id: u64 },
    /// Rounds a wallet has won plus lifetime totals.
    #[returns(WalletWinsResponse)]
    WalletWins {
        address: String,
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    /// Allocation preview for a pool and qualifying tier set. Pure.
    #[returns(TierPayouts)]
    PreviewAllocation { pool: Uint128, tiers: Vec<u8> },
}

#[cw_serde]
pub struct RoundsResponse {
    pub rounds: Vec<Round>,
}

#[cw_serde]
pub struct ParticipantsResponse {
    pub participants: Vec<Participant>,
}

#[cw_serde]
pub struct WalletWinsResponse {
    pub address: String,
    pub total_wins: u32,
    pub total_won_amount: Uint128,
    pub round_ids: Vec<u64>,
}
