use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Timestamp, Uint128};
use cw_storage_plus::{Item, Map};
use tierlotto_common::types::{
    ControlStatus, DistributionStatus, DrawingStatus, HarvestStatus, SnapshotStatus, Tier,
    TierPayouts, TierWinners,
};

pub const CONFIG: Item<EngineConfig> = Item::new("config");
pub const ENGINE_STATE: Item<EngineState> = Item::new("engine_state");
pub const ROUNDS: Map<u64, Round> = Map::new("rounds");
/// Participants keyed by (round id, tier number, per-tier sequence).
pub const PARTICIPANTS: Map<(u64, u8, u32), Participant> = Map::new("participants");
pub const SNAPSHOTS: Map<u64, SnapshotRecord> = Map::new("snapshots");
pub const DRAWINGS: Map<u64, DrawingRecord> = Map::new("drawings");

/// Per-wallet win tracking
pub const WINNER_ROUNDS: Map<(&Addr, u64), ()> = Map::new("winner_rounds");
pub const WINNER_COUNTS: Map<&Addr, u32> = Map::new("winner_counts");
pub const WINNER_TOTALS: Map<&Addr, Uint128> = Map::new("winner_totals");

#[cw_serde]
pub struct EngineConfig {
    pub admin: Addr,
    pub operator: Addr,
    /// Contract queried for verified beacon randomness
    pub randomness_source: Addr,
    /// Denom of the prize pool asset. Carries six decimals, so micro-unit
    /// amounts round-trip losslessly through fixed-point strings.
    pub pool_denom: String,
    /// Wallets excluded from every round, merged into each round's
    /// blacklist at creation
    pub hard_blacklist: Vec<Addr>,
}

#[cw_serde]
pub struct EngineState {
    pub next_round_id: u64,
    pub rounds_released: u64,
    pub total_distributed: Uint128,
}

#[cw_serde]
pub struct Round {
    pub id: u64,
    pub created_at: Timestamp,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    /// Operator-declared target for the drawing, informational
    pub scheduled_draw_time: Option<Timestamp>,
    /// Set when the drawing is confirmed
    pub drawing_time: Option<Timestamp>,
    /// Set when funds are released
    pub distribution_time: Option<Timestamp>,
    /// Prize pool in micro-units, grown by FundPool
    pub prize_pool: Uint128,
    pub total_participants: u32,
    pub eligible_participants: u32,
    /// Round blacklist merged with the config hard blacklist at creation
    pub blacklist: Vec<Addr>,
    pub control_status: ControlStatus,
    pub snapshot_status: SnapshotStatus,
    pub drawing_status: DrawingStatus,
    pub harvest_status: HarvestStatus,
    pub distribution_status: DistributionStatus,
    /// Copied from the drawing record at confirmation
    pub tier_winners: TierWinners,
    /// Computed by harvest preparation
    pub tier_payouts: TierPayouts,
    pub harvest_prepared_at: Option<Timestamp>,
    /// One reference per paid tier, minted at release
    pub release_refs: Vec<String>,
    pub swap_route: Option<SwapRoute>,
}

/// Swap routing detail recorded with a release for audit purposes.
#[cw_serde]
pub struct SwapRoute {
    pub route_id: String,
    pub slippage_bps: u16,
}

#[cw_serde]
pub struct Participant {
    /// Per-tier storage sequence, assigned at ingestion
    pub seq: u32,
    pub wallet: Addr,
    pub token_balance: Uint128,
    pub tier: Tier,
    pub eligibility_score: Uint128,
    /// False when the wallet was blacklisted at snapshot time
    pub eligible: bool,
    pub is_winner: bool,
}

#[cw_serde]
pub struct SnapshotRecord {
    pub round_id: u64,
    pub status: SnapshotStatus,
    pub started_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub confirmed_at: Option<Timestamp>,
    pub total_participants: u32,
    pub eligible_participants: u32,
    /// Eligible count per tier t1..t4
    pub tier_counts: [u32; 4],
    /// sha256 digest of the submitted participant set, hex-encoded
    pub participants_digest: String,
}

#[cw_serde]
pub struct DrawingRecord {
    pub round_id: u64,
    pub status: DrawingStatus,
    pub started_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub confirmed_at: Option<Timestamp>,
    pub winners: TierWinners,
    pub audit: Option<DrawAudit>,
}

/// Reproducible record of how winners were selected. The seed is the
/// beacon randomness; anyone can recompute every tier's pick from it.
#[cw_serde]
pub struct DrawAudit {
    /// 32-byte beacon randomness, hex-encoded
    pub seed_hex: String,
    /// Names the randomness request this drawing consumed
    pub request_id: String,
    pub beacon_round: u64,
    pub block_height: u64,
}

/// Response type for querying a beacon from the randomness source.
/// Mirrors the StoredBeacon struct from the beacon oracle contract.
#[cw_serde]
pub struct BeaconResponse {
    pub round: u64,
    pub randomness: Vec<u8>,
    pub signature: Vec<u8>,
    pub submitted_at: Timestamp,
    pub submitted_by: Addr,
}
