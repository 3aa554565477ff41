use cosmwasm_schema::{cw_serde, QueryResponses};

use crate::state::{OracleConfig, StoredBeacon};

#[cw_serde]
pub struct InstantiateMsg {
    pub operators: Vec<String>,
    /// Hex-encoded beacon network public key (96 bytes = 192 hex chars)
    pub public_key_hex: String,
    pub chain_hash: String,
    pub genesis_time: u64,
    pub period_seconds: u64,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Submit a beacon for verification and storage.
    SubmitBeacon {
        round: u64,
        /// Hex-encoded BLS signature (48 bytes = 96 hex chars)
        signature_hex: String,
    },
    /// Update operator list (admin only).
    UpdateOperators {
        add: Vec<String>,
        remove: Vec<String>,
    },
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(OracleConfig)]
    Config {},

    #[returns(Option<StoredBeacon>)]
    Beacon { round: u64 },

    #[returns(u64)]
    LatestRound {},

    /// The beacon round number expected at a unix timestamp, derived from
    /// the network's genesis time and period.
    #[returns(u64)]
    ExpectedRound { at: u64 },

    /// Recompute a winner index from published randomness so a drawing can
    /// be audited without trusting the engine that ran it. Returns `None`
    /// when the candidate count is zero.
    #[returns(Option<u64>)]
    VerifySelection {
        /// Hex-encoded 32-byte randomness (the drawing seed)
        randomness_hex: String,
        /// Lottery round the drawing belongs to
        round_id: u64,
        /// Tier number, 1..=4
        tier: u8,
        /// Eligible candidate count for the tier
        candidate_count: u64,
    },
}
