pub mod money;
pub mod selection;
pub mod types;

pub use money::{format_fixed6, parse_fixed6, MICRO_SCALE};
pub use selection::{derive_winner_index, participant_set_digest};
pub use types::{
    ControlStatus, DistributionStatus, DrawingStatus, HarvestStatus, SnapshotStatus, Tier,
    TierPayouts, TierWinners,
};
