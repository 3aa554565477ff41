use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Uint128};

/// One of the four prize brackets a participant can be assigned to.
///
/// Base pool weights are expressed in basis points and renormalized over
/// the tiers that actually produced a winner, so empty tiers never strand
/// a share of the pool.
#[cw_serde]
#[derive(Copy, Eq)]
pub enum Tier {
    T1,
    T2,
    T3,
    T4,
}

impl Tier {
    /// Canonical tier order. The allocation remainder rule and all
    /// per-tier iteration follow this order.
    pub const ALL: [Tier; 4] = [Tier::T1, Tier::T2, Tier::T3, Tier::T4];

    /// Base pool weight in basis points.
    pub const fn weight_bps(self) -> u16 {
        match self {
            Tier::T1 => 4000,
            Tier::T2 => 2500,
            Tier::T3 => 2000,
            Tier::T4 => 1500,
        }
    }

    pub const fn number(self) -> u8 {
        match self {
            Tier::T1 => 1,
            Tier::T2 => 2,
            Tier::T3 => 3,
            Tier::T4 => 4,
        }
    }

    pub const fn from_number(n: u8) -> Option<Tier> {
        match n {
            1 => Some(Tier::T1),
            2 => Some(Tier::T2),
            3 => Some(Tier::T3),
            4 => Some(Tier::T4),
            _ => None,
        }
    }
}

/// Control stage: round configuration has been submitted and accepted.
#[cw_serde]
#[derive(Copy, Eq)]
pub enum ControlStatus {
    Unset,
    Pending,
}

impl ControlStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            ControlStatus::Unset => "unset",
            ControlStatus::Pending => "pending",
        }
    }
}

/// Snapshot stage: the participant set is ingested, then frozen.
#[cw_serde]
#[derive(Copy, Eq)]
pub enum SnapshotStatus {
    Unset,
    Running,
    Completed,
    Confirmed,
}

impl SnapshotStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            SnapshotStatus::Unset => "unset",
            SnapshotStatus::Running => "running",
            SnapshotStatus::Completed => "completed",
            SnapshotStatus::Confirmed => "confirmed",
        }
    }
}

/// Drawing stage: winners are selected, then locked in.
#[cw_serde]
#[derive(Copy, Eq)]
pub enum DrawingStatus {
    Unset,
    Running,
    Completed,
    Confirmed,
}

impl DrawingStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            DrawingStatus::Unset => "unset",
            DrawingStatus::Running => "running",
            DrawingStatus::Completed => "completed",
            DrawingStatus::Confirmed => "confirmed",
        }
    }
}

/// Harvest stage: tier payouts are computed from the prize pool.
#[cw_serde]
#[derive(Copy, Eq)]
pub enum HarvestStatus {
    Unset,
    Preparing,
    Prepared,
    Released,
}

impl HarvestStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            HarvestStatus::Unset => "unset",
            HarvestStatus::Preparing => "preparing",
            HarvestStatus::Prepared => "prepared",
            HarvestStatus::Released => "released",
        }
    }
}

/// Distribution stage: prepared payouts are paid out to winners.
#[cw_serde]
#[derive(Copy, Eq)]
pub enum DistributionStatus {
    Unset,
    Queued,
    Releasing,
    Released,
}

impl DistributionStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            DistributionStatus::Unset => "unset",
            DistributionStatus::Queued => "queued",
            DistributionStatus::Releasing => "releasing",
            DistributionStatus::Released => "released",
        }
    }
}

/// Winner addresses keyed by tier. A tier with no eligible participants
/// keeps `None` and does not qualify for allocation.
#[cw_serde]
#[derive(Default)]
pub struct TierWinners {
    pub t1: Option<Addr>,
    pub t2: Option<Addr>,
    pub t3: Option<Addr>,
    pub t4: Option<Addr>,
}

impl TierWinners {
    pub fn get(&self, tier: Tier) -> Option<&Addr> {
        match tier {
            Tier::T1 => self.t1.as_ref(),
            Tier::T2 => self.t2.as_ref(),
            Tier::T3 => self.t3.as_ref(),
            Tier::T4 => self.t4.as_ref(),
        }
    }

    pub fn set(&mut self, tier: Tier, winner: Addr) {
        match tier {
            Tier::T1 => self.t1 = Some(winner),
            Tier::T2 => self.t2 = Some(winner),
            Tier::T3 => self.t3 = Some(winner),
            Tier::T4 => self.t4 = Some(winner),
        }
    }

    /// Tiers with a recorded winner, in canonical order.
    pub fn qualifying(&self) -> Vec<Tier> {
        Tier::ALL
            .iter()
            .copied()
            .filter(|t| self.get(*t).is_some())
            .collect()
    }

    pub fn count(&self) -> u32 {
        self.qualifying().len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.qualifying().is_empty()
    }
}

/// Per-tier payout amounts in micro-units (six fixed decimals).
#[cw_serde]
#[derive(Default)]
pub struct TierPayouts {
    pub t1: Uint128,
    pub t2: Uint128,
    pub t3: Uint128,
    pub t4: Uint128,
}

impl TierPayouts {
    pub fn get(&self, tier: Tier) -> Uint128 {
        match tier {
            Tier::T1 => self.t1,
            Tier::T2 => self.t2,
            Tier::T3 => self.t3,
            Tier::T4 => self.t4,
        }
    }

    pub fn set(&mut self, tier: Tier, amount: Uint128) {
        match tier {
            Tier::T1 => self.t1 = amount,
            Tier::T2 => self.t2 = amount,
            Tier::T3 => self.t3 = amount,
            Tier::T4 => self.t4 = amount,
        }
    }

    pub fn total(&self) -> Uint128 {
        self.t1 + self.t2 + self.t3 + self.t4
    }
}
