use cosmwasm_std::{Uint128, Uint256};
use tierlotto_common::types::{Tier, TierPayouts};

/// Split `pool` across the qualifying tiers proportionally to their base
/// weights, renormalized over the qualifying set.
///
/// Every qualifying tier except the last in canonical order receives its
/// weight share rounded half-up at micro precision, clamped to whatever is
/// still unassigned; the last tier absorbs the remainder. The payouts
/// therefore sum to the pool exactly, with no dust left behind. A zero
/// pool or empty qualifying set yields all zeros.
pub fn allocate(pool: Uint128, qualifying: &[Tier]) -> TierPayouts {
    let mut payouts = TierPayouts::default();
    if pool.is_zero() || qualifying.is_empty() {
        return payouts;
    }

    // Canonical order regardless of caller ordering, duplicates collapsed.
    let mut tiers: Vec<Tier> = Tier::ALL
        .iter()
        .copied()
        .filter(|t| qualifying.contains(t))
        .collect();
    let base_sum: u128 = tiers.iter().map(|t| t.weight_bps() as u128).sum();

    let last = match tiers.pop() {
        Some(t) => t,
        None => return payouts,
    };

    let mut remaining = pool;
    for tier in &tiers {
        let share = weighted_share(pool, tier.weight_bps(), base_sum);
        let amount = share.min(remaining);
        payouts.set(*tier, amount);
        remaining -= amount;
    }
    payouts.set(last, remaining);
    payouts
}

/// `round_half_up(pool * weight / base_sum)` computed in 256-bit space:
/// `(2 * pool * weight + base_sum) / (2 * base_sum)`.
fn weighted_share(pool: Uint128, weight_bps: u16, base_sum: u128) -> Uint128 {
    let numer =
        Uint256::from(pool) * Uint256::from(2u128 * weight_bps as u128) + Uint256::from(base_sum);
    let share = numer / Uint256::from(2u128 * base_sum);
    // A share never meaningfully exceeds the pool; the caller clamps to the
    // unassigned remainder anyway.
    Uint128::try_from(share).unwrap_or(Uint128::MAX)
}
