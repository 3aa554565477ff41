use cosmwasm_std::{to_json_binary, Binary, Deps, Order, StdError, StdResult, Uint128};
use cw_storage_plus::Bound;
use tierlotto_common::types::Tier;

use crate::allocation::allocate;
use crate::msg::{ParticipantsResponse, RoundsResponse, WalletWinsResponse};
use crate::state::{
    Participant, CONFIG, DRAWINGS, ENGINE_STATE, PARTICIPANTS, ROUNDS, SNAPSHOTS, WINNER_COUNTS,
    WINNER_ROUNDS, WINNER_TOTALS,
};

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_state(deps: Deps) -> StdResult<Binary> {
    let state = ENGINE_STATE.load(deps.storage)?;
    to_json_binary(&state)
}

pub fn query_round(deps: Deps, round_id: u64) -> StdResult<Binary> {
    let round = ROUNDS.load(deps.storage, round_id)?;
    to_json_binary(&round)
}

/// Rounds newest-first, so the default page is the recent history.
pub fn query_rounds(
    deps: Deps,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let limit = limit.unwrap_or(20).min(100) as usize;
    let end = start_after.map(Bound::exclusive);

    let rounds: Vec<_> = ROUNDS
        .range(deps.storage, None, end, Order::Descending)
        .take(limit)
        .filter_map(|r| r.ok())
        .map(|(_, round)| round)
        .collect();

    to_json_binary(&RoundsResponse { rounds })
}

pub fn query_participants(
    deps: Deps,
    round_id: u64,
    tier: Option<u8>,
    start_after: Option<(u8, u32)>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let limit = limit.unwrap_or(50).min(200) as usize;

    let participants: Vec<Participant> = match tier {
        Some(t) => {
            if Tier::from_number(t).is_none() {
                return Err(StdError::generic_err(format!(
                    "invalid tier {t}, expected 1..=4"
                )));
            }
            let start = start_after.map(|(_, seq)| Bound::exclusive(seq));
            PARTICIPANTS
                .prefix((round_id, t))
                .range(deps.storage, start, None, Order::Ascending)
                .take(limit)
                .filter_map(|r| r.ok())
                .map(|(_, p)| p)
                .collect()
        }
        None => {
            let start = start_after.map(Bound::exclusive);
            PARTICIPANTS
                .sub_prefix(round_id)
                .range(deps.storage, start, None, Order::Ascending)
                .take(limit)
                .filter_map(|r| r.ok())
                .map(|(_, p)| p)
                .collect()
        }
    };

    to_json_binary(&ParticipantsResponse { participants })
}

pub fn query_snapshot(deps: Deps, round_id: u64) -> StdResult<Binary> {
    let snapshot = SNAPSHOTS.may_load(deps.storage, round_id)?;
    to_json_binary(&snapshot)
}

pub fn query_drawing(deps: Deps, round_id: u64) -> StdResult<Binary> {
    let drawing = DRAWINGS.may_load(deps.storage, round_id)?;
    to_json_binary(&drawing)
}

pub fn query_wallet_wins(
    deps: Deps,
    address: String,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let addr = deps.api.addr_validate(&address)?;
    let limit = limit.unwrap_or(100).min(100) as usize;
    let start = start_after.map(Bound::exclusive);

    let round_ids: Vec<u64> = WINNER_ROUNDS
        .prefix(&addr)
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .filter_map(|r| r.ok())
        .map(|(round_id, _)| round_id)
        .collect();

    let total_wins = WINNER_COUNTS.may_load(deps.storage, &addr)?.unwrap_or(0);
    let total_won = WINNER_TOTALS
        .may_load(deps.storage, &addr)?
        .unwrap_or(Uint128::zero());

    to_json_binary(&WalletWinsResponse {
        address,
        total_wins,
        total_won_amount: total_won,
        round_ids,
    })
}

/// Allocation preview for any pool and tier subset. Exercises the exact
/// arithmetic a harvest preparation would run.
pub fn query_preview_allocation(pool: Uint128, tiers: Vec<u8>) -> StdResult<Binary> {
    let mut qualifying: Vec<Tier> = Vec::new();
    for t in tiers {
        let tier = Tier::from_number(t).ok_or_else(|| {
            StdError::generic_err(format!("invalid tier {t}, expected 1..=4"))
        })?;
        if !qualifying.contains(&tier) {
            qualifying.push(tier);
        }
    }
    to_json_binary(&allocate(pool, &qualifying))
}
