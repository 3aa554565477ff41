use cosmwasm_std::{to_json_binary, Binary, Deps, StdError, StdResult};
use tierlotto_common::selection::derive_winner_index;

use crate::state::{BEACONS, CONFIG, LATEST_ROUND};
use crate::verify::expected_round;

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_beacon(deps: Deps, round: u64) -> StdResult<Binary> {
    let beacon = BEACONS.may_load(deps.storage, round)?;
    to_json_binary(&beacon)
}

pub fn query_latest_round(deps: Deps) -> StdResult<Binary> {
    let round = LATEST_ROUND.may_load(deps.storage)?.unwrap_or(0);
    to_json_binary(&round)
}

pub fn query_expected_round(deps: Deps, at: u64) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&expected_round(config.genesis_time, config.period_seconds, at))
}

/// Recompute a winner index from published randomness. Pure function of the
/// inputs; any mismatch with an engine's recorded winner means the drawing
/// did not follow the seed.
pub fn query_verify_selection(
    randomness_hex: String,
    round_id: u64,
    tier: u8,
    candidate_count: u64,
) -> StdResult<Binary> {
    let bytes = hex::decode(&randomness_hex)
        .map_err(|_| StdError::generic_err("randomness_hex is not valid hex"))?;
    let randomness: [u8; 32] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| StdError::generic_err("randomness must be 32 bytes"))?;
    if !(1..=4).contains(&tier) {
        return Err(StdError::generic_err(format!(
            "invalid tier {tier}, expected 1..=4"
        )));
    }

    let index = derive_winner_index(&randomness, round_id, tier, candidate_count);
    to_json_binary(&index)
}
