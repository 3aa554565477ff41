use cosmwasm_std::{to_json_binary, Addr, QuerierWrapper, QueryRequest, WasmQuery};
use tierlotto_common::selection::derive_winner_index;
use tierlotto_common::types::Tier;

use crate::error::ContractError;
use crate::msg::RandomnessQueryMsg;
use crate::state::BeaconResponse;

/// Fetch verified randomness for a beacon round from the randomness
/// source. The source only stores beacons that passed BLS verification,
/// so shape is all that needs checking here.
pub fn fetch_randomness(
    querier: &QuerierWrapper,
    source: &Addr,
    beacon_round: u64,
) -> Result<[u8; 32], ContractError> {
    let beacon_query = QueryRequest::Wasm(WasmQuery::Smart {
        contract_addr: source.to_string(),
        msg: to_json_binary(&RandomnessQueryMsg::Beacon {
            round: beacon_round,
        })?,
    });

    let beacon_response: Option<BeaconResponse> = querier.query(&beacon_query)?;
    let beacon = beacon_response.ok_or(ContractError::BeaconUnavailable {
        round: beacon_round,
    })?;

    let randomness: [u8; 32] =
        beacon
            .randomness
            .as_slice()
            .try_into()
            .map_err(|_| ContractError::InvalidRandomness {
                reason: format!(
                    "expected 32 randomness bytes, got {}",
                    beacon.randomness.len()
                ),
            })?;
    Ok(randomness)
}

/// Index of the winning candidate within a tier's eligible set, or `None`
/// for an empty tier.
pub fn pick_index(
    randomness: &[u8; 32],
    round_id: u64,
    tier: Tier,
    candidate_count: usize,
) -> Option<usize> {
    derive_winner_index(randomness, round_id, tier.number(), candidate_count as u64)
        .map(|i| i as usize)
}
