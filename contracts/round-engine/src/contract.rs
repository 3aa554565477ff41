use cosmwasm_std::{
    entry_point, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult, Uint128,
};
use cw2::{get_contract_version, set_contract_version};

use crate::error::ContractError;
use crate::execute;
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::query;
use crate::state::{EngineConfig, EngineState, CONFIG, ENGINE_STATE};

const CONTRACT_NAME: &str = "crates.io:tierlotto-round-engine";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[entry_point]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    if msg.pool_denom.is_empty() {
        return Err(ContractError::InvalidDenom);
    }

    let mut hard_blacklist = Vec::new();
    for entry in &msg.hard_blacklist {
        let addr = deps
            .api
            .addr_validate(entry)
            .map_err(|_| ContractError::InvalidAddress {
                address: entry.clone(),
            })?;
        if !hard_blacklist.contains(&addr) {
            hard_blacklist.push(addr);
        }
    }

    let config = EngineConfig {
        admin: info.sender.clone(),
        operator: deps.api.addr_validate(&msg.operator)?,
        randomness_source: deps.api.addr_validate(&msg.randomness_source)?,
        pool_denom: msg.pool_denom,
        hard_blacklist,
    };
    CONFIG.save(deps.storage, &config)?;

    let state = EngineState {
        next_round_id: 1,
        rounds_released: 0,
        total_distributed: Uint128::zero(),
    };
    ENGINE_STATE.save(deps.storage, &state)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", "round-engine")
        .add_attribute("admin", info.sender.to_string()))
}

#[entry_point]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::CreateRound { params } => execute::create_round(deps, env, info, params),
        ExecuteMsg::FundPool { round_id } => execute::fund_pool(deps, env, info, round_id),
        ExecuteMsg::RunSnapshot { round_id, entries } => {
            execute::run_snapshot(deps, env, info, round_id, entries)
        }
        ExecuteMsg::ConfirmSnapshot { round_id } => {
            execute::confirm_snapshot(deps, env, info, round_id)
        }
        ExecuteMsg::RunDrawing {
            round_id,
            beacon_round,
        } => execute::run_drawing(deps, env, info, round_id, beacon_round),
        ExecuteMsg::ConfirmDrawing { round_id } => {
            execute::confirm_drawing(deps, env, info, round_id)
        }
        ExecuteMsg::ResetDrawing { round_id } => execute::reset_drawing(deps, env, info, round_id),
        ExecuteMsg::PrepareHarvest { round_id } => {
            execute::prepare_harvest(deps, env, info, round_id)
        }
        ExecuteMsg::Release { round_id, swap } => execute::release(deps, env, info, round_id, swap),
        ExecuteMsg::UpdateConfig {
            operator,
            randomness_source,
        } => execute::update_config(deps, env, info, operator, randomness_source),
        ExecuteMsg::UpdateBlacklist { add, remove } => {
            execute::update_blacklist(deps, env, info, add, remove)
        }
    }
}

#[entry_point]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => query::query_config(deps),
        QueryMsg::State {} => query::query_state(deps),
        QueryMsg::Round { round_id } => query::query_round(deps, round_id),
        QueryMsg::Rounds { start_after, limit } => query::query_rounds(deps, start_after, limit),
        QueryMsg::Participants {
            round_id,
            tier,
            start_after,
            limit,
        } => query::query_participants(deps, round_id, tier, start_after, limit),
        QueryMsg::Snapshot { round_id } => query::query_snapshot(deps, round_id),
        QueryMsg::Drawing { round_id } => query::query_drawing(deps, round_id),
        QueryMsg::WalletWins {
            address,
            start_after,
            limit,
        } => query::query_wallet_wins(deps, address, start_after, limit),
        QueryMsg::PreviewAllocation { pool, tiers } => {
            query::query_preview_allocation(pool, tiers)
        }
    }
}

#[entry_point]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let stored = get_contract_version(deps.storage)?;
    if stored.contract != CONTRACT_NAME {
        return Err(ContractError::Unauthorized {
            reason: "cannot migrate from different contract type".to_string(),
        });
    }

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("from_version", stored.version)
        .add_attribute("to_version", CONTRACT_VERSION))
}
