//! Integration tests for the TierLotto protocol.
//!
//! These tests exercise the contract entry points directly using
//! `cosmwasm_std::testing` mocks. Each contract is tested via its
//! `instantiate` / `execute` / `query` entry points.
//!
//! For cross-contract interactions (the round engine querying the
//! beacon oracle), we mock the querier using `MockQuerier::update_wasm`.
//!
//! Run:
//! ```bash
//! cargo test -p tierlotto-integration-tests
//! ```

use cosmwasm_std::testing::{message_info, mock_dependencies, mock_env, MockApi, MockQuerier};
use cosmwasm_std::{
    coins, from_json, to_json_binary, BankMsg, ContractResult, CosmosMsg, OwnedDeps, SystemResult,
    Timestamp, Uint128, WasmQuery,
};
use sha2::{Digest, Sha256};
use tierlotto_common::selection::{derive_winner_index, participant_set_digest};
use tierlotto_common::types::{
    DistributionStatus, DrawingStatus, HarvestStatus, SnapshotStatus,
};

// ─── Constants ───

/// Real drand quicknet public key
const QUICKNET_PK_HEX: &str = "83cf0f2896adee7eb8b5f01fcad3912212c437e0073e911fb90022d3e760183c8c4b450b6a0a6c3ac6a5776a2d1064510d1fec758c921cc22b0e17e63aaf4bcb5ed66304de9cf809bd274ca73bab4af5a6e9c76a4bc09e76eae8991ef5ece45a";

/// Real quicknet test vector: round 1000
const TEST_ROUND: u64 = 1000;
const TEST_SIG_HEX: &str = "b44679b9a59af2ec876b1a6b1ad52ea9b1615fc3982b19576350f93447cb1125e342b73a8dd2bacbe47e4b6b63ed5e39";
const TEST_RANDOMNESS_HEX: &str =
    "fe290beca10872ef2fb164d2aa4442de4566183ec51c56ff3cd603d930e54fdd";

const DENOM: &str = "ulotto";

// ─── Oracle helpers ───

fn oracle_instantiate_msg(operator: &str) -> tierlotto_beacon_oracle::msg::InstantiateMsg {
    tierlotto_beacon_oracle::msg::InstantiateMsg {
        operators: vec![operator.to_string()],
        public_key_hex: QUICKNET_PK_HEX.to_string(),
        chain_hash: "52db9ba70e0cc0f6eaf7803dd07447a1f5477735fd3f661792ba94600c84e971".to_string(),
        genesis_time: 1692803367,
        period_seconds: 3,
    }
}

fn setup_oracle(deps: &mut OwnedDeps<cosmwasm_std::MemoryStorage, MockApi, MockQuerier>) {
    let admin = deps.api.addr_make("admin");
    let operator = deps.api.addr_make("operator");
    let msg = oracle_instantiate_msg(&operator.to_string());
    let info = message_info(&admin, &[]);
    tierlotto_beacon_oracle::contract::instantiate(deps.as_mut(), mock_env(), info, msg).unwrap();
}

// ─── Engine helpers ───

fn engine_instantiate_msg() -> tierlotto_round_engine::msg::InstantiateMsg {
    let mock_api = MockApi::default();
    tierlotto_round_engine::msg::InstantiateMsg {
        operator: mock_api.addr_make("operator").to_string(),
        randomness_source: mock_api.addr_make("beacon_oracle").to_string(),
        pool_denom: DENOM.to_string(),
        hard_blacklist: vec![],
    }
}

fn setup_engine(deps: &mut OwnedDeps<cosmwasm_std::MemoryStorage, MockApi, MockQuerier>) {
    let admin = deps.api.addr_make("admin");
    let msg = engine_instantiate_msg();
    let info = message_info(&admin, &[]);
    tierlotto_round_engine::contract::instantiate(deps.as_mut(), mock_env(), info, msg).unwrap();
}

fn create_round(deps: &mut OwnedDeps<cosmwasm_std::MemoryStorage, MockApi, MockQuerier>) -> u64 {
    let operator = deps.api.addr_make("operator");
    let info = message_info(&operator, &[]);
    let res = tierlotto_round_engine::contract::execute(
        deps.as_mut(),
        mock_env(),
        info,
        tierlotto_round_engine::msg::ExecuteMsg::CreateRound {
            params: tierlotto_round_engine::msg::CreateRoundParams {
                start_time: Timestamp::from_seconds(1_700_000_000),
                end_time: Timestamp::from_seconds(1_700_600_000),
                scheduled_draw_time: Some(Timestamp::from_seconds(1_700_700_000)),
                blacklist: vec![],
            },
        },
    )
    .unwrap();
    res.attributes
        .iter()
        .find(|a| a.key == "round_id")
        .unwrap()
        .value
        .parse()
        .unwrap()
}

fn fund_round(
    deps: &mut OwnedDeps<cosmwasm_std::MemoryStorage, MockApi, MockQuerier>,
    round_id: u64,
    amount: u128,
) {
    let operator = deps.api.addr_make("operator");
    let info = message_info(&operator, &coins(amount, DENOM));
    tierlotto_round_engine::contract::execute(
        deps.as_mut(),
        mock_env(),
        info,
        tierlotto_round_engine::msg::ExecuteMsg::FundPool { round_id },
    )
    .unwrap();
}

/// Wallet `i` of tier `t` is named `tier{t}_user{i}`, matching the
/// candidate ordering the engine uses for selection.
fn snapshot_entries(counts: [u32; 4]) -> Vec<tierlotto_round_engine::msg::SnapshotEntry> {
    let mock_api = MockApi::default();
    let mut entries = Vec::new();
    for (idx, count) in counts.iter().enumerate() {
        let tier = (idx + 1) as u8;
        for i in 0..*count {
            entries.push(tierlotto_round_engine::msg::SnapshotEntry {
                wallet: mock_api
                    .addr_make(&format!("tier{tier}_user{i}"))
                    .to_string(),
                token_balance: Uint128::from(5_000_000u128 * (i as u128 + 1)),
                tier,
                eligibility_score: Uint128::from(100u128 * (i as u128 + 1)),
            });
        }
    }
    entries
}

fn submit_snapshot(
    deps: &mut OwnedDeps<cosmwasm_std::MemoryStorage, MockApi, MockQuerier>,
    round_id: u64,
    entries: Vec<tierlotto_round_engine::msg::SnapshotEntry>,
) {
    let operator = deps.api.addr_make("operator");
    let info = message_info(&operator, &[]);
    tierlotto_round_engine::contract::execute(
        deps.as_mut(),
        mock_env(),
        info.clone(),
        tierlotto_round_engine::msg::ExecuteMsg::RunSnapshot { round_id, entries },
    )
    .unwrap();
    tierlotto_round_engine::contract::execute(
        deps.as_mut(),
        mock_env(),
        info,
        tierlotto_round_engine::msg::ExecuteMsg::ConfirmSnapshot { round_id },
    )
    .unwrap();
}

/// Point the engine's querier at a canned beacon response, as if the
/// oracle had that round stored and nothing else.
fn register_engine_beacon(
    deps: &mut OwnedDeps<cosmwasm_std::MemoryStorage, MockApi, MockQuerier>,
    beacon_round: u64,
    randomness: Vec<u8>,
) {
    let api = deps.api;
    deps.querier.update_wasm(move |query| match query {
        WasmQuery::Smart { msg, .. } => {
            let parsed: Result<tierlotto_round_engine::msg::RandomnessQueryMsg, _> = from_json(msg);
            match parsed {
                Ok(tierlotto_round_engine::msg::RandomnessQueryMsg::Beacon { round })
                    if round == beacon_round =>
                {
                    let beacon = tierlotto_round_engine::state::BeaconResponse {
                        round,
                        randomness: randomness.clone(),
                        signature: vec![0u8; 48],
                        submitted_at: Timestamp::from_seconds(1_700_650_000),
                        submitted_by: api.addr_make("oracle_operator"),
                    };
                    SystemResult::Ok(ContractResult::Ok(to_json_binary(&Some(beacon)).unwrap()))
                }
                Ok(_) => SystemResult::Ok(ContractResult::Ok(
                    to_json_binary(&None::<tierlotto_round_engine::state::BeaconResponse>).unwrap(),
                )),
                Err(_) => SystemResult::Err(cosmwasm_std::SystemError::InvalidRequest {
                    error: "Unknown query".to_string(),
                    request: Default::default(),
                }),
            }
        }
        _ => SystemResult::Err(cosmwasm_std::SystemError::InvalidRequest {
            error: "Only smart queries supported".to_string(),
            request: Default::default(),
        }),
    });
}

/// Recompute a winner index the way an external auditor would:
/// sha256(randomness || round_id_be || tier), first 16 bytes as a
/// big-endian integer, mod candidate count.
fn expected_winner_index(randomness: &[u8], round_id: u64, tier: u8, candidate_count: u64) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(randomness);
    hasher.update(round_id.to_be_bytes());
    hasher.update([tier]);
    let digest: [u8; 32] = hasher.finalize().into();
    let mut head = [0u8; 16];
    head.copy_from_slice(&digest[0..16]);
    (u128::from_be_bytes(head) % candidate_count as u128) as u64
}

fn query_round(
    deps: &OwnedDeps<cosmwasm_std::MemoryStorage, MockApi, MockQuerier>,
    round_id: u64,
) -> tierlotto_round_engine::state::Round {
    from_json(
        tierlotto_round_engine::contract::query(
            deps.as_ref(),
            mock_env(),
            tierlotto_round_engine::msg::QueryMsg::Round { round_id },
        )
        .unwrap(),
    )
    .unwrap()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn test_beacon_verification_flow() {
    // Test the beacon oracle contract: instantiate, submit a real beacon,
    // query it back, then verify that bad submissions fail.

    let mut deps = mock_dependencies();
    setup_oracle(&mut deps);

    let operator = deps.api.addr_make("operator");

    // 1. Submit real quicknet round 1000 beacon
    let submit_msg = tierlotto_beacon_oracle::msg::ExecuteMsg::SubmitBeacon {
        round: TEST_ROUND,
        signature_hex: TEST_SIG_HEX.to_string(),
    };
    let info = message_info(&operator, &[]);
    let res =
        tierlotto_beacon_oracle::contract::execute(deps.as_mut(), mock_env(), info, submit_msg)
            .unwrap();

    // Verify response attributes
    assert_eq!(res.attributes[0].value, "submit_beacon");
    assert_eq!(res.attributes[1].value, TEST_ROUND.to_string());

    // 2. Query beacon back, randomness must be sha256(signature)
    let query_msg = tierlotto_beacon_oracle::msg::QueryMsg::Beacon { round: TEST_ROUND };
    let res =
        tierlotto_beacon_oracle::contract::query(deps.as_ref(), mock_env(), query_msg).unwrap();
    let beacon: Option<tierlotto_beacon_oracle::state::StoredBeacon> = from_json(res).unwrap();
    let beacon = beacon.expect("beacon should be stored");
    assert_eq!(beacon.round, TEST_ROUND);
    assert_eq!(hex::encode(&beacon.randomness), TEST_RANDOMNESS_HEX);

    // 3. Query latest round
    let query_msg = tierlotto_beacon_oracle::msg::QueryMsg::LatestRound {};
    let res =
        tierlotto_beacon_oracle::contract::query(deps.as_ref(), mock_env(), query_msg).unwrap();
    let latest: u64 = from_json(res).unwrap();
    assert_eq!(latest, TEST_ROUND);

    // 4. Expected round at a timestamp 30s past genesis, 3s period
    let query_msg = tierlotto_beacon_oracle::msg::QueryMsg::ExpectedRound { at: 1692803367 + 30 };
    let res =
        tierlotto_beacon_oracle::contract::query(deps.as_ref(), mock_env(), query_msg).unwrap();
    let expected: u64 = from_json(res).unwrap();
    assert_eq!(expected, 11);

    // 5. Submit with wrong round (same sig) → should fail BLS verification
    let bad_msg = tierlotto_beacon_oracle::msg::ExecuteMsg::SubmitBeacon {
        round: TEST_ROUND + 1,
        signature_hex: TEST_SIG_HEX.to_string(),
    };
    let operator = deps.api.addr_make("operator");
    let info = message_info(&operator, &[]);
    let err = tierlotto_beacon_oracle::contract::execute(deps.as_mut(), mock_env(), info, bad_msg)
        .unwrap_err();
    assert!(
        format!("{:?}", err).contains("VerificationFailed"),
        "Expected verification failure, got: {:?}",
        err
    );

    // 6. Duplicate submission → should fail
    let dup_msg = tierlotto_beacon_oracle::msg::ExecuteMsg::SubmitBeacon {
        round: TEST_ROUND,
        signature_hex: TEST_SIG_HEX.to_string(),
    };
    let operator = deps.api.addr_make("operator");
    let info = message_info(&operator, &[]);
    let err = tierlotto_beacon_oracle::contract::execute(deps.as_mut(), mock_env(), info, dup_msg)
        .unwrap_err();
    assert!(
        format!("{:?}", err).contains("BeaconAlreadyExists"),
        "Expected duplicate error, got: {:?}",
        err
    );

    // 7. Unauthorized submission → should fail
    let unauth_msg = tierlotto_beacon_oracle::msg::ExecuteMsg::SubmitBeacon {
        round: 2000,
        signature_hex: TEST_SIG_HEX.to_string(),
    };
    let random = deps.api.addr_make("random");
    let info = message_info(&random, &[]);
    let err =
        tierlotto_beacon_oracle::contract::execute(deps.as_mut(), mock_env(), info, unauth_msg)
            .unwrap_err();
    assert!(
        format!("{:?}", err).contains("Unauthorized"),
        "Expected unauthorized error, got: {:?}",
        err
    );

    eprintln!("test_beacon_verification_flow passed");
}

#[test]
fn test_full_round_lifecycle() {
    // Full integration test across both contracts:
    // 1. Setup oracle, submit a real beacon
    // 2. Setup engine with mock wasm querier returning the oracle's
    //    actual query response
    // 3. Create round, fund pool, snapshot, draw, confirm
    // 4. Recompute the expected winners from the public randomness
    // 5. Prepare harvest, release, verify payouts and win tracking

    // ── Step 1: Setup and submit beacon to oracle ──
    let mut oracle_deps = mock_dependencies();
    setup_oracle(&mut oracle_deps);

    let operator = oracle_deps.api.addr_make("operator");
    let info = message_info(&operator, &[]);
    tierlotto_beacon_oracle::contract::execute(
        oracle_deps.as_mut(),
        mock_env(),
        info,
        tierlotto_beacon_oracle::msg::ExecuteMsg::SubmitBeacon {
            round: TEST_ROUND,
            signature_hex: TEST_SIG_HEX.to_string(),
        },
    )
    .unwrap();

    // Get the beacon data we'll mock in the engine's querier
    let beacon_query_res = tierlotto_beacon_oracle::contract::query(
        oracle_deps.as_ref(),
        mock_env(),
        tierlotto_beacon_oracle::msg::QueryMsg::Beacon { round: TEST_ROUND },
    )
    .unwrap();

    // ── Step 2: Setup engine, serving the oracle's response verbatim ──
    let mut engine_deps = mock_dependencies();

    let beacon_binary = beacon_query_res.clone();
    engine_deps.querier.update_wasm(move |query| match query {
        WasmQuery::Smart { msg, .. } => {
            let parsed: Result<tierlotto_round_engine::msg::RandomnessQueryMsg, _> = from_json(msg);
            if let Ok(tierlotto_round_engine::msg::RandomnessQueryMsg::Beacon { round }) = parsed {
                if round == TEST_ROUND {
                    SystemResult::Ok(ContractResult::Ok(beacon_binary.clone()))
                } else {
                    SystemResult::Ok(ContractResult::Ok(
                        to_json_binary(&None::<tierlotto_round_engine::state::BeaconResponse>)
                            .unwrap(),
                    ))
                }
            } else {
                SystemResult::Err(cosmwasm_std::SystemError::InvalidRequest {
                    error: "Unknown query".to_string(),
                    request: Default::default(),
                })
            }
        }
        _ => SystemResult::Err(cosmwasm_std::SystemError::InvalidRequest {
            error: "Only smart queries supported".to_string(),
            request: Default::default(),
        }),
    });

    setup_engine(&mut engine_deps);

    // ── Step 3: Create round, fund 89.215000, snapshot all four tiers ──
    let round_id = create_round(&mut engine_deps);
    fund_round(&mut engine_deps, round_id, 89_215_000);

    let counts = [2u32, 1, 3, 1];
    submit_snapshot(&mut engine_deps, round_id, snapshot_entries(counts));

    let round = query_round(&engine_deps, round_id);
    assert_eq!(round.snapshot_status, SnapshotStatus::Confirmed);
    assert_eq!(round.total_participants, 7);

    // ── Step 4: Draw using the oracle beacon and confirm ──
    let operator = engine_deps.api.addr_make("operator");
    let info = message_info(&operator, &[]);
    tierlotto_round_engine::contract::execute(
        engine_deps.as_mut(),
        mock_env(),
        info.clone(),
        tierlotto_round_engine::msg::ExecuteMsg::RunDrawing {
            round_id,
            beacon_round: TEST_ROUND,
        },
    )
    .unwrap();
    tierlotto_round_engine::contract::execute(
        engine_deps.as_mut(),
        mock_env(),
        info.clone(),
        tierlotto_round_engine::msg::ExecuteMsg::ConfirmDrawing { round_id },
    )
    .unwrap();

    // ── Step 5: Recompute the winners from the public randomness ──
    let randomness = hex::decode(TEST_RANDOMNESS_HEX).unwrap();
    let mut expected_winners = Vec::new();
    for tier in 1u8..=4 {
        let count = counts[(tier - 1) as usize] as u64;
        let idx = expected_winner_index(&randomness, round_id, tier, count);
        expected_winners.push(engine_deps.api.addr_make(&format!("tier{tier}_user{idx}")));
    }

    let round = query_round(&engine_deps, round_id);
    assert_eq!(round.tier_winners.t1, Some(expected_winners[0].clone()));
    assert_eq!(round.tier_winners.t2, Some(expected_winners[1].clone()));
    assert_eq!(round.tier_winners.t3, Some(expected_winners[2].clone()));
    assert_eq!(round.tier_winners.t4, Some(expected_winners[3].clone()));

    // ── Step 6: Prepare harvest, all four tiers qualify ──
    tierlotto_round_engine::contract::execute(
        engine_deps.as_mut(),
        mock_env(),
        info.clone(),
        tierlotto_round_engine::msg::ExecuteMsg::PrepareHarvest { round_id },
    )
    .unwrap();

    // 40/25/20/15 of 89.215000, half-up at 6 decimals
    let round = query_round(&engine_deps, round_id);
    assert_eq!(round.harvest_status, HarvestStatus::Prepared);
    assert_eq!(round.distribution_status, DistributionStatus::Queued);
    assert_eq!(round.tier_payouts.t1, Uint128::new(35_686_000));
    assert_eq!(round.tier_payouts.t2, Uint128::new(22_303_750));
    assert_eq!(round.tier_payouts.t3, Uint128::new(17_843_000));
    assert_eq!(round.tier_payouts.t4, Uint128::new(13_382_250));

    // ── Step 7: Release and verify the transfers ──
    let res = tierlotto_round_engine::contract::execute(
        engine_deps.as_mut(),
        mock_env(),
        info.clone(),
        tierlotto_round_engine::msg::ExecuteMsg::Release {
            round_id,
            swap: None,
        },
    )
    .unwrap();

    let expected_amounts = [35_686_000u128, 22_303_750, 17_843_000, 13_382_250];
    assert_eq!(res.messages.len(), 4);
    for (i, msg) in res.messages.iter().enumerate() {
        match &msg.msg {
            CosmosMsg::Bank(BankMsg::Send { to_address, amount }) => {
                assert_eq!(to_address, &expected_winners[i].to_string());
                assert_eq!(amount, &coins(expected_amounts[i], DENOM));
            }
            other => panic!("expected bank send, got {:?}", other),
        }
    }

    let round = query_round(&engine_deps, round_id);
    assert_eq!(round.distribution_status, DistributionStatus::Released);
    assert_eq!(round.release_refs.len(), 4);

    // ── Step 8: Releasing twice must fail ──
    let err = tierlotto_round_engine::contract::execute(
        engine_deps.as_mut(),
        mock_env(),
        info,
        tierlotto_round_engine::msg::ExecuteMsg::Release {
            round_id,
            swap: None,
        },
    )
    .unwrap_err();
    assert!(
        format!("{:?}", err).contains("StageConflict"),
        "Expected stage conflict, got: {:?}",
        err
    );

    // ── Step 9: Win tracking and engine totals ──
    let wins: tierlotto_round_engine::msg::WalletWinsResponse = from_json(
        tierlotto_round_engine::contract::query(
            engine_deps.as_ref(),
            mock_env(),
            tierlotto_round_engine::msg::QueryMsg::WalletWins {
                address: expected_winners[0].to_string(),
                start_after: None,
                limit: None,
            },
        )
        .unwrap(),
    )
    .unwrap();
    assert_eq!(wins.total_wins, 1);
    assert_eq!(wins.total_won_amount, Uint128::new(35_686_000));
    assert_eq!(wins.round_ids, vec![round_id]);

    let state: tierlotto_round_engine::state::EngineState = from_json(
        tierlotto_round_engine::contract::query(
            engine_deps.as_ref(),
            mock_env(),
            tierlotto_round_engine::msg::QueryMsg::State {},
        )
        .unwrap(),
    )
    .unwrap();
    assert_eq!(state.rounds_released, 1);
    assert_eq!(state.total_distributed, Uint128::new(89_215_000));

    eprintln!("test_full_round_lifecycle passed");
}

#[test]
fn test_partial_tier_allocation() {
    // Only tiers 1 and 3 have participants. Their 4000/2000 bps weights
    // renormalize to 2/3 and 1/3 of the pool, and the last qualifying
    // tier absorbs the rounding remainder so the pool splits exactly.
    let mut deps = mock_dependencies();
    register_engine_beacon(
        &mut deps,
        TEST_ROUND,
        hex::decode(TEST_RANDOMNESS_HEX).unwrap(),
    );
    setup_engine(&mut deps);

    let round_id = create_round(&mut deps);
    fund_round(&mut deps, round_id, 50_000_000);
    submit_snapshot(&mut deps, round_id, snapshot_entries([1, 0, 2, 0]));

    let operator = deps.api.addr_make("operator");
    let info = message_info(&operator, &[]);
    tierlotto_round_engine::contract::execute(
        deps.as_mut(),
        mock_env(),
        info.clone(),
        tierlotto_round_engine::msg::ExecuteMsg::RunDrawing {
            round_id,
            beacon_round: TEST_ROUND,
        },
    )
    .unwrap();
    tierlotto_round_engine::contract::execute(
        deps.as_mut(),
        mock_env(),
        info.clone(),
        tierlotto_round_engine::msg::ExecuteMsg::ConfirmDrawing { round_id },
    )
    .unwrap();

    let round = query_round(&deps, round_id);
    assert!(round.tier_winners.t1.is_some());
    assert!(round.tier_winners.t2.is_none());
    assert!(round.tier_winners.t3.is_some());
    assert!(round.tier_winners.t4.is_none());

    tierlotto_round_engine::contract::execute(
        deps.as_mut(),
        mock_env(),
        info.clone(),
        tierlotto_round_engine::msg::ExecuteMsg::PrepareHarvest { round_id },
    )
    .unwrap();

    let round = query_round(&deps, round_id);
    assert_eq!(round.tier_payouts.t1, Uint128::new(33_333_333));
    assert_eq!(round.tier_payouts.t2, Uint128::zero());
    assert_eq!(round.tier_payouts.t3, Uint128::new(16_666_667));
    assert_eq!(round.tier_payouts.t4, Uint128::zero());

    let res = tierlotto_round_engine::contract::execute(
        deps.as_mut(),
        mock_env(),
        info,
        tierlotto_round_engine::msg::ExecuteMsg::Release {
            round_id,
            swap: None,
        },
    )
    .unwrap();
    assert_eq!(res.messages.len(), 2, "only winning tiers are paid");

    let state: tierlotto_round_engine::state::EngineState = from_json(
        tierlotto_round_engine::contract::query(
            deps.as_ref(),
            mock_env(),
            tierlotto_round_engine::msg::QueryMsg::State {},
        )
        .unwrap(),
    )
    .unwrap();
    assert_eq!(state.total_distributed, Uint128::new(50_000_000));

    eprintln!("test_partial_tier_allocation passed");
}

#[test]
fn test_stage_ordering_enforced() {
    // Every stage requires the previous stage's confirmation. Skipping
    // ahead reports the missing prerequisite, not a missing record.
    let mut deps = mock_dependencies();
    setup_engine(&mut deps);

    let round_id = create_round(&mut deps);
    fund_round(&mut deps, round_id, 10_000_000);

    let operator = deps.api.addr_make("operator");
    let info = message_info(&operator, &[]);

    // Drawing before any snapshot
    let err = tierlotto_round_engine::contract::execute(
        deps.as_mut(),
        mock_env(),
        info.clone(),
        tierlotto_round_engine::msg::ExecuteMsg::RunDrawing {
            round_id,
            beacon_round: TEST_ROUND,
        },
    )
    .unwrap_err();
    assert!(
        format!("{:?}", err).contains("PrerequisiteNotMet"),
        "Expected prerequisite error, got: {:?}",
        err
    );

    // Snapshot taken but not confirmed: confirming the drawing still
    // reports the snapshot prerequisite
    tierlotto_round_engine::contract::execute(
        deps.as_mut(),
        mock_env(),
        info.clone(),
        tierlotto_round_engine::msg::ExecuteMsg::RunSnapshot {
            round_id,
            entries: snapshot_entries([2, 0, 0, 0]),
        },
    )
    .unwrap();
    let err = tierlotto_round_engine::contract::execute(
        deps.as_mut(),
        mock_env(),
        info.clone(),
        tierlotto_round_engine::msg::ExecuteMsg::ConfirmDrawing { round_id },
    )
    .unwrap_err();
    assert!(
        format!("{:?}", err).contains("PrerequisiteNotMet"),
        "Expected prerequisite error, got: {:?}",
        err
    );

    // Harvest before a confirmed drawing
    let err = tierlotto_round_engine::contract::execute(
        deps.as_mut(),
        mock_env(),
        info.clone(),
        tierlotto_round_engine::msg::ExecuteMsg::PrepareHarvest { round_id },
    )
    .unwrap_err();
    assert!(
        format!("{:?}", err).contains("PrerequisiteNotMet"),
        "Expected prerequisite error, got: {:?}",
        err
    );

    // Release before a prepared harvest
    let err = tierlotto_round_engine::contract::execute(
        deps.as_mut(),
        mock_env(),
        info.clone(),
        tierlotto_round_engine::msg::ExecuteMsg::Release {
            round_id,
            swap: None,
        },
    )
    .unwrap_err();
    assert!(
        format!("{:?}", err).contains("PrerequisiteNotMet"),
        "Expected prerequisite error, got: {:?}",
        err
    );

    // Confirm the snapshot, then draw against a round the oracle does
    // not have
    tierlotto_round_engine::contract::execute(
        deps.as_mut(),
        mock_env(),
        info.clone(),
        tierlotto_round_engine::msg::ExecuteMsg::ConfirmSnapshot { round_id },
    )
    .unwrap();
    register_engine_beacon(&mut deps, 2000, vec![0x11; 32]);
    let err = tierlotto_round_engine::contract::execute(
        deps.as_mut(),
        mock_env(),
        info.clone(),
        tierlotto_round_engine::msg::ExecuteMsg::RunDrawing {
            round_id,
            beacon_round: 9999,
        },
    )
    .unwrap_err();
    assert!(
        format!("{:?}", err).contains("BeaconUnavailable"),
        "Expected beacon unavailable, got: {:?}",
        err
    );

    // The registered round works
    tierlotto_round_engine::contract::execute(
        deps.as_mut(),
        mock_env(),
        info,
        tierlotto_round_engine::msg::ExecuteMsg::RunDrawing {
            round_id,
            beacon_round: 2000,
        },
    )
    .unwrap();

    eprintln!("test_stage_ordering_enforced passed");
}

#[test]
fn test_reset_and_redraw() {
    // An unconfirmed drawing can be discarded and re-run against a
    // different beacon round. A confirmed one cannot.
    let mut deps = mock_dependencies();
    setup_engine(&mut deps);

    let round_id = create_round(&mut deps);
    fund_round(&mut deps, round_id, 10_000_000);
    submit_snapshot(&mut deps, round_id, snapshot_entries([3, 0, 0, 0]));

    let operator = deps.api.addr_make("operator");
    let info = message_info(&operator, &[]);

    // First drawing from beacon round 2000
    let rand_a = vec![0x11u8; 32];
    register_engine_beacon(&mut deps, 2000, rand_a.clone());
    tierlotto_round_engine::contract::execute(
        deps.as_mut(),
        mock_env(),
        info.clone(),
        tierlotto_round_engine::msg::ExecuteMsg::RunDrawing {
            round_id,
            beacon_round: 2000,
        },
    )
    .unwrap();

    let drawing: Option<tierlotto_round_engine::state::DrawingRecord> = from_json(
        tierlotto_round_engine::contract::query(
            deps.as_ref(),
            mock_env(),
            tierlotto_round_engine::msg::QueryMsg::Drawing { round_id },
        )
        .unwrap(),
    )
    .unwrap();
    let drawing = drawing.expect("drawing should exist");
    assert_eq!(drawing.status, DrawingStatus::Completed);
    let idx_a = expected_winner_index(&rand_a, round_id, 1, 3);
    assert_eq!(
        drawing.winners.t1,
        Some(deps.api.addr_make(&format!("tier1_user{idx_a}")))
    );

    // Discard and re-run from beacon round 3000
    tierlotto_round_engine::contract::execute(
        deps.as_mut(),
        mock_env(),
        info.clone(),
        tierlotto_round_engine::msg::ExecuteMsg::ResetDrawing { round_id },
    )
    .unwrap();

    let rand_b = vec![0x22u8; 32];
    register_engine_beacon(&mut deps, 3000, rand_b.clone());
    tierlotto_round_engine::contract::execute(
        deps.as_mut(),
        mock_env(),
        info.clone(),
        tierlotto_round_engine::msg::ExecuteMsg::RunDrawing {
            round_id,
            beacon_round: 3000,
        },
    )
    .unwrap();
    tierlotto_round_engine::contract::execute(
        deps.as_mut(),
        mock_env(),
        info.clone(),
        tierlotto_round_engine::msg::ExecuteMsg::ConfirmDrawing { round_id },
    )
    .unwrap();

    let drawing: Option<tierlotto_round_engine::state::DrawingRecord> = from_json(
        tierlotto_round_engine::contract::query(
            deps.as_ref(),
            mock_env(),
            tierlotto_round_engine::msg::QueryMsg::Drawing { round_id },
        )
        .unwrap(),
    )
    .unwrap();
    let drawing = drawing.expect("drawing should exist");
    let audit = drawing.audit.expect("confirmed drawing carries an audit");
    assert_eq!(audit.beacon_round, 3000);
    assert_eq!(audit.seed_hex, hex::encode(&rand_b));

    let idx_b = expected_winner_index(&rand_b, round_id, 1, 3);
    let round = query_round(&deps, round_id);
    assert_eq!(
        round.tier_winners.t1,
        Some(deps.api.addr_make(&format!("tier1_user{idx_b}")))
    );

    // Confirmed drawings are final
    let err = tierlotto_round_engine::contract::execute(
        deps.as_mut(),
        mock_env(),
        info,
        tierlotto_round_engine::msg::ExecuteMsg::ResetDrawing { round_id },
    )
    .unwrap_err();
    assert!(
        format!("{:?}", err).contains("StageConflict"),
        "Expected stage conflict, got: {:?}",
        err
    );

    eprintln!("test_reset_and_redraw passed");
}

#[test]
fn test_drawing_audit_reproducible() {
    // The audit trail published by the engine is enough for a third
    // party to re-derive the whole drawing: the snapshot digest matches
    // the submitted entries, and the oracle's VerifySelection query
    // returns the same winner index the engine picked.
    let mut deps = mock_dependencies();
    register_engine_beacon(
        &mut deps,
        TEST_ROUND,
        hex::decode(TEST_RANDOMNESS_HEX).unwrap(),
    );
    setup_engine(&mut deps);

    let round_id = create_round(&mut deps);
    fund_round(&mut deps, round_id, 20_000_000);

    let entries = snapshot_entries([4, 0, 0, 0]);
    submit_snapshot(&mut deps, round_id, entries.clone());

    // Snapshot digest is recomputable from the submitted entries
    let snapshot: Option<tierlotto_round_engine::state::SnapshotRecord> = from_json(
        tierlotto_round_engine::contract::query(
            deps.as_ref(),
            mock_env(),
            tierlotto_round_engine::msg::QueryMsg::Snapshot { round_id },
        )
        .unwrap(),
    )
    .unwrap();
    let snapshot = snapshot.expect("snapshot should exist");
    let local_digest = participant_set_digest(entries.iter().map(|e| {
        (
            e.wallet.as_str(),
            e.token_balance.u128(),
            e.tier,
            e.eligibility_score.u128(),
        )
    }));
    assert_eq!(snapshot.participants_digest, hex::encode(local_digest));

    // Draw and confirm
    let operator = deps.api.addr_make("operator");
    let info = message_info(&operator, &[]);
    tierlotto_round_engine::contract::execute(
        deps.as_mut(),
        mock_env(),
        info.clone(),
        tierlotto_round_engine::msg::ExecuteMsg::RunDrawing {
            round_id,
            beacon_round: TEST_ROUND,
        },
    )
    .unwrap();
    tierlotto_round_engine::contract::execute(
        deps.as_mut(),
        mock_env(),
        info,
        tierlotto_round_engine::msg::ExecuteMsg::ConfirmDrawing { round_id },
    )
    .unwrap();

    let drawing: Option<tierlotto_round_engine::state::DrawingRecord> = from_json(
        tierlotto_round_engine::contract::query(
            deps.as_ref(),
            mock_env(),
            tierlotto_round_engine::msg::QueryMsg::Drawing { round_id },
        )
        .unwrap(),
    )
    .unwrap();
    let audit = drawing
        .expect("drawing should exist")
        .audit
        .expect("drawing carries an audit");
    assert_eq!(audit.seed_hex, TEST_RANDOMNESS_HEX);
    assert_eq!(audit.beacon_round, TEST_ROUND);

    // The oracle re-derives the same winner index from the audit data
    let mut oracle_deps = mock_dependencies();
    setup_oracle(&mut oracle_deps);
    let verified_idx: Option<u64> = from_json(
        tierlotto_beacon_oracle::contract::query(
            oracle_deps.as_ref(),
            mock_env(),
            tierlotto_beacon_oracle::msg::QueryMsg::VerifySelection {
                randomness_hex: audit.seed_hex.clone(),
                round_id,
                tier: 1,
                candidate_count: 4,
            },
        )
        .unwrap(),
    )
    .unwrap();
    let verified_idx = verified_idx.expect("candidates exist");

    let seed: [u8; 32] = hex::decode(&audit.seed_hex).unwrap().try_into().unwrap();
    assert_eq!(derive_winner_index(&seed, round_id, 1, 4), Some(verified_idx));

    let round = query_round(&deps, round_id);
    assert_eq!(
        round.tier_winners.t1,
        Some(deps.api.addr_make(&format!("tier1_user{verified_idx}")))
    );

    eprintln!("test_drawing_audit_reproducible passed");
}
