use std::collections::BTreeSet;

use cosmwasm_std::{
    coins, Addr, BankMsg, DepsMut, Env, Event, MessageInfo, Order, Response, StdResult, Storage,
    Uint128,
};
use tierlotto_common::money::format_fixed6;
use tierlotto_common::selection::participant_set_digest;
use tierlotto_common::types::{
    ControlStatus, DistributionStatus, DrawingStatus, HarvestStatus, SnapshotStatus, Tier,
    TierWinners,
};

use crate::allocation::allocate;
use crate::error::ContractError;
use crate::msg::{CreateRoundParams, SnapshotEntry};
use crate::randomness;
use crate::state::{
    DrawAudit, DrawingRecord, EngineConfig, Participant, Round, SnapshotRecord, SwapRoute, CONFIG,
    DRAWINGS, ENGINE_STATE, PARTICIPANTS, ROUNDS, SNAPSHOTS, WINNER_COUNTS, WINNER_ROUNDS,
    WINNER_TOTALS,
};

fn ensure_operator(config: &EngineConfig, info: &MessageInfo) -> Result<(), ContractError> {
    if info.sender != config.operator {
        return Err(ContractError::Unauthorized {
            reason: "only the operator can advance rounds".to_string(),
        });
    }
    Ok(())
}

fn ensure_admin(config: &EngineConfig, info: &MessageInfo) -> Result<(), ContractError> {
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only admin can update configuration".to_string(),
        });
    }
    Ok(())
}

fn load_round(storage: &dyn Storage, round_id: u64) -> Result<Round, ContractError> {
    ROUNDS
        .may_load(storage, round_id)?
        .ok_or(ContractError::RoundNotFound { round_id })
}

fn winner_attr(winner: Option<&Addr>) -> String {
    winner.map_or_else(|| "none".to_string(), |a| a.to_string())
}

/// Create a round with control configuration. Operator only.
/// The round blacklist is the submitted list merged with the config hard
/// blacklist, deduplicated.
pub fn create_round(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    params: CreateRoundParams,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_operator(&config, &info)?;

    if params.start_time >= params.end_time {
        return Err(ContractError::InvalidTimeWindow {
            start: params.start_time.seconds(),
            end: params.end_time.seconds(),
        });
    }
    if let Some(draw) = params.scheduled_draw_time {
        if draw < params.end_time {
            return Err(ContractError::DrawTimeBeforeEnd {
                draw: draw.seconds(),
                end: params.end_time.seconds(),
            });
        }
    }

    let mut blacklist: Vec<Addr> = Vec::new();
    for entry in &params.blacklist {
        let addr = deps
            .api
            .addr_validate(entry)
            .map_err(|_| ContractError::InvalidAddress {
                address: entry.clone(),
            })?;
        if !blacklist.contains(&addr) {
            blacklist.push(addr);
        }
    }
    for addr in &config.hard_blacklist {
        if !blacklist.contains(addr) {
            blacklist.push(addr.clone());
        }
    }

    let mut state = ENGINE_STATE.load(deps.storage)?;
    let round_id = state.next_round_id;
    state.next_round_id += 1;

    let round = Round {
        id: round_id,
        created_at: env.block.time,
        start_time: params.start_time,
        end_time: params.end_time,
        scheduled_draw_time: params.scheduled_draw_time,
        drawing_time: None,
        distribution_time: None,
        prize_pool: Uint128::zero(),
        total_participants: 0,
        eligible_participants: 0,
        blacklist,
        control_status: ControlStatus::Pending,
        snapshot_status: SnapshotStatus::Unset,
        drawing_status: DrawingStatus::Unset,
        harvest_status: HarvestStatus::Unset,
        distribution_status: DistributionStatus::Unset,
        tier_winners: TierWinners::default(),
        tier_payouts: Default::default(),
        harvest_prepared_at: None,
        release_refs: vec![],
        swap_route: None,
    };

    ROUNDS.save(deps.storage, round_id, &round)?;
    ENGINE_STATE.save(deps.storage, &state)?;

    Ok(Response::new()
        .add_attribute("action", "create_round")
        .add_attribute("round_id", round_id.to_string())
        .add_event(
            Event::new("lotto_round_created")
                .add_attribute("round_id", round_id.to_string())
                .add_attribute("start_time", round.start_time.seconds().to_string())
                .add_attribute("end_time", round.end_time.seconds().to_string())
                .add_attribute("blacklist_size", round.blacklist.len().to_string()),
        ))
}

/// Add attached funds to a round's prize pool. Operator only. Top-ups are
/// allowed until release; harvest preparation must then be re-run so the
/// allocations match the grown pool.
pub fn fund_pool(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    round_id: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_operator(&config, &info)?;

    let mut round = load_round(deps.storage, round_id)?;
    if round.distribution_status == DistributionStatus::Released {
        return Err(ContractError::StageConflict {
            round_id,
            stage: "distribution",
            status: "released",
        });
    }

    if let Some(stray) = info.funds.iter().find(|c| c.denom != config.pool_denom) {
        return Err(ContractError::WrongDenom {
            denom: stray.denom.clone(),
            expected: config.pool_denom,
        });
    }
    let amount = info
        .funds
        .iter()
        .find(|c| c.denom == config.pool_denom)
        .map(|c| c.amount)
        .unwrap_or(Uint128::zero());
    if amount.is_zero() {
        return Err(ContractError::NoFundsSent {
            denom: config.pool_denom,
        });
    }

    round.prize_pool += amount;
    ROUNDS.save(deps.storage, round_id, &round)?;

    Ok(Response::new()
        .add_attribute("action", "fund_pool")
        .add_attribute("round_id", round_id.to_string())
        .add_attribute("amount", amount.to_string())
        .add_event(
            Event::new("lotto_pool_funded")
                .add_attribute("round_id", round_id.to_string())
                .add_attribute("amount", amount.to_string())
                .add_attribute("amount_fixed", format_fixed6(amount))
                .add_attribute("prize_pool", round.prize_pool.to_string()),
        ))
}

fn clear_participants(storage: &mut dyn Storage, round_id: u64) -> StdResult<()> {
    let keys: Vec<(u8, u32)> = PARTICIPANTS
        .sub_prefix(round_id)
        .keys(storage, None, None, Order::Ascending)
        .collect::<StdResult<Vec<_>>>()?;
    for (tier, seq) in keys {
        PARTICIPANTS.remove(storage, (round_id, tier, seq));
    }
    Ok(())
}

/// Ingest the participant set for a round. Operator only.
///
/// Re-running before confirmation wipes the previous set and replaces it
/// wholesale; the snapshot record tracks the RUNNING to COMPLETED
/// transition and carries a digest of the submitted set.
pub fn run_snapshot(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    round_id: u64,
    entries: Vec<SnapshotEntry>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_operator(&config, &info)?;

    let mut round = load_round(deps.storage, round_id)?;
    if round.control_status != ControlStatus::Pending {
        return Err(ContractError::PrerequisiteNotMet {
            round_id,
            required: "control",
            attempted: "snapshot",
        });
    }
    if round.snapshot_status == SnapshotStatus::Confirmed {
        return Err(ContractError::StageConflict {
            round_id,
            stage: "snapshot",
            status: "confirmed",
        });
    }
    if entries.is_empty() {
        return Err(ContractError::NoParticipants { round_id });
    }

    // Claim the stage, then replace any prior unconfirmed set.
    let mut snapshot = SnapshotRecord {
        round_id,
        status: SnapshotStatus::Running,
        started_at: env.block.time,
        completed_at: None,
        confirmed_at: None,
        total_participants: 0,
        eligible_participants: 0,
        tier_counts: [0; 4],
        participants_digest: String::new(),
    };
    SNAPSHOTS.save(deps.storage, round_id, &snapshot)?;
    clear_participants(deps.storage, round_id)?;

    let mut seen: BTreeSet<&str> = BTreeSet::new();
    let mut seq_by_tier = [0u32; 4];
    let mut tier_counts = [0u32; 4];
    let mut eligible: u32 = 0;

    for entry in &entries {
        let tier = Tier::from_number(entry.tier).ok_or(ContractError::InvalidTier {
            tier: entry.tier,
        })?;
        let wallet =
            deps.api
                .addr_validate(&entry.wallet)
                .map_err(|_| ContractError::InvalidAddress {
                    address: entry.wallet.clone(),
                })?;
        if !seen.insert(entry.wallet.as_str()) {
            return Err(ContractError::DuplicateWallet {
                wallet: entry.wallet.clone(),
            });
        }

        let idx = (entry.tier - 1) as usize;
        let seq = seq_by_tier[idx];
        seq_by_tier[idx] += 1;

        let is_eligible = !round.blacklist.contains(&wallet);
        let participant = Participant {
            seq,
            wallet,
            token_balance: entry.token_balance,
            tier,
            eligibility_score: entry.eligibility_score,
            eligible: is_eligible,
            is_winner: false,
        };
        if is_eligible {
            eligible += 1;
            tier_counts[idx] += 1;
        }
        PARTICIPANTS.save(deps.storage, (round_id, entry.tier, seq), &participant)?;
    }

    let digest = participant_set_digest(entries.iter().map(|e| {
        (
            e.wallet.as_str(),
            e.token_balance.u128(),
            e.tier,
            e.eligibility_score.u128(),
        )
    }));

    let total = entries.len() as u32;
    snapshot.status = SnapshotStatus::Completed;
    snapshot.completed_at = Some(env.block.time);
    snapshot.total_participants = total;
    snapshot.eligible_participants = eligible;
    snapshot.tier_counts = tier_counts;
    snapshot.participants_digest = hex::encode(digest);
    SNAPSHOTS.save(deps.storage, round_id, &snapshot)?;

    round.snapshot_status = SnapshotStatus::Completed;
    round.total_participants = total;
    round.eligible_participants = eligible;
    ROUNDS.save(deps.storage, round_id, &round)?;

    Ok(Response::new()
        .add_attribute("action", "run_snapshot")
        .add_attribute("round_id", round_id.to_string())
        .add_attribute("total_participants", total.to_string())
        .add_event(
            Event::new("lotto_snapshot_taken")
                .add_attribute("round_id", round_id.to_string())
                .add_attribute("total_participants", total.to_string())
                .add_attribute("eligible_participants", eligible.to_string())
                .add_attribute("t1_count", tier_counts[0].to_string())
                .add_attribute("t2_count", tier_counts[1].to_string())
                .add_attribute("t3_count", tier_counts[2].to_string())
                .add_attribute("t4_count", tier_counts[3].to_string())
                .add_attribute("participants_digest", snapshot.participants_digest.clone()),
        ))
}

/// Freeze the participant set. Operator only.
pub fn confirm_snapshot(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    round_id: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_operator(&config, &info)?;

    let mut round = load_round(deps.storage, round_id)?;
    let mut snapshot = SNAPSHOTS
        .may_load(deps.storage, round_id)?
        .ok_or(ContractError::SnapshotNotFound { round_id })?;

    if snapshot.status != SnapshotStatus::Completed {
        return Err(ContractError::StageConflict {
            round_id,
            stage: "snapshot",
            status: snapshot.status.as_str(),
        });
    }

    snapshot.status = SnapshotStatus::Confirmed;
    snapshot.confirmed_at = Some(env.block.time);
    SNAPSHOTS.save(deps.storage, round_id, &snapshot)?;

    round.snapshot_status = SnapshotStatus::Confirmed;
    ROUNDS.save(deps.storage, round_id, &round)?;

    Ok(Response::new()
        .add_attribute("action", "confirm_snapshot")
        .add_attribute("round_id", round_id.to_string())
        .add_event(
            Event::new("lotto_snapshot_confirmed")
                .add_attribute("round_id", round_id.to_string())
                .add_attribute(
                    "eligible_participants",
                    snapshot.eligible_participants.to_string(),
                )
                .add_attribute("participants_digest", snapshot.participants_digest),
        ))
}

/// Run the drawing for a round. Operator only.
///
/// 1. Require a confirmed snapshot and no existing drawing
/// 2. Fetch verified randomness for the pinned beacon round
/// 3. Per tier, pick one winner uniformly among eligible participants
/// 4. Flag winners and persist the drawing record with its audit
///
/// Any failure aborts the whole message, so a drawing either completes
/// with its audit or leaves no trace.
pub fn run_drawing(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    round_id: u64,
    beacon_round: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_operator(&config, &info)?;

    let mut round = load_round(deps.storage, round_id)?;
    if round.snapshot_status != SnapshotStatus::Confirmed {
        return Err(ContractError::PrerequisiteNotMet {
            round_id,
            required: "snapshot",
            attempted: "drawing",
        });
    }
    if round.drawing_status != DrawingStatus::Unset {
        return Err(ContractError::StageConflict {
            round_id,
            stage: "drawing",
            status: round.drawing_status.as_str(),
        });
    }

    let seed = randomness::fetch_randomness(&deps.querier, &config.randomness_source, beacon_round)?;

    // Claim the stage before selection.
    let mut drawing = DrawingRecord {
        round_id,
        status: DrawingStatus::Running,
        started_at: env.block.time,
        completed_at: None,
        confirmed_at: None,
        winners: TierWinners::default(),
        audit: None,
    };
    DRAWINGS.save(deps.storage, round_id, &drawing)?;

    let mut winners = TierWinners::default();
    for tier in Tier::ALL {
        let mut candidates: Vec<(u32, Participant)> = PARTICIPANTS
            .prefix((round_id, tier.number()))
            .range(deps.storage, None, None, Order::Ascending)
            .collect::<StdResult<Vec<_>>>()?
            .into_iter()
            .filter(|(_, p)| p.eligible)
            .collect();

        if let Some(idx) = randomness::pick_index(&seed, round_id, tier, candidates.len()) {
            let (seq, mut winner) = candidates.swap_remove(idx);
            winner.is_winner = true;
            winners.set(tier, winner.wallet.clone());
            PARTICIPANTS.save(deps.storage, (round_id, tier.number(), seq), &winner)?;
        }
    }

    let audit = DrawAudit {
        seed_hex: hex::encode(seed),
        request_id: format!("vrf_{round_id}_{beacon_round}"),
        beacon_round,
        block_height: env.block.height,
    };

    drawing.status = DrawingStatus::Completed;
    drawing.completed_at = Some(env.block.time);
    drawing.winners = winners.clone();
    drawing.audit = Some(audit.clone());
    DRAWINGS.save(deps.storage, round_id, &drawing)?;

    round.drawing_status = DrawingStatus::Completed;
    ROUNDS.save(deps.storage, round_id, &round)?;

    Ok(Response::new()
        .add_attribute("action", "run_drawing")
        .add_attribute("round_id", round_id.to_string())
        .add_attribute("winners", winners.count().to_string())
        .add_event(
            Event::new("lotto_drawing_result")
                .add_attribute("round_id", round_id.to_string())
                .add_attribute("seed", audit.seed_hex)
                .add_attribute("request_id", audit.request_id)
                .add_attribute("beacon_round", beacon_round.to_string())
                .add_attribute("block_height", env.block.height.to_string())
                .add_attribute("t1_winner", winner_attr(winners.t1.as_ref()))
                .add_attribute("t2_winner", winner_attr(winners.t2.as_ref()))
                .add_attribute("t3_winner", winner_attr(winners.t3.as_ref()))
                .add_attribute("t4_winner", winner_attr(winners.t4.as_ref())),
        ))
}

/// Lock in the drawing result. Operator only. Copies the winners onto the
/// round and opens the harvest stage.
pub fn confirm_drawing(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    round_id: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_operator(&config, &info)?;

    let mut round = load_round(deps.storage, round_id)?;
    // Stage ordering is reported before record existence.
    if round.snapshot_status != SnapshotStatus::Confirmed {
        return Err(ContractError::PrerequisiteNotMet {
            round_id,
            required: "snapshot",
            attempted: "drawing",
        });
    }

    let mut drawing = DRAWINGS
        .may_load(deps.storage, round_id)?
        .ok_or(ContractError::DrawingNotFound { round_id })?;
    if drawing.status != DrawingStatus::Completed {
        return Err(ContractError::StageConflict {
            round_id,
            stage: "drawing",
            status: drawing.status.as_str(),
        });
    }

    drawing.status = DrawingStatus::Confirmed;
    drawing.confirmed_at = Some(env.block.time);
    DRAWINGS.save(deps.storage, round_id, &drawing)?;

    round.drawing_status = DrawingStatus::Confirmed;
    round.tier_winners = drawing.winners.clone();
    round.drawing_time = Some(env.block.time);
    ROUNDS.save(deps.storage, round_id, &round)?;

    Ok(Response::new()
        .add_attribute("action", "confirm_drawing")
        .add_attribute("round_id", round_id.to_string())
        .add_event(
            Event::new("lotto_drawing_confirmed")
                .add_attribute("round_id", round_id.to_string())
                .add_attribute("winners", drawing.winners.count().to_string())
                .add_attribute("t1_winner", winner_attr(drawing.winners.t1.as_ref()))
                .add_attribute("t2_winner", winner_attr(drawing.winners.t2.as_ref()))
                .add_attribute("t3_winner", winner_attr(drawing.winners.t3.as_ref()))
                .add_attribute("t4_winner", winner_attr(drawing.winners.t4.as_ref())),
        ))
}

/// Discard an unconfirmed drawing so it can be re-run with a different
/// beacon round. Operator only. Clears winner flags and removes the
/// drawing record.
pub fn reset_drawing(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    round_id: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_operator(&config, &info)?;

    let mut round = load_round(deps.storage, round_id)?;
    let drawing = DRAWINGS
        .may_load(deps.storage, round_id)?
        .ok_or(ContractError::DrawingNotFound { round_id })?;
    if drawing.status == DrawingStatus::Confirmed {
        return Err(ContractError::StageConflict {
            round_id,
            stage: "drawing",
            status: "confirmed",
        });
    }

    let flagged: Vec<((u8, u32), Participant)> = PARTICIPANTS
        .sub_prefix(round_id)
        .range(deps.storage, None, None, Order::Ascending)
        .collect::<StdResult<Vec<_>>>()?
        .into_iter()
        .filter(|(_, p)| p.is_winner)
        .collect();
    for ((tier, seq), mut participant) in flagged {
        participant.is_winner = false;
        PARTICIPANTS.save(deps.storage, (round_id, tier, seq), &participant)?;
    }

    DRAWINGS.remove(deps.storage, round_id);
    round.drawing_status = DrawingStatus::Unset;
    ROUNDS.save(deps.storage, round_id, &round)?;

    Ok(Response::new()
        .add_attribute("action", "reset_drawing")
        .add_attribute("round_id", round_id.to_string())
        .add_event(
            Event::new("lotto_drawing_reset").add_attribute("round_id", round_id.to_string()),
        ))
}

/// Compute tier payouts from the prize pool. Operator only.
///
/// Only tiers with a confirmed winner qualify; their base weights are
/// renormalized so the whole pool is assigned. Re-running before release
/// recomputes from the current pool, which is how a top-up after an
/// earlier preparation gets folded in.
pub fn prepare_harvest(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    round_id: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_operator(&config, &info)?;

    let mut round = load_round(deps.storage, round_id)?;
    if round.drawing_status != DrawingStatus::Confirmed {
        return Err(ContractError::PrerequisiteNotMet {
            round_id,
            required: "drawing",
            attempted: "harvest",
        });
    }
    match round.harvest_status {
        HarvestStatus::Unset | HarvestStatus::Prepared => {}
        status => {
            return Err(ContractError::StageConflict {
                round_id,
                stage: "harvest",
                status: status.as_str(),
            });
        }
    }

    if round.prize_pool.is_zero() {
        return Err(ContractError::EmptyPool { round_id });
    }
    let qualifying = round.tier_winners.qualifying();
    if qualifying.is_empty() {
        return Err(ContractError::NoWinners { round_id });
    }

    round.harvest_status = HarvestStatus::Preparing;
    ROUNDS.save(deps.storage, round_id, &round)?;

    let payouts = allocate(round.prize_pool, &qualifying);
    let allocated = payouts.total();
    if allocated != round.prize_pool {
        return Err(ContractError::AllocationMismatch {
            pool: round.prize_pool,
            allocated,
        });
    }

    round.tier_payouts = payouts.clone();
    round.harvest_prepared_at = Some(env.block.time);
    round.harvest_status = HarvestStatus::Prepared;
    round.distribution_status = DistributionStatus::Queued;
    ROUNDS.save(deps.storage, round_id, &round)?;

    Ok(Response::new()
        .add_attribute("action", "prepare_harvest")
        .add_attribute("round_id", round_id.to_string())
        .add_attribute("prize_pool", round.prize_pool.to_string())
        .add_event(
            Event::new("lotto_harvest_prepared")
                .add_attribute("round_id", round_id.to_string())
                .add_attribute("prize_pool", round.prize_pool.to_string())
                .add_attribute("prize_pool_fixed", format_fixed6(round.prize_pool))
                .add_attribute("qualifying_tiers", qualifying.len().to_string())
                .add_attribute("t1_payout", format_fixed6(payouts.t1))
                .add_attribute("t2_payout", format_fixed6(payouts.t2))
                .add_attribute("t3_payout", format_fixed6(payouts.t3))
                .add_attribute("t4_payout", format_fixed6(payouts.t4)),
        ))
}

/// Pay every winning tier and close the round. Operator only.
///
/// 1. Require queued distribution and allocations matching the pool
/// 2. Mark the round Releasing, then build one bank send per paid tier
/// 3. Mint release references and update per-wallet win tracking
/// 4. Mark harvest and distribution Released
///
/// The whole message aborts on any failure, so a round can never end up
/// partially paid.
pub fn release(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    round_id: u64,
    swap: Option<SwapRoute>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_operator(&config, &info)?;

    let mut round = load_round(deps.storage, round_id)?;
    match round.distribution_status {
        DistributionStatus::Queued => {}
        DistributionStatus::Unset => {
            return Err(ContractError::PrerequisiteNotMet {
                round_id,
                required: "harvest",
                attempted: "distribution",
            });
        }
        status => {
            return Err(ContractError::StageConflict {
                round_id,
                stage: "distribution",
                status: status.as_str(),
            });
        }
    }

    let total = round.tier_payouts.total();
    if total.is_zero() {
        return Err(ContractError::EmptyPool { round_id });
    }
    // A top-up after preparation leaves stale allocations behind.
    if total != round.prize_pool {
        return Err(ContractError::AllocationMismatch {
            pool: round.prize_pool,
            allocated: total,
        });
    }

    round.distribution_status = DistributionStatus::Releasing;
    ROUNDS.save(deps.storage, round_id, &round)?;

    let mut paid: Vec<(Tier, Addr, Uint128)> = Vec::new();
    for tier in Tier::ALL {
        let amount = round.tier_payouts.get(tier);
        if amount.is_zero() {
            continue;
        }
        if let Some(winner) = round.tier_winners.get(tier) {
            paid.push((tier, winner.clone(), amount));
        }
    }

    let mut msgs: Vec<BankMsg> = Vec::new();
    let mut refs: Vec<String> = Vec::new();
    for (tier, winner, amount) in &paid {
        msgs.push(BankMsg::Send {
            to_address: winner.to_string(),
            amount: coins(amount.u128(), &config.pool_denom),
        });
        refs.push(format!("{}/t{}/{}", round_id, tier.number(), env.block.height));

        WINNER_ROUNDS.save(deps.storage, (winner, round_id), &())?;
        let win_count = WINNER_COUNTS.may_load(deps.storage, winner)?.unwrap_or(0);
        WINNER_COUNTS.save(deps.storage, winner, &(win_count + 1))?;
        let won = WINNER_TOTALS
            .may_load(deps.storage, winner)?
            .unwrap_or(Uint128::zero());
        WINNER_TOTALS.save(deps.storage, winner, &(won + *amount))?;
    }

    round.distribution_status = DistributionStatus::Released;
    round.harvest_status = HarvestStatus::Released;
    round.distribution_time = Some(env.block.time);
    round.release_refs = refs.clone();
    round.swap_route = swap.clone();
    ROUNDS.save(deps.storage, round_id, &round)?;

    let mut state = ENGINE_STATE.load(deps.storage)?;
    state.rounds_released += 1;
    state.total_distributed += total;
    ENGINE_STATE.save(deps.storage, &state)?;

    let mut event = Event::new("lotto_distribution_released")
        .add_attribute("round_id", round_id.to_string())
        .add_attribute("total", total.to_string())
        .add_attribute("total_fixed", format_fixed6(total))
        .add_attribute("transfers", paid.len().to_string())
        .add_attribute("refs", refs.join(","));
    for (tier, winner, amount) in &paid {
        event = event
            .add_attribute(format!("t{}_winner", tier.number()), winner.to_string())
            .add_attribute(format!("t{}_amount", tier.number()), format_fixed6(*amount));
    }
    if let Some(route) = &swap {
        event = event
            .add_attribute("swap_route_id", route.route_id.clone())
            .add_attribute("swap_slippage_bps", route.slippage_bps.to_string());
    }

    Ok(Response::new()
        .add_messages(msgs)
        .add_attribute("action", "release")
        .add_attribute("round_id", round_id.to_string())
        .add_attribute("total", total.to_string())
        .add_event(event))
}

/// Update configuration. Admin only.
pub fn update_config(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    operator: Option<String>,
    randomness_source: Option<String>,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info)?;

    if let Some(op) = operator {
        config.operator = deps.api.addr_validate(&op)?;
    }
    if let Some(source) = randomness_source {
        config.randomness_source = deps.api.addr_validate(&source)?;
    }

    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new().add_attribute("action", "update_config"))
}

/// Update the hard blacklist. Admin only. Existing rounds keep the
/// blacklist they were created with.
pub fn update_blacklist(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    add: Vec<String>,
    remove: Vec<String>,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info)?;

    for addr_str in &remove {
        let addr = deps.api.addr_validate(addr_str)?;
        config.hard_blacklist.retain(|a| *a != addr);
    }
    for addr_str in &add {
        let addr = deps.api.addr_validate(addr_str)?;
        if !config.hard_blacklist.contains(&addr) {
            config.hard_blacklist.push(addr);
        }
    }

    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "update_blacklist")
        .add_attribute("size", config.hard_blacklist.len().to_string()))
}
