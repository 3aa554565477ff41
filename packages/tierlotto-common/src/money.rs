use cosmwasm_std::{StdError, StdResult, Uint128};

/// Micro-units per whole token. All pool and payout amounts are fixed-point
/// integers with exactly six fractional digits.
pub const MICRO_SCALE: u128 = 1_000_000;

/// Parse a decimal string with at most six fractional digits into
/// micro-units. `"89.215"` parses to `89_215_000`. The round-trip through
/// [`format_fixed6`] is lossless.
pub fn parse_fixed6(input: &str) -> StdResult<Uint128> {
    let s = input.trim();
    if s.is_empty() {
        return Err(StdError::generic_err("empty amount"));
    }

    let (whole, frac) = match s.split_once('.') {
        Some((w, f)) => (w, f),
        None => (s, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return Err(StdError::generic_err(format!("invalid amount: {s}")));
    }
    if frac.len() > 6 {
        return Err(StdError::generic_err(format!(
            "amount {s} has more than 6 fractional digits"
        )));
    }

    let whole_units: u128 = if whole.is_empty() {
        0
    } else {
        whole
            .parse()
            .map_err(|_| StdError::generic_err(format!("invalid amount: {s}")))?
    };
    let frac_units: u128 = if frac.is_empty() {
        0
    } else {
        let padded = format!("{frac:0<6}");
        padded
            .parse()
            .map_err(|_| StdError::generic_err(format!("invalid amount: {s}")))?
    };

    whole_units
        .checked_mul(MICRO_SCALE)
        .and_then(|w| w.checked_add(frac_units))
        .map(Uint128::new)
        .ok_or_else(|| StdError::generic_err(format!("amount {s} overflows")))
}

/// Format micro-units as a decimal string with exactly six fractional
/// digits. `89_215_000` formats to `"89.215000"`.
pub fn format_fixed6(amount: Uint128) -> String {
    let v = amount.u128();
    format!("{}.{:06}", v / MICRO_SCALE, v % MICRO_SCALE)
}
