use sha2::{Digest, Sha256};

/// Derive the winning candidate index for one tier from published beacon
/// randomness.
///
/// `sha256(randomness || round_id_be || tier)` is reduced to a u128 from
/// its first 16 bytes and taken modulo the candidate count. Anyone holding
/// the published seed can recompute the selection for any tier. Returns
/// `None` when the tier has no candidates.
pub fn derive_winner_index(
    randomness: &[u8; 32],
    round_id: u64,
    tier: u8,
    candidate_count: u64,
) -> Option<u64> {
    if candidate_count == 0 {
        return None;
    }
    let mut hasher = Sha256::new();
    hasher.update(randomness);
    hasher.update(round_id.to_be_bytes());
    hasher.update([tier]);
    let digest: [u8; 32] = hasher.finalize().into();

    let mut ticket_bytes = [0u8; 16];
    ticket_bytes.copy_from_slice(&digest[0..16]);
    let ticket = u128::from_be_bytes(ticket_bytes);
    Some((ticket % candidate_count as u128) as u64)
}

/// Digest of a participant set in submission order, stored on the snapshot
/// record so the frozen set can be checked against later exports.
///
/// Each entry hashes as `0x00 || wallet || balance_be || tier || score_be`,
/// chained into a single sha256 with the entry count appended.
pub fn participant_set_digest<'a, I>(entries: I) -> [u8; 32]
where
    I: IntoIterator<Item = (&'a str, u128, u8, u128)>,
{
    let mut hasher = Sha256::new();
    let mut count: u32 = 0;
    for (wallet, balance, tier, score) in entries {
        hasher.update([0x00]);
        hasher.update(wallet.as_bytes());
        hasher.update(balance.to_be_bytes());
        hasher.update([tier]);
        hasher.update(score.to_be_bytes());
        count += 1;
    }
    hasher.update(count.to_be_bytes());
    hasher.finalize().into()
}
