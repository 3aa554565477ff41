use drand_verify::Pubkey;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// drand quicknet public key (G2, 96 bytes), hex encoded.
/// Scheme: bls-unchained-g1-rfc9380
pub const QUICKNET_PK_HEX: &str = "83cf0f2896adee7eb8b5f01fcad3912212c437e0073e911fb90022d3e760183c8c4b450b6a0a6c3ac6a5776a2d1064510d1fec758c921cc22b0e17e63aaf4bcb5ed66304de9cf809bd274ca73bab4af5a6e9c76a4bc09e76eae8991ef5ece45a";

/// drand quicknet chain hash.
pub const QUICKNET_CHAIN_HASH: &str =
    "52db9ba70e0cc0f6eaf7803dd07447a1f5477735fd3f661792ba94600c84e971";

/// drand quicknet genesis time (unix seconds).
pub const QUICKNET_GENESIS_TIME: u64 = 1692803367;

/// drand quicknet round period in seconds.
pub const QUICKNET_PERIOD_SECONDS: u64 = 3;

#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("invalid pubkey length (expected 96 bytes)")]
    InvalidPubkeyLength,

    #[error("invalid pubkey (failed to parse G2 point)")]
    InvalidPubkey,

    #[error("verification failed: {0}")]
    VerificationFailed(String),

    #[error("invalid BLS signature")]
    InvalidSignature,
}

/// Verify an unchained beacon signature and derive its randomness.
///
/// Returns 32-byte randomness = sha256(signature) on success. Uses the
/// drand-verify pure-Rust BLS12-381 implementation; quicknet's scheme is
/// bls-unchained-g1-rfc9380, so the message is the round number alone and
/// the previous signature is empty.
pub fn verify_beacon(
    pubkey_bytes: &[u8],
    round: u64,
    signature: &[u8],
) -> Result<[u8; 32], VerifyError> {
    let pk_fixed: [u8; 96] = pubkey_bytes
        .try_into()
        .map_err(|_| VerifyError::InvalidPubkeyLength)?;

    // The Pubkey trait must be in scope to call from_fixed()
    let pk = drand_verify::G2PubkeyRfc::from_fixed(pk_fixed)
        .map_err(|_| VerifyError::InvalidPubkey)?;

    let is_valid = pk
        .verify(round, &[], signature)
        .map_err(|e| VerifyError::VerificationFailed(format!("{:?}", e)))?;

    if !is_valid {
        return Err(VerifyError::InvalidSignature);
    }

    let randomness: [u8; 32] = Sha256::digest(signature).into();
    Ok(randomness)
}

/// Beacon round expected at a unix timestamp. Round 1 is published at
/// genesis, then one round per period. Returns 0 before genesis.
pub fn expected_round(genesis_time: u64, period_seconds: u64, at: u64) -> u64 {
    if at < genesis_time || period_seconds == 0 {
        return 0;
    }
    (at - genesis_time) / period_seconds + 1
}
