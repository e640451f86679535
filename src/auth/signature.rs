// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet signature verification.
//!
//! Proves control of an EVM wallet address: the client signs the login
//! phrase with `personal_sign` (EIP-191), and the server recovers the signer
//! of `keccak256("\x19Ethereum Signed Message:\n" + len + message)` from the
//! 65-byte `r || s || v` signature, or from its 64-byte EIP-2098 compact
//! form `r || yParityAndS`. No chain access or key material is involved;
//! verification is a pure, local computation.

use alloy::{
    hex,
    primitives::{Address, Signature},
};
use thiserror::Error;

/// Length of a raw `r || s || v` secp256k1 signature.
pub const SIGNATURE_LEN: usize = 65;

/// Length of an EIP-2098 compact signature.
pub const COMPACT_SIGNATURE_LEN: usize = 64;

/// Reasons signer recovery can fail.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureRecoveryError {
    #[error("signature is not valid hex")]
    InvalidHex,
    #[error("signature must be {SIGNATURE_LEN} or {COMPACT_SIGNATURE_LEN} bytes, got {0}")]
    InvalidLength(usize),
    #[error("malformed signature: {0}")]
    Malformed(String),
    #[error("signer recovery failed: {0}")]
    Recovery(String),
}

/// Decide whether `signature` proves control of `wallet_address`.
///
/// Implementations must be pure: identical inputs give identical results,
/// and any internal failure yields `false` rather than an error.
pub trait SignatureVerifier: Send + Sync {
    fn verify(&self, wallet_address: &str, signature: &str, expected_message: &str) -> bool;
}

/// EIP-191 `personal_sign` verifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct Eip191Verifier;

impl SignatureVerifier for Eip191Verifier {
    fn verify(&self, wallet_address: &str, signature: &str, expected_message: &str) -> bool {
        verify_wallet_signature(wallet_address, signature, expected_message)
    }
}

/// Decode a hex signature (with or without `0x`) into an alloy [`Signature`].
///
/// Accepts both the 65-byte and the 64-byte compact encoding.
pub fn parse_signature(signature: &str) -> Result<Signature, SignatureRecoveryError> {
    let trimmed = signature.trim();
    let raw = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    let bytes = hex::decode(raw).map_err(|_| SignatureRecoveryError::InvalidHex)?;

    match bytes.len() {
        SIGNATURE_LEN => {
            Signature::from_raw(&bytes).map_err(|e| SignatureRecoveryError::Malformed(e.to_string()))
        }
        COMPACT_SIGNATURE_LEN => Ok(Signature::from_erc2098(&bytes)),
        len => Err(SignatureRecoveryError::InvalidLength(len)),
    }
}

/// Recover the address that signed `message` under EIP-191.
pub fn recover_signer(signature: &str, message: &str) -> Result<Address, SignatureRecoveryError> {
    let signature = parse_signature(signature)?;
    signature
        .recover_address_from_msg(message.as_bytes())
        .map_err(|e| SignatureRecoveryError::Recovery(e.to_string()))
}

/// Verify that `signature` over `expected_message` was produced by `wallet_address`.
///
/// Returns `true` only if recovery succeeds and the recovered address equals
/// `wallet_address` ignoring ASCII case. Every failure is logged and mapped
/// to `false`.
pub fn verify_wallet_signature(
    wallet_address: &str,
    signature: &str,
    expected_message: &str,
) -> bool {
    match recover_signer(signature, expected_message) {
        Ok(recovered) => {
            let recovered = recovered.to_string();
            let matches = recovered.eq_ignore_ascii_case(wallet_address.trim());
            if !matches {
                tracing::debug!(
                    claimed = %wallet_address,
                    recovered = %recovered,
                    "Recovered signer does not match claimed wallet address"
                );
            }
            matches
        }
        Err(e) => {
            tracing::debug!(error = %e, "Wallet signature verification failed");
            false
        }
    }
}
