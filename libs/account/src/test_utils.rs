//! Deterministic fixtures for tests and benchmarks
//!
//! Keys are derived from a one-byte seed so that a test can name "signer 3"
//! and get the same key every run. Tokens are unsigned; nothing in this
//! crate checks JWT signatures.

use crate::account::KeylessAccountParams;
use crate::address::AccountAddress;
use crate::crypto::ed25519::Ed25519PrivateKey;
use crate::crypto::groth16::{Groth16VerificationKey, g1_to_bytes, g2_to_bytes};
use crate::crypto::keyless::{Groth16Zkp, ZeroKnowledgeSig, ZkProof};
use crate::crypto::secp256k1::Secp256k1PrivateKey;
use crate::keyless::EphemeralKeyPair;
use crate::keyless::ephemeral_key_pair::BLINDER_LENGTH;
use crate::transaction::{EntryFunction, ModuleId, RawTransaction, TransactionPayload};
use ark_bn254::{Fr, G1Affine, G2Affine};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::Field;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

/// 2100-01-01T00:00:00Z
pub const FAR_FUTURE_SECS: u64 = 4_102_444_800;

/// Issuer used by [`keyless_params`]
pub const TEST_ISS: &str = "https://accounts.example.com";

/// Audience used by [`keyless_params`]
pub const TEST_AUD: &str = "movekey-test";

/// Ed25519 key with seed `[seed; 32]`
pub fn ed25519_key(seed: u8) -> Ed25519PrivateKey {
    Ed25519PrivateKey::from_seed(&[seed; 32])
}

/// Secp256k1 key with scalar `[seed; 32]`; `seed` must be in `1..=254`
pub fn secp256k1_key(seed: u8) -> Secp256k1PrivateKey {
    Secp256k1PrivateKey::from_bytes(&[seed; 32]).unwrap()
}

/// A 31-byte pepper
pub fn test_pepper() -> Vec<u8> {
    vec![0x2a; 31]
}

/// Unsigned compact JWT with header `kid` "test-kid"
pub fn test_jwt(iss: &str, aud: &str, sub: &str, nonce: &str, iat: u64) -> String {
    let header = serde_json::json!({"alg": "RS256", "kid": "test-kid", "typ": "JWT"});
    let claims = serde_json::json!({
        "iss": iss,
        "aud": aud,
        "sub": sub,
        "nonce": nonce,
        "iat": iat,
    });
    format!(
        "{}.{}.{}",
        URL_SAFE_NO_PAD.encode(header.to_string()),
        URL_SAFE_NO_PAD.encode(claims.to_string()),
        URL_SAFE_NO_PAD.encode(b"unsigned"),
    )
}

/// Structurally valid proof with a one-hour horizon
pub fn test_proof() -> ZeroKnowledgeSig {
    ZeroKnowledgeSig::new(
        ZkProof::Groth16(Groth16Zkp {
            a: [1; 32],
            b: [2; 64],
            c: [3; 32],
        }),
        3_600,
    )
}

/// Ephemeral key pair with a fixed blinder
pub fn ephemeral_key_pair(seed: u8, expiry_date_secs: u64) -> EphemeralKeyPair {
    EphemeralKeyPair::new(ed25519_key(seed), expiry_date_secs, [seed; BLINDER_LENGTH]).unwrap()
}

/// Keyless parameters for user `sub` whose token commits to the ephemeral key
pub fn keyless_params(sub: &str, seed: u8, expiry_date_secs: u64) -> KeylessAccountParams {
    let ephemeral_key_pair = ephemeral_key_pair(seed, expiry_date_secs);
    let jwt = test_jwt(TEST_ISS, TEST_AUD, sub, ephemeral_key_pair.nonce(), 1_700_000_000);
    KeylessAccountParams::new(jwt, ephemeral_key_pair, test_pepper(), test_proof())
}

/// A verification key and a proof satisfying it for public input `x`.
///
/// Every point is a known multiple of the generator, so the pairing check
/// reduces to `a·b = α·β + (u0 + u1·x)·γ + c·δ` over scalars and `c` is
/// solved from that.
pub fn synthetic_key_and_proof(x: Fr) -> (Groth16VerificationKey, Groth16Zkp) {
    let g1 = G1Affine::generator();
    let g2 = G2Affine::generator();
    let [alpha, beta, gamma, delta, u0, u1, a, b] =
        [3u64, 5, 7, 11, 13, 17, 19, 23].map(Fr::from);
    let c = (a * b - alpha * beta - (u0 + u1 * x) * gamma) * delta.inverse().unwrap();

    let vk = Groth16VerificationKey::new(
        (g1 * alpha).into_affine(),
        (g2 * beta).into_affine(),
        (g2 * gamma).into_affine(),
        (g2 * delta).into_affine(),
        [(g1 * u0).into_affine(), (g1 * u1).into_affine()],
    );
    let proof = Groth16Zkp {
        a: g1_to_bytes(&(g1 * a).into_affine()).unwrap(),
        b: g2_to_bytes(&(g2 * b).into_affine()).unwrap(),
        c: g1_to_bytes(&(g1 * c).into_affine()).unwrap(),
    };
    (vk, proof)
}

/// `0x1::aptos_account::transfer(0x2, 100)` from `sender`
pub fn transfer_transaction(sender: AccountAddress, sequence_number: u64) -> RawTransaction {
    let recipient = AccountAddress::from_str_relaxed("0x2").unwrap();
    let entry_function = EntryFunction::new(
        ModuleId::new(AccountAddress::ONE, "aptos_account").unwrap(),
        "transfer",
        vec![],
        vec![
            movekey_bcs::to_bytes(&recipient),
            movekey_bcs::to_bytes(&100u64),
        ],
    )
    .unwrap();
    RawTransaction {
        sender,
        sequence_number,
        payload: TransactionPayload::EntryFunction(entry_function),
        max_gas_amount: 200_000,
        gas_unit_price: 100,
        expiration_timestamp_secs: FAR_FUTURE_SECS,
        chain_id: 4,
    }
}
