//! Groth16 verification for keyless proofs
//!
//! Points use arkworks compressed encoding: 32 bytes for G1 and 64 for G2.
//! The circuit has a single public input, the public-inputs hash `x`, and a
//! proof `(A, B, C)` is accepted when
//!
//! ```text
//! e(A, B) = e(α, β) · e(γ_abc[0] + x·γ_abc[1], γ) · e(C, δ)
//! ```

use super::keyless::Groth16Zkp;
use super::{CryptoError, Result, decode_hex, sha3_256};
use ark_bn254::{Bn254, Fr, G1Affine, G2Affine};
use ark_ec::pairing::Pairing;
use ark_ec::{AffineRepr, CurveGroup};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use serde::{Deserialize, Serialize};

/// Compressed G1 size
pub const G1_LENGTH: usize = 32;
/// Compressed G2 size
pub const G2_LENGTH: usize = 64;

/// Decode a compressed G1 point, checking it is on the curve and in the subgroup
pub fn g1_from_bytes(bytes: &[u8]) -> Result<G1Affine> {
    if bytes.len() != G1_LENGTH {
        return Err(CryptoError::Groth16(format!(
            "G1 point must be {G1_LENGTH} bytes, got {}",
            bytes.len()
        )));
    }
    G1Affine::deserialize_compressed(bytes).map_err(|e| CryptoError::Groth16(e.to_string()))
}

/// Decode a compressed G2 point, checking it is on the curve and in the subgroup
pub fn g2_from_bytes(bytes: &[u8]) -> Result<G2Affine> {
    if bytes.len() != G2_LENGTH {
        return Err(CryptoError::Groth16(format!(
            "G2 point must be {G2_LENGTH} bytes, got {}",
            bytes.len()
        )));
    }
    G2Affine::deserialize_compressed(bytes).map_err(|e| CryptoError::Groth16(e.to_string()))
}

fn compress<P: CanonicalSerialize>(point: &P) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(G2_LENGTH);
    point
        .serialize_compressed(&mut out)
        .map_err(|e| CryptoError::Groth16(e.to_string()))?;
    Ok(out)
}

/// Compressed G1 bytes
pub fn g1_to_bytes(point: &G1Affine) -> Result<[u8; G1_LENGTH]> {
    let bytes = compress(point)?;
    let mut out = [0u8; G1_LENGTH];
    out.copy_from_slice(&bytes);
    Ok(out)
}

/// Compressed G2 bytes
pub fn g2_to_bytes(point: &G2Affine) -> Result<[u8; G2_LENGTH]> {
    let bytes = compress(point)?;
    let mut out = [0u8; G2_LENGTH];
    out.copy_from_slice(&bytes);
    Ok(out)
}

/// Verification key for the keyless relation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Groth16VerificationKey {
    alpha_g1: G1Affine,
    beta_g2: G2Affine,
    gamma_g2: G2Affine,
    delta_g2: G2Affine,
    gamma_abc_g1: [G1Affine; 2],
}

/// `0x1::keyless_account::Groth16VerificationKey` as returned by a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnChainGroth16VerificationKey {
    /// Move type tag of the resource
    #[serde(rename = "type", default)]
    pub resource_type: String,
    /// Hex-encoded compressed points
    pub data: VerificationKeyData,
}

/// Hex-encoded fields of the on-chain key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationKeyData {
    /// α in G1
    pub alpha_g1: String,
    /// β in G2
    pub beta_g2: String,
    /// δ in G2
    pub delta_g2: String,
    /// γ_abc in G1, exactly two entries
    pub gamma_abc_g1: Vec<String>,
    /// γ in G2
    pub gamma_g2: String,
}

impl Groth16VerificationKey {
    /// Build from curve points
    pub fn new(
        alpha_g1: G1Affine,
        beta_g2: G2Affine,
        gamma_g2: G2Affine,
        delta_g2: G2Affine,
        gamma_abc_g1: [G1Affine; 2],
    ) -> Self {
        Self {
            alpha_g1,
            beta_g2,
            gamma_g2,
            delta_g2,
            gamma_abc_g1,
        }
    }

    /// Decode the hex fields of an on-chain resource
    pub fn from_on_chain(resource: &OnChainGroth16VerificationKey) -> Result<Self> {
        let data = &resource.data;
        let [abc0, abc1] = data.gamma_abc_g1.as_slice() else {
            return Err(CryptoError::Groth16(format!(
                "gamma_abc_g1 must have 2 entries, got {}",
                data.gamma_abc_g1.len()
            )));
        };
        Ok(Self {
            alpha_g1: g1_from_bytes(&decode_hex(&data.alpha_g1)?)?,
            beta_g2: g2_from_bytes(&decode_hex(&data.beta_g2)?)?,
            gamma_g2: g2_from_bytes(&decode_hex(&data.gamma_g2)?)?,
            delta_g2: g2_from_bytes(&decode_hex(&data.delta_g2)?)?,
            gamma_abc_g1: [
                g1_from_bytes(&decode_hex(abc0)?)?,
                g1_from_bytes(&decode_hex(abc1)?)?,
            ],
        })
    }

    /// Parse the JSON body of the on-chain resource
    pub fn from_json(json: &str) -> Result<Self> {
        let resource: OnChainGroth16VerificationKey =
            serde_json::from_str(json).map_err(|e| CryptoError::Groth16(e.to_string()))?;
        Self::from_on_chain(&resource)
    }

    /// Hex form matching the on-chain resource
    pub fn to_on_chain(&self) -> Result<OnChainGroth16VerificationKey> {
        let hex0x = |bytes: &[u8]| format!("0x{}", hex::encode(bytes));
        Ok(OnChainGroth16VerificationKey {
            resource_type: "0x1::keyless_account::Groth16VerificationKey".to_string(),
            data: VerificationKeyData {
                alpha_g1: hex0x(&g1_to_bytes(&self.alpha_g1)?),
                beta_g2: hex0x(&g2_to_bytes(&self.beta_g2)?),
                delta_g2: hex0x(&g2_to_bytes(&self.delta_g2)?),
                gamma_abc_g1: vec![
                    hex0x(&g1_to_bytes(&self.gamma_abc_g1[0])?),
                    hex0x(&g1_to_bytes(&self.gamma_abc_g1[1])?),
                ],
                gamma_g2: hex0x(&g2_to_bytes(&self.gamma_g2)?),
            },
        })
    }

    /// SHA3-256 over α ‖ β ‖ δ ‖ γ_abc[0] ‖ γ_abc[1] ‖ γ, each compressed
    pub fn hash(&self) -> Result<[u8; 32]> {
        let mut preimage = Vec::with_capacity(3 * G1_LENGTH + 3 * G2_LENGTH);
        preimage.extend_from_slice(&g1_to_bytes(&self.alpha_g1)?);
        preimage.extend_from_slice(&g2_to_bytes(&self.beta_g2)?);
        preimage.extend_from_slice(&g2_to_bytes(&self.delta_g2)?);
        preimage.extend_from_slice(&g1_to_bytes(&self.gamma_abc_g1[0])?);
        preimage.extend_from_slice(&g1_to_bytes(&self.gamma_abc_g1[1])?);
        preimage.extend_from_slice(&g2_to_bytes(&self.gamma_g2)?);
        Ok(sha3_256(&preimage))
    }

    /// Check `proof` against the public-inputs hash
    pub fn verify_proof(&self, proof: &Groth16Zkp, public_inputs_hash: &Fr) -> Result<()> {
        let a = g1_from_bytes(&proof.a)?;
        let b = g2_from_bytes(&proof.b)?;
        let c = g1_from_bytes(&proof.c)?;

        let vk_x = (self.gamma_abc_g1[0].into_group() + self.gamma_abc_g1[1] * *public_inputs_hash)
            .into_affine();

        let lhs = Bn254::pairing(a, b);
        let rhs = Bn254::multi_pairing(
            [self.alpha_g1, vk_x, c],
            [self.beta_g2, self.gamma_g2, self.delta_g2],
        );
        if lhs == rhs {
            Ok(())
        } else {
            Err(CryptoError::Groth16("pairing check failed".to_string()))
        }
    }
}
