//! Bulletproof range proofs for `value >= min`.
//!
//! The prover commits to `diff = value - min` and proves `diff` lies in
//! `[0, 2^n)`. The public `range` recorded next to the proof is
//! `2^exponent` where `exponent` is the bit length of `diff + 1` rounded up
//! to the next power of two.
//!
//! Bulletproofs only accept bit-widths of 8, 16, 32 and 64. For ranges of
//! 2^8 and up the proof over `exponent` bits is exact. Smaller ranges
//! (2, 4, 16) are proven as an aggregated pair `[diff, range - 1 - diff]`
//! at 8 bits with blindings `[r, -r]`: both halves being non-negative pins
//! `diff` inside `[0, range)`. Only the first commitment is published; the
//! verifier derives the second as `(range - 1)·B - C`.

use std::panic::{self, AssertUnwindSafe};

use bulletproofs::{BulletproofGens, PedersenGens, RangeProof as Bulletproof};
use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use curve25519_dalek::scalar::Scalar;
use merlin::Transcript;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

use crate::error::ProofError;

/// Discriminator of a range proof inside a credential's proof list.
pub const RANGE_PROOF_TYPE: &str = "BulletproofRangeProof";

const TRANSCRIPT_LABEL: &[u8] = b"sovra.range-proof.v1";
const MIN_BIT_WIDTH: u32 = 8;
const MAX_BIT_WIDTH: u32 = 64;

/// Public sizing of a range proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeParameters {
    /// Power-of-two exponent, `range == 2^exponent`.
    pub exponent: u32,
    /// Exclusive upper bound of the proven interval for `value - min`.
    pub range: u128,
}

impl RangeParameters {
    /// Size the proof for a difference `value - min`.
    pub fn for_difference(diff: u64) -> Self {
        let size = u128::from(diff) + 1;
        let bits = ceil_log2(size);
        // 0.next_power_of_two() == 1, so a zero difference still gets range 2.
        let exponent = bits.next_power_of_two();
        Self {
            exponent,
            range: 1u128 << exponent,
        }
    }

    /// Recover parameters from a published range, rejecting anything the
    /// prover could not have produced.
    pub fn from_range(range: u128) -> Result<Self, ProofError> {
        if !range.is_power_of_two() {
            return Err(ProofError::InvalidParameters(format!(
                "range {} is not a power of two",
                range
            )));
        }
        let exponent = range.trailing_zeros();
        if exponent == 0 || !exponent.is_power_of_two() || exponent > MAX_BIT_WIDTH {
            return Err(ProofError::InvalidParameters(format!(
                "range 2^{} has an unsupported bit-width",
                exponent
            )));
        }
        Ok(Self { exponent, range })
    }

    /// Bit-width handed to the Bulletproof prover and verifier.
    pub fn bit_width(&self) -> usize {
        self.exponent.max(MIN_BIT_WIDTH) as usize
    }

    /// Whether the range is narrower than the smallest Bulletproof width and
    /// needs the complement value `range - 1 - diff` proven alongside `diff`.
    pub fn needs_complement(&self) -> bool {
        self.exponent < MIN_BIT_WIDTH
    }

    /// `range - 1`, only meaningful when `needs_complement` holds.
    fn upper(&self) -> u64 {
        // exponent < 8 here, so the value fits
        (self.range - 1) as u64
    }
}

/// Size the proof for `value - min`.
pub fn range_parameters(diff: u64) -> RangeParameters {
    RangeParameters::for_difference(diff)
}

fn ceil_log2(size: u128) -> u32 {
    if size <= 1 {
        0
    } else {
        u128::BITS - (size - 1).leading_zeros()
    }
}

/// Opaque proof material: the Pedersen commitment to `value - min` and the
/// serialized Bulletproof, both hex-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeProofPayload {
    pub commitment: String,
    pub bytes: String,
}

/// A range proof that a hidden value is at least `min`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeProof {
    #[serde(rename = "type")]
    pub proof_type: String,
    /// Public minimum threshold.
    pub min: u64,
    /// Public range size, a power of two.
    #[serde(with = "range_serde")]
    pub range: u128,
    pub proof: RangeProofPayload,
}

/// Prove that `value >= min` without revealing `value`.
pub fn generate_range_proof(value: u64, min: u64) -> Result<RangeProof, ProofError> {
    if value < min {
        return Err(ProofError::BelowMinimum { value, min });
    }

    let diff = value - min;
    let params = RangeParameters::for_difference(diff);
    let bits = params.bit_width();

    let pc_gens = PedersenGens::default();
    let blinding = Scalar::random(&mut OsRng);
    let mut transcript = proof_transcript(min, params.range);

    let (proof, commitment) = if params.needs_complement() {
        let bp_gens = BulletproofGens::new(bits, 2);
        let complement = params.upper() - diff;
        let (proof, commitments) = Bulletproof::prove_multiple(
            &bp_gens,
            &pc_gens,
            &mut transcript,
            &[diff, complement],
            &[blinding, -blinding],
            bits,
        )
        .map_err(|e| ProofError::GenerationFailed(e.to_string()))?;
        let commitment = commitments.first().copied().ok_or_else(|| {
            ProofError::GenerationFailed("prover returned no commitment".to_string())
        })?;
        (proof, commitment)
    } else {
        let bp_gens = BulletproofGens::new(bits, 1);
        Bulletproof::prove_single(&bp_gens, &pc_gens, &mut transcript, diff, &blinding, bits)
            .map_err(|e| ProofError::GenerationFailed(e.to_string()))?
    };

    tracing::debug!(min, range = %params.range, bits, "range proof generated");

    Ok(RangeProof {
        proof_type: RANGE_PROOF_TYPE.to_string(),
        min,
        range: params.range,
        proof: RangeProofPayload {
            commitment: hex::encode(commitment.as_bytes()),
            bytes: hex::encode(proof.to_bytes()),
        },
    })
}

/// Verify a range proof.
///
/// Panics raised while decoding or checking the proof are caught and
/// reported as `VerificationFailed`.
pub fn verify_range_proof(proof: &RangeProof) -> Result<(), ProofError> {
    match panic::catch_unwind(AssertUnwindSafe(|| verify_unguarded(proof))) {
        Ok(result) => result,
        Err(payload) => {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            tracing::warn!(reason = %reason, "range proof verification panicked");
            Err(ProofError::VerificationFailed(format!(
                "panic during verification: {}",
                reason
            )))
        }
    }
}

fn verify_unguarded(proof: &RangeProof) -> Result<(), ProofError> {
    if proof.proof_type != RANGE_PROOF_TYPE {
        return Err(ProofError::InvalidProofData(format!(
            "unexpected proof type '{}'",
            proof.proof_type
        )));
    }
    let params = RangeParameters::from_range(proof.range)?;
    let bits = params.bit_width();

    let commitment_bytes = hex::decode(&proof.proof.commitment)
        .map_err(|e| ProofError::InvalidProofData(format!("commitment hex: {}", e)))?;
    let commitment = CompressedRistretto::from_slice(&commitment_bytes).map_err(|_| {
        ProofError::InvalidProofData(format!(
            "commitment must be 32 bytes, got {}",
            commitment_bytes.len()
        ))
    })?;
    let proof_bytes = hex::decode(&proof.proof.bytes)
        .map_err(|e| ProofError::InvalidProofData(format!("proof hex: {}", e)))?;
    let bulletproof = Bulletproof::from_bytes(&proof_bytes)
        .map_err(|e| ProofError::InvalidProofData(e.to_string()))?;

    let pc_gens = PedersenGens::default();
    let mut transcript = proof_transcript(proof.min, params.range);

    if params.needs_complement() {
        let point = commitment.decompress().ok_or_else(|| {
            ProofError::InvalidProofData("commitment is not a valid point".to_string())
        })?;
        let complement = complement_commitment(&pc_gens, params.upper(), &point);
        let bp_gens = BulletproofGens::new(bits, 2);
        bulletproof
            .verify_multiple(
                &bp_gens,
                &pc_gens,
                &mut transcript,
                &[commitment, complement],
                bits,
            )
            .map_err(|e| ProofError::VerificationFailed(e.to_string()))
    } else {
        let bp_gens = BulletproofGens::new(bits, 1);
        bulletproof
            .verify_single(&bp_gens, &pc_gens, &mut transcript, &commitment, bits)
            .map_err(|e| ProofError::VerificationFailed(e.to_string()))
    }
}

/// Commitment to `upper - diff` under blinding `-r`, given `C = diff·B + r·B_blinding`.
fn complement_commitment(
    pc_gens: &PedersenGens,
    upper: u64,
    commitment: &RistrettoPoint,
) -> CompressedRistretto {
    (pc_gens.B * Scalar::from(upper) - commitment).compress()
}

/// Fiat-Shamir transcript bound to the public parameters.
fn proof_transcript(min: u64, range: u128) -> Transcript {
    let mut transcript = Transcript::new(TRANSCRIPT_LABEL);
    transcript.append_u64(b"min", min);
    transcript.append_message(b"range", &range.to_le_bytes());
    transcript
}

/// `range` is written as a JSON number when it fits in 64 bits and as a
/// decimal string otherwise (only `2^64`).
mod range_serde {
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(range: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        match u64::try_from(*range) {
            Ok(small) => serializer.serialize_u64(small),
            Err(_) => serializer.serialize_str(&range.to_string()),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        struct RangeVisitor;

        impl<'de> Visitor<'de> for RangeVisitor {
            type Value = u128;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "an unsigned integer or a decimal string")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<u128, E> {
                Ok(u128::from(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<u128, E> {
                u128::try_from(v).map_err(|_| E::custom("range must not be negative"))
            }

            fn visit_u128<E: de::Error>(self, v: u128) -> Result<u128, E> {
                Ok(v)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<u128, E> {
                v.parse::<u128>().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(RangeVisitor)
    }
}
