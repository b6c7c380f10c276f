//! The showing protocol: re-randomize a credential's signature and prove
//! knowledge of its hidden attributes without revealing them (§4.3).

use super::attribute::AttributeMap;
use super::error::Error;
use super::group::{mul_g1, pairing, random_nonzero_scalar, random_scalar, Gt, Scalar, G1};
use super::issuance::{Credential, NIProof};
use super::keys::PublicKey;
use super::transcript::Transcript;
use ark_ff::{Field, PrimeField, Zero};
use rand_core::{CryptoRng, RngCore};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// A re-randomized signature together with a proof of knowledge of the
/// attributes the holder chose to keep hidden.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DisclosureProof {
    #[cfg_attr(feature = "serde", serde(with = "super::serde_support::canonical"))]
    sigma1: G1,
    #[cfg_attr(feature = "serde", serde(with = "super::serde_support::canonical"))]
    sigma2: G1,
    proof: NIProof,
}

impl DisclosureProof {
    pub fn is_valid_shape(&self) -> bool {
        !self.sigma1.is_zero()
    }
}

fn neg_pow(base: Gt, exponent: Scalar) -> Gt {
    base.pow((-exponent).into_repr())
}

/// Com, the side of the showing equation computable from disclosed data
/// alone (§4.3 step 2): `e(σ̄2,ĝ) / e(σ̄1,X̂) · Π_{i∈D} e(σ̄1,Ŷ_i)^{−a_i}`.
///
/// Returns `None` only if `e(σ̄1, X̂)` is the GT identity, which cannot
/// happen for a `σ̄1` that passed [`DisclosureProof::is_valid_shape`] and a
/// well-formed key.
fn compute_com(pk: &PublicKey, sigma1: G1, sigma2: G1, disclosed: &AttributeMap) -> Option<Gt> {
    let denom = pairing(sigma1, pk.x_hat());
    let mut com = pairing(sigma2, pk.g_hat()) * denom.inverse()?;
    for (&index, &value) in disclosed {
        com *= neg_pow(pairing(sigma1, pk.y_hat()[index - 1]), value);
    }
    Some(com)
}

fn challenge_transcript(pk: &PublicKey, com: &Gt, r: &Gt, message: &[u8]) -> Transcript {
    let mut t = Transcript::new();
    pk.transcript_prefix(t.buf_mut());
    t.append(com).append(r).append_bytes(message);
    t
}

/// Checks that `disclosed`'s keys and `hidden`'s indices partition
/// `1..=expected_len` with no overlap and no gap.
fn indices_partition_attribute_set(
    disclosed: &AttributeMap,
    hidden: impl Iterator<Item = usize>,
    expected_len: usize,
) -> bool {
    let mut seen = BTreeSet::new();
    for &index in disclosed.keys() {
        if !seen.insert(index) {
            return false;
        }
    }
    for index in hidden {
        if !seen.insert(index) {
            return false;
        }
    }
    seen.len() == expected_len && seen.into_iter().eq(1..=expected_len)
}

/// CreateDisclosureProof: re-randomize `credential`'s signature and prove
/// knowledge of the attributes named by `hidden_indices`, binding the proof
/// to `message` (§4.3).
pub fn create_disclosure_proof<R: RngCore + CryptoRng>(
    pk: &PublicKey,
    credential: &Credential,
    hidden_indices: &[usize],
    message: &[u8],
    rng: &mut R,
) -> Result<DisclosureProof, Error> {
    let hidden_set: BTreeSet<usize> = hidden_indices.iter().copied().collect();
    if hidden_set.len() != hidden_indices.len() {
        return Err(Error::ContractViolation(
            "duplicate hidden attribute index".into(),
        ));
    }
    for &index in &hidden_set {
        if !credential.attributes().contains_key(&index) {
            return Err(Error::ContractViolation(format!(
                "attribute index {index} is not part of this credential"
            )));
        }
    }

    debug!(num_hidden = hidden_set.len(), "creating disclosure proof");

    let disclosed: AttributeMap = credential
        .attributes()
        .iter()
        .filter(|(index, _)| !hidden_set.contains(index))
        .map(|(&index, &value)| (index, value))
        .collect();

    let r = random_nonzero_scalar(rng);
    let t = random_scalar(rng);
    let sigma1 = mul_g1(credential.signature.sigma1, r);
    let sigma2 = mul_g1(
        credential.signature.sigma2 + mul_g1(credential.signature.sigma1, t),
        r,
    );

    let com = compute_com(pk, sigma1, sigma2, &disclosed)
        .ok_or_else(|| Error::CryptoFailure("pairing denominator was the GT identity".into()))?;

    let t_r = random_scalar(rng);
    let hidden_randomness: Vec<(usize, Scalar)> = hidden_set
        .iter()
        .map(|&index| (index, random_scalar(rng)))
        .collect();

    let mut r_value = pairing(sigma1, pk.g_hat()).pow(t_r.into_repr());
    for &(index, r_i) in &hidden_randomness {
        r_value *= pairing(sigma1, pk.y_hat()[index - 1]).pow(r_i.into_repr());
    }

    let challenge = challenge_transcript(pk, &com, &r_value, message).challenge();
    let response_0 = t_r - challenge * t;
    let responses = hidden_randomness
        .into_iter()
        .map(|(index, r_i)| {
            let a_i = credential.attributes()[&index];
            (index, r_i - challenge * a_i)
        })
        .collect();

    Ok(DisclosureProof {
        sigma1,
        sigma2,
        proof: NIProof {
            challenge,
            response_0,
            responses,
        },
    })
}

/// VerifyDisclosureProof: fail-closed check that `dp` proves knowledge of a
/// valid signature over `disclosed_attrs` plus the attributes `dp` keeps
/// hidden, bound to `message` (§4.3).
pub fn verify_disclosure_proof(
    pk: &PublicKey,
    dp: &DisclosureProof,
    disclosed_attrs: &AttributeMap,
    message: &[u8],
) -> bool {
    if !dp.is_valid_shape() {
        warn!("disclosure proof rejected: sigma1 is identity");
        return false;
    }

    let hidden_indices: Vec<usize> = dp.proof.responses.iter().map(|&(index, _)| index).collect();
    if !indices_partition_attribute_set(
        disclosed_attrs,
        hidden_indices.into_iter(),
        pk.num_attributes(),
    ) {
        warn!("disclosure proof rejected: disclosed/hidden indices do not partition the attribute set");
        return false;
    }

    let com = match compute_com(pk, dp.sigma1, dp.sigma2, disclosed_attrs) {
        Some(com) => com,
        None => {
            warn!("disclosure proof rejected: pairing denominator was the GT identity");
            return false;
        }
    };

    let mut r_prime = com.pow(dp.proof.challenge.into_repr());
    r_prime *= pairing(dp.sigma1, pk.g_hat()).pow(dp.proof.response_0.into_repr());
    for &(index, response) in &dp.proof.responses {
        r_prime *= pairing(dp.sigma1, pk.y_hat()[index - 1]).pow(response.into_repr());
    }

    let expected = challenge_transcript(pk, &com, &r_prime, message).challenge();
    let ok = expected == dp.proof.challenge;
    if !ok {
        warn!("disclosure proof rejected: challenge did not recompute");
    }
    ok
}
