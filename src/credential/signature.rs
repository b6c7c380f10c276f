//! The PS signature primitive: `Sign` and `Verify` (§4.1).

use super::attribute::AttributeMap;
use super::error::Error;
use super::group::{g1_generator, mul_g1, mul_g2, pairing, G1};
use super::keys::{PublicKey, SecretKey};
use ark_ff::Zero;
use tracing::{debug, warn};

/// A Pointcheval–Sanders signature `(σ1, σ2)`.
///
/// `h` (called `σ1` in the specification) is fixed to the group generator
/// `g` in this implementation: a full PS scheme samples `h` uniformly in
/// `G1 \ {1}`, but the showing protocol re-randomizes every signature before
/// it is ever shown, so a deterministic `h` loses no security here (§4.1).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Signature {
    #[cfg_attr(feature = "serde", serde(with = "super::serde_support::canonical"))]
    pub(crate) sigma1: G1,
    #[cfg_attr(feature = "serde", serde(with = "super::serde_support::canonical"))]
    pub(crate) sigma2: G1,
}

impl Signature {
    pub fn is_valid_shape(&self) -> bool {
        !self.sigma1.is_zero()
    }
}

/// Signs the attribute vector `m[1..=L]`, ordered by index (§3, §4.1).
///
/// `messages` must cover exactly the indices `1..=sk.num_attributes()`;
/// any gap or extra index is a [`Error::ContractViolation`].
pub fn sign(sk: &SecretKey, messages: &AttributeMap) -> Result<Signature, Error> {
    check_full_attribute_set(messages, sk.num_attributes())?;

    debug!(num_attributes = sk.num_attributes(), "signing attribute vector");

    let h = g1_generator();
    let mut exponent = sk.x();
    for (y_i, m_i) in sk.y().iter().zip(messages.values()) {
        exponent += *y_i * m_i;
    }
    let sigma2 = mul_g1(h, exponent);
    Ok(Signature { sigma1: h, sigma2 })
}

/// Verifies `sig` against `messages` under `pk` (§4.1). Fail-closed: a
/// malformed signature or mismatched attribute count returns `false` rather
/// than raising an error, so the caller's access-control decision stays a
/// plain boolean.
pub fn verify(pk: &PublicKey, sig: &Signature, messages: &AttributeMap) -> bool {
    if check_full_attribute_set(messages, pk.num_attributes()).is_err() {
        warn!("signature verification rejected: attribute vector mismatch");
        return false;
    }
    if !sig.is_valid_shape() {
        warn!("signature verification rejected: sigma1 is identity");
        return false;
    }

    let mut product = pk.x_hat();
    for (y_hat_i, m_i) in pk.y_hat().iter().zip(messages.values()) {
        product += mul_g2(*y_hat_i, *m_i);
    }

    let lhs = pairing(sig.sigma1, product);
    let rhs = pairing(sig.sigma2, pk.g_hat());
    let ok = lhs == rhs;
    if !ok {
        warn!("signature verification rejected: pairing check failed");
    }
    ok
}

/// Checks that `messages` assigns exactly the indices `1..=expected_len`,
/// with no gaps or duplicates.
pub(crate) fn check_full_attribute_set(
    messages: &AttributeMap,
    expected_len: usize,
) -> Result<(), Error> {
    if messages.len() != expected_len {
        return Err(Error::ContractViolation(format!(
            "expected {expected_len} attributes, got {}",
            messages.len()
        )));
    }
    for (expected_index, &actual_index) in (1..=expected_len).zip(messages.keys().copied()) {
        if expected_index != actual_index {
            return Err(Error::ContractViolation(format!(
                "attribute indices must cover 1..={expected_len} contiguously"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::group::Scalar;
    use crate::credential::keys::generate_key;
    use rand::thread_rng;

    fn attrs(n: usize) -> AttributeMap {
        (1..=n).map(|i| (i, Scalar::from(i as u64 * 7))).collect()
    }

    #[test]
    fn sign_then_verify_round_trips() {
        let mut rng = thread_rng();
        let (sk, pk) = generate_key(30, &mut rng).unwrap();
        let m = attrs(30);
        let sig = sign(&sk, &m).unwrap();
        assert!(verify(&pk, &sig, &m));
    }

    #[test]
    fn tampering_an_attribute_breaks_verification() {
        let mut rng = thread_rng();
        let (sk, pk) = generate_key(30, &mut rng).unwrap();
        let mut m = attrs(30);
        let sig = sign(&sk, &m).unwrap();
        *m.get_mut(&1).unwrap() += Scalar::from(1u64);
        assert!(!verify(&pk, &sig, &m));
    }

    #[test]
    fn wrong_attribute_count_is_rejected() {
        let mut rng = thread_rng();
        let (sk, _) = generate_key(3, &mut rng).unwrap();
        assert!(matches!(
            sign(&sk, &attrs(2)),
            Err(Error::ContractViolation(_))
        ));
    }
}
