//! PS signature key generation (§4.1 `KeyGen`).

use super::error::Error;
use super::group::{g1_generator, g2_generator, mul_g1, mul_g2, random_scalar, Scalar, G1, G2};
use ark_ff::Zero;
use rand_core::{CryptoRng, RngCore};
use tracing::debug;

/// The issuer's signing key: `x` and the per-attribute exponents `y`.
///
/// Overwritten with zero on drop, the way the teacher zeroizes FROST nonces
/// and signature shares — this is the one piece of long-lived material in
/// Core A whose compromise breaks every credential ever issued under it.
#[derive(Clone)]
pub struct SecretKey {
    x: Scalar,
    y: Vec<Scalar>,
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.x = Scalar::zero();
        for y_i in &mut self.y {
            *y_i = Scalar::zero();
        }
    }
}

impl SecretKey {
    pub fn num_attributes(&self) -> usize {
        self.y.len()
    }

    pub(crate) fn x(&self) -> Scalar {
        self.x
    }

    pub(crate) fn y(&self) -> &[Scalar] {
        &self.y
    }
}

/// The issuer's verification key, public to anyone who wants to check a
/// signature or take part in issuance/showing.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PublicKey {
    #[cfg_attr(feature = "serde", serde(with = "super::serde_support::canonical"))]
    g: G1,
    #[cfg_attr(
        feature = "serde",
        serde(with = "super::serde_support::canonical_vec")
    )]
    y: Vec<G1>,
    #[cfg_attr(feature = "serde", serde(with = "super::serde_support::canonical"))]
    g_hat: G2,
    #[cfg_attr(feature = "serde", serde(with = "super::serde_support::canonical"))]
    x_hat: G2,
    #[cfg_attr(
        feature = "serde",
        serde(with = "super::serde_support::canonical_vec")
    )]
    y_hat: Vec<G2>,
}

impl PublicKey {
    pub fn num_attributes(&self) -> usize {
        self.y.len()
    }

    pub(crate) fn g(&self) -> G1 {
        self.g
    }

    pub(crate) fn y(&self) -> &[G1] {
        &self.y
    }

    pub(crate) fn g_hat(&self) -> G2 {
        self.g_hat
    }

    pub(crate) fn x_hat(&self) -> G2 {
        self.x_hat
    }

    pub(crate) fn y_hat(&self) -> &[G2] {
        &self.y_hat
    }

    /// The ordered tuple `(g, Y_1..Y_L, g_hat, X_hat, Y_hat_1..Y_hat_L)` that
    /// every Fiat–Shamir transcript in this crate hashes first (§4.2, §9).
    pub(crate) fn transcript_prefix(&self, buf: &mut Vec<u8>) {
        use super::group::append_canonical;
        append_canonical(buf, &self.g);
        for y_i in &self.y {
            append_canonical(buf, y_i);
        }
        append_canonical(buf, &self.g_hat);
        append_canonical(buf, &self.x_hat);
        for y_hat_i in &self.y_hat {
            append_canonical(buf, y_hat_i);
        }
    }
}

/// KeyGen(L): sample `x, y_1..y_L` uniformly and derive both keys.
///
/// Fails with [`Error::ContractViolation`] if `num_attributes` is zero — a
/// PS signature needs at least the holder's own secret attribute.
pub fn generate_key<R: RngCore + CryptoRng>(
    num_attributes: usize,
    rng: &mut R,
) -> Result<(SecretKey, PublicKey), Error> {
    if num_attributes == 0 {
        return Err(Error::ContractViolation(
            "key generation requires at least one attribute".into(),
        ));
    }

    debug!(num_attributes, "generating PS keypair");

    let g = g1_generator();
    let g_hat = g2_generator();

    let x = random_scalar(rng);
    let y: Vec<Scalar> = (0..num_attributes).map(|_| random_scalar(rng)).collect();

    let x_hat = mul_g2(g_hat, x);
    let y_pub: Vec<G1> = y.iter().map(|&y_i| mul_g1(g, y_i)).collect();
    let y_hat: Vec<G2> = y.iter().map(|&y_i| mul_g2(g_hat, y_i)).collect();

    let sk = SecretKey { x, y };
    let pk = PublicKey {
        g,
        y: y_pub,
        g_hat,
        x_hat,
        y_hat,
    };
    Ok((sk, pk))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::thread_rng;

    #[test]
    fn rejects_zero_attributes() {
        let mut rng = thread_rng();
        assert!(matches!(
            generate_key(0, &mut rng),
            Err(Error::ContractViolation(_))
        ));
    }

    #[test]
    fn public_key_tracks_secret_key_length() {
        let mut rng = thread_rng();
        let (sk, pk) = generate_key(5, &mut rng).unwrap();
        assert_eq!(sk.num_attributes(), 5);
        assert_eq!(pk.num_attributes(), 5);
    }
}
