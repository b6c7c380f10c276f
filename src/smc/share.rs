//! Additive N-of-N secret sharing over [`Field`](crate::smc::field::Field).

use super::field::Field;
use rand_core::{CryptoRng, RngCore};
use std::ops::{Add, Mul, Sub};

/// A single party's share of a secret value.
///
/// Shares are immutable: every arithmetic operation returns a fresh `Share`
/// rather than mutating its operands.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Share(Field);

// Zeroizes `Share` to be the `Default` value on drop, the way the teacher
// zeroizes `Secret` and `SignatureShare` — a Beaver triplet share is exactly
// the kind of per-party secret material those impls guard.
impl zeroize::DefaultIsZeroes for Share {}

impl Share {
    pub fn new(value: Field) -> Self {
        Share(value)
    }

    pub fn value(self) -> Field {
        self.0
    }

    pub fn add_public(self, c: Field) -> Share {
        Share(self.0 + c)
    }

    pub fn sub_public(self, c: Field) -> Share {
        Share(self.0 - c)
    }

    pub fn negate(self) -> Share {
        Share(Field::zero() - self.0)
    }

    pub fn mul_public(self, c: Field) -> Share {
        Share(self.0 * c)
    }
}

impl Add for Share {
    type Output = Share;
    fn add(self, rhs: Share) -> Share {
        Share(self.0 + rhs.0)
    }
}

impl Sub for Share {
    type Output = Share;
    fn sub(self, rhs: Share) -> Share {
        Share(self.0 - rhs.0)
    }
}

impl Mul for Share {
    type Output = Share;
    fn mul(self, rhs: Share) -> Share {
        Share(self.0 * rhs.0)
    }
}

/// Splits `secret` into `num_shares` additive shares of Z_p.
///
/// The first `num_shares - 1` shares are drawn uniformly at random; the last
/// is fixed so that the sum of all shares equals `secret` modulo p.
pub fn share_secret<R: RngCore + CryptoRng>(
    secret: Field,
    num_shares: usize,
    rng: &mut R,
) -> Vec<Share> {
    assert!(num_shares > 0, "cannot share a secret among zero parties");

    let mut shares = Vec::with_capacity(num_shares);
    let mut running_sum = Field::zero();
    for _ in 0..num_shares - 1 {
        let r = Field::random(rng);
        running_sum = running_sum + r;
        shares.push(Share::new(r));
    }
    shares.push(Share::new(secret - running_sum));
    shares
}

/// Reconstructs the plaintext value from a complete set of shares.
pub fn reconstruct(shares: &[Share]) -> Field {
    shares
        .iter()
        .fold(Field::zero(), |acc, share| acc + share.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::thread_rng;

    #[test]
    fn shares_reconstruct_to_the_original_secret() {
        let mut rng = thread_rng();
        let secret = Field::from_u128(424242);
        let shares = share_secret(secret, 5, &mut rng);
        assert_eq!(reconstruct(&shares), secret);
    }

    #[test]
    fn single_party_degenerates_to_the_plaintext_value() {
        let mut rng = thread_rng();
        let secret = Field::from_u128(7);
        let shares = share_secret(secret, 1, &mut rng);
        assert_eq!(shares.len(), 1);
        assert_eq!(reconstruct(&shares), secret);
    }

    #[test]
    fn local_arithmetic_on_shares_is_homomorphic() {
        let mut rng = thread_rng();
        let a = Field::from_u128(10);
        let b = Field::from_u128(3);

        let a_shares = share_secret(a, 3, &mut rng);
        let b_shares = share_secret(b, 3, &mut rng);

        let sum_shares: Vec<Share> = a_shares
            .iter()
            .zip(b_shares.iter())
            .map(|(x, y)| *x + *y)
            .collect();
        assert_eq!(reconstruct(&sum_shares), a + b);

        let scaled: Vec<Share> = a_shares.iter().map(|x| x.mul_public(b)).collect();
        assert_eq!(reconstruct(&scaled), a * b);
    }
}
