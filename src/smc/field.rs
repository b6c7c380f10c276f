//! Arithmetic modulo the fixed 128-bit-plus prime used by the SMC engine.

use primitive_types::{U256, U512};
use rand_core::{CryptoRng, RngCore};
use std::ops::{Add, Mul, Neg, Sub};

/// p = 2^128 + 51, a prime slightly larger than `u128::MAX`.
///
/// Kept as a `U256` so that products of two field elements (which need up to
/// 256 bits before reduction) never have to special-case overflow.
pub fn prime() -> U256 {
    (U256::one() << 128) + U256::from(51u32)
}

fn prime512() -> U512 {
    U512::from(prime())
}

/// An element of Z_p.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Field(U256);

// Zeroizes `Field` to be the `Default` value (0) on drop, the way the
// teacher zeroizes `Secret` — this is the value a party's own share, a
// Beaver triplet share, or a reconstructed secret is made of.
impl zeroize::DefaultIsZeroes for Field {}

impl Field {
    pub fn zero() -> Self {
        Field(U256::zero())
    }

    pub fn from_u128(value: u128) -> Self {
        Field(U256::from(value))
    }

    /// Builds a field element from a signed public integer, reducing negative
    /// values into `[0, p)`.
    pub fn from_i64(value: i64) -> Self {
        if value >= 0 {
            Field(U256::from(value as u64))
        } else {
            let magnitude = U256::from((-value) as u64);
            Field(prime() - (magnitude % prime()))
        }
    }

    pub fn from_u256(value: U256) -> Self {
        Field(value % prime())
    }

    pub fn to_u256(self) -> U256 {
        self.0
    }

    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        Field(U256::from_big_endian(&bytes) % prime())
    }

    pub fn to_be_bytes(self) -> [u8; 32] {
        let mut out = [0u8; 32];
        self.0.to_big_endian(&mut out);
        out
    }

    pub fn from_be_bytes(bytes: &[u8; 32]) -> Self {
        Field(U256::from_big_endian(bytes) % prime())
    }
}

impl Add for Field {
    type Output = Field;
    fn add(self, rhs: Field) -> Field {
        let p = prime();
        let sum = self.0 + rhs.0;
        Field(if sum >= p { sum - p } else { sum })
    }
}

impl Sub for Field {
    type Output = Field;
    fn sub(self, rhs: Field) -> Field {
        let p = prime();
        if self.0 >= rhs.0 {
            Field(self.0 - rhs.0)
        } else {
            Field(p - (rhs.0 - self.0))
        }
    }
}

impl Mul for Field {
    type Output = Field;
    fn mul(self, rhs: Field) -> Field {
        let product = self.0.full_mul(rhs.0);
        let reduced = product % prime512();
        // `reduced` is < p < 2^129, so it always fits in the low 32 bytes.
        let mut wide = [0u8; 64];
        reduced.to_big_endian(&mut wide);
        let mut narrow = [0u8; 32];
        narrow.copy_from_slice(&wide[32..]);
        Field(U256::from_big_endian(&narrow))
    }
}

impl Neg for Field {
    type Output = Field;
    fn neg(self) -> Field {
        Field::zero() - self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_around_prime() {
        let p_minus_one = Field(prime() - U256::one());
        assert_eq!(p_minus_one + Field::from_u128(1), Field::zero());
    }

    #[test]
    fn multiplication_matches_naive_u128_when_no_overflow() {
        let a = Field::from_u128(1234567);
        let b = Field::from_u128(7654321);
        let expected = Field::from_u128(1234567u128 * 7654321u128);
        assert_eq!(a * b, expected);
    }

    #[test]
    fn negative_scalars_reduce_into_the_field() {
        let minus_one = Field::from_i64(-1);
        assert_eq!(minus_one + Field::from_u128(1), Field::zero());
    }

    #[test]
    fn round_trips_through_big_endian_bytes() {
        let a = Field::from_u128(9876543210);
        assert_eq!(Field::from_be_bytes(&a.to_be_bytes()), a);
    }
}
