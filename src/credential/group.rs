//! Pairing group primitives backing the PS signature scheme.
//!
//! The scheme needs two source groups, a target group, and a bilinear
//! pairing between them (§6); this crate gets all three from the BLS12-381
//! curve rather than hand-rolling field/curve arithmetic.

use ark_bls12_381::{Bls12_381, Fr, G1Affine, G1Projective, G2Affine, G2Projective};
use ark_ec::{AffineCurve, PairingEngine, ProjectiveCurve};
use ark_ff::{Field, PrimeField, Zero};
use ark_serialize::CanonicalSerialize;
use ark_std::UniformRand;
use rand_core::{CryptoRng, RngCore};

/// The scalar field Z_q shared by both source groups.
pub type Scalar = Fr;
pub type G1 = G1Projective;
pub type G2 = G2Projective;
/// The target group GT of the pairing.
pub type Gt = <Bls12_381 as PairingEngine>::Fqk;

pub fn g1_generator() -> G1 {
    G1Affine::prime_subgroup_generator().into_projective()
}

pub fn g2_generator() -> G2 {
    G2Affine::prime_subgroup_generator().into_projective()
}

pub fn random_scalar<R: RngCore + CryptoRng>(rng: &mut R) -> Scalar {
    Scalar::rand(rng)
}

/// A uniform scalar excluding zero, used wherever the protocol requires a
/// nonzero blinding factor (PS `Sign`'s `u`, showing's re-randomization `r`).
pub fn random_nonzero_scalar<R: RngCore + CryptoRng>(rng: &mut R) -> Scalar {
    loop {
        let s = Scalar::rand(rng);
        if !s.is_zero() {
            return s;
        }
    }
}

pub fn pairing(a: G1, b: G2) -> Gt {
    Bls12_381::pairing(a.into_affine(), b.into_affine())
}

/// Scalar multiplication in additive notation, matching the exponentiations
/// `g^x` of the specification.
pub fn mul_g1(base: G1, scalar: Scalar) -> G1 {
    base.mul(scalar.into_repr())
}

pub fn mul_g2(base: G2, scalar: Scalar) -> G2 {
    base.mul(scalar.into_repr())
}

/// Canonical, length-prefixed byte encoding used by the Fiat–Shamir
/// transcript (§6, §9): every field pushes its `CanonicalSerialize` bytes
/// behind a 4-byte big-endian length.
pub fn append_canonical<T: CanonicalSerialize>(buf: &mut Vec<u8>, value: &T) {
    let mut encoded = Vec::with_capacity(value.serialized_size());
    value
        .serialize(&mut encoded)
        .expect("serialization into a Vec<u8> cannot fail");
    buf.extend_from_slice(&(encoded.len() as u32).to_be_bytes());
    buf.extend_from_slice(&encoded);
}
