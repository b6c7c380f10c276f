//! The single canonical Fiat–Shamir transcript encoding shared by the
//! issuance and showing Σ-protocols (§9 "Canonical encoding for
//! Fiat–Shamir"): every prover and verifier in this crate hashes bytes
//! produced by this module, and only this module, so the two sides can never
//! silently diverge on framing.

use super::group::{append_canonical, Scalar};
use ark_ff::PrimeField;
use ark_serialize::CanonicalSerialize;
use sha2::{Digest, Sha256};

/// Accumulates length-prefixed, canonically-serialized transcript elements
/// and reduces the final SHA-256 digest into a scalar mod q.
pub struct Transcript {
    buf: Vec<u8>,
}

impl Transcript {
    pub fn new() -> Self {
        Transcript { buf: Vec::new() }
    }

    pub fn append<T: CanonicalSerialize>(&mut self, value: &T) -> &mut Self {
        append_canonical(&mut self.buf, value);
        self
    }

    /// Exposes the raw buffer so callers can append pre-framed bytes, such as
    /// a public key's [`transcript_prefix`](super::keys::PublicKey), without
    /// this module knowing about every caller's type.
    pub(crate) fn buf_mut(&mut self) -> &mut Vec<u8> {
        &mut self.buf
    }

    /// Appends an arbitrary application message verbatim (length-prefixed,
    /// but not `CanonicalSerialize`-encoded since it is already bytes).
    pub fn append_bytes(&mut self, value: &[u8]) -> &mut Self {
        self.buf
            .extend_from_slice(&(value.len() as u32).to_be_bytes());
        self.buf.extend_from_slice(value);
        self
    }

    /// The Fiat–Shamir challenge: SHA-256 over the accumulated transcript,
    /// reduced modulo q.
    pub fn challenge(&self) -> Scalar {
        let digest = Sha256::digest(&self.buf);
        Scalar::from_le_bytes_mod_order(&digest)
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_transcripts_hash_identically() {
        let mut a = Transcript::new();
        let mut b = Transcript::new();
        a.append(&Scalar::from(42u64)).append_bytes(b"msg");
        b.append(&Scalar::from(42u64)).append_bytes(b"msg");
        assert_eq!(a.challenge(), b.challenge());
    }

    #[test]
    fn differing_transcripts_hash_differently() {
        let mut a = Transcript::new();
        let mut b = Transcript::new();
        a.append(&Scalar::from(42u64));
        b.append(&Scalar::from(43u64));
        assert_ne!(a.challenge(), b.challenge());
    }
}
