//! Stable, cross-party node identities for expression tree nodes.

use rand_core::{CryptoRng, RngCore};
use std::fmt;

/// An opaque, stable identity for an expression node.
///
/// Every party must agree on the `NodeId` of a given `Secret` or `Mul` node:
/// it is the routing key for share delivery and the Beaver-triplet slot
/// index respectively. Parties build this agreement out of band (typically
/// by constructing the expression tree from one shared, serialized
/// `ProtocolSpec`), not by comparing Rust's default object identity.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId([u8; 16]);

impl NodeId {
    /// Generates a fresh, random node id.
    ///
    /// Must be called at most once per logical node and the resulting
    /// `NodeId` shared with every other party before the protocol starts.
    pub fn fresh<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut bytes = [0u8; 16];
        rng.fill_bytes(&mut bytes);
        NodeId(bytes)
    }

    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        NodeId(bytes)
    }

    pub fn to_bytes(self) -> [u8; 16] {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId(")?;
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        write!(f, ")")
    }
}
