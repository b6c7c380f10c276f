//! Immutable arithmetic expression trees evaluated collectively by SMC parties.
//!
//! ```
//! # use ps_smc::smc::expression::{mul, Secret, Scalar};
//! # use rand::thread_rng;
//! let mut rng = thread_rng();
//! let alice = Secret::new(&mut rng);
//! let bob = Secret::new(&mut rng);
//! let expr = mul(alice.clone(), bob.clone(), &mut rng) + Scalar::new(2);
//! ```

use super::node_id::NodeId;
use rand_core::{CryptoRng, RngCore};
use std::ops::{Add, Sub};
use std::sync::Arc;

/// A node in an arithmetic expression tree.
///
/// `Add`, `Sub`, and `Mul` hold their operands behind `Arc` so that the same
/// subexpression can be shared by multiple parents without cloning the tree.
#[derive(Clone)]
pub enum Expression {
    Add(Arc<Expression>, Arc<Expression>),
    Sub(Arc<Expression>, Arc<Expression>),
    /// The `NodeId` is only semantically required when both operands turn out
    /// to be secret-shared at evaluation time (see §4.6); it is still carried
    /// here so a `Mul` node has a stable identity regardless of its operands.
    Mul(Arc<Expression>, Arc<Expression>, NodeId),
    Scalar(i64),
    /// A secret value known only to its owning party. The owner is not
    /// recorded in the tree itself — it is determined by which party's
    /// `value_dict` supplies a value for this `NodeId` at evaluation time.
    Secret(NodeId),
}

impl Expression {
    /// The node's identity, used as the Beaver-triplet slot key for `Mul` and
    /// the share-routing key for `Secret`. Other variants have no externally
    /// meaningful identity.
    pub fn node_id(&self) -> Option<NodeId> {
        match self {
            Expression::Mul(_, _, id) => Some(*id),
            Expression::Secret(id) => Some(*id),
            _ => None,
        }
    }
}

/// Builder handle for a `Scalar` leaf — a public integer known to every party.
#[derive(Clone)]
pub struct Scalar(Arc<Expression>);

impl Scalar {
    pub fn new(value: i64) -> Self {
        Scalar(Arc::new(Expression::Scalar(value)))
    }
}

/// Builder handle for a `Secret` leaf — a value known only to its owner.
#[derive(Clone)]
pub struct Secret {
    node: Arc<Expression>,
    id: NodeId,
}

impl Secret {
    pub fn new<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let id = NodeId::fresh(rng);
        Secret {
            node: Arc::new(Expression::Secret(id)),
            id,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }
}

/// Anything that can appear as an operand of `+`, `-`, `*`: a `Secret`,
/// `Scalar`, or an already-combined subexpression.
pub trait IntoExpr {
    fn into_expr(self) -> Arc<Expression>;
}

impl IntoExpr for Secret {
    fn into_expr(self) -> Arc<Expression> {
        self.node
    }
}

impl IntoExpr for Scalar {
    fn into_expr(self) -> Arc<Expression> {
        self.0
    }
}

impl IntoExpr for Arc<Expression> {
    fn into_expr(self) -> Arc<Expression> {
        self
    }
}

macro_rules! impl_binop {
    ($trait_:ident, $method:ident, $variant:ident, $lhs:ty) => {
        impl<Rhs: IntoExpr> $trait_<Rhs> for $lhs {
            type Output = Arc<Expression>;
            fn $method(self, rhs: Rhs) -> Arc<Expression> {
                Arc::new(Expression::$variant(self.into_expr(), rhs.into_expr()))
            }
        }
    };
}

impl_binop!(Add, add, Add, Secret);
impl_binop!(Add, add, Add, Scalar);
impl_binop!(Add, add, Add, Arc<Expression>);
impl_binop!(Sub, sub, Sub, Secret);
impl_binop!(Sub, sub, Sub, Scalar);
impl_binop!(Sub, sub, Sub, Arc<Expression>);

/// Builds a `Mul` node, minting a fresh cross-party [`NodeId`] for it.
///
/// Unlike `Add`/`Sub`, multiplication cannot be expressed through
/// `std::ops::Mul` alone: when both operands turn out to be secret-shared at
/// evaluation time the node's identity names the Beaver-triplet slot every
/// party must agree on, so minting it takes an explicit `rng` rather than
/// reaching for implicit global randomness.
pub fn mul<A: IntoExpr, B: IntoExpr, R: RngCore + CryptoRng>(
    a: A,
    b: B,
    rng: &mut R,
) -> Arc<Expression> {
    Arc::new(Expression::Mul(
        a.into_expr(),
        b.into_expr(),
        NodeId::fresh(rng),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::thread_rng;

    #[test]
    fn secrets_have_distinct_ids() {
        let mut rng = thread_rng();
        let a = Secret::new(&mut rng);
        let b = Secret::new(&mut rng);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn builder_composes_a_tree() {
        let mut rng = thread_rng();
        let a = Secret::new(&mut rng);
        let b = Secret::new(&mut rng);
        let expr = mul(a, b, &mut rng) + Scalar::new(5);
        assert!(matches!(*expr, Expression::Add(_, _)));
    }
}
