//! Participant identifiers and the protocol specification shared by all parties.

use super::error::PartyError;
use std::fmt;
use std::sync::Arc;

/// Identifies a single party in an SMC session.
///
/// Wraps a string so that deployments can use human-readable names ("alice",
/// "bob"); ordering on this type picks the designated party, per
/// [`ProtocolSpec::designated_party`].
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        ParticipantId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ParticipantId({})", self.0)
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An immutable expression tree plus the ordered list of participants
/// evaluating it. Every party in a session holds an identical `ProtocolSpec`.
#[derive(Clone)]
pub struct ProtocolSpec {
    expr: Arc<super::expression::Expression>,
    participant_ids: Vec<ParticipantId>,
}

impl ProtocolSpec {
    /// Fails with [`PartyError::ContractViolation`] if `participant_ids` is
    /// empty — a session needs at least one party to evaluate anything.
    pub fn new(
        expr: Arc<super::expression::Expression>,
        mut participant_ids: Vec<ParticipantId>,
    ) -> Result<Self, PartyError> {
        if participant_ids.is_empty() {
            return Err(PartyError::ContractViolation(
                "a protocol needs at least one participant".into(),
            ));
        }
        participant_ids.sort();
        participant_ids.dedup();
        Ok(ProtocolSpec {
            expr,
            participant_ids,
        })
    }

    pub fn expression(&self) -> &super::expression::Expression {
        &self.expr
    }

    pub fn participant_ids(&self) -> &[ParticipantId] {
        &self.participant_ids
    }

    pub fn num_parties(&self) -> usize {
        self.participant_ids.len()
    }

    /// The party responsible for folding a public scalar into the shared
    /// domain exactly once: the lexicographically smallest participant id.
    pub fn designated_party(&self) -> &ParticipantId {
        &self.participant_ids[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smc::expression::{IntoExpr, Scalar as ExprScalar};

    #[test]
    fn rejects_an_empty_participant_list() {
        let expr = ExprScalar::new(1).into_expr();
        assert!(matches!(
            ProtocolSpec::new(expr, Vec::new()),
            Err(PartyError::ContractViolation(_))
        ));
    }
}
