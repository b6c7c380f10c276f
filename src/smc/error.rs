//! Error taxonomy for the SMC engine.

use super::node_id::NodeId;
use super::participant::ParticipantId;

/// Errors raised by the channel/transport contract (§6, §7).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("no share for secret {0:?} was delivered before the session aborted")]
    MissingPrivateShare(NodeId),
    #[error("no broadcast from {sender} under label {label:?} arrived before the session aborted")]
    MissingBroadcast {
        sender: ParticipantId,
        label: String,
    },
    #[error("received a malformed payload: {0}")]
    MalformedPayload(String),
}

/// Errors raised by the trusted parameter generator (§4.7, §7).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("participant {0} is not registered with the trusted parameter generator")]
    UnregisteredParticipant(ParticipantId),
}

/// The union of failures an SMC party can observe while evaluating an
/// expression, plus fail-closed construction-time contract violations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PartyError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Generator(#[from] GeneratorError),
    #[error("{0}")]
    ContractViolation(String),
}
