//! Arithmetic secure multi-party computation via additive secret sharing and
//! Beaver triplets (Core B).
//!
//! A session is built from a [`participant::ProtocolSpec`] — an
//! [`expression::Expression`] tree every party holds an identical copy of,
//! plus the ordered list of participants evaluating it — and run by handing
//! each party's [`party::SMCParty`] a [`transport::Network`] and a
//! [`ttp::TrustedParamGenerator`] it shares with every other party.

pub mod error;
pub mod expression;
pub mod field;
pub mod node_id;
pub mod participant;
pub mod party;
pub mod share;
pub mod transport;
pub mod ttp;

pub use error::{GeneratorError, PartyError, TransportError};
pub use expression::{mul, Expression, Scalar, Secret};
pub use field::Field;
pub use node_id::NodeId;
pub use participant::{ParticipantId, ProtocolSpec};
pub use party::SMCParty;
pub use share::Share;
pub use transport::{InMemoryNetwork, Network};
pub use ttp::TrustedParamGenerator;
