//! Pointcheval–Sanders anonymous attribute-based credentials over a
//! bilinear pairing group (Core A).
//!
//! [`keys::generate_key`] produces a signing/verification keypair for an
//! L-attribute [`attribute::Alphabet`]. A holder and issuer run
//! [`issuance::create_issue_request`] / [`issuance::sign_issue_request`] /
//! [`issuance::obtain_credential`] to mint a [`issuance::Credential`] without
//! the issuer ever learning the holder's own attributes; the holder later
//! runs [`showing::create_disclosure_proof`] to prove possession of the
//! credential while disclosing only a chosen subset of its attributes.

pub mod attribute;
pub mod error;
pub mod group;
pub mod issuance;
pub mod keys;
#[cfg(feature = "serde")]
mod serde_support;
pub mod showing;
pub mod signature;
pub mod transcript;

pub use attribute::{Alphabet, AttributeMap, HOLDER_SECRET_INDEX, NONE_SUBSCRIPTION};
pub use error::Error;
pub use group::Scalar;
pub use issuance::{
    create_issue_request, obtain_credential, sign_issue_request, verify_issue_request,
    BlindSignature, Credential, IssuanceState, IssueRequest, NIProof,
};
pub use keys::{generate_key, PublicKey, SecretKey};
pub use showing::{create_disclosure_proof, verify_disclosure_proof, DisclosureProof};
pub use signature::{sign, verify, Signature};
