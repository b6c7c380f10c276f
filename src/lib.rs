//! Two independent cryptographic cores sharing one crate.
//!
//! [`credential`] implements Pointcheval–Sanders anonymous attribute-based
//! credentials over a bilinear pairing group: issuance with blinded holder
//! attributes and a showing protocol that discloses a chosen subset of
//! attributes under a zero-knowledge proof of the rest.
//!
//! [`smc`] implements arithmetic secure multi-party computation over
//! additive secret sharing: an expression tree of additions, subtractions,
//! and multiplications evaluated jointly by N non-colluding parties, with
//! Beaver triplets for the multiplication of two secret-shared values.
//!
//! Neither core depends on the other; they are shipped together because
//! both back the same access-control system — a holder who can show a valid
//! credential unlocks a computation whose inputs stay secret-shared.

pub mod credential;
pub mod smc;
