//! Error taxonomy for the PS credential scheme (§7).

/// The union of failures a credential operation can report.
///
/// No verifier routine returns this type — `Verify`/`VerifyIssueRequest`/
/// `VerifyDisclosureProof` are fail-closed booleans so a caller's
/// access-control decision stays explicit (§7). `Error` is reserved for
/// operations with no sensible boolean answer: malformed inputs, and the
/// one place (`ObtainCredential`) where a pairing check failure cannot be
/// shrugged off as "access denied" because the holder built the request.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Wrong attribute count, duplicate indices, an unknown subscription, or
    /// an empty disclosed set where disallowed.
    #[error("contract violation: {0}")]
    ContractViolation(String),
    /// A signature, issuance proof, or disclosure proof failed verification
    /// where the caller had no other way to express "invalid".
    #[error("cryptographic verification failed: {0}")]
    CryptoFailure(String),
}
