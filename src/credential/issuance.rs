//! Blind issuance: the holder commits to its own attributes, the issuer
//! blind-signs the commitment together with its own attributes, the holder
//! unblinds (§4.2).

use super::attribute::AttributeMap;
use super::error::Error;
use super::group::{g1_generator, mul_g1, random_nonzero_scalar, random_scalar, Scalar, G1};
use super::keys::{PublicKey, SecretKey};
use super::signature::{check_full_attribute_set, sign, verify, Signature};
use super::transcript::Transcript;
use rand_core::{CryptoRng, RngCore};
use tracing::{debug, warn};

/// A Fiat–Shamir proof of knowledge of a commitment's opening: a challenge,
/// the blinding's response, and one response per disclosed-in-the-proof
/// attribute index (§3 `NIProof`).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NIProof {
    #[cfg_attr(feature = "serde", serde(with = "super::serde_support::canonical"))]
    pub(crate) challenge: Scalar,
    #[cfg_attr(feature = "serde", serde(with = "super::serde_support::canonical"))]
    pub(crate) response_0: Scalar,
    /// `(index, response)` pairs, ascending by index.
    #[cfg_attr(
        feature = "serde",
        serde(with = "super::serde_support::indexed_scalars")
    )]
    pub(crate) responses: Vec<(usize, Scalar)>,
}

/// The holder's issuance request: a commitment to its own attributes plus a
/// proof that the commitment was built correctly.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IssueRequest {
    #[cfg_attr(feature = "serde", serde(with = "super::serde_support::canonical"))]
    commitment: G1,
    proof: NIProof,
}

/// State the holder carries from [`create_issue_request`] to
/// [`obtain_credential`]: the commitment's blinding factor and its own
/// attribute values, neither ever sent to the issuer.
pub struct IssuanceState {
    blinding: Scalar,
    user_attrs: AttributeMap,
}

/// The issuer's blind signature response: a signature on the commitment,
/// plus the issuer-chosen attributes it was combined with.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlindSignature {
    #[cfg_attr(feature = "serde", serde(with = "super::serde_support::canonical"))]
    sigma1: G1,
    #[cfg_attr(feature = "serde", serde(with = "super::serde_support::canonical"))]
    sigma2: G1,
    #[cfg_attr(
        feature = "serde",
        serde(with = "super::serde_support::attribute_map")
    )]
    issuer_attrs: AttributeMap,
}

/// A fully unblinded, verified credential: a signature over the holder's
/// complete attribute vector.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Credential {
    pub(crate) signature: Signature,
    #[cfg_attr(
        feature = "serde",
        serde(with = "super::serde_support::attribute_map")
    )]
    pub(crate) attributes: AttributeMap,
}

impl Credential {
    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }
}

fn commit(pk: &PublicKey, blinding: Scalar, attrs: &AttributeMap) -> G1 {
    let mut commitment = mul_g1(pk.g(), blinding);
    for (&index, &value) in attrs {
        commitment += mul_g1(pk.y()[index - 1], value);
    }
    commitment
}

fn proof_transcript(pk: &PublicKey, r: &G1, commitment: &G1) -> Transcript {
    let mut t = Transcript::new();
    pk.transcript_prefix(t.buf_mut());
    t.append(r).append(commitment);
    t
}

fn create_req_proof<R: RngCore + CryptoRng>(
    pk: &PublicKey,
    blinding: Scalar,
    user_attrs: &AttributeMap,
    commitment: &G1,
    rng: &mut R,
) -> NIProof {
    let r0 = random_scalar(rng);
    let attr_randomness: Vec<(usize, Scalar)> = user_attrs
        .keys()
        .map(|&index| (index, random_scalar(rng)))
        .collect();

    let mut r = mul_g1(pk.g(), r0);
    for &(index, r_i) in &attr_randomness {
        r += mul_g1(pk.y()[index - 1], r_i);
    }

    let challenge = proof_transcript(pk, &r, commitment).challenge();

    let response_0 = r0 - challenge * blinding;
    let responses = attr_randomness
        .into_iter()
        .map(|(index, r_i)| (index, r_i - challenge * user_attrs[&index]))
        .collect();

    NIProof {
        challenge,
        response_0,
        responses,
    }
}

/// CreateIssueRequest: commit to the holder's own attributes and prove the
/// commitment was honestly formed, without revealing `user_attrs` (§4.2).
pub fn create_issue_request<R: RngCore + CryptoRng>(
    pk: &PublicKey,
    user_attrs: AttributeMap,
    rng: &mut R,
) -> Result<(IssuanceState, IssueRequest), Error> {
    for &index in user_attrs.keys() {
        if index == 0 || index > pk.num_attributes() {
            return Err(Error::ContractViolation(format!(
                "attribute index {index} out of range"
            )));
        }
    }

    debug!(
        num_user_attributes = user_attrs.len(),
        "creating issue request"
    );

    let blinding = random_scalar(rng);
    let commitment = commit(pk, blinding, &user_attrs);
    let proof = create_req_proof(pk, blinding, &user_attrs, &commitment, rng);

    Ok((
        IssuanceState {
            blinding,
            user_attrs: user_attrs.clone(),
        },
        IssueRequest { commitment, proof },
    ))
}

/// VerifyIssueRequest: fail-closed check that `req.proof` opens `req.commitment`.
pub fn verify_issue_request(pk: &PublicKey, req: &IssueRequest) -> bool {
    let mut r_prime = mul_g1(req.commitment, req.proof.challenge);
    r_prime += mul_g1(pk.g(), req.proof.response_0);
    for &(index, response) in &req.proof.responses {
        if index == 0 || index > pk.num_attributes() {
            warn!("issue request rejected: response index out of range");
            return false;
        }
        r_prime += mul_g1(pk.y()[index - 1], response);
    }

    let expected = proof_transcript(pk, &r_prime, &req.commitment).challenge();
    let ok = expected == req.proof.challenge;
    if !ok {
        warn!("issue request rejected: proof does not reopen the commitment");
    }
    ok
}

/// SignIssueRequest: blind-sign `req.commitment` combined with the issuer's
/// own attributes (§4.2).
pub fn sign_issue_request<R: RngCore + CryptoRng>(
    sk: &SecretKey,
    pk: &PublicKey,
    req: &IssueRequest,
    issuer_attrs: AttributeMap,
    rng: &mut R,
) -> Result<BlindSignature, Error> {
    if !verify_issue_request(pk, req) {
        return Err(Error::CryptoFailure("invalid issue request".into()));
    }

    debug!(
        num_issuer_attributes = issuer_attrs.len(),
        "blind-signing issue request"
    );

    let u = random_nonzero_scalar(rng);
    let capital_x = mul_g1(pk.g(), sk.x());

    let mut base = capital_x + req.commitment;
    for (&index, &value) in &issuer_attrs {
        base += mul_g1(pk.y()[index - 1], value);
    }

    let sigma1 = mul_g1(g1_generator(), u);
    let sigma2 = mul_g1(base, u);

    Ok(BlindSignature {
        sigma1,
        sigma2,
        issuer_attrs,
    })
}

/// ObtainCredential: unblind the issuer's response and verify the result
/// signs the holder's full attribute vector (§4.2).
pub fn obtain_credential(
    pk: &PublicKey,
    response: BlindSignature,
    state: IssuanceState,
) -> Result<Credential, Error> {
    let IssuanceState {
        blinding,
        mut user_attrs,
    } = state;

    if user_attrs.len() + response.issuer_attrs.len() != pk.num_attributes() {
        return Err(Error::ContractViolation(
            "public key is configured for a different number of attributes".into(),
        ));
    }
    for index in response.issuer_attrs.keys() {
        if user_attrs.contains_key(index) {
            return Err(Error::ContractViolation(format!(
                "attribute index {index} assigned by both holder and issuer"
            )));
        }
    }

    let sigma2 = response.sigma2 - mul_g1(response.sigma1, blinding);
    let signature = Signature {
        sigma1: response.sigma1,
        sigma2,
    };

    user_attrs.extend(response.issuer_attrs);
    check_full_attribute_set(&user_attrs, pk.num_attributes())?;

    if !verify(pk, &signature, &user_attrs) {
        return Err(Error::CryptoFailure(
            "unblinded signature failed verification".into(),
        ));
    }

    Ok(Credential {
        signature,
        attributes: user_attrs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::attribute::{hash_to_scalar, Alphabet};
    use crate::credential::group::Scalar;
    use crate::credential::keys::generate_key;
    use rand::thread_rng;

    #[test]
    fn empty_user_attributes_degenerates_the_commitment_to_g_to_the_t() {
        let mut rng = thread_rng();
        let alphabet = Alphabet::new(["ballet", "opera"].iter().map(|s| s.to_string()));
        let (_, pk) = generate_key(alphabet.num_attributes(), &mut rng).unwrap();
        let (state, req) = create_issue_request(&pk, AttributeMap::new(), &mut rng).unwrap();
        assert_eq!(req.commitment, mul_g1(pk.g(), state.blinding));
        assert!(verify_issue_request(&pk, &req));
    }

    #[test]
    fn full_issuance_flow_yields_a_verifiable_credential() {
        let mut rng = thread_rng();
        let alphabet = Alphabet::new(
            ["ballet", "opera", "theater", "concert", "museum"]
                .iter()
                .map(|s| s.to_string()),
        );
        let (sk, pk) = generate_key(alphabet.num_attributes(), &mut rng).unwrap();

        let mut user_attrs = AttributeMap::new();
        user_attrs.insert(1, Scalar::from(987654321u64));
        let (state, req) = create_issue_request(&pk, user_attrs, &mut rng).unwrap();

        let issuer_attrs = alphabet
            .issuer_attributes(&["ballet".to_string(), "opera".to_string()])
            .unwrap();
        let response = sign_issue_request(&sk, &pk, &req, issuer_attrs, &mut rng).unwrap();

        let credential = obtain_credential(&pk, response, state).unwrap();
        assert!(verify(&pk, &credential.signature, &credential.attributes));
        let opera_index = *alphabet
            .disclosed_attributes(&["opera".to_string()])
            .unwrap()
            .keys()
            .next()
            .unwrap();
        assert_eq!(credential.attributes[&opera_index], hash_to_scalar("opera"));
    }

    #[test]
    fn mismatched_attribute_budget_is_a_contract_violation() {
        let mut rng = thread_rng();
        let (sk, pk) = generate_key(3, &mut rng).unwrap();
        let (state, req) = create_issue_request(&pk, AttributeMap::new(), &mut rng).unwrap();
        let mut issuer_attrs = AttributeMap::new();
        issuer_attrs.insert(2, Scalar::from(1u64));
        let response = sign_issue_request(&sk, &pk, &req, issuer_attrs, &mut rng).unwrap();
        assert!(matches!(
            obtain_credential(&pk, response, state),
            Err(Error::ContractViolation(_))
        ));
    }
}
