//! End-to-end issuance and showing scenarios (§8 scenarios 1-4).

use ps_smc::credential::{
    create_disclosure_proof, create_issue_request, generate_key, obtain_credential, sign,
    sign_issue_request, verify, verify_disclosure_proof, verify_issue_request, Alphabet,
    AttributeMap, Error, Scalar,
};
use rand::thread_rng;

#[test]
fn ps_sign_verify_round_trips_and_rejects_tampering() {
    let mut rng = thread_rng();
    let (sk, pk) = generate_key(30, &mut rng).unwrap();
    let m: AttributeMap = (1..=30).map(|i| (i, Scalar::from(i as u64))).collect();

    let sig = sign(&sk, &m).unwrap();
    assert!(verify(&pk, &sig, &m));

    let mut tampered = m.clone();
    *tampered.get_mut(&1).unwrap() += Scalar::from(1u64);
    assert!(!verify(&pk, &sig, &tampered));
}

fn demo_alphabet() -> Alphabet {
    Alphabet::new(
        ["ballet", "opera", "theater", "concert", "museum"]
            .iter()
            .map(|s| s.to_string()),
    )
}

fn issue(holder_secret: u64, subscriptions: &[&str]) -> (ps_smc::credential::PublicKey, ps_smc::credential::Credential, Alphabet) {
    let mut rng = thread_rng();
    let alphabet = demo_alphabet();
    let (sk, pk) = generate_key(alphabet.num_attributes(), &mut rng).unwrap();

    let mut user_attrs = AttributeMap::new();
    user_attrs.insert(1, Scalar::from(holder_secret));
    let (state, req) = create_issue_request(&pk, user_attrs, &mut rng).unwrap();
    assert!(verify_issue_request(&pk, &req));

    let chosen: Vec<String> = subscriptions.iter().map(|s| s.to_string()).collect();
    let issuer_attrs = alphabet.issuer_attributes(&chosen).unwrap();
    let response = sign_issue_request(&sk, &pk, &req, issuer_attrs, &mut rng).unwrap();

    let credential = obtain_credential(&pk, response, state).unwrap();
    (pk, credential, alphabet)
}

#[test]
fn disclosing_a_subscribed_attribute_verifies_and_unknown_subscription_is_rejected() {
    let mut rng = thread_rng();
    let (pk, credential, alphabet) = issue(12345, &["ballet", "opera"]);

    let disclosed = alphabet.disclosed_attributes(&["opera".to_string()]).unwrap();
    let hidden: Vec<usize> = credential
        .attributes()
        .keys()
        .copied()
        .filter(|i| !disclosed.contains_key(i))
        .collect();
    let dp = create_disclosure_proof(&pk, &credential, &hidden, b"this_is_a_msg", &mut rng)
        .unwrap();
    assert!(verify_disclosure_proof(&pk, &dp, &disclosed, b"this_is_a_msg"));

    assert!(matches!(
        alphabet.disclosed_attributes(&["bars".to_string()]),
        Err(Error::ContractViolation(_))
    ));
}

#[test]
fn disclosing_every_subscribed_attribute_verifies() {
    let mut rng = thread_rng();
    let (pk, credential, alphabet) = issue(999, &["ballet", "opera"]);
    let disclosed = alphabet
        .disclosed_attributes(&["opera".to_string(), "ballet".to_string()])
        .unwrap();
    let hidden: Vec<usize> = credential
        .attributes()
        .keys()
        .copied()
        .filter(|i| !disclosed.contains_key(i))
        .collect();
    let dp = create_disclosure_proof(&pk, &credential, &hidden, b"msg", &mut rng).unwrap();
    assert!(verify_disclosure_proof(&pk, &dp, &disclosed, b"msg"));
}

#[test]
fn disclosing_nothing_is_a_contract_violation() {
    let alphabet = demo_alphabet();
    assert!(matches!(
        alphabet.disclosed_attributes(&[]),
        Err(Error::ContractViolation(_))
    ));
}
