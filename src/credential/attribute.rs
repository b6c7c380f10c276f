//! The subscription alphabet and the mapping from subscription strings to
//! attribute indices and scalars (§6 "Attribute alphabet").

use super::error::Error;
use super::group::Scalar;
use ark_ff::PrimeField;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Attribute index → scalar value. `BTreeMap` keeps iteration in ascending
/// index order, which is canonical for every signing, hashing, and product
/// operation in the scheme (§3).
pub type AttributeMap = BTreeMap<usize, Scalar>;

/// The reserved placeholder value for "no subscription at this slot".
pub const NONE_SUBSCRIPTION: &str = "None";

/// Attribute index 1 is always the holder's per-user secret; it is never
/// part of the subscription alphabet.
pub const HOLDER_SECRET_INDEX: usize = 1;

/// Bytes-to-Scalar(SHA-256(s)) mod q (§6).
pub fn hash_to_scalar(s: &str) -> Scalar {
    let digest = Sha256::digest(s.as_bytes());
    Scalar::from_le_bytes_mod_order(&digest)
}

/// The public subscription alphabet A: index 1 is the reserved holder
/// secret, indices 2..=L are bound, one-to-one and for the lifetime of the
/// key, to a sorted list of subscription names.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Alphabet {
    /// Sorted, deduplicated subscription names; `subscriptions[i]` is bound
    /// to attribute index `i + 2`.
    subscriptions: Vec<String>,
}

impl Alphabet {
    pub fn new(subscriptions: impl IntoIterator<Item = String>) -> Self {
        let mut subscriptions: Vec<String> = subscriptions.into_iter().collect();
        subscriptions.sort();
        subscriptions.dedup();
        Alphabet { subscriptions }
    }

    /// L, the total number of signed attributes including the holder secret.
    pub fn num_attributes(&self) -> usize {
        self.subscriptions.len() + 1
    }

    pub fn contains(&self, subscription: &str) -> bool {
        subscription == NONE_SUBSCRIPTION || self.subscriptions.iter().any(|s| s == subscription)
    }

    fn index_of(&self, subscription: &str) -> Option<usize> {
        self.subscriptions
            .iter()
            .position(|s| s == subscription)
            .map(|pos| pos + 2)
    }

    /// Builds the issuer-side attribute map for a registration: every slot
    /// the holder subscribed to carries its own hash, every other slot
    /// carries the `"None"` sentinel (§4.2, matching the original
    /// `buildIssuerAttr`).
    pub fn issuer_attributes(&self, chosen: &[String]) -> Result<AttributeMap, Error> {
        for subscription in chosen {
            if self.index_of(subscription).is_none() {
                return Err(Error::ContractViolation(format!(
                    "unknown subscription {subscription:?}"
                )));
            }
        }
        let none_value = hash_to_scalar(NONE_SUBSCRIPTION);
        let mut map = AttributeMap::new();
        for (offset, name) in self.subscriptions.iter().enumerate() {
            let index = offset + 2;
            let value = if chosen.iter().any(|c| c == name) {
                hash_to_scalar(name)
            } else {
                none_value
            };
            map.insert(index, value);
        }
        Ok(map)
    }

    /// Builds the attribute map the holder discloses during showing: only
    /// the named subscriptions, each carrying its own hash (§8 scenario 2-4).
    pub fn disclosed_attributes(&self, revealed: &[String]) -> Result<AttributeMap, Error> {
        if revealed.is_empty() {
            return Err(Error::ContractViolation(
                "disclosed attribute set must not be empty".into(),
            ));
        }
        let mut map = AttributeMap::new();
        for subscription in revealed {
            let index = self.index_of(subscription).ok_or_else(|| {
                Error::ContractViolation(format!("unknown subscription {subscription:?}"))
            })?;
            map.insert(index, hash_to_scalar(subscription));
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alphabet() -> Alphabet {
        Alphabet::new(
            ["ballet", "opera", "theater", "concert", "museum"]
                .iter()
                .map(|s| s.to_string()),
        )
    }

    #[test]
    fn num_attributes_counts_the_holder_secret_slot() {
        assert_eq!(alphabet().num_attributes(), 6);
    }

    #[test]
    fn issuer_attributes_fill_unsubscribed_slots_with_none() {
        let a = alphabet();
        let map = a
            .issuer_attributes(&["ballet".to_string(), "opera".to_string()])
            .unwrap();
        assert_eq!(map.len(), 5);
        let none = hash_to_scalar(NONE_SUBSCRIPTION);
        let concert_index = a.index_of("concert").unwrap();
        assert_eq!(map[&concert_index], none);
    }

    #[test]
    fn unknown_subscription_is_a_contract_violation() {
        let a = alphabet();
        assert!(matches!(
            a.issuer_attributes(&["bars".to_string()]),
            Err(Error::ContractViolation(_))
        ));
    }

    #[test]
    fn empty_disclosure_is_a_contract_violation() {
        let a = alphabet();
        assert!(matches!(
            a.disclosed_attributes(&[]),
            Err(Error::ContractViolation(_))
        ));
    }
}
