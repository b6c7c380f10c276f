//! `serde` adapters for the pairing library's types.
//!
//! `ark-ff`/`ark-ec` group and field elements only implement
//! [`ark_serialize::CanonicalSerialize`]/`CanonicalDeserialize`, not `serde`
//! directly (the pattern `other_examples/*docknetwork_crypto*` works around
//! with its own `serde_utils` adapters). Every wire-facing struct in this
//! module routes its pairing-typed fields through `#[serde(with = "...")]`
//! and one of the two submodules here instead.

#![cfg(feature = "serde")]

use super::attribute::AttributeMap;
use super::group::Scalar;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};

/// `serde(with = "canonical")` for any single `CanonicalSerialize` value or
/// vector of them (`G1`, `G2`, `Gt`, `Scalar`, `Vec<G1>`, `Vec<G2>`, ...).
pub(crate) mod canonical {
    use super::{CanonicalDeserialize, CanonicalSerialize};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S, T>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: CanonicalSerialize,
    {
        let mut bytes = Vec::with_capacity(value.serialized_size());
        value
            .serialize(&mut bytes)
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_bytes(&bytes)
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: CanonicalDeserialize,
    {
        let bytes = <Vec<u8>>::deserialize(deserializer)?;
        T::deserialize(&bytes[..]).map_err(serde::de::Error::custom)
    }
}

/// `serde(with = "canonical_vec")` for `Vec<T>` where `T: CanonicalSerialize`
/// — encoded element-by-element rather than relying on a blanket
/// `CanonicalSerialize` impl for `Vec<T>` itself, which this crate's pinned
/// `ark-serialize` version does not reliably provide.
pub(crate) mod canonical_vec {
    use super::{CanonicalDeserialize, CanonicalSerialize};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S, T>(values: &[T], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: CanonicalSerialize,
    {
        let entries: Vec<Vec<u8>> = values
            .iter()
            .map(|value| {
                let mut bytes = Vec::with_capacity(value.serialized_size());
                value
                    .serialize(&mut bytes)
                    .expect("serialization into a Vec<u8> cannot fail");
                bytes
            })
            .collect();
        entries.serialize(serializer)
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: CanonicalDeserialize,
    {
        let entries: Vec<Vec<u8>> = Deserialize::deserialize(deserializer)?;
        entries
            .into_iter()
            .map(|bytes| T::deserialize(&bytes[..]).map_err(serde::de::Error::custom))
            .collect()
    }
}

fn scalar_to_bytes(value: &Scalar) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(value.serialized_size());
    value
        .serialize(&mut bytes)
        .expect("serialization into a Vec<u8> cannot fail");
    bytes
}

/// `serde(with = "attribute_map")` for `AttributeMap`: encodes as a sequence
/// of `(index, scalar bytes)` pairs, ascending by index.
pub(crate) mod attribute_map {
    use super::{scalar_to_bytes, AttributeMap};
    use crate::credential::group::Scalar;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(map: &AttributeMap, serializer: S) -> Result<S::Ok, S::Error> {
        let entries: Vec<(u64, Vec<u8>)> = map
            .iter()
            .map(|(&index, value)| (index as u64, scalar_to_bytes(value)))
            .collect();
        entries.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<AttributeMap, D::Error> {
        use ark_serialize::CanonicalDeserialize;

        let entries: Vec<(u64, Vec<u8>)> = Deserialize::deserialize(deserializer)?;
        let mut map = AttributeMap::new();
        for (index, bytes) in entries {
            let value = Scalar::deserialize(&bytes[..]).map_err(serde::de::Error::custom)?;
            map.insert(index as usize, value);
        }
        Ok(map)
    }
}

/// `serde(with = "indexed_scalars")` for `Vec<(usize, Scalar)>`, the shape of
/// a Σ-protocol proof's per-attribute responses.
pub(crate) mod indexed_scalars {
    use super::scalar_to_bytes;
    use crate::credential::group::Scalar;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        values: &[(usize, Scalar)],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let entries: Vec<(u64, Vec<u8>)> = values
            .iter()
            .map(|(index, value)| (*index as u64, scalar_to_bytes(value)))
            .collect();
        entries.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<(usize, Scalar)>, D::Error> {
        use ark_serialize::CanonicalDeserialize;

        let entries: Vec<(u64, Vec<u8>)> = Deserialize::deserialize(deserializer)?;
        entries
            .into_iter()
            .map(|(index, bytes)| {
                let value = Scalar::deserialize(&bytes[..]).map_err(serde::de::Error::custom)?;
                Ok((index as usize, value))
            })
            .collect()
    }
}
