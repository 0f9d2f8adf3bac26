//! Serde adapters rendering `Pubkey` and `Hash` as base58 strings so state
//! snapshots stay readable and usable as JSON map keys.

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serializer};
use solana_program::{hash::Hash, pubkey::Pubkey};

pub mod pubkey_serde {
    use super::*;

    pub fn serialize<S>(pubkey: &Pubkey, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&pubkey.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Pubkey, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Pubkey::from_str(&s).map_err(serde::de::Error::custom)
    }
}

pub mod pubkey_vec_serde {
    use super::*;

    pub fn serialize<S>(pubkeys: &[Pubkey], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(pubkeys.iter().map(|k| k.to_string()))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Pubkey>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Vec::<String>::deserialize(deserializer)?
            .iter()
            .map(|s| Pubkey::from_str(s).map_err(serde::de::Error::custom))
            .collect()
    }
}

pub mod pubkey_map_serde {
    use super::*;
    use serde::Serialize;

    pub fn serialize<S, V>(map: &HashMap<Pubkey, V>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        V: Serialize,
    {
        serializer.collect_map(map.iter().map(|(k, v)| (k.to_string(), v)))
    }

    pub fn deserialize<'de, D, V>(deserializer: D) -> Result<HashMap<Pubkey, V>, D::Error>
    where
        D: Deserializer<'de>,
        V: Deserialize<'de>,
    {
        HashMap::<String, V>::deserialize(deserializer)?
            .into_iter()
            .map(|(k, v)| {
                Pubkey::from_str(&k)
                    .map(|key| (key, v))
                    .map_err(serde::de::Error::custom)
            })
            .collect()
    }
}

pub mod hash_serde {
    use super::*;

    pub fn serialize<S>(hash: &Hash, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hash.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Hash, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Hash::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// For maps whose values are `Pubkey`s and whose keys already serialize as strings.
pub mod pubkey_values_serde {
    use super::*;
    use serde::Serialize;
    use std::hash::Hash as StdHash;

    pub fn serialize<S, K>(map: &HashMap<K, Pubkey>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        K: Serialize,
    {
        serializer.collect_map(map.iter().map(|(k, v)| (k, v.to_string())))
    }

    pub fn deserialize<'de, D, K>(deserializer: D) -> Result<HashMap<K, Pubkey>, D::Error>
    where
        D: Deserializer<'de>,
        K: Deserialize<'de> + Eq + StdHash,
    {
        HashMap::<K, String>::deserialize(deserializer)?
            .into_iter()
            .map(|(k, v)| {
                Pubkey::from_str(&v)
                    .map(|value| (k, value))
                    .map_err(serde::de::Error::custom)
            })
            .collect()
    }
}
