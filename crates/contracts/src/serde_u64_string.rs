//! Optional `u64` carried as a JSON string so browser clients keep full precision.

use serde::de::Error;
use serde::{Deserialize, Deserializer, Serializer};

pub fn serialize<S>(value: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(value) => serializer.serialize_str(&value.to_string()),
        None => serializer.serialize_none(),
    }
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum U64Input {
        String(String),
        Number(u64),
    }

    match Option::<U64Input>::deserialize(deserializer)? {
        Some(U64Input::String(raw)) => raw.trim().parse::<u64>().map(Some).map_err(D::Error::custom),
        Some(U64Input::Number(value)) => Ok(Some(value)),
        None => Ok(None),
    }
}
