use anyhow::{Result, anyhow};
use steel::AccountDeserialize;

pub fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
    bincode::serialize(value).map_err(|e| anyhow!("Serialization failed: {}", e))
}

pub fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
    bincode::deserialize(data).map_err(|e| anyhow!("Deserialization failed: {}", e))
}

/// Copies a program account out of its raw data.
pub fn unpack_account<T: AccountDeserialize + Copy>(data: &[u8], label: &str) -> Result<T> {
    T::try_from_bytes(data)
        .copied()
        .map_err(|e| anyhow!("Failed to unpack {} account: {}", label, e))
}
