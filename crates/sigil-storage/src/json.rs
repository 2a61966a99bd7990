//! JSON encoding helpers over [`Storage`].

use crate::error::{StorageError, StorageResult};
use crate::Storage;
use serde::{Serialize, de::DeserializeOwned};

/// Read and decode a JSON value.
pub async fn get_json<T: DeserializeOwned>(
    storage: &dyn Storage,
    path: &str,
) -> StorageResult<Option<T>> {
    let Some(bytes) = storage.get(path).await? else {
        return Ok(None);
    };
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|source| StorageError::Serialization {
            path: path.to_string(),
            source,
        })
}

/// Encode and write a JSON value.
pub async fn put_json<T: Serialize + Sync>(
    storage: &dyn Storage,
    path: &str,
    value: &T,
) -> StorageResult<()> {
    let bytes = serde_json::to_vec(value).map_err(|source| StorageError::Serialization {
        path: path.to_string(),
        source,
    })?;
    storage.put(path, bytes).await
}
