//! Binary snapshot of the filtered dataset.
//!
//! Format:
//! - 4 bytes: magic (`JRS\x01`)
//! - 4 bytes: format version (u32 little-endian)
//! - N bytes: `bincode` payload of the [`DataSet`]
//!
//! Encoding is deterministic: the same dataset always produces the same bytes.

use std::fs;
use std::path::Path;

use crate::error::{LoadFailure, RegistryError, RegistryResult};
use crate::types::DataSet;

use super::atomic::write_atomically;

/// Leading bytes of every snapshot file.
pub const SNAPSHOT_MAGIC: [u8; 4] = *b"JRS\x01";

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

const HEADER_LEN: usize = SNAPSHOT_MAGIC.len() + 4;

/// Serialize `dataset` into snapshot bytes.
pub fn encode_snapshot(dataset: &DataSet) -> Result<Vec<u8>, bincode::Error> {
    let payload = bincode::serialize(dataset)?;
    let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
    out.extend_from_slice(&SNAPSHOT_MAGIC);
    out.extend_from_slice(&SNAPSHOT_VERSION.to_le_bytes());
    out.extend_from_slice(&payload);
    Ok(out)
}

/// Parse snapshot bytes back into a [`DataSet`].
pub fn decode_snapshot(bytes: &[u8]) -> Result<DataSet, LoadFailure> {
    if bytes.len() < HEADER_LEN || bytes[..SNAPSHOT_MAGIC.len()] != SNAPSHOT_MAGIC {
        return Err(LoadFailure::Malformed("not a journal registry snapshot".to_string()));
    }
    let mut version = [0u8; 4];
    version.copy_from_slice(&bytes[SNAPSHOT_MAGIC.len()..HEADER_LEN]);
    let version = u32::from_le_bytes(version);
    if version != SNAPSHOT_VERSION {
        return Err(LoadFailure::Malformed(format!(
            "unsupported snapshot version {version} (expected {SNAPSHOT_VERSION})"
        )));
    }
    Ok(bincode::deserialize(&bytes[HEADER_LEN..])?)
}

/// Write `dataset` to `path`, replacing any previous snapshot.
pub fn write_snapshot(dataset: &DataSet, path: impl AsRef<Path>) -> RegistryResult<()> {
    let path = path.as_ref();
    let bytes = encode_snapshot(dataset).map_err(|e| RegistryError::persist(path, e))?;
    write_atomically(path, &bytes).map_err(|e| RegistryError::persist(path, e))
}

/// Read the snapshot at `path`.
pub fn read_snapshot(path: impl AsRef<Path>) -> RegistryResult<DataSet> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| RegistryError::load(path, e))?;
    decode_snapshot(&bytes).map_err(|e| RegistryError::load(path, e))
}
