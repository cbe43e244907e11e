#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Versioned save-file adapter for the economy profile.
//!
//! Only the profile persists between sessions; round state is always
//! discarded. Saves are a JSON envelope carrying a schema version so older
//! files can be migrated forward on load.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use zen_garden_core::ProfileSnapshot;

/// Schema version written by this build.
pub const SCHEMA_VERSION: u32 = 1;

/// Failures surfaced by the save-file adapter.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The file could not be read or written.
    #[error("failed to access save file: {0}")]
    Io(#[from] io::Error),
    /// The file exists but does not decode.
    #[error("save file is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    /// The file was written by a newer build.
    #[error("save file version {0} is newer than this build supports")]
    UnsupportedVersion(u32),
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    version: u32,
    profile: Value,
}

/// Writes the profile to `path` under the current schema version.
pub fn save_profile(path: &Path, profile: &ProfileSnapshot) -> Result<(), StoreError> {
    let envelope = Envelope {
        version: SCHEMA_VERSION,
        profile: serde_json::to_value(profile)?,
    };
    let text = serde_json::to_string_pretty(&envelope)?;
    fs::write(path, text)?;
    Ok(())
}

/// Loads the profile from `path`, migrating older schemas forward.
///
/// A missing file is not an error; it simply yields no profile.
pub fn load_profile(path: &Path) -> Result<Option<ProfileSnapshot>, StoreError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(error) => return Err(error.into()),
    };
    let envelope: Envelope = serde_json::from_str(&text)?;
    migrate(envelope).map(Some)
}

fn migrate(envelope: Envelope) -> Result<ProfileSnapshot, StoreError> {
    match envelope.version {
        // Version 0 predates the spendable coin balance; seed it from the
        // lifetime point total.
        0 => {
            let mut profile = envelope.profile;
            if let Value::Object(fields) = &mut profile {
                if !fields.contains_key("coins") {
                    let coins = fields
                        .get("total_points")
                        .cloned()
                        .unwrap_or_else(|| Value::from(0u64));
                    let _ = fields.insert("coins".to_owned(), coins);
                }
            }
            Ok(serde_json::from_value(profile)?)
        }
        SCHEMA_VERSION => Ok(serde_json::from_value(envelope.profile)?),
        version => Err(StoreError::UnsupportedVersion(version)),
    }
}
