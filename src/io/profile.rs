//! Read/write farm profile JSON files.
//!
//! Profile JSON is the only persisted form of a `FarmProfile`. Missing fields
//! fall back to the widget defaults of the active variant, so a file can be
//! as small as `{"pest_observed": true}`.

use std::fs::File;
use std::path::Path;

use serde_json::Value;

use crate::domain::{FarmProfile, Variant};
use crate::error::AppError;

/// Write a profile JSON file.
pub fn write_profile_json(path: &Path, profile: &FarmProfile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::runtime(format!("Failed to create profile JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, profile)
        .map_err(|e| AppError::runtime(format!("Failed to write profile JSON: {e}")))?;
    tracing::info!(path = %path.display(), "saved profile");
    Ok(())
}

/// Read a profile JSON file, filling missing fields from `variant`'s defaults.
///
/// Values present in the file are kept as written, even when they fall
/// outside `variant`'s vocabulary; validation reports those.
pub fn read_profile_json(path: &Path, variant: Variant) -> Result<FarmProfile, AppError> {
    let invalid = |e: serde_json::Error| {
        AppError::input(format!("Invalid profile JSON '{}': {e}", path.display()))
    };

    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open profile JSON '{}': {e}", path.display())))?;
    let overrides: Value = serde_json::from_reader(file).map_err(invalid)?;
    if !overrides.is_object() {
        return Err(AppError::input(format!(
            "Invalid profile JSON '{}': expected an object.",
            path.display()
        )));
    }

    let mut merged = serde_json::to_value(FarmProfile::default_for(variant))
        .map_err(|e| AppError::runtime(format!("Failed to encode default profile: {e}")))?;
    merge(&mut merged, overrides);
    let profile: FarmProfile = serde_json::from_value(merged).map_err(invalid)?;

    tracing::debug!(path = %path.display(), ?variant, "loaded profile");
    Ok(profile)
}

/// Overlay `top` onto `base`; nested objects merge key by key.
fn merge(base: &mut Value, top: Value) {
    match (base, top) {
        (Value::Object(base), Value::Object(top)) => {
            for (key, value) in top {
                match base.get_mut(&key) {
                    Some(slot) => merge(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}
