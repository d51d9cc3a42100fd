//! Domain types used throughout the dashboard.
//!
//! This module defines:
//!
//! - the selectbox vocabularies (`SoilCondition`, `SeedQuality`, `Weather`, ...)
//! - the dashboard `Variant`
//! - the farm profile record (`FarmProfile`) and its validation

pub mod types;

pub use types::*;
