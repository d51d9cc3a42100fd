//! Input/output helpers.
//!
//! - profile JSON read/write (`profile`)
//! - chart data and transcript exports (`export`)

pub mod export;
pub mod profile;

pub use export::*;
pub use profile::*;
