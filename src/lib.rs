//! `agri-yield` library crate.
//!
//! The binary (`agri`) is a thin wrapper around this library so that:
//!
//! - the estimator, prompt builder and tile math are testable without a terminal
//! - the CLI and the dashboard share one analysis pipeline
//! - the advisor can be driven against a mock HTTP server in tests

pub mod advisor;
pub mod app;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod estimator;
pub mod io;
pub mod logging;
pub mod map;
pub mod plot;
pub mod report;
pub mod tui;
