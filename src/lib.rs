//! `score-curves` library crate.
//!
//! The binary (`scurve`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the analysis pipeline is shared by the text and TUI front-ends

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod monitor;
pub mod plot;
pub mod report;
pub mod tui;
