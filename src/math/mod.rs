//! Mathematical utilities: rolling-window statistics.

pub mod rolling;

pub use rolling::*;
