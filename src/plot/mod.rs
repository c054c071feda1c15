//! Terminal plots (plain text).

pub mod ascii;

pub use ascii::*;
