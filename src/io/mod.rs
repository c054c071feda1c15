//! Input/output helpers.
//!
//! - CSV ingest into a `SampleTable` (`ingest`)

pub mod ingest;

pub use ingest::*;
