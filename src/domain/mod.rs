//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - run configuration (`AnalysisConfig`, `MonitorConfig`, `SampleConfig`)
//! - the explicit model size (`Degree`)
//! - stage outputs (`CurveSeries`, `FitResult`, `Extrema`, ...)

pub mod types;

pub use types::*;
