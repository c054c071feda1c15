//! Curve fitting pipeline.
//!
//! Responsibilities:
//!
//! - build the cumulative-deviation curve from a sample table
//! - fit the objective polynomial (Levenberg–Marquardt)
//! - locate the maximum slope and the derivative zero-crossings

pub mod curve;
pub mod extrema;
pub mod fitter;

pub use curve::*;
pub use extrema::*;
pub use fitter::*;
