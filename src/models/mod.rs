//! Polynomial model used as the fit objective.
//!
//! Models are small immutable values so that fitting and reporting code can
//! evaluate them with any coefficient vector.

pub mod polynomial;

pub use polynomial::*;
