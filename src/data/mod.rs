//! Sample data: the in-memory table and the synthetic trial generator.

pub mod sample;
pub mod table;

pub use sample::{generate_trials, write_trials_csv};
pub use table::{Row, SampleTable};
