pub mod dataset;
pub mod error;
pub mod evaluator;
pub mod funds;
pub mod indicators;
pub mod labels;
pub mod model;
pub mod ranker;
pub mod services;
pub mod trainer;

pub use error::SkipReason;
