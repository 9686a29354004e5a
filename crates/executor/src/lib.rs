pub mod run;
pub mod services;

pub use run::{RunReport, run_once};
