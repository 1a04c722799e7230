//! CLI command implementations.

mod config;
mod doctor;
mod prompts;
mod run;

pub use config::run_config;
pub use doctor::run_doctor;
pub use prompts::run_prompts;
pub use run::{run_pipeline, RunOptions};
