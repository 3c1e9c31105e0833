// src/lib.rs
pub mod cli;
pub mod core;
pub mod delivery;
pub mod errors;
pub mod format;
pub mod listings;
pub mod polling;
pub mod types;
pub mod utils;
pub mod web;

pub use delivery::DeliveryAdapter;
pub use errors::{PipelineError, PipelineResult};
pub use listings::{Job, JobBatch};
pub use polling::run_polling;
pub use web::start_web_server;
