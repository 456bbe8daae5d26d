pub mod config;

pub use config::{FailurePolicy, RunConfig};
