//! Observability plumbing for scorewatch

mod logging;

pub use logging::{init_from_env, init_logging, LogFormat};
