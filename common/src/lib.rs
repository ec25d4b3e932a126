//! Shared harness plumbing: configuration loading and logger setup.

pub mod config;
pub mod logger;

pub use config::HarnessConfig;
