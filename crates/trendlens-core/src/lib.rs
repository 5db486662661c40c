//! # trendlens-core
//!
//! Core types, traits, and configuration for the trendlens signal engine.
//!
//! This crate provides the domain data structures (queries, interest
//! series, momentum and opportunity scores, clusters), the collaborator
//! traits that supply inputs and persist outputs, and the shared defaults
//! that scoring crates depend on.

pub mod config;
pub mod defaults;
pub mod error;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use config::{ConfigError, ConfigResult, ScoringConfig};
pub use error::{Error, Result};
pub use models::*;
pub use traits::*;
