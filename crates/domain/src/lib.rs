//! # ProfileSync Domain
//!
//! Business domain types for profile synchronization.
//!
//! This crate contains:
//! - The `Profile` record and its audit outcome types
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants (reason strings, defaults)
//!
//! ## Architecture
//! - No dependencies on other ProfileSync crates
//! - Pure data types, no I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
