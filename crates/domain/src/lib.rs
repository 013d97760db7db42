//! # ContactSync Domain
//!
//! Business domain types for mirroring companies and contacts into an
//! external contact directory.
//!
//! This crate contains:
//! - Change events, contactable entities and provider-tagged references
//! - Domain error types and Result definitions
//! - Configuration structures
//!
//! ## Architecture
//! - No dependencies on other ContactSync crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
