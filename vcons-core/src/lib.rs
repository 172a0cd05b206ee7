//! # Core models for vcons
//!
//! Shared types used across the vcons workspace:
//!
//! - [`VariantRecord`](models::VariantRecord): one variant call, as produced by a variant source
//! - [`PositionInterval`](models::PositionInterval): a closed range of reference positions
//! - [`ConfigError`](errors::ConfigError): validation failures for user supplied configuration
//! - reader helpers for plain or gzip'd inputs
pub mod errors;
pub mod models;
pub mod utils;

pub use errors::ConfigError;
