//! Metashark Shared Types
//!
//! This crate contains types and errors shared across the Metashark gateway.

pub mod error;
pub mod types;

pub use error::CoreError;
pub use types::{Session, TenantRecord};
