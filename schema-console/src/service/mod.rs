//! Query service abstraction
//!
//! This module provides the seam to the remote schema-introspection and
//! SQL generation/execution capabilities.

pub mod http;
pub mod traits;

// Re-export the main trait
pub use traits::{QueryService, ServiceError};
