//! # API Shared
//!
//! Shared definitions for the triage APIs.
//!
//! Contains:
//! - Request/response DTOs with OpenAPI schemas (`dto` module)
//! - Query-string helpers
//! - Shared services like `HealthService`
//!
//! Used by `api-rest` and the root binary for common functionality.

pub mod dto;
pub mod health;
pub mod query;

pub use dto::*;
pub use health::HealthService;
