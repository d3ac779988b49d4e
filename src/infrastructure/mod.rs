//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer and the
//! shared rate limiter used by the HTTP layer.
//!
//! # Modules
//!
//! - [`persistence`] - PostgreSQL repository implementations
//! - [`rate_limit`] - Keyed fixed-window limiters (in-process and Redis)

pub mod persistence;
pub mod rate_limit;
