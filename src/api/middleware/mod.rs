//! HTTP middleware for request processing and protection.
//!
//! Provides session authentication and request tracing.

pub mod auth;
pub mod tracing;
