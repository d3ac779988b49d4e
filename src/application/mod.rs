//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! validation, rate limiting and retries. Services consume repository traits
//! and provide a clean API for HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Ordered link management
//! - [`services::click_service::ClickService`] - Click recording and daily stats
//! - [`services::profile_service::ProfileService`] - Public profiles
//! - [`services::auth_service::AuthService`] - Users and session authentication

pub mod services;
