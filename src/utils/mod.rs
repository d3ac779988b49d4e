//! Utility functions for identifiers, input validation and request handling.
//!
//! - [`id_generator`] - Random link and user ids
//! - [`url_validator`] - Link target validation
//! - [`username`] - Username rules for sign-up and profile lookup
//! - [`client_ip`] - Client IP resolution behind optional proxies

pub mod client_ip;
pub mod id_generator;
pub mod url_validator;
pub mod username;
