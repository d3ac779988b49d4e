//! Domain layer containing business entities and rules.
//!
//! Independent of infrastructure and presentation concerns.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`position`] - Ordering rules for a user's link list
//!
//! # Mutation Flow
//!
//! 1. Service validates input and resolves the owned link via [`repositories::LinkRepository`]
//! 2. [`position`] computes the new position assignment, if any
//! 3. The repository applies all affected rows in one transaction
//! 4. A uniqueness conflict from a concurrent writer is retried by the service

pub mod entities;
pub mod position;
pub mod repositories;
