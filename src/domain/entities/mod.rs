//! Core domain entities.
//!
//! Entities are plain data structures; creation inputs live in separate
//! `New*` structs and partial updates in `*Patch` structs.
//!
//! - [`Link`] - An outbound link with its position and lifetime click total
//! - [`DailyClicks`] - Per-link, per-UTC-day click aggregate
//! - [`User`] - Owner of a link list, looked up by username for public profiles
//! - [`Session`] - Authenticated login session

pub mod click;
pub mod link;
pub mod session;
pub mod user;

pub use click::{ClickOutcome, DailyClicks, day_key, utc_day};
pub use link::{Link, LinkPatch, NewLink, PublicLink, RedirectTarget};
pub use session::Session;
pub use user::{NewUser, User};
