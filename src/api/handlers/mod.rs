//! HTTP request handlers.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
pub mod links;
pub mod public;

pub use health::health_handler;
pub use links::{
    create_link_handler, delete_link_handler, get_link_handler, link_clicks_handler,
    list_links_handler, move_link_handler, update_link_handler,
};
pub use public::{profile_handler, record_click_handler, redirect_handler};
