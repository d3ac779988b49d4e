//! Username rules for account creation and public profile lookup.

use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

use crate::error::AppError;

static USERNAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.]{3,30}$").expect("valid username regex"));

/// Maximum length of a username accepted on the public lookup path.
pub const MAX_LOOKUP_LEN: usize = 50;

/// Names that would shadow top-level routes or impersonate the service.
const RESERVED_USERNAMES: &[&str] = &[
    "admin",
    "api",
    "auth",
    "authentication",
    "clicks",
    "dashboard",
    "go",
    "health",
    "help",
    "login",
    "logout",
    "register",
    "root",
    "settings",
    "signin",
    "signup",
    "static",
    "support",
    "system",
];

/// Validates a username chosen at sign-up and returns its stored form.
///
/// # Rules
///
/// - Length: 3-30 characters
/// - Allowed characters: ASCII letters, digits, `_` and `.`
/// - Cannot be a reserved name (compared case-insensitively)
///
/// # Errors
///
/// Returns [`AppError::Validation`] naming the violated rule.
pub fn normalize_new_username(input: &str) -> Result<String, AppError> {
    if !USERNAME_REGEX.is_match(input) {
        return Err(AppError::bad_request(
            "Username must be 3-30 characters of letters, digits, '_' or '.'",
            json!({ "username": input }),
        ));
    }

    let lowered = input.to_ascii_lowercase();
    if RESERVED_USERNAMES.contains(&lowered.as_str()) {
        return Err(AppError::bad_request(
            "This username is reserved",
            json!({ "username": input }),
        ));
    }

    Ok(lowered)
}

/// Normalizes a username taken from a public profile URL.
///
/// Returns `None` when the input cannot name any account.
pub fn normalize_lookup(input: &str) -> Option<String> {
    if input.is_empty() || input.chars().count() > MAX_LOOKUP_LEN {
        return None;
    }
    Some(input.to_lowercase())
}
