//! Login session entity.

use chrono::{DateTime, Utc};

/// A session issued to a user. Only the token hash is persisted.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: i64,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Returns true if the session is neither revoked nor expired at `now`.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.revoked_at.is_none() && now < self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session(expires_in: Duration, revoked: bool) -> Session {
        let now = Utc::now();
        Session {
            id: 1,
            user_id: "u1".to_string(),
            created_at: now,
            expires_at: now + expires_in,
            revoked_at: revoked.then_some(now),
        }
    }

    #[test]
    fn test_active_session() {
        assert!(session(Duration::hours(1), false).is_active_at(Utc::now()));
    }

    #[test]
    fn test_expired_session() {
        assert!(!session(Duration::seconds(-1), false).is_active_at(Utc::now()));
    }

    #[test]
    fn test_revoked_session() {
        assert!(!session(Duration::hours(1), true).is_active_at(Utc::now()));
    }
}
