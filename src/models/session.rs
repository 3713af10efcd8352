use chrono::{Duration, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// A signed-in session
///
/// Only the SHA-256 of the session token is stored; the token itself is
/// handed to the client once, at login.
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::sessions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Session {
    token_hash: String,
    account_id: String,
    created_at: NaiveDateTime,
    expires_at: NaiveDateTime,
    /// Times the index page was opened in this session
    visits: i32,
}

impl Session {
    /// Creates a session for `account_id` that lasts `ttl` from now
    pub fn new(token_hash: String, account_id: String, ttl: Duration) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            token_hash,
            account_id,
            created_at: now,
            expires_at: now.checked_add_signed(ttl).unwrap_or(NaiveDateTime::MAX),
            visits: 0,
        }
    }

    pub fn get_token_hash(&self) -> String {
        self.token_hash.clone()
    }

    pub fn get_account_id(&self) -> String {
        self.account_id.clone()
    }

    pub fn get_expires_at(&self) -> NaiveDateTime {
        self.expires_at
    }

    pub fn get_visits(&self) -> i32 {
        self.visits
    }

    pub fn is_expired_at(&self, now: NaiveDateTime) -> bool {
        self.expires_at <= now
    }
}
