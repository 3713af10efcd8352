use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::password;

/// A sign-in identity
///
/// Drivers extend an account with their license number; see
/// [`Driver`](crate::models::Driver).
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::accounts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Account {
    /// Unique identifier for the account (UUID v4 as string)
    id: String,

    /// Sign-in name, unique across accounts
    username: String,

    first_name: String,

    last_name: String,

    /// Argon2 PHC string; never sent to clients
    #[serde(skip_serializing, default)]
    password_hash: String,

    /// When the account was created
    date_joined: NaiveDateTime,
}

impl Account {
    /// Creates a new account
    ///
    /// ### Arguments
    ///
    /// * `username` - The sign-in name
    /// * `first_name` - Given name, may be empty
    /// * `last_name` - Family name, may be empty
    /// * `password_hash` - An already hashed password
    pub fn new(username: String, first_name: String, last_name: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username,
            first_name,
            last_name,
            password_hash,
            date_joined: Utc::now().naive_utc(),
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_username(&self) -> String {
        self.username.clone()
    }

    pub fn get_first_name(&self) -> String {
        self.first_name.clone()
    }

    pub fn get_last_name(&self) -> String {
        self.last_name.clone()
    }

    /// Gets the account's creation timestamp as a DateTime<Utc>
    pub fn get_date_joined(&self) -> DateTime<Utc> {
        DateTime::from_naive_utc_and_offset(self.date_joined, Utc)
    }

    /// Checks a plaintext password against the stored hash
    ///
    /// A malformed stored hash counts as a mismatch.
    pub fn check_password(&self, candidate: &str) -> bool {
        password::verify_password(candidate, &self.password_hash).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::hash_password;

    #[test]
    fn test_account_new() {
        let hash = hash_password("test123!").unwrap();
        let account = Account::new(
            "bob.halov".to_string(),
            "bob".to_string(),
            "halov".to_string(),
            hash,
        );

        assert_eq!(account.get_username(), "bob.halov");
        assert_eq!(account.get_first_name(), "bob");
        assert_eq!(account.get_last_name(), "halov");
        assert!(Uuid::parse_str(&account.get_id()).is_ok());

        let diff = Utc::now().signed_duration_since(account.get_date_joined());
        assert!(diff.num_seconds() < 1);
    }

    #[test]
    fn test_check_password() {
        let hash = hash_password("test123!").unwrap();
        let account = Account::new("bob".to_string(), String::new(), String::new(), hash);

        assert!(account.check_password("test123!"));
        assert!(!account.check_password("test123"));
    }

    #[test]
    fn test_check_password_with_malformed_hash() {
        let account = Account::new("bob".to_string(), String::new(), String::new(), "plain".to_string());
        assert!(!account.check_password("plain"));
    }

    #[test]
    fn test_password_hash_is_not_serialized() {
        let hash = hash_password("test123!").unwrap();
        let account = Account::new("bob".to_string(), String::new(), String::new(), hash);
        let json = serde_json::to_value(&account).unwrap();

        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "bob");
    }
}
