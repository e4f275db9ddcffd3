use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Persisted user record, one element of the `users` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub username: String,
    pub email: String,         // unique, compared case-insensitively
    pub password_hash: String, // Argon2 PHC string
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl UserRecord {
    pub fn new(username: &str, email: &str, password_hash: String) -> Self {
        Self {
            username: username.trim().to_string(),
            email: email.trim().to_string(),
            password_hash,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    pub fn has_email(&self, email: &str) -> bool {
        self.email.to_lowercase() == email.trim().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_keys() {
        let user = UserRecord {
            username: "alice".into(),
            email: "a@x.com".into(),
            password_hash: "$argon2id$stub".into(),
            created_at: time::macros::datetime!(2024-05-01 12:00 UTC),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["passwordHash"], "$argon2id$stub");
        assert_eq!(json["createdAt"], "2024-05-01T12:00:00Z");
        assert!(json.get("password").is_none());
    }

    #[test]
    fn email_match_ignores_case_and_padding() {
        let user = UserRecord::new(" alice ", "Alice@Example.com", String::new());
        assert_eq!(user.username, "alice");
        assert!(user.has_email("alice@example.COM"));
        assert!(user.has_email(" ALICE@example.com"));
        assert!(!user.has_email("bob@example.com"));
    }
}
