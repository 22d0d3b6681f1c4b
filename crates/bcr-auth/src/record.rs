//! Account data model.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Username and plaintext password as received from a client.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Spending profile attached to every account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum Category {
    Saver = 0,
    Spender = 1,
    AntiUser = 2,
    Young = 3,
}

impl Category {
    /// Wire value meaning "not set".
    pub const UNSET: i32 = -1;

    /// Category assigned when registration leaves it unset.
    pub const DEFAULT: Self = Self::AntiUser;

    /// Map a wire code to a category. `None` for anything outside `0..=3`.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Saver),
            1 => Some(Self::Spender),
            2 => Some(Self::AntiUser),
            3 => Some(Self::Young),
            _ => None,
        }
    }

    #[inline]
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Saver => "saver",
            Self::Spender => "spender",
            Self::AntiUser => "anti_user",
            Self::Young => "young",
        }
    }
}

impl TryFrom<i32> for Category {
    type Error = String;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or_else(|| format!("unknown category {code}"))
    }
}

impl From<Category> for i32 {
    fn from(category: Category) -> Self {
        category.code()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored account. `password_hash` is always a bcrypt hash, never plaintext.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub category: Category,
}

impl UserRecord {
    /// The record without its password hash.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            username: self.username.clone(),
            email: self.email.clone(),
            category: self.category,
        }
    }
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

/// Account data safe to hand back to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    pub email: String,
    pub category: Category,
}

/// Registration input.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: String,
    /// Raw category code; absent or `-1` means the default.
    #[serde(default)]
    pub category: Option<i32>,
}

impl NewUser {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        email: impl Into<String>,
        category: Option<i32>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            email: email.into(),
            category,
        }
    }
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

/// Fields an update may change. Absent fields keep their current value.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UserUpdate {
    #[serde(default)]
    pub new_password: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub category: Option<i32>,
}

impl fmt::Debug for UserUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserUpdate")
            .field("new_password", &self.new_password.as_ref().map(|_| "<redacted>"))
            .field("email", &self.email)
            .field("category", &self.category)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_codes() {
        for code in 0..=3 {
            assert_eq!(Category::from_code(code).unwrap().code(), code);
        }
        assert_eq!(Category::from_code(Category::UNSET), None);
        assert_eq!(Category::from_code(4), None);
        assert_eq!(Category::DEFAULT, Category::AntiUser);
    }

    #[test]
    fn test_category_serde_as_integer() {
        assert_eq!(serde_json::to_string(&Category::Young).unwrap(), "3");
        let c: Category = serde_json::from_str("1").unwrap();
        assert_eq!(c, Category::Spender);
        assert!(serde_json::from_str::<Category>("9").is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let record = UserRecord {
            username: "alice".into(),
            password_hash: "$2b$04$secret".into(),
            email: "a@x.com".into(),
            category: Category::Saver,
        };
        assert!(!format!("{record:?}").contains("secret"));

        let creds = Credentials::new("alice", "Secret123");
        assert!(!format!("{creds:?}").contains("Secret123"));
    }

    #[test]
    fn test_profile_drops_hash() {
        let record = UserRecord {
            username: "alice".into(),
            password_hash: "$2b$04$hash".into(),
            email: "a@x.com".into(),
            category: Category::Spender,
        };
        let json = serde_json::to_value(record.profile()).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["category"], 1);
    }
}
