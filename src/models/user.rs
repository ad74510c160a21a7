use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Placeholder a missing name is coerced to before its length is taken.
pub const MISSING_NAME: &str = "None";

/// User record as returned by the remote API and stored in the snapshot.
///
/// Fields the API sends that are not listed here (address, company) are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

/// How `name_length` treats a user without a name
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameLengthPolicy {
    /// Measure the coerced string "None"
    #[default]
    Source,
    /// A missing name has length 0
    NullSafe,
}

impl FromStr for NameLengthPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "source" => Ok(Self::Source),
            "null_safe" | "nullsafe" => Ok(Self::NullSafe),
            other => Err(format!("unknown name length policy: {other}")),
        }
    }
}

/// Snapshot row plus the display-only fields computed on load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserView {
    pub id: i64,
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub name_length: i64,
    pub email_domain: Option<String>,
}

impl UserView {
    pub fn derive(user: User, policy: NameLengthPolicy) -> Self {
        let name_length = name_length(user.name.as_deref(), policy);
        let email_domain = email_domain(user.email.as_deref());

        Self {
            id: user.id,
            name: user.name,
            username: user.username,
            email: user.email,
            phone: user.phone,
            website: user.website,
            name_length,
            email_domain,
        }
    }

    /// Name as the charts see it: missing names become "None".
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(MISSING_NAME)
    }

    /// Upper-cased first character of the display name.
    pub fn initial(&self) -> Option<String> {
        self.display_name()
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
    }
}

/// Character count of a name, counted in Unicode scalar values.
pub fn name_length(name: Option<&str>, policy: NameLengthPolicy) -> i64 {
    let length = match (name, policy) {
        (Some(name), _) => name.chars().count(),
        (None, NameLengthPolicy::Source) => MISSING_NAME.chars().count(),
        (None, NameLengthPolicy::NullSafe) => 0,
    };
    i64::try_from(length).unwrap_or(i64::MAX)
}

/// Lower-cased text after the last `@`, or `None` when there is no `@`.
pub fn email_domain(email: Option<&str>) -> Option<String> {
    let (_, domain) = email?.rsplit_once('@')?;
    Some(domain.to_lowercase())
}

/// Result of a refresh as reported to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshOutcome {
    pub count: u64,
    pub refreshed_at: DateTime<Utc>,
    /// True when the outcome was served from the memoization window
    pub cached: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: Option<&str>, email: Option<&str>) -> User {
        User {
            id: 1,
            name: name.map(str::to_string),
            username: Some("Bret".to_string()),
            email: email.map(str::to_string),
            phone: None,
            website: None,
        }
    }

    #[test]
    fn test_name_length_counts_characters() {
        let view = UserView::derive(
            user(Some("Leanne Graham"), Some("Sincere@april.biz")),
            NameLengthPolicy::Source,
        );
        assert_eq!(view.name_length, 13);
    }

    #[test]
    fn test_name_length_counts_chars_not_bytes() {
        assert_eq!(name_length(Some("Jos\u{e9} N\u{fa}\u{f1}ez"), NameLengthPolicy::Source), 10);
    }

    #[test]
    fn test_missing_name_policies() {
        assert_eq!(name_length(None, NameLengthPolicy::Source), 4);
        assert_eq!(name_length(None, NameLengthPolicy::NullSafe), 0);
    }

    #[test]
    fn test_email_domain_is_lowercased_after_last_at() {
        assert_eq!(email_domain(Some("a.b@Example.COM")).as_deref(), Some("example.com"));
        assert_eq!(email_domain(Some("odd@name@Host.ORG")).as_deref(), Some("host.org"));
    }

    #[test]
    fn test_email_domain_missing() {
        assert_eq!(email_domain(None), None);
        assert_eq!(email_domain(Some("no-at-sign.example.com")), None);
    }

    #[test]
    fn test_initial_uses_coerced_name() {
        let named = UserView::derive(user(Some("ervin Howell"), None), NameLengthPolicy::Source);
        assert_eq!(named.initial().as_deref(), Some("E"));

        let anonymous = UserView::derive(user(None, None), NameLengthPolicy::Source);
        assert_eq!(anonymous.initial().as_deref(), Some("N"));

        let empty = UserView::derive(user(Some(""), None), NameLengthPolicy::Source);
        assert_eq!(empty.initial(), None);
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("source".parse::<NameLengthPolicy>(), Ok(NameLengthPolicy::Source));
        assert_eq!("NULL_SAFE".parse::<NameLengthPolicy>(), Ok(NameLengthPolicy::NullSafe));
        assert!("zero".parse::<NameLengthPolicy>().is_err());
    }

    #[test]
    fn test_api_payload_ignores_extra_fields() {
        let payload = r#"{
            "id": 1,
            "name": "Leanne Graham",
            "username": "Bret",
            "email": "Sincere@april.biz",
            "address": { "city": "Gwenborough" },
            "phone": "1-770-736-8031 x56442",
            "website": "hildegard.org",
            "company": { "name": "Romaguera-Crona" }
        }"#;
        let parsed: User = serde_json::from_str(payload).unwrap();
        assert_eq!(parsed.id, 1);
        assert_eq!(parsed.website.as_deref(), Some("hildegard.org"));

        let sparse: User = serde_json::from_str(r#"{ "id": 2 }"#).unwrap();
        assert_eq!(sparse.name, None);
    }
}
