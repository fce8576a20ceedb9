//! User profile type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::email::Email;
use super::id::UserId;

/// The signed-in user, as returned by the profile and registration endpoints.
///
/// Read-only from the client's point of view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    #[serde(default, alias = "created_at", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_user_deserializes_profile_shape() {
        let user: User = serde_json::from_value(json!({
            "id": 1,
            "name": "Ana",
            "email": "ana@example.com",
            "createdAt": "2025-01-10T08:30:00Z"
        }))
        .unwrap();

        assert_eq!(user.id, UserId::new(1));
        assert_eq!(user.email.as_str(), "ana@example.com");
        assert!(user.created_at.is_some());
    }

    #[test]
    fn test_user_ignores_unknown_fields() {
        let user: User = serde_json::from_value(json!({
            "id": 2,
            "name": "Bo",
            "email": "bo@example.com",
            "password": "hash"
        }))
        .unwrap();
        assert_eq!(user.name, "Bo");
        assert_eq!(user.created_at, None);
    }
}
