use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileRecordType {
    Profile,
}

/// Persisted slice of the session. Credentials are intentionally absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileDocument {
    #[serde(rename = "type")]
    pub record_type: ProfileRecordType,
    pub version: u32,
    pub user: Option<UserSummary>,
}

impl ProfileDocument {
    #[must_use]
    pub fn v1(user: Option<UserSummary>) -> Self {
        Self {
            record_type: ProfileRecordType::Profile,
            version: 1,
            user,
        }
    }
}

/// Lightweight identity record for the signed-in operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl UserSummary {
    #[must_use]
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            display_name: None,
            role: None,
        }
    }
}
