use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "contact_status", rename_all = "snake_case")]
pub enum ContactStatus {
    New,
    InProgress,
    Completed,
}

impl ContactStatus {
    pub const ALL: [ContactStatus; 3] = [ContactStatus::New, ContactStatus::InProgress, ContactStatus::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContactStatus::New => "new",
            ContactStatus::InProgress => "in_progress",
            ContactStatus::Completed => "completed",
        }
    }
}

impl std::str::FromStr for ContactStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContactStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| format!("unknown status '{}' (expected new, in_progress or completed)", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "contact_source", rename_all = "lowercase")]
pub enum ContactSource {
    Contact,
    Order,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub company: Option<String>,
    pub message: Option<String>,
    pub product_id: Option<Uuid>,
    pub product_name: Option<String>,
    pub source: ContactSource,
    pub status: ContactStatus,
    pub notes: Option<String>,
    pub contacted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public contact/order form as posted by the site.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    #[serde(alias = "message")]
    pub comment: Option<String>,
    pub product_id: Option<Uuid>,
    pub product_name: Option<String>,
    #[serde(default)]
    pub consent: bool,
}

/// Validated and sanitized form, ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewContactRequest {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub company: Option<String>,
    pub message: Option<String>,
    pub product_id: Option<Uuid>,
    pub product_name: Option<String>,
    pub source: ContactSource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdate {
    pub status: ContactStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotesUpdate {
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_text_round_trip() {
        for st in ContactStatus::ALL {
            assert_eq!(st.as_str().parse::<ContactStatus>().unwrap(), st);
        }
        assert!("done".parse::<ContactStatus>().is_err());
    }

    #[test]
    fn status_json_uses_snake_case() {
        let v = serde_json::to_value(ContactStatus::InProgress).unwrap();
        assert_eq!(v, "in_progress");
        let st: ContactStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(st, ContactStatus::Completed);
    }

    #[test]
    fn form_accepts_message_alias() {
        let f: ContactForm = serde_json::from_str(
            r#"{"name":"Иван","phone":"+79991234567","message":"Нужен насос","consent":true}"#,
        )
        .unwrap();
        assert_eq!(f.comment.as_deref(), Some("Нужен насос"));
        assert!(f.consent);
    }
}
