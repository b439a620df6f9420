//! Helpdesk data model.
//!
//! Field names follow the document layout used by the store (camelCase),
//! so records written by earlier tooling stay readable.

use chrono::{DateTime, Utc};
use helpdesk_core::{AppError, AppResult};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};

use crate::store::{Document, Fields};

/// Collection holding FAQ entries.
pub const FAQS: &str = "faqs";

/// Collection holding query audit records.
pub const QUERY_LOGS: &str = "queryLogs";

/// Collection holding admin membership records.
pub const ADMINS: &str = "admins";

/// Category assigned when none is given.
pub const DEFAULT_CATEGORY: &str = "General Information";

/// User id recorded on query logs; end users are not identified.
pub const ANONYMOUS_USER: &str = "anonymous";

/// Categories offered to curators. Category stays free text; these are suggestions.
pub const KNOWN_CATEGORIES: [&str; 9] = [
    "General Information",
    "Academics",
    "Enrollment",
    "Grading",
    "Attendance",
    "Fees and Financial Aid",
    "Campus Services",
    "Student Conduct",
    "Other",
];

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

/// Read an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_default_category<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_category))
}

/// A curated question/answer pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqEntry {
    /// Store-assigned identifier (not part of the stored fields)
    #[serde(default)]
    pub id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub question: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub answer: String,

    #[serde(
        default = "default_category",
        deserialize_with = "null_as_default_category"
    )]
    pub category: String,

    /// Up to five tokens extracted from the question
    #[serde(default, deserialize_with = "null_as_default")]
    pub keywords: Vec<String>,

    /// Missing and `null` both count as zero views
    #[serde(default, deserialize_with = "null_as_default")]
    pub view_count: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Input for creating an FAQ entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewFaq {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub category: Option<String>,
}

impl NewFaq {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Partial update of an FAQ entry; `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct FaqUpdate {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub category: Option<String>,
}

impl FaqUpdate {
    pub fn is_empty(&self) -> bool {
        self.question.is_none() && self.answer.is_none() && self.category.is_none()
    }
}

/// Audit record of one user interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryLogEntry {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub question: String,

    #[serde(default)]
    pub answer: String,

    #[serde(
        rename = "relatedFAQCount",
        default,
        deserialize_with = "null_as_default"
    )]
    pub related_faq_count: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,

    /// Unset until the user rates the answer
    #[serde(default)]
    pub was_helpful: Option<bool>,

    #[serde(default = "anonymous")]
    pub user_id: String,
}

fn anonymous() -> String {
    ANONYMOUS_USER.to_string()
}

/// Admin membership record. Presence in the `admins` collection grants admin rights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminRecord {
    /// Identity-provider user id; doubles as the document id
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// Decode a stored document into a record, restoring its id.
pub(crate) fn decode<T: DeserializeOwned>(document: Document) -> AppResult<T> {
    let Document { id, mut fields } = document;
    fields.insert("id".to_string(), serde_json::Value::String(id.clone()));

    serde_json::from_value(serde_json::Value::Object(fields))
        .map_err(|e| AppError::Store(format!("Malformed document '{}': {}", id, e)))
}

/// Encode a record into stored fields. The id lives outside the fields.
pub(crate) fn encode<T: Serialize>(record: &T) -> AppResult<Fields> {
    match serde_json::to_value(record)? {
        serde_json::Value::Object(mut fields) => {
            fields.remove("id");
            Ok(fields)
        }
        other => Err(AppError::Serialization(format!(
            "Expected an object, got {}",
            other
        ))),
    }
}
