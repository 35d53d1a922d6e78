#![forbid(unsafe_code)]

//! Row shapes for the document and chat tables.
//!
//! Ingestion and chat logic live elsewhere; these types only describe what that
//! logic reads and writes through the shared pool.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub const DOCUMENT_TITLE_MAX: usize = 500;
pub const DOCUMENT_SOURCE_URL_MAX: usize = 1000;
pub const DOCUMENT_VILLAGE_MAX: usize = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "db-postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "db-postgres",
    sqlx(type_name = "document_type", rename_all = "UPPERCASE")
)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Harmonogram,
    Regulamin,
    Zasady,
    Informacja,
    Kontakt,
}

impl DocumentType {
    pub const ALL: [DocumentType; 5] = [
        DocumentType::Harmonogram,
        DocumentType::Regulamin,
        DocumentType::Zasady,
        DocumentType::Informacja,
        DocumentType::Kontakt,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DocumentType::Harmonogram => "harmonogram",
            DocumentType::Regulamin => "regulamin",
            DocumentType::Zasady => "zasady",
            DocumentType::Informacja => "informacja",
            DocumentType::Kontakt => "kontakt",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "db-postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "db-postgres",
    sqlx(type_name = "processing_status", rename_all = "UPPERCASE")
)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Failed,
}

impl ProcessingStatus {
    pub const ALL: [ProcessingStatus; 4] = [
        ProcessingStatus::Pending,
        ProcessingStatus::Processing,
        ProcessingStatus::Completed,
        ProcessingStatus::Failed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProcessingStatus::Pending => "pending",
            ProcessingStatus::Processing => "processing",
            ProcessingStatus::Completed => "completed",
            ProcessingStatus::Failed => "failed",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown message role `{0}`")]
pub struct UnknownRole(pub String);

impl FromStr for MessageRole {
    type Err = UnknownRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db-postgres", derive(sqlx::FromRow))]
pub struct Document {
    pub id: Uuid,
    pub title: String,
    pub source_url: Option<String>,
    pub document_type: DocumentType,
    pub village: Option<String>,
    pub content: String,
    /// Nullable in the table; new documents start as `Some(Pending)`.
    pub status: Option<ProcessingStatus>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// A pending document with a fresh id; timestamps are set to now.
    pub fn new(
        title: impl Into<String>,
        document_type: DocumentType,
        content: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            source_url: None,
            document_type,
            village: None,
            content: content.into(),
            status: Some(ProcessingStatus::default()),
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    pub fn with_village(mut self, village: impl Into<String>) -> Self {
        self.village = Some(village.into());
        self
    }

    /// Column-width violations, if any.
    pub fn length_violations(&self) -> Vec<&'static str> {
        let mut violations = Vec::new();
        if self.title.chars().count() > DOCUMENT_TITLE_MAX {
            violations.push("title");
        }
        if exceeds(self.source_url.as_deref(), DOCUMENT_SOURCE_URL_MAX) {
            violations.push("source_url");
        }
        if exceeds(self.village.as_deref(), DOCUMENT_VILLAGE_MAX) {
            violations.push("village");
        }
        violations
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db-postgres", derive(sqlx::FromRow))]
pub struct DocumentChunk {
    pub id: Uuid,
    pub document_id: Uuid,
    pub content: String,
    pub chunk_index: i32,
    pub vector_id: Option<String>,
}

impl DocumentChunk {
    pub fn new(document_id: Uuid, chunk_index: i32, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id,
            content: content.into(),
            chunk_index,
            vector_id: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db-postgres", derive(sqlx::FromRow))]
pub struct ChatSession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

/// `role` stays a plain string column; [`MessageRole`] names the accepted values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db-postgres", derive(sqlx::FromRow))]
pub struct ChatMessage {
    pub id: Uuid,
    pub session_id: Uuid,
    pub role: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(session_id: Uuid, role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id,
            role: role.as_str().to_string(),
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    pub fn role(&self) -> Result<MessageRole, UnknownRole> {
        self.role.parse()
    }
}

/// Messages of one session in conversation order.
pub fn order_messages(messages: &mut [ChatMessage]) {
    messages.sort_by(|lhs, rhs| lhs.created_at.cmp(&rhs.created_at));
}

fn exceeds(value: Option<&str>, max: usize) -> bool {
    value.map(|v| v.chars().count() > max).unwrap_or(false)
}
