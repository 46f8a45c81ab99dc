use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata for an uploaded resume file. Present only when a binary file
/// was stored; text-only resumes carry `None` and are synthesized on
/// download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    pub storage_key: String,
    pub original_file_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
}

/// A persisted resume. At most one exists per `owner_id`.
///
/// Field names are camelCase on the wire, the contract the frontend
/// consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeRecord {
    pub id: Uuid,
    pub owner_id: String,
    pub name: String,
    pub email: String,
    pub title: String,
    pub description: String,
    pub skills: String,
    pub experience: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_metadata: Option<FileMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    pub views: i64,
    pub downloads: i64,
    pub is_updated: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The free-text portion of a resume, as submitted by the client.
/// `name` and `email` are required; the rest default to empty strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeFields {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub skills: String,
    #[serde(default)]
    pub experience: String,
}

/// Insert payload handed to the document store. The store assigns `id`
/// and both timestamps; counters start at zero.
#[derive(Debug, Clone)]
pub struct NewResume {
    pub owner_id: String,
    pub fields: ResumeFields,
    pub file_metadata: Option<FileMetadata>,
    pub download_url: Option<String>,
}

/// Overwrite payload for an existing record. `created_at`, `views` and
/// `downloads` are never touched by an update; `file_metadata` /
/// `download_url` of `None` leave the stored values as they are.
#[derive(Debug, Clone)]
pub struct ResumeChanges {
    pub fields: ResumeFields,
    pub file_metadata: Option<FileMetadata>,
    pub download_url: Option<String>,
}

/// The two monotonic counters a resume carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    Views,
    Downloads,
}

impl Counter {
    pub fn column(self) -> &'static str {
        match self {
            Counter::Views => "views",
            Counter::Downloads => "downloads",
        }
    }
}
