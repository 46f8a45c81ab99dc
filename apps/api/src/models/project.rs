use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectStatus {
    #[serde(rename = "completed")]
    Completed,
    #[serde(rename = "in-progress")]
    InProgress,
}

impl ProjectStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectStatus::Completed => "completed",
            ProjectStatus::InProgress => "in-progress",
        }
    }

    /// Parses the wire value; anything unrecognized falls back to
    /// `completed`, the original default.
    pub fn parse(s: &str) -> Self {
        match s {
            "in-progress" => ProjectStatus::InProgress,
            _ => ProjectStatus::Completed,
        }
    }
}

/// A portfolio project. Unlike resumes, many may exist per owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub id: Uuid,
    pub owner_id: String,
    pub name: String,
    pub technologies: Vec<String>,
    pub short_description: String,
    pub long_description: String,
    pub github_url: String,
    pub live_url: String,
    pub image_url: String,
    pub status: ProjectStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a new project. The store assigns `id` and timestamps.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub owner_id: String,
    pub name: String,
    pub technologies: Vec<String>,
    pub short_description: String,
    pub long_description: String,
    pub github_url: String,
    pub live_url: String,
    pub image_url: String,
    pub status: ProjectStatus,
}

/// Field-by-field update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct ProjectChanges {
    pub name: Option<String>,
    pub technologies: Option<Vec<String>>,
    pub short_description: Option<String>,
    pub long_description: Option<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub image_url: Option<String>,
    pub status: Option<ProjectStatus>,
}

/// Splits the comma-separated `technologies` form value into an ordered,
/// trimmed list, dropping empty segments.
pub fn split_technologies(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_technologies_trims_and_drops_empties() {
        assert_eq!(
            split_technologies("Rust, Axum , ,PostgreSQL"),
            vec!["Rust", "Axum", "PostgreSQL"]
        );
        assert!(split_technologies("").is_empty());
        assert!(split_technologies(" , ,").is_empty());
    }

    #[test]
    fn test_status_parse_defaults_to_completed() {
        assert_eq!(ProjectStatus::parse("in-progress"), ProjectStatus::InProgress);
        assert_eq!(ProjectStatus::parse("completed"), ProjectStatus::Completed);
        assert_eq!(ProjectStatus::parse("bogus"), ProjectStatus::Completed);
    }
}
