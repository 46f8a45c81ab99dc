//! Axum route handlers for the project API.
//!
//! `technologies` arrives on the wire as a comma-separated string, the
//! shape the original frontend submits, and is split into an ordered
//! list before it reaches the store.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::project::{split_technologies, NewProject, ProjectChanges, ProjectStatus};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectBody {
    #[serde(default)]
    pub owner_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub technologies: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub long_description: String,
    #[serde(default)]
    pub github_url: String,
    #[serde(default)]
    pub live_url: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub status: String,
}

/// Partial update body. Absent and empty fields both keep the stored
/// value, matching the original's field-by-field merge.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectBody {
    pub name: Option<String>,
    pub technologies: Option<String>,
    pub short_description: Option<String>,
    pub long_description: Option<String>,
    pub github_url: Option<String>,
    pub live_url: Option<String>,
    pub image_url: Option<String>,
    pub status: Option<String>,
}

/// POST /api/v1/projects
pub async fn handle_create_project(
    State(state): State<AppState>,
    Json(body): Json<CreateProjectBody>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    for (value, label) in [
        (&body.owner_id, "ownerId"),
        (&body.name, "name"),
        (&body.technologies, "technologies"),
        (&body.short_description, "shortDescription"),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!("{label} is required")));
        }
    }

    let record = state
        .projects
        .insert_project(NewProject {
            owner_id: body.owner_id,
            name: body.name,
            technologies: split_technologies(&body.technologies),
            short_description: body.short_description,
            long_description: body.long_description,
            github_url: body.github_url,
            live_url: body.live_url,
            image_url: body.image_url,
            status: ProjectStatus::parse(&body.status),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": record })),
    ))
}

/// PUT /api/v1/projects/:id
pub async fn handle_update_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateProjectBody>,
) -> Result<Json<Value>, AppError> {
    let changes = ProjectChanges {
        name: non_empty(body.name),
        technologies: non_empty(body.technologies).map(|t| split_technologies(&t)),
        short_description: non_empty(body.short_description),
        long_description: non_empty(body.long_description),
        github_url: non_empty(body.github_url),
        live_url: non_empty(body.live_url),
        image_url: non_empty(body.image_url),
        status: non_empty(body.status).map(|s| ProjectStatus::parse(&s)),
    };

    let record = state
        .projects
        .update_project(id, changes)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Project {id} not found")))?;
    Ok(Json(json!({ "success": true, "data": record })))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// GET /api/v1/projects/:id
pub async fn handle_get_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let record = state
        .projects
        .get_project(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Project {id} not found")))?;
    Ok(Json(json!({ "success": true, "data": record })))
}

/// GET /api/v1/projects
pub async fn handle_list_projects(
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let records = state.projects.list_projects().await?;
    Ok(Json(json!({
        "success": true,
        "count": records.len(),
        "data": records
    })))
}

/// GET /api/v1/projects/user/:owner_id
pub async fn handle_list_projects_by_owner(
    State(state): State<AppState>,
    Path(owner_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let records = state.projects.list_projects_by_owner(&owner_id).await?;
    Ok(Json(json!({
        "success": true,
        "count": records.len(),
        "data": records
    })))
}

/// DELETE /api/v1/projects/:id
pub async fn handle_delete_project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let deleted = state.projects.delete_project(id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("Project {id} not found")));
    }
    Ok(Json(json!({ "success": true, "data": { "id": id } })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::config::Config;
    use crate::store::{MemoryBlobStore, MemoryStore};

    fn make_state() -> AppState {
        let store = Arc::new(MemoryStore::new());
        AppState {
            resumes: store.clone(),
            projects: store,
            blobs: Arc::new(MemoryBlobStore::new()),
            config: Config {
                database_url: String::new(),
                s3_bucket: "test".to_string(),
                s3_endpoint: "http://localhost:9000".to_string(),
                aws_access_key_id: String::new(),
                aws_secret_access_key: String::new(),
                port: 0,
                rust_log: "info".to_string(),
                search_result_limit: 100,
                request_timeout_secs: 30,
            },
        }
    }

    fn make_body(owner: &str) -> CreateProjectBody {
        CreateProjectBody {
            owner_id: owner.to_string(),
            name: "Portfolio".to_string(),
            technologies: "Rust, Axum".to_string(),
            short_description: "A portfolio site".to_string(),
            ..CreateProjectBody::default()
        }
    }

    #[tokio::test]
    async fn test_create_splits_technologies_and_defaults_status() {
        let state = make_state();

        let (status, Json(created)) =
            handle_create_project(State(state), Json(make_body("u1")))
                .await
                .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["data"]["technologies"], json!(["Rust", "Axum"]));
        assert_eq!(created["data"]["status"], "completed");
    }

    #[tokio::test]
    async fn test_create_requires_short_description() {
        let state = make_state();
        let mut body = make_body("u1");
        body.short_description = String::new();

        let err = handle_create_project(State(state), Json(body))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_merge_keeps_absent_fields() {
        let state = make_state();
        let (_, Json(created)) =
            handle_create_project(State(state.clone()), Json(make_body("u1")))
                .await
                .unwrap();
        let id: Uuid = serde_json::from_value(created["data"]["id"].clone()).unwrap();

        let update = UpdateProjectBody {
            name: Some("Portfolio v2".to_string()),
            status: Some("in-progress".to_string()),
            technologies: Some(String::new()),
            ..UpdateProjectBody::default()
        };
        let Json(updated) = handle_update_project(State(state), Path(id), Json(update))
            .await
            .unwrap();

        assert_eq!(updated["data"]["name"], "Portfolio v2");
        assert_eq!(updated["data"]["status"], "in-progress");
        assert_eq!(updated["data"]["technologies"], json!(["Rust", "Axum"]));
        assert_eq!(updated["data"]["shortDescription"], "A portfolio site");
    }

    #[tokio::test]
    async fn test_update_unknown_id_404() {
        let state = make_state();

        let err = handle_update_project(
            State(state),
            Path(Uuid::new_v4()),
            Json(UpdateProjectBody::default()),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_by_owner_filters() {
        let state = make_state();
        handle_create_project(State(state.clone()), Json(make_body("u1")))
            .await
            .unwrap();
        handle_create_project(State(state.clone()), Json(make_body("u2")))
            .await
            .unwrap();

        let Json(listed) =
            handle_list_projects_by_owner(State(state), Path("u1".to_string()))
                .await
                .unwrap();
        assert_eq!(listed["count"], 1);
    }

    #[tokio::test]
    async fn test_delete_then_404() {
        let state = make_state();
        let (_, Json(created)) =
            handle_create_project(State(state.clone()), Json(make_body("u1")))
                .await
                .unwrap();
        let id: Uuid = serde_json::from_value(created["data"]["id"].clone()).unwrap();

        handle_delete_project(State(state.clone()), Path(id))
            .await
            .unwrap();
        let err = handle_delete_project(State(state), Path(id))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
