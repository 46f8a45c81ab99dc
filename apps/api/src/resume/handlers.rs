//! Axum route handlers for the resume API.
//!
//! Every success response wraps its payload in the
//! `{ "success": true, "data": ... }` envelope the frontend consumes;
//! failures go through `AppError::into_response`.

use axum::{
    extract::{FromRequest, Multipart, Path, Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{Counter, ResumeFields};
use crate::resume::download::download_resume;
use crate::resume::search::search_resumes;
use crate::resume::upsert::upsert_resume;
use crate::resume::validation::UploadedFile;
use crate::state::AppState;

/// JSON body for a file-less upsert. Multipart requests carry the same
/// fields as form parts plus the `resumeFile` part.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertResumeBody {
    #[serde(default)]
    pub owner_id: String,
    #[serde(flatten)]
    pub fields: ResumeFields,
}

/// GET /api/v1/resumes
///
/// All resumes in insertion order.
pub async fn handle_list_resumes(
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let records = state.resumes.list_resumes().await?;
    Ok(Json(json!({
        "success": true,
        "count": records.len(),
        "data": records
    })))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let record = state
        .resumes
        .get_resume(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;
    Ok(Json(json!({ "success": true, "data": record })))
}

/// GET /api/v1/resumes/user/:owner_id
pub async fn handle_get_resume_by_owner(
    State(state): State<AppState>,
    Path(owner_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let mut records = state.resumes.find_by_owner(&owner_id).await?;
    if records.is_empty() {
        return Err(AppError::NotFound(format!(
            "No resume found for user {owner_id}"
        )));
    }
    let record = records.remove(0);
    Ok(Json(json!({ "success": true, "data": record })))
}

/// POST /api/v1/resumes
///
/// Create-or-overwrite, keyed by owner. Accepts either a multipart form
/// (text parts plus an optional `resumeFile` part) or a plain JSON body.
/// 201 on create, 200 on overwrite; the envelope carries `isUpdate`.
pub async fn handle_upsert_resume(
    State(state): State<AppState>,
    request: Request,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let (owner_id, fields, file) = if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| AppError::Validation(format!("Invalid multipart request: {e}")))?;
        read_multipart(multipart).await?
    } else {
        let Json(body): Json<UpsertResumeBody> = Json::from_request(request, &())
            .await
            .map_err(|e| AppError::Validation(format!("Invalid JSON body: {e}")))?;
        (body.owner_id, body.fields, None)
    };

    let outcome = upsert_resume(
        state.resumes.as_ref(),
        state.blobs.as_ref(),
        &owner_id,
        fields,
        file,
    )
    .await?;

    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(json!({
            "success": true,
            "isUpdate": !outcome.created,
            "data": outcome.record
        })),
    ))
}

/// Decodes the upsert multipart form. Unknown parts are ignored so the
/// frontend can add fields without breaking older servers.
async fn read_multipart(
    mut multipart: Multipart,
) -> Result<(String, ResumeFields, Option<UploadedFile>), AppError> {
    let mut owner_id = String::new();
    let mut fields = ResumeFields::default();
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart field: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == "resumeFile" {
            let original_file_name = field
                .file_name()
                .unwrap_or("resume")
                .to_string();
            let mime_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read uploaded file: {e}")))?;
            file = Some(UploadedFile {
                original_file_name,
                mime_type,
                bytes,
            });
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::Validation(format!("Malformed multipart field: {e}")))?;
        match name.as_str() {
            "ownerId" => owner_id = value,
            "name" => fields.name = value,
            "email" => fields.email = value,
            "title" => fields.title = value,
            "description" => fields.description = value,
            "skills" => fields.skills = value,
            "experience" => fields.experience = value,
            _ => {}
        }
    }

    Ok((owner_id, fields, file))
}

/// POST /api/v1/resumes/:id/view
///
/// Atomically bumps the view counter and returns the new count.
pub async fn handle_increment_views(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let views = state
        .resumes
        .increment_counter(id, Counter::Views)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;
    Ok(Json(json!({ "success": true, "data": { "views": views } })))
}

/// GET /api/v1/resumes/:id/download
///
/// Streams the stored file, or a synthesized text rendering when no file
/// was uploaded. Counts the download either way.
pub async fn handle_download_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let payload = download_resume(state.resumes.as_ref(), state.blobs.as_ref(), id).await?;

    let file_name = payload.file_name.replace(['"', '\r', '\n'], "_");
    Ok((
        [
            (header::CONTENT_TYPE, payload.content_type),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        payload.bytes,
    )
        .into_response())
}

/// GET /api/v1/resumes/search/:query
pub async fn handle_search_resumes(
    State(state): State<AppState>,
    Path(query): Path<String>,
) -> Result<Json<Value>, AppError> {
    let records = search_resumes(
        state.resumes.as_ref(),
        &query,
        state.config.search_result_limit,
    )
    .await?;
    Ok(Json(json!({
        "success": true,
        "count": records.len(),
        "data": records
    })))
}

/// DELETE /api/v1/resumes/:id
///
/// Removes the record and, when present, its stored file. A blob that
/// cannot be deleted is logged and left orphaned; the record is gone
/// either way.
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let record = state
        .resumes
        .delete_resume(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;

    if let Some(meta) = &record.file_metadata {
        if let Err(e) = state.blobs.delete_blob(&meta.storage_key).await {
            warn!(
                storage_key = %meta.storage_key,
                "failed to delete file for removed resume: {e}"
            );
        }
    }

    Ok(Json(json!({ "success": true, "data": record })))
}
