use anyhow::anyhow;
use bytes::Bytes;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{Counter, ResumeRecord};
use crate::store::{BlobStore, ResumeStore};

/// Bytes and headers for a resume download response.
#[derive(Debug)]
pub struct DownloadPayload {
    pub bytes: Bytes,
    pub content_type: String,
    pub file_name: String,
}

/// Resolves a resume for download. The download counter is incremented
/// before the bytes are fetched, so a failed blob read still counts as an
/// attempt. A record that references a missing blob is an infrastructure
/// fault, not a 404.
pub async fn download_resume(
    resumes: &dyn ResumeStore,
    blobs: &dyn BlobStore,
    id: Uuid,
) -> Result<DownloadPayload, AppError> {
    let record = resumes
        .get_resume(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;

    resumes
        .increment_counter(id, Counter::Downloads)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))?;

    match &record.file_metadata {
        Some(meta) => {
            let bytes = blobs
                .get_blob(&meta.storage_key)
                .await?
                .ok_or_else(|| {
                    AppError::Internal(anyhow!(
                        "stored file {} for resume {id} is missing from the blob store",
                        meta.storage_key
                    ))
                })?;
            Ok(DownloadPayload {
                bytes,
                content_type: meta.mime_type.clone(),
                file_name: meta.original_file_name.clone(),
            })
        }
        None => Ok(DownloadPayload {
            bytes: Bytes::from(render_text(&record)),
            content_type: "text/plain; charset=utf-8".to_string(),
            file_name: "resume.txt".to_string(),
        }),
    }
}

/// Plain-text rendering of a resume that has no uploaded file.
fn render_text(record: &ResumeRecord) -> String {
    format!(
        "{name}\n{email}\n{title}\n\nAbout\n{description}\n\nSkills\n{skills}\n\nExperience\n{experience}\n",
        name = record.name,
        email = record.email,
        title = record.title,
        description = record.description,
        skills = record.skills,
        experience = record.experience,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::models::resume::{FileMetadata, NewResume, ResumeFields};
    use crate::store::{MemoryBlobStore, MemoryStore};

    fn make_fields() -> ResumeFields {
        ResumeFields {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            title: "Engineer".to_string(),
            description: "First programmer".to_string(),
            skills: "Analytical Engine".to_string(),
            experience: "Notes on the Engine".to_string(),
        }
    }

    #[tokio::test]
    async fn test_download_streams_stored_file() {
        let store = MemoryStore::new();
        let blobs = MemoryBlobStore::new();
        blobs
            .put_blob("resumes/k1-cv.pdf", Bytes::from_static(b"pdf!"), "application/pdf")
            .await
            .unwrap();
        let record = store
            .insert_resume(NewResume {
                owner_id: "u1".to_string(),
                fields: make_fields(),
                file_metadata: Some(FileMetadata {
                    storage_key: "resumes/k1-cv.pdf".to_string(),
                    original_file_name: "cv.pdf".to_string(),
                    mime_type: "application/pdf".to_string(),
                    size_bytes: 4,
                }),
                download_url: Some("memory://resumes/k1-cv.pdf".to_string()),
            })
            .await
            .unwrap();

        let payload = download_resume(&store, &blobs, record.id).await.unwrap();

        assert_eq!(payload.bytes.as_ref(), b"pdf!");
        assert_eq!(payload.content_type, "application/pdf");
        assert_eq!(payload.file_name, "cv.pdf");
    }

    #[tokio::test]
    async fn test_download_increments_counter() {
        let store = MemoryStore::new();
        let blobs = MemoryBlobStore::new();
        let record = store
            .insert_resume(NewResume {
                owner_id: "u1".to_string(),
                fields: make_fields(),
                file_metadata: None,
                download_url: None,
            })
            .await
            .unwrap();

        download_resume(&store, &blobs, record.id).await.unwrap();
        download_resume(&store, &blobs, record.id).await.unwrap();

        let stored = store.get_resume(record.id).await.unwrap().unwrap();
        assert_eq!(stored.downloads, 2);
        assert_eq!(stored.views, 0);
    }

    #[tokio::test]
    async fn test_download_synthesizes_text_when_no_file() {
        let store = MemoryStore::new();
        let blobs = MemoryBlobStore::new();
        let record = store
            .insert_resume(NewResume {
                owner_id: "u1".to_string(),
                fields: make_fields(),
                file_metadata: None,
                download_url: None,
            })
            .await
            .unwrap();

        let payload = download_resume(&store, &blobs, record.id).await.unwrap();

        assert_eq!(payload.content_type, "text/plain; charset=utf-8");
        assert_eq!(payload.file_name, "resume.txt");
        let text = String::from_utf8(payload.bytes.to_vec()).unwrap();
        assert!(text.contains("Ada Lovelace"));
        assert!(text.contains("ada@example.com"));
        assert!(text.contains("Analytical Engine"));
        assert!(text.contains("Notes on the Engine"));
    }

    #[tokio::test]
    async fn test_download_unknown_id_is_not_found() {
        let store = MemoryStore::new();
        let blobs = MemoryBlobStore::new();

        let err = download_resume(&store, &blobs, Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_missing_blob_is_internal_error() {
        let store = MemoryStore::new();
        let blobs = MemoryBlobStore::new();
        let record = store
            .insert_resume(NewResume {
                owner_id: "u1".to_string(),
                fields: make_fields(),
                file_metadata: Some(FileMetadata {
                    storage_key: "resumes/gone.pdf".to_string(),
                    original_file_name: "gone.pdf".to_string(),
                    mime_type: "application/pdf".to_string(),
                    size_bytes: 9,
                }),
                download_url: None,
            })
            .await
            .unwrap();

        let err = download_resume(&store, &blobs, record.id).await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
