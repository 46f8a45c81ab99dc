use anyhow::anyhow;
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{
    FileMetadata, NewResume, ResumeChanges, ResumeFields, ResumeRecord,
};
use crate::resume::validation::{validate_fields, validate_file, UploadedFile};
use crate::store::{BlobStore, ResumeStore};

/// Result of an upsert: the persisted record and whether a new record was
/// created (as opposed to an existing one overwritten).
#[derive(Debug)]
pub struct UpsertOutcome {
    pub record: ResumeRecord,
    pub created: bool,
}

/// Create-or-overwrite a resume keyed by owner.
///
/// Ordering: the new blob is written before any document write, and the
/// superseded blob is deleted only after the document write succeeds. A
/// crash in between can orphan a blob but never leaves a record pointing
/// at bytes that do not exist.
pub async fn upsert_resume(
    resumes: &dyn ResumeStore,
    blobs: &dyn BlobStore,
    owner_id: &str,
    fields: ResumeFields,
    file: Option<UploadedFile>,
) -> Result<UpsertOutcome, AppError> {
    validate_fields(owner_id, &fields)?;
    if let Some(file) = &file {
        validate_file(file)?;
    }

    let existing = find_existing(resumes, owner_id).await?;

    let mut file_metadata = None;
    let mut download_url = None;
    if let Some(file) = file {
        let storage_key = format!("resumes/{}-{}", Uuid::new_v4(), file.original_file_name);
        blobs
            .put_blob(&storage_key, file.bytes.clone(), &file.mime_type)
            .await?;
        download_url = Some(blobs.blob_url(&storage_key));
        file_metadata = Some(FileMetadata {
            storage_key,
            original_file_name: file.original_file_name,
            mime_type: file.mime_type,
            size_bytes: file.bytes.len() as i64,
        });
    }

    match existing {
        Some(existing) => {
            let superseded = match &file_metadata {
                Some(_) => existing.file_metadata.clone(),
                None => None,
            };

            let changes = ResumeChanges {
                fields,
                file_metadata,
                download_url,
            };
            let record = resumes
                .update_resume(existing.id, changes)
                .await?
                .ok_or_else(|| {
                    AppError::Internal(anyhow!(
                        "resume {} vanished between lookup and update",
                        existing.id
                    ))
                })?;

            if let Some(old) = superseded {
                if let Err(e) = blobs.delete_blob(&old.storage_key).await {
                    warn!(
                        storage_key = %old.storage_key,
                        "failed to delete superseded resume file: {e}"
                    );
                }
            }

            Ok(UpsertOutcome {
                record,
                created: false,
            })
        }
        None => {
            let record = resumes
                .insert_resume(NewResume {
                    owner_id: owner_id.to_string(),
                    fields,
                    file_metadata,
                    download_url,
                })
                .await?;
            Ok(UpsertOutcome {
                record,
                created: true,
            })
        }
    }
}

/// Resolves the owner's current record. More than one record for an owner
/// is a data-integrity fault; the lowest id wins and the rest are left for
/// out-of-band cleanup.
async fn find_existing(
    resumes: &dyn ResumeStore,
    owner_id: &str,
) -> Result<Option<ResumeRecord>, AppError> {
    let mut records = resumes.find_by_owner(owner_id).await?;
    if records.len() > 1 {
        warn!(
            owner_id,
            count = records.len(),
            "multiple resume records for one owner; using the lowest id"
        );
    }
    if records.is_empty() {
        Ok(None)
    } else {
        Ok(Some(records.remove(0)))
    }
}
