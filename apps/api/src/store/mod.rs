//! Adapters over the document store and the blob store.
//!
//! Handlers and services only see the traits below, carried in `AppState`
//! as `Arc<dyn ...>`. Production wires `PgStore` + `S3BlobStore`; tests
//! substitute the in-memory implementations.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod s3;

use async_trait::async_trait;
use bytes::Bytes;
use uuid::Uuid;

use crate::models::project::{NewProject, ProjectChanges, ProjectRecord};
use crate::models::resume::{Counter, NewResume, ResumeChanges, ResumeRecord};

pub use error::StoreError;
pub use memory::{MemoryBlobStore, MemoryStore};
pub use postgres::PgStore;
pub use s3::S3BlobStore;

/// Document-store operations for resume records.
///
/// The single-resume-per-owner invariant is enforced by the upsert
/// service, not here; `find_by_owner` can therefore report more than one
/// record when the store has been corrupted out-of-band.
#[async_trait]
pub trait ResumeStore: Send + Sync {
    /// Inserts a new record. The store assigns `id` and both timestamps;
    /// counters start at zero and `is_updated` at false.
    async fn insert_resume(&self, new: NewResume) -> Result<ResumeRecord, StoreError>;

    /// Overwrites the mutable fields of an existing record, refreshing
    /// `updated_at` and setting `is_updated`. `created_at` and both
    /// counters are never touched. Returns `None` when `id` is unknown.
    async fn update_resume(
        &self,
        id: Uuid,
        changes: ResumeChanges,
    ) -> Result<Option<ResumeRecord>, StoreError>;

    async fn get_resume(&self, id: Uuid) -> Result<Option<ResumeRecord>, StoreError>;

    /// All records for an owner, ordered by ascending `id`.
    async fn find_by_owner(&self, owner_id: &str) -> Result<Vec<ResumeRecord>, StoreError>;

    /// All records in insertion order.
    async fn list_resumes(&self) -> Result<Vec<ResumeRecord>, StoreError>;

    /// Removes a record, returning it so the caller can clean up the
    /// associated blob. `None` when `id` is unknown.
    async fn delete_resume(&self, id: Uuid) -> Result<Option<ResumeRecord>, StoreError>;

    /// Atomically bumps a counter, returning the new value, or `None`
    /// (and no side effect) when `id` is unknown. Implementations must
    /// use a store-level increment, never read-modify-write.
    async fn increment_counter(
        &self,
        id: Uuid,
        counter: Counter,
    ) -> Result<Option<i64>, StoreError>;
}

/// Document-store operations for project records. Plain CRUD; many
/// projects per owner.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn insert_project(&self, new: NewProject) -> Result<ProjectRecord, StoreError>;

    /// Field-by-field merge: `None` fields keep their stored values.
    /// Returns `None` when `id` is unknown.
    async fn update_project(
        &self,
        id: Uuid,
        changes: ProjectChanges,
    ) -> Result<Option<ProjectRecord>, StoreError>;

    async fn get_project(&self, id: Uuid) -> Result<Option<ProjectRecord>, StoreError>;

    async fn list_projects(&self) -> Result<Vec<ProjectRecord>, StoreError>;

    async fn list_projects_by_owner(
        &self,
        owner_id: &str,
    ) -> Result<Vec<ProjectRecord>, StoreError>;

    /// Returns false when `id` is unknown.
    async fn delete_project(&self, id: Uuid) -> Result<bool, StoreError>;
}

/// Binary object storage for uploaded resume files.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put_blob(&self, key: &str, data: Bytes, content_type: &str)
        -> Result<(), StoreError>;

    /// `None` when no blob exists under `key`.
    async fn get_blob(&self, key: &str) -> Result<Option<Bytes>, StoreError>;

    /// Deleting a nonexistent key is a no-op.
    async fn delete_blob(&self, key: &str) -> Result<(), StoreError>;

    /// Stable externally-resolvable URL for a stored blob.
    fn blob_url(&self, key: &str) -> String;
}
