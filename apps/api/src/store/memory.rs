use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use uuid::Uuid;

use crate::models::project::{NewProject, ProjectChanges, ProjectRecord};
use crate::models::resume::{Counter, NewResume, ResumeChanges, ResumeRecord};
use crate::store::{BlobStore, ProjectStore, ResumeStore, StoreError};

/// In-memory document store. Insertion order is list order, matching the
/// "store order" the search contract promises. Used by tests in place of
/// `PgStore`.
#[derive(Clone, Default)]
pub struct MemoryStore {
    resumes: Arc<Mutex<Vec<ResumeRecord>>>,
    projects: Arc<Mutex<Vec<ProjectRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResumeStore for MemoryStore {
    async fn insert_resume(&self, new: NewResume) -> Result<ResumeRecord, StoreError> {
        let now = Utc::now();
        let record = ResumeRecord {
            id: Uuid::new_v4(),
            owner_id: new.owner_id,
            name: new.fields.name,
            email: new.fields.email,
            title: new.fields.title,
            description: new.fields.description,
            skills: new.fields.skills,
            experience: new.fields.experience,
            file_metadata: new.file_metadata,
            download_url: new.download_url,
            views: 0,
            downloads: 0,
            is_updated: false,
            created_at: now,
            updated_at: now,
        };
        self.resumes.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn update_resume(
        &self,
        id: Uuid,
        changes: ResumeChanges,
    ) -> Result<Option<ResumeRecord>, StoreError> {
        let mut resumes = self.resumes.lock().unwrap();
        let Some(record) = resumes.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };

        record.name = changes.fields.name;
        record.email = changes.fields.email;
        record.title = changes.fields.title;
        record.description = changes.fields.description;
        record.skills = changes.fields.skills;
        record.experience = changes.fields.experience;
        if changes.file_metadata.is_some() {
            record.file_metadata = changes.file_metadata;
            record.download_url = changes.download_url;
        }
        record.is_updated = true;
        record.updated_at = Utc::now();

        Ok(Some(record.clone()))
    }

    async fn get_resume(&self, id: Uuid) -> Result<Option<ResumeRecord>, StoreError> {
        let resumes = self.resumes.lock().unwrap();
        Ok(resumes.iter().find(|r| r.id == id).cloned())
    }

    async fn find_by_owner(&self, owner_id: &str) -> Result<Vec<ResumeRecord>, StoreError> {
        let resumes = self.resumes.lock().unwrap();
        let mut matches: Vec<ResumeRecord> = resumes
            .iter()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .collect();
        matches.sort_by_key(|r| r.id);
        Ok(matches)
    }

    async fn list_resumes(&self) -> Result<Vec<ResumeRecord>, StoreError> {
        Ok(self.resumes.lock().unwrap().clone())
    }

    async fn delete_resume(&self, id: Uuid) -> Result<Option<ResumeRecord>, StoreError> {
        let mut resumes = self.resumes.lock().unwrap();
        let position = resumes.iter().position(|r| r.id == id);
        Ok(position.map(|i| resumes.remove(i)))
    }

    async fn increment_counter(
        &self,
        id: Uuid,
        counter: Counter,
    ) -> Result<Option<i64>, StoreError> {
        let mut resumes = self.resumes.lock().unwrap();
        let Some(record) = resumes.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        let value = match counter {
            Counter::Views => {
                record.views += 1;
                record.views
            }
            Counter::Downloads => {
                record.downloads += 1;
                record.downloads
            }
        };
        Ok(Some(value))
    }
}

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn insert_project(&self, new: NewProject) -> Result<ProjectRecord, StoreError> {
        let now = Utc::now();
        let record = ProjectRecord {
            id: Uuid::new_v4(),
            owner_id: new.owner_id,
            name: new.name,
            technologies: new.technologies,
            short_description: new.short_description,
            long_description: new.long_description,
            github_url: new.github_url,
            live_url: new.live_url,
            image_url: new.image_url,
            status: new.status,
            created_at: now,
            updated_at: now,
        };
        self.projects.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn update_project(
        &self,
        id: Uuid,
        changes: ProjectChanges,
    ) -> Result<Option<ProjectRecord>, StoreError> {
        let mut projects = self.projects.lock().unwrap();
        let Some(record) = projects.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            record.name = name;
        }
        if let Some(technologies) = changes.technologies {
            record.technologies = technologies;
        }
        if let Some(short_description) = changes.short_description {
            record.short_description = short_description;
        }
        if let Some(long_description) = changes.long_description {
            record.long_description = long_description;
        }
        if let Some(github_url) = changes.github_url {
            record.github_url = github_url;
        }
        if let Some(live_url) = changes.live_url {
            record.live_url = live_url;
        }
        if let Some(image_url) = changes.image_url {
            record.image_url = image_url;
        }
        if let Some(status) = changes.status {
            record.status = status;
        }
        record.updated_at = Utc::now();

        Ok(Some(record.clone()))
    }

    async fn get_project(&self, id: Uuid) -> Result<Option<ProjectRecord>, StoreError> {
        let projects = self.projects.lock().unwrap();
        Ok(projects.iter().find(|p| p.id == id).cloned())
    }

    async fn list_projects(&self) -> Result<Vec<ProjectRecord>, StoreError> {
        Ok(self.projects.lock().unwrap().clone())
    }

    async fn list_projects_by_owner(
        &self,
        owner_id: &str,
    ) -> Result<Vec<ProjectRecord>, StoreError> {
        let projects = self.projects.lock().unwrap();
        Ok(projects
            .iter()
            .filter(|p| p.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn delete_project(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut projects = self.projects.lock().unwrap();
        let position = projects.iter().position(|p| p.id == id);
        match position {
            Some(i) => {
                projects.remove(i);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// In-memory blob store with per-key failure injection, so tests can
/// exercise the "blob write fails before any document write" path.
#[derive(Clone, Default)]
pub struct MemoryBlobStore {
    data: Arc<Mutex<HashMap<String, Bytes>>>,
    fail_keys: Arc<Mutex<HashSet<String>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `put_blob` fail. Keyed failure would not
    /// help here because upload keys are store-generated UUIDs.
    pub fn fail_all_puts(&self) {
        self.fail_keys.lock().unwrap().insert("*".to_string());
    }

    pub fn blob_count(&self) -> usize {
        self.data.lock().unwrap().len()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put_blob(
        &self,
        key: &str,
        data: Bytes,
        _content_type: &str,
    ) -> Result<(), StoreError> {
        let fail_keys = self.fail_keys.lock().unwrap();
        if fail_keys.contains("*") || fail_keys.contains(key) {
            return Err(StoreError::Blob(format!("simulated failure for {key}")));
        }
        drop(fail_keys);

        self.data.lock().unwrap().insert(key.to_string(), data);
        Ok(())
    }

    async fn get_blob(&self, key: &str) -> Result<Option<Bytes>, StoreError> {
        Ok(self.data.lock().unwrap().get(key).cloned())
    }

    async fn delete_blob(&self, key: &str) -> Result<(), StoreError> {
        self.data.lock().unwrap().remove(key);
        Ok(())
    }

    fn blob_url(&self, key: &str) -> String {
        format!("memory://{key}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::ResumeFields;

    fn fields(name: &str, email: &str) -> ResumeFields {
        ResumeFields {
            name: name.to_string(),
            email: email.to_string(),
            ..Default::default()
        }
    }

    async fn seed_resume(store: &MemoryStore, owner: &str) -> ResumeRecord {
        store
            .insert_resume(NewResume {
                owner_id: owner.to_string(),
                fields: fields("Jane Doe", "j@x.com"),
                file_metadata: None,
                download_url: None,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_concurrent_view_increments_are_all_counted() {
        let store = MemoryStore::new();
        let record = seed_resume(&store, "u1").await;

        let n = 50;
        let mut handles = Vec::new();
        for _ in 0..n {
            let store = store.clone();
            let id = record.id;
            handles.push(tokio::spawn(async move {
                store.increment_counter(id, Counter::Views).await.unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let after = store.get_resume(record.id).await.unwrap().unwrap();
        assert_eq!(after.views, n);
        assert_eq!(after.downloads, 0);
    }

    #[tokio::test]
    async fn test_increment_on_missing_id_has_no_side_effect() {
        let store = MemoryStore::new();
        let record = seed_resume(&store, "u1").await;

        let result = store
            .increment_counter(Uuid::new_v4(), Counter::Downloads)
            .await
            .unwrap();
        assert!(result.is_none());

        let untouched = store.get_resume(record.id).await.unwrap().unwrap();
        assert_eq!(untouched.downloads, 0);
    }

    #[tokio::test]
    async fn test_counters_never_decrease_across_updates() {
        let store = MemoryStore::new();
        let record = seed_resume(&store, "u1").await;

        for _ in 0..3 {
            store
                .increment_counter(record.id, Counter::Views)
                .await
                .unwrap();
        }
        store
            .update_resume(
                record.id,
                ResumeChanges {
                    fields: fields("Jane Doe", "j@x.com"),
                    file_metadata: None,
                    download_url: None,
                },
            )
            .await
            .unwrap();

        let after = store.get_resume(record.id).await.unwrap().unwrap();
        assert_eq!(after.views, 3);
    }

    #[tokio::test]
    async fn test_update_preserves_created_at_and_file_when_absent() {
        let store = MemoryStore::new();
        let record = store
            .insert_resume(NewResume {
                owner_id: "u1".to_string(),
                fields: fields("Jane Doe", "j@x.com"),
                file_metadata: Some(crate::models::resume::FileMetadata {
                    storage_key: "resumes/k1".to_string(),
                    original_file_name: "cv.pdf".to_string(),
                    mime_type: "application/pdf".to_string(),
                    size_bytes: 10,
                }),
                download_url: Some("memory://resumes/k1".to_string()),
            })
            .await
            .unwrap();

        let updated = store
            .update_resume(
                record.id,
                ResumeChanges {
                    fields: fields("Jane D.", "j@x.com"),
                    file_metadata: None,
                    download_url: None,
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.created_at, record.created_at);
        assert_eq!(updated.file_metadata, record.file_metadata);
        assert_eq!(updated.download_url, record.download_url);
        assert!(updated.is_updated);
    }

    #[tokio::test]
    async fn test_blob_store_roundtrip_and_delete() {
        let blobs = MemoryBlobStore::new();
        blobs
            .put_blob("resumes/k1", Bytes::from_static(b"pdf"), "application/pdf")
            .await
            .unwrap();
        assert_eq!(
            blobs.get_blob("resumes/k1").await.unwrap(),
            Some(Bytes::from_static(b"pdf"))
        );

        blobs.delete_blob("resumes/k1").await.unwrap();
        assert_eq!(blobs.get_blob("resumes/k1").await.unwrap(), None);
        // deleting again is a no-op
        blobs.delete_blob("resumes/k1").await.unwrap();
    }
}
