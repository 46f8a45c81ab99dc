use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::project::{
    NewProject, ProjectChanges, ProjectRecord, ProjectStatus,
};
use crate::models::resume::{
    Counter, FileMetadata, NewResume, ResumeChanges, ResumeRecord,
};
use crate::store::{ProjectStore, ResumeStore, StoreError};

/// PostgreSQL-backed document store. A unique index on `resumes.owner_id`
/// backs the one-resume-per-owner invariant at the store level, so a lost
/// upsert race surfaces as a constraint violation instead of a duplicate
/// record.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ResumeRow {
    id: Uuid,
    owner_id: String,
    name: String,
    email: String,
    title: String,
    description: String,
    skills: String,
    experience: String,
    storage_key: Option<String>,
    original_file_name: Option<String>,
    mime_type: Option<String>,
    size_bytes: Option<i64>,
    download_url: Option<String>,
    views: i64,
    downloads: i64,
    is_updated: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ResumeRow> for ResumeRecord {
    fn from(row: ResumeRow) -> Self {
        let file_metadata = match (
            row.storage_key,
            row.original_file_name,
            row.mime_type,
            row.size_bytes,
        ) {
            (Some(storage_key), Some(original_file_name), Some(mime_type), Some(size_bytes)) => {
                Some(FileMetadata {
                    storage_key,
                    original_file_name,
                    mime_type,
                    size_bytes,
                })
            }
            _ => None,
        };

        ResumeRecord {
            id: row.id,
            owner_id: row.owner_id,
            name: row.name,
            email: row.email,
            title: row.title,
            description: row.description,
            skills: row.skills,
            experience: row.experience,
            file_metadata,
            download_url: row.download_url,
            views: row.views,
            downloads: row.downloads,
            is_updated: row.is_updated,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl ResumeStore for PgStore {
    async fn insert_resume(&self, new: NewResume) -> Result<ResumeRecord, StoreError> {
        let file = new.file_metadata;
        let row = sqlx::query_as::<_, ResumeRow>(
            r#"
            INSERT INTO resumes
                (owner_id, name, email, title, description, skills, experience,
                 storage_key, original_file_name, mime_type, size_bytes, download_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(&new.owner_id)
        .bind(&new.fields.name)
        .bind(&new.fields.email)
        .bind(&new.fields.title)
        .bind(&new.fields.description)
        .bind(&new.fields.skills)
        .bind(&new.fields.experience)
        .bind(file.as_ref().map(|f| f.storage_key.clone()))
        .bind(file.as_ref().map(|f| f.original_file_name.clone()))
        .bind(file.as_ref().map(|f| f.mime_type.clone()))
        .bind(file.as_ref().map(|f| f.size_bytes))
        .bind(&new.download_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update_resume(
        &self,
        id: Uuid,
        changes: ResumeChanges,
    ) -> Result<Option<ResumeRecord>, StoreError> {
        // Two statements rather than COALESCE games: file columns are only
        // rewritten when a new file was stored, per the upsert contract.
        let row = match &changes.file_metadata {
            Some(file) => {
                sqlx::query_as::<_, ResumeRow>(
                    r#"
                    UPDATE resumes
                    SET name = $2, email = $3, title = $4, description = $5,
                        skills = $6, experience = $7,
                        storage_key = $8, original_file_name = $9,
                        mime_type = $10, size_bytes = $11, download_url = $12,
                        is_updated = TRUE, updated_at = now()
                    WHERE id = $1
                    RETURNING *
                    "#,
                )
                .bind(id)
                .bind(&changes.fields.name)
                .bind(&changes.fields.email)
                .bind(&changes.fields.title)
                .bind(&changes.fields.description)
                .bind(&changes.fields.skills)
                .bind(&changes.fields.experience)
                .bind(&file.storage_key)
                .bind(&file.original_file_name)
                .bind(&file.mime_type)
                .bind(file.size_bytes)
                .bind(&changes.download_url)
                .fetch_optional(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, ResumeRow>(
                    r#"
                    UPDATE resumes
                    SET name = $2, email = $3, title = $4, description = $5,
                        skills = $6, experience = $7,
                        is_updated = TRUE, updated_at = now()
                    WHERE id = $1
                    RETURNING *
                    "#,
                )
                .bind(id)
                .bind(&changes.fields.name)
                .bind(&changes.fields.email)
                .bind(&changes.fields.title)
                .bind(&changes.fields.description)
                .bind(&changes.fields.skills)
                .bind(&changes.fields.experience)
                .fetch_optional(&self.pool)
                .await?
            }
        };

        Ok(row.map(Into::into))
    }

    async fn get_resume(&self, id: Uuid) -> Result<Option<ResumeRecord>, StoreError> {
        let row = sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn find_by_owner(&self, owner_id: &str) -> Result<Vec<ResumeRecord>, StoreError> {
        let rows = sqlx::query_as::<_, ResumeRow>(
            "SELECT * FROM resumes WHERE owner_id = $1 ORDER BY id ASC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_resumes(&self) -> Result<Vec<ResumeRecord>, StoreError> {
        let rows = sqlx::query_as::<_, ResumeRow>(
            "SELECT * FROM resumes ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn delete_resume(&self, id: Uuid) -> Result<Option<ResumeRecord>, StoreError> {
        let row =
            sqlx::query_as::<_, ResumeRow>("DELETE FROM resumes WHERE id = $1 RETURNING *")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Into::into))
    }

    async fn increment_counter(
        &self,
        id: Uuid,
        counter: Counter,
    ) -> Result<Option<i64>, StoreError> {
        // Column name comes from a closed enum, never from input.
        let sql = format!(
            "UPDATE resumes SET {col} = {col} + 1 WHERE id = $1 RETURNING {col}",
            col = counter.column()
        );
        let count: Option<i64> = sqlx::query_scalar(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(count)
    }
}

#[derive(Debug, FromRow)]
struct ProjectRow {
    id: Uuid,
    owner_id: String,
    name: String,
    technologies: Vec<String>,
    short_description: String,
    long_description: String,
    github_url: String,
    live_url: String,
    image_url: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProjectRow> for ProjectRecord {
    fn from(row: ProjectRow) -> Self {
        ProjectRecord {
            id: row.id,
            owner_id: row.owner_id,
            name: row.name,
            technologies: row.technologies,
            short_description: row.short_description,
            long_description: row.long_description,
            github_url: row.github_url,
            live_url: row.live_url,
            image_url: row.image_url,
            status: ProjectStatus::parse(&row.status),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl ProjectStore for PgStore {
    async fn insert_project(&self, new: NewProject) -> Result<ProjectRecord, StoreError> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r#"
            INSERT INTO projects
                (owner_id, name, technologies, short_description, long_description,
                 github_url, live_url, image_url, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(&new.owner_id)
        .bind(&new.name)
        .bind(&new.technologies)
        .bind(&new.short_description)
        .bind(&new.long_description)
        .bind(&new.github_url)
        .bind(&new.live_url)
        .bind(&new.image_url)
        .bind(new.status.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update_project(
        &self,
        id: Uuid,
        changes: ProjectChanges,
    ) -> Result<Option<ProjectRecord>, StoreError> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r#"
            UPDATE projects
            SET name = COALESCE($2, name),
                technologies = COALESCE($3, technologies),
                short_description = COALESCE($4, short_description),
                long_description = COALESCE($5, long_description),
                github_url = COALESCE($6, github_url),
                live_url = COALESCE($7, live_url),
                image_url = COALESCE($8, image_url),
                status = COALESCE($9, status),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.technologies)
        .bind(&changes.short_description)
        .bind(&changes.long_description)
        .bind(&changes.github_url)
        .bind(&changes.live_url)
        .bind(&changes.image_url)
        .bind(changes.status.map(|s| s.as_str().to_string()))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn get_project(&self, id: Uuid) -> Result<Option<ProjectRecord>, StoreError> {
        let row = sqlx::query_as::<_, ProjectRow>("SELECT * FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn list_projects(&self) -> Result<Vec<ProjectRecord>, StoreError> {
        let rows = sqlx::query_as::<_, ProjectRow>(
            "SELECT * FROM projects ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_projects_by_owner(
        &self,
        owner_id: &str,
    ) -> Result<Vec<ProjectRecord>, StoreError> {
        let rows = sqlx::query_as::<_, ProjectRow>(
            "SELECT * FROM projects WHERE owner_id = $1 ORDER BY created_at ASC, id ASC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn delete_project(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
