use std::sync::Arc;

use crate::config::Config;
use crate::store::{BlobStore, ProjectStore, ResumeStore};

/// Shared application state injected into all route handlers via Axum
/// extractors. The store handles are trait objects so tests can swap in
/// the in-memory implementations.
#[derive(Clone)]
pub struct AppState {
    pub resumes: Arc<dyn ResumeStore>,
    pub projects: Arc<dyn ProjectStore>,
    pub blobs: Arc<dyn BlobStore>,
    pub config: Config,
}
