use crate::errors::AppError;
use crate::models::resume::ResumeRecord;
use crate::store::ResumeStore;

/// Case-insensitive substring search over the text fields of every
/// resume, in store order, capped at `limit` results. An empty or
/// whitespace-only query matches nothing.
pub async fn search_resumes(
    resumes: &dyn ResumeStore,
    query: &str,
    limit: usize,
) -> Result<Vec<ResumeRecord>, AppError> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Ok(Vec::new());
    }

    let records = resumes.list_resumes().await?;
    Ok(records
        .into_iter()
        .filter(|r| matches_query(r, &needle))
        .take(limit)
        .collect())
}

fn matches_query(record: &ResumeRecord, needle_lower: &str) -> bool {
    let haystack = format!(
        "{} {} {} {} {}",
        record.name, record.title, record.description, record.skills, record.experience
    )
    .to_lowercase();
    haystack.contains(needle_lower)
}
