use bytes::Bytes;

use crate::errors::AppError;
use crate::models::resume::ResumeFields;

/// Hard ceiling on uploaded resume files. Enforced here and, with a small
/// framing allowance, by the router body limit.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// MIME types a resume upload may carry.
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "text/plain",
];

/// An uploaded resume file, decoded from the multipart request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub original_file_name: String,
    pub mime_type: String,
    pub bytes: Bytes,
}

/// Checks the required text fields before any store access.
pub fn validate_fields(owner_id: &str, fields: &ResumeFields) -> Result<(), AppError> {
    if owner_id.trim().is_empty() {
        return Err(AppError::Validation("ownerId is required".to_string()));
    }
    if fields.name.trim().is_empty() {
        return Err(AppError::Validation("name is required".to_string()));
    }
    if fields.email.trim().is_empty() {
        return Err(AppError::Validation("email is required".to_string()));
    }
    Ok(())
}

/// Checks an uploaded file against the size ceiling and MIME allowlist
/// before any bytes reach the blob store.
pub fn validate_file(file: &UploadedFile) -> Result<(), AppError> {
    if file.bytes.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }
    if file.bytes.len() > MAX_UPLOAD_BYTES {
        return Err(AppError::Validation(format!(
            "File exceeds the {} MB upload limit",
            MAX_UPLOAD_BYTES / (1024 * 1024)
        )));
    }
    if !ALLOWED_MIME_TYPES.contains(&file.mime_type.as_str()) {
        return Err(AppError::UnsupportedMediaType(format!(
            "File type '{}' is not allowed. Accepted: PDF, DOC, DOCX, TXT",
            file.mime_type
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_fields(name: &str, email: &str) -> ResumeFields {
        ResumeFields {
            name: name.to_string(),
            email: email.to_string(),
            ..ResumeFields::default()
        }
    }

    fn make_file(mime: &str, len: usize) -> UploadedFile {
        UploadedFile {
            original_file_name: "resume.pdf".to_string(),
            mime_type: mime.to_string(),
            bytes: Bytes::from(vec![0u8; len]),
        }
    }

    #[test]
    fn test_valid_fields_pass() {
        assert!(validate_fields("u1", &make_fields("Ada", "ada@example.com")).is_ok());
    }

    #[test]
    fn test_missing_owner_rejected() {
        assert!(validate_fields("  ", &make_fields("Ada", "ada@example.com")).is_err());
    }

    #[test]
    fn test_missing_name_rejected() {
        assert!(validate_fields("u1", &make_fields("", "ada@example.com")).is_err());
    }

    #[test]
    fn test_missing_email_rejected() {
        assert!(validate_fields("u1", &make_fields("Ada", "   ")).is_err());
    }

    #[test]
    fn test_allowed_mime_types_pass() {
        for mime in ALLOWED_MIME_TYPES {
            assert!(validate_file(&make_file(mime, 128)).is_ok(), "{mime}");
        }
    }

    #[test]
    fn test_disallowed_mime_rejected() {
        let err = validate_file(&make_file("image/png", 128)).unwrap_err();
        assert!(matches!(err, AppError::UnsupportedMediaType(_)));
    }

    #[test]
    fn test_empty_file_rejected() {
        assert!(validate_file(&make_file("application/pdf", 0)).is_err());
    }

    #[test]
    fn test_file_at_limit_passes() {
        assert!(validate_file(&make_file("application/pdf", MAX_UPLOAD_BYTES)).is_ok());
    }

    #[test]
    fn test_file_over_limit_rejected() {
        let err = validate_file(&make_file("application/pdf", MAX_UPLOAD_BYTES + 1)).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
