// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// Teacher role - can upload and delete documents and read every tier
pub const ROLE_TEACHER: &str = "TEACHER";

/// Student role - can read public and student documents
pub const ROLE_STUDENT: &str = "STUDENT";

// =============================================================================
// DOWNLOADS
// =============================================================================

/// MIME type used when a document's extension has no known mapping
pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";
