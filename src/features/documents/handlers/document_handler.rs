use axum::{
    extract::{multipart::MultipartError, Multipart, Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::guards::RequireTeacher;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::documents::dtos::{
    DocumentResponseDto, ReconcileResponseDto, SearchQuery, UploadDocumentDto,
};
use crate::features::documents::models::Visibility;
use crate::features::documents::policy::Caller;
use crate::features::documents::services::{DocumentService, DownloadedDocument};
use crate::shared::types::ApiResponse;

fn multipart_error(e: MultipartError) -> AppError {
    debug!("Failed to read multipart data: {}", e);
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::Validation(format!("File too large: {}", e.body_text()))
    } else {
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    }
}

/// Build the download response; `attachment` asks the client to save the file
fn file_response(document: DownloadedDocument, attachment: bool) -> Result<Response> {
    let mut response = (
        [(header::CONTENT_TYPE, HeaderValue::from_static(document.mime_type))],
        document.bytes,
    )
        .into_response();

    if attachment {
        let disposition = format!(
            "attachment; filename*=UTF-8''{}",
            urlencoding::encode(&document.file_name)
        );
        let value = HeaderValue::from_str(&disposition)
            .map_err(|e| AppError::Internal(format!("Invalid Content-Disposition: {}", e)))?;
        response
            .headers_mut()
            .insert(header::CONTENT_DISPOSITION, value);
    }

    Ok(response)
}

/// Upload a document
///
/// Accepts multipart/form-data with:
/// - `document`: The file to upload (required)
/// - `fileName`: Display name including extension (defaults to the uploaded file name)
/// - `fileType`: Visibility tier, PUBLIC, STUDENT or TEACHER (required)
#[utoipa::path(
    post,
    path = "/api/documents/",
    tag = "documents",
    request_body(
        content = UploadDocumentDto,
        content_type = "multipart/form-data",
    ),
    responses(
        (status = 201, description = "Document uploaded", body = ApiResponse<DocumentResponseDto>),
        (status = 400, description = "Invalid file, oversize upload or validation error"),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Teacher role required"),
        (status = 409, description = "A document with this name already exists"),
        (status = 503, description = "Object storage unavailable")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn upload_document(
    RequireTeacher(user): RequireTeacher,
    State(service): State<Arc<DocumentService>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<DocumentResponseDto>>)> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut uploaded_name: Option<String> = None;
    let mut content_type: Option<String> = None;
    let mut display_name: Option<String> = None;
    let mut visibility: Option<Visibility> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "document" => {
                content_type = field.content_type().map(|s| s.to_string());
                uploaded_name = field.file_name().map(|s| s.to_string());
                let data = field.bytes().await.map_err(multipart_error)?;
                file_data = Some(data.to_vec());
            }
            "fileName" => {
                let text = field.text().await.map_err(multipart_error)?;
                if !text.trim().is_empty() {
                    display_name = Some(text);
                }
            }
            "fileType" => {
                let text = field.text().await.map_err(multipart_error)?;
                visibility = Some(text.parse()?);
            }
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    let file_data =
        file_data.ok_or_else(|| AppError::BadRequest("Document file is required".to_string()))?;
    let display_name = display_name
        .or(uploaded_name)
        .ok_or_else(|| AppError::BadRequest("fileName is required".to_string()))?;
    let visibility =
        visibility.ok_or_else(|| AppError::BadRequest("fileType is required".to_string()))?;

    let document = service
        .save_file(
            file_data,
            &display_name,
            visibility,
            content_type.as_deref(),
            &Caller::from(&user),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(document), None, None)),
    ))
}

/// Search documents by name
#[utoipa::path(
    get,
    path = "/api/documents",
    tag = "documents",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching documents", body = ApiResponse<Vec<DocumentResponseDto>>),
        (status = 401, description = "Authentication required")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn search_documents(
    _user: AuthenticatedUser,
    State(service): State<Arc<DocumentService>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<DocumentResponseDto>>>> {
    let documents = service.get_all_by_name(&query.file_name).await?;
    Ok(Json(ApiResponse::list(documents)))
}

/// List public documents
#[utoipa::path(
    get,
    path = "/api/documents/public/",
    tag = "documents",
    responses(
        (status = 200, description = "Public documents", body = ApiResponse<Vec<DocumentResponseDto>>)
    )
)]
pub async fn list_public_documents(
    State(service): State<Arc<DocumentService>>,
) -> Result<Json<ApiResponse<Vec<DocumentResponseDto>>>> {
    let documents = service.get_all(Visibility::Public).await?;
    Ok(Json(ApiResponse::list(documents)))
}

/// List student documents
#[utoipa::path(
    get,
    path = "/api/documents/student/",
    tag = "documents",
    responses(
        (status = 200, description = "Student documents", body = ApiResponse<Vec<DocumentResponseDto>>),
        (status = 401, description = "Authentication required")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_student_documents(
    _user: AuthenticatedUser,
    State(service): State<Arc<DocumentService>>,
) -> Result<Json<ApiResponse<Vec<DocumentResponseDto>>>> {
    let documents = service.get_all(Visibility::Student).await?;
    Ok(Json(ApiResponse::list(documents)))
}

/// List teacher documents
#[utoipa::path(
    get,
    path = "/api/documents/teacher/",
    tag = "documents",
    responses(
        (status = 200, description = "Teacher documents", body = ApiResponse<Vec<DocumentResponseDto>>),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Teacher role required")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_teacher_documents(
    RequireTeacher(_user): RequireTeacher,
    State(service): State<Arc<DocumentService>>,
) -> Result<Json<ApiResponse<Vec<DocumentResponseDto>>>> {
    let documents = service.get_all(Visibility::Teacher).await?;
    Ok(Json(ApiResponse::list(documents)))
}

/// View a document inline
#[utoipa::path(
    get,
    path = "/api/documents/{id}",
    tag = "documents",
    params(("id" = Uuid, Path, description = "Document id")),
    responses(
        (status = 200, description = "Document content with its inferred MIME type"),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Not allowed to read this document"),
        (status = 404, description = "Document not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn view_document(
    user: AuthenticatedUser,
    State(service): State<Arc<DocumentService>>,
    Path(id): Path<Uuid>,
) -> Result<Response> {
    let document = service.get_file(id, false, &Caller::from(&user)).await?;
    file_response(document, false)
}

/// Download a document as an attachment
#[utoipa::path(
    get,
    path = "/api/documents/download/{id}",
    tag = "documents",
    params(("id" = Uuid, Path, description = "Document id")),
    responses(
        (status = 200, description = "Document content with its inferred MIME type"),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Not allowed to read this document"),
        (status = 404, description = "Document not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn download_document(
    user: AuthenticatedUser,
    State(service): State<Arc<DocumentService>>,
    Path(id): Path<Uuid>,
) -> Result<Response> {
    let document = service.get_file(id, false, &Caller::from(&user)).await?;
    file_response(document, true)
}

/// View a public document inline
#[utoipa::path(
    get,
    path = "/api/documents/public/{id}",
    tag = "documents",
    params(("id" = Uuid, Path, description = "Document id")),
    responses(
        (status = 200, description = "Document content with its inferred MIME type"),
        (status = 403, description = "Document is not public"),
        (status = 404, description = "Document not found")
    )
)]
pub async fn view_public_document(
    user: Option<AuthenticatedUser>,
    State(service): State<Arc<DocumentService>>,
    Path(id): Path<Uuid>,
) -> Result<Response> {
    let document = service
        .get_file(id, true, &Caller::from(user.as_ref()))
        .await?;
    file_response(document, false)
}

/// Download a public document as an attachment
#[utoipa::path(
    get,
    path = "/api/documents/public/download/{id}",
    tag = "documents",
    params(("id" = Uuid, Path, description = "Document id")),
    responses(
        (status = 200, description = "Document content with its inferred MIME type"),
        (status = 403, description = "Document is not public"),
        (status = 404, description = "Document not found")
    )
)]
pub async fn download_public_document(
    user: Option<AuthenticatedUser>,
    State(service): State<Arc<DocumentService>>,
    Path(id): Path<Uuid>,
) -> Result<Response> {
    let document = service
        .get_file(id, true, &Caller::from(user.as_ref()))
        .await?;
    file_response(document, true)
}

/// Delete a document
#[utoipa::path(
    delete,
    path = "/api/documents/{id}",
    tag = "documents",
    params(("id" = Uuid, Path, description = "Document id")),
    responses(
        (status = 200, description = "Document deleted"),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Teacher role required"),
        (status = 404, description = "Document not found"),
        (status = 503, description = "Object storage unavailable")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_document(
    RequireTeacher(user): RequireTeacher,
    State(service): State<Arc<DocumentService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete_file(id, &Caller::from(&user)).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Document deleted successfully".to_string()),
        None,
    )))
}

/// Remove records whose stored file is missing
#[utoipa::path(
    post,
    path = "/api/documents/reconcile",
    tag = "documents",
    responses(
        (status = 200, description = "Sweep finished", body = ApiResponse<ReconcileResponseDto>),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Teacher role required"),
        (status = 503, description = "Object storage unavailable")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn reconcile_documents(
    RequireTeacher(user): RequireTeacher,
    State(service): State<Arc<DocumentService>>,
) -> Result<Json<ApiResponse<ReconcileResponseDto>>> {
    let removed_ids = service.reconcile(&Caller::from(&user)).await?;
    Ok(Json(ApiResponse::success(
        Some(ReconcileResponseDto { removed_ids }),
        None,
        None,
    )))
}
