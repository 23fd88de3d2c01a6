use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth;
use crate::features::documents::{
    dtos as documents_dtos, handlers as documents_handlers, models as documents_models,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::issue_token,
        auth::handlers::get_me,
        auth::handlers::create_user,
        // Documents
        documents_handlers::search_documents,
        documents_handlers::list_public_documents,
        documents_handlers::list_student_documents,
        documents_handlers::list_teacher_documents,
        documents_handlers::view_document,
        documents_handlers::download_document,
        documents_handlers::view_public_document,
        documents_handlers::download_public_document,
        documents_handlers::upload_document,
        documents_handlers::delete_document,
        documents_handlers::reconcile_documents,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Auth
            auth::model::Role,
            auth::dtos::LoginRequestDto,
            auth::dtos::CreateUserDto,
            auth::dtos::AuthResponseDto,
            auth::dtos::UserDto,
            ApiResponse<auth::dtos::AuthResponseDto>,
            ApiResponse<auth::dtos::UserDto>,
            // Documents
            documents_models::Visibility,
            documents_dtos::UploadDocumentDto,
            documents_dtos::DocumentResponseDto,
            documents_dtos::ReconcileResponseDto,
            ApiResponse<documents_dtos::DocumentResponseDto>,
            ApiResponse<Vec<documents_dtos::DocumentResponseDto>>,
            ApiResponse<documents_dtos::ReconcileResponseDto>,
        )
    ),
    tags(
        (name = "auth", description = "Token issuance and user accounts"),
        (name = "documents", description = "Document upload, listing, download and deletion"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Documents API",
        version = "0.1.0",
        description = "API documentation for the documents service",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
