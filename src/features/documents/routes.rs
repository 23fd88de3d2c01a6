use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::documents::handlers;
use crate::features::documents::services::DocumentService;

/// Public document routes (anonymous callers allowed)
pub fn public_routes(service: Arc<DocumentService>) -> Router {
    Router::new()
        .route("/api/documents/public/", get(handlers::list_public_documents))
        .route("/api/documents/public/{id}", get(handlers::view_public_document))
        .route(
            "/api/documents/public/download/{id}",
            get(handlers::download_public_document),
        )
        .with_state(service)
}

/// Protected document routes (require JWT authentication)
///
/// `upload_body_limit` caps the multipart request, not the file itself.
pub fn protected_routes(service: Arc<DocumentService>, upload_body_limit: usize) -> Router {
    Router::new()
        .route("/api/documents", get(handlers::search_documents))
        .route(
            "/api/documents/",
            post(handlers::upload_document).layer(DefaultBodyLimit::max(upload_body_limit)),
        )
        .route("/api/documents/student/", get(handlers::list_student_documents))
        .route("/api/documents/teacher/", get(handlers::list_teacher_documents))
        .route("/api/documents/reconcile", post(handlers::reconcile_documents))
        .route(
            "/api/documents/download/{id}",
            get(handlers::download_document),
        )
        .route(
            "/api/documents/{id}",
            get(handlers::view_document).delete(handlers::delete_document),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::model::AuthenticatedUser;
    use crate::features::documents::models::Visibility;
    use crate::features::documents::repositories::InMemoryDocumentRepository;
    use crate::features::documents::rules::DocumentRules;
    use crate::modules::storage::InMemoryBlobStore;
    use crate::shared::test_helpers::{create_student_user, create_teacher_user, with_auth};
    use axum::http::StatusCode;
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use fake::faker::lorem::en::Paragraph;
    use fake::Fake;
    use serde_json::Value;

    const BODY_LIMIT: usize = 8 * 1024 * 1024;

    fn service() -> Arc<DocumentService> {
        Arc::new(DocumentService::new(
            Arc::new(InMemoryDocumentRepository::new()),
            Arc::new(InMemoryBlobStore::new()),
            DocumentRules::default(),
        ))
    }

    fn server(service: &Arc<DocumentService>, user: Option<AuthenticatedUser>) -> TestServer {
        let mut router = public_routes(Arc::clone(service))
            .merge(protected_routes(Arc::clone(service), BODY_LIMIT));
        if let Some(user) = user {
            router = with_auth(router, user);
        }
        TestServer::new(router).unwrap()
    }

    fn upload_form(name: &str, visibility: &str, body: &str) -> MultipartForm {
        MultipartForm::new()
            .add_part(
                "document",
                Part::text(body.to_string())
                    .file_name(name.to_string())
                    .mime_type("application/octet-stream"),
            )
            .add_text("fileName", name)
            .add_text("fileType", visibility)
    }

    async fn upload(server: &TestServer, name: &str, visibility: &str, body: &str) -> String {
        let response = server
            .post("/api/documents/")
            .multipart(upload_form(name, visibility, body))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);

        let json: Value = response.json();
        json["data"]["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_upload_and_download() {
        let service = service();
        let teacher = server(&service, Some(create_teacher_user()));
        let student = server(&service, Some(create_student_user()));
        let body: String = Paragraph(2..4).fake();

        let id = upload(&teacher, "Week 3 notes.pdf", "STUDENT", &body).await;

        let response = student.get(&format!("/api/documents/{}", id)).await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.header("content-type"), "application/pdf");
        assert_eq!(response.text(), body);

        let response = student.get(&format!("/api/documents/download/{}", id)).await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(
            response.header("content-disposition"),
            "attachment; filename*=UTF-8''Week%203%20notes.pdf"
        );
    }

    #[tokio::test]
    async fn test_upload_response_shape() {
        let service = service();
        let teacher = server(&service, Some(create_teacher_user()));

        let response = teacher
            .post("/api/documents/")
            .multipart(upload_form("syllabus.docx", "public", "contents"))
            .await;
        assert_eq!(response.status_code(), StatusCode::CREATED);

        let json: Value = response.json();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["fileName"], "syllabus.docx");
        assert_eq!(json["data"]["fileExtension"], "docx");
        assert_eq!(json["data"]["fileType"], "PUBLIC");
    }

    #[tokio::test]
    async fn test_student_cannot_upload_or_delete() {
        let service = service();
        let teacher = server(&service, Some(create_teacher_user()));
        let student = server(&service, Some(create_student_user()));

        let response = student
            .post("/api/documents/")
            .multipart(upload_form("a.txt", "STUDENT", "x"))
            .await;
        assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

        let id = upload(&teacher, "a.txt", "STUDENT", "x").await;
        let response = student.delete(&format!("/api/documents/{}", id)).await;
        assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_upload_validation_errors() {
        let service = service();
        let teacher = server(&service, Some(create_teacher_user()));

        let response = teacher
            .post("/api/documents/")
            .multipart(upload_form("virus.exe", "PUBLIC", "x"))
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

        let response = teacher
            .post("/api/documents/")
            .multipart(upload_form("a.txt", "SECRET", "x"))
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

        let response = teacher
            .post("/api/documents/")
            .multipart(MultipartForm::new().add_text("fileName", "a.txt"))
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_oversize_body_is_validation_error() {
        let service = service();
        let router = with_auth(
            protected_routes(Arc::clone(&service), 1024),
            create_teacher_user(),
        );
        let teacher = TestServer::new(router).unwrap();

        let response = teacher
            .post("/api/documents/")
            .multipart(upload_form("big.txt", "PUBLIC", &"x".repeat(4096)))
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

        let json: Value = response.json();
        assert_eq!(json["success"], false);
        assert!(service.get_all(Visibility::Public).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_name_conflicts() {
        let service = service();
        let teacher = server(&service, Some(create_teacher_user()));

        upload(&teacher, "same.txt", "PUBLIC", "one").await;
        let response = teacher
            .post("/api/documents/")
            .multipart(upload_form("same.txt", "TEACHER", "two"))
            .await;
        assert_eq!(response.status_code(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_anonymous_access() {
        let service = service();
        let teacher = server(&service, Some(create_teacher_user()));
        let anonymous = server(&service, None);

        let public_id = upload(&teacher, "welcome.txt", "PUBLIC", "hello").await;
        let student_id = upload(&teacher, "homework.txt", "STUDENT", "secret").await;

        let response = anonymous.get("/api/documents/public/").await;
        assert_eq!(response.status_code(), StatusCode::OK);
        let json: Value = response.json();
        assert_eq!(json["meta"]["total"], 1);

        let response = anonymous
            .get(&format!("/api/documents/public/{}", public_id))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.header("content-type"), "text/plain");

        let response = anonymous
            .get(&format!("/api/documents/public/download/{}", student_id))
            .await;
        assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

        let response = anonymous.get(&format!("/api/documents/{}", student_id)).await;
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

        let response = anonymous.get("/api/documents/student/").await;
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_teacher_listing_is_gated() {
        let service = service();
        let teacher = server(&service, Some(create_teacher_user()));
        let student = server(&service, Some(create_student_user()));

        upload(&teacher, "answers.pdf", "TEACHER", "42").await;

        let response = student.get("/api/documents/teacher/").await;
        assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

        let response = teacher.get("/api/documents/teacher/").await;
        assert_eq!(response.status_code(), StatusCode::OK);
        let json: Value = response.json();
        assert_eq!(json["data"][0]["fileName"], "answers.pdf");
    }

    #[tokio::test]
    async fn test_search_by_name() {
        let service = service();
        let teacher = server(&service, Some(create_teacher_user()));
        let student = server(&service, Some(create_student_user()));

        upload(&teacher, "Annual Report.pdf", "PUBLIC", "a").await;
        upload(&teacher, "timetable.png", "STUDENT", "b").await;

        let response = student
            .get("/api/documents")
            .add_query_param("fileName", "report")
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
        let json: Value = response.json();
        assert_eq!(json["meta"]["total"], 1);
        assert_eq!(json["data"][0]["fileName"], "Annual Report.pdf");
    }

    #[tokio::test]
    async fn test_delete_then_not_found() {
        let service = service();
        let teacher = server(&service, Some(create_teacher_user()));

        let id = upload(&teacher, "old.zip", "TEACHER", "zip").await;

        let response = teacher.delete(&format!("/api/documents/{}", id)).await;
        assert_eq!(response.status_code(), StatusCode::OK);

        let response = teacher.delete(&format!("/api/documents/{}", id)).await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

        let response = teacher.get(&format!("/api/documents/{}", id)).await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_reconcile_requires_teacher() {
        let service = service();
        let teacher = server(&service, Some(create_teacher_user()));
        let student = server(&service, Some(create_student_user()));

        let response = student.post("/api/documents/reconcile").await;
        assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

        let response = teacher.post("/api/documents/reconcile").await;
        assert_eq!(response.status_code(), StatusCode::OK);
        let json: Value = response.json();
        assert_eq!(json["data"]["removedIds"], serde_json::json!([]));
    }
}
