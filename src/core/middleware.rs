use crate::core::error::AppError;
use crate::features::auth::JwtValidator;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::prelude::*;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestId, RequestId};
use tracing::Span;
use uuid::Uuid;

/// Request ID generator using UUID v7 (time-ordered)
#[derive(Clone, Copy)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Custom MakeSpan that includes request_id in the tracing span
#[derive(Clone, Debug)]
pub struct MakeSpanWithRequestId;

impl<B> tower_http::trace::MakeSpan<B> for MakeSpanWithRequestId {
    fn make_span(&mut self, request: &axum::http::Request<B>) -> Span {
        let request_id = request
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");

        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    }
}

pub fn cors_layer(allowed_origins: Vec<String>) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    // If origins list contains "*", allow any origin
    if allowed_origins.iter().any(|o| o == "*") {
        cors.allow_origin(Any)
    } else {
        // Parse origins into HeaderValue
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(AllowOrigin::list(origins))
    }
}

pub fn basic_auth_middleware(
    valid_credentials: Arc<String>,
) -> impl Fn(
    Request,
    Next,
)
    -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, Response>> + Send>>
       + Clone {
    move |req: Request, next: Next| {
        let credentials = valid_credentials.clone();
        Box::pin(async move {
            let auth_header = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|header| header.to_str().ok());

            if let Some(auth_header) = auth_header {
                if let Some(encoded) = auth_header.strip_prefix("Basic ") {
                    if let Ok(decoded) = BASE64_STANDARD.decode(encoded) {
                        if let Ok(creds) = String::from_utf8(decoded) {
                            if creds == *credentials {
                                return Ok(next.run(req).await);
                            }
                        }
                    }
                }
            }

            Err((
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, "Basic realm=\"Swagger UI\"")],
                "Unauthorized",
            )
                .into_response())
        })
    }
}

/// Extract the bearer token from the Authorization header, if any
fn bearer_token(req: &Request) -> Result<Option<&str>, AppError> {
    let auth_header = match req.headers().get(header::AUTHORIZATION) {
        Some(value) => value
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid authorization header".to_string()))?,
        None => return Ok(None),
    };

    auth_header
        .strip_prefix("Bearer ")
        .map(Some)
        .ok_or_else(|| AppError::Unauthorized("Invalid authorization header format".to_string()))
}

/// Require a valid bearer token and attach the caller to the request
pub async fn auth_middleware(
    State(validator): State<Arc<JwtValidator>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&req)?
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".to_string()))?;

    let user = validator.validate_token(token)?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Attach the caller when a bearer token is present; anonymous otherwise.
///
/// A present but invalid token is still rejected.
pub async fn optional_auth_middleware(
    State(validator): State<Arc<JwtValidator>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(token) = bearer_token(&req)? {
        let user = validator.validate_token(token)?;
        req.extensions_mut().insert(user);
    }
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::model::AuthenticatedUser;
    use crate::features::auth::services::TokenService;
    use crate::core::config::AuthConfig;
    use crate::shared::test_helpers::create_student_user;
    use axum::{middleware::from_fn_with_state, routing::get, Router};
    use axum_test::TestServer;
    use std::time::Duration;

    const SECRET: &str = "middleware-secret-middleware-secret!";

    fn auth_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: SECRET.to_string(),
            issuer: "documents-core".to_string(),
            token_expiry: Duration::from_secs(600),
            jwt_leeway: Duration::ZERO,
            bootstrap_teacher: None,
        }
    }

    async fn whoami(user: Option<AuthenticatedUser>) -> String {
        user.map(|u| u.username).unwrap_or_else(|| "anonymous".to_string())
    }

    fn server(optional: bool) -> TestServer {
        let config = auth_config();
        let validator = Arc::new(JwtValidator::new(SECRET, config.issuer, config.jwt_leeway));
        let router = Router::new().route("/whoami", get(whoami));
        let router = if optional {
            router.route_layer(from_fn_with_state(validator, optional_auth_middleware))
        } else {
            router.route_layer(from_fn_with_state(validator, auth_middleware))
        };
        TestServer::new(router).unwrap()
    }

    fn bearer() -> String {
        let token = TokenService::new(&auth_config())
            .issue(&create_student_user())
            .unwrap();
        format!("Bearer {}", token.access_token)
    }

    #[tokio::test]
    async fn test_required_auth() {
        let server = server(false);

        let response = server.get("/whoami").await;
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

        let response = server.get("/whoami").add_header("Authorization", bearer()).await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.text(), "test_student");
    }

    #[tokio::test]
    async fn test_optional_auth() {
        let server = server(true);

        let response = server.get("/whoami").await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.text(), "anonymous");

        let response = server.get("/whoami").add_header("Authorization", bearer()).await;
        assert_eq!(response.text(), "test_student");

        // A bad token is rejected rather than treated as anonymous
        let response = server
            .get("/whoami")
            .add_header("Authorization", "Bearer not.a.jwt")
            .await;
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

        let response = server
            .get("/whoami")
            .add_header("Authorization", "Basic Zm9vOmJhcg==")
            .await;
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    }
}
