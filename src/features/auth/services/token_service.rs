use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::{AuthenticatedUser, Claims};
use crate::features::auth::validator::TOKEN_TYPE_BEARER;
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};

/// Signed access token plus its lifetime
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    pub expires_in: i64,
}

/// Issues HS256 access tokens for authenticated accounts
pub struct TokenService {
    encoding_key: EncodingKey,
    issuer: String,
    expiry_secs: u64,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: config.issuer.clone(),
            expiry_secs: config.token_expiry.as_secs(),
        }
    }

    pub fn issue(&self, user: &AuthenticatedUser) -> Result<IssuedToken> {
        let now = Utc::now().timestamp().max(0) as u64;

        let claims = Claims {
            sub: user.user_id.to_string(),
            iss: self.issuer.clone(),
            iat: now,
            exp: now + self.expiry_secs,
            username: user.username.clone(),
            roles: user.roles.clone(),
            token_type: TOKEN_TYPE_BEARER.to_string(),
        };

        let access_token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign access token: {}", e)))?;

        Ok(IssuedToken {
            access_token,
            expires_in: self.expiry_secs as i64,
        })
    }
}
