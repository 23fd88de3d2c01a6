use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::database::unique_violation;
use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{AuthResponseDto, CreateUserDto, LoginRequestDto, UserDto};
use crate::features::auth::model::{AuthenticatedUser, Role, UserAccount};
use crate::features::auth::password::{hash_password, verify_password, PasswordError};
use crate::features::auth::services::TokenService;
use crate::features::auth::validator::TOKEN_TYPE_BEARER;

/// Account lookup, password login and user provisioning
pub struct AuthService {
    pool: PgPool,
    token_service: Arc<TokenService>,
}

impl AuthService {
    pub fn new(pool: PgPool, token_service: Arc<TokenService>) -> Self {
        Self {
            pool,
            token_service,
        }
    }

    /// Exchange username/password for an access token
    pub async fn login(&self, dto: LoginRequestDto) -> Result<AuthResponseDto> {
        let account = self.find_by_username(&dto.username).await?;

        let account = match account {
            Some(account) => account,
            None => {
                debug!("Login attempt for unknown username '{}'", dto.username);
                return Err(invalid_credentials());
            }
        };

        // Argon2 verification is CPU bound
        let password = dto.password;
        let hash = account.password_hash.clone();
        let verified = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))?;

        match verified {
            Ok(()) => {}
            Err(PasswordError::VerificationFailed) => {
                debug!("Wrong password for '{}'", account.username);
                return Err(invalid_credentials());
            }
            Err(e) => {
                return Err(AppError::Internal(format!(
                    "Stored password hash for '{}' is unusable: {}",
                    account.username, e
                )))
            }
        }

        let user = AuthenticatedUser::from(&account);
        let token = self.token_service.issue(&user)?;

        info!("Issued access token for user={}", account.id);

        Ok(AuthResponseDto {
            access_token: token.access_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: token.expires_in,
            user: UserDto::from(&account),
        })
    }

    pub async fn get_current_user(&self, user: &AuthenticatedUser) -> Result<UserDto> {
        let account = sqlx::query_as::<_, UserAccount>(
            r#"
            SELECT id, username, password_hash, role, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user.user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(UserDto::from(&account))
    }

    /// Create a user account (teachers provision accounts)
    pub async fn create_user(&self, dto: CreateUserDto) -> Result<UserDto> {
        let account = self.insert_account(&dto.username, dto.password, dto.role).await?;
        info!(
            "User created: id={}, username={}, role={}",
            account.id, account.username, account.role
        );
        Ok(UserDto::from(&account))
    }

    /// Create the configured teacher account unless the username is taken
    pub async fn ensure_bootstrap_teacher(&self, username: &str, password: &str) -> Result<()> {
        if self.find_by_username(username).await?.is_some() {
            debug!("Bootstrap teacher '{}' already exists", username);
            return Ok(());
        }

        match self
            .insert_account(username, password.to_string(), Role::Teacher)
            .await
        {
            Ok(account) => {
                info!("Bootstrap teacher '{}' created: id={}", username, account.id);
                Ok(())
            }
            // Another instance won the race
            Err(AppError::DuplicateName(_)) => {
                warn!("Bootstrap teacher '{}' was created concurrently", username);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserAccount>> {
        let account = sqlx::query_as::<_, UserAccount>(
            r#"
            SELECT id, username, password_hash, role, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn insert_account(
        &self,
        username: &str,
        password: String,
        role: Role,
    ) -> Result<UserAccount> {
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
            .map_err(|e| match e {
                PasswordError::TooShort | PasswordError::TooLong => {
                    AppError::Validation(e.to_string())
                }
                other => AppError::Internal(other.to_string()),
            })?;

        sqlx::query_as::<_, UserAccount>(
            r#"
            INSERT INTO users (id, username, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, password_hash, role, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(password_hash)
        .bind(role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match unique_violation(&e) {
            Some(_) => AppError::DuplicateName(format!("Username '{}' is already taken", username)),
            None => AppError::Database(e),
        })
    }
}

fn invalid_credentials() -> AppError {
    AppError::Auth("Invalid username or password".to_string())
}
