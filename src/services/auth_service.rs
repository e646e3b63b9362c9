use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::middleware::auth::Claims;
use crate::models::user::{CreateUser, User, ALL_ROLES};
use crate::utils::{crypto, token};

const RESET_TOKEN_LENGTH: usize = 48;
const RESET_TOKEN_TTL_HOURS: i64 = 2;

#[derive(Clone)]
pub struct AuthService {
    pool: PgPool,
}

impl AuthService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn signup(&self, payload: CreateUser) -> Result<(User, String)> {
        if !ALL_ROLES.contains(&payload.role.as_str()) {
            return Err(Error::BadRequest(format!(
                "Unknown role: {}",
                payload.role
            )));
        }

        let exists = sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE email = $1")
            .bind(&payload.email)
            .fetch_optional(&self.pool)
            .await?;
        if exists.is_some() {
            return Err(Error::Conflict(
                "A user with this email already exists".to_string(),
            ));
        }

        let password_hash = crypto::hash_password(&payload.password)
            .map_err(|e| Error::Internal(format!("Password hashing failed: {}", e)))?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&payload.name)
        .bind(&payload.email)
        .bind(&password_hash)
        .bind(&payload.role)
        .fetch_one(&self.pool)
        .await?;

        let token = self.issue_token(&user)?;
        Ok((user, token))
    }

    pub async fn signin(&self, email: &str, password: &str) -> Result<(User, String)> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::Unauthorized("invalid_credentials".to_string()))?;

        if !user.is_active {
            return Err(Error::Unauthorized("account_disabled".to_string()));
        }

        let ok = crypto::verify_password(password, &user.password_hash)
            .map_err(|e| Error::Internal(format!("Password verification failed: {}", e)))?;
        if !ok {
            return Err(Error::Unauthorized("invalid_credentials".to_string()));
        }

        let token = self.issue_token(&user)?;
        Ok((user, token))
    }

    /// Session resolver: loads the user behind a decoded token. An
    /// unknown or deactivated user reads the same as no session.
    pub async fn current_user(&self, claims: &Claims) -> Result<User> {
        let user_id = claims.user_id()?;
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 AND is_active")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::Unauthorized("invalid_token".to_string()))?;
        Ok(user)
    }

    pub fn issue_token(&self, user: &User) -> Result<String> {
        let config = crate::config::get_config();
        let exp = Utc::now() + Duration::minutes(config.session_ttl_minutes);
        let claims = Claims {
            sub: user.id.to_string(),
            exp: exp.timestamp() as usize,
            email: user.email.clone(),
            role: user.role.clone(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .map_err(|e| Error::Internal(format!("Token encoding failed: {}", e)))?;
        Ok(token)
    }

    /// Issues a reset token for the address, or silently succeeds when
    /// the address is unknown so the route does not reveal which emails
    /// are registered.
    pub async fn request_password_reset(&self, email: &str) -> Result<Option<String>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1 AND is_active")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        let Some(user) = user else {
            return Ok(None);
        };

        let raw = token::generate_reset_token(RESET_TOKEN_LENGTH);
        let token_hash = crypto::hash_password(&raw)
            .map_err(|e| Error::Internal(format!("Token hashing failed: {}", e)))?;
        let expires_at = Utc::now() + Duration::hours(RESET_TOKEN_TTL_HOURS);

        sqlx::query(
            r#"
            INSERT INTO password_resets (user_id, token_hash, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(user.id)
        .bind(&token_hash)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        Ok(Some(raw))
    }

    pub async fn confirm_password_reset(
        &self,
        email: &str,
        raw_token: &str,
        new_password: &str,
    ) -> Result<()> {
        let row = sqlx::query_as::<_, crate::models::user::PasswordReset>(
            r#"
            SELECT pr.* FROM password_resets pr
            JOIN users u ON u.id = pr.user_id
            WHERE u.email = $1 AND NOT pr.used AND pr.expires_at > NOW()
            ORDER BY pr.created_at DESC
            LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::Unauthorized("invalid_reset_token".to_string()))?;

        let ok = crypto::verify_password(raw_token, &row.token_hash)
            .map_err(|e| Error::Internal(format!("Token verification failed: {}", e)))?;
        if !ok {
            return Err(Error::Unauthorized("invalid_reset_token".to_string()));
        }

        let password_hash = crypto::hash_password(new_password)
            .map_err(|e| Error::Internal(format!("Password hashing failed: {}", e)))?;

        let mut tx = self.pool.begin().await?;
        sqlx::query("UPDATE users SET password_hash = $1, updated_at = NOW() WHERE id = $2")
            .bind(&password_hash)
            .bind(row.user_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE password_resets SET used = TRUE WHERE id = $1")
            .bind(row.id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }
}
