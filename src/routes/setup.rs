use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use subtle::ConstantTimeEq;

use crate::{
    config::get_config,
    error::{Error, Result},
    models::user::{ROLE_EMPLOYER, ROLE_JOB_SEEKER, ROLE_VOLUNTEER},
    utils::crypto,
    AppState,
};

const DEMO_ACCOUNTS: &[(&str, &str, &str)] = &[
    ("Demo Seeker", "seeker@demo.hopeandhire.net", ROLE_JOB_SEEKER),
    ("Demo Volunteer", "volunteer@demo.hopeandhire.net", ROLE_VOLUNTEER),
    ("Demo Employer", "employer@demo.hopeandhire.net", ROLE_EMPLOYER),
];

#[derive(Debug, Deserialize)]
pub struct SetupDemoPayload {
    pub password: String,
    /// When set, existing demo rows are dropped and recreated.
    #[serde(default)]
    pub recreate: bool,
}

/// Administrative bootstrap of the fixed demo accounts. Gated by the
/// shared setup secret, never by a session.
pub async fn create_demo_users(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
    Json(payload): Json<SetupDemoPayload>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    verify_secret(&headers)?;
    if payload.password.len() < 8 {
        return Err(Error::BadRequest(
            "Demo password must be at least 8 characters".to_string(),
        ));
    }

    let password_hash = crypto::hash_password(&payload.password)
        .map_err(|e| Error::Internal(format!("Password hashing failed: {}", e)))?;

    let mut created = Vec::new();
    for (name, email, role) in DEMO_ACCOUNTS {
        if payload.recreate {
            sqlx::query("DELETE FROM users WHERE email = $1")
                .bind(email)
                .execute(&state.pool)
                .await?;
        }
        let inserted = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            INSERT INTO users (name, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO UPDATE SET password_hash = EXCLUDED.password_hash
            RETURNING id
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(&password_hash)
        .bind(role)
        .fetch_one(&state.pool)
        .await?;
        created.push(serde_json::json!({ "id": inserted, "email": email, "role": role }));
    }

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "users": created })),
    ))
}

fn verify_secret(headers: &axum::http::HeaderMap) -> Result<()> {
    let Some(secret_hdr) = headers.get("x-setup-secret") else {
        return Err(Error::Unauthorized("missing_setup_secret".into()));
    };
    let provided = secret_hdr
        .to_str()
        .map_err(|_| Error::Unauthorized("invalid_secret_header".into()))?;
    let expected = &get_config().setup_secret;
    if ConstantTimeEq::ct_eq(provided.as_bytes(), expected.as_bytes()).into() {
        Ok(())
    } else {
        Err(Error::Unauthorized("invalid_setup_secret".into()))
    }
}
