use axum::{extract::State, Extension};

use crate::auth::{
    jwt::create_access_token,
    middleware::AuthUser,
    password::{hash_password, verify_password},
};
use crate::error::{AppError, AppResult};
use crate::models::user::{
    AuthResponse, LoginRequest, RegisterRequest, UpdateProfileRequest, User, UserProfile,
    UserRole,
};
use crate::repositories::users::{ProfileChanges, UserRepository};
use crate::response::{ApiResponse, ValidatedJson};
use crate::AppState;

fn issue_session(user: User, state: &AppState) -> AppResult<AuthResponse> {
    let role = UserRole::from_db(&user.role);
    let token = create_access_token(user.id, &user.email, role, &state.config)?;
    Ok(AuthResponse {
        token,
        expires_in: state.config.jwt_access_ttl_secs,
        user: user.into(),
    })
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<RegisterRequest>,
) -> AppResult<ApiResponse<AuthResponse>> {
    let users = UserRepository::new(&state.db, &state.tables);
    let email = normalize_email(&body.email);

    if users.email_exists(&email).await? {
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let pwd_hash = hash_password(&body.password)?;
    let user_id = users
        .create(&email, &pwd_hash, body.name.trim(), UserRole::User)
        .await?;

    let user = users
        .find_active_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("User {} vanished after insert", user_id)))?;

    tracing::info!(user_id, "User registered");
    Ok(ApiResponse::created(issue_session(user, &state)?).with_message("Usuario registrado"))
}

pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<LoginRequest>,
) -> AppResult<ApiResponse<AuthResponse>> {
    let user = UserRepository::new(&state.db, &state.tables)
        .find_active_by_email(&normalize_email(&body.email))
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !verify_password(&body.password, &user.password_hash)? {
        tracing::debug!(user_id = user.id, "Login rejected: bad password");
        return Err(AppError::Unauthorized);
    }

    Ok(ApiResponse::ok(issue_session(user, &state)?))
}

pub async fn me(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<ApiResponse<UserProfile>> {
    let user = UserRepository::new(&state.db, &state.tables)
        .find_active_by_id(auth_user.id)
        .await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    Ok(ApiResponse::ok(user.into()))
}

pub async fn update_me(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ValidatedJson(body): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<ApiResponse<UserProfile>> {
    let changes = ProfileChanges {
        name: body.name.as_deref().map(str::trim),
        phone: body.phone.as_deref(),
        baby_name: body.baby_name.as_deref(),
        baby_birth_date: body.baby_birth_date,
    };

    let user = UserRepository::new(&state.db, &state.tables)
        .update_profile(auth_user.id, changes)
        .await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    Ok(ApiResponse::ok(user.into()).with_message("Perfil actualizado"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ana@Example.COM "), "ana@example.com");
    }
}
