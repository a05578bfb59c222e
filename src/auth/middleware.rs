use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::auth::jwt::verify_token;
use crate::error::{AppError, AppResult};
use crate::models::user::UserRole;
use crate::AppState;

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    #[allow(dead_code)]
    pub email: String,
    pub role: UserRole,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Routes scoped by `:userId` may only be used by that user or an admin.
    pub fn ensure_can_access(&self, user_id: i64) -> AppResult<()> {
        if self.id == user_id || self.is_admin() {
            Ok(())
        } else {
            tracing::warn!(caller = self.id, target_user = user_id, "Cross-user access denied");
            Err(AppError::Forbidden)
        }
    }
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AppError::Unauthorized)?;

    let token_data = verify_token(token, &state.config)?;

    let auth_user = AuthUser {
        id: token_data.claims.sub,
        email: token_data.claims.email,
        role: token_data.claims.role,
    };

    req.extensions_mut().insert(auth_user);
    Ok(next.run(req).await)
}

/// Must be layered inside `require_auth`.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let auth_user = req
        .extensions()
        .get::<AuthUser>()
        .ok_or(AppError::Unauthorized)?;

    if !auth_user.is_admin() {
        return Err(AppError::Forbidden);
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64, role: UserRole) -> AuthUser {
        AuthUser {
            id,
            email: format!("user{}@example.com", id),
            role,
        }
    }

    #[test]
    fn test_owner_can_access_own_routes() {
        assert!(user(5, UserRole::User).ensure_can_access(5).is_ok());
    }

    #[test]
    fn test_other_user_is_forbidden() {
        let result = user(5, UserRole::User).ensure_can_access(6);
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[test]
    fn test_admin_can_access_any_user() {
        assert!(user(1, UserRole::Admin).ensure_can_access(99).is_ok());
    }
}
