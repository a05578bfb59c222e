//! Success envelope shared by every JSON endpoint:
//! `{ "success": true, "message"?: string, "data": ... }`.
//! Errors use the matching `success: false` shape from [`crate::error::AppError`].

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;
use validator::Validate;

use crate::error::AppError;

#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub message: Option<String>,
    pub status: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data,
            message: None,
            status: StatusCode::OK,
        }
    }

    pub fn created(data: T) -> Self {
        Self {
            data,
            message: None,
            status: StatusCode::CREATED,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let data = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize response data");
                return AppError::Internal(e.into()).into_response();
            }
        };

        let mut envelope = json!({
            "success": true,
            "data": data,
        });
        if let Some(message) = self.message {
            envelope["message"] = json!(message);
        }

        (self.status, Json(envelope)).into_response()
    }
}

/// JSON body extractor that runs `validator` rules and reports failures
/// through the standard error envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// `Path` whose rejection uses the error envelope.
#[derive(Debug, FromRequestParts)]
#[from_request(via(Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// `Query` whose rejection uses the error envelope.
#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn test_envelope_includes_message_when_set() {
        let resp = ApiResponse::created(json!({ "id": 7 }))
            .with_message("Entrada creada")
            .into_response();
        assert_eq!(resp.status(), StatusCode::CREATED);

        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["id"], 7);
        assert_eq!(body["message"], "Entrada creada");
    }

    #[tokio::test]
    async fn test_envelope_omits_message_by_default() {
        let resp = ApiResponse::ok(vec![1, 2, 3]).into_response();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body.get("message").is_none());
        assert_eq!(body["data"], json!([1, 2, 3]));
    }

    #[derive(Debug, serde::Deserialize)]
    struct Page {
        page: u32,
    }

    async fn call(uri: &str) -> (StatusCode, Option<String>, serde_json::Value) {
        use axum::{body::Body, http::header::CONTENT_TYPE, routing::get, Router};
        use tower::ServiceExt;

        let app = Router::new().route(
            "/items/:id",
            get(|ApiPath(id): ApiPath<i64>, ApiQuery(p): ApiQuery<Page>| async move {
                format!("{}:{}", id, p.page)
            }),
        );
        let res = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = res.status();
        let content_type = res
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, content_type, body)
    }

    #[tokio::test]
    async fn test_path_and_query_pass_through() {
        let (status, _, _) = call("/items/4?page=2").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_bad_query_uses_error_envelope() {
        for uri in ["/items/4?page=abc", "/items/4"] {
            let (status, content_type, body) = call(uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            assert_eq!(content_type.as_deref(), Some("application/json"));
            assert_eq!(body["success"], false);
            assert!(body["message"].as_str().is_some());
        }
    }

    #[tokio::test]
    async fn test_bad_path_uses_error_envelope() {
        let (status, content_type, body) = call("/items/abc?page=1").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(content_type.as_deref(), Some("application/json"));
        assert_eq!(body["success"], false);
    }
}
