//! JSON extractor with the API's error shape.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use common::AppError;

/// JSON body whose field rules live in the service layer.
///
/// A malformed body is reported as `AppError::Validation` instead of axum's
/// plain-text rejection.
pub struct AppJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for AppJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
            tracing::debug!(error = %e, "Rejected request body");
            AppError::validation(e.body_text())
        })?;
        Ok(AppJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::header::CONTENT_TYPE};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Named {
        #[serde(default)]
        name: String,
    }

    fn request(content_type: &str, body: &str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, content_type)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_missing_fields_fall_back_to_defaults() {
        let AppJson(named) = AppJson::<Named>::from_request(request("application/json", "{}"), &())
            .await
            .unwrap();
        assert_eq!(named.name, "");
    }

    #[tokio::test]
    async fn test_wrong_content_type_is_validation_error() {
        let err = AppJson::<Named>::from_request(request("text/plain", r#"{"name":"a"}"#), &())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
