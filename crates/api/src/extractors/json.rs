//! JSON body and query extractors that reject with the API error envelope.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, rejection::QueryRejection, FromRequest, FromRequestParts, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// `axum::Json` with a 400 envelope for malformed or missing bodies.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> ApiError {
    let message = match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            "Request body must be JSON (Content-Type: application/json)".to_string()
        }
        JsonRejection::JsonSyntaxError(_) => "Malformed JSON body".to_string(),
        other => format!("Invalid JSON body: {}", other.body_text()),
    };
    ApiError::Validation(message)
}

/// `axum::extract::Query` with a 400 envelope for undecodable query strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        axum::extract::Query::<T>::from_request_parts(parts, state)
            .await
            .map(|axum::extract::Query(value)| ApiQuery(value))
            .map_err(|rejection: QueryRejection| {
                ApiError::Validation(format!("Invalid query string: {}", rejection.body_text()))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::header};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Payload {
        name: String,
    }

    fn request(content_type: Option<&str>, body: &str) -> Request {
        let mut builder = axum::http::Request::builder().method("POST").uri("/");
        if let Some(ct) = content_type {
            builder = builder.header(header::CONTENT_TYPE, ct);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn test_valid_json() {
        let req = request(Some("application/json"), r#"{"name":"Gala"}"#);
        let ApiJson(payload) = ApiJson::<Payload>::from_request(req, &()).await.unwrap();
        assert_eq!(payload.name, "Gala");
    }

    #[tokio::test]
    async fn test_malformed_json_is_validation_error() {
        let req = request(Some("application/json"), r#"{"name":"#);
        let err = ApiJson::<Payload>::from_request(req, &()).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(ref m) if m == "Malformed JSON body"));
    }

    #[tokio::test]
    async fn test_missing_content_type_is_validation_error() {
        let req = request(None, r#"{"name":"Gala"}"#);
        let err = ApiJson::<Payload>::from_request(req, &()).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_wrong_shape_is_validation_error() {
        let req = request(Some("application/json"), r#"{"name": 5}"#);
        let err = ApiJson::<Payload>::from_request(req, &()).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(ref m) if m.starts_with("Invalid JSON body")));
    }
}
