use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{header, request::Parts, HeaderMap},
};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::AppError;

const JSON: &str = "application/json";

/// Request body gated on `Content-Type: application/json`, not yet parsed.
///
/// The header is checked before the body is read, so a missing or foreign
/// media type is always a 415 no matter what the body holds. Handlers that
/// must look something up first (PUT checks existence) call [`JsonBytes::parse`]
/// afterwards.
pub struct JsonBytes(Bytes);

impl JsonBytes {
    /// Body errors (syntax, missing fields, unknown enum members) surface as
    /// a 400 carrying serde's description.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, AppError> {
        serde_json::from_slice(&self.0)
            .map_err(|e| AppError::BadRequest(format!("Invalid product: {}", e)))
    }
}

#[async_trait]
impl<S> FromRequest<S> for JsonBytes
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        check_content_type(req.headers())?;

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        Ok(JsonBytes(bytes))
    }
}

/// [`JsonBytes`] parsed straight into `T`.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = JsonBytes::from_request(req, state).await?;
        body.parse().map(JsonBody)
    }
}

fn check_content_type(headers: &HeaderMap) -> Result<(), AppError> {
    let Some(value) = headers.get(header::CONTENT_TYPE) else {
        warn!("No Content-Type specified");
        return Err(unsupported());
    };

    let media_type = value
        .to_str()
        .ok()
        .and_then(|v| v.split(';').next())
        .map(str::trim)
        .unwrap_or_default();

    if media_type.eq_ignore_ascii_case(JSON) {
        Ok(())
    } else {
        warn!(content_type = ?value, "Invalid Content-Type");
        Err(unsupported())
    }
}

fn unsupported() -> AppError {
    AppError::UnsupportedMediaType(format!("Content-Type must be {}", JSON))
}

/// `:id` path segment. Anything that is not an integer cannot name a product,
/// so it is reported as not found rather than as a malformed request.
#[derive(Debug, Clone, Copy)]
pub struct ProductId(pub i32);

#[async_trait]
impl<S> FromRequestParts<S> for ProductId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        raw.parse::<i32>()
            .map(ProductId)
            .map_err(|_| AppError::product_not_found(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(content_type: Option<&'static str>) -> HeaderMap {
        let mut map = HeaderMap::new();
        if let Some(ct) = content_type {
            map.insert(header::CONTENT_TYPE, HeaderValue::from_static(ct));
        }
        map
    }

    #[test]
    fn json_media_type_is_accepted() {
        assert!(check_content_type(&headers(Some("application/json"))).is_ok());
        assert!(check_content_type(&headers(Some("application/json; charset=utf-8"))).is_ok());
        assert!(check_content_type(&headers(Some("Application/JSON"))).is_ok());
    }

    #[test]
    fn missing_or_foreign_media_type_is_rejected() {
        for ct in [None, Some("plain/text"), Some("text/plain"), Some("application/xml")] {
            assert!(
                matches!(
                    check_content_type(&headers(ct)),
                    Err(AppError::UnsupportedMediaType(_))
                ),
                "{ct:?}"
            );
        }
    }
}
