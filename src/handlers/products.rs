use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use tracing::info;

use crate::{
    error::{AppError, AppResult},
    extract::{JsonBody, JsonBytes, ProductId},
    models::{ListParams, Product, ProductPayload},
    AppState,
};

/// Canonical read URL for a product, absolute when the request named a host.
/// The scheme follows `X-Forwarded-Proto` from a fronting proxy, else `http`.
fn location_for(headers: &HeaderMap, id: i32) -> String {
    let Some(host) = headers.get(header::HOST).and_then(|h| h.to_str().ok()) else {
        return format!("/products/{}", id);
    };

    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("http");

    format!("{}://{}/products/{}", scheme, host, id)
}

// ── List ──────────────────────────────────────────────────────────────────────

pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<Product>>> {
    let filters = params.into_filters()?;
    let products = state.products.list(&filters).await?;

    info!(
        count = products.len(),
        name = ?filters.name,
        category = ?filters.category,
        available = ?filters.available,
        "Listed products"
    );

    Ok(Json(products))
}

// ── Create ────────────────────────────────────────────────────────────────────

pub async fn create_product(
    State(state): State<AppState>,
    headers: HeaderMap,
    JsonBody(payload): JsonBody<ProductPayload>,
) -> AppResult<impl IntoResponse> {
    payload.validate()?;

    let product = state.products.create(&payload).await?;
    info!(id = product.id, name = %product.name, "Created product");

    let location = location_for(&headers, product.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(product)))
}

// ── Get by ID ─────────────────────────────────────────────────────────────────

pub async fn get_product(
    State(state): State<AppState>,
    ProductId(id): ProductId,
    headers: HeaderMap,
) -> AppResult<impl IntoResponse> {
    let product = state
        .products
        .find(id)
        .await?
        .ok_or_else(|| AppError::product_not_found(id))?;

    info!(id = id, "Fetched product");

    let location = location_for(&headers, product.id);
    Ok(([(header::LOCATION, location)], Json(product)))
}

// ── Update ────────────────────────────────────────────────────────────────────

pub async fn update_product(
    State(state): State<AppState>,
    ProductId(id): ProductId,
    body: JsonBytes,
) -> AppResult<Json<Product>> {
    if state.products.find(id).await?.is_none() {
        return Err(AppError::product_not_found(id));
    }

    let payload: ProductPayload = body.parse()?;
    payload.validate()?;

    // The row may have been deleted since the lookup above.
    let product = state
        .products
        .update(id, &payload)
        .await?
        .ok_or_else(|| AppError::product_not_found(id))?;

    info!(id = id, "Updated product");

    Ok(Json(product))
}

// ── Delete ────────────────────────────────────────────────────────────────────

pub async fn delete_product(
    State(state): State<AppState>,
    ProductId(id): ProductId,
) -> AppResult<StatusCode> {
    if !state.products.delete(id).await? {
        return Err(AppError::product_not_found(id));
    }

    info!(id = id, "Deleted product");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn location_is_relative_without_host() {
        assert_eq!(location_for(&HeaderMap::new(), 3), "/products/3");
    }

    #[test]
    fn location_scheme_follows_forwarded_proto() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("catalog.test"));
        assert_eq!(location_for(&headers, 3), "http://catalog.test/products/3");

        headers.insert("x-forwarded-proto", HeaderValue::from_static("https, http"));
        assert_eq!(location_for(&headers, 3), "https://catalog.test/products/3");
    }
}
