use std::time::Instant;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use tracing::info;

use crate::{
    db,
    error::{AppError, AppResult},
    models::{Product, ProductInput},
    AppState,
};

/// Ids beyond the `products.id` column range can never have been stored.
fn stored_id(id: i64) -> AppResult<i32> {
    i32::try_from(id).map_err(|_| AppError::NotFound("Product Not Found".to_string()))
}

// ── List ──────────────────────────────────────────────────────────────────────

pub async fn list_products(State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    let start = Instant::now();
    let products = db::fetch_all_products(&state.db).await?;

    info!(
        count = products.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "Listed products"
    );

    Ok(Json(products))
}

// ── Get by ID ─────────────────────────────────────────────────────────────────

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Product>> {
    let id = stored_id(id)?;
    let product = db::fetch_product_by_id(&state.db, id).await?;
    Ok(Json(product))
}

// ── Create ────────────────────────────────────────────────────────────────────

pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<ProductInput>,
) -> AppResult<(StatusCode, Json<Product>)> {
    let start = Instant::now();
    let product = db::insert_product(&state.db, &payload).await?;

    info!(
        id = product.id,
        name = %product.name,
        client_id = payload.requested_id().is_some(),
        elapsed_ms = start.elapsed().as_millis(),
        "Created product"
    );

    Ok((StatusCode::CREATED, Json(product)))
}

// ── Update ────────────────────────────────────────────────────────────────────

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ProductInput>,
) -> AppResult<Json<Product>> {
    let id = stored_id(id)?;
    let product = db::update_product(&state.db, id, &payload).await?;

    if product.id != id {
        info!(old_id = id, new_id = product.id, "Updated product and moved id");
    } else {
        info!(id, "Updated product");
    }

    Ok(Json(product))
}

// ── Delete ────────────────────────────────────────────────────────────────────

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<serde_json::Value>> {
    let id = stored_id(id)?;
    db::delete_product(&state.db, id).await?;

    info!(id, "Deleted product");

    Ok(Json(json!({ "message": "Product Deleted Successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_id_accepts_the_column_range() {
        assert_eq!(stored_id(7).unwrap(), 7);
        assert_eq!(stored_id(i64::from(i32::MAX)).unwrap(), i32::MAX);
        assert_eq!(stored_id(i64::from(i32::MIN)).unwrap(), i32::MIN);
    }

    #[test]
    fn stored_id_outside_the_column_range_is_not_found() {
        for id in [3_000_000_000, i64::from(i32::MAX) + 1, i64::from(i32::MIN) - 1, i64::MAX] {
            assert!(matches!(stored_id(id), Err(AppError::NotFound(_))), "id {id}");
        }
    }
}
