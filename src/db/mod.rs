use sqlx::{PgConnection, PgPool};

use crate::error::{is_unique_violation, AppError, AppResult};
use crate::models::*;

const PRODUCT_COLUMNS: &str = "id, name, description, price, quantity";

fn not_found() -> AppError {
    AppError::NotFound("Product Not Found".to_string())
}

/// Turns a primary-key collision into a 409, anything else into a 500.
fn conflict_or_db(err: sqlx::Error, message: &str) -> AppError {
    if is_unique_violation(&err) {
        AppError::Conflict(message.to_string())
    } else {
        AppError::Database(err)
    }
}

// ── Reads ─────────────────────────────────────────────────────────────────────

pub async fn fetch_all_products(pool: &PgPool) -> AppResult<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id ASC"
    ))
    .fetch_all(pool)
    .await?;

    Ok(products)
}

pub async fn fetch_product_by_id(pool: &PgPool, id: i32) -> AppResult<Product> {
    sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(not_found)
}

// ── Writes ────────────────────────────────────────────────────────────────────

/// Insert a product, honouring a client-chosen id when one is given.
///
/// Id collisions are caught by the primary key itself rather than by a
/// pre-check, so two concurrent creates for the same id cannot both win.
pub async fn insert_product(pool: &PgPool, payload: &ProductInput) -> AppResult<Product> {
    let mut tx = pool.begin().await?;

    let product = match payload.requested_id() {
        Some(id) => {
            let product = sqlx::query_as::<_, Product>(&format!(
                "INSERT INTO products (id, name, description, price, quantity)
                 VALUES ($1, $2, $3, $4, $5)
                 RETURNING {PRODUCT_COLUMNS}"
            ))
            .bind(id)
            .bind(&payload.name)
            .bind(&payload.description)
            .bind(payload.price)
            .bind(payload.quantity)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| conflict_or_db(e, "ID already exists"))?;

            sync_id_sequence(&mut tx).await?;
            product
        }
        None => sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO products (name, description, price, quantity)
             VALUES ($1, $2, $3, $4)
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(payload.price)
        .bind(payload.quantity)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| conflict_or_db(e, "ID already exists"))?,
    };

    tx.commit().await?;
    Ok(product)
}

/// Overwrite every field of product `id`; also moves it to a new id when the
/// payload names a different, non-zero one.
pub async fn update_product(pool: &PgPool, id: i32, payload: &ProductInput) -> AppResult<Product> {
    let new_id = payload.requested_id().filter(|&new_id| new_id != id);

    let mut tx = pool.begin().await?;

    let product = sqlx::query_as::<_, Product>(&format!(
        "UPDATE products
         SET id          = COALESCE($1, id),
             name        = $2,
             description = $3,
             price       = $4,
             quantity    = $5
         WHERE id = $6
         RETURNING {PRODUCT_COLUMNS}"
    ))
    .bind(new_id)
    .bind(&payload.name)
    .bind(&payload.description)
    .bind(payload.price)
    .bind(payload.quantity)
    .bind(id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(|e| conflict_or_db(e, "New ID already exists"))?
    .ok_or_else(not_found)?;

    if new_id.is_some() {
        sync_id_sequence(&mut tx).await?;
    }

    tx.commit().await?;
    Ok(product)
}

pub async fn delete_product(pool: &PgPool, id: i32) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(not_found());
    }
    Ok(())
}

/// Move the `products.id` sequence past the current maximum so the next
/// store-assigned id cannot hit a client-chosen one.
///
/// `setval` is not transactional and other transactions may already hold
/// values from `nextval`, so the sequence only ever moves forward.
async fn sync_id_sequence(conn: &mut PgConnection) -> AppResult<()> {
    sqlx::query(
        "SELECT setval(
             pg_get_serial_sequence('products', 'id'),
             GREATEST(
                 (SELECT MAX(id) FROM products),
                 pg_sequence_last_value(pg_get_serial_sequence('products', 'id')::regclass),
                 1
             )
         )",
    )
    .execute(conn)
    .await?;
    Ok(())
}
