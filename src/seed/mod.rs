use sqlx::PgPool;
use tracing::info;

use crate::error::AppResult;
use crate::models::Product;

struct SampleProduct {
    name: &'static str,
    description: &'static str,
    price: f64,
    quantity: i32,
}

/// Rows restored by [`reset_products`], in id order.
static SAMPLE_PRODUCTS: &[SampleProduct] = &[
    SampleProduct { name: "Phone", description: "A smartphone", price: 699.99, quantity: 50 },
    SampleProduct { name: "Laptop", description: "A powerful laptop", price: 999.99, quantity: 30 },
    SampleProduct { name: "Pen", description: "A blue ink pen", price: 1.99, quantity: 100 },
    SampleProduct { name: "Table", description: "A wooden table", price: 199.99, quantity: 20 },
];

/// Wipe the products table and restore the sample rows with ids 1..=4.
///
/// Destructive: every existing product is lost.
pub async fn reset_products(pool: &PgPool) -> AppResult<Vec<Product>> {
    let mut tx = pool.begin().await?;

    sqlx::query("TRUNCATE products RESTART IDENTITY")
        .execute(&mut *tx)
        .await?;

    // One insert per row so the sequence hands out ids in list order.
    let mut products = Vec::with_capacity(SAMPLE_PRODUCTS.len());
    for sample in SAMPLE_PRODUCTS {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, description, price, quantity)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, price, quantity
            "#,
        )
        .bind(sample.name)
        .bind(sample.description)
        .bind(sample.price)
        .bind(sample.quantity)
        .fetch_one(&mut *tx)
        .await?;
        products.push(product);
    }

    tx.commit().await?;

    info!(count = products.len(), "Database reset with sample data (IDs 1-{})", products.len());
    Ok(products)
}
