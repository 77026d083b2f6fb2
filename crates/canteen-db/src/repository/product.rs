//! # Product Repository
//!
//! Database operations for the product catalog.
//!
//! ## Scope
//! Single-row CRUD only. Stock invariants across a whole cart are the
//! checkout coordinator's job; this store deliberately permits direct
//! stock writes (restocking, corrections), with the schema's
//! `CHECK (stock >= 0)` as the last line of defense.

use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use canteen_core::{Money, Product, ProductPatch};

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// repo.insert(&product).await?;
/// let found = repo.get("8690000000001").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

fn product_from_row(row: &SqliteRow) -> Product {
    Product {
        barcode: row.get("barcode"),
        name: row.get("product_name"),
        price: Money::from_kurus(row.get("price_kurus")),
        stock: row.get("stock"),
    }
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Ok(())` - Inserted
    /// * `Err(DbError::UniqueViolation)` - Barcode already exists
    ///   (nothing mutated)
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(barcode = %product.barcode, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (barcode, product_name, price_kurus, stock)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&product.barcode)
        .bind(&product.name)
        .bind(product.price.kurus())
        .bind(product.stock)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a product by its barcode.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - No such barcode
    pub async fn get(&self, barcode: &str) -> DbResult<Option<Product>> {
        let row = sqlx::query(
            r#"
            SELECT barcode, product_name, price_kurus, stock
            FROM products
            WHERE barcode = ?1
            "#,
        )
        .bind(barcode)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(product_from_row))
    }

    /// Lists all products in natural storage order.
    pub async fn list_all(&self) -> DbResult<Vec<Product>> {
        let rows = sqlx::query(
            r#"
            SELECT barcode, product_name, price_kurus, stock
            FROM products
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(product_from_row).collect())
    }

    /// Applies a partial update: only the supplied fields change.
    ///
    /// ## Returns
    /// * `Ok(())` - Updated
    /// * `Err(DbError::NoFieldsToUpdate)` - Empty patch, nothing written
    /// * `Err(DbError::NotFound)` - No such barcode
    pub async fn update(&self, barcode: &str, patch: &ProductPatch) -> DbResult<()> {
        if patch.is_empty() {
            return Err(DbError::NoFieldsToUpdate);
        }

        debug!(barcode = %barcode, ?patch, "Updating product");

        // SET clause assembled from whichever fields the patch carries.
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE products SET ");
        let mut fields = qb.separated(", ");

        if let Some(name) = &patch.name {
            fields.push("product_name = ").push_bind_unseparated(name.as_str());
        }
        if let Some(price) = patch.price {
            fields.push("price_kurus = ").push_bind_unseparated(price.kurus());
        }
        if let Some(stock) = patch.stock {
            fields.push("stock = ").push_bind_unseparated(stock);
        }

        qb.push(" WHERE barcode = ").push_bind(barcode);

        let result = qb.build().execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", barcode));
        }

        Ok(())
    }

    /// Deletes a product by barcode.
    ///
    /// Historical sales are unaffected: they carry their own frozen
    /// name/price snapshots and never join back to the catalog.
    pub async fn delete(&self, barcode: &str) -> DbResult<()> {
        debug!(barcode = %barcode, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE barcode = ?1")
            .bind(barcode)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", barcode));
        }

        Ok(())
    }

    /// Counts products (for diagnostics and the seed tool).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn ayran() -> Product {
        Product::new("8690000000001", "Ayran", Money::from_kurus(750), 20).unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&ayran()).await.unwrap();

        let found = repo.get("8690000000001").await.unwrap().unwrap();
        assert_eq!(found, ayran());

        assert!(repo.get("no-such-barcode").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_barcode_rejected() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&ayran()).await.unwrap();
        let err = repo.insert(&ayran()).await.unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));

        // The original row is untouched.
        let found = repo.get("8690000000001").await.unwrap().unwrap();
        assert_eq!(found.stock, 20);
    }

    #[tokio::test]
    async fn test_partial_update_touches_only_supplied_fields() {
        let db = test_db().await;
        let repo = db.products();
        repo.insert(&ayran()).await.unwrap();

        repo.update(
            "8690000000001",
            &ProductPatch::default().with_price(Money::from_kurus(850)),
        )
        .await
        .unwrap();

        let found = repo.get("8690000000001").await.unwrap().unwrap();
        assert_eq!(found.price.kurus(), 850);
        // Unmentioned fields unchanged.
        assert_eq!(found.name, "Ayran");
        assert_eq!(found.stock, 20);
    }

    #[tokio::test]
    async fn test_empty_patch_reported_distinctly() {
        let db = test_db().await;
        let repo = db.products();
        repo.insert(&ayran()).await.unwrap();

        let err = repo
            .update("8690000000001", &ProductPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NoFieldsToUpdate));
    }

    #[tokio::test]
    async fn test_update_missing_product() {
        let db = test_db().await;

        let err = db
            .products()
            .update("missing", &ProductPatch::default().with_stock(5))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete() {
        let db = test_db().await;
        let repo = db.products();
        repo.insert(&ayran()).await.unwrap();

        repo.delete("8690000000001").await.unwrap();
        assert!(repo.list_all().await.unwrap().is_empty());

        let err = repo.delete("8690000000001").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_all_and_count() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&ayran()).await.unwrap();
        repo.insert(&Product::new("8690000000002", "Su", Money::from_kurus(500), 50).unwrap())
            .await
            .unwrap();

        assert_eq!(repo.list_all().await.unwrap().len(), 2);
        assert_eq!(repo.count().await.unwrap(), 2);
    }
}
