//! # Checkout Coordinator
//!
//! Turns a cart into a confirmed sale. This is the only place stock
//! invariants are enforced.
//!
//! ## Confirmation State Machine
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                  confirm_sale(cart)                              │
//! │                                                                  │
//! │  cart empty? ──────────────────────────────► Err(EmptyCart)      │
//! │       │                                                          │
//! │       ▼  BEGIN TRANSACTION                                       │
//! │  Validating: re-read live stock for EVERY line                   │
//! │       │          any line short ──► ROLLBACK, Err(Insufficient)  │
//! │       ▼                                                          │
//! │  Applying:   stock = stock - qty, guarded by stock >= qty        │
//! │       │          guard misses ────► ROLLBACK, Err(Insufficient)  │
//! │       ▼                                                          │
//! │  Recording:  INSERT the frozen cart + total into the ledger      │
//! │       │          insert fails ────► ROLLBACK, Err(Persistence)   │
//! │       ▼  COMMIT                                                  │
//! │  Committed:  Ok(Receipt)                                         │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why validate-all-then-apply-all
//! Decrementing line by line and failing midway would leave stock
//! partially decremented with no matching sale record. Nothing is
//! mutated until every line has passed validation, and the whole
//! sequence runs in ONE transaction: a failure in any phase rolls back
//! everything, so stock and ledger can never disagree.
//!
//! The apply pass does not trust the validation snapshot either - each
//! decrement is a single guarded read-modify-write (`WHERE stock >= qty`),
//! so two confirmations racing on the same product cannot both slip
//! through between validation and apply.
//!
//! ## Price semantics
//! The total is computed from the cart's denormalized prices, not
//! re-read ones: the price at scan time is what the customer was
//! quoted, and it is the price frozen into the sale record.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::DbError;
use crate::repository::sale::SaleRepository;
use canteen_core::{Cart, CheckoutPhase, Money};

// =============================================================================
// Outcome Types
// =============================================================================

/// The successful outcome of a confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Ledger id of the recorded sale.
    pub sale_id: i64,

    /// Calendar date the sale was recorded under.
    pub sale_date: NaiveDate,

    /// Total charged, Σ unit price × quantity over the cart.
    pub total: Money,

    /// Number of distinct lines sold.
    pub line_count: usize,
}

/// Why a confirmation did not commit.
///
/// Expected outcomes (`EmptyCart`, `InsufficientStock`) are ordinary
/// results the POS screen handles; `Persistence` is a storage fault,
/// with the phase it struck in, so the partial-failure window of the
/// naive implementation stays visible and testable.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart has no lines; nothing to confirm.
    #[error("cart is empty")]
    EmptyCart,

    /// A cart line asks for more than the live stock covers. Names the
    /// first failing product; nothing was mutated.
    #[error("insufficient stock for {barcode}: available {available}, requested {requested}")]
    InsufficientStock {
        barcode: String,
        requested: i64,
        available: i64,
    },

    /// A storage fault aborted the confirmation. The transaction was
    /// rolled back: stock and ledger are exactly as before the call.
    #[error("persistence failure while {phase:?}: {source}")]
    Persistence {
        phase: CheckoutPhase,
        #[source]
        source: DbError,
    },
}

impl CheckoutError {
    fn persistence(phase: CheckoutPhase, err: sqlx::Error) -> Self {
        CheckoutError::Persistence {
            phase,
            source: DbError::from(err),
        }
    }
}

// =============================================================================
// Coordinator
// =============================================================================

/// The checkout coordinator.
///
/// Stateless apart from the pool; one `confirm_sale` call is one
/// complete confirm-or-abandon cycle for the cart it is given.
#[derive(Debug, Clone)]
pub struct Checkout {
    pool: SqlitePool,
}

impl Checkout {
    /// Creates a new checkout coordinator.
    pub fn new(pool: SqlitePool) -> Self {
        Checkout { pool }
    }

    /// Confirms a sale: validates the cart against live stock, applies
    /// the decrements, and appends the sale record, all in one
    /// transaction.
    ///
    /// On success the caller owns clearing the cart.
    pub async fn confirm_sale(&self, cart: &Cart) -> Result<Receipt, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let total = cart.total();
        debug!(lines = cart.line_count(), total = %total, "Confirming sale");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| CheckoutError::persistence(CheckoutPhase::Validating, e))?;

        // Validation pass: re-read current stock for every line from the
        // catalog (never the cart's denormalized copy). A product deleted
        // since it was scanned counts as zero stock.
        for line in cart.lines() {
            let row = sqlx::query("SELECT stock FROM products WHERE barcode = ?1")
                .bind(&line.barcode)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| CheckoutError::persistence(CheckoutPhase::Validating, e))?;

            let available: i64 = row.map(|r| r.get("stock")).unwrap_or(0);

            if available < line.quantity {
                warn!(
                    barcode = %line.barcode,
                    available,
                    requested = line.quantity,
                    "Sale aborted: insufficient stock"
                );
                let _ = tx.rollback().await;
                return Err(CheckoutError::InsufficientStock {
                    barcode: line.barcode.clone(),
                    requested: line.quantity,
                    available,
                });
            }
        }

        // Apply pass: one guarded read-modify-write per line. The guard
        // re-checks the invariant at write time; a miss means a
        // concurrent confirmation consumed the stock after our
        // validation read.
        for line in cart.lines() {
            let result = sqlx::query(
                "UPDATE products SET stock = stock - ?1 WHERE barcode = ?2 AND stock >= ?1",
            )
            .bind(line.quantity)
            .bind(&line.barcode)
            .execute(&mut *tx)
            .await
            .map_err(|e| CheckoutError::persistence(CheckoutPhase::Applying, e))?;

            if result.rows_affected() == 0 {
                let available = sqlx::query("SELECT stock FROM products WHERE barcode = ?1")
                    .bind(&line.barcode)
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(|e| CheckoutError::persistence(CheckoutPhase::Applying, e))?
                    .map(|r| r.get("stock"))
                    .unwrap_or(0);

                let _ = tx.rollback().await;
                return Err(CheckoutError::InsufficientStock {
                    barcode: line.barcode.clone(),
                    requested: line.quantity,
                    available,
                });
            }
        }

        // Recording: freeze the cart into the ledger under today's date.
        let sale_date = Local::now().date_naive();
        let line_items = cart.line_items();
        let cart_json = serde_json::to_string(&line_items).map_err(|e| {
            CheckoutError::Persistence {
                phase: CheckoutPhase::Recording,
                source: DbError::Internal(e.to_string()),
            }
        })?;

        let result = sqlx::query(
            "INSERT INTO sales (sale_date, cart_contents, total_kurus) VALUES (?1, ?2, ?3)",
        )
        .bind(sale_date)
        .bind(&cart_json)
        .bind(total.kurus())
        .execute(&mut *tx)
        .await
        .map_err(|e| CheckoutError::persistence(CheckoutPhase::Recording, e))?;

        let sale_id = result.last_insert_rowid();

        tx.commit()
            .await
            .map_err(|e| CheckoutError::persistence(CheckoutPhase::Recording, e))?;

        info!(sale_id, total = %total, lines = cart.line_count(), "Sale committed");

        Ok(Receipt {
            sale_id,
            sale_date,
            total,
            line_count: cart.line_count(),
        })
    }

    /// Ledger access for callers that already hold a coordinator.
    pub fn sales(&self) -> SaleRepository {
        SaleRepository::new(self.pool.clone())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use canteen_core::{LineItems, Product};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed(db: &Database, barcode: &str, name: &str, price: i64, stock: i64) -> Product {
        let product = Product::new(barcode, name, Money::from_kurus(price), stock).unwrap();
        db.products().insert(&product).await.unwrap();
        product
    }

    #[tokio::test]
    async fn test_confirm_decrements_stock_and_records_sale() {
        let db = test_db().await;
        let ayran = seed(&db, "869001", "Ayran", 750, 10).await;
        let tost = seed(&db, "869002", "Tost", 2500, 5).await;

        let mut cart = Cart::new();
        cart.add_line(&ayran, 2).unwrap();
        cart.add_line(&tost, 1).unwrap();

        let receipt = db.checkout().confirm_sale(&cart).await.unwrap();

        assert_eq!(receipt.total.kurus(), 2 * 750 + 2500);
        assert_eq!(receipt.line_count, 2);

        // Each stock decreased by exactly the line quantity.
        assert_eq!(db.products().get("869001").await.unwrap().unwrap().stock, 8);
        assert_eq!(db.products().get("869002").await.unwrap().unwrap().stock, 4);

        // The ledger entry matches the receipt.
        let sales = db.sales().list_all().await.unwrap();
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].id, receipt.sale_id);
        assert_eq!(sales[0].sale_date, receipt.sale_date);
        assert_eq!(sales[0].total, receipt.total);
    }

    #[tokio::test]
    async fn test_recorded_line_items_reproduce_cart() {
        let db = test_db().await;
        let ayran = seed(&db, "869001", "Ayran", 750, 10).await;

        let mut cart = Cart::new();
        cart.add_line(&ayran, 3).unwrap();

        let receipt = db.checkout().confirm_sale(&cart).await.unwrap();

        let raw = db
            .sales()
            .get_line_items(receipt.sale_id)
            .await
            .unwrap()
            .unwrap();
        let decoded: LineItems = serde_json::from_str(&raw).unwrap();

        assert_eq!(decoded, cart.line_items());
        assert_eq!(decoded["869001"].name, "Ayran");
        assert_eq!(decoded["869001"].unit_price.kurus(), 750);
        assert_eq!(decoded["869001"].quantity, 3);
    }

    #[tokio::test]
    async fn test_empty_cart_rejected_without_side_effects() {
        let db = test_db().await;
        seed(&db, "869001", "Ayran", 750, 10).await;

        let err = db.checkout().confirm_sale(&Cart::new()).await.unwrap_err();

        assert!(matches!(err, CheckoutError::EmptyCart));
        assert_eq!(db.products().get("869001").await.unwrap().unwrap().stock, 10);
        assert!(db.sales().list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_one_short_line_aborts_whole_cart() {
        let db = test_db().await;
        let ayran = seed(&db, "869001", "Ayran", 750, 10).await;
        let tost = seed(&db, "869002", "Tost", 2500, 1).await;

        let mut cart = Cart::new();
        cart.add_line(&ayran, 2).unwrap();
        cart.add_line(&tost, 3).unwrap(); // only 1 in stock

        let err = db.checkout().confirm_sale(&cart).await.unwrap_err();

        match err {
            CheckoutError::InsufficientStock {
                barcode,
                requested,
                available,
            } => {
                assert_eq!(barcode, "869002");
                assert_eq!(requested, 3);
                assert_eq!(available, 1);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }

        // Full-cart atomicity: NO stock changed, nothing recorded.
        assert_eq!(db.products().get("869001").await.unwrap().unwrap().stock, 10);
        assert_eq!(db.products().get("869002").await.unwrap().unwrap().stock, 1);
        assert!(db.sales().list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deleted_product_counts_as_out_of_stock() {
        let db = test_db().await;
        let ayran = seed(&db, "869001", "Ayran", 750, 10).await;

        let mut cart = Cart::new();
        cart.add_line(&ayran, 1).unwrap();

        // Product disappears between scan and confirm.
        db.products().delete("869001").await.unwrap();

        let err = db.checkout().confirm_sale(&cart).await.unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::InsufficientStock { available: 0, .. }
        ));
    }

    #[tokio::test]
    async fn test_price_change_after_scan_honours_scanned_price() {
        let db = test_db().await;
        let ayran = seed(&db, "869001", "Ayran", 750, 10).await;

        let mut cart = Cart::new();
        cart.add_line(&ayran, 2).unwrap();

        // Catalog price changes while the customer queues.
        db.products()
            .update(
                "869001",
                &canteen_core::ProductPatch::default().with_price(Money::from_kurus(999)),
            )
            .await
            .unwrap();

        let receipt = db.checkout().confirm_sale(&cart).await.unwrap();

        // Receipt semantics: the scanned price, not the new one.
        assert_eq!(receipt.total.kurus(), 1500);
    }

    #[tokio::test]
    async fn test_concurrent_confirmations_never_oversell() {
        let db = test_db().await;
        let simit = seed(&db, "869003", "Simit", 500, 5).await;

        let confirm = |db: Database| {
            let simit = simit.clone();
            async move {
                let mut cart = Cart::new();
                cart.add_line(&simit, 2).unwrap();
                db.checkout().confirm_sale(&cart).await
            }
        };

        let (a, b, c, d) = tokio::join!(
            confirm(db.clone()),
            confirm(db.clone()),
            confirm(db.clone()),
            confirm(db.clone())
        );

        let successes = [&a, &b, &c, &d].iter().filter(|r| r.is_ok()).count();

        // 5 in stock, 2 per cart: exactly two can commit.
        assert_eq!(successes, 2);

        let remaining = db.products().get("869003").await.unwrap().unwrap().stock;
        assert_eq!(remaining, 1);
        assert!(remaining >= 0, "stock must never go negative");

        assert_eq!(db.sales().list_all().await.unwrap().len(), 2);
    }
}
