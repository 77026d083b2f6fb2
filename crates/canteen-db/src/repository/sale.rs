//! # Sale Repository
//!
//! The append-only sale ledger.
//!
//! ## Ledger Shape
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                        sales table                               │
//! │                                                                  │
//! │  id │ sale_date  │ cart_contents                    │ total_kurus│
//! │  ───┼────────────┼──────────────────────────────────┼─────────── │
//! │   1 │ 2026-08-30 │ {"8690…1":{"isim":"Ayran",       │       1500 │
//! │     │            │  "fiyat":750,"adet":2}}          │            │
//! │                                                                  │
//! │  • append-only: no UPDATE or DELETE exists on this table         │
//! │  • cart_contents: frozen cart, keyed by barcode                  │
//! │  • reports read the embedded JSON via json_each, never the       │
//! │    live catalog (historical prices are preserved)                │
//! └──────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::error::{classify_report_error, DbError, DbResult};
use canteen_core::{LineItems, Money, ReportRow, SaleSummary};

/// Repository for the sale ledger.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Appends a sale and returns its ledger id.
    ///
    /// Ids are assigned by AUTOINCREMENT: monotonic by creation order,
    /// never reused.
    pub async fn append(
        &self,
        sale_date: NaiveDate,
        line_items: &LineItems,
        total: Money,
    ) -> DbResult<i64> {
        let cart_json =
            serde_json::to_string(line_items).map_err(|e| DbError::Internal(e.to_string()))?;

        debug!(%sale_date, total = %total, lines = line_items.len(), "Appending sale");

        let result = sqlx::query(
            r#"
            INSERT INTO sales (sale_date, cart_contents, total_kurus)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(sale_date)
        .bind(&cart_json)
        .bind(total.kurus())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Lists all sales, most recent first (id descending).
    pub async fn list_all(&self) -> DbResult<Vec<SaleSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT id, sale_date, total_kurus
            FROM sales
            ORDER BY id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| SaleSummary {
                id: row.get("id"),
                sale_date: row.get("sale_date"),
                total: Money::from_kurus(row.get("total_kurus")),
            })
            .collect())
    }

    /// Returns the raw line-items document of a sale.
    ///
    /// ## Returns
    /// * `Ok(Some(String))` - The JSON document as stored
    /// * `Ok(None)` - No such sale id
    pub async fn get_line_items(&self, sale_id: i64) -> DbResult<Option<String>> {
        let row = sqlx::query("SELECT cart_contents FROM sales WHERE id = ?1")
            .bind(sale_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.get("cart_contents")))
    }

    /// Per-product totals over an inclusive date range, ordered by
    /// revenue descending (product name breaks ties, so the order is
    /// deterministic).
    ///
    /// ## How It Works
    /// `json_each` flattens every sale's embedded line items into rows;
    /// grouping by the frozen product name then sums quantity and
    /// quantity × unit price. Products with no matching sales are
    /// simply absent.
    ///
    /// ## Errors
    /// `DbError::StaleReportEngine` when the SQLite build lacks JSON1 -
    /// surfaced, never masked as an empty report.
    pub async fn aggregate_by_product(
        &self,
        date_start: NaiveDate,
        date_end: NaiveDate,
    ) -> DbResult<Vec<ReportRow>> {
        debug!(%date_start, %date_end, "Running per-product report");

        let rows = sqlx::query(
            r#"
            SELECT
                line.value ->> '$.isim' AS product_name,
                SUM(CAST(line.value ->> '$.adet' AS INTEGER)) AS total_quantity,
                SUM(CAST(line.value ->> '$.adet' AS INTEGER)
                    * CAST(line.value ->> '$.fiyat' AS INTEGER)) AS total_revenue
            FROM
                sales,
                json_each(cart_contents) AS line
            WHERE
                sale_date BETWEEN ?1 AND ?2
            GROUP BY
                product_name
            ORDER BY
                total_revenue DESC,
                product_name ASC
            "#,
        )
        .bind(date_start)
        .bind(date_end)
        .fetch_all(&self.pool)
        .await
        .map_err(classify_report_error)?;

        Ok(rows
            .iter()
            .map(|row| ReportRow {
                product_name: row.get("product_name"),
                total_quantity: row.get("total_quantity"),
                total_revenue: Money::from_kurus(row.get("total_revenue")),
            })
            .collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use canteen_core::LineItem;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn items(entries: &[(&str, &str, i64, i64)]) -> LineItems {
        entries
            .iter()
            .map(|(barcode, name, price, qty)| {
                (
                    barcode.to_string(),
                    LineItem {
                        name: name.to_string(),
                        unit_price: Money::from_kurus(*price),
                        quantity: *qty,
                    },
                )
            })
            .collect()
    }

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn test_append_assigns_monotonic_ids() {
        let db = test_db().await;
        let repo = db.sales();
        let doc = items(&[("869001", "Su", 500, 1)]);

        let first = repo
            .append(day("2026-08-30"), &doc, Money::from_kurus(500))
            .await
            .unwrap();
        let second = repo
            .append(day("2026-08-30"), &doc, Money::from_kurus(500))
            .await
            .unwrap();

        assert!(second > first);
    }

    #[tokio::test]
    async fn test_list_all_most_recent_first() {
        let db = test_db().await;
        let repo = db.sales();
        let doc = items(&[("869001", "Su", 500, 1)]);

        repo.append(day("2026-08-29"), &doc, Money::from_kurus(500))
            .await
            .unwrap();
        repo.append(day("2026-08-30"), &doc, Money::from_kurus(500))
            .await
            .unwrap();

        let all = repo.list_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[0].id > all[1].id);
        assert_eq!(all[0].sale_date, day("2026-08-30"));
        assert_eq!(all[0].total.kurus(), 500);
    }

    #[tokio::test]
    async fn test_line_items_round_trip() {
        let db = test_db().await;
        let repo = db.sales();

        let doc = items(&[
            ("8690000000001", "Ayran", 750, 2),
            ("8690000000002", "Peynirli Tost", 2500, 1),
        ]);

        let id = repo
            .append(day("2026-08-30"), &doc, Money::from_kurus(4000))
            .await
            .unwrap();

        let raw = repo.get_line_items(id).await.unwrap().unwrap();
        let decoded: LineItems = serde_json::from_str(&raw).unwrap();

        assert_eq!(decoded, doc);
    }

    #[tokio::test]
    async fn test_get_line_items_missing_sale() {
        let db = test_db().await;
        assert!(db.sales().get_line_items(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_report_groups_across_sales() {
        let db = test_db().await;
        let repo = db.sales();

        // Product A sold twice within the range: qty 2 and qty 1 at 10.00.
        repo.append(
            day("2026-08-10"),
            &items(&[("869001", "A", 1000, 2)]),
            Money::from_kurus(2000),
        )
        .await
        .unwrap();
        repo.append(
            day("2026-08-15"),
            &items(&[("869001", "A", 1000, 1)]),
            Money::from_kurus(1000),
        )
        .await
        .unwrap();

        let report = repo
            .aggregate_by_product(day("2026-08-01"), day("2026-08-31"))
            .await
            .unwrap();

        assert_eq!(report.len(), 1);
        assert_eq!(report[0].product_name, "A");
        assert_eq!(report[0].total_quantity, 3);
        assert_eq!(report[0].total_revenue.kurus(), 3000);
    }

    #[tokio::test]
    async fn test_report_ordered_by_revenue_desc() {
        let db = test_db().await;
        let repo = db.sales();

        repo.append(
            day("2026-08-10"),
            &items(&[("869001", "Cheap", 100, 1), ("869002", "Dear", 5000, 2)]),
            Money::from_kurus(10100),
        )
        .await
        .unwrap();

        let report = repo
            .aggregate_by_product(day("2026-08-01"), day("2026-08-31"))
            .await
            .unwrap();

        assert_eq!(report.len(), 2);
        assert_eq!(report[0].product_name, "Dear");
        assert_eq!(report[1].product_name, "Cheap");
    }

    #[tokio::test]
    async fn test_report_date_range_inclusive() {
        let db = test_db().await;
        let repo = db.sales();
        let doc = items(&[("869001", "A", 1000, 1)]);

        // One sale on each boundary, one outside on either side.
        repo.append(day("2026-08-01"), &doc, Money::from_kurus(1000))
            .await
            .unwrap();
        repo.append(day("2026-08-31"), &doc, Money::from_kurus(1000))
            .await
            .unwrap();
        repo.append(day("2026-07-31"), &doc, Money::from_kurus(1000))
            .await
            .unwrap();
        repo.append(day("2026-09-01"), &doc, Money::from_kurus(1000))
            .await
            .unwrap();

        let report = repo
            .aggregate_by_product(day("2026-08-01"), day("2026-08-31"))
            .await
            .unwrap();

        assert_eq!(report.len(), 1);
        assert_eq!(report[0].total_quantity, 2);
    }

    #[tokio::test]
    async fn test_report_empty_range_is_empty_not_error() {
        let db = test_db().await;

        let report = db
            .sales()
            .aggregate_by_product(day("2026-01-01"), day("2026-01-31"))
            .await
            .unwrap();

        assert!(report.is_empty());
    }
}
