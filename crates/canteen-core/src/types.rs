//! # Domain Types
//!
//! Core domain types used throughout Canteen POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌────────────────────────────────────────────────────────────────────┐
//! │                          Domain Types                              │
//! │                                                                    │
//! │  ┌───────────────┐   ┌────────────────┐   ┌─────────────────┐     │
//! │  │    Product    │   │  SaleSummary   │   │    LineItem     │     │
//! │  │  ───────────  │   │  ───────────── │   │  ─────────────  │     │
//! │  │  barcode (PK) │   │  id (rowid)    │   │  name snapshot  │     │
//! │  │  name         │   │  sale_date     │   │  unit_price     │     │
//! │  │  price        │   │  total         │   │  quantity       │     │
//! │  │  stock        │   └────────────────┘   └─────────────────┘     │
//! │  └───────────────┘                                                │
//! │                                                                    │
//! │  ┌───────────────┐   ┌────────────────┐   ┌─────────────────┐     │
//! │  │  ProductPatch │   │   ReportRow    │   │  CheckoutPhase  │     │
//! │  │  (partial     │   │   (derived,    │   │  (confirm-sale  │     │
//! │  │   update)     │   │    on demand)  │   │   state machine)│     │
//! │  └───────────────┘   └────────────────┘   └─────────────────┘     │
//! └────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A sale's line items carry frozen copies of the product name and unit
//! price at confirmation time. Reports read those snapshots, never the
//! live catalog, so a later price change cannot rewrite history.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::money::Money;
use crate::validation::{validate_barcode, validate_price, validate_product_name, validate_stock};

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
///
/// The barcode is the business identity: unique, immutable, chosen at
/// creation. Name, price and stock are mutable via `ProductPatch`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Barcode - unique business identifier, primary key.
    pub barcode: String,

    /// Display name shown to the cashier and on receipts.
    pub name: String,

    /// Unit price in kuruş.
    pub price: Money,

    /// Current stock level. Never negative.
    pub stock: i64,
}

impl Product {
    /// Creates a validated product.
    ///
    /// ## Errors
    /// `ValidationError` (via `CoreError`) when the barcode or name is
    /// empty/overlong, or price/stock is negative.
    pub fn new(
        barcode: impl Into<String>,
        name: impl Into<String>,
        price: Money,
        stock: i64,
    ) -> CoreResult<Self> {
        let barcode = barcode.into();
        let name = name.into();

        validate_barcode(&barcode)?;
        validate_product_name(&name)?;
        validate_price(price)?;
        validate_stock(stock)?;

        Ok(Product {
            barcode,
            name,
            price,
            stock,
        })
    }

    /// Checks whether current stock covers the requested quantity.
    #[inline]
    pub fn can_cover(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }
}

// =============================================================================
// Product Patch
// =============================================================================

/// A partial update to a product: only supplied fields change.
///
/// ## Usage
/// ```rust
/// use canteen_core::{Money, ProductPatch};
///
/// let patch = ProductPatch::default().with_price(Money::from_kurus(1750));
/// assert!(!patch.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<Money>,
    pub stock: Option<i64>,
}

impl ProductPatch {
    /// Sets a new display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets a new unit price.
    pub fn with_price(mut self, price: Money) -> Self {
        self.price = Some(price);
        self
    }

    /// Sets a new stock count.
    pub fn with_stock(mut self, stock: i64) -> Self {
        self.stock = Some(stock);
        self
    }

    /// True when no field is supplied. The store reports this case
    /// distinctly instead of issuing an empty UPDATE.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none() && self.stock.is_none()
    }
}

// =============================================================================
// Line Items (the persisted cart snapshot)
// =============================================================================

/// One frozen line of a confirmed sale.
///
/// Field names on the wire are the original document format kept for
/// compatibility with existing databases: `isim` (name), `fiyat`
/// (unit price, kuruş), `adet` (quantity).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product name at confirmation time (frozen).
    #[serde(rename = "isim")]
    pub name: String,

    /// Unit price in kuruş at confirmation time (frozen).
    #[serde(rename = "fiyat")]
    pub unit_price: Money,

    /// Quantity sold.
    #[serde(rename = "adet")]
    pub quantity: i64,
}

impl LineItem {
    /// Line total: unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

/// The full line-items document of a sale: a JSON object keyed by
/// barcode. `BTreeMap` keeps the encoding deterministic.
pub type LineItems = BTreeMap<String, LineItem>;

// =============================================================================
// Sale Summary
// =============================================================================

/// One row of the sale ledger, without the embedded line items.
///
/// Sales are append-only: there is deliberately no type representing a
/// mutable sale, and no update/delete operation anywhere in the system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleSummary {
    /// Ledger id, monotonic by creation order.
    pub id: i64,

    /// Calendar date of the sale.
    pub sale_date: NaiveDate,

    /// Total amount in kuruş, equal to the sum over the line items.
    pub total: Money,
}

// =============================================================================
// Report Row
// =============================================================================

/// Per-product aggregate over a date range. Derived on demand from the
/// sale ledger; never persisted or cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    /// Product display name (as frozen in the line items).
    pub product_name: String,

    /// Total units sold across matching sales.
    pub total_quantity: i64,

    /// Total revenue: Σ quantity × unit price.
    pub total_revenue: Money,
}

// =============================================================================
// Checkout Phase
// =============================================================================

/// The phases of a sale confirmation.
///
/// ```text
/// Validating ──► Applying ──► Recording ──► Committed
///      │             │             │
///      └─────────────┴─────────────┴──────► Aborted
/// ```
///
/// Confirmation is an explicit little state machine rather than an
/// implicit call sequence, so a persistence failure can name the phase
/// it happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutPhase {
    /// Re-reading live stock for every cart line; nothing mutated yet.
    Validating,
    /// Decrementing stock, one guarded write per line.
    Applying,
    /// Appending the sale record to the ledger.
    Recording,
    /// Everything durable.
    Committed,
    /// Rolled back; no stock change, no sale record.
    Aborted,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_new_validates() {
        let ok = Product::new("8690000000001", "Ayran", Money::from_kurus(750), 10);
        assert!(ok.is_ok());

        assert!(Product::new("", "Ayran", Money::from_kurus(750), 10).is_err());
        assert!(Product::new("869", "", Money::from_kurus(750), 10).is_err());
        assert!(Product::new("869", "Ayran", Money::from_kurus(-1), 10).is_err());
        assert!(Product::new("869", "Ayran", Money::from_kurus(750), -1).is_err());
    }

    #[test]
    fn test_product_can_cover() {
        let p = Product::new("869", "Ayran", Money::from_kurus(750), 3).unwrap();
        assert!(p.can_cover(3));
        assert!(!p.can_cover(4));
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(ProductPatch::default().is_empty());
        assert!(!ProductPatch::default().with_stock(5).is_empty());
    }

    #[test]
    fn test_line_item_wire_format() {
        let item = LineItem {
            name: "Tost".to_string(),
            unit_price: Money::from_kurus(2500),
            quantity: 2,
        };

        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(json, r#"{"isim":"Tost","fiyat":2500,"adet":2}"#);

        let back: LineItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
        assert_eq!(back.line_total().kurus(), 5000);
    }

    #[test]
    fn test_line_items_document_keyed_by_barcode() {
        let mut items = LineItems::new();
        items.insert(
            "869001".to_string(),
            LineItem {
                name: "Su".to_string(),
                unit_price: Money::from_kurus(500),
                quantity: 1,
            },
        );

        let json = serde_json::to_string(&items).unwrap();
        assert_eq!(json, r#"{"869001":{"isim":"Su","fiyat":500,"adet":1}}"#);
    }
}
