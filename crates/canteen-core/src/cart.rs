//! # Cart
//!
//! The transient cart of an in-progress POS session.
//!
//! ## Lifecycle
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                       Cart Lifecycle                             │
//! │                                                                  │
//! │  scan barcode ───► add_line()        merges into existing line   │
//! │  adjust ─────────► set_quantity()    0 removes the line          │
//! │  remove ─────────► remove_line()                                 │
//! │                                                                  │
//! │  confirm ────────► Checkout::confirm_sale(&cart)                 │
//! │                        │ success: caller clears the cart         │
//! │                        └ failure: cart untouched, retry or drop  │
//! │                                                                  │
//! │  The cart itself is never persisted. Only the frozen snapshot    │
//! │  from line_items() ends up inside a sale record.                 │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cart is an explicit session object owned by one confirm-or-abandon
//! cycle and passed to the checkout coordinator, not ambient shared state.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{LineItem, LineItems, Product};
use crate::validation::validate_quantity;
use crate::MAX_CART_LINES;

/// One line of the cart.
///
/// Name and unit price are denormalized copies frozen when the product
/// is first added. A price change in the catalog after that moment does
/// not affect this cart - the price at scan time is what the customer
/// was quoted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product barcode (for catalog lookups during checkout).
    pub barcode: String,

    /// Product name at time of adding (frozen).
    pub name: String,

    /// Unit price in kuruş at time of adding (frozen).
    pub unit_price: Money,

    /// Quantity in cart, always >= 1.
    pub quantity: i64,
}

impl CartLine {
    /// Creates a cart line from a product and quantity.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        CartLine {
            barcode: product.barcode.clone(),
            name: product.name.clone(),
            unit_price: product.price,
            quantity,
        }
    }

    /// Line total: unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

/// The transient cart.
///
/// ## Invariants
/// - Lines are unique by barcode (adding the same product merges)
/// - Quantity is always >= 1 (setting to 0 removes the line)
/// - At most MAX_CART_LINES distinct lines
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Adds a product to the cart, merging with an existing line.
    ///
    /// ## Behaviour
    /// - Product already in cart: quantity increases
    /// - Otherwise: a new line is appended with frozen name/price
    ///
    /// The merged quantity is validated against MAX_LINE_QUANTITY.
    pub fn add_line(&mut self, product: &Product, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| l.barcode == product.barcode)
        {
            let merged = line.quantity + quantity;
            validate_quantity(merged)?;
            line.quantity = merged;
            return Ok(());
        }

        if self.lines.len() >= MAX_CART_LINES {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_LINES,
            });
        }

        self.lines.push(CartLine::from_product(product, quantity));
        Ok(())
    }

    /// Sets the quantity of an existing line. Zero removes the line.
    pub fn set_quantity(&mut self, barcode: &str, quantity: i64) -> CoreResult<()> {
        if quantity == 0 {
            return self.remove_line(barcode);
        }

        validate_quantity(quantity)?;

        match self.lines.iter_mut().find(|l| l.barcode == barcode) {
            Some(line) => {
                line.quantity = quantity;
                Ok(())
            }
            None => Err(CoreError::NotInCart(barcode.to_string())),
        }
    }

    /// Removes a line by barcode.
    pub fn remove_line(&mut self, barcode: &str) -> CoreResult<()> {
        let before = self.lines.len();
        self.lines.retain(|l| l.barcode != barcode);

        if self.lines.len() == before {
            Err(CoreError::NotInCart(barcode.to_string()))
        } else {
            Ok(())
        }
    }

    /// Clears all lines. Called by the POS session after a confirmed
    /// sale or when a cart is abandoned.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Lines in first-added order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Looks up a line by barcode.
    pub fn get(&self, barcode: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.barcode == barcode)
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Cart total: Σ unit price × quantity over the denormalized prices.
    pub fn total(&self) -> Money {
        self.lines.iter().map(|l| l.line_total()).sum()
    }

    /// Checks if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Freezes the cart into the persisted line-items document:
    /// a map keyed by barcode, values carrying name/price/quantity.
    pub fn line_items(&self) -> LineItems {
        self.lines
            .iter()
            .map(|l| {
                (
                    l.barcode.clone(),
                    LineItem {
                        name: l.name.clone(),
                        unit_price: l.unit_price,
                        quantity: l.quantity,
                    },
                )
            })
            .collect()
    }
}
