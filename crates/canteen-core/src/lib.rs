//! # canteen-core: Pure Business Logic for Canteen POS
//!
//! This crate is the heart of Canteen POS. It contains all business
//! logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                    Canteen POS Architecture                      │
//! │                                                                  │
//! │  ┌────────────────────────────────────────────────────────────┐  │
//! │  │          Presentation (out of scope for this repo)         │  │
//! │  │     product screens ─ POS screen ─ report screens          │  │
//! │  └───────────────────────────┬────────────────────────────────┘  │
//! │                              │                                   │
//! │  ┌───────────────────────────▼────────────────────────────────┐  │
//! │  │             ★ canteen-core (THIS CRATE) ★                  │  │
//! │  │                                                            │  │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌────────────┐       │  │
//! │  │   │  types  │ │  money  │ │  cart   │ │ validation │       │  │
//! │  │   │ Product │ │  Money  │ │  Cart   │ │   rules    │       │  │
//! │  │   │ Sale... │ │  kuruş  │ │ CartLine│ │   checks   │       │  │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └────────────┘       │  │
//! │  │                                                            │  │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS       │  │
//! │  └───────────────────────────┬────────────────────────────────┘  │
//! │                              │                                   │
//! │  ┌───────────────────────────▼────────────────────────────────┐  │
//! │  │                canteen-db (Database Layer)                 │  │
//! │  │      SQLite repositories, migrations, checkout             │  │
//! │  └────────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, LineItem, SaleSummary, ReportRow)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - The transient cart of an in-progress session
//! - [`error`] - Domain error types
//! - [`validation`] - Field-level validation rules

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartLine};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum number of distinct lines in a single cart.
///
/// Prevents runaway carts; a canteen sale is a handful of items.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single cart line.
///
/// Protects against fat-finger entries (1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;
