//! # canteen-db: Storage Layer for the Canteen POS
//!
//! This crate provides database access for the canteen point-of-sale
//! system. It uses SQLite for local storage with sqlx for async
//! operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Canteen POS Data Flow                          │
//! │                                                                     │
//! │  POS frontend (scan / confirm / report)                             │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │                   canteen-db (THIS CRATE)                   │   │
//! │  │                                                             │   │
//! │  │  ┌────────────┐  ┌───────────────┐  ┌──────────────────┐   │   │
//! │  │  │  Database  │  │ Repositories  │  │    Checkout      │   │   │
//! │  │  │ (pool.rs)  │  │ product.rs    │  │  (checkout.rs)   │   │   │
//! │  │  │            │◄─│ sale.rs       │◄─│ confirm_sale     │   │   │
//! │  │  │ SqlitePool │  │               │  │ one transaction  │   │   │
//! │  │  └────────────┘  └───────────────┘  └──────────────────┘   │   │
//! │  │                                                             │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SQLite database file (WAL mode)                                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Catalog store and sale ledger
//! - [`checkout`] - The confirm-sale transaction coordinator
//!
//! ## Usage
//!
//! ```rust,ignore
//! use canteen_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/canteen.db")).await?;
//!
//! let products = db.products().list_all().await?;
//! let receipt = db.checkout().confirm_sale(&cart).await?;
//! let report = db.sales().aggregate_by_product(start, end).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use checkout::{Checkout, CheckoutError, Receipt};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
