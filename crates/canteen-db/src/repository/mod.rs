//! Repository implementations.
//!
//! Each repository owns the SQL for one table:
//! - [`product`] - the catalog (products table)
//! - [`sale`] - the append-only ledger (sales table) and its reports

pub mod product;
pub mod sale;
