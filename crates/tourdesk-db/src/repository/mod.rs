//! # Repository Module
//!
//! Database repository implementations for Tour Desk.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Register command                                                       │
//! │       │                                                                 │
//! │       │  db.sales().list_between(start, end, SaleOrder::NewestFirst)    │
//! │       ▼                                                                 │
//! │  SaleRepository                                                         │
//! │  ├── create_with_items(&self, sale, items)   (one transaction)          │
//! │  ├── list_between(&self, start, end, order)  (nested items + tour)      │
//! │  └── delete(&self, id)                       (cascades to items)        │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`tour::TourRepository`] - Tour catalog with soft delete
//! - [`sale::SaleRepository`] - Sales and their items
//! - [`closing::ClosingRepository`] - Daily closing records

pub mod closing;
pub mod sale;
pub mod tour;
