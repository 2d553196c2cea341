//! # Repository Module
//!
//! Database repository implementations for Kiosk POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Service call                                                          │
//! │       │                                                                 │
//! │       │  db.products().search_for_sale("cola", 10)                     │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── search_for_sale(&self, term, limit)                               │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── insert(&self, product)                                            │
//! │  └── update(&self, product)                                            │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • SQL is isolated in one place                                        │
//! │  • Clean separation of concerns                                        │
//! │  • Repositories are cheap clones over the shared pool                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`category::CategoryRepository`] - Category CRUD and soft delete
//! - [`product::ProductRepository`] - Product CRUD, checkout search, counts
//! - [`sale::SaleRepository`] - Atomic sale commit and day queries
//! - [`cash::CashRepository`] - Drawer movements

pub mod cash;
pub mod category;
pub mod product;
pub mod sale;
