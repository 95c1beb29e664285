//! # dayplan-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define the **port trait** adapters must implement (driven/outbound port):
//!   - `TimeBlockRepository` — user-scoped CRUD plus transactional reordering
//! - Define the **driving/inbound** use-case struct:
//!   - `TimeBlockService` — list, create, update, delete, reorder
//! - Enforce the daily budget before anything reaches storage
//!
//! ## Dependency rule
//! Depends on `dayplan-domain` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
