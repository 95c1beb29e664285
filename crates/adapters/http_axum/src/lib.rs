//! # dayplan-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a **JSON REST API** for a user's time blocks under `/api/time-blocks`
//! - Resolve the calling user from the `x-user-id` header ([`identity`])
//! - Reject malformed payloads before they reach the service (serde shapes
//!   with `deny_unknown_fields`)
//! - Map application results and errors into HTTP responses
//!
//! ## Dependency rule
//! Depends on `dayplan-app` (for port traits and services) and `dayplan-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod error;
pub mod identity;
pub mod router;
pub mod state;
