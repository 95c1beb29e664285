//! # dayplan-domain
//!
//! Pure domain model for the dayplan time-block planner.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions
//! - Define **Time blocks** (user-owned durations with a display order)
//! - Define the create payload ([`NewTimeBlock`](time_block::NewTimeBlock)) and
//!   the partial update payload ([`TimeBlockPatch`](time_block::TimeBlockPatch))
//! - Enforce the per-block and per-user 24 hour limits
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;

pub mod time_block;
