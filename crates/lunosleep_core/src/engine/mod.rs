//! Sleep statistics and temporal aggregation.
//!
//! # Responsibility
//! - Derive durations, aggregates, weekly buckets and day lookups from
//!   record sequences.
//!
//! # Invariants
//! - Every function is pure: inputs are borrowed read-only, outputs are
//!   freshly computed, nothing is cached between calls.
//! - Every function is total over its input domain; degenerate inputs map
//!   to defined zero values.

pub mod day;
pub mod duration;
pub mod insights;
pub mod stats;
pub mod weekly;
