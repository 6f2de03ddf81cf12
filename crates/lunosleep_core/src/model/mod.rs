//! Domain model for daily sleep records and user settings.
//!
//! # Responsibility
//! - Define canonical data structures used by the engine and stores.
//! - Own the persisted wire shape (camelCase JSON) of each structure.
//!
//! # Invariants
//! - Every record is identified by a stable `RecordId`.
//! - Derived fields are recomputed by writers, never edited by callers.

pub mod clock;
pub mod record;
pub mod settings;
