//! Pure domain logic for the plotweave history system.
//!
//! This crate has zero internal dependencies so it can be used by the
//! repository layer, the history engine, and any future CLI tooling.

pub mod diff;
pub mod document;
pub mod error;
pub mod pagination;
pub mod retention;
pub mod snapshot;
pub mod types;
