//! Domain model structs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct
//! matching the database row, plus any insert inputs the history engine
//! needs.

pub mod operation;
pub mod plot;
pub mod rollback_log;
pub mod section;
pub mod snapshot;
pub mod user;

pub use operation::HotOperation;
pub use plot::Plot;
pub use rollback_log::RollbackLog;
pub use section::{NewSection, Section};
pub use snapshot::ColdSnapshot;
pub use user::{User, UserRef};
