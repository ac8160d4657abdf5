//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Methods that must run inside
//! the caller's transaction take `&mut PgConnection` instead and are
//! passed `&mut *tx`.

pub mod operation_repo;
pub mod plot_repo;
pub mod rollback_log_repo;
pub mod section_repo;
pub mod snapshot_repo;
pub mod user_repo;

pub use operation_repo::OperationRepo;
pub use plot_repo::PlotRepo;
pub use rollback_log_repo::RollbackLogRepo;
pub use section_repo::SectionRepo;
pub use snapshot_repo::SnapshotRepo;
pub use user_repo::UserRepo;
