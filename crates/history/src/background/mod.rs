//! Background tasks and scheduled jobs.
//!
//! Each submodule provides a long-running async function intended to be
//! spawned via `tokio::spawn`. All tasks accept a [`CancellationToken`]
//! for graceful shutdown and finish their current unit of work before
//! stopping.
//!
//! [`CancellationToken`]: tokio_util::sync::CancellationToken

pub mod operation_ttl;
pub mod snapshot_capture;
pub mod snapshot_retention;
