//! Storage gateway layer for circulate
//!
//! This crate owns the boundary to the replicated store:
//! - [`StorageGateway`]: the trait the circulation core is written against —
//!   per-partition conditional writes (CAS) with row TTL, typed keyed reads,
//!   and logged batches that are durable as a unit but not isolated
//! - [`Statement`]: the write vocabulary batches are built from
//! - [`MemoryGateway`]: in-process simulator of the store contract, used by
//!   the stress harnesses and tests
//! - [`Retrying`]: bounded exponential-backoff wrapper over retryable
//!   infrastructure failures

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod gateway;
pub mod memory;
pub mod retry;

pub use gateway::{Statement, StorageGateway};
pub use memory::MemoryGateway;
pub use retry::Retrying;
