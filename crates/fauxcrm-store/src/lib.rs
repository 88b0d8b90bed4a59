//! In-memory record store.
//!
//! The store is the only resource shared across concurrent callers. Every
//! create obtains a unique, strictly-increasing row version from a global
//! counter; guarded writes enforce optimistic concurrency by comparing the
//! caller's version token under the write lock.

mod error;
mod store;

pub use error::{StoreError, StoreResult};
pub use store::{RecordStore, VersionGuard};
