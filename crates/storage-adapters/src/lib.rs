//! # storage-adapters
//!
//! Document-store and object-store implementations of the domain ports.
//! The in-memory stores are always compiled (tests, seed tooling, dev
//! builds); Postgres and the local filesystem sit behind features.

pub mod media;
pub mod memory;

#[cfg(feature = "db-postgres")]
pub mod postgres;
