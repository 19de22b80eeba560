//! # services
//!
//! The referential workflow layer: multi-step operations that keep the
//! document store, auth service, and object store consistent with each
//! other. Every workflow here is sequential with explicit compensation;
//! the only true multi-document atomicity (the college cascade) is pushed
//! down to the document store's batch primitive.

pub mod accounts;
pub mod bulletins;
pub mod directory;
pub mod media;

mod tokens;
