//! Shared foundational types used across the QHDL elaboration workspace.
//!
//! This crate provides interned identifiers with case-insensitive comparison
//! keys, content hashing for files and graph fingerprints, and the internal
//! error type used when the engine detects a broken invariant.

#![warn(missing_docs)]

pub mod hash;
pub mod ident;
pub mod result;

pub use hash::ContentHash;
pub use ident::{Ident, Interner, Name};
pub use result::{InternalError, QhdlResult};
