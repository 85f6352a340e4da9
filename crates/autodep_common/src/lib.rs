//! Shared foundational types used across the autodep build engine.
//!
//! This crate provides append-only arenas with opaque ids, interned file-system
//! paths, content hashing for task signatures, and the internal error type.

#![warn(missing_docs)]

pub mod arena;
pub mod hash;
pub mod ids;
pub mod intern;
pub mod result;

pub use arena::{Arena, ArenaId};
pub use hash::{ContentHash, SignatureHasher};
pub use ids::{EntryId, TargetId, TaskId};
pub use intern::{Interner, PathSym};
pub use result::InternalError;
