//! Opaque ID newtypes for build-graph records.
//!
//! Each ID is a thin `u32` wrapper created by [`Arena::alloc`](crate::Arena::alloc).

use crate::arena::ArenaId;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl ArenaId for $name {
            fn from_raw(index: u32) -> Self {
                Self(index)
            }

            fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

define_id!(
    /// A compile or link task in the task graph.
    TaskId,
    "t"
);

define_id!(
    /// A build target (task generator) owning compile tasks and a link task.
    TargetId,
    "g"
);

define_id!(
    /// A dependency-discovery cache entry, one per compiled unit.
    EntryId,
    "e"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_roundtrip() {
        assert_eq!(TaskId::from_raw(9).as_raw(), 9);
        assert_eq!(EntryId::from_raw(0).as_raw(), 0);
    }

    #[test]
    fn display_is_prefixed() {
        assert_eq!(TaskId::from_raw(3).to_string(), "t3");
        assert_eq!(TargetId::from_raw(1).to_string(), "g1");
        assert_eq!(EntryId::from_raw(12).to_string(), "e12");
    }

    #[test]
    fn ordering_follows_allocation() {
        assert!(TaskId::from_raw(1) < TaskId::from_raw(2));
    }
}
