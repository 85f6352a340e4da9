//! Dynamic dependency discovery for compiled units.
//!
//! When a compile task's `#include` scan becomes available, the engine looks
//! for an implementation file next to every resolved header, creates compile
//! tasks for the ones nobody builds yet, wires their objects into every
//! related link task and infers library requirement tags from the include
//! paths. All of this happens inside the scheduler's readiness probe, while
//! the build is already running.
//!
//! The per-build state lives in [`BuildContext`]; [`AutodepDriver`] plugs it
//! into the host [`Scheduler`](autodep_build::Scheduler).

#![warn(missing_docs)]

pub mod bridge;
pub mod context;
pub mod driver;
pub mod entry;
pub mod expand;
pub mod flags;
pub mod infer;
pub mod link;
pub mod probe;
pub mod resolve;

pub use bridge::SchedulerBridge;
pub use context::{BuildContext, EngineStats};
pub use driver::AutodepDriver;
pub use entry::{CacheEntry, Direction, EntryCache, Lookup};
pub use expand::{expand, Expansion};
pub use flags::propagate_uselib;
pub use infer::infer_uselib;
pub use link::{update_link_tasks, AUTODEP_USELIB};
pub use probe::{probe_compile, probe_link};
pub use resolve::{HeaderSuffixes, ResolutionCache};
