//! Host build model for the autodep engine.
//!
//! Everything the dependency-discovery engine treats as an external
//! collaborator lives here: the file-system abstraction and node tree, the
//! per-task key-value environment, the task graph and its task factory, the
//! `#include` scanner, the base readiness probe and the single-threaded
//! scheduler that drives probes and executes ready tasks.

#![warn(missing_docs)]

pub mod build;
pub mod env;
pub mod error;
pub mod executor;
pub mod fs;
pub mod node;
pub mod probe;
pub mod scan;
pub mod scheduler;
pub mod task;
pub mod uselib;

pub use build::Build;
pub use env::{apply_uselib, Env, COMPILE_VARS, LINK_VARS};
pub use error::BuildError;
pub use executor::{DryRun, ExecutedTask};
pub use fs::{DiskFs, FileSystem, MemoryFs};
pub use node::{NodeId, NodeTree};
pub use probe::{BaseProbe, ReadinessProbe};
pub use scan::{DepStore, ScanResult, Scanner};
pub use scheduler::{
    Executor, ProbeOutcome, Readiness, ScheduleReport, Scheduler, TaskDriver, WorkQueue,
};
pub use task::{Target, Task, TaskGraph, TaskKind, TaskOrigin, TaskStatus};
pub use uselib::UselibMap;
