//! Tasks, targets and the task graph that owns them.

use std::collections::BTreeSet;
use std::sync::Arc;

use autodep_common::{Arena, ContentHash, TargetId, TaskId};
use autodep_config::TargetKind;

use crate::env::Env;
use crate::node::NodeId;
use crate::uselib::UselibMap;

/// What a task does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Compiles one source file into one object file.
    Compile,
    /// Combines object files into a program or library.
    Link,
}

/// Execution state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Not executed yet.
    Pending,
    /// Executed successfully.
    Done,
}

/// How a task came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOrigin {
    /// Declared by the target's configuration before the build started.
    Declared,
    /// Created during the build from an observed `#include`.
    Discovered,
}

/// A unit of work in the build graph.
#[derive(Debug, Clone)]
pub struct Task {
    /// Compile or link.
    pub kind: TaskKind,
    /// The target (task generator) this task belongs to.
    pub target: TargetId,
    /// Input files. For a link task this list is extended during the build.
    pub inputs: Vec<NodeId>,
    /// Output files; compile tasks have exactly one object.
    pub outputs: Vec<NodeId>,
    /// Tasks that must be done before this one may run.
    pub run_after: BTreeSet<TaskId>,
    /// This task's private copy of the flag environment.
    pub env: Env,
    /// Cached build signature, cleared whenever the flags change.
    pub signature: Option<ContentHash>,
    /// Execution state.
    pub status: TaskStatus,
    /// Declared up front or discovered mid-build.
    pub origin: TaskOrigin,
}

/// A build target: the generator of a set of compile tasks and at most one link task.
#[derive(Debug, Clone)]
pub struct Target {
    /// Target name from the configuration.
    pub name: String,
    /// Kind of artifact the link task produces.
    pub kind: TargetKind,
    /// Base environment every task of this target starts from.
    pub env: Env,
    /// Include directories, relative to the source root.
    pub includes: Vec<String>,
    /// Prefix-to-tag map for uselib inference; `None` disables inference.
    pub uselib_map: Option<Arc<UselibMap>>,
    /// The link task, once created.
    pub link_task: Option<TaskId>,
    /// Every compile task created for this target, declared or discovered.
    pub compiled_tasks: Vec<TaskId>,
}

/// Arena-backed storage for all tasks and targets of one build.
#[derive(Debug, Default)]
pub struct TaskGraph {
    tasks: Arena<TaskId, Task>,
    targets: Arena<TargetId, Target>,
}

impl TaskGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a target and returns its id.
    pub fn add_target(&mut self, target: Target) -> TargetId {
        self.targets.alloc(target)
    }

    /// Adds a task and returns its id.
    pub fn add_task(&mut self, task: Task) -> TaskId {
        self.tasks.alloc(task)
    }

    /// Returns a task.
    pub fn task(&self, id: TaskId) -> &Task {
        &self.tasks[id]
    }

    /// Returns a task mutably.
    pub fn task_mut(&mut self, id: TaskId) -> &mut Task {
        &mut self.tasks[id]
    }

    /// Returns a target.
    pub fn target(&self, id: TargetId) -> &Target {
        &self.targets[id]
    }

    /// Returns a target mutably.
    pub fn target_mut(&mut self, id: TargetId) -> &mut Target {
        &mut self.targets[id]
    }

    /// Returns the target owning a task.
    pub fn target_of(&self, task: TaskId) -> &Target {
        &self.targets[self.tasks[task].target]
    }

    /// Finds a target by name.
    pub fn find_target(&self, name: &str) -> Option<TargetId> {
        self.targets
            .iter()
            .find(|(_, t)| t.name == name)
            .map(|(id, _)| id)
    }

    /// Records that `task` must not run before `before` is done.
    pub fn set_run_after(&mut self, task: TaskId, before: TaskId) {
        self.tasks[task].run_after.insert(before);
    }

    /// Marks a task as executed.
    pub fn mark_done(&mut self, task: TaskId) {
        self.tasks[task].status = TaskStatus::Done;
    }

    /// Returns `true` if every task in `task`'s run-after set is done.
    pub fn dependencies_done(&self, task: TaskId) -> bool {
        self.tasks[task]
            .run_after
            .iter()
            .all(|dep| self.tasks[*dep].status == TaskStatus::Done)
    }

    /// Iterates over all task ids in creation order.
    pub fn task_ids(&self) -> impl Iterator<Item = TaskId> {
        self.tasks.ids()
    }

    /// Iterates over all targets in creation order.
    pub fn targets(&self) -> impl Iterator<Item = (TargetId, &Target)> {
        self.targets.iter()
    }

    /// Returns the number of tasks.
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }
}
