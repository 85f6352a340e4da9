//! The state of one build run: nodes, tasks and scan results.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use autodep_common::{ContentHash, SignatureHasher, TargetId, TaskId};
use autodep_config::ResolvedTarget;

use crate::env::{apply_uselib, Env, COMPILE_VARS, LINK_VARS};
use crate::error::BuildError;
use crate::fs::FileSystem;
use crate::node::{NodeId, NodeTree};
use crate::scan::DepStore;
use crate::task::{Target, Task, TaskGraph, TaskKind, TaskOrigin, TaskStatus};
use crate::uselib::UselibMap;

/// Environment variable holding the absolute include search paths of a task.
pub const INCPATHS: &str = "INCPATHS";

/// Everything the scheduler and the engine operate on during one build.
pub struct Build {
    /// Source and build trees.
    pub nodes: NodeTree,
    /// All tasks and targets.
    pub tasks: TaskGraph,
    /// Per-task include scan results.
    pub deps: DepStore,
}

impl Build {
    /// Creates an empty build over the given roots.
    pub fn new(src_root: &Path, bld_root: &Path, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            nodes: NodeTree::new(src_root, bld_root, fs),
            tasks: TaskGraph::new(),
            deps: DepStore::new(),
        }
    }

    /// Adds a resolved target with one compile task per declared source and,
    /// for linking kinds, a link task consuming their objects.
    pub fn add_target(&mut self, resolved: &ResolvedTarget) -> Result<TargetId, BuildError> {
        let mut env = Env::from_map(resolved.env.clone());
        apply_uselib(&mut env, &resolved.uselib, COMPILE_VARS);
        apply_uselib(&mut env, &resolved.uselib, LINK_VARS);

        let target = self.tasks.add_target(Target {
            name: resolved.name.clone(),
            kind: resolved.kind,
            env,
            includes: resolved.includes.clone(),
            uselib_map: resolved
                .uselib_map
                .as_ref()
                .map(|table| Arc::new(UselibMap::from(table))),
            link_task: None,
            compiled_tasks: Vec::new(),
        });

        let mut sources = Vec::with_capacity(resolved.sources.len());
        for rel in &resolved.sources {
            let node = self.nodes.src_node(rel);
            if !self.nodes.exists(node) {
                return Err(BuildError::MissingSource(self.nodes.path(node).to_path_buf()));
            }
            sources.push(node);
        }
        for node in sources {
            self.new_compile_task(target, node, TaskOrigin::Declared);
        }
        if resolved.kind.links() {
            self.new_link_task(target);
        }

        tracing::debug!(
            target = resolved.name.as_str(),
            sources = resolved.sources.len(),
            "added target"
        );
        Ok(target)
    }

    /// Creates the compile task for `source` within `target`.
    ///
    /// The task starts from a copy of the target environment and gets its own
    /// include search paths. Linking the object is left to the caller.
    pub fn new_compile_task(
        &mut self,
        target: TargetId,
        source: NodeId,
        origin: TaskOrigin,
    ) -> TaskId {
        let target_ref = self.tasks.target(target);
        let object = self.nodes.object_for(source, &target_ref.name);
        let env = target_ref.env.clone();
        let task = self.tasks.add_task(Task {
            kind: TaskKind::Compile,
            target,
            inputs: vec![source],
            outputs: vec![object],
            run_after: BTreeSet::new(),
            env,
            signature: None,
            status: TaskStatus::Pending,
            origin,
        });
        self.tasks.target_mut(target).compiled_tasks.push(task);
        self.refresh_incpaths(task);
        task
    }

    /// Creates the link task of `target` over its current compile tasks.
    pub fn new_link_task(&mut self, target: TargetId) -> TaskId {
        let target_ref = self.tasks.target(target);
        let output = self.nodes.build_node(&link_output_name(target_ref));
        let env = target_ref.env.clone();
        let compiled = target_ref.compiled_tasks.clone();
        let inputs = compiled
            .iter()
            .map(|t| self.tasks.task(*t).outputs[0])
            .collect();
        let task = self.tasks.add_task(Task {
            kind: TaskKind::Link,
            target,
            inputs,
            outputs: vec![output],
            run_after: compiled.into_iter().collect(),
            env,
            signature: None,
            status: TaskStatus::Pending,
            origin: TaskOrigin::Declared,
        });
        self.tasks.target_mut(target).link_task = Some(task);
        task
    }

    /// Recomputes `INCPATHS` from the target's include directories followed by
    /// the task's `INCLUDES`, as absolute paths.
    pub fn refresh_incpaths(&mut self, task: TaskId) {
        let target = self.tasks.target_of(task);
        let mut paths: Vec<String> = Vec::new();
        for dir in target
            .includes
            .iter()
            .chain(self.tasks.task(task).env.get("INCLUDES"))
        {
            let node = if Path::new(dir).is_absolute() {
                self.nodes.node(Path::new(dir))
            } else {
                self.nodes.src_node(dir)
            };
            let abs = self.nodes.abspath(node).to_string();
            if !paths.contains(&abs) {
                paths.push(abs);
            }
        }
        self.tasks.task_mut(task).env.set(INCPATHS, paths);
    }

    /// Returns the include search directories of a task that lie in the source tree.
    pub fn search_dirs(&self, task: TaskId) -> Vec<NodeId> {
        self.tasks
            .task(task)
            .env
            .get(INCPATHS)
            .iter()
            .map(|p| self.nodes.node(Path::new(p)))
            .filter(|n| self.nodes.path(*n).starts_with(self.nodes.src_root()))
            .collect()
    }

    /// Returns the task's signature, computing and caching it if absent.
    pub fn signature(&mut self, task: TaskId) -> ContentHash {
        if let Some(sig) = self.tasks.task(task).signature {
            return sig;
        }
        let sig = self.compute_signature(task);
        self.tasks.task_mut(task).signature = Some(sig);
        sig
    }

    /// Drops the cached signature so the next [`signature`](Self::signature) recomputes it.
    pub fn clear_signature(&mut self, task: TaskId) {
        self.tasks.task_mut(task).signature = None;
    }

    fn compute_signature(&self, task: TaskId) -> ContentHash {
        let t = self.tasks.task(task);
        let mut hasher = SignatureHasher::new();
        hasher.field(match t.kind {
            TaskKind::Compile => "compile",
            TaskKind::Link => "link",
        });
        hasher.end_group();
        for node in t.inputs.iter().chain(&t.outputs) {
            hasher.field(self.nodes.abspath(*node));
        }
        hasher.end_group();
        for node in self.deps.node_deps(task) {
            hasher.field(self.nodes.abspath(*node));
        }
        for raw in self.deps.raw_deps(task) {
            hasher.field(raw);
        }
        hasher.end_group();
        for (key, values) in t.env.iter() {
            hasher.field(key);
            for value in values {
                hasher.field(value);
            }
            hasher.end_group();
        }
        hasher.finish()
    }
}

/// File name of a target's link output.
fn link_output_name(target: &Target) -> String {
    use autodep_config::TargetKind;
    match target.kind {
        TargetKind::Shlib => format!("lib{}.so", target.name),
        TargetKind::Stlib => format!("lib{}.a", target.name),
        TargetKind::Program | TargetKind::Objects => target.name.clone(),
    }
}
