//! Dry-run executor that records what would be executed.

use autodep_common::{ContentHash, TaskId};
use serde::Serialize;

use crate::build::Build;
use crate::env::Env;
use crate::error::BuildError;
use crate::scheduler::Executor;
use crate::task::TaskKind;

/// One task as seen at execution time.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutedTask {
    /// The executed task.
    #[serde(skip)]
    pub task: TaskId,
    /// `"compile"` or `"link"`.
    pub kind: &'static str,
    /// Input paths relative to their tree root.
    pub inputs: Vec<String>,
    /// Output paths relative to their tree root.
    pub outputs: Vec<String>,
    /// Signature the task executed with.
    #[serde(serialize_with = "display")]
    pub signature: ContentHash,
    /// Flags at execution time.
    pub env: Env,
}

fn display<S: serde::Serializer>(hash: &ContentHash, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(hash)
}

/// Executor that runs nothing and keeps a log of executed tasks.
///
/// Executing forces the signature, so lazily cleared signatures are
/// recomputed here at the latest.
#[derive(Debug, Default)]
pub struct DryRun {
    log: Vec<ExecutedTask>,
}

impl DryRun {
    /// Creates an executor with an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the execution log.
    pub fn log(&self) -> &[ExecutedTask] {
        &self.log
    }

    /// Returns the log entry of a task, if it executed.
    pub fn find(&self, task: TaskId) -> Option<&ExecutedTask> {
        self.log.iter().find(|e| e.task == task)
    }
}

impl Executor for DryRun {
    fn execute(&mut self, build: &mut Build, task: TaskId) -> Result<(), BuildError> {
        let signature = build.signature(task);
        let t = build.tasks.task(task);
        let relative = |nodes: &[crate::node::NodeId]| -> Vec<String> {
            nodes.iter().map(|n| build.nodes.relative(*n)).collect()
        };
        self.log.push(ExecutedTask {
            task,
            kind: match t.kind {
                TaskKind::Compile => "compile",
                TaskKind::Link => "link",
            },
            inputs: relative(&t.inputs),
            outputs: relative(&t.outputs),
            signature,
            env: t.env.clone(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFs;
    use autodep_config::{ResolvedTarget, TargetKind};
    use std::collections::BTreeMap;
    use std::path::Path;
    use std::sync::Arc;

    #[test]
    fn records_relative_paths_and_signature() {
        let fs = MemoryFs::new().with_file("/p/main.cpp", "");
        let mut b = Build::new(Path::new("/p"), Path::new("/p/build"), Arc::new(fs));
        let g = b
            .add_target(&ResolvedTarget {
                name: "app".into(),
                kind: TargetKind::Program,
                sources: vec!["main.cpp".into()],
                includes: Vec::new(),
                uselib: Vec::new(),
                env: BTreeMap::new(),
                uselib_map: None,
            })
            .unwrap();
        let task = b.tasks.target(g).compiled_tasks[0];

        let mut exec = DryRun::new();
        exec.execute(&mut b, task).unwrap();
        let entry = exec.find(task).unwrap();
        assert_eq!(entry.kind, "compile");
        assert_eq!(entry.inputs, vec!["main.cpp"]);
        assert_eq!(entry.outputs, vec!["app/main.cpp.o"]);
        assert_eq!(Some(entry.signature), b.tasks.task(task).signature);
    }
}
