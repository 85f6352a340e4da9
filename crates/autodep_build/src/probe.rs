//! The host's base readiness probe.

use autodep_common::TaskId;

use crate::build::Build;
use crate::error::BuildError;
use crate::scan::Scanner;
use crate::scheduler::Readiness;
use crate::task::TaskKind;

/// Answers the scheduler's "may this task run now?" question.
pub trait ReadinessProbe {
    /// Probes one task.
    fn probe(&mut self, build: &mut Build, task: TaskId) -> Result<Readiness, BuildError>;
}

/// Default probe: waits for run-after dependencies, scans compile tasks once,
/// and fills in the signature when it is missing.
pub struct BaseProbe {
    scanner: Scanner,
}

impl BaseProbe {
    /// Creates a base probe using `scanner` for compile tasks.
    pub fn new(scanner: Scanner) -> Self {
        Self { scanner }
    }
}

impl ReadinessProbe for BaseProbe {
    fn probe(&mut self, build: &mut Build, task: TaskId) -> Result<Readiness, BuildError> {
        if !build.tasks.dependencies_done(task) {
            return Ok(Readiness::Deferred);
        }

        let t = build.tasks.task(task);
        if t.kind == TaskKind::Compile && !build.deps.is_scanned(task) {
            let source = t.inputs[0];
            let search = build.search_dirs(task);
            let result = self.scanner.scan(&build.nodes, source, &search)?;
            build.deps.insert(task, result);
        }

        build.signature(task);
        Ok(Readiness::Ready)
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

    fn build() -> (Build, TaskId, TaskId) {
        let fs = MemoryFs::new()
            .with_file("/p/main.cpp", "#include \"util.h\"\n#include <vector>\n")
            .with_file("/p/util.h", "");
        let mut b = Build::new(Path::new("/p"), Path::new("/p/build"), Arc::new(fs));
        let g = b
            .add_target(&ResolvedTarget {
                name: "app".into(),
                kind: TargetKind::Program,
                sources: vec!["main.cpp".into()],
                includes: vec![".".into()],
                uselib: Vec::new(),
                env: BTreeMap::new(),
                uselib_map: None,
            })
            .unwrap();
        let compile = b.tasks.target(g).compiled_tasks[0];
        let link = b.tasks.target(g).link_task.unwrap();
        (b, compile, link)
    }

    #[test]
    fn compile_task_is_scanned_and_signed() {
        let (mut b, compile, _) = build();
        let mut probe = BaseProbe::new(Scanner::new(&[]).unwrap());
        assert_eq!(probe.probe(&mut b, compile).unwrap(), Readiness::Ready);
        assert_eq!(b.deps.node_deps(compile), [b.nodes.src_node("util.h")]);
        assert_eq!(b.deps.raw_deps(compile), ["vector"]);
        assert!(b.tasks.task(compile).signature.is_some());
    }

    #[test]
    fn link_waits_for_objects() {
        let (mut b, compile, link) = build();
        let mut probe = BaseProbe::new(Scanner::new(&[]).unwrap());
        assert_eq!(probe.probe(&mut b, link).unwrap(), Readiness::Deferred);
        b.tasks.mark_done(compile);
        assert_eq!(probe.probe(&mut b, link).unwrap(), Readiness::Ready);
        assert!(!b.deps.is_scanned(link));
    }
}
