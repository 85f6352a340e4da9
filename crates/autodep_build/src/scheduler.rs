//! Single-threaded scheduler: probes tasks, admits new work, runs ready tasks.

use std::collections::{HashSet, VecDeque};

use autodep_common::{InternalError, TaskId};

use crate::build::Build;
use crate::error::BuildError;

/// Result of a readiness probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// Not runnable yet; ask again later.
    Deferred,
    /// Runnable now.
    Ready,
}

/// What a driver reports back for one probed task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    /// Whether the probed task may run now.
    pub readiness: Readiness,
    /// Tasks created while probing, to be admitted into the work queue at once.
    pub spawned: Vec<TaskId>,
}

impl ProbeOutcome {
    /// An outcome with no new tasks.
    pub fn new(readiness: Readiness) -> Self {
        Self {
            readiness,
            spawned: Vec::new(),
        }
    }
}

/// Decides readiness for the scheduler.
pub trait TaskDriver {
    /// Probes one task, possibly creating new ones.
    fn probe(&mut self, build: &mut Build, task: TaskId) -> Result<ProbeOutcome, BuildError>;
}

/// Runs a ready task.
pub trait Executor {
    /// Executes one task. The scheduler marks it done on success.
    fn execute(&mut self, build: &mut Build, task: TaskId) -> Result<(), BuildError>;
}

/// The live queue of tasks waiting to be probed.
///
/// A task is admitted at most once; deferred tasks come back through
/// [`requeue`](Self::requeue).
#[derive(Debug, Default)]
pub struct WorkQueue {
    queue: VecDeque<TaskId>,
    admitted: HashSet<TaskId>,
}

impl WorkQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Admits a task unless it was admitted before. Returns `true` if queued.
    pub fn admit(&mut self, task: TaskId) -> bool {
        if self.admitted.insert(task) {
            self.queue.push_back(task);
            true
        } else {
            false
        }
    }

    /// Puts an already admitted task back at the end of the queue.
    pub fn requeue(&mut self, task: TaskId) {
        self.queue.push_back(task);
    }

    /// Takes the next task to probe.
    pub fn pop(&mut self) -> Option<TaskId> {
        self.queue.pop_front()
    }

    /// Returns the number of queued tasks.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns `true` if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Summary of a scheduler run.
#[derive(Debug, Default, Clone)]
pub struct ScheduleReport {
    /// Tasks in execution order.
    pub executed: Vec<TaskId>,
    /// Total number of probes issued.
    pub probes: usize,
    /// Tasks admitted after the run started.
    pub admitted_mid_build: usize,
}

/// Drives the build to completion.
#[derive(Debug, Default)]
pub struct Scheduler {
    queue: WorkQueue,
}

impl Scheduler {
    /// Creates a scheduler with an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs every task of the build.
    ///
    /// Tasks are probed in queue order. Spawned tasks are admitted right
    /// after the probe that created them. Deferred tasks are retried after
    /// the current pass; a pass that executes nothing while tasks remain
    /// deferred is a stall and ends the run with an internal error.
    pub fn run(
        &mut self,
        build: &mut Build,
        driver: &mut dyn TaskDriver,
        executor: &mut dyn Executor,
    ) -> Result<ScheduleReport, BuildError> {
        let mut report = ScheduleReport::default();
        for task in build.tasks.task_ids() {
            self.queue.admit(task);
        }

        let mut postponed: Vec<TaskId> = Vec::new();
        loop {
            let mut progress = false;
            while let Some(task) = self.queue.pop() {
                report.probes += 1;
                let outcome = driver.probe(build, task)?;
                for new_task in outcome.spawned {
                    if self.queue.admit(new_task) {
                        report.admitted_mid_build += 1;
                    }
                }
                match outcome.readiness {
                    Readiness::Deferred => postponed.push(task),
                    Readiness::Ready => {
                        executor.execute(build, task)?;
                        build.tasks.mark_done(task);
                        report.executed.push(task);
                        progress = true;
                    }
                }
            }

            if postponed.is_empty() {
                break;
            }
            if !progress {
                tracing::warn!(deferred = postponed.len(), "scheduler made no progress");
                return Err(InternalError::new(format!(
                    "scheduler stalled with {} deferred task(s)",
                    postponed.len()
                ))
                .into());
            }
            for task in postponed.drain(..) {
                self.queue.requeue(task);
            }
        }

        tracing::debug!(
            executed = report.executed.len(),
            probes = report.probes,
            "build finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::DryRun;
    use crate::fs::MemoryFs;
    use crate::probe::{BaseProbe, ReadinessProbe};
    use crate::scan::Scanner;
    use autodep_config::{ResolvedTarget, TargetKind};
    use std::collections::BTreeMap;
    use std::path::Path;
    use std::sync::Arc;

    struct Plain(BaseProbe);

    impl TaskDriver for Plain {
        fn probe(&mut self, build: &mut Build, task: TaskId) -> Result<ProbeOutcome, BuildError> {
            Ok(ProbeOutcome::new(self.0.probe(build, task)?))
        }
    }

    fn build() -> Build {
        let fs = MemoryFs::new()
            .with_file("/p/a.cpp", "")
            .with_file("/p/b.cpp", "");
        let mut b = Build::new(Path::new("/p"), Path::new("/p/build"), Arc::new(fs));
        b.add_target(&ResolvedTarget {
            name: "app".into(),
            kind: TargetKind::Program,
            sources: vec!["a.cpp".into(), "b.cpp".into()],
            includes: Vec::new(),
            uselib: Vec::new(),
            env: BTreeMap::new(),
            uselib_map: None,
        })
        .unwrap();
        b
    }

    #[test]
    fn queue_admits_once() {
        let mut q = WorkQueue::new();
        let t = TaskId::from_raw(0);
        assert!(q.admit(t));
        assert!(!q.admit(t));
        assert_eq!(q.len(), 1);
        assert_eq!(q.pop(), Some(t));
        q.requeue(t);
        assert_eq!(q.len(), 1);
        assert!(!q.admit(t));
    }

    #[test]
    fn link_runs_after_objects() {
        let mut b = build();
        let mut driver = Plain(BaseProbe::new(Scanner::new(&[]).unwrap()));
        let mut exec = DryRun::new();
        let report = Scheduler::new().run(&mut b, &mut driver, &mut exec).unwrap();
        assert_eq!(report.executed.len(), 3);
        let link = b.tasks.find_target("app").and_then(|g| b.tasks.target(g).link_task);
        assert_eq!(report.executed.last().copied(), link);
    }

    #[test]
    fn circular_run_after_stalls() {
        let mut b = build();
        let g = b.tasks.find_target("app").unwrap();
        let a = b.tasks.target(g).compiled_tasks[0];
        let c = b.tasks.target(g).compiled_tasks[1];
        b.tasks.set_run_after(a, c);
        b.tasks.set_run_after(c, a);
        let mut driver = Plain(BaseProbe::new(Scanner::new(&[]).unwrap()));
        let err = Scheduler::new()
            .run(&mut b, &mut driver, &mut DryRun::new())
            .unwrap_err();
        assert!(matches!(err, BuildError::Internal(_)));
    }
}
