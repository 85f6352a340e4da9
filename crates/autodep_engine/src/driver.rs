//! Scheduler integration.

use autodep_build::{
    BaseProbe, Build, BuildError, ProbeOutcome, ReadinessProbe, TaskDriver, TaskKind,
};
use autodep_common::TaskId;

use crate::bridge::SchedulerBridge;
use crate::context::BuildContext;
use crate::probe::{probe_compile, probe_link};

/// A [`TaskDriver`] that runs dependency discovery around a base probe.
pub struct AutodepDriver<P = BaseProbe> {
    base: P,
    ctx: BuildContext,
}

impl<P: ReadinessProbe> AutodepDriver<P> {
    /// Wraps `base` with the engine state in `ctx`.
    pub fn new(base: P, ctx: BuildContext) -> Self {
        Self { base, ctx }
    }

    /// Returns the engine state.
    pub fn context(&self) -> &BuildContext {
        &self.ctx
    }

    /// Consumes the driver and returns the engine state.
    pub fn into_context(self) -> BuildContext {
        self.ctx
    }
}

impl<P: ReadinessProbe> TaskDriver for AutodepDriver<P> {
    fn probe(&mut self, build: &mut Build, task: TaskId) -> Result<ProbeOutcome, BuildError> {
        match build.tasks.task(task).kind {
            TaskKind::Compile => {
                let outcome = probe_compile(&mut self.ctx, build, &mut self.base, task)?;
                let spawned =
                    SchedulerBridge::new(&mut self.ctx, &mut self.base).admit(build, outcome.spawned)?;
                Ok(ProbeOutcome {
                    readiness: outcome.readiness,
                    spawned,
                })
            }
            TaskKind::Link => probe_link(&self.ctx, build, &mut self.base, task),
        }
    }
}
