//! Eager discovery for tasks created mid-build.

use std::collections::VecDeque;

use autodep_build::{Build, BuildError, ReadinessProbe};
use autodep_common::TaskId;

use crate::context::BuildContext;
use crate::probe::probe_compile;

/// Probes freshly spawned compile tasks right away so their own headers are
/// expanded before any dependent link task can be finalized.
///
/// The bridge never touches the scheduler's queue itself; it returns the
/// complete list of tasks to admit.
pub struct SchedulerBridge<'a, P: ReadinessProbe + ?Sized> {
    ctx: &'a mut BuildContext,
    base: &'a mut P,
}

impl<'a, P: ReadinessProbe + ?Sized> SchedulerBridge<'a, P> {
    /// Creates a bridge over the build's context and base probe.
    pub fn new(ctx: &'a mut BuildContext, base: &'a mut P) -> Self {
        Self { ctx, base }
    }

    /// Probes every task in `spawned`, and every task those probes spawn in
    /// turn, and returns all of them in discovery order.
    pub fn admit(
        &mut self,
        build: &mut Build,
        spawned: Vec<TaskId>,
    ) -> Result<Vec<TaskId>, BuildError> {
        let mut admitted = Vec::with_capacity(spawned.len());
        let mut pending: VecDeque<TaskId> = spawned.into();
        while let Some(task) = pending.pop_front() {
            admitted.push(task);
            self.ctx.stats.eager_probes += 1;
            let outcome = probe_compile(&mut *self.ctx, build, &mut *self.base, task)?;
            pending.extend(outcome.spawned);
        }
        if !admitted.is_empty() {
            tracing::debug!(tasks = admitted.len(), "admitting discovered tasks");
        }
        Ok(admitted)
    }
}
