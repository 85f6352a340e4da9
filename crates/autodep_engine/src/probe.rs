//! Readiness probes that wrap the host's base probe.
//!
//! A compile task moves through three phases on every probe call:
//!
//! * **Deferred**: the base probe says the task cannot run yet; nothing else
//!   happens.
//! * **Active**: the scan is available and the entry has not been handled.
//!   Uselib inference, graph expansion and link updates run once, and the
//!   unit's own flags may change.
//! * **Ready**: the answer handed back to the scheduler.
//!
//! Once an entry is handled, later probes skip straight to Ready. Only the
//! unit's direct flags are applied again, so every compile task of a shared
//! source gets them.

use std::collections::BTreeSet;

use autodep_build::{
    Build, BuildError, ProbeOutcome, Readiness, ReadinessProbe, COMPILE_VARS, LINK_VARS,
};
use autodep_common::{EntryId, TaskId};
use autodep_config::SignatureMode;

use crate::context::BuildContext;
use crate::entry::Direction;
use crate::expand::expand;
use crate::flags::propagate_uselib;
use crate::infer::infer_uselib;
use crate::link::{update_link_tasks, AUTODEP_USELIB};

/// Probes a compile task and runs dependency discovery for it.
///
/// Tasks created by the expansion are returned in
/// [`ProbeOutcome::spawned`]; they are not probed here.
pub fn probe_compile<P>(
    ctx: &mut BuildContext,
    build: &mut Build,
    base: &mut P,
    task: TaskId,
) -> Result<ProbeOutcome, BuildError>
where
    P: ReadinessProbe + ?Sized,
{
    if base.probe(build, task)? == Readiness::Deferred {
        return Ok(ProbeOutcome::new(Readiness::Deferred));
    }

    let lookup = ctx.entries.get_or_create(build, task);
    if lookup.created {
        ctx.stats.entries += 1;
    }
    let entry = lookup.id;

    if ctx.entries.entry(entry).handled {
        ctx.stats.gate_skips += 1;
        if lookup.new_link {
            repropagate(ctx, build, entry);
        }
        let direct = direct_tags(build, task, &mut BTreeSet::new());
        return apply_direct_flags(ctx, build, base, task, &direct, Vec::new());
    }
    ctx.entries.entry_mut(entry).handled = true;
    ctx.stats.expansions += 1;

    let direct = direct_tags(build, task, &mut ctx.entries.entry_mut(entry).inferred_uselib);

    let expansion = expand(ctx, build, entry, task);

    let parents = ctx.entries.related(entry, Direction::Parents);
    let links = ctx.entries.link_tasks(&parents);
    let tags = ctx.entries.entry(entry).inferred_uselib.clone();
    for parent in &parents {
        ctx.entries
            .entry_mut(*parent)
            .inferred_uselib
            .extend(tags.iter().cloned());
    }
    ctx.stats.link_inputs_added += update_link_tasks(build, &links, &expansion.object_tasks, &tags);

    tracing::debug!(
        task = %task,
        spawned = expansion.spawned.len(),
        objects = expansion.object_tasks.len(),
        tags = tags.len(),
        "expanded compiled unit"
    );

    apply_direct_flags(ctx, build, base, task, &direct, expansion.spawned)
}

/// Infers the tags of `task`'s own includes with its target's uselib map.
///
/// Returns the non-recursive set; `persistent` grows as a side effect.
fn direct_tags(build: &Build, task: TaskId, persistent: &mut BTreeSet<String>) -> BTreeSet<String> {
    match build.tasks.target_of(task).uselib_map.as_deref() {
        Some(map) => infer_uselib(map, build.deps.raw_deps(task), persistent),
        None => BTreeSet::new(),
    }
}

/// Applies direct tags to `task`'s compile flags and re-signs it when they changed.
fn apply_direct_flags<P>(
    ctx: &BuildContext,
    build: &mut Build,
    base: &mut P,
    task: TaskId,
    direct: &BTreeSet<String>,
    spawned: Vec<TaskId>,
) -> Result<ProbeOutcome, BuildError>
where
    P: ReadinessProbe + ?Sized,
{
    let mut outcome = ProbeOutcome {
        readiness: Readiness::Ready,
        spawned,
    };
    if propagate_uselib(build, task, direct, COMPILE_VARS) {
        build.clear_signature(task);
        if ctx.signature_mode == SignatureMode::Eager {
            outcome.readiness = base.probe(build, task)?;
        }
    }
    Ok(outcome)
}

/// Probes a link task and applies its aggregated tags to its link flags.
pub fn probe_link<P>(
    ctx: &BuildContext,
    build: &mut Build,
    base: &mut P,
    task: TaskId,
) -> Result<ProbeOutcome, BuildError>
where
    P: ReadinessProbe + ?Sized,
{
    let readiness = base.probe(build, task)?;
    if readiness == Readiness::Deferred {
        return Ok(ProbeOutcome::new(readiness));
    }

    let tags: BTreeSet<String> = build
        .tasks
        .task(task)
        .env
        .get(AUTODEP_USELIB)
        .iter()
        .cloned()
        .collect();
    if propagate_uselib(build, task, &tags, LINK_VARS) {
        build.clear_signature(task);
        if ctx.signature_mode == SignatureMode::Eager {
            return Ok(ProbeOutcome::new(base.probe(build, task)?));
        }
    }
    Ok(ProbeOutcome::new(readiness))
}

/// Pushes a handled entry's child closure into link tasks registered after
/// its expansion ran.
fn repropagate(ctx: &mut BuildContext, build: &mut Build, entry: EntryId) {
    let objects: BTreeSet<TaskId> = ctx
        .entries
        .related(entry, Direction::Children)
        .into_iter()
        .filter(|child| *child != entry)
        .map(|child| ctx.entries.entry(child).task)
        .collect();
    let links = ctx.entries.link_tasks(&ctx.entries.related(entry, Direction::Parents));
    let tags = ctx.entries.entry(entry).inferred_uselib.clone();
    ctx.stats.link_inputs_added += update_link_tasks(build, &links, &objects, &tags);
}
