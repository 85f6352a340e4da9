//! Graph expansion: turning resolved headers into compile tasks.

use std::collections::BTreeSet;

use autodep_build::{Build, TaskOrigin};
use autodep_common::{EntryId, TaskId};

use crate::context::BuildContext;
use crate::entry::Direction;

/// What one expansion produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expansion {
    /// Compile tasks whose objects belong in the related link tasks.
    pub object_tasks: BTreeSet<TaskId>,
    /// Compile tasks created by this expansion, in creation order.
    pub spawned: Vec<TaskId>,
}

/// Expands `entry` using the scan results of `task`.
///
/// For every resolved header with an implementation file, the file's entry
/// is looked up and linked as a child of `entry`. A missing entry is created
/// for the compile task `task`'s target already has for that file, or else
/// for a new compile task in that target. The child's whole child closure
/// contributes its compile tasks to the result and its inferred tags to
/// `entry`. Headers without an implementation file are skipped.
pub fn expand(ctx: &mut BuildContext, build: &mut Build, entry: EntryId, task: TaskId) -> Expansion {
    let target = build.tasks.task(task).target;
    let headers = build.deps.node_deps(task).to_vec();
    let mut expansion = Expansion::default();

    for header in headers {
        let Some(source) = ctx.resolution.resolve(&build.nodes, &ctx.suffixes, header) else {
            continue;
        };

        let declared = build
            .tasks
            .target(target)
            .compiled_tasks
            .iter()
            .copied()
            .find(|t| build.tasks.task(*t).inputs[0] == source);
        let child = match (ctx.entries.get(source), declared) {
            (Some(child), _) => child,
            (None, Some(existing)) => {
                let lookup = ctx.entries.get_or_create(build, existing);
                ctx.stats.entries += 1;
                lookup.id
            }
            (None, None) => {
                let spawned = build.new_compile_task(target, source, TaskOrigin::Discovered);
                let lookup = ctx.entries.get_or_create(build, spawned);
                ctx.stats.entries += 1;
                ctx.stats.tasks_spawned += 1;
                expansion.spawned.push(spawned);
                tracing::debug!(
                    source = build.nodes.abspath(source),
                    task = %spawned,
                    "discovered compiled unit"
                );
                lookup.id
            }
        };
        ctx.entries.link(entry, child);

        let mut tags = BTreeSet::new();
        for reached in ctx.entries.related(child, Direction::Children) {
            let reached = ctx.entries.entry(reached);
            expansion.object_tasks.insert(reached.task);
            tags.extend(reached.inferred_uselib.iter().cloned());
        }
        ctx.entries.entry_mut(entry).inferred_uselib.extend(tags);
    }

    expansion
}
