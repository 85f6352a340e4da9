//! Pushing discovered objects and tags into link tasks.

use std::collections::BTreeSet;

use autodep_build::Build;
use autodep_common::TaskId;

/// Link-task variable holding the aggregated uselib tags, sorted.
pub const AUTODEP_USELIB: &str = "AUTODEP_USELIB";

/// Adds the objects of `objects` to every task in `links` and records `tags`.
///
/// An object not yet among a link task's inputs is appended and the link
/// task is ordered after its compile task. Inputs are then sorted by
/// absolute path and the tag list is extended without duplicates and
/// sorted. Link tasks whose inputs or tags changed lose their cached
/// signature. Returns the number of inputs added.
pub fn update_link_tasks(
    build: &mut Build,
    links: &BTreeSet<TaskId>,
    objects: &BTreeSet<TaskId>,
    tags: &BTreeSet<String>,
) -> usize {
    let mut added = 0;
    for &link in links {
        let mut changed = false;
        for &object in objects {
            let output = build.tasks.task(object).outputs[0];
            if build.tasks.task(link).inputs.contains(&output) {
                continue;
            }
            build.tasks.task_mut(link).inputs.push(output);
            build.tasks.set_run_after(link, object);
            added += 1;
            changed = true;
            tracing::debug!(link = %link, object = build.nodes.abspath(output), "added link input");
        }

        let nodes = &build.nodes;
        let task = build.tasks.task_mut(link);
        task.inputs
            .sort_by(|a, b| nodes.abspath(*a).cmp(nodes.abspath(*b)));
        if !tags.is_empty() {
            changed |= task.env.append_unique(AUTODEP_USELIB, tags.iter().cloned());
            task.env.sort_values(AUTODEP_USELIB);
        }
        if changed {
            task.signature = None;
        }
    }
    added
}
