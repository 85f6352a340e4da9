//! Applying uselib tags to a task's own flags.

use std::collections::BTreeSet;

use autodep_build::{apply_uselib, Build, TaskKind};
use autodep_common::TaskId;

/// Appends the `VAR_<TAG>` values of every tag to the task's `VAR`s.
///
/// Only the task's private environment is touched. For compile tasks the
/// include search paths are recomputed afterwards. Returns `true` if any
/// variable changed; the caller decides what happens to the signature.
pub fn propagate_uselib(
    build: &mut Build,
    task: TaskId,
    tags: &BTreeSet<String>,
    vars: &[&str],
) -> bool {
    let changed = apply_uselib(&mut build.tasks.task_mut(task).env, tags, vars);
    if changed && build.tasks.task(task).kind == TaskKind::Compile {
        build.refresh_incpaths(task);
    }
    if changed {
        tracing::debug!(task = %task, tags = tags.len(), "propagated uselib flags");
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use autodep_build::{MemoryFs, COMPILE_VARS, LINK_VARS};
    use autodep_config::{ResolvedTarget, TargetKind};
    use std::collections::BTreeMap;
    use std::path::Path;
    use std::sync::Arc;

    fn build() -> (Build, TaskId, TaskId) {
        let fs = MemoryFs::new()
            .with_file("/p/a.cpp", "")
            .with_file("/p/b.cpp", "");
        let mut b = Build::new(Path::new("/p"), Path::new("/p/build"), Arc::new(fs));
        let mut env = BTreeMap::new();
        env.insert("INCLUDES_X11".to_string(), vec!["/usr/include/X11".to_string()]);
        env.insert("LIB_X11".to_string(), vec!["X11".to_string()]);
        let g = b
            .add_target(&ResolvedTarget {
                name: "wm".into(),
                kind: TargetKind::Program,
                sources: vec!["a.cpp".into(), "b.cpp".into()],
                includes: vec![".".into()],
                uselib: Vec::new(),
                env,
                uselib_map: None,
            })
            .unwrap();
        let t = b.tasks.target(g);
        let (t0, t1) = (t.compiled_tasks[0], t.compiled_tasks[1]);
        (b, t0, t1)
    }

    #[test]
    fn compile_vars_reach_incpaths() {
        let (mut b, a, _) = build();
        let tags = BTreeSet::from(["X11".to_string()]);
        assert!(propagate_uselib(&mut b, a, &tags, COMPILE_VARS));
        assert_eq!(b.tasks.task(a).env.get("INCPATHS"), ["/p", "/usr/include/X11"]);
        assert!(b.tasks.task(a).env.get("LIB").is_empty());
        assert!(!propagate_uselib(&mut b, a, &tags, COMPILE_VARS));
    }

    #[test]
    fn siblings_are_untouched() {
        let (mut b, a, sibling) = build();
        let tags = BTreeSet::from(["X11".to_string()]);
        propagate_uselib(&mut b, a, &tags, COMPILE_VARS);
        propagate_uselib(&mut b, a, &tags, LINK_VARS);
        assert!(b.tasks.task(sibling).env.get("INCLUDES").is_empty());
        assert!(b.tasks.task(sibling).env.get("LIB").is_empty());
        assert_eq!(b.tasks.task(sibling).env.get("INCPATHS"), ["/p"]);
    }

    #[test]
    fn unknown_tag_changes_nothing() {
        let (mut b, a, _) = build();
        let tags = BTreeSet::from(["GTK".to_string()]);
        assert!(!propagate_uselib(&mut b, a, &tags, COMPILE_VARS));
    }
}
