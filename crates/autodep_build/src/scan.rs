//! `#include` scanner with a shallow-scan override.
//!
//! The scanner follows resolvable project headers recursively and reports
//! two lists per compiled unit: the resolved header nodes and the raw include
//! spellings it could not (or was told not to) resolve. Spellings matching a
//! shallow-scan pattern are recorded verbatim and never looked up, so large
//! third-party trees such as `boost/` are treated as opaque leaves.

use std::collections::{HashMap, HashSet, VecDeque};

use autodep_common::TaskId;
use regex::Regex;

use crate::error::BuildError;
use crate::node::{NodeId, NodeTree};

/// Dependencies observed for one compiled unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    /// Include spellings that were not resolved to a project file, in discovery order.
    pub raw_deps: Vec<String>,
    /// Resolved header nodes, transitively, in discovery order.
    pub node_deps: Vec<NodeId>,
}

/// Recursive include scanner.
pub struct Scanner {
    include_re: Regex,
    shallow: Option<Regex>,
}

impl Scanner {
    /// Creates a scanner that does not recurse into spellings matching any of `patterns`.
    pub fn new(patterns: &[String]) -> Result<Self, BuildError> {
        let include_re = Regex::new(r#"(?m)^[ \t]*#[ \t]*include[ \t]*[<"]([^>"\n]+)[>"]"#)
            .map_err(|e| BuildError::InvalidPattern(e.to_string()))?;
        let shallow = if patterns.is_empty() {
            None
        } else {
            let joined = patterns
                .iter()
                .map(|p| format!("(?:{p})"))
                .collect::<Vec<_>>()
                .join("|");
            let anchored = format!("^(?:{joined})");
            Some(Regex::new(&anchored).map_err(|e| BuildError::InvalidPattern(e.to_string()))?)
        };
        Ok(Self {
            include_re,
            shallow,
        })
    }

    /// Returns `true` if an include spelling falls under a shallow-scan prefix.
    ///
    /// Patterns are anchored at the start of the spelling.
    pub fn is_shallow(&self, spelling: &str) -> bool {
        self.shallow.as_ref().is_some_and(|re| re.is_match(spelling))
    }

    /// Scans `source` and every project header it reaches.
    ///
    /// Each include is looked up first in the including file's directory,
    /// then in `search_dirs` in order.
    pub fn scan(
        &self,
        nodes: &NodeTree,
        source: NodeId,
        search_dirs: &[NodeId],
    ) -> Result<ScanResult, BuildError> {
        let mut result = ScanResult::default();
        let mut visited: HashSet<NodeId> = HashSet::from([source]);
        let mut unresolved: HashSet<String> = HashSet::new();
        let mut queue = VecDeque::from([source]);

        while let Some(file) = queue.pop_front() {
            let text = nodes.read(file).map_err(|e| BuildError::Io {
                path: nodes.path(file).to_path_buf(),
                source: e,
            })?;
            let here = nodes.parent(file);

            for caps in self.include_re.captures_iter(&text) {
                let spelling = caps[1].trim();
                if self.is_shallow(spelling) {
                    if unresolved.insert(spelling.to_string()) {
                        result.raw_deps.push(spelling.to_string());
                    }
                    continue;
                }

                let found = here
                    .iter()
                    .chain(search_dirs)
                    .find_map(|dir| nodes.find_file(*dir, spelling));
                match found {
                    Some(header) => {
                        if visited.insert(header) {
                            result.node_deps.push(header);
                            queue.push_back(header);
                        }
                    }
                    None => {
                        if unresolved.insert(spelling.to_string()) {
                            result.raw_deps.push(spelling.to_string());
                        }
                    }
                }
            }
        }

        tracing::trace!(
            source = nodes.abspath(source),
            headers = result.node_deps.len(),
            raw = result.raw_deps.len(),
            "scanned includes"
        );
        Ok(result)
    }
}

/// Scan results for every compiled unit of the build, keyed by task.
#[derive(Debug, Default)]
pub struct DepStore {
    results: HashMap<TaskId, ScanResult>,
}

impl DepStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the scan result for a task.
    pub fn insert(&mut self, task: TaskId, result: ScanResult) {
        self.results.insert(task, result);
    }

    /// Returns `true` once the task has been scanned.
    pub fn is_scanned(&self, task: TaskId) -> bool {
        self.results.contains_key(&task)
    }

    /// Returns the raw include spellings of a task.
    pub fn raw_deps(&self, task: TaskId) -> &[String] {
        self.results
            .get(&task)
            .map(|r| r.raw_deps.as_slice())
            .unwrap_or(&[])
    }

    /// Returns the resolved header nodes of a task.
    pub fn node_deps(&self, task: TaskId) -> &[NodeId] {
        self.results
            .get(&task)
            .map(|r| r.node_deps.as_slice())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MemoryFs;
    use std::path::Path;
    use std::sync::Arc;

    fn tree(fs: MemoryFs) -> NodeTree {
        NodeTree::new(Path::new("/p"), Path::new("/p/build"), Arc::new(fs))
    }

    fn default_scanner() -> Scanner {
        Scanner::new(&["^boost/".to_string(), "^chaos/".to_string()]).unwrap()
    }

    #[test]
    fn resolves_local_and_search_path_headers() {
        let fs = MemoryFs::new()
            .with_file(
                "/p/wm/main.cpp",
                "#include \"wm.hpp\"\n#include <util/log.hpp>\n#include <X11/Xlib.h>\n",
            )
            .with_file("/p/wm/wm.hpp", "#pragma once\n")
            .with_file("/p/util/log.hpp", "  #  include <string>\n");
        let nodes = tree(fs);
        let scanner = default_scanner();
        let result = scanner
            .scan(&nodes, nodes.src_node("wm/main.cpp"), &[nodes.src_node(".")])
            .unwrap();

        assert_eq!(
            result.node_deps,
            vec![nodes.src_node("wm/wm.hpp"), nodes.src_node("util/log.hpp")]
        );
        assert_eq!(result.raw_deps, vec!["X11/Xlib.h", "string"]);
    }

    #[test]
    fn recursion_is_cycle_safe() {
        let fs = MemoryFs::new()
            .with_file("/p/a.cpp", "#include \"a.h\"\n")
            .with_file("/p/a.h", "#include \"b.h\"\n")
            .with_file("/p/b.h", "#include \"a.h\"\n");
        let nodes = tree(fs);
        let result = default_scanner()
            .scan(&nodes, nodes.src_node("a.cpp"), &[])
            .unwrap();
        assert_eq!(result.node_deps, vec![nodes.src_node("a.h"), nodes.src_node("b.h")]);
        assert!(result.raw_deps.is_empty());
    }

    #[test]
    fn shallow_prefix_is_not_resolved() {
        let fs = MemoryFs::new()
            .with_file("/p/main.cpp", "#include <boost/foo.hpp>\n")
            .with_file("/p/boost/foo.hpp", "#include <boost/bar.hpp>\n")
            .with_file("/p/boost/foo.cpp", "");
        let nodes = tree(fs);
        let scanner = default_scanner();
        let result = scanner
            .scan(&nodes, nodes.src_node("main.cpp"), &[nodes.src_node(".")])
            .unwrap();

        assert!(result.node_deps.is_empty());
        assert_eq!(result.raw_deps, vec!["boost/foo.hpp"]);
    }

    #[test]
    fn no_patterns_means_nothing_shallow() {
        let scanner = Scanner::new(&[]).unwrap();
        assert!(!scanner.is_shallow("boost/foo.hpp"));
    }

    #[test]
    fn patterns_match_from_the_start() {
        let scanner = Scanner::new(&["boost/".to_string(), "chaos/|pp/".to_string()]).unwrap();
        assert!(scanner.is_shallow("boost/foo.hpp"));
        assert!(scanner.is_shallow("pp/x.h"));
        assert!(!scanner.is_shallow("my/boost/x.h"));
        assert!(!scanner.is_shallow("lib/pp/x.h"));
    }

    #[test]
    fn duplicate_raw_spellings_recorded_once() {
        let fs = MemoryFs::new()
            .with_file("/p/main.cpp", "#include <vector>\n#include \"x.h\"\n")
            .with_file("/p/x.h", "#include <vector>\n");
        let nodes = tree(fs);
        let result = default_scanner()
            .scan(&nodes, nodes.src_node("main.cpp"), &[])
            .unwrap();
        assert_eq!(result.raw_deps, vec!["vector"]);
    }

    #[test]
    fn unreadable_source_is_io_error() {
        let nodes = tree(MemoryFs::new());
        let err = default_scanner()
            .scan(&nodes, nodes.src_node("missing.cpp"), &[])
            .unwrap_err();
        assert!(matches!(err, BuildError::Io { .. }));
    }

    #[test]
    fn dep_store_defaults_to_empty() {
        let mut store = DepStore::new();
        let task = TaskId::from_raw(0);
        assert!(!store.is_scanned(task));
        assert!(store.raw_deps(task).is_empty());
        store.insert(
            task,
            ScanResult {
                raw_deps: vec!["X11/Xlib.h".into()],
                node_deps: Vec::new(),
            },
        );
        assert!(store.is_scanned(task));
        assert_eq!(store.raw_deps(task), ["X11/Xlib.h"]);
    }
}
