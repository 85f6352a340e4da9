//! Header to implementation file resolution, memoized per header.

use std::collections::{BTreeMap, HashMap};

use autodep_build::{NodeId, NodeTree};

/// Header suffixes and the implementation suffixes tried for each, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderSuffixes {
    table: BTreeMap<String, Vec<String>>,
}

impl HeaderSuffixes {
    /// Creates a table from `header suffix -> candidate suffixes`.
    pub fn new(table: BTreeMap<String, Vec<String>>) -> Self {
        Self { table }
    }

    /// Returns the candidate implementation suffixes for a header suffix.
    pub fn candidates(&self, suffix: &str) -> Option<&[String]> {
        self.table.get(suffix).map(Vec::as_slice)
    }
}

impl Default for HeaderSuffixes {
    fn default() -> Self {
        Self::new(autodep_config::default_header_suffixes())
    }
}

/// Memo of "which implementation file, if any, belongs to this header".
///
/// Negative answers are cached too; a header without an implementation is
/// looked up on disk once per build no matter how many units include it.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    resolved: HashMap<NodeId, Option<NodeId>>,
    hits: usize,
    misses: usize,
}

impl ResolutionCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the implementation file for `header`.
    ///
    /// On a miss, the header's suffix selects the candidate suffixes; each is
    /// tried in order in the source-tree counterpart of the header's
    /// directory and the first existing file wins.
    pub fn resolve(
        &mut self,
        nodes: &NodeTree,
        suffixes: &HeaderSuffixes,
        header: NodeId,
    ) -> Option<NodeId> {
        if let Some(cached) = self.resolved.get(&header) {
            self.hits += 1;
            tracing::trace!(header = nodes.abspath(header), "resolution cache hit");
            return *cached;
        }
        self.misses += 1;
        let found = lookup(nodes, suffixes, header);
        self.resolved.insert(header, found);
        found
    }

    /// Returns the number of lookups answered from the cache.
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Returns the number of lookups that went to the file system.
    pub fn misses(&self) -> usize {
        self.misses
    }

    /// Returns the number of distinct headers resolved so far.
    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    /// Returns `true` if nothing was resolved yet.
    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }
}

fn lookup(nodes: &NodeTree, suffixes: &HeaderSuffixes, header: NodeId) -> Option<NodeId> {
    let suffix = nodes.suffix(header)?;
    let candidates = suffixes.candidates(suffix)?;
    let dir = nodes.parent(header)?;
    let name = nodes.name(header);
    let stem = &name[..name.len() - suffix.len()];
    candidates
        .iter()
        .find_map(|candidate| nodes.find_source(dir, &format!("{stem}{candidate}")))
}
