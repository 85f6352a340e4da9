//! Per-build engine state.

use autodep_build::Build;
use autodep_config::{AutodepConfig, SignatureMode};
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;

use crate::entry::EntryCache;
use crate::resolve::{HeaderSuffixes, ResolutionCache};

/// Counters describing what the engine did during one build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EngineStats {
    /// Cache entries created.
    pub entries: usize,
    /// Compile tasks created from discovered implementation files.
    pub tasks_spawned: usize,
    /// Full expansions run, at most one per entry.
    pub expansions: usize,
    /// Probes answered by the `handled` gate without expanding.
    pub gate_skips: usize,
    /// Objects appended to link task inputs.
    pub link_inputs_added: usize,
    /// Probes issued eagerly for spawned tasks.
    pub eager_probes: usize,
    /// Header resolutions answered from the cache.
    pub resolution_hits: usize,
    /// Header resolutions that touched the file system.
    pub resolution_misses: usize,
}

/// Everything the engine keeps for the lifetime of one build run.
///
/// Created before the scheduler starts and dropped with the build; nothing
/// here is global.
#[derive(Debug, Default)]
pub struct BuildContext {
    /// One entry per compiled unit seen so far.
    pub entries: EntryCache,
    /// Header to implementation file memo.
    pub resolution: ResolutionCache,
    /// Candidate implementation suffixes per header suffix.
    pub suffixes: HeaderSuffixes,
    /// Whether mutated flags recompute the signature in a second probe.
    pub signature_mode: SignatureMode,
    pub(crate) stats: EngineStats,
}

impl BuildContext {
    /// Creates a context with the stock header table and lazy signatures.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context from the `[autodep]` section of the project file.
    pub fn from_config(config: &AutodepConfig) -> Self {
        Self {
            suffixes: HeaderSuffixes::new(config.header_suffixes.clone()),
            signature_mode: config.signature,
            ..Self::default()
        }
    }

    /// Sets the signature mode.
    pub fn with_signature_mode(mut self, mode: SignatureMode) -> Self {
        self.signature_mode = mode;
        self
    }

    /// Returns the counters so far.
    pub fn stats(&self) -> EngineStats {
        EngineStats {
            resolution_hits: self.resolution.hits(),
            resolution_misses: self.resolution.misses(),
            ..self.stats
        }
    }

    /// Returns the entry graph: one node per entry labelled with its source
    /// path, one edge per distinct parent-to-child link.
    pub fn entry_graph(&self, build: &Build) -> DiGraph<String, ()> {
        let mut graph = DiGraph::new();
        let nodes: Vec<NodeIndex> = self
            .entries
            .iter()
            .map(|(_, entry)| graph.add_node(build.nodes.relative(entry.source)))
            .collect();
        for (id, entry) in self.entries.iter() {
            for child in &entry.child_entries {
                graph.update_edge(
                    nodes[id.as_raw() as usize],
                    nodes[child.as_raw() as usize],
                    (),
                );
            }
        }
        graph
    }
}
