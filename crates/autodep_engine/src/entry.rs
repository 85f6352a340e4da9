//! The entry cache: one record per distinct compiled unit of the build.

use std::collections::{BTreeSet, HashMap};

use autodep_build::{Build, NodeId};
use autodep_common::{Arena, EntryId, TaskId};

/// Bookkeeping for one compiled unit, keyed by its source file.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The compile task that first claimed this source.
    pub task: TaskId,
    /// The compiled source file.
    pub source: NodeId,
    /// Entries whose units include a header implemented by this one.
    pub parent_entries: BTreeSet<EntryId>,
    /// Entries discovered from this unit's headers. May repeat.
    pub child_entries: Vec<EntryId>,
    /// Link tasks that consume this unit's object directly.
    pub link_tasks: BTreeSet<TaskId>,
    /// Tags inferred for this unit and everything it transitively includes.
    pub inferred_uselib: BTreeSet<String>,
    /// Set once expansion ran for this entry. Never reset.
    pub handled: bool,
}

/// Which edges [`EntryCache::related`] follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards the units that include this one.
    Parents,
    /// Towards the units this one includes.
    Children,
}

/// Result of [`EntryCache::get_or_create`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lookup {
    /// The entry for the task's source.
    pub id: EntryId,
    /// `true` if the entry was created by this call.
    pub created: bool,
    /// `true` if the task's link task was not yet registered on the entry.
    pub new_link: bool,
}

/// Arena of cache entries with a source-file index.
///
/// Edges between entries are stored as [`EntryId`]s, so cyclic include
/// graphs are plain data.
#[derive(Debug, Default)]
pub struct EntryCache {
    entries: Arena<EntryId, CacheEntry>,
    by_source: HashMap<NodeId, EntryId>,
}

impl EntryCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry for a source file, if one exists.
    pub fn get(&self, source: NodeId) -> Option<EntryId> {
        self.by_source.get(&source).copied()
    }

    /// Returns the entry for a compile task's primary input, creating it if needed.
    ///
    /// The link task of the task's target is registered on the entry either
    /// way, so a source shared by two targets feeds both link steps.
    pub fn get_or_create(&mut self, build: &Build, task: TaskId) -> Lookup {
        let source = build.tasks.task(task).inputs[0];
        let link = build.tasks.target_of(task).link_task;

        if let Some(id) = self.get(source) {
            let new_link = match link {
                Some(link) => self.entries[id].link_tasks.insert(link),
                None => false,
            };
            return Lookup {
                id,
                created: false,
                new_link,
            };
        }

        let id = self.entries.alloc(CacheEntry {
            task,
            source,
            parent_entries: BTreeSet::new(),
            child_entries: Vec::new(),
            link_tasks: link.into_iter().collect(),
            inferred_uselib: BTreeSet::new(),
            handled: false,
        });
        self.by_source.insert(source, id);
        Lookup {
            id,
            created: true,
            new_link: link.is_some(),
        }
    }

    /// Records that `parent` includes a header implemented by `child`.
    pub fn link(&mut self, parent: EntryId, child: EntryId) {
        self.entries[child].parent_entries.insert(parent);
        self.entries[parent].child_entries.push(child);
    }

    /// Returns `start` and every entry reachable from it along `direction`.
    ///
    /// Uses a closed set, so cycles terminate and each entry appears once.
    pub fn related(&self, start: EntryId, direction: Direction) -> BTreeSet<EntryId> {
        let mut closed = BTreeSet::new();
        let mut open = vec![start];
        while let Some(id) = open.pop() {
            if !closed.insert(id) {
                continue;
            }
            let entry = &self.entries[id];
            match direction {
                Direction::Parents => open.extend(entry.parent_entries.iter().copied()),
                Direction::Children => open.extend(entry.child_entries.iter().copied()),
            }
        }
        closed
    }

    /// Returns the union of the link tasks of `ids`.
    pub fn link_tasks<'a, I>(&self, ids: I) -> BTreeSet<TaskId>
    where
        I: IntoIterator<Item = &'a EntryId>,
    {
        ids.into_iter()
            .flat_map(|id| self.entries[*id].link_tasks.iter().copied())
            .collect()
    }

    /// Returns an entry.
    pub fn entry(&self, id: EntryId) -> &CacheEntry {
        &self.entries[id]
    }

    /// Returns an entry mutably.
    pub fn entry_mut(&mut self, id: EntryId) -> &mut CacheEntry {
        &mut self.entries[id]
    }

    /// Iterates over all entries in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (EntryId, &CacheEntry)> {
        self.entries.iter()
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no unit was seen yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
