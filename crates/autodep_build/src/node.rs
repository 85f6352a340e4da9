//! File nodes: interned absolute paths split into a source and a build tree.

use std::fmt;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use autodep_common::{Interner, PathSym};
use serde::Serialize;

use crate::fs::FileSystem;

/// Identity of a file or directory in the build.
///
/// Two `NodeId`s are equal exactly when they name the same normalized
/// absolute path.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize)]
pub struct NodeId(PathSym);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0.as_raw())
    }
}

/// The source tree and the build (output) tree of one project.
///
/// Sources are looked up under `src_root`; objects and link outputs are
/// declared under `bld_root`. Existence checks go through the injected
/// [`FileSystem`].
pub struct NodeTree {
    src_root: PathBuf,
    bld_root: PathBuf,
    interner: Interner,
    fs: Arc<dyn FileSystem>,
}

impl NodeTree {
    /// Creates a node tree over the given roots.
    pub fn new(src_root: &Path, bld_root: &Path, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            src_root: normalize(src_root),
            bld_root: normalize(bld_root),
            interner: Interner::new(),
            fs,
        }
    }

    /// Returns the root of the source tree.
    pub fn src_root(&self) -> &Path {
        &self.src_root
    }

    /// Returns the root of the build tree.
    pub fn bld_root(&self) -> &Path {
        &self.bld_root
    }

    /// Returns the node for an absolute path, normalizing `.` and `..`.
    pub fn node(&self, path: &Path) -> NodeId {
        let normalized = normalize(path);
        NodeId(self.interner.intern(&normalized.to_string_lossy()))
    }

    /// Returns the node for a path relative to the source root.
    pub fn src_node(&self, rel: &str) -> NodeId {
        self.node(&self.src_root.join(rel))
    }

    /// Returns the absolute path of a node.
    pub fn path(&self, id: NodeId) -> &Path {
        Path::new(self.abspath(id))
    }

    /// Returns the absolute path of a node as a string; this is the canonical sort key.
    pub fn abspath(&self, id: NodeId) -> &str {
        self.interner.resolve(id.0)
    }

    /// Returns the path relative to whichever root contains the node.
    pub fn relative(&self, id: NodeId) -> String {
        let path = self.path(id);
        path.strip_prefix(&self.bld_root)
            .or_else(|_| path.strip_prefix(&self.src_root))
            .unwrap_or(path)
            .to_string_lossy()
            .into_owned()
    }

    /// Returns the final path component.
    pub fn name(&self, id: NodeId) -> &str {
        let path = self.abspath(id);
        path.rsplit('/').next().unwrap_or(path)
    }

    /// Returns the suffix of the file name from its last `.`, e.g. `".hpp"`.
    pub fn suffix(&self, id: NodeId) -> Option<&str> {
        let name = self.name(id);
        name.rfind('.').map(|dot| &name[dot..])
    }

    /// Returns the containing directory, or `None` for the file-system root.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.path(id).parent().map(|p| self.node(p))
    }

    /// Returns `true` if the node lies inside the build tree.
    pub fn is_build(&self, id: NodeId) -> bool {
        self.path(id).starts_with(&self.bld_root) && self.bld_root != self.src_root
    }

    /// Maps a build-tree node to its counterpart in the source tree.
    ///
    /// Nodes outside the build tree are returned unchanged.
    pub fn to_src(&self, id: NodeId) -> NodeId {
        if !self.is_build(id) {
            return id;
        }
        match self.path(id).strip_prefix(&self.bld_root) {
            Ok(rel) => self.node(&self.src_root.join(rel)),
            Err(_) => id,
        }
    }

    /// Returns `true` if the node exists as a file.
    pub fn exists(&self, id: NodeId) -> bool {
        self.fs.exists(self.path(id))
    }

    /// Reads the content of a file node.
    pub fn read(&self, id: NodeId) -> io::Result<String> {
        self.fs.read_to_string(self.path(id))
    }

    /// Looks up `name` (which may contain `/`) under `dir`.
    ///
    /// Returns the node only if the file exists. Nothing is declared for
    /// files that are absent.
    pub fn find_file(&self, dir: NodeId, name: &str) -> Option<NodeId> {
        let candidate = normalize(&self.path(dir).join(name));
        if self.fs.exists(&candidate) {
            Some(NodeId(self.interner.intern(&candidate.to_string_lossy())))
        } else {
            None
        }
    }

    /// Looks up `name` in the source-tree counterpart of `dir`.
    pub fn find_source(&self, dir: NodeId, name: &str) -> Option<NodeId> {
        self.find_file(self.to_src(dir), name)
    }

    /// Declares the object file for compiling `source` within `target`.
    ///
    /// Objects live under `<bld_root>/<target>/` mirroring the source layout,
    /// with `.o` appended to the full source name.
    pub fn object_for(&self, source: NodeId, target: &str) -> NodeId {
        let rel = self.relative(source);
        self.node(&self.bld_root.join(target).join(format!("{rel}.o")))
    }

    /// Declares an output file directly under the build root.
    pub fn build_node(&self, rel: &str) -> NodeId {
        self.node(&self.bld_root.join(rel))
    }
}

/// Lexically normalizes a path, dropping `.` and resolving `..` against
/// preceding components.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
