//! Configuration types deserialized from `autodep.toml`.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// The top-level project configuration parsed from `autodep.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectConfig {
    /// Core project metadata.
    pub project: ProjectMeta,
    /// Dependency-discovery settings.
    #[serde(default)]
    pub autodep: AutodepConfig,
    /// Global flags applied to every target (`CXXFLAGS`, `INCLUDES`, ...).
    #[serde(default)]
    pub env: BTreeMap<String, FlagList>,
    /// Per-library flag sets, keyed by uselib tag.
    ///
    /// `[libs.X11] lib = ["X11"]` becomes the environment variable `LIB_X11`.
    #[serde(default)]
    pub libs: BTreeMap<String, BTreeMap<String, FlagList>>,
    /// Named build targets.
    #[serde(default)]
    pub targets: BTreeMap<String, TargetConfig>,
}

/// Core project metadata required in every `autodep.toml`.
#[derive(Debug, Deserialize)]
pub struct ProjectMeta {
    /// The project name.
    pub name: String,
    /// The project version string.
    #[serde(default)]
    pub version: String,
    /// Build output directory, relative to the project root.
    #[serde(default = "default_build_dir")]
    pub build_dir: String,
}

fn default_build_dir() -> String {
    "build".to_string()
}

/// Settings for header-driven dependency discovery.
#[derive(Debug, Deserialize)]
pub struct AutodepConfig {
    /// Header suffix to implementation suffixes, in probe priority order.
    #[serde(default = "default_header_suffixes")]
    pub header_suffixes: BTreeMap<String, Vec<String>>,
    /// Regular expressions for include spellings the scanner must not recurse into.
    #[serde(default = "default_shallow_scan")]
    pub shallow_scan: Vec<String>,
    /// When a unit's flags change, whether its signature is recomputed at once.
    #[serde(default)]
    pub signature: SignatureMode,
    /// Include path prefix to the uselib tags it implies.
    #[serde(default)]
    pub uselib: BTreeMap<String, Vec<String>>,
}

impl Default for AutodepConfig {
    fn default() -> Self {
        Self {
            header_suffixes: default_header_suffixes(),
            shallow_scan: default_shallow_scan(),
            signature: SignatureMode::default(),
            uselib: BTreeMap::new(),
        }
    }
}

/// The stock header table: `.hpp` pairs with C++ sources, `.h` with C first.
pub fn default_header_suffixes() -> BTreeMap<String, Vec<String>> {
    let mut map = BTreeMap::new();
    map.insert(
        ".hpp".to_string(),
        vec![".cpp".to_string(), ".cc".to_string()],
    );
    map.insert(
        ".h".to_string(),
        vec![".c".to_string(), ".cpp".to_string(), ".cc".to_string()],
    );
    map
}

fn default_shallow_scan() -> Vec<String> {
    vec!["^boost/".to_string(), "^chaos/".to_string()]
}

/// How a compiled unit's signature is refreshed after its flags are mutated.
#[derive(Debug, Default, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SignatureMode {
    /// Clear the signature and let execution recompute it.
    #[default]
    Lazy,
    /// Recompute the signature immediately in a second readiness probe.
    Eager,
}

/// Configuration for a single build target.
#[derive(Debug, Deserialize)]
pub struct TargetConfig {
    /// What the link step produces.
    #[serde(default)]
    pub kind: TargetKind,
    /// Entry-point sources, relative to the project root.
    #[serde(default)]
    pub sources: Vec<String>,
    /// Include directories searched by the scanner, relative to the project root.
    #[serde(default)]
    pub includes: Vec<String>,
    /// Uselib tags applied to every unit of the target up front.
    #[serde(default)]
    pub uselib: Vec<String>,
    /// Whether uselib tags are inferred from include paths.
    #[serde(default = "default_true")]
    pub infer_uselib: bool,
    /// Target-specific flags; each key replaces the global value.
    #[serde(default)]
    pub env: BTreeMap<String, FlagList>,
}

fn default_true() -> bool {
    true
}

/// Kind of artifact a target links.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// An executable.
    #[default]
    Program,
    /// A shared library.
    Shlib,
    /// A static archive.
    Stlib,
    /// Object files only, no link step.
    Objects,
}

impl TargetKind {
    /// Returns `true` if targets of this kind have a link task.
    pub fn links(self) -> bool {
        !matches!(self, TargetKind::Objects)
    }
}

/// A flag value that may be written as a single string or a list of strings.
///
/// Allows both `CXXFLAGS = "-O2"` and `CXXFLAGS = ["-O2", "-g"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagList(pub Vec<String>);

impl FlagList {
    /// Returns the flags as a slice.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl<'de> Deserialize<'de> for FlagList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct StringOrVec;

        impl<'de> Visitor<'de> for StringOrVec {
            type Value = FlagList;

            fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                formatter.write_str("a string or a list of strings")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(FlagList(vec![v.to_string()]))
            }

            fn visit_seq<A: de::SeqAccess<'de>>(
                self,
                mut seq: A,
            ) -> Result<Self::Value, A::Error> {
                let mut vec = Vec::new();
                while let Some(val) = seq.next_element::<String>()? {
                    vec.push(val);
                }
                Ok(FlagList(vec))
            }
        }

        deserializer.deserialize_any(StringOrVec)
    }
}
