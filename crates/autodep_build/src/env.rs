//! Per-task key-value flag environment.

use std::collections::BTreeMap;

use serde::Serialize;

/// Variables that only affect compiling a single translation unit.
pub const COMPILE_VARS: &[&str] = &[
    "INCLUDES",
    "DEFINES",
    "CPPFLAGS",
    "CFLAGS",
    "CXXFLAGS",
    "FRAMEWORKPATH",
    "ARCH",
];

/// Variables that affect the link step of a whole binary.
pub const LINK_VARS: &[&str] = &[
    "LIB",
    "LIBPATH",
    "STLIB",
    "STLIBPATH",
    "LINKFLAGS",
    "RPATH",
    "FRAMEWORK",
    "ARCH",
];

/// An ordered map from variable name to a list of string values.
///
/// Every task owns its own `Env`, derived from its target's at creation, so
/// mutating one unit's flags never leaks into a sibling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Env {
    vars: BTreeMap<String, Vec<String>>,
}

impl Env {
    /// Creates an empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an environment from an existing map.
    pub fn from_map(vars: BTreeMap<String, Vec<String>>) -> Self {
        Self { vars }
    }

    /// Returns the values of `key`, or an empty slice if unset.
    pub fn get(&self, key: &str) -> &[String] {
        self.vars.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns `true` if `key` is set, even to an empty list.
    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    /// Replaces the values of `key`.
    pub fn set(&mut self, key: &str, values: Vec<String>) {
        self.vars.insert(key.to_string(), values);
    }

    /// Appends each value to `key` unless it is already present.
    ///
    /// Returns `true` if anything was added.
    pub fn append_unique<I, S>(&mut self, key: &str, values: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let list = self.vars.entry(key.to_string()).or_default();
        let mut changed = false;
        for value in values {
            let value = value.into();
            if !list.contains(&value) {
                list.push(value);
                changed = true;
            }
        }
        changed
    }

    /// Sorts the values of `key` in place.
    pub fn sort_values(&mut self, key: &str) {
        if let Some(list) = self.vars.get_mut(key) {
            list.sort();
        }
    }

    /// Iterates over `(name, values)` in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

/// Applies uselib tags to an environment.
///
/// For every tag `T` and every variable `V` in `vars`, the values of `V_T` are
/// appended to `V` without duplicates. Returns `true` if any variable changed.
pub fn apply_uselib<'a, I>(env: &mut Env, tags: I, vars: &[&str]) -> bool
where
    I: IntoIterator<Item = &'a String>,
{
    let mut changed = false;
    for tag in tags {
        for var in vars {
            let values = env.get(&format!("{var}_{tag}")).to_vec();
            if !values.is_empty() {
                changed |= env.append_unique(var, values);
            }
        }
    }
    changed
}
