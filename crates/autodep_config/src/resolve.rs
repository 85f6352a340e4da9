//! Target resolution: flattening global, library and target settings.

use crate::error::ConfigError;
use crate::types::{ProjectConfig, TargetKind};
use std::collections::BTreeMap;

/// A fully resolved target with every flag source merged into one environment.
#[derive(Debug, Clone)]
pub struct ResolvedTarget {
    /// The target name.
    pub name: String,
    /// What the link step produces.
    pub kind: TargetKind,
    /// Entry-point sources, relative to the project root.
    pub sources: Vec<String>,
    /// Include directories, relative to the project root.
    pub includes: Vec<String>,
    /// Uselib tags requested explicitly by the target.
    pub uselib: Vec<String>,
    /// Flat environment: global `[env]`, `[libs]` expansions, then target overrides.
    pub env: BTreeMap<String, Vec<String>>,
    /// Prefix-to-tags map for uselib inference, `None` when inference is disabled.
    pub uselib_map: Option<BTreeMap<String, Vec<String>>>,
}

/// Resolves a named target.
///
/// The environment is built in three layers. Global `[env]` entries form the
/// base. Each `[libs.<TAG>]` key `k` is added as `K_<TAG>`. Target `env` keys
/// then replace whatever the lower layers set for the same variable.
pub fn resolve_target(
    config: &ProjectConfig,
    target_name: &str,
) -> Result<ResolvedTarget, ConfigError> {
    let target = config
        .targets
        .get(target_name)
        .ok_or_else(|| ConfigError::UnknownTarget(target_name.to_string()))?;

    let mut env: BTreeMap<String, Vec<String>> = config
        .env
        .iter()
        .map(|(k, v)| (k.clone(), v.0.clone()))
        .collect();

    for (tag, vars) in &config.libs {
        for (var, values) in vars {
            env.insert(
                format!("{}_{tag}", var.to_ascii_uppercase()),
                values.0.clone(),
            );
        }
    }

    for (var, values) in &target.env {
        env.insert(var.clone(), values.0.clone());
    }

    let uselib_map = (target.infer_uselib && !config.autodep.uselib.is_empty())
        .then(|| config.autodep.uselib.clone());

    Ok(ResolvedTarget {
        name: target_name.to_string(),
        kind: target.kind,
        sources: target.sources.clone(),
        includes: target.includes.clone(),
        uselib: target.uselib.clone(),
        env,
        uselib_map,
    })
}

/// Resolves every target in name order.
pub fn resolve_all(config: &ProjectConfig) -> Result<Vec<ResolvedTarget>, ConfigError> {
    config
        .targets
        .keys()
        .map(|name| resolve_target(config, name))
        .collect()
}
