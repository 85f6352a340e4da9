//! Shared pipeline for CLI commands: project discovery and the dry build.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use autodep_build::{BaseProbe, Build, DiskFs, DryRun, ScheduleReport, Scheduler, Scanner};
use autodep_config::{ProjectConfig, ResolvedTarget, CONFIG_FILE};
use autodep_engine::{AutodepDriver, BuildContext};

use crate::GlobalArgs;

/// Walks up from `start` looking for the nearest directory containing `autodep.toml`.
pub fn find_project_root(start: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "could not find {CONFIG_FILE} in {} or any parent directory",
                start.display()
            )
            .into());
        }
    }
}

/// Locates and loads the project selected by the global CLI args.
///
/// `--config` may name a configuration file, which is loaded as is with its
/// parent directory as the project root, or a project directory containing
/// `autodep.toml`. Without it, the root is found by walking up from the
/// current directory.
pub fn load_project(
    global: &GlobalArgs,
) -> Result<(PathBuf, ProjectConfig), Box<dyn std::error::Error>> {
    let Some(ref config_path) = global.config else {
        let root = find_project_root(&std::env::current_dir()?)?;
        let config = autodep_config::load_config(&root)?;
        return Ok((root, config));
    };
    let path = PathBuf::from(config_path);
    if path.is_dir() {
        let config = autodep_config::load_config(&path)?;
        return Ok((path, config));
    }
    let config = autodep_config::load_config_file(&path)?;
    let root = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((root, config))
}

/// Resolves the selected target, or every target in name order.
pub fn select_targets(
    config: &ProjectConfig,
    target: Option<&str>,
) -> Result<Vec<ResolvedTarget>, Box<dyn std::error::Error>> {
    Ok(match target {
        Some(name) => vec![autodep_config::resolve_target(config, name)?],
        None => autodep_config::resolve_all(config)?,
    })
}

/// The state after a dry build.
pub struct Planned {
    /// Tasks, nodes and scan results.
    pub build: Build,
    /// Engine state, including the entry cache.
    pub ctx: BuildContext,
    /// Execution log.
    pub log: DryRun,
    /// Scheduler summary.
    pub report: ScheduleReport,
}

/// Creates the targets' tasks and runs them through the scheduler without
/// executing anything.
pub fn plan_build(
    project_dir: &Path,
    config: &ProjectConfig,
    targets: &[ResolvedTarget],
) -> Result<Planned, Box<dyn std::error::Error>> {
    let mut build = Build::new(
        project_dir,
        &project_dir.join(&config.project.build_dir),
        Arc::new(DiskFs),
    );
    for target in targets {
        build.add_target(target)?;
    }

    let scanner = Scanner::new(&config.autodep.shallow_scan)?;
    let mut driver = AutodepDriver::new(
        BaseProbe::new(scanner),
        BuildContext::from_config(&config.autodep),
    );
    let mut log = DryRun::new();
    let report = Scheduler::new().run(&mut build, &mut driver, &mut log)?;
    tracing::debug!(stats = ?driver.context().stats(), "engine finished");

    Ok(Planned {
        build,
        ctx: driver.into_context(),
        log,
        report,
    })
}
