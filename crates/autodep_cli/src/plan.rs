//! `autodep plan`: dry build report.

use autodep_build::{Build, TaskOrigin, LINK_VARS};
use autodep_config::TargetKind;
use autodep_engine::{EngineStats, AUTODEP_USELIB};
use serde::Serialize;

use crate::pipeline::{load_project, plan_build, select_targets};
use crate::{GlobalArgs, PlanArgs, ReportFormat};

/// Report for one target.
#[derive(Debug, Serialize)]
pub struct TargetReport {
    /// Target name.
    pub name: String,
    /// Target kind.
    pub kind: TargetKind,
    /// Compile units in creation order.
    pub units: Vec<UnitReport>,
    /// The link step, if the target has one.
    pub link: Option<LinkReport>,
}

/// One compiled unit.
#[derive(Debug, Serialize)]
pub struct UnitReport {
    /// Source path relative to the project root.
    pub source: String,
    /// Object path relative to the build directory.
    pub object: String,
    /// `true` if the unit was found through an `#include`.
    pub discovered: bool,
}

/// One link step.
#[derive(Debug, Serialize)]
pub struct LinkReport {
    /// Output path relative to the build directory.
    pub output: String,
    /// Inputs in link order.
    pub inputs: Vec<String>,
    /// Aggregated uselib tags.
    pub uselib: Vec<String>,
    /// Link flags that ended up set.
    pub flags: Vec<(String, Vec<String>)>,
}

#[derive(Serialize)]
struct PlanReport<'a> {
    targets: &'a [TargetReport],
    stats: EngineStats,
}

/// Runs the `autodep plan` command.
pub fn run(args: &PlanArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (project_dir, config) = load_project(global)?;
    let targets = select_targets(&config, args.target.as_deref())?;

    if !global.quiet && args.format == ReportFormat::Text {
        eprintln!(
            "   Planning {} v{} ({} target(s))",
            config.project.name,
            config.project.version,
            targets.len()
        );
    }

    let planned = plan_build(&project_dir, &config, &targets)?;
    let reports = collect_reports(&planned.build);

    match args.format {
        ReportFormat::Text => {
            print!("{}", render_text(&reports));
            if !global.quiet {
                let stats = planned.ctx.stats();
                eprintln!(
                    "   Result: {} task(s) executed, {} discovered, {} probe(s)",
                    planned.report.executed.len(),
                    stats.tasks_spawned,
                    planned.report.probes
                );
            }
        }
        ReportFormat::Json => {
            let report = PlanReport {
                targets: &reports,
                stats: planned.ctx.stats(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(0)
}

/// Builds per-target reports from the finished build.
pub fn collect_reports(build: &Build) -> Vec<TargetReport> {
    build
        .tasks
        .targets()
        .map(|(_, target)| {
            let units = target
                .compiled_tasks
                .iter()
                .map(|t| {
                    let task = build.tasks.task(*t);
                    UnitReport {
                        source: build.nodes.relative(task.inputs[0]),
                        object: build.nodes.relative(task.outputs[0]),
                        discovered: task.origin == TaskOrigin::Discovered,
                    }
                })
                .collect();
            let link = target.link_task.map(|t| {
                let task = build.tasks.task(t);
                LinkReport {
                    output: build.nodes.relative(task.outputs[0]),
                    inputs: task.inputs.iter().map(|n| build.nodes.relative(*n)).collect(),
                    uselib: task.env.get(AUTODEP_USELIB).to_vec(),
                    flags: LINK_VARS
                        .iter()
                        .filter(|v| !task.env.get(v).is_empty())
                        .map(|v| (v.to_string(), task.env.get(v).to_vec()))
                        .collect(),
                }
            });
            TargetReport {
                name: target.name.clone(),
                kind: target.kind,
                units,
                link,
            }
        })
        .collect()
}

/// Renders reports as indented text.
pub fn render_text(reports: &[TargetReport]) -> String {
    let mut out = String::new();
    for report in reports {
        out.push_str(&format!("{} ({:?})\n", report.name, report.kind));
        for unit in &report.units {
            let mark = if unit.discovered { "+" } else { " " };
            out.push_str(&format!("  {mark} {} -> {}\n", unit.source, unit.object));
        }
        if let Some(link) = &report.link {
            out.push_str(&format!("  link {}\n", link.output));
            for input in &link.inputs {
                out.push_str(&format!("    {input}\n"));
            }
            if !link.uselib.is_empty() {
                out.push_str(&format!("    uselib: {}\n", link.uselib.join(" ")));
            }
            for (var, values) in &link.flags {
                out.push_str(&format!("    {var}: {}\n", values.join(" ")));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use autodep_build::{BaseProbe, DryRun, MemoryFs, Scanner, Scheduler};
    use autodep_config::{load_config_from_str, resolve_all};
    use autodep_engine::{AutodepDriver, BuildContext};
    use std::path::Path;
    use std::sync::Arc;

    fn planned() -> Build {
        let config = load_config_from_str(
            r#"
[project]
name = "wm"

[autodep.uselib]
"X11" = ["X11"]

[libs.X11]
lib = "X11"

[targets.wm]
sources = ["main.cpp"]
"#,
        )
        .unwrap();
        let fs = MemoryFs::new()
            .with_file("/p/main.cpp", "#include \"draw.h\"\n")
            .with_file("/p/draw.h", "")
            .with_file("/p/draw.cpp", "#include <X11/Xlib.h>\n");
        let mut build = Build::new(Path::new("/p"), Path::new("/p/build"), Arc::new(fs));
        for target in resolve_all(&config).unwrap() {
            build.add_target(&target).unwrap();
        }
        let mut driver = AutodepDriver::new(
            BaseProbe::new(Scanner::new(&[]).unwrap()),
            BuildContext::from_config(&config.autodep),
        );
        Scheduler::new()
            .run(&mut build, &mut driver, &mut DryRun::new())
            .unwrap();
        build
    }

    #[test]
    fn report_lists_units_and_link() {
        let reports = collect_reports(&planned());
        assert_eq!(reports.len(), 1);
        let wm = &reports[0];
        assert_eq!(wm.units.len(), 2);
        assert!(!wm.units[0].discovered);
        assert!(wm.units[1].discovered);
        assert_eq!(wm.units[1].source, "draw.cpp");

        let link = wm.link.as_ref().unwrap();
        assert_eq!(link.output, "wm");
        assert_eq!(link.inputs, vec!["wm/draw.cpp.o", "wm/main.cpp.o"]);
        assert_eq!(link.uselib, vec!["X11"]);
        assert_eq!(link.flags, vec![("LIB".to_string(), vec!["X11".to_string()])]);
    }

    #[test]
    fn text_marks_discovered_units() {
        let text = render_text(&collect_reports(&planned()));
        assert!(text.contains("  + draw.cpp -> wm/draw.cpp.o\n"));
        assert!(text.contains("    main.cpp -> wm/main.cpp.o\n"));
        assert!(text.contains("    uselib: X11\n"));
        assert!(text.contains("    LIB: X11\n"));
    }

    #[test]
    fn json_uses_lowercase_kind() {
        let reports = collect_reports(&planned());
        let json = serde_json::to_value(&reports).unwrap();
        assert_eq!(json[0]["kind"], "program");
        assert_eq!(json[0]["link"]["inputs"][1], "wm/main.cpp.o");
    }
}
