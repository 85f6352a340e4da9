//! `autodep graph`: the discovered unit graph as Graphviz DOT.

use petgraph::dot::{Config, Dot};
use petgraph::graph::DiGraph;

use crate::pipeline::{load_project, plan_build, select_targets};
use crate::{GlobalArgs, GraphArgs};

/// Runs the `autodep graph` command.
pub fn run(args: &GraphArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (project_dir, config) = load_project(global)?;
    let targets = select_targets(&config, args.target.as_deref())?;
    let planned = plan_build(&project_dir, &config, &targets)?;

    let graph = planned.ctx.entry_graph(&planned.build);
    if !global.quiet {
        eprintln!(
            "   Graph: {} unit(s), {} edge(s)",
            graph.node_count(),
            graph.edge_count()
        );
    }
    print!("{}", render_dot(&graph));
    Ok(0)
}

/// Renders the unit graph with source paths as labels and unlabelled edges.
pub fn render_dot(graph: &DiGraph<String, ()>) -> String {
    format!("{:?}", Dot::with_config(graph, &[Config::EdgeNoLabel]))
}
