//! Script rendering and writing.

use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::debug;

use jute_dag::{ordering_title, BlockDag, NodeId, WeightedEdge, TITLE_SEPARATOR};

use crate::config::SageConfig;
use crate::error::ExportResult;

/// Render a SageMath script for weighted edges and an order.
///
/// The plot title is the order joined with `-`; the saved PNG is named
/// after it.
pub fn render(edges: &[WeightedEdge], order: &[NodeId], config: &SageConfig) -> String {
    let title = ordering_title(order, TITLE_SEPARATOR);
    let (width, height) = config.figsize;

    let mut script = String::from("G = DiGraph()\n");
    for edge in edges {
        script.push_str(&format!(
            "G.add_edge({}, {}, {})\n",
            edge.parent, edge.child, edge.weight
        ));
    }
    script.push_str(&format!(
        "H = G.plot(edge_labels=True, layout='{}', edge_color='{}')\n",
        config.layout, config.edge_color
    ));
    if config.show {
        script.push_str(&format!(
            "H.show(title=\"{title}\", figsize=({width},{height}))\n"
        ));
    }
    if config.save {
        let file = config.plot_dir.join(format!("{title}.png"));
        script.push_str(&format!(
            "H.save(filename=\"{}\", title=\"{title}\", figsize=({width},{height}))\n",
            file.display()
        ));
    }
    script
}

/// Compute votes and order for `tip` and render them.
pub fn render_tip(dag: &BlockDag, tip: NodeId, config: &SageConfig) -> ExportResult<String> {
    let votes = dag.compute_votes(tip)?;
    let order = dag.linear_order_with(&votes)?;
    debug!(tip = %tip, edges = votes.weights().len(), "rendering sage script");
    Ok(render(&votes.triples(), &order, config))
}

/// Write a rendered script to `out`.
pub fn write_script<W: Write>(out: &mut W, script: &str) -> ExportResult<()> {
    out.write_all(script.as_bytes())?;
    out.flush()?;
    Ok(())
}

/// Write a rendered script to a file, creating parent directories.
pub fn write_script_file(path: &Path, script: &str) -> ExportResult<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, script)?;
    debug!(path = %path.display(), bytes = script.len(), "wrote sage script");
    Ok(())
}
