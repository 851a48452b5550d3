use std::io;

use anyhow::{anyhow, bail, Context};
use colored::Colorize;
use serde_json::json;
use tracing::info;

use jute_dag::{ordering_title, BlockDag, NodeId, TITLE_SEPARATOR};
use jute_sage::{render_tip, write_script, write_script_file, SageConfig};

use crate::cli::*;
use crate::config::CliConfig;
use crate::topologies::{Topology, TOPOLOGIES};

pub fn run_command(cli: Cli, config: &CliConfig) -> anyhow::Result<()> {
    match cli.command {
        Command::List => {
            print!("{}", cmd_list(&cli.format)?);
            Ok(())
        }
        Command::Votes(args) => {
            print!("{}", cmd_votes(&args.topology, args.tip, &cli.format)?);
            Ok(())
        }
        Command::Order(args) => {
            print!("{}", cmd_order(&args.topology, args.tip, &cli.format)?);
            Ok(())
        }
        Command::Sage(args) => {
            let script = cmd_sage(&args.topology, args.tip, &config.sage)?;
            match &args.out {
                Some(path) => {
                    write_script_file(path, &script)
                        .with_context(|| format!("writing {}", path.display()))?;
                    info!(path = %path.display(), "wrote sage script");
                    println!("{} Wrote {}", "✓".green().bold(), path.display().to_string().bold());
                }
                None => write_script(&mut io::stdout().lock(), &script)?,
            }
            Ok(())
        }
    }
}

fn lookup(name: &str) -> anyhow::Result<&'static Topology> {
    Topology::find(name).ok_or_else(|| {
        let known: Vec<&str> = TOPOLOGIES.iter().map(|t| t.name).collect();
        anyhow!("unknown topology {name:?} (known: {})", known.join(", "))
    })
}

fn build(topology: &Topology) -> anyhow::Result<(BlockDag, NodeId)> {
    (topology.build)().with_context(|| format!("building {}", topology.name))
}

/// Build `topology` and pick its tip: the last node, or `tip` if given.
fn build_at(topology: &Topology, tip: Option<u64>) -> anyhow::Result<(BlockDag, NodeId)> {
    let (dag, last) = build(topology)?;
    let Some(raw) = tip else {
        return Ok((dag, last));
    };
    let id = NodeId::new(raw);
    if !dag.contains(id) {
        bail!("{} has no node {raw} (it has {} nodes)", topology.name, dag.len());
    }
    Ok((dag, id))
}

fn cmd_list(format: &OutputFormat) -> anyhow::Result<String> {
    let mut rows = Vec::with_capacity(TOPOLOGIES.len());
    for topology in TOPOLOGIES {
        let (dag, tip) = build(topology)?;
        rows.push((topology, dag.len(), tip));
    }
    Ok(match format {
        OutputFormat::Json => {
            let list: Vec<_> = rows
                .iter()
                .map(|(t, nodes, tip)| json!({ "name": t.name, "title": t.title, "nodes": nodes, "tip": tip }))
                .collect();
            format!("{}\n", serde_json::to_string_pretty(&list)?)
        }
        OutputFormat::Text => rows
            .iter()
            .map(|(t, nodes, tip)| {
                format!("{:<24} {:>3} nodes  tip {}  {}\n", t.name.bold(), nodes, tip, t.title.dimmed())
            })
            .collect(),
    })
}

fn cmd_votes(name: &str, tip: Option<u64>, format: &OutputFormat) -> anyhow::Result<String> {
    let topology = lookup(name)?;
    let (dag, tip) = build_at(topology, tip)?;
    let votes = dag.compute_votes(tip)?;
    Ok(match format {
        OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(&votes)?),
        OutputFormat::Text => {
            let mut out = format!(
                "{} (tip {}, {} ancestors)\n",
                topology.title.bold(),
                tip.to_string().yellow(),
                votes.ancestors().len()
            );
            for edge in votes.triples() {
                out.push_str(&format!(
                    "  {} → {}  weight {}\n",
                    edge.parent,
                    edge.child,
                    edge.weight.to_string().cyan()
                ));
            }
            out.push_str("Reachable:\n");
            for &id in votes.ancestors() {
                out.push_str(&format!("  {}: {}\n", id, votes.reach(id).unwrap_or(0)));
            }
            out
        }
    })
}

fn cmd_order(name: &str, tip: Option<u64>, format: &OutputFormat) -> anyhow::Result<String> {
    let topology = lookup(name)?;
    let (dag, tip) = build_at(topology, tip)?;
    let order = dag.linear_order(tip)?;
    let title = ordering_title(&order, TITLE_SEPARATOR);
    Ok(match format {
        OutputFormat::Json => format!(
            "{}\n",
            serde_json::to_string_pretty(&json!({
                "topology": topology.name,
                "tip": tip,
                "order": order,
                "title": title,
            }))?
        ),
        OutputFormat::Text => format!("{}: {}\n", topology.title.bold(), title.green()),
    })
}

/// Scripts under `# <title>` headers.
///
/// A topology renders its snapshots first and then its final tip, unless a
/// single `tip` is requested.
fn cmd_sage(name: &str, tip: Option<u64>, config: &SageConfig) -> anyhow::Result<String> {
    if name != "all" {
        return sage_topology(lookup(name)?, tip, config);
    }
    if tip.is_some() {
        bail!("--tip needs a single topology, not `all`");
    }
    let mut out = String::new();
    for topology in TOPOLOGIES {
        out.push_str(&sage_topology(topology, None, config)?);
    }
    Ok(out)
}

fn sage_topology(
    topology: &Topology,
    tip: Option<u64>,
    config: &SageConfig,
) -> anyhow::Result<String> {
    let (dag, chosen) = build_at(topology, tip)?;
    let mut out = String::new();
    if let Some(raw) = tip {
        let script = render_tip(&dag, chosen, config)?;
        out.push_str(&format!("\n# {} at {raw}\n{script}", topology.title));
        return Ok(out);
    }
    for snapshot in topology.snapshots {
        let script = render_tip(&dag, NodeId::new(snapshot.tip), config)?;
        out.push_str(&format!("\n# {} {}\n{script}", topology.title, snapshot.label));
    }
    let script = render_tip(&dag, chosen, config)?;
    out.push_str(&format!("\n# {}\n{script}", topology.title));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_topology_lists_known_names() {
        let err = cmd_order("hexagon", None, &OutputFormat::Text).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("hexagon"));
        assert!(msg.contains("diamond"));
    }

    #[test]
    fn order_json_has_title() {
        let out = cmd_order("pentagon", None, &OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["topology"], "pentagon");
        assert_eq!(value["tip"], 4);
        assert_eq!(value["title"], "0-1-3-2-4");
        assert_eq!(value["order"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn votes_json_matches_pentagon_weights() {
        let out = cmd_votes("pentagon", None, &OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        let weights = value["weights"].as_array().unwrap();
        assert_eq!(weights.len(), 5);
        assert_eq!(weights[0], json!({ "parent": 0, "child": 1, "weight": 2 }));
        assert_eq!(weights[1], json!({ "parent": 0, "child": 2, "weight": 1 }));
    }

    #[test]
    fn list_json_covers_all_topologies() {
        let out = cmd_list(&OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value.as_array().unwrap().len(), TOPOLOGIES.len());
    }

    #[test]
    fn sage_all_has_one_header_per_topology() {
        let out = cmd_sage("all", None, &SageConfig::default()).unwrap();
        for topology in TOPOLOGIES {
            assert!(out.contains(&format!("# {}\nG = DiGraph()", topology.title)));
        }
        let snapshots: usize = TOPOLOGIES.iter().map(|t| t.snapshots.len()).sum();
        assert_eq!(snapshots, 4);
        assert_eq!(out.matches("G = DiGraph()").count(), TOPOLOGIES.len() + snapshots);
    }

    #[test]
    fn sage_single_uses_config() {
        let config = SageConfig {
            plot_dir: "/tmp/jute".into(),
            ..SageConfig::default()
        };
        let out = cmd_sage("diamond", None, &config).unwrap();
        assert!(out.starts_with("\n# Diamond Graph\n"));
        assert!(out.contains("filename=\"/tmp/jute/0-1-2-3.png\""));
    }

    #[test]
    fn nested_diamond_renders_snapshots_before_final() {
        let out = cmd_sage("nested-diamond", None, &SageConfig::default()).unwrap();
        let m1 = out.find("# Nested Diamond Graph M1\n").unwrap();
        let m4 = out.find("# Nested Diamond Graph M4\n").unwrap();
        let last = out.find("# Nested Diamond Graph\n").unwrap();
        assert!(m1 < m4 && m4 < last);
        assert!(out.contains("title=\"0-1-2-4\""));
        assert_eq!(out.matches("G = DiGraph()").count(), 5);
    }

    #[test]
    fn explicit_tip_renders_one_script() {
        let out = cmd_sage("nested-diamond", Some(4), &SageConfig::default()).unwrap();
        assert!(out.starts_with("\n# Nested Diamond Graph at 4\nG = DiGraph()\n"));
        assert_eq!(out.matches("G = DiGraph()").count(), 1);
        assert!(out.contains("G.add_edge(1, 4, 1)"));
        assert!(!out.contains("G.add_edge(1, 3,"));
    }

    #[test]
    fn explicit_tip_narrows_order_and_votes() {
        let out = cmd_order("pentagon", Some(3), &OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["tip"], 3);
        assert_eq!(value["title"], "0-1-3");

        let out = cmd_votes("pentagon", Some(3), &OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["weights"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn tip_outside_topology_is_an_error() {
        let err = cmd_order("diamond", Some(9), &OutputFormat::Text).unwrap_err();
        assert!(err.to_string().contains("has no node 9"));
        assert!(cmd_sage("all", Some(1), &SageConfig::default()).is_err());
    }
}
