use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use qrnav_route::{
    Itinerary, NavConfig, NodeQuery, NodeRecord, PathFinder, PathResponse, Snapshot,
};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "qrnav-route")]
#[command(about = "Indoor routing across floors and buildings over QR waypoint graphs", long_about = None)]
struct Cli {
    /// Log output format
    #[arg(long, value_enum, default_value = "text", global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the shortest route between two QR identifiers
    Route {
        /// Snapshot JSON file with nodes and edges
        snapshot: PathBuf,
        /// Start identifier
        #[arg(long)]
        from: String,
        /// Destination identifier
        #[arg(long)]
        to: String,
        /// TOML config file with a [heuristic] table
        #[arg(long)]
        config: Option<PathBuf>,
        /// Pixels charged per floor of separation (overrides config)
        #[arg(long)]
        floor_weight: Option<f64>,
        /// Surcharge for crossing buildings (overrides config)
        #[arg(long)]
        building_penalty: Option<f64>,
        /// Print the {path, distance, error} response as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search nodes by name, optionally within one building floor
    Search {
        /// Snapshot JSON file with nodes and edges
        snapshot: PathBuf,
        /// Case-insensitive part of the node name
        #[arg(short, long)]
        query: Option<String>,
        #[arg(long)]
        building: Option<String>,
        #[arg(long)]
        floor: Option<String>,
    },
    /// Show the node behind a QR identifier
    Node {
        /// Snapshot JSON file with nodes and edges
        snapshot: PathBuf,
        qr_id: String,
    },
}

fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let start = Instant::now();
    let snapshot = Snapshot::load(path)
        .with_context(|| format!("Failed to load snapshot {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        nodes = snapshot.nodes.len(),
        edges = snapshot.edges.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "snapshot loaded"
    );
    Ok(snapshot)
}

fn print_node(node: &NodeRecord) {
    let position = match (node.pixel_x, node.pixel_y) {
        (Some(x), Some(y)) => format!("({x:.0}, {y:.0})"),
        _ => "(no position)".to_string(),
    };
    println!(
        "{:<24} {:<28} {:>6} {:<12} {:?} {}",
        node.routable_id().unwrap_or("-"),
        node.name,
        node.floor.as_str(),
        node.building,
        node.node_type,
        position
    );
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format);

    match cli.command {
        Commands::Route {
            snapshot,
            from,
            to,
            config,
            floor_weight,
            building_penalty,
            json,
        } => {
            let mut nav_config = match &config {
                Some(path) => NavConfig::load(path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?,
                None => NavConfig::default(),
            };
            if let Some(w) = floor_weight {
                nav_config.heuristic.floor_weight = w;
            }
            if let Some(p) = building_penalty {
                nav_config.heuristic.building_penalty = p;
            }
            nav_config.heuristic.validate()?;

            let snapshot = load_snapshot(&snapshot)?;
            let graph = snapshot.graph();
            let stats = graph.stats();
            if stats.dropped_edges > 0 || stats.skipped_nodes > 0 {
                tracing::info!(
                    skipped_nodes = stats.skipped_nodes,
                    dropped_edges = stats.dropped_edges,
                    "incomplete records left out of the graph"
                );
            }

            let start = Instant::now();
            let result = PathFinder::with_config(&graph, nav_config.heuristic).find_path(&from, &to);
            tracing::info!(
                elapsed_us = start.elapsed().as_micros() as u64,
                found = result.is_ok(),
                "route query"
            );

            if json {
                let response = PathResponse::from(&result);
                println!("{}", serde_json::to_string_pretty(&response)?);
                return Ok(());
            }

            let route = result?;
            println!("Route {} -> {}", from, to);
            println!("Distance: {:.1}", route.distance);
            println!("Waypoints: {}", route.path.len());

            let itinerary = Itinerary::from_route(&route);
            for (i, leg) in itinerary.legs.iter().enumerate() {
                println!(
                    "\nLeg {}: {} {} ({:.0} px)",
                    i + 1,
                    leg.building,
                    leg.floor,
                    leg.length
                );
                for wp in &route.path[leg.start..leg.end] {
                    if wp.name.is_empty() {
                        println!("  {}", wp.id);
                    } else {
                        println!("  {} ({})", wp.id, wp.name);
                    }
                }
                if let Some(t) = &leg.transition {
                    println!(
                        "  -> take {:?} at {} to {} {}",
                        t.kind, t.at, t.building, t.floor
                    );
                }
            }
        }
        Commands::Search {
            snapshot,
            query,
            building,
            floor,
        } => {
            let snapshot = load_snapshot(&snapshot)?;
            let hits = snapshot.search(&NodeQuery {
                name: query.as_deref(),
                building: building.as_deref(),
                floor: floor.as_deref(),
            });
            for node in &hits {
                print_node(node);
            }
            println!("{} node(s)", hits.len());
        }
        Commands::Node { snapshot, qr_id } => {
            let snapshot = load_snapshot(&snapshot)?;
            let node = snapshot
                .node_by_qr_id(&qr_id)
                .ok_or_else(|| anyhow::anyhow!("No node with QR id '{}'", qr_id))?;
            print_node(node);
            if let Some(description) = &node.description {
                println!("{description}");
            }
        }
    }

    Ok(())
}
