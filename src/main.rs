//! Lightpath - additive path-length evaluation for photonic circuits
//!
//! # Usage
//!
//! ```bash
//! lightpath \
//!     --instance a:in:out=1.0 --instance b:in:out=2.0 \
//!     --connection a,out=b,in \
//!     --port x=a,in --port y=b,out
//! ```
//!
//! Prints one line per pair of external ports that has at least one valid
//! path, listing the length batch of every path.

use clap::Parser;
use lightpath_core::{
    cli::{collect_assignments, collect_instances, collect_ports, format_instances, parse_instance_entry},
    display::format_reals,
    error::Result,
    solver::{AdditiveCircuit, SolverConfig},
};

/// Photonic circuit path-length evaluator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Device entry: <instance>:<port1>:<port2>=<length>[;<length>...]
    #[arg(short, long = "instance", value_name = "ENTRY")]
    instances: Vec<String>,

    /// Internal wire: <instance>,<port>=<instance>,<port>
    #[arg(short, long = "connection", value_name = "WIRE")]
    connections: Vec<String>,

    /// External port: <name>=<instance>,<port>
    #[arg(short, long = "port", value_name = "PORT")]
    ports: Vec<String>,

    /// Fail when a port pair has more than this many paths
    #[arg(long)]
    max_paths: Option<usize>,

    /// Keep pass-through nodes in the searched graph
    #[arg(long)]
    no_prune: bool,

    /// Print the parsed instance entries before evaluating
    #[arg(long)]
    show_instances: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Parse the circuit description
    let entries = args
        .instances
        .iter()
        .map(|argument| parse_instance_entry(argument))
        .collect::<Result<Vec<_>>>()?;
    let instances = collect_instances(&entries);
    let connections = collect_assignments(&args.connections)?;
    let ports = collect_ports(&args.ports)?;
    if args.show_instances {
        println!("{}", format_instances(&instances));
    }

    // Configure the solver
    let mut config = SolverConfig::new().with_pruning(!args.no_prune);
    if let Some(max_paths) = args.max_paths {
        config = config.with_max_paths(max_paths);
    }

    // Evaluate
    let result = AdditiveCircuit::analyze(&connections, &ports)?
        .with_config(config)
        .evaluate(&instances)?;

    for ((source, target), lengths) in &result {
        let batches: Vec<String> = lengths.iter().map(|l| format_reals(l)).collect();
        println!("{source} -> {target}: {}", batches.join(" "));
    }

    Ok(())
}
