//! netresolve CLI - schematic drawing to netlist from the command line.

use clap::{Args, Parser, Subcommand, ValueEnum};
use netresolve::{
    ComponentFamily, ComponentKind, DanglingPolicy, EngineOptions, GroundPolicy, NetlistEngine,
    NetlistResult, Point, ProbeTarget,
};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "netresolve")]
#[command(about = "Schematic drawing to netlist resolver", long_about = None)]
#[command(version)]
struct Cli {
    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the netlist of a drawing
    Netlist {
        /// Path to a drawing .json file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        #[command(flatten)]
        resolve: ResolveArgs,
    },

    /// List resolved electrical nodes and their points
    Nodes {
        /// Path to a drawing .json file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        #[command(flatten)]
        resolve: ResolveArgs,
    },

    /// Resolve what a click at (x, y) probes
    Probe {
        /// Path to a drawing .json file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[arg(long, allow_negative_numbers = true)]
        x: f64,

        #[arg(long, allow_negative_numbers = true)]
        y: f64,

        /// Voltage probe radius in drawing units
        #[arg(long)]
        radius: Option<f64>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        #[command(flatten)]
        resolve: ResolveArgs,
    },

    /// Netlist every drawing in a directory
    Project {
        /// Path to project directory
        #[arg(value_name = "DIR", default_value = ".")]
        dir: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        #[command(flatten)]
        resolve: ResolveArgs,
    },

    /// List component families and their netlist codes
    Families,
}

#[derive(Args)]
struct ResolveArgs {
    /// Which flagged ground marker wins when there are several
    #[arg(long, value_enum, default_value = "merge-all")]
    ground_policy: GroundPolicyArg,

    /// Treat a terminal touching nothing as its own node or as UNCONNECTED
    #[arg(long, value_enum, default_value = "isolated")]
    dangling: DanglingArg,

    /// Do not pick a ground node when no marker is flagged
    #[arg(long)]
    no_fallback_ground: bool,

    /// Coordinate tolerance for point identity
    #[arg(long)]
    tolerance: Option<f64>,
}

impl ResolveArgs {
    fn options(&self) -> EngineOptions {
        let mut options = EngineOptions {
            ground_policy: match self.ground_policy {
                GroundPolicyArg::MergeAll => GroundPolicy::MergeAll,
                GroundPolicyArg::FirstMarker => GroundPolicy::FirstMarker,
                GroundPolicyArg::LastMarker => GroundPolicy::LastMarker,
            },
            dangling: match self.dangling {
                DanglingArg::Isolated => DanglingPolicy::Isolated,
                DanglingArg::Unconnected => DanglingPolicy::Unconnected,
            },
            fallback_ground: !self.no_fallback_ground,
            ..EngineOptions::default()
        };
        if let Some(tolerance) = self.tolerance {
            options.coordinate_tolerance = tolerance;
        }
        options
    }
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Solver line format
    Text,
    /// JSON records
    Json,
}

#[derive(Clone, ValueEnum)]
enum GroundPolicyArg {
    MergeAll,
    FirstMarker,
    LastMarker,
}

#[derive(Clone, ValueEnum)]
enum DanglingArg {
    Isolated,
    Unconnected,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match cli.command {
        Commands::Netlist {
            file,
            format,
            resolve,
        } => handle_netlist(&file, format, &resolve.options()),
        Commands::Nodes {
            file,
            format,
            resolve,
        } => handle_nodes(&file, format, &resolve.options()),
        Commands::Probe {
            file,
            x,
            y,
            radius,
            format,
            resolve,
        } => {
            let mut options = resolve.options();
            if let Some(radius) = radius {
                options.probe_radius = radius;
            }
            handle_probe(&file, Point::new(x, y), format, &options)
        }
        Commands::Project {
            dir,
            format,
            resolve,
        } => handle_project(&dir, format, &resolve.options()),
        Commands::Families => {
            handle_families();
            0
        }
    };

    process::exit(exit_code);
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_netlist(file: &Path, format: OutputFormat, options: &EngineOptions) -> i32 {
    tracing::debug!("Netlisting {} with {:?}", file.display(), options);
    match NetlistEngine::generate_file(file, options) {
        Ok(result) => {
            if result.is_empty() {
                eprintln!("Error: circuit is empty: {}", file.display());
                return 1;
            }
            output_results(&[result], &format);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn handle_nodes(file: &Path, format: OutputFormat, options: &EngineOptions) -> i32 {
    let result = match NetlistEngine::generate_file(file, options) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    match format {
        OutputFormat::Text => {
            for node in result.connectivity.nodes() {
                let points: Vec<String> = node.points.iter().map(|p| p.to_string()).collect();
                let marker = if node.is_ground { " (ground)" } else { "" };
                println!("{}{}: {}", node.name, marker, points.join(" "));
            }
        }
        OutputFormat::Json => print_json(&serde_json::json!({
            "file": file.display().to_string(),
            "ground": result.connectivity.ground_name(),
            "nodes": result.connectivity.nodes(),
        })),
    }
    0
}

fn handle_probe(file: &Path, click: Point, format: OutputFormat, options: &EngineOptions) -> i32 {
    let drawing = match netresolve::load_drawing(file) {
        Ok(drawing) => drawing,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    match NetlistEngine::probe(&drawing, click, options) {
        Some(target) => {
            match format {
                OutputFormat::Text => println!("{}", target),
                OutputFormat::Json => {
                    let component = match &target {
                        ProbeTarget::Current(name) => drawing.component(name).map(|c| {
                            serde_json::json!({
                                "name": c.name,
                                "family": c.family(),
                                "value": c.kind.value(),
                            })
                        }),
                        ProbeTarget::Voltage(_) => None,
                    };
                    print_json(&serde_json::json!({
                        "click": click,
                        "label": target.to_string(),
                        "target": target,
                        "component": component,
                    }));
                }
            }
            0
        }
        None => {
            eprintln!("No probe target at {}", click);
            1
        }
    }
}

fn handle_project(dir: &Path, format: OutputFormat, options: &EngineOptions) -> i32 {
    tracing::debug!("Netlisting project {} with {:?}", dir.display(), options);
    match NetlistEngine::generate_directory(dir, options) {
        Ok(results) => {
            output_results(&results, &format);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn output_results(results: &[NetlistResult], format: &OutputFormat) {
    match format {
        OutputFormat::Text => output_text(results),
        OutputFormat::Json => output_json(results),
    }
}

fn output_text(results: &[NetlistResult]) {
    let multiple = results.len() > 1;
    for result in results {
        if multiple {
            if let Some(ref file) = result.file {
                println!("* {}", file.display());
            }
        }
        if result.is_empty() {
            println!("* circuit is empty");
        } else {
            print!("{}", result.netlist);
        }
        if multiple {
            println!();
        }
    }
}

fn output_json(results: &[NetlistResult]) {
    print_json(&serde_json::json!({
        "results": results.iter().map(|r| {
            serde_json::json!({
                "file": r.file.as_ref().map(|f| f.display().to_string()),
                "records": r.netlist.records(),
                "ground": r.netlist.ground_node(),
                "ac_sources": r.netlist.ac_sources(),
                "unconnected_terminals": r.unconnected_terminals(),
            })
        }).collect::<Vec<_>>(),
        "summary": {
            "total_files": results.len(),
            "empty": results.iter().filter(|r| r.is_empty()).count(),
        }
    }));
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("Error: {}", e),
    }
}

fn handle_families() {
    println!("Component families:\n");
    for family in ComponentFamily::ALL {
        let kind = ComponentKind::default_for(family);
        let phase = kind
            .phase()
            .map(|p| format!(", phase {}", p))
            .unwrap_or_default();
        let polarity = if family.reverses_polarity() {
            "  (terminals swapped on output)"
        } else {
            ""
        };
        println!(
            "  {:<4} {:?}: default {}{}{}",
            family.code(),
            family,
            kind.value(),
            phase,
            polarity
        );
    }
}
