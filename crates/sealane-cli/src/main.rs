use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use sealane_cli::commands::nearest::handle_nearest_command;
use sealane_cli::commands::ports::handle_ports_command;
use sealane_cli::commands::route::{handle_route_command, parse_coordinate, RouteCommandArgs};
use sealane_cli::commands::EngineArgs;
use sealane_cli::output::OutputFormat;
use sealane_lib::Coordinate;

#[derive(Parser, Debug)]
#[command(author, version, about = "Maritime sea-lane route planner")]
struct Cli {
    /// Sea-lane network JSON to use instead of the embedded network.
    #[arg(long, global = true)]
    network: Option<PathBuf>,

    /// Port catalog CSV to use instead of the embedded catalog.
    #[arg(long = "ports", global = true)]
    ports_file: Option<PathBuf>,

    /// Engine configuration JSON.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Disable the route cache.
    #[arg(long, global = true)]
    no_cache: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plan fastest, safest and economical routes between two points.
    Route {
        /// Origin as LON,LAT.
        #[arg(
            long,
            value_parser = parse_coordinate,
            allow_hyphen_values = true,
            required_unless_present = "from_port",
            conflicts_with = "from_port"
        )]
        from: Option<Coordinate>,
        /// Destination as LON,LAT.
        #[arg(
            long,
            value_parser = parse_coordinate,
            allow_hyphen_values = true,
            required_unless_present = "to_port",
            conflicts_with = "to_port"
        )]
        to: Option<Coordinate>,
        /// Origin port name.
        #[arg(long)]
        from_port: Option<String>,
        /// Destination port name.
        #[arg(long)]
        to_port: Option<String>,
        /// Steer the safest route away from high-risk chokepoints.
        #[arg(long)]
        avoid_high_risk: bool,
        /// Weather penalty applied to the fastest route (0 disables).
        #[arg(long, default_value_t = 0.0)]
        weather_penalty: f64,
    },
    /// List the port catalog, optionally filtered by name, country or region.
    Ports {
        /// Case-insensitive search text.
        query: Option<String>,
    },
    /// Show the port and sea-lane node a coordinate resolves to.
    Nearest {
        /// Coordinate as LON,LAT.
        #[arg(value_parser = parse_coordinate, allow_hyphen_values = true)]
        coordinate: Coordinate,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let engine_args = EngineArgs {
        network: cli.network,
        ports: cli.ports_file,
        config: cli.config,
        no_cache: cli.no_cache,
    };

    match cli.command {
        Command::Route {
            from,
            to,
            from_port,
            to_port,
            avoid_high_risk,
            weather_penalty,
        } => {
            let args = RouteCommandArgs {
                from,
                to,
                from_port,
                to_port,
                avoid_high_risk,
                weather_penalty,
            };
            handle_route_command(&engine_args, cli.format, &args)
        }
        Command::Ports { query } => handle_ports_command(&engine_args, cli.format, query.as_deref()),
        Command::Nearest { coordinate } => {
            handle_nearest_command(&engine_args, cli.format, coordinate)
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
