mod client;
mod commands;
mod output;

use clap::{Parser, Subcommand};
use client::TaxiClient;
use output::{OutputConfig, OutputFormat};
use std::process;
use taxi::config;

/// CLI for the taxi fleet server
#[derive(Parser, Debug)]
#[clap(name = "taxi-cli", about = "CLI for the taxi fleet server")]
struct Cli {
    /// Server URL to connect to
    #[clap(long, env = "TAXI_URL", global = true)]
    server_url: Option<String>,

    /// Session token to use instead of the one saved by `login`
    #[clap(long, env = "TAXI_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    /// Output format
    #[clap(long, value_enum, default_value_t = OutputFormat::Human, global = true)]
    format: OutputFormat,

    /// Quiet mode: minimal output (just IDs)
    #[clap(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(flatten)]
    Session(commands::session::SessionCommands),
    /// Manage manufacturers
    #[command(subcommand)]
    Manufacturer(commands::manufacturer::ManufacturerCommands),
    /// Manage cars
    #[command(subcommand)]
    Car(commands::car::CarCommands),
    /// Manage drivers
    #[command(subcommand)]
    Driver(commands::driver::DriverCommands),
}

/// Resolves the server URL from CLI args, config file, or defaults
///
/// Precedence: CLI flag / env var > config file > default (port based on debug/release)
fn resolve_server_url(cli_url: Option<String>) -> String {
    if let Some(url) = cli_url {
        return url;
    }

    let config_path = config::get_config_dir_path().map(|dir| dir.join(config::CONFIG_FILE_NAME));
    if let Ok(update) = config::config_from_file(config_path) {
        if let Some(url) = update.server_url {
            return url;
        }
    }

    format!("http://localhost:{}", config::default_port())
}

/// Formats an error for human-readable stderr output
fn format_error(err: &dyn std::error::Error) -> String {
    let err_string = err.to_string();

    if err_string.contains("error sending request")
        || err_string.contains("onnection refused")
        || err_string.contains("tcp connect error")
    {
        return format!("Could not connect to server. Is taxi running?\n  {}", err_string);
    }

    if err_string.contains("(401)") {
        return format!("{}\n  Sign in with `taxi-cli login --username <name>`", err_string);
    }

    err_string
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let server_url = resolve_server_url(cli.server_url);
    let token = cli.token.or_else(client::load_token);
    let client = TaxiClient::new(server_url, token);
    let output_config = OutputConfig {
        format: cli.format,
        quiet: cli.quiet,
    };

    let result = match cli.command {
        Commands::Session(cmd) => commands::session::execute(&client, cmd, &output_config).await,
        Commands::Manufacturer(cmd) => commands::manufacturer::execute(&client, cmd, &output_config).await,
        Commands::Car(cmd) => commands::car::execute(&client, cmd, &output_config).await,
        Commands::Driver(cmd) => commands::driver::execute(&client, cmd, &output_config).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", format_error(e.as_ref()));
        process::exit(1);
    }
}
