//! # Taxi fleet server
//!
//! Serves the fleet JSON API. With the `create-driver` subcommand it instead
//! registers a driver directly in the database, which is how the first
//! account gets created.
//!
//! ```bash
//! taxi --listen-addr 0.0.0.0:3000
//! TAXI_PASSWORD=... taxi create-driver --username admin --license-number ADM56984
//! ```

use clap::{Parser, Subcommand};
use std::sync::Arc;
use taxi::config::{self, CliArgs};
use taxi::dto::DriverCreationForm;
use taxi::errors::ApiError;
use taxi::{create_app, db, handlers, run_migrations};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Taxi fleet server
#[derive(Parser, Debug)]
#[clap(name = "taxi", about = "Taxi fleet server")]
struct ServerCli {
    #[clap(flatten)]
    args: CliArgs,

    #[command(subcommand)]
    command: Option<ServerCommand>,
}

#[derive(Subcommand, Debug)]
enum ServerCommand {
    /// Register a driver account directly in the database
    CreateDriver {
        #[clap(long)]
        username: String,
        #[clap(long)]
        license_number: String,
        #[clap(long, default_value = "")]
        first_name: String,
        #[clap(long, default_value = "")]
        last_name: String,
        /// Password for the new account
        #[clap(long, env = "TAXI_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

/// Installs console logging and, when a data directory is known, a daily
/// rolling JSON log file
///
/// The returned guard flushes the file writer when dropped, so it must live
/// until the process exits.
fn init_tracing(debug: bool) -> Option<WorkerGuard> {
    let level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("taxi={level},tower_http={level}")));

    let (file_layer, guard) = match config::get_data_dir_path() {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir.join("logs"), "taxi.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().json().with_writer(writer)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .init();

    guard
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before clap reads the environment
    dotenv::dotenv().ok();

    let cli = ServerCli::parse();
    let _guard = init_tracing(cli.args.debug);

    info!("Taxi server v{} starting", env!("CARGO_PKG_VERSION"));

    let config = config::get_config(&cli.args);

    let pool = db::init_pool(&config.database_url)?;
    {
        let mut conn = pool.get()?;
        run_migrations(&mut conn)?;
    }
    info!("Database ready at {}", config.database_url);

    if let Some(ServerCommand::CreateDriver {
        username,
        license_number,
        first_name,
        last_name,
        password,
    }) = cli.command
    {
        let form = DriverCreationForm {
            username,
            password1: password.clone(),
            password2: password,
            license_number,
            first_name,
            last_name,
        };

        return match handlers::register_driver(&pool, &form) {
            Ok(driver) => {
                println!("Created driver {} ({})", driver.get_username(), driver.get_id());
                Ok(())
            }
            Err(ApiError::Validation(errors)) => Err(anyhow::anyhow!("Invalid driver: {}", errors)),
            Err(e) => Err(anyhow::anyhow!(e.to_string())),
        };
    }

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!("Listening on http://{}", config.listen_addr);

    let app = create_app(Arc::new(pool), config);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
