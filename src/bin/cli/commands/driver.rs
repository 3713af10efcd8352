use clap::Subcommand;
use taxi::dto::DriverCreationForm;

use crate::client::TaxiClient;
use crate::output::{self, OutputConfig};

/// Driver management commands
#[derive(Subcommand, Debug)]
pub enum DriverCommands {
    /// List drivers, optionally filtered by username
    List {
        /// Case-insensitive part of the username
        #[clap(long)]
        username: Option<String>,
        #[clap(long)]
        page: Option<i64>,
    },
    /// Show a driver with their cars
    Get { id: String },
    /// Register a new driver
    Create {
        #[clap(long)]
        username: String,
        #[clap(long)]
        license_number: String,
        #[clap(long, default_value = "")]
        first_name: String,
        #[clap(long, default_value = "")]
        last_name: String,
        #[clap(long, env = "TAXI_NEW_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Change a driver's license number
    UpdateLicense {
        id: String,
        #[clap(long)]
        license_number: String,
    },
    /// Delete a driver's account
    Delete { id: String },
}

/// Executes a driver command
pub async fn execute(
    client: &TaxiClient,
    cmd: DriverCommands,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        DriverCommands::List { username, page } => {
            let list = client.list_drivers(username, page).await?;
            output::print_drivers(&list, config);
        }
        DriverCommands::Get { id } => {
            let detail = client.get_driver(&id).await?;
            output::print_driver_detail(&detail, config);
        }
        DriverCommands::Create {
            username,
            license_number,
            first_name,
            last_name,
            password,
        } => {
            let form = DriverCreationForm {
                username,
                password1: password.clone(),
                password2: password,
                license_number,
                first_name,
                last_name,
            };
            let driver = client.create_driver(&form).await?;
            output::print_driver(&driver, config);
        }
        DriverCommands::UpdateLicense { id, license_number } => {
            let driver = client.update_license(&id, license_number).await?;
            output::print_driver(&driver, config);
        }
        DriverCommands::Delete { id } => {
            client.delete_driver(&id).await?;
            output::print_success(&format!("Deleted driver {}", id), config);
        }
    }
    Ok(())
}
