use clap::Subcommand;

use crate::client::TaxiClient;
use crate::output::{self, OutputConfig};

/// Manufacturer management commands
#[derive(Subcommand, Debug)]
pub enum ManufacturerCommands {
    /// List manufacturers, optionally filtered by name
    List {
        /// Case-insensitive part of the name
        #[clap(long)]
        name: Option<String>,
        #[clap(long)]
        page: Option<i64>,
    },
    /// Show one manufacturer
    Get { id: String },
    /// Create a new manufacturer
    Create {
        #[clap(long)]
        name: String,
        #[clap(long)]
        country: String,
    },
    /// Replace a manufacturer's name and country
    Update {
        id: String,
        #[clap(long)]
        name: String,
        #[clap(long)]
        country: String,
    },
    /// Delete a manufacturer and its cars
    Delete { id: String },
}

/// Executes a manufacturer command
pub async fn execute(
    client: &TaxiClient,
    cmd: ManufacturerCommands,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        ManufacturerCommands::List { name, page } => {
            let list = client.list_manufacturers(name, page).await?;
            output::print_manufacturers(&list, config);
        }
        ManufacturerCommands::Get { id } => {
            let manufacturer = client.get_manufacturer(&id).await?;
            output::print_manufacturer(&manufacturer, config);
        }
        ManufacturerCommands::Create { name, country } => {
            let manufacturer = client.create_manufacturer(name, country).await?;
            output::print_manufacturer(&manufacturer, config);
        }
        ManufacturerCommands::Update { id, name, country } => {
            let manufacturer = client.update_manufacturer(&id, name, country).await?;
            output::print_manufacturer(&manufacturer, config);
        }
        ManufacturerCommands::Delete { id } => {
            client.delete_manufacturer(&id).await?;
            output::print_success(&format!("Deleted manufacturer {}", id), config);
        }
    }
    Ok(())
}
