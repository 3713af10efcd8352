use clap::Subcommand;
use taxi::dto::CarForm;

use crate::client::TaxiClient;
use crate::output::{self, OutputConfig};

/// Car management commands
#[derive(Subcommand, Debug)]
pub enum CarCommands {
    /// List cars, optionally filtered by model
    List {
        /// Case-insensitive part of the model
        #[clap(long)]
        model: Option<String>,
        #[clap(long)]
        page: Option<i64>,
    },
    /// Show a car with its manufacturer and drivers
    Get { id: String },
    /// Create a new car
    Create {
        #[clap(long)]
        model: String,
        #[clap(long)]
        manufacturer_id: String,
        /// Driver ID to assign; repeat for several drivers
        #[clap(long = "driver")]
        driver_ids: Vec<String>,
    },
    /// Replace a car's model, manufacturer and drivers
    Update {
        id: String,
        #[clap(long)]
        model: String,
        #[clap(long)]
        manufacturer_id: String,
        #[clap(long = "driver")]
        driver_ids: Vec<String>,
    },
    /// Delete a car
    Delete { id: String },
    /// Assign yourself to the car, or unassign if already assigned
    ToggleAssign { id: String },
}

/// Executes a car command
pub async fn execute(
    client: &TaxiClient,
    cmd: CarCommands,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        CarCommands::List { model, page } => {
            let list = client.list_cars(model, page).await?;
            output::print_cars(&list, config);
        }
        CarCommands::Get { id } => {
            let car = client.get_car(&id).await?;
            output::print_car(&car, config);
        }
        CarCommands::Create { model, manufacturer_id, driver_ids } => {
            let form = CarForm { model, manufacturer_id, driver_ids };
            let car = client.create_car(&form).await?;
            output::print_car(&car, config);
        }
        CarCommands::Update { id, model, manufacturer_id, driver_ids } => {
            let form = CarForm { model, manufacturer_id, driver_ids };
            let car = client.update_car(&id, &form).await?;
            output::print_car(&car, config);
        }
        CarCommands::Delete { id } => {
            client.delete_car(&id).await?;
            output::print_success(&format!("Deleted car {}", id), config);
        }
        CarCommands::ToggleAssign { id } => {
            let car = client.toggle_assign(&id).await?;
            output::print_car(&car, config);
        }
    }
    Ok(())
}
