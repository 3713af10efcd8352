use clap::Subcommand;

use crate::client::{self, TaxiClient};
use crate::output::{self, OutputConfig};

/// Sign-in commands
#[derive(Subcommand, Debug)]
pub enum SessionCommands {
    /// Sign in and remember the session for later commands
    Login {
        #[clap(long)]
        username: String,
        /// Password; prompted for on stdin when omitted
        #[clap(long, env = "TAXI_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// End the current session
    Logout,
    /// Show fleet totals and how often this session has loaded them
    Index,
}

fn read_password() -> Result<String, std::io::Error> {
    eprint!("Password: ");
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Executes a session command
pub async fn execute(
    client: &TaxiClient,
    cmd: SessionCommands,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        SessionCommands::Login { username, password } => {
            let password = match password {
                Some(password) => password,
                None => read_password()?,
            };
            let response = client.login(username, password).await?;
            client::save_token(&response.token)?;
            output::print_success(&format!("Logged in as {}", response.driver.get_username()), config);
        }
        SessionCommands::Logout => {
            client.logout().await?;
            client::clear_token()?;
            output::print_success("Logged out", config);
        }
        SessionCommands::Index => {
            let index = client.index().await?;
            output::print_index(&index, config);
        }
    }
    Ok(())
}
