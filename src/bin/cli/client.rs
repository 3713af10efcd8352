use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use taxi::config;
use taxi::dto::{
    CarForm, DriverCreationForm, DriverLicenseUpdateForm, IndexDto, LoginDto, LoginResponse, ManufacturerForm,
};
use taxi::models::{CarDetail, CarSummary, Driver, DriverDetail, Manufacturer};
use taxi::pagination::ListPage;
use thiserror::Error;

const TOKEN_FILE_NAME: &str = "cli_session";

/// Error type for CLI client operations
#[derive(Error, Debug)]
pub enum ClientError {
    /// Server returned an error status with a message body
    #[error("Server error ({}): {message}", status.as_u16())]
    Server { status: reqwest::StatusCode, message: String },
    /// Network/connection/request error
    #[error(transparent)]
    Request(#[from] reqwest::Error),
    /// Reading or writing the saved session token failed
    #[error("Session file error: {0}")]
    Session(#[from] std::io::Error),
}

/// Extension trait for checking HTTP responses and extracting server error messages
trait ResponseExt {
    /// Checks for error status and extracts the server's error message body
    async fn check(self) -> Result<reqwest::Response, ClientError>;
}

impl ResponseExt for reqwest::Response {
    async fn check(self) -> Result<reqwest::Response, ClientError> {
        if self.status().is_success() {
            return Ok(self);
        }
        let status = self.status();
        let message = match self.json::<serde_json::Value>().await {
            Ok(body) => {
                let error = body
                    .get("error")
                    .and_then(|e| e.as_str())
                    .unwrap_or("Unknown error")
                    .to_string();
                match body.get("fields").and_then(|f| f.as_array()) {
                    Some(fields) => {
                        let details: Vec<String> = fields
                            .iter()
                            .map(|f| {
                                format!(
                                    "{}: {}",
                                    f["field"].as_str().unwrap_or("?"),
                                    f["message"].as_str().unwrap_or("?")
                                )
                            })
                            .collect();
                        format!("{} ({})", error, details.join("; "))
                    }
                    None => error,
                }
            }
            Err(_) => format!("HTTP {}", status),
        };
        Err(ClientError::Server { status, message })
    }
}

/// Where the CLI keeps the token of its current session
pub fn token_path() -> Option<PathBuf> {
    config::get_data_dir_path().map(|dir| dir.join(TOKEN_FILE_NAME))
}

/// Reads the saved session token, if any
pub fn load_token() -> Option<String> {
    let path = token_path()?;
    let token = fs::read_to_string(path).ok()?;
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}

/// Saves a session token for later commands
pub fn save_token(token: &str) -> Result<(), ClientError> {
    if let Some(path) = token_path() {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, token)?;
    }
    Ok(())
}

/// Forgets the saved session token
pub fn clear_token() -> Result<(), ClientError> {
    if let Some(path) = token_path().filter(|p| p.exists()) {
        fs::remove_file(path)?;
    }
    Ok(())
}

/// Builds `?field=value&page=N` for a listing
fn list_params(field: &'static str, query: Option<String>, page: Option<i64>) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();
    if let Some(query) = query {
        params.push((field, query));
    }
    if let Some(page) = page {
        params.push(("page", page.to_string()));
    }
    params
}

/// HTTP client wrapper for communicating with the taxi server
pub struct TaxiClient {
    /// The base URL of the server (e.g. "http://localhost:3000")
    base_url: String,
    /// The underlying HTTP client
    client: Client,
    /// Session token sent as a bearer token
    token: Option<String>,
}

impl TaxiClient {
    /// Creates a new TaxiClient
    ///
    /// ### Arguments
    ///
    /// * `base_url` - The base URL of the taxi server
    /// * `token` - Session token from an earlier login, if any
    pub fn new(base_url: String, token: Option<String>) -> Self {
        Self {
            base_url,
            client: Client::new(),
            token,
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let response = builder.send().await?.check().await?;
        Ok(response.json().await?)
    }

    async fn send_empty(&self, builder: RequestBuilder) -> Result<(), ClientError> {
        builder.send().await?.check().await?;
        Ok(())
    }

    // ── Session endpoints ────────────────────────────────────────────

    /// Signs in and returns the new session
    pub async fn login(&self, username: String, password: String) -> Result<LoginResponse, ClientError> {
        let dto = LoginDto { username, password };
        self.send(self.request(reqwest::Method::POST, "/accounts/login").json(&dto)).await
    }

    /// Ends the current session
    pub async fn logout(&self) -> Result<(), ClientError> {
        self.send_empty(self.request(reqwest::Method::POST, "/accounts/logout")).await
    }

    /// Fetches the fleet overview
    pub async fn index(&self) -> Result<IndexDto, ClientError> {
        self.send(self.request(reqwest::Method::GET, "/")).await
    }

    // ── Manufacturer endpoints ───────────────────────────────────────

    pub async fn list_manufacturers(
        &self,
        name: Option<String>,
        page: Option<i64>,
    ) -> Result<ListPage<Manufacturer>, ClientError> {
        let params = list_params("name", name, page);
        self.send(self.request(reqwest::Method::GET, "/manufacturers").query(&params)).await
    }

    pub async fn get_manufacturer(&self, id: &str) -> Result<Manufacturer, ClientError> {
        self.send(self.request(reqwest::Method::GET, &format!("/manufacturers/{}", id))).await
    }

    pub async fn create_manufacturer(&self, name: String, country: String) -> Result<Manufacturer, ClientError> {
        let form = ManufacturerForm { name, country };
        self.send(self.request(reqwest::Method::POST, "/manufacturers").json(&form)).await
    }

    pub async fn update_manufacturer(
        &self,
        id: &str,
        name: String,
        country: String,
    ) -> Result<Manufacturer, ClientError> {
        let form = ManufacturerForm { name, country };
        self.send(self.request(reqwest::Method::PUT, &format!("/manufacturers/{}", id)).json(&form))
            .await
    }

    pub async fn delete_manufacturer(&self, id: &str) -> Result<(), ClientError> {
        self.send_empty(self.request(reqwest::Method::DELETE, &format!("/manufacturers/{}", id)))
            .await
    }

    // ── Car endpoints ────────────────────────────────────────────────

    pub async fn list_cars(&self, model: Option<String>, page: Option<i64>) -> Result<ListPage<CarSummary>, ClientError> {
        let params = list_params("model", model, page);
        self.send(self.request(reqwest::Method::GET, "/cars").query(&params)).await
    }

    pub async fn get_car(&self, id: &str) -> Result<CarDetail, ClientError> {
        self.send(self.request(reqwest::Method::GET, &format!("/cars/{}", id))).await
    }

    pub async fn create_car(&self, form: &CarForm) -> Result<CarDetail, ClientError> {
        self.send(self.request(reqwest::Method::POST, "/cars").json(form)).await
    }

    pub async fn update_car(&self, id: &str, form: &CarForm) -> Result<CarDetail, ClientError> {
        self.send(self.request(reqwest::Method::PUT, &format!("/cars/{}", id)).json(form)).await
    }

    pub async fn delete_car(&self, id: &str) -> Result<(), ClientError> {
        self.send_empty(self.request(reqwest::Method::DELETE, &format!("/cars/{}", id))).await
    }

    /// Toggles the signed-in driver's assignment and returns the car as it now stands
    ///
    /// The server answers with a redirect to the car, which reqwest follows.
    pub async fn toggle_assign(&self, id: &str) -> Result<CarDetail, ClientError> {
        self.send(
            self.request(reqwest::Method::POST, &format!("/cars/{}/toggle-assign", id))
                .json(&json!({})),
        )
        .await
    }

    // ── Driver endpoints ─────────────────────────────────────────────

    pub async fn list_drivers(&self, username: Option<String>, page: Option<i64>) -> Result<ListPage<Driver>, ClientError> {
        let params = list_params("username", username, page);
        self.send(self.request(reqwest::Method::GET, "/drivers").query(&params)).await
    }

    pub async fn get_driver(&self, id: &str) -> Result<DriverDetail, ClientError> {
        self.send(self.request(reqwest::Method::GET, &format!("/drivers/{}", id))).await
    }

    pub async fn create_driver(&self, form: &DriverCreationForm) -> Result<Driver, ClientError> {
        self.send(self.request(reqwest::Method::POST, "/drivers").json(form)).await
    }

    pub async fn update_license(&self, id: &str, license_number: String) -> Result<Driver, ClientError> {
        let form = DriverLicenseUpdateForm { license_number };
        self.send(self.request(reqwest::Method::PUT, &format!("/drivers/{}/license", id)).json(&form))
            .await
    }

    pub async fn delete_driver(&self, id: &str) -> Result<(), ClientError> {
        self.send_empty(self.request(reqwest::Method::DELETE, &format!("/drivers/{}", id))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_params() {
        assert!(list_params("name", None, None).is_empty());
        assert_eq!(
            list_params("model", Some("Sens".to_string()), Some(2)),
            vec![("model", "Sens".to_string()), ("page", "2".to_string())]
        );
    }
}
