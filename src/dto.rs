use serde::{Deserialize, Serialize};

use crate::models::Driver;
use crate::validation::{validate_license_number, FieldErrors};

/// Longest accepted username
pub const USERNAME_MAX_LENGTH: usize = 150;

/// Shortest accepted password
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Form for creating or updating a manufacturer
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ManufacturerForm {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub country: String,
}

impl ManufacturerForm {
    /// Checks required fields and returns the trimmed form
    pub fn validate(&self) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("name", &self.name);
        errors.require("country", &self.country);

        errors.into_result(Self {
            name: self.name.trim().to_string(),
            country: self.country.trim().to_string(),
        })
    }
}

/// Form for creating or updating a car
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct CarForm {
    #[serde(default)]
    pub model: String,

    #[serde(default)]
    pub manufacturer_id: String,

    /// Drivers assigned to the car; replaces the current set on update
    #[serde(default)]
    pub driver_ids: Vec<String>,
}

impl CarForm {
    /// Checks required fields and returns the trimmed form with duplicate
    /// driver IDs removed
    ///
    /// Whether the manufacturer and drivers exist is checked against the
    /// database by the handler.
    pub fn validate(&self) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("model", &self.model);
        errors.require("manufacturer_id", &self.manufacturer_id);

        let mut driver_ids: Vec<String> = Vec::with_capacity(self.driver_ids.len());
        for id in &self.driver_ids {
            if !driver_ids.contains(id) {
                driver_ids.push(id.clone());
            }
        }

        errors.into_result(Self {
            model: self.model.trim().to_string(),
            manufacturer_id: self.manufacturer_id.trim().to_string(),
            driver_ids,
        })
    }
}

/// Form for registering a new driver
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct DriverCreationForm {
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password1: String,

    /// Confirmation; must equal `password1`
    #[serde(default)]
    pub password2: String,

    #[serde(default)]
    pub license_number: String,

    #[serde(default)]
    pub first_name: String,

    #[serde(default)]
    pub last_name: String,
}

/// Whether `c` may appear in a username
fn is_username_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_')
}

impl DriverCreationForm {
    /// Validates every field and returns the cleaned form
    ///
    /// Passwords are compared as typed; other text fields are trimmed.
    /// Username and license number uniqueness is checked by the handler.
    pub fn validate(&self) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();

        let username = self.username.trim();
        if username.is_empty() {
            errors.add("username", "This field is required.");
        } else if username.chars().count() > USERNAME_MAX_LENGTH {
            errors.add(
                "username",
                format!("Ensure this value has at most {} characters.", USERNAME_MAX_LENGTH),
            );
        } else if !username.chars().all(is_username_char) {
            errors.add(
                "username",
                "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
            );
        }

        if self.password1.is_empty() {
            errors.add("password1", "This field is required.");
        }
        if self.password2.is_empty() {
            errors.add("password2", "This field is required.");
        } else if !self.password1.is_empty() && self.password1 != self.password2 {
            errors.add("password2", "The two password fields didn't match.");
        } else if self.password2.chars().count() < PASSWORD_MIN_LENGTH {
            errors.add(
                "password2",
                format!(
                    "This password is too short. It must contain at least {} characters.",
                    PASSWORD_MIN_LENGTH
                ),
            );
        }

        let license_number = clean_license_number(&self.license_number, &mut errors);

        errors.into_result(Self {
            username: username.to_string(),
            password1: self.password1.clone(),
            password2: self.password2.clone(),
            license_number,
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
        })
    }
}

/// Form for changing a driver's license number
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct DriverLicenseUpdateForm {
    #[serde(default)]
    pub license_number: String,
}

impl DriverLicenseUpdateForm {
    /// Validates the license number and returns it trimmed
    pub fn validate(&self) -> Result<String, FieldErrors> {
        let mut errors = FieldErrors::new();
        let license_number = clean_license_number(&self.license_number, &mut errors);
        errors.into_result(license_number)
    }
}

/// Trims and validates a license number field, recording any failure
fn clean_license_number(raw: &str, errors: &mut FieldErrors) -> String {
    let license_number = raw.trim();
    if license_number.is_empty() {
        errors.add("license_number", "This field is required.");
    } else if let Err(e) = validate_license_number(license_number) {
        errors.add("license_number", e.to_string());
    }
    license_number.to_string()
}

/// Credentials posted to `/accounts/login`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginDto {
    pub username: String,
    pub password: String,
}

/// Response to a successful login
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginResponse {
    /// Session token; send it back as the `sessionid` cookie or a bearer token
    pub token: String,

    pub driver: Driver,
}

/// Fleet overview returned by `/`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct IndexDto {
    pub num_drivers: i64,
    pub num_cars: i64,
    pub num_manufacturers: i64,

    /// Times the index has been opened in the current session, this one included
    pub num_visits: i32,
}
