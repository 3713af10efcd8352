use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::{Driver, Manufacturer};

/// A vehicle in the fleet
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::cars)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Car {
    /// Unique identifier for the car (UUID v4 as string)
    id: String,

    /// Model name, e.g. "Viper"
    model: String,

    /// ID of the manufacturer that builds this car
    manufacturer_id: String,
}

impl Car {
    /// Creates a new car with a fresh ID
    ///
    /// ### Arguments
    ///
    /// * `model` - The model name
    /// * `manufacturer_id` - The ID of an existing manufacturer
    pub fn new(model: String, manufacturer_id: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            model,
            manufacturer_id,
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_model(&self) -> String {
        self.model.clone()
    }

    pub fn get_manufacturer_id(&self) -> String {
        self.manufacturer_id.clone()
    }

    /// Path of the car's detail endpoint
    pub fn get_absolute_url(&self) -> String {
        format!("/cars/{}/", self.id)
    }
}

impl fmt::Display for Car {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.model)
    }
}

/// One row of the car/driver assignment relation
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::car_drivers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CarDriver {
    car_id: String,
    driver_id: String,
}

impl CarDriver {
    pub fn new(car_id: String, driver_id: String) -> Self {
        Self { car_id, driver_id }
    }

    pub fn get_car_id(&self) -> String {
        self.car_id.clone()
    }

    pub fn get_driver_id(&self) -> String {
        self.driver_id.clone()
    }
}

/// What a toggle did to a car/driver assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentChange {
    Assigned,
    Unassigned,
}

impl fmt::Display for AssignmentChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssignmentChange::Assigned => write!(f, "assigned"),
            AssignmentChange::Unassigned => write!(f, "unassigned"),
        }
    }
}

/// A car as shown in listings: with its manufacturer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarSummary {
    #[serde(flatten)]
    pub car: Car,

    pub manufacturer: Manufacturer,
}

/// A car with its manufacturer and assigned drivers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarDetail {
    #[serde(flatten)]
    pub car: Car,

    pub manufacturer: Manufacturer,

    pub drivers: Vec<Driver>,
}

impl CarDetail {
    /// Whether the driver with `driver_id` is assigned to this car
    pub fn has_driver(&self, driver_id: &str) -> bool {
        self.drivers.iter().any(|d| d.get_id() == driver_id)
    }
}
