use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Account, CarSummary};

/// The driver-specific row, keyed by the owning account's ID
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::drivers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DriverRecord {
    /// ID of the account this driver extends
    account_id: String,

    /// Validated license number, unique across drivers
    license_number: String,
}

impl DriverRecord {
    pub fn new(account_id: String, license_number: String) -> Self {
        Self {
            account_id,
            license_number,
        }
    }

    pub fn get_account_id(&self) -> String {
        self.account_id.clone()
    }

    pub fn get_license_number(&self) -> String {
        self.license_number.clone()
    }
}

/// A fleet operator: an account plus a license number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Driver {
    #[serde(flatten)]
    account: Account,

    license_number: String,
}

impl Driver {
    /// Joins an account with its driver row
    pub fn from_parts(account: Account, record: DriverRecord) -> Self {
        Self {
            account,
            license_number: record.license_number,
        }
    }

    pub fn get_id(&self) -> String {
        self.account.get_id()
    }

    pub fn get_username(&self) -> String {
        self.account.get_username()
    }

    pub fn get_license_number(&self) -> String {
        self.license_number.clone()
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    /// Path of the driver's detail endpoint
    pub fn get_absolute_url(&self) -> String {
        format!("/drivers/{}/", self.account.get_id())
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} {})",
            self.account.get_username(),
            self.account.get_first_name(),
            self.account.get_last_name()
        )
    }
}

/// A driver together with the cars assigned to them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverDetail {
    #[serde(flatten)]
    pub driver: Driver,

    pub cars: Vec<CarSummary>,
}

#[cfg(test)]
mod tests;
