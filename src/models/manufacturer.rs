use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A car brand
#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::manufacturers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Manufacturer {
    /// Unique identifier for the manufacturer (UUID v4 as string)
    id: String,

    /// Brand name, unique across manufacturers
    name: String,

    /// Country the brand comes from
    country: String,
}

impl Manufacturer {
    /// Creates a new manufacturer with a fresh ID
    ///
    /// ### Arguments
    ///
    /// * `name` - The brand name
    /// * `country` - The country of origin
    pub fn new(name: String, country: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            country,
        }
    }

    pub fn get_id(&self) -> String {
        self.id.clone()
    }

    pub fn get_name(&self) -> String {
        self.name.clone()
    }

    pub fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub fn get_country(&self) -> String {
        self.country.clone()
    }

    pub fn set_country(&mut self, country: String) {
        self.country = country;
    }

    /// Path of the manufacturer's detail endpoint
    pub fn get_absolute_url(&self) -> String {
        format!("/manufacturers/{}/", self.id)
    }
}

impl fmt::Display for Manufacturer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.country)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manufacturer_new() {
        let manufacturer = Manufacturer::new("Manufacturer".to_string(), "United States".to_string());

        assert_eq!(manufacturer.get_name(), "Manufacturer");
        assert_eq!(manufacturer.get_country(), "United States");
        assert!(Uuid::parse_str(&manufacturer.get_id()).is_ok());
    }

    #[test]
    fn test_manufacturer_display() {
        let manufacturer = Manufacturer::new("Manufacturer".to_string(), "United States".to_string());

        assert_eq!(
            manufacturer.to_string(),
            format!("{} {}", manufacturer.get_name(), manufacturer.get_country())
        );
        assert_eq!(manufacturer.to_string(), "Manufacturer United States");
    }

    #[test]
    fn test_manufacturer_setters() {
        let mut manufacturer = Manufacturer::new("Zaz".to_string(), "USSR".to_string());
        manufacturer.set_name("ZAZ".to_string());
        manufacturer.set_country("Ukraine".to_string());

        assert_eq!(manufacturer.to_string(), "ZAZ Ukraine");
    }

    #[test]
    fn test_manufacturer_serializes_fields() {
        let manufacturer = Manufacturer::new("Dodge".to_string(), "USA".to_string());
        let json = serde_json::to_value(&manufacturer).unwrap();

        assert_eq!(json["name"], "Dodge");
        assert_eq!(json["country"], "USA");
        assert_eq!(json["id"], manufacturer.get_id());
    }
}
