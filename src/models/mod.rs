/// Data models module
///
/// This module defines the core data structures used throughout the application.
/// Row types map one-to-one onto database tables; the composite types
/// (`Driver`, `CarSummary`, `CarDetail`, `DriverDetail`) are assembled by the
/// repository layer from joins.

mod manufacturer;
pub use manufacturer::Manufacturer;

mod account;
pub use account::Account;

mod driver;
pub use driver::{Driver, DriverDetail, DriverRecord};

mod car;
pub use car::{AssignmentChange, Car, CarDetail, CarDriver, CarSummary};

mod session;
pub use session::Session;
