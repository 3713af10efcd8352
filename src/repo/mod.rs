/// Repository module
///
/// This module provides the data access layer for the application.
/// Every function checks out one connection from the pool and returns an
/// `anyhow::Result`. Listing functions take the optional `LIKE` pattern built
/// by a search form and the page to load.

mod manufacturer_repo;
mod driver_repo;
mod car_repo;
mod session_repo;

// Re-export all repository functions
pub use manufacturer_repo::*;
pub use driver_repo::*;
pub use car_repo::*;
pub use session_repo::*;
