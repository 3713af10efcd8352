/// Web API Handlers
///
/// This module contains the handlers for the JSON API endpoints.
/// Each handler is responsible for processing a specific type of HTTP request,
/// extracting the necessary data, calling the appropriate repository functions,
/// and returning a properly formatted response. Every handler except login
/// takes a `CurrentDriver`, so requests without a live session never reach it.

mod account_handlers;
mod manufacturer_handlers;
mod driver_handlers;
mod car_handlers;

// Re-export all handlers
pub use account_handlers::*;
pub use manufacturer_handlers::*;
pub use driver_handlers::*;
pub use car_handlers::*;
