/// Taxi: a fleet registry for a taxi service
///
/// This library provides the core functionality of the fleet service: the
/// manufacturers, cars, and drivers it keeps, the license number rules
/// drivers must satisfy, search and pagination for the listings, and
/// assigning drivers to cars. Everything is served as a JSON API behind a
/// session login.
///
/// ### Modules
///
/// - `db`: Database connection management
/// - `models`: Data structures representing manufacturers, cars, drivers, and sessions
/// - `repo`: Repository layer for database operations
/// - `schema`: Database schema definitions
/// - `validation`: License number rules and per-field form errors
/// - `search`: Search forms for the listings
///
/// ### Web API
///
/// - `GET /`: Fleet overview
/// - `POST /accounts/login`, `POST /accounts/logout`: Session management
/// - `GET|POST /manufacturers`, `GET|PUT|DELETE /manufacturers/{id}`
/// - `GET|POST /cars`, `GET|PUT|DELETE /cars/{id}`
/// - `POST /cars/{id}/toggle-assign`: Assign or unassign the signed-in driver
/// - `GET|POST /drivers`, `GET|DELETE /drivers/{id}`, `PUT /drivers/{id}/license`

/// Login, password hashing, and the session extractor
pub mod auth;

/// Layered configuration
pub mod config;

/// Database connection module
pub mod db;

/// Data transfer objects and forms
pub mod dto;

/// API error type
pub mod errors;

/// Request handlers
pub mod handlers;

/// Data models module
pub mod models;

/// Page arithmetic for the listings
pub mod pagination;

/// Repository module for database operations
pub mod repo;

/// Database schema module
pub mod schema;

/// Listing search forms
pub mod search;

/// License number validation
pub mod validation;

#[cfg(test)]
pub mod test_utils;

use axum::{
    extract::FromRef,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::DbPool;
use crate::handlers::*;

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub pool: Arc<DbPool>,
    pub config: Arc<Config>,
}

impl FromRef<AppState> for Arc<DbPool> {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Arc<Config> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

/// Creates the application router with all routes
///
/// ### Arguments
///
/// * `pool` - The database connection pool to be shared with all handlers
/// * `config` - Settings the handlers read (page size, session lifetime)
///
/// ### Returns
///
/// An Axum Router configured with all routes and request tracing
pub fn create_app(pool: Arc<DbPool>, config: Config) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config),
    };

    Router::new()
        // Fleet overview
        .route("/", get(index_handler))
        // Sessions
        .route("/accounts/login", post(login_handler))
        .route("/accounts/logout", post(logout_handler))
        // Manufacturers
        .route("/manufacturers", get(list_manufacturers_handler).post(create_manufacturer_handler))
        .route(
            "/manufacturers/{id}",
            get(get_manufacturer_handler)
                .put(update_manufacturer_handler)
                .delete(delete_manufacturer_handler),
        )
        // Cars
        .route("/cars", get(list_cars_handler).post(create_car_handler))
        .route(
            "/cars/{id}",
            get(get_car_handler).put(update_car_handler).delete(delete_car_handler),
        )
        .route("/cars/{id}/toggle-assign", post(toggle_assign_handler))
        // Drivers
        .route("/drivers", get(list_drivers_handler).post(create_driver_handler))
        .route("/drivers/{id}", get(get_driver_handler).delete(delete_driver_handler))
        .route("/drivers/{id}/license", put(update_license_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Runs the embedded migrations
///
/// ### Arguments
///
/// * `conn` - A mutable reference to a SQLite connection
pub fn run_migrations(conn: &mut diesel::SqliteConnection) -> anyhow::Result<()> {
    use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

    const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;

    Ok(())
}
