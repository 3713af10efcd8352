use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::auth::CurrentDriver;
use crate::config::Config;
use crate::db::DbPool;
use crate::dto::{DriverCreationForm, DriverLicenseUpdateForm};
use crate::errors::{conflict_or_database, ApiError};
use crate::models::{Driver, DriverDetail};
use crate::pagination::{ListPage, Page, PageParams};
use crate::repo;
use crate::search::{DriverSearch, SearchForm};
use crate::validation::FieldErrors;

const DUPLICATE_USERNAME: &str = "A user with that username already exists.";
const DUPLICATE_LICENSE: &str = "Driver with this License number already exists.";

/// Validates a creation form and checks username and license number are free
///
/// Shared with the `create-driver` command of the server binary.
pub fn clean_driver_creation(pool: &DbPool, payload: &DriverCreationForm) -> Result<DriverCreationForm, ApiError> {
    let form = payload.validate()?;

    let mut errors = FieldErrors::new();
    if repo::username_taken(pool, &form.username)? {
        errors.add("username", DUPLICATE_USERNAME);
    }
    if repo::license_number_taken(pool, &form.license_number, None)? {
        errors.add("license_number", DUPLICATE_LICENSE);
    }

    Ok(errors.into_result(form)?)
}

/// Runs a validated creation form against the database
pub fn register_driver(pool: &DbPool, payload: &DriverCreationForm) -> Result<Driver, ApiError> {
    let form = clean_driver_creation(pool, payload)?;

    repo::create_driver(pool, &form)
        .map_err(|e| conflict_or_database(e, "Username or license number is already in use."))
}

/// Handler for listing drivers
///
/// This function handles GET requests to `/drivers`.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `config` - Server configuration, for the page size
/// * `search` - The `username` search parameter
/// * `params` - The `page` parameter
///
/// ### Returns
///
/// One page of drivers ordered by username, with the search form echoed back
#[instrument(skip(pool, config, _current), fields(username = ?search.username, page = ?params.page))]
pub async fn list_drivers_handler(
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    _current: CurrentDriver,
    Query(search): Query<DriverSearch>,
    Query(params): Query<PageParams>,
) -> Result<Json<ListPage<Driver>>, ApiError> {
    debug!("Listing drivers");

    let pattern = search.pattern();
    let total = repo::count_drivers(&pool, pattern.as_deref())?;
    let page = Page::new(total, config.page_size, params.page)?;
    let drivers = repo::search_drivers(&pool, pattern.as_deref(), &page)?;

    info!("Retrieved {} of {} drivers", drivers.len(), total);

    Ok(Json(ListPage::new(search.bound(), drivers, page)))
}

/// Handler for registering a driver
///
/// This function handles POST requests to `/drivers`.
///
/// ### Returns
///
/// The new driver as JSON, or `422` listing every field that failed
#[instrument(skip(pool, _current, payload), fields(username = %payload.username))]
pub async fn create_driver_handler(
    State(pool): State<Arc<DbPool>>,
    _current: CurrentDriver,
    Json(payload): Json<DriverCreationForm>,
) -> Result<Json<Driver>, ApiError> {
    info!("Creating new driver");

    let driver = register_driver(&pool, &payload)?;

    info!("Successfully created driver with id: {}", driver.get_id());

    Ok(Json(driver))
}

/// Handler for retrieving a driver with their cars
///
/// This function handles GET requests to `/drivers/{id}`.
#[instrument(skip(pool, _current), fields(driver_id = %driver_id))]
pub async fn get_driver_handler(
    State(pool): State<Arc<DbPool>>,
    _current: CurrentDriver,
    Path(driver_id): Path<String>,
) -> Result<Json<DriverDetail>, ApiError> {
    debug!("Getting driver");

    let detail = repo::get_driver_detail(&pool, &driver_id)?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(detail))
}

/// Handler for changing a driver's license number
///
/// This function handles PUT requests to `/drivers/{id}/license`.
#[instrument(skip(pool, _current, payload), fields(driver_id = %driver_id))]
pub async fn update_license_handler(
    State(pool): State<Arc<DbPool>>,
    _current: CurrentDriver,
    Path(driver_id): Path<String>,
    Json(payload): Json<DriverLicenseUpdateForm>,
) -> Result<Json<Driver>, ApiError> {
    info!("Updating license number");

    repo::get_driver(&pool, &driver_id)?.ok_or(ApiError::NotFound)?;

    let license_number = payload.validate()?;
    if repo::license_number_taken(&pool, &license_number, Some(&driver_id))? {
        let mut errors = FieldErrors::new();
        errors.add("license_number", DUPLICATE_LICENSE);
        return Err(errors.into());
    }

    let driver = repo::update_license_number(&pool, &driver_id, &license_number)
        .map_err(|e| conflict_or_database(e, DUPLICATE_LICENSE))?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(driver))
}

/// Handler for deleting a driver
///
/// This function handles DELETE requests to `/drivers/{id}`. The driver's
/// sessions and car assignments go with the account.
#[instrument(skip(pool, _current), fields(driver_id = %driver_id))]
pub async fn delete_driver_handler(
    State(pool): State<Arc<DbPool>>,
    _current: CurrentDriver,
    Path(driver_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if !repo::delete_driver(&pool, &driver_id)? {
        return Err(ApiError::NotFound);
    }

    info!("Successfully deleted driver");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests;
