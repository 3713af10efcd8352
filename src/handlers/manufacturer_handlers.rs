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
use crate::dto::ManufacturerForm;
use crate::errors::{conflict_or_database, ApiError};
use crate::models::Manufacturer;
use crate::pagination::{ListPage, Page, PageParams};
use crate::repo;
use crate::search::{ManufacturerSearch, SearchForm};
use crate::validation::FieldErrors;

const DUPLICATE_NAME: &str = "Manufacturer with this Name already exists.";

/// Rejects a name already used by a manufacturer other than `except`
fn check_name_unused(pool: &DbPool, form: &ManufacturerForm, except: Option<&str>) -> Result<(), ApiError> {
    let existing = repo::find_manufacturer_by_name(pool, &form.name)?;

    match existing {
        Some(m) if Some(m.get_id().as_str()) != except => {
            let mut errors = FieldErrors::new();
            errors.add("name", DUPLICATE_NAME);
            Err(errors.into())
        }
        _ => Ok(()),
    }
}

/// Handler for listing manufacturers
///
/// This function handles GET requests to `/manufacturers`.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `config` - Server configuration, for the page size
/// * `search` - The `name` search parameter
/// * `params` - The `page` parameter
///
/// ### Returns
///
/// One page of manufacturers ordered by name, with the search form echoed back
#[instrument(skip(pool, config, _current), fields(name = ?search.name, page = ?params.page))]
pub async fn list_manufacturers_handler(
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    _current: CurrentDriver,
    Query(search): Query<ManufacturerSearch>,
    Query(params): Query<PageParams>,
) -> Result<Json<ListPage<Manufacturer>>, ApiError> {
    debug!("Listing manufacturers");

    let pattern = search.pattern();
    let total = repo::count_manufacturers(&pool, pattern.as_deref())?;
    let page = Page::new(total, config.page_size, params.page)?;
    let manufacturers = repo::search_manufacturers(&pool, pattern.as_deref(), &page)?;

    info!("Retrieved {} of {} manufacturers", manufacturers.len(), total);

    Ok(Json(ListPage::new(search.bound(), manufacturers, page)))
}

/// Handler for creating a manufacturer
///
/// This function handles POST requests to `/manufacturers`.
#[instrument(skip(pool, _current, payload), fields(name = %payload.name))]
pub async fn create_manufacturer_handler(
    State(pool): State<Arc<DbPool>>,
    _current: CurrentDriver,
    Json(payload): Json<ManufacturerForm>,
) -> Result<Json<Manufacturer>, ApiError> {
    info!("Creating new manufacturer");

    let form = payload.validate()?;
    check_name_unused(&pool, &form, None)?;

    let manufacturer = repo::create_manufacturer(&pool, &form)
        .map_err(|e| conflict_or_database(e, DUPLICATE_NAME))?;

    info!("Successfully created manufacturer with id: {}", manufacturer.get_id());

    Ok(Json(manufacturer))
}

/// Handler for retrieving a manufacturer
///
/// This function handles GET requests to `/manufacturers/{id}`.
#[instrument(skip(pool, _current), fields(manufacturer_id = %manufacturer_id))]
pub async fn get_manufacturer_handler(
    State(pool): State<Arc<DbPool>>,
    _current: CurrentDriver,
    Path(manufacturer_id): Path<String>,
) -> Result<Json<Manufacturer>, ApiError> {
    debug!("Getting manufacturer");

    let manufacturer = repo::get_manufacturer(&pool, &manufacturer_id)?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(manufacturer))
}

/// Handler for updating a manufacturer
///
/// This function handles PUT requests to `/manufacturers/{id}`.
#[instrument(skip(pool, _current, payload), fields(manufacturer_id = %manufacturer_id))]
pub async fn update_manufacturer_handler(
    State(pool): State<Arc<DbPool>>,
    _current: CurrentDriver,
    Path(manufacturer_id): Path<String>,
    Json(payload): Json<ManufacturerForm>,
) -> Result<Json<Manufacturer>, ApiError> {
    info!("Updating manufacturer");

    repo::get_manufacturer(&pool, &manufacturer_id)?.ok_or(ApiError::NotFound)?;

    let form = payload.validate()?;
    check_name_unused(&pool, &form, Some(&manufacturer_id))?;

    let manufacturer = repo::update_manufacturer(&pool, &manufacturer_id, &form)
        .map_err(|e| conflict_or_database(e, DUPLICATE_NAME))?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(manufacturer))
}

/// Handler for deleting a manufacturer
///
/// This function handles DELETE requests to `/manufacturers/{id}`. The
/// manufacturer's cars are deleted with it.
#[instrument(skip(pool, _current), fields(manufacturer_id = %manufacturer_id))]
pub async fn delete_manufacturer_handler(
    State(pool): State<Arc<DbPool>>,
    _current: CurrentDriver,
    Path(manufacturer_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if !repo::delete_manufacturer(&pool, &manufacturer_id)? {
        return Err(ApiError::NotFound);
    }

    info!("Successfully deleted manufacturer");

    Ok(StatusCode::NO_CONTENT)
}
