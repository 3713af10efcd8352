use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Redirect,
    Json,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::auth::CurrentDriver;
use crate::config::Config;
use crate::db::DbPool;
use crate::dto::CarForm;
use crate::errors::ApiError;
use crate::models::{CarDetail, CarSummary};
use crate::pagination::{ListPage, Page, PageParams};
use crate::repo;
use crate::search::{CarSearch, SearchForm};
use crate::validation::FieldErrors;

/// Validates a car form, including that its manufacturer and drivers exist
fn clean_car_form(pool: &DbPool, payload: &CarForm) -> Result<CarForm, ApiError> {
    let form = payload.validate()?;

    let mut errors = FieldErrors::new();
    if repo::get_manufacturer(pool, &form.manufacturer_id)?.is_none() {
        errors.add(
            "manufacturer_id",
            "Select a valid choice. That choice is not one of the available choices.",
        );
    }

    let known = repo::existing_driver_ids(pool, &form.driver_ids)?;
    for driver_id in form.driver_ids.iter().filter(|id| !known.contains(id)) {
        errors.add(
            "driver_ids",
            format!("Select a valid choice. {} is not one of the available choices.", driver_id),
        );
    }

    Ok(errors.into_result(form)?)
}

/// Handler for listing cars
///
/// This function handles GET requests to `/cars`.
///
/// ### Arguments
///
/// * `pool` - The database connection pool
/// * `config` - Server configuration, for the page size
/// * `search` - The `model` search parameter
/// * `params` - The `page` parameter
///
/// ### Returns
///
/// One page of cars with their manufacturers ordered by model, with the
/// search form echoed back
#[instrument(skip(pool, config, _current), fields(model = ?search.model, page = ?params.page))]
pub async fn list_cars_handler(
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    _current: CurrentDriver,
    Query(search): Query<CarSearch>,
    Query(params): Query<PageParams>,
) -> Result<Json<ListPage<CarSummary>>, ApiError> {
    debug!("Listing cars");

    let pattern = search.pattern();
    let total = repo::count_cars(&pool, pattern.as_deref())?;
    let page = Page::new(total, config.page_size, params.page)?;
    let cars = repo::search_cars(&pool, pattern.as_deref(), &page)?;

    info!("Retrieved {} of {} cars", cars.len(), total);

    Ok(Json(ListPage::new(search.bound(), cars, page)))
}

/// Handler for creating a car
///
/// This function handles POST requests to `/cars`.
#[instrument(skip(pool, _current, payload), fields(model = %payload.model))]
pub async fn create_car_handler(
    State(pool): State<Arc<DbPool>>,
    _current: CurrentDriver,
    Json(payload): Json<CarForm>,
) -> Result<Json<CarDetail>, ApiError> {
    info!("Creating new car");

    let form = clean_car_form(&pool, &payload)?;
    let car = repo::create_car(&pool, &form)?;

    info!("Successfully created car with id: {}", car.car.get_id());

    Ok(Json(car))
}

/// Handler for retrieving a car with its manufacturer and drivers
///
/// This function handles GET requests to `/cars/{id}`.
#[instrument(skip(pool, _current), fields(car_id = %car_id))]
pub async fn get_car_handler(
    State(pool): State<Arc<DbPool>>,
    _current: CurrentDriver,
    Path(car_id): Path<String>,
) -> Result<Json<CarDetail>, ApiError> {
    debug!("Getting car");

    let car = repo::get_car_detail(&pool, &car_id)?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(car))
}

/// Handler for updating a car
///
/// This function handles PUT requests to `/cars/{id}`. The submitted
/// `driver_ids` replace the car's current drivers.
#[instrument(skip(pool, _current, payload), fields(car_id = %car_id))]
pub async fn update_car_handler(
    State(pool): State<Arc<DbPool>>,
    _current: CurrentDriver,
    Path(car_id): Path<String>,
    Json(payload): Json<CarForm>,
) -> Result<Json<CarDetail>, ApiError> {
    info!("Updating car");

    repo::get_car(&pool, &car_id)?.ok_or(ApiError::NotFound)?;

    let form = clean_car_form(&pool, &payload)?;
    let car = repo::update_car(&pool, &car_id, &form)?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(car))
}

/// Handler for deleting a car
///
/// This function handles DELETE requests to `/cars/{id}`.
#[instrument(skip(pool, _current), fields(car_id = %car_id))]
pub async fn delete_car_handler(
    State(pool): State<Arc<DbPool>>,
    _current: CurrentDriver,
    Path(car_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if !repo::delete_car(&pool, &car_id)? {
        return Err(ApiError::NotFound);
    }

    info!("Successfully deleted car");

    Ok(StatusCode::NO_CONTENT)
}

/// Handler for toggling the signed-in driver's assignment to a car
///
/// This function handles POST requests to `/cars/{id}/toggle-assign`.
///
/// ### Returns
///
/// `303 See Other` pointing at the car's detail endpoint
#[instrument(skip(pool, current), fields(car_id = %car_id, driver_id = %current.driver.get_id()))]
pub async fn toggle_assign_handler(
    State(pool): State<Arc<DbPool>>,
    current: CurrentDriver,
    Path(car_id): Path<String>,
) -> Result<Redirect, ApiError> {
    let (change, car) = repo::toggle_assignment(&pool, &current.driver.get_id(), &car_id)?
        .ok_or(ApiError::NotFound)?;

    info!("Driver {} car {}", change, car.car.get_id());

    Ok(Redirect::to(&format!("/cars/{}", car_id)))
}
