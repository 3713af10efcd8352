use crate::db::DbPool;
use crate::dto::CarForm;
use crate::models::{
    Account, AssignmentChange, Car, CarDetail, CarDriver, CarSummary, Driver, DriverRecord, Manufacturer,
};
use crate::pagination::Page;
use crate::schema::{accounts, car_drivers, cars, drivers, manufacturers};
use crate::search::LIKE_ESCAPE;
use anyhow::Result;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use tracing::{debug, info, instrument};

/// Drivers assigned to a car, ordered by username
pub(crate) fn drivers_for_car(conn: &mut SqliteConnection, car_id: &str) -> QueryResult<Vec<Driver>> {
    let rows = car_drivers::table
        .inner_join(drivers::table.inner_join(accounts::table))
        .filter(car_drivers::car_id.eq(car_id))
        .order(accounts::username.asc())
        .select((Account::as_select(), DriverRecord::as_select()))
        .load::<(Account, DriverRecord)>(conn)?;

    Ok(rows
        .into_iter()
        .map(|(account, record)| Driver::from_parts(account, record))
        .collect())
}

/// Cars assigned to a driver, ordered by model
pub(crate) fn cars_for_driver(conn: &mut SqliteConnection, driver_id: &str) -> QueryResult<Vec<CarSummary>> {
    let rows = car_drivers::table
        .inner_join(cars::table.inner_join(manufacturers::table))
        .filter(car_drivers::driver_id.eq(driver_id))
        .order(cars::model.asc())
        .select((Car::as_select(), Manufacturer::as_select()))
        .load::<(Car, Manufacturer)>(conn)?;

    Ok(rows
        .into_iter()
        .map(|(car, manufacturer)| CarSummary { car, manufacturer })
        .collect())
}

fn load_car_detail(conn: &mut SqliteConnection, car_id: &str) -> QueryResult<Option<CarDetail>> {
    let row = cars::table
        .inner_join(manufacturers::table)
        .filter(cars::id.eq(car_id))
        .select((Car::as_select(), Manufacturer::as_select()))
        .first::<(Car, Manufacturer)>(conn)
        .optional()?;

    let Some((car, manufacturer)) = row else {
        return Ok(None);
    };
    let drivers = drivers_for_car(conn, car_id)?;

    Ok(Some(CarDetail {
        car,
        manufacturer,
        drivers,
    }))
}

fn assign_drivers(conn: &mut SqliteConnection, car_id: &str, driver_ids: &[String]) -> QueryResult<()> {
    if driver_ids.is_empty() {
        return Ok(());
    }

    let rows: Vec<CarDriver> = driver_ids
        .iter()
        .map(|driver_id| CarDriver::new(car_id.to_string(), driver_id.clone()))
        .collect();

    diesel::insert_into(car_drivers::table)
        .values(&rows)
        .execute(conn)?;

    Ok(())
}

/// Creates a new car with its initial drivers
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `form` - A validated car form whose manufacturer and drivers exist
///
/// ### Returns
///
/// A Result containing the new car with its manufacturer and drivers
///
/// ### Errors
///
/// Returns an error if:
/// - Unable to get a connection from the pool
/// - The manufacturer or a driver does not exist (FOREIGN KEY violation)
/// - The database insert operation fails
#[instrument(skip(pool, form), fields(model = %form.model))]
pub fn create_car(pool: &DbPool, form: &CarForm) -> Result<CarDetail> {
    let conn = &mut pool.get()?;

    let car = Car::new(form.model.clone(), form.manufacturer_id.clone());

    let detail = conn.transaction::<_, diesel::result::Error, _>(|conn| {
        diesel::insert_into(cars::table).values(&car).execute(conn)?;
        assign_drivers(conn, &car.get_id(), &form.driver_ids)?;
        load_car_detail(conn, &car.get_id())?.ok_or(diesel::result::Error::NotFound)
    })?;

    info!("Created car {} with {} drivers", car.get_id(), detail.drivers.len());

    Ok(detail)
}

/// Retrieves a car by its ID
pub fn get_car(pool: &DbPool, car_id: &str) -> Result<Option<Car>> {
    let conn = &mut pool.get()?;

    let result = cars::table
        .find(car_id)
        .first::<Car>(conn)
        .optional()?;

    Ok(result)
}

/// Retrieves a car with its manufacturer and assigned drivers
pub fn get_car_detail(pool: &DbPool, car_id: &str) -> Result<Option<CarDetail>> {
    let conn = &mut pool.get()?;
    Ok(load_car_detail(conn, car_id)?)
}

/// Cars assigned to a driver, ordered by model
pub fn list_cars_for_driver(pool: &DbPool, driver_id: &str) -> Result<Vec<CarSummary>> {
    let conn = &mut pool.get()?;
    Ok(cars_for_driver(conn, driver_id)?)
}

/// Drivers assigned to a car, ordered by username
pub fn list_drivers_for_car(pool: &DbPool, car_id: &str) -> Result<Vec<Driver>> {
    let conn = &mut pool.get()?;
    Ok(drivers_for_car(conn, car_id)?)
}

/// Counts cars whose model matches `pattern` (all when `None`)
pub fn count_cars(pool: &DbPool, pattern: Option<&str>) -> Result<i64> {
    let conn = &mut pool.get()?;

    let mut query = cars::table
        .select(diesel::dsl::count_star())
        .into_boxed();

    if let Some(pattern) = pattern {
        query = query.filter(cars::model.like(pattern).escape(LIKE_ESCAPE));
    }

    Ok(query.get_result::<i64>(conn)?)
}

/// Lists one page of cars, each with its manufacturer, ordered by model
#[instrument(skip(pool), fields(pattern = ?pattern, page = page.page))]
pub fn search_cars(pool: &DbPool, pattern: Option<&str>, page: &Page) -> Result<Vec<CarSummary>> {
    debug!("Searching cars");

    let conn = &mut pool.get()?;

    let mut query = cars::table
        .inner_join(manufacturers::table)
        .select((Car::as_select(), Manufacturer::as_select()))
        .into_boxed();

    if let Some(pattern) = pattern {
        query = query.filter(cars::model.like(pattern).escape(LIKE_ESCAPE));
    }

    let rows = query
        .order((cars::model.asc(), cars::id.asc()))
        .limit(page.limit())
        .offset(page.offset())
        .load::<(Car, Manufacturer)>(conn)?;

    debug!("Found {} cars", rows.len());

    Ok(rows
        .into_iter()
        .map(|(car, manufacturer)| CarSummary { car, manufacturer })
        .collect())
}

/// Replaces a car's model, manufacturer, and driver set
///
/// ### Returns
///
/// The updated car, or None if no car has that ID
#[instrument(skip(pool, form), fields(car_id = %car_id))]
pub fn update_car(pool: &DbPool, car_id: &str, form: &CarForm) -> Result<Option<CarDetail>> {
    let conn = &mut pool.get()?;

    let detail = conn.transaction::<_, diesel::result::Error, _>(|conn| {
        let updated = diesel::update(cars::table.find(car_id))
            .set((
                cars::model.eq(&form.model),
                cars::manufacturer_id.eq(&form.manufacturer_id),
            ))
            .execute(conn)?;

        if updated == 0 {
            return Ok(None);
        }

        diesel::delete(car_drivers::table.filter(car_drivers::car_id.eq(car_id))).execute(conn)?;
        assign_drivers(conn, car_id, &form.driver_ids)?;

        load_car_detail(conn, car_id)
    })?;

    if detail.is_some() {
        info!("Updated car");
    }

    Ok(detail)
}

/// Deletes a car and its assignments
#[instrument(skip(pool), fields(car_id = %car_id))]
pub fn delete_car(pool: &DbPool, car_id: &str) -> Result<bool> {
    let conn = &mut pool.get()?;

    let deleted = diesel::delete(cars::table.find(car_id)).execute(conn)?;

    if deleted > 0 {
        info!("Deleted car");
    }

    Ok(deleted > 0)
}

/// Flips whether a driver is assigned to a car
///
/// Removes the assignment when it exists and adds it otherwise. The check
/// and the write run in one transaction.
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `driver_id` - The driver being assigned or unassigned
/// * `car_id` - The car
///
/// ### Returns
///
/// What changed together with the car as it now stands, or None if the car
/// does not exist
#[instrument(skip(pool), fields(driver_id = %driver_id, car_id = %car_id))]
pub fn toggle_assignment(
    pool: &DbPool,
    driver_id: &str,
    car_id: &str,
) -> Result<Option<(AssignmentChange, CarDetail)>> {
    let conn = &mut pool.get()?;

    let result = conn.transaction::<_, diesel::result::Error, _>(|conn| {
        let car_exists = cars::table
            .find(car_id)
            .select(cars::id)
            .first::<String>(conn)
            .optional()?
            .is_some();

        if !car_exists {
            return Ok(None);
        }

        let removed = diesel::delete(car_drivers::table.find((car_id, driver_id))).execute(conn)?;

        let change = if removed > 0 {
            AssignmentChange::Unassigned
        } else {
            diesel::insert_into(car_drivers::table)
                .values(&CarDriver::new(car_id.to_string(), driver_id.to_string()))
                .execute(conn)?;
            AssignmentChange::Assigned
        };

        Ok(load_car_detail(conn, car_id)?.map(|detail| (change, detail)))
    })?;

    if let Some((change, _)) = &result {
        info!("Driver {}", change);
    }

    Ok(result)
}
