use crate::auth::password::hash_password;
use crate::db::DbPool;
use crate::dto::DriverCreationForm;
use crate::models::{Account, Driver, DriverDetail, DriverRecord};
use crate::pagination::Page;
use crate::schema::{accounts, drivers};
use crate::search::LIKE_ESCAPE;
use anyhow::Result;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use tracing::{debug, info, instrument};

use super::car_repo::cars_for_driver;

/// Loads a driver (account joined with its driver row) on an open connection
pub(crate) fn load_driver(conn: &mut SqliteConnection, account_id: &str) -> QueryResult<Option<Driver>> {
    let row = accounts::table
        .inner_join(drivers::table)
        .filter(accounts::id.eq(account_id))
        .select((Account::as_select(), DriverRecord::as_select()))
        .first::<(Account, DriverRecord)>(conn)
        .optional()?;

    Ok(row.map(|(account, record)| Driver::from_parts(account, record)))
}

/// Registers a new driver
///
/// Hashes the password and writes the account and driver rows in one
/// transaction, so a duplicate license number leaves no orphaned account.
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `form` - A form that has already passed `DriverCreationForm::validate`
///
/// ### Returns
///
/// A Result containing the newly created Driver if successful
///
/// ### Errors
///
/// Returns an error if:
/// - Password hashing fails
/// - Unable to get a connection from the pool
/// - The username or license number is already taken (UNIQUE violation)
#[instrument(skip(pool, form), fields(username = %form.username))]
pub fn create_driver(pool: &DbPool, form: &DriverCreationForm) -> Result<Driver> {
    let password_hash = hash_password(&form.password1)?;

    let account = Account::new(
        form.username.clone(),
        form.first_name.clone(),
        form.last_name.clone(),
        password_hash,
    );
    let record = DriverRecord::new(account.get_id(), form.license_number.clone());

    let conn = &mut pool.get()?;

    conn.transaction::<_, diesel::result::Error, _>(|conn| {
        diesel::insert_into(accounts::table)
            .values(&account)
            .execute(conn)?;

        diesel::insert_into(drivers::table)
            .values(&record)
            .execute(conn)?;

        Ok(())
    })?;

    info!("Created driver {}", account.get_id());

    Ok(Driver::from_parts(account, record))
}

/// Retrieves a driver by account ID
pub fn get_driver(pool: &DbPool, driver_id: &str) -> Result<Option<Driver>> {
    let conn = &mut pool.get()?;
    Ok(load_driver(conn, driver_id)?)
}

/// Retrieves a driver with the cars assigned to them
pub fn get_driver_detail(pool: &DbPool, driver_id: &str) -> Result<Option<DriverDetail>> {
    let conn = &mut pool.get()?;

    let Some(driver) = load_driver(conn, driver_id)? else {
        return Ok(None);
    };
    let cars = cars_for_driver(conn, driver_id)?;

    Ok(Some(DriverDetail { driver, cars }))
}

/// Looks up a driver by exact username
pub fn find_driver_by_username(pool: &DbPool, username: &str) -> Result<Option<Driver>> {
    let conn = &mut pool.get()?;

    let row = accounts::table
        .inner_join(drivers::table)
        .filter(accounts::username.eq(username))
        .select((Account::as_select(), DriverRecord::as_select()))
        .first::<(Account, DriverRecord)>(conn)
        .optional()?;

    Ok(row.map(|(account, record)| Driver::from_parts(account, record)))
}

/// Whether an account already uses `username`
pub fn username_taken(pool: &DbPool, username: &str) -> Result<bool> {
    let conn = &mut pool.get()?;

    let existing = accounts::table
        .filter(accounts::username.eq(username))
        .select(accounts::id)
        .first::<String>(conn)
        .optional()?;

    Ok(existing.is_some())
}

/// Whether a driver other than `except` holds `license_number`
pub fn license_number_taken(pool: &DbPool, license_number: &str, except: Option<&str>) -> Result<bool> {
    let conn = &mut pool.get()?;

    let mut query = drivers::table
        .filter(drivers::license_number.eq(license_number))
        .select(drivers::account_id)
        .into_boxed();

    if let Some(except) = except {
        query = query.filter(drivers::account_id.ne(except));
    }

    Ok(query.first::<String>(conn).optional()?.is_some())
}

/// Returns those of `driver_ids` that belong to existing drivers
pub fn existing_driver_ids(pool: &DbPool, driver_ids: &[String]) -> Result<Vec<String>> {
    if driver_ids.is_empty() {
        return Ok(Vec::new());
    }

    let conn = &mut pool.get()?;

    let found = drivers::table
        .filter(drivers::account_id.eq_any(driver_ids))
        .select(drivers::account_id)
        .load::<String>(conn)?;

    Ok(found)
}

/// Counts drivers whose username matches `pattern` (all when `None`)
pub fn count_drivers(pool: &DbPool, pattern: Option<&str>) -> Result<i64> {
    let conn = &mut pool.get()?;

    let mut query = accounts::table
        .inner_join(drivers::table)
        .select(diesel::dsl::count_star())
        .into_boxed();

    if let Some(pattern) = pattern {
        query = query.filter(accounts::username.like(pattern).escape(LIKE_ESCAPE));
    }

    Ok(query.get_result::<i64>(conn)?)
}

/// Lists one page of drivers ordered by username
#[instrument(skip(pool), fields(pattern = ?pattern, page = page.page))]
pub fn search_drivers(pool: &DbPool, pattern: Option<&str>, page: &Page) -> Result<Vec<Driver>> {
    debug!("Searching drivers");

    let conn = &mut pool.get()?;

    let mut query = accounts::table
        .inner_join(drivers::table)
        .select((Account::as_select(), DriverRecord::as_select()))
        .into_boxed();

    if let Some(pattern) = pattern {
        query = query.filter(accounts::username.like(pattern).escape(LIKE_ESCAPE));
    }

    let rows = query
        .order(accounts::username.asc())
        .limit(page.limit())
        .offset(page.offset())
        .load::<(Account, DriverRecord)>(conn)?;

    debug!("Found {} drivers", rows.len());

    Ok(rows
        .into_iter()
        .map(|(account, record)| Driver::from_parts(account, record))
        .collect())
}

/// Replaces a driver's license number
///
/// ### Returns
///
/// The updated Driver, or None if no driver has that ID
#[instrument(skip(pool), fields(driver_id = %driver_id))]
pub fn update_license_number(pool: &DbPool, driver_id: &str, license_number: &str) -> Result<Option<Driver>> {
    let conn = &mut pool.get()?;

    let updated = diesel::update(drivers::table.find(driver_id))
        .set(drivers::license_number.eq(license_number))
        .execute(conn)?;

    if updated == 0 {
        return Ok(None);
    }

    info!("Updated license number");

    Ok(load_driver(conn, driver_id)?)
}

/// Deletes a driver's account
///
/// The driver row, sessions, and car assignments go with it through the
/// foreign key cascades.
#[instrument(skip(pool), fields(driver_id = %driver_id))]
pub fn delete_driver(pool: &DbPool, driver_id: &str) -> Result<bool> {
    let conn = &mut pool.get()?;

    let deleted = diesel::delete(accounts::table.find(driver_id)).execute(conn)?;

    if deleted > 0 {
        info!("Deleted driver");
    }

    Ok(deleted > 0)
}
