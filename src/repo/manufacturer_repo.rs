use crate::db::DbPool;
use crate::dto::ManufacturerForm;
use crate::models::Manufacturer;
use crate::pagination::Page;
use crate::schema::manufacturers;
use crate::search::LIKE_ESCAPE;
use anyhow::Result;
use diesel::prelude::*;
use tracing::{debug, info, instrument};

/// Creates a new manufacturer in the database
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `form` - A validated manufacturer form
///
/// ### Returns
///
/// A Result containing the newly created Manufacturer if successful
///
/// ### Errors
///
/// Returns an error if:
/// - Unable to get a connection from the pool
/// - The name is already taken (UNIQUE violation)
/// - The database insert operation fails
#[instrument(skip(pool, form), fields(name = %form.name))]
pub fn create_manufacturer(pool: &DbPool, form: &ManufacturerForm) -> Result<Manufacturer> {
    let conn = &mut pool.get()?;

    let new_manufacturer = Manufacturer::new(form.name.clone(), form.country.clone());

    diesel::insert_into(manufacturers::table)
        .values(&new_manufacturer)
        .execute(conn)?;

    info!("Created manufacturer {}", new_manufacturer.get_id());

    Ok(new_manufacturer)
}

/// Retrieves a manufacturer by its ID
///
/// ### Returns
///
/// A Result containing the Manufacturer if found, or None if not found
pub fn get_manufacturer(pool: &DbPool, manufacturer_id: &str) -> Result<Option<Manufacturer>> {
    let conn = &mut pool.get()?;

    let result = manufacturers::table
        .find(manufacturer_id)
        .first::<Manufacturer>(conn)
        .optional()?;

    Ok(result)
}

/// Looks up a manufacturer by its exact name
pub fn find_manufacturer_by_name(pool: &DbPool, name: &str) -> Result<Option<Manufacturer>> {
    let conn = &mut pool.get()?;

    let result = manufacturers::table
        .filter(manufacturers::name.eq(name))
        .first::<Manufacturer>(conn)
        .optional()?;

    Ok(result)
}

/// Counts manufacturers whose name matches `pattern` (all when `None`)
pub fn count_manufacturers(pool: &DbPool, pattern: Option<&str>) -> Result<i64> {
    let conn = &mut pool.get()?;

    let mut query = manufacturers::table
        .select(diesel::dsl::count_star())
        .into_boxed();

    if let Some(pattern) = pattern {
        query = query.filter(manufacturers::name.like(pattern).escape(LIKE_ESCAPE));
    }

    Ok(query.get_result::<i64>(conn)?)
}

/// Lists one page of manufacturers ordered by name
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `pattern` - `LIKE` pattern for the name, or None for all manufacturers
/// * `page` - The page to load
#[instrument(skip(pool), fields(pattern = ?pattern, page = page.page))]
pub fn search_manufacturers(pool: &DbPool, pattern: Option<&str>, page: &Page) -> Result<Vec<Manufacturer>> {
    debug!("Searching manufacturers");

    let conn = &mut pool.get()?;

    let mut query = manufacturers::table.into_boxed();

    if let Some(pattern) = pattern {
        query = query.filter(manufacturers::name.like(pattern).escape(LIKE_ESCAPE));
    }

    let result = query
        .order(manufacturers::name.asc())
        .limit(page.limit())
        .offset(page.offset())
        .load::<Manufacturer>(conn)?;

    debug!("Found {} manufacturers", result.len());

    Ok(result)
}

/// Replaces a manufacturer's name and country
///
/// ### Returns
///
/// The updated Manufacturer, or None if no manufacturer has that ID
#[instrument(skip(pool, form), fields(manufacturer_id = %manufacturer_id))]
pub fn update_manufacturer(
    pool: &DbPool,
    manufacturer_id: &str,
    form: &ManufacturerForm,
) -> Result<Option<Manufacturer>> {
    let conn = &mut pool.get()?;

    let result = diesel::update(manufacturers::table.find(manufacturer_id))
        .set((
            manufacturers::name.eq(&form.name),
            manufacturers::country.eq(&form.country),
        ))
        .returning(Manufacturer::as_returning())
        .get_result(conn)
        .optional()?;

    if result.is_some() {
        info!("Updated manufacturer");
    }

    Ok(result)
}

/// Deletes a manufacturer and, through the foreign key cascade, its cars
///
/// ### Returns
///
/// Whether a manufacturer was deleted
#[instrument(skip(pool), fields(manufacturer_id = %manufacturer_id))]
pub fn delete_manufacturer(pool: &DbPool, manufacturer_id: &str) -> Result<bool> {
    let conn = &mut pool.get()?;

    let deleted = diesel::delete(manufacturers::table.find(manufacturer_id)).execute(conn)?;

    if deleted > 0 {
        info!("Deleted manufacturer");
    }

    Ok(deleted > 0)
}
