use crate::db::DbPool;
use crate::models::{Driver, Session};
use crate::schema::sessions;
use anyhow::Result;
use chrono::{Duration, NaiveDateTime};
use diesel::prelude::*;
use tracing::{debug, info, instrument};

use super::driver_repo::load_driver;

/// Stores a new session for a driver
///
/// ### Arguments
///
/// * `pool` - A reference to the database connection pool
/// * `token_hash` - SHA-256 of the token handed to the client
/// * `account_id` - The driver signing in
/// * `ttl` - How long the session stays valid
#[instrument(skip(pool, token_hash), fields(account_id = %account_id))]
pub fn create_session(pool: &DbPool, token_hash: &str, account_id: &str, ttl: Duration) -> Result<Session> {
    let conn = &mut pool.get()?;

    let session = Session::new(token_hash.to_string(), account_id.to_string(), ttl);

    diesel::insert_into(sessions::table)
        .values(&session)
        .execute(conn)?;

    info!("Opened session");

    Ok(session)
}

/// Finds an unexpired session and the driver it belongs to
///
/// ### Returns
///
/// None when the hash is unknown, the session has expired at `now`, or the
/// account no longer has a driver row
pub fn find_active_session(
    pool: &DbPool,
    token_hash: &str,
    now: NaiveDateTime,
) -> Result<Option<(Session, Driver)>> {
    let conn = &mut pool.get()?;

    let session = sessions::table
        .find(token_hash)
        .filter(sessions::expires_at.gt(now))
        .first::<Session>(conn)
        .optional()?;

    let Some(session) = session else {
        return Ok(None);
    };

    let driver = load_driver(conn, &session.get_account_id())?;

    Ok(driver.map(|driver| (session, driver)))
}

/// Counts one more index visit for a session and returns the new total
#[instrument(skip(pool, token_hash))]
pub fn record_visit(pool: &DbPool, token_hash: &str) -> Result<i32> {
    let conn = &mut pool.get()?;

    let visits = diesel::update(sessions::table.find(token_hash))
        .set(sessions::visits.eq(sessions::visits + 1))
        .returning(sessions::visits)
        .get_result::<i32>(conn)?;

    debug!("Session visit count is now {}", visits);

    Ok(visits)
}

/// Ends a session
pub fn delete_session(pool: &DbPool, token_hash: &str) -> Result<bool> {
    let conn = &mut pool.get()?;

    let deleted = diesel::delete(sessions::table.find(token_hash)).execute(conn)?;

    Ok(deleted > 0)
}

/// Removes every session that expired at or before `now`
pub fn purge_expired_sessions(pool: &DbPool, now: NaiveDateTime) -> Result<usize> {
    let conn = &mut pool.get()?;

    let purged = diesel::delete(sessions::table.filter(sessions::expires_at.le(now))).execute(conn)?;

    if purged > 0 {
        debug!("Purged {} expired sessions", purged);
    }

    Ok(purged)
}
