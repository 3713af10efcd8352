use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use axum_extra::extract::{
    cookie::{Cookie, SameSite},
    CookieJar,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::auth::{generate_session_token, hash_session_token, password, CurrentDriver, SESSION_COOKIE};
use crate::config::Config;
use crate::db::DbPool;
use crate::dto::{IndexDto, LoginDto, LoginResponse};
use crate::errors::ApiError;
use crate::repo;

/// Handler for the fleet overview
///
/// This function handles GET requests to `/`. Each call counts as one more
/// visit in the caller's session.
///
/// ### Returns
///
/// The number of drivers, cars, and manufacturers, and this session's visit count
#[instrument(skip(pool, current), fields(driver_id = %current.driver.get_id()))]
pub async fn index_handler(
    State(pool): State<Arc<DbPool>>,
    current: CurrentDriver,
) -> Result<Json<IndexDto>, ApiError> {
    let num_visits = repo::record_visit(&pool, &current.session_hash)?;

    let index = IndexDto {
        num_drivers: repo::count_drivers(&pool, None)?,
        num_cars: repo::count_cars(&pool, None)?,
        num_manufacturers: repo::count_manufacturers(&pool, None)?,
        num_visits,
    };

    debug!("Index visit {}", num_visits);

    Ok(Json(index))
}

/// Handler for signing in
///
/// This function handles POST requests to `/accounts/login`. Expired
/// sessions are cleared out on the way.
///
/// ### Returns
///
/// The session token and the driver, with the token also set as the
/// `sessionid` cookie
#[instrument(skip(pool, config, jar, payload), fields(username = %payload.username))]
pub async fn login_handler(
    State(pool): State<Arc<DbPool>>,
    State(config): State<Arc<Config>>,
    jar: CookieJar,
    Json(payload): Json<LoginDto>,
) -> Result<(CookieJar, Json<LoginResponse>), ApiError> {
    repo::purge_expired_sessions(&pool, Utc::now().naive_utc())?;

    let Some(driver) = repo::find_driver_by_username(&pool, &payload.username)? else {
        password::verify_dummy_password(&payload.password);
        warn!("Login for unknown username");
        return Err(ApiError::InvalidCredentials);
    };

    if !driver.account().check_password(&payload.password) {
        warn!("Login with wrong password");
        return Err(ApiError::InvalidCredentials);
    }

    let token = generate_session_token();
    repo::create_session(&pool, &hash_session_token(&token), &driver.get_id(), config.session_ttl())?;

    let cookie = Cookie::build((SESSION_COOKIE, token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    info!("Driver {} signed in", driver.get_id());

    Ok((jar.add(cookie), Json(LoginResponse { token, driver })))
}

/// Handler for signing out
///
/// This function handles POST requests to `/accounts/logout`.
#[instrument(skip(pool, current, jar), fields(driver_id = %current.driver.get_id()))]
pub async fn logout_handler(
    State(pool): State<Arc<DbPool>>,
    current: CurrentDriver,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode), ApiError> {
    repo::delete_session(&pool, &current.session_hash)?;

    info!("Driver signed out");

    Ok((jar.remove(Cookie::build(SESSION_COOKIE).path("/")), StatusCode::NO_CONTENT))
}
