use crate::*;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use diesel::sql_types::Text;
use diesel::{QueryableByName, RunQueryDsl};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

pub use crate::repo::tests::setup_test_db;

/// Password every test driver is created with
pub const TEST_PASSWORD: &str = "test_password_123";

/// Builds the router over a fresh database with default settings
pub fn setup_test_app() -> (Router, Arc<db::DbPool>) {
    let pool = setup_test_db();
    let app = create_app(pool.clone(), config::base_config(None));
    (app, pool)
}

/// Builds a request with an optional bearer token and JSON body
pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Reads a response body as JSON
pub async fn response_json(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Signs in through the API and returns the session token
pub async fn login(app: &Router, username: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/accounts/login",
            None,
            Some(json!({"username": username, "password": TEST_PASSWORD})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    response_json(response).await["token"].as_str().unwrap().to_string()
}

/// Registers a driver directly in the database and signs them in
pub async fn create_and_login(app: &Router, pool: &db::DbPool, username: &str, license_number: &str) -> String {
    repo::tests::insert_driver(pool, username, license_number);
    login(app, username).await
}

#[derive(QueryableByName, Debug)]
struct TableName {
    #[diesel(sql_type = Text)]
    name: String,
}

#[test]
fn test_setup_test_db_creates_tables() {
    let pool = setup_test_db();
    let mut conn = pool.get().unwrap();

    let table_names: Vec<TableName> = diesel::sql_query("SELECT name FROM sqlite_master WHERE type='table'")
        .load(&mut conn)
        .expect("Failed to load table names");

    let expected_tables = [
        "manufacturers",
        "accounts",
        "drivers",
        "cars",
        "car_drivers",
        "sessions",
        "__diesel_schema_migrations",
    ];

    for table in expected_tables {
        assert!(
            table_names.iter().any(|t| t.name == table),
            "Table '{}' not found in database",
            table
        );

        let query = format!("SELECT COUNT(*) FROM {}", table);
        let result = diesel::sql_query(&query).execute(&mut conn);
        assert!(result.is_ok(), "Failed to query table '{}': {:?}", table, result.err());
    }
}

#[test]
fn test_foreign_keys_enforced() {
    let pool = setup_test_db();
    let mut conn = pool.get().unwrap();

    let result = diesel::sql_query(
        "INSERT INTO cars (id, model, manufacturer_id) VALUES ('c1', 'Viper', 'missing')",
    )
    .execute(&mut conn);

    assert!(result.is_err());
}
