//! Common test utilities for taxi integration tests
//!
//! This file contains shared functions for all integration tests: building
//! the application over a private in-memory database, signing a driver in,
//! and helpers for creating manufacturers, cars and drivers through the API.

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use taxi::{config, create_app, db::init_pool, dto::DriverCreationForm, handlers::register_driver};
use tower::ServiceExt;

/// Password every driver created by these helpers signs in with
pub const PASSWORD: &str = "integration_pass_42";

/// A test application together with a signed-in driver's token
pub struct TestApp {
    pub app: Router,
    pub token: String,
}

/// Creates a test application with an in-memory SQLite database
///
/// Each call gets its own named shared-cache database, so tests running in
/// parallel never see each other's rows.
///
/// ### Returns
///
/// An Axum Router configured with all routes and default settings
pub fn create_test_app() -> Router {
    let url = format!("file:it_{}?mode=memory&cache=shared", uuid::Uuid::new_v4());
    let pool = Arc::new(init_pool(&url).unwrap());

    // The pool keeps a connection open, which keeps the database alive
    let conn = &mut pool.get().unwrap();
    taxi::run_migrations(conn).unwrap();

    create_app(pool.clone(), config::base_config(None))
}

/// Creates a test application and signs in a driver called `admin`
pub async fn create_signed_in_app() -> TestApp {
    let url = format!("file:it_{}?mode=memory&cache=shared", uuid::Uuid::new_v4());
    let pool = Arc::new(init_pool(&url).unwrap());
    taxi::run_migrations(&mut pool.get().unwrap()).unwrap();

    let form = DriverCreationForm {
        username: "admin".to_string(),
        password1: PASSWORD.to_string(),
        password2: PASSWORD.to_string(),
        license_number: "ADM12345".to_string(),
        first_name: "Ada".to_string(),
        last_name: "Min".to_string(),
    };
    register_driver(&pool, &form).unwrap();

    let app = create_app(pool, config::base_config(None));
    let token = login(&app, "admin", PASSWORD).await;

    TestApp { app, token }
}

/// Builds a request with an optional bearer token and JSON body
pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
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

/// Sends a request through a clone of the router
pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

/// Reads a response body as JSON
pub async fn body_json(response: Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Signs in and returns the session token
pub async fn login(app: &Router, username: &str, password: &str) -> String {
    let response = send(
        app,
        request(
            "POST",
            "/accounts/login",
            None,
            Some(json!({"username": username, "password": password})),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    body_json(response).await["token"].as_str().unwrap().to_string()
}

impl TestApp {
    pub async fn get(&self, uri: &str) -> Response {
        send(&self.app, request("GET", uri, Some(&self.token), None)).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> Response {
        send(&self.app, request("POST", uri, Some(&self.token), Some(body))).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> Response {
        send(&self.app, request("PUT", uri, Some(&self.token), Some(body))).await
    }

    pub async fn delete(&self, uri: &str) -> Response {
        send(&self.app, request("DELETE", uri, Some(&self.token), None)).await
    }

    /// Fetches a URI and returns its JSON body, asserting `200 OK`
    pub async fn get_json(&self, uri: &str) -> Value {
        let response = self.get(uri).await;
        assert_eq!(response.status(), StatusCode::OK, "GET {}", uri);
        body_json(response).await
    }

    /// Creates a manufacturer and returns its ID
    pub async fn create_manufacturer(&self, name: &str, country: &str) -> String {
        let response = self
            .post("/manufacturers", json!({"name": name, "country": country}))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        body_json(response).await["id"].as_str().unwrap().to_string()
    }

    /// Creates a car and returns its ID
    pub async fn create_car(&self, model: &str, manufacturer_id: &str, driver_ids: &[&str]) -> String {
        let response = self
            .post(
                "/cars",
                json!({"model": model, "manufacturer_id": manufacturer_id, "driver_ids": driver_ids}),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        body_json(response).await["id"].as_str().unwrap().to_string()
    }

    /// Registers a driver and returns their ID
    pub async fn create_driver(&self, username: &str, license_number: &str) -> String {
        let response = self
            .post(
                "/drivers",
                json!({
                    "username": username,
                    "password1": PASSWORD,
                    "password2": PASSWORD,
                    "license_number": license_number,
                    "first_name": "Test",
                    "last_name": "Driver",
                }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        body_json(response).await["id"].as_str().unwrap().to_string()
    }
}
