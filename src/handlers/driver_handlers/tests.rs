use crate::test_utils::*;
use axum::http::StatusCode;
use serde_json::{json, Value};
use tower::ServiceExt;

fn creation_payload(username: &str, license_number: &str) -> Value {
    json!({
        "username": username,
        "password1": "testDriver123",
        "password2": "testDriver123",
        "license_number": license_number,
        "first_name": "Test",
        "last_name": "Driver",
    })
}

#[tokio::test]
async fn test_create_driver() {
    let (app, pool) = setup_test_app();
    let token = create_and_login(&app, &pool, "testuser", "TES12345").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/drivers",
            Some(&token),
            Some(creation_payload("newdriver", "NEW12345")),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["username"], "newdriver");
    assert_eq!(body["license_number"], "NEW12345");
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_create_driver_invalid_license_numbers() {
    let (app, pool) = setup_test_app();
    let token = create_and_login(&app, &pool, "testuser", "TES12345").await;

    let cases = [
        ("ABC123456", "license number should consist of 8 characters"),
        ("12345678rrrrr", "license number should consist of 8 characters"),
        ("AD569842", "first 3 characters should be uppercase letters"),
        ("ABC1234X", "last 5 characters should be digits"),
    ];

    for (license_number, message) in cases {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/drivers",
                Some(&token),
                Some(creation_payload("newdriver", license_number)),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY, "{}", license_number);
        let body = response_json(response).await;
        assert_eq!(body["fields"][0]["field"], "license_number");
        assert_eq!(body["fields"][0]["message"], message);
    }
}

#[tokio::test]
async fn test_create_driver_duplicates() {
    let (app, pool) = setup_test_app();
    let token = create_and_login(&app, &pool, "testuser", "TES12345").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/drivers",
            Some(&token),
            Some(creation_payload("testuser", "TES12345")),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = response_json(response).await;
    let fields: Vec<&str> = body["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["username", "license_number"]);
}

#[tokio::test]
async fn test_search_drivers_by_username() {
    let (app, pool) = setup_test_app();
    let token = create_and_login(&app, &pool, "testuser", "TES12345").await;
    crate::repo::tests::insert_driver(&pool, "testuser2", "TES12346");

    let response = app
        .oneshot(json_request("GET", "/drivers?username=testuser2", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    let names: Vec<&str> = body["object_list"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["username"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["testuser2"]);
    assert_eq!(body["search_form"]["field"], "username");
    assert_eq!(body["search_form"]["value"], "testuser2");
}

#[tokio::test]
async fn test_update_license_number() {
    let (app, pool) = setup_test_app();
    let token = create_and_login(&app, &pool, "testuser", "TES12345").await;
    let other = crate::repo::tests::insert_driver(&pool, "other", "OTH12345");
    let uri = format!("/drivers/{}/license", other.get_id());

    let response = app
        .clone()
        .oneshot(json_request("PUT", &uri, Some(&token), Some(json!({"license_number": "TES12345"}))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = app
        .clone()
        .oneshot(json_request("PUT", &uri, Some(&token), Some(json!({"license_number": "oth12345"}))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = app
        .clone()
        .oneshot(json_request("PUT", &uri, Some(&token), Some(json!({"license_number": "OTH54321"}))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await["license_number"], "OTH54321");

    // Keeping one's own number is not a duplicate
    let response = app
        .oneshot(json_request("PUT", &uri, Some(&token), Some(json!({"license_number": "OTH54321"}))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_get_and_delete_driver() {
    let (app, pool) = setup_test_app();
    let token = create_and_login(&app, &pool, "testuser", "TES12345").await;
    let other = crate::repo::tests::insert_driver(&pool, "other", "OTH12345");
    let uri = format!("/drivers/{}", other.get_id());

    let response = app
        .clone()
        .oneshot(json_request("GET", &uri, Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["username"], "other");
    assert_eq!(body["cars"], json!([]));

    let response = app
        .clone()
        .oneshot(json_request("DELETE", &uri, Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(json_request("GET", &uri, Some(&token), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
