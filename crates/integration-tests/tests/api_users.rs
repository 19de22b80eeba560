//! User endpoints: the paired identity invariant, reference resolution,
//! list ordering, and deletion.

use axum::http::StatusCode;
use serde_json::json;

use integration_tests::{request, test_app, TestApp};

async fn create_college(app: &TestApp) -> String {
    let (_, created) = request(
        &app.router,
        "POST",
        "/colleges",
        Some(json!({ "name": "Science", "abbrv": "SCI" })),
    )
    .await;
    created["id"].as_str().unwrap().to_string()
}

fn user_payload(college_id: &str, reg_no: &str, full_name: &str) -> serde_json::Value {
    json!({
        "fullName": full_name,
        "regNo": reg_no,
        "collegeId": college_id,
        "startDate": "2024-09-01",
        "endDate": "2028-06-30",
        "roles": "student, class-rep"
    })
}

#[tokio::test]
async fn a_created_user_and_its_identity_share_one_id() {
    let app = test_app();
    let college_id = create_college(&app).await;

    let (status, created) = request(
        &app.router,
        "POST",
        "/users",
        Some(user_payload(&college_id, "REG-001", "Ada Lovelace")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        created["message"],
        "User and authentication account created successfully"
    );
    let user_id = created["id"].as_str().unwrap();

    // The identity exists under the derived email and carries the same id.
    let identity = app.identities.find_by_email("REG-001@college.edu").unwrap();
    assert_eq!(identity.id, user_id);
    assert!(identity.email_verified);
    assert_eq!(identity.display_name, "Ada Lovelace");
    // The starter password verifies against the stored hash.
    assert!(app.identities.verify_password("REG-001@college.edu", "campus"));

    // The document embeds the college snapshot and the parsed roles.
    let (_, users) = request(&app.router, "GET", "/users", None).await;
    let user = &users[0];
    assert_eq!(user["id"], user_id);
    assert_eq!(user["college"]["abbrv"], "SCI");
    assert_eq!(user["roles"], json!(["student", "class-rep"]));
    assert_eq!(user["programme"]["years"], 0);
    assert!(user["startDate"].as_str().unwrap().starts_with("2024-09-01"));
}

#[tokio::test]
async fn a_missing_college_is_a_bad_request_with_no_identity_side_effect() {
    let app = test_app();
    let (status, _) = request(
        &app.router,
        "POST",
        "/users",
        Some(user_payload("ghost", "REG-002", "Bob")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(app.identities.find_by_email("REG-002@college.edu").is_none());
}

#[tokio::test]
async fn a_duplicate_registration_number_fails_at_identity_creation() {
    let app = test_app();
    let college_id = create_college(&app).await;

    let (status, _) = request(
        &app.router,
        "POST",
        "/users",
        Some(user_payload(&college_id, "REG-003", "Ada")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = request(
        &app.router,
        "POST",
        "/users",
        Some(user_payload(&college_id, "REG-003", "Imposter")),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to create authentication user");

    // Only the first user document exists.
    let (_, users) = request(&app.router, "GET", "/users", None).await;
    assert_eq!(users.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn a_selected_programme_is_embedded_as_a_snapshot() {
    let app = test_app();
    let college_id = create_college(&app).await;
    let (_, programme) = request(
        &app.router,
        "POST",
        &format!("/colleges/{college_id}/programmes"),
        Some(json!({ "name": "Physics", "abbrv": "PHY", "years": 4 })),
    )
    .await;
    let programme_id = programme["id"].as_str().unwrap();

    let mut payload = user_payload(&college_id, "REG-004", "Marie Curie");
    payload["programmeId"] = json!(programme_id);
    let (status, _) = request(&app.router, "POST", "/users", Some(payload)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, users) = request(&app.router, "GET", "/users", None).await;
    assert_eq!(users[0]["programme"]["abbrv"], "PHY");
    assert_eq!(users[0]["programme"]["years"], 4);
}

#[tokio::test]
async fn users_list_ascending_by_full_name() {
    let app = test_app();
    let college_id = create_college(&app).await;

    for (reg_no, name) in [("R1", "Charlie"), ("R2", "Ada"), ("R3", "Bob")] {
        request(
            &app.router,
            "POST",
            "/users",
            Some(user_payload(&college_id, reg_no, name)),
        )
        .await;
    }

    let (_, users) = request(&app.router, "GET", "/users", None).await;
    let names: Vec<&str> = users
        .as_array()
        .unwrap()
        .iter()
        .map(|user| user["fullName"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Ada", "Bob", "Charlie"]);
}

#[tokio::test]
async fn deleting_a_user_also_removes_its_identity() {
    let app = test_app();
    let college_id = create_college(&app).await;
    let (_, created) = request(
        &app.router,
        "POST",
        "/users",
        Some(user_payload(&college_id, "REG-005", "Grace Hopper")),
    )
    .await;
    let user_id = created["id"].as_str().unwrap().to_string();

    let (status, body) = request(&app.router, "DELETE", &format!("/users/{user_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User deleted successfully");

    let (_, users) = request(&app.router, "GET", "/users", None).await;
    assert!(users.as_array().unwrap().is_empty());
    assert!(app.identities.find_by_email("REG-005@college.edu").is_none());
}
