//! Programme endpoints: the 404 on a missing college, the name sort, and
//! the CRUD round trip.

use axum::http::StatusCode;
use serde_json::json;

use integration_tests::{request, test_app};

async fn create_college(app: &integration_tests::TestApp) -> String {
    let (_, created) = request(
        &app.router,
        "POST",
        "/colleges",
        Some(json!({ "name": "Science", "abbrv": "SCI" })),
    )
    .await;
    created["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn programmes_of_a_missing_college_answer_404() {
    let app = test_app();
    let (status, body) = request(&app.router, "GET", "/colleges/ghost/programmes", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "College not found");
}

#[tokio::test]
async fn programmes_list_sorted_by_name_case_sensitively() {
    let app = test_app();
    let college_id = create_college(&app).await;

    for name in ["Zoology", "Art", "anatomy"] {
        request(
            &app.router,
            "POST",
            &format!("/colleges/{college_id}/programmes"),
            Some(json!({ "name": name, "abbrv": "", "years": "3" })),
        )
        .await;
    }

    let (status, body) = request(
        &app.router,
        "GET",
        &format!("/colleges/{college_id}/programmes"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|programme| programme["name"].as_str().unwrap())
        .collect();
    // Byte order: uppercase before lowercase.
    assert_eq!(names, vec!["Art", "Zoology", "anatomy"]);
}

#[tokio::test]
async fn programme_update_and_delete_round_trip() {
    let app = test_app();
    let college_id = create_college(&app).await;

    let (_, created) = request(
        &app.router,
        "POST",
        &format!("/colleges/{college_id}/programmes"),
        Some(json!({
            "name": "Computer Science",
            "abbrv": "CS",
            "years": 4,
            "duration": "4 years",
            "description": "Programming and systems"
        })),
    )
    .await;
    let programme_id = created["id"].as_str().unwrap().to_string();

    let (status, updated) = request(
        &app.router,
        "PUT",
        &format!("/colleges/{college_id}/programmes/{programme_id}"),
        Some(json!({ "name": "Computing", "abbrv": "CMP", "years": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["message"], "Programme updated successfully");

    let (_, listed) = request(
        &app.router,
        "GET",
        &format!("/colleges/{college_id}/programmes"),
        None,
    )
    .await;
    assert_eq!(listed[0]["name"], "Computing");
    assert_eq!(listed[0]["years"], 3);
    assert_eq!(listed[0]["collegeId"], college_id);

    let (status, _) = request(
        &app.router,
        "DELETE",
        &format!("/colleges/{college_id}/programmes/{programme_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Deleting again is still a success: document-store delete semantics.
    let (status, _) = request(
        &app.router,
        "DELETE",
        &format!("/colleges/{college_id}/programmes/{programme_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, listed) = request(
        &app.router,
        "GET",
        &format!("/colleges/{college_id}/programmes"),
        None,
    )
    .await;
    assert!(listed.as_array().unwrap().is_empty());
}
