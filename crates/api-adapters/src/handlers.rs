//! # API Handlers
//!
//! This module coordinates the flow between HTTP requests and the workflow
//! services. Bodies and status codes match what the dashboard expects:
//! creates answer `{id, message}`, updates and deletes answer `{message}`,
//! lists answer plain JSON arrays.

use axum::extract::{Multipart, Path, State};
use axum::Json;
use mime::Mime;
use serde_json::{json, Value};

use domains::error::DomainError;
use domains::models::{Announcement, College, CollegeDraft, Programme, ProgrammeDraft, User};
use services::accounts::NewUserInput;
use services::bulletins::AnnouncementInput;
use services::media::ImageUpload;

use crate::dto::{parse_date, AnnouncementPayload, CollegePayload, ProgrammePayload, UserPayload};
use crate::error::ApiError;
use crate::state::AppState;

// ── Colleges ────────────────────────────────────────────────────────────────

pub async fn list_colleges(State(state): State<AppState>) -> Result<Json<Vec<College>>, ApiError> {
    let colleges = state
        .directory
        .list_colleges()
        .await
        .map_err(|e| ApiError::from_domain(e, "Failed to fetch colleges"))?;
    Ok(Json(colleges))
}

pub async fn create_college(
    State(state): State<AppState>,
    Json(payload): Json<CollegePayload>,
) -> Result<Json<Value>, ApiError> {
    let id = state
        .directory
        .create_college(CollegeDraft {
            name: payload.name,
            abbrv: payload.abbrv,
        })
        .await
        .map_err(|e| ApiError::from_domain(e, "Failed to create college"))?;
    Ok(Json(json!({ "id": id, "message": "College created successfully" })))
}

pub async fn update_college(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<CollegePayload>,
) -> Result<Json<Value>, ApiError> {
    state
        .directory
        .update_college(
            &id,
            CollegeDraft {
                name: payload.name,
                abbrv: payload.abbrv,
            },
        )
        .await
        .map_err(|e| ApiError::from_domain(e, "Failed to update college"))?;
    Ok(Json(json!({ "message": "College updated successfully" })))
}

pub async fn delete_college(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state
        .directory
        .delete_college(&id)
        .await
        .map_err(|e| ApiError::from_domain(e, "Failed to delete college"))?;
    Ok(Json(json!({ "message": "College deleted successfully" })))
}

// ── Programmes ──────────────────────────────────────────────────────────────

pub async fn list_programmes(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Programme>>, ApiError> {
    match state.directory.list_programmes(&id).await {
        Ok(programmes) => Ok(Json(programmes)),
        // The one place a missing document answers 404: a direct fetch of a
        // college's sub-collection.
        Err(DomainError::NotFound(..)) => Err(ApiError::NotFound("College not found".to_string())),
        Err(e) => Err(ApiError::from_domain(e, "Failed to fetch programmes")),
    }
}

fn programme_draft(payload: ProgrammePayload) -> ProgrammeDraft {
    ProgrammeDraft {
        abbrv: payload.abbrv,
        name: payload.name,
        years: payload.years,
        duration: payload.duration,
        description: payload.description,
    }
}

pub async fn create_programme(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ProgrammePayload>,
) -> Result<Json<Value>, ApiError> {
    let programme_id = state
        .directory
        .create_programme(&id, programme_draft(payload))
        .await
        .map_err(|e| ApiError::from_domain(e, "Failed to create programme"))?;
    Ok(Json(
        json!({ "id": programme_id, "message": "Programme created successfully" }),
    ))
}

pub async fn update_programme(
    State(state): State<AppState>,
    Path((id, programme_id)): Path<(String, String)>,
    Json(payload): Json<ProgrammePayload>,
) -> Result<Json<Value>, ApiError> {
    state
        .directory
        .update_programme(&id, &programme_id, programme_draft(payload))
        .await
        .map_err(|e| ApiError::from_domain(e, "Failed to update programme"))?;
    Ok(Json(json!({ "message": "Programme updated successfully" })))
}

pub async fn delete_programme(
    State(state): State<AppState>,
    Path((id, programme_id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    state
        .directory
        .delete_programme(&id, &programme_id)
        .await
        .map_err(|e| ApiError::from_domain(e, "Failed to delete programme"))?;
    Ok(Json(json!({ "message": "Programme deleted successfully" })))
}

// ── Users ───────────────────────────────────────────────────────────────────

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let users = state
        .accounts
        .list_users()
        .await
        .map_err(|e| ApiError::from_domain(e, "Failed to fetch users"))?;
    Ok(Json(users))
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<UserPayload>,
) -> Result<Json<Value>, ApiError> {
    let start_date = parse_date(&payload.start_date)
        .ok_or_else(|| ApiError::BadRequest(format!("invalid start date: {}", payload.start_date)))?;
    let end_date = parse_date(&payload.end_date)
        .ok_or_else(|| ApiError::BadRequest(format!("invalid end date: {}", payload.end_date)))?;

    let id = state
        .accounts
        .create_user(NewUserInput {
            full_name: payload.full_name,
            reg_no: payload.reg_no,
            college_id: payload.college_id,
            programme_id: payload.programme_id,
            start_date,
            end_date,
            roles: payload.roles,
            profile_pic_url: payload.profile_pic_url,
        })
        .await
        .map_err(|e| ApiError::from_domain(e, "Failed to create user"))?;
    Ok(Json(json!({
        "id": id,
        "message": "User and authentication account created successfully"
    })))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state
        .accounts
        .delete_user(&id)
        .await
        .map_err(|e| ApiError::from_domain(e, "Failed to delete user"))?;
    Ok(Json(json!({ "message": "User deleted successfully" })))
}

// ── Announcements ───────────────────────────────────────────────────────────

pub async fn list_announcements(
    State(state): State<AppState>,
) -> Result<Json<Vec<Announcement>>, ApiError> {
    let announcements = state
        .bulletins
        .list()
        .await
        .map_err(|e| ApiError::from_domain(e, "Failed to fetch announcements"))?;
    Ok(Json(announcements))
}

fn announcement_input(payload: AnnouncementPayload) -> AnnouncementInput {
    AnnouncementInput {
        title: payload.title,
        body: payload.body,
        department: payload.department,
        author_id: payload.author_id,
        author_name: payload.author_name,
        college_id: payload.college_id,
        college_abbrv: payload.college_abbrv,
        college_name: payload.college_name,
        roles: payload.roles,
        visibility: payload.visibility,
        image_urls: payload.image_urls,
    }
}

pub async fn create_announcement(
    State(state): State<AppState>,
    Json(payload): Json<AnnouncementPayload>,
) -> Result<Json<Value>, ApiError> {
    let id = state
        .bulletins
        .create(announcement_input(payload))
        .await
        .map_err(|e| ApiError::from_domain(e, "Failed to create announcement"))?;
    Ok(Json(
        json!({ "id": id, "message": "Announcement created successfully" }),
    ))
}

pub async fn update_announcement(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<AnnouncementPayload>,
) -> Result<Json<Value>, ApiError> {
    state
        .bulletins
        .update(&id, announcement_input(payload))
        .await
        .map_err(|e| ApiError::from_domain(e, "Failed to update announcement"))?;
    Ok(Json(json!({ "message": "Announcement updated successfully" })))
}

pub async fn delete_announcement(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state
        .bulletins
        .delete(&id)
        .await
        .map_err(|e| ApiError::from_domain(e, "Failed to delete announcement"))?;
    Ok(Json(json!({ "message": "Announcement deleted successfully" })))
}

// ── Upload ──────────────────────────────────────────────────────────────────

pub async fn upload_images(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("images") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        // Fall back to guessing from the filename when the browser sent no
        // part content type.
        let content_type = field
            .content_type()
            .and_then(|raw| raw.parse::<Mime>().ok())
            .unwrap_or_else(|| mime_guess::from_path(&file_name).first_or_octet_stream());
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        files.push(ImageUpload {
            file_name,
            content_type,
            data,
        });
    }

    if files.is_empty() {
        return Err(ApiError::BadRequest("No files provided".to_string()));
    }

    let image_urls = state
        .uploads
        .upload_images(files)
        .await
        .map_err(|e| ApiError::from_domain(e, "Failed to upload images"))?;
    Ok(Json(json!({ "imageUrls": image_urls })))
}
