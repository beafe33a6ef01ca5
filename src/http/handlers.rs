use super::error::ApiError;
use super::state::AppState;
use crate::db::{AssessmentRecord, UserResponse};
use axum::{
    extract::{Multipart, Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Maximum accepted video upload size (50MB)
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SaveUserRequest {
    pub username: String,
    pub email: String,
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SaveAssessmentRequest {
    /// Assessment payload; stored as an opaque JSON string
    #[serde(rename = "assessmentData")]
    pub assessment_data: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct AssessmentListResponse {
    pub assessments: Vec<AssessmentRecord>,
}

#[derive(Debug, Serialize)]
pub struct SaveAssessmentResponse {
    pub message: String,
    pub assessment: AssessmentRecord,
}

#[derive(Debug, Serialize)]
pub struct AssessmentResponse {
    pub assessment: AssessmentRecord,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub url: String,
    pub key: String,
    #[serde(rename = "questionIndex")]
    pub question_index: String,
}

// ============================================================================
// Helpers
// ============================================================================

/// Extract the caller identity from the x-user-email header.
fn require_email(headers: &HeaderMap) -> Result<String, ApiError> {
    headers
        .get("x-user-email")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or(ApiError::MissingIdentity)
}

async fn require_user(
    state: &AppState,
    email: &str,
) -> Result<crate::db::UserDoc, ApiError> {
    state
        .store
        .find_user(email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found.".to_string()))
}

/// Assessment ids are opaque to callers; an unparseable id can never be
/// in anyone's list, so it reads as not-owned rather than a bad request.
fn parse_assessment_id(id: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(id)
        .map_err(|_| ApiError::NotFound("Assessment not associated with the user.".to_string()))
}

// ============================================================================
// Root Handlers
// ============================================================================

/// GET /
pub async fn welcome() -> impl IntoResponse {
    Json(MessageResponse {
        message: "Welcome to the API".to_string(),
    })
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

// ============================================================================
// User Handlers
// ============================================================================

/// POST /users/save
/// Create a user or return the existing one with the same email
pub async fn save_user(
    State(state): State<AppState>,
    Json(req): Json<SaveUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.email.is_empty() {
        return Err(ApiError::Validation("Email is required.".to_string()));
    }

    info!("Saving user {}", req.email);

    let user = state
        .store
        .find_or_create_user(&req.username, &req.email, req.token.as_deref())
        .await?;

    Ok(Json(UserResponse::from(user)))
}

/// GET /users
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let users = state.store.list_users().await?;

    let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();

    Ok(Json(users))
}

// ============================================================================
// Assessment Handlers
// ============================================================================

/// GET /assessments/all
/// All assessments linked to the calling user
pub async fn list_assessments(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let email = require_email(&headers)?;
    let user = require_user(&state, &email).await?;

    let assessments = state.store.assessments_for(&user).await?;

    info!("Listing {} assessments for {}", assessments.len(), email);

    Ok(Json(AssessmentListResponse {
        assessments: assessments
            .into_iter()
            .map(AssessmentRecord::from)
            .collect(),
    }))
}

/// POST /assessments/save
/// Store an assessment payload and link it to the calling user
pub async fn save_assessment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<SaveAssessmentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = require_email(&headers)?;
    let user = require_user(&state, &email).await?;

    // Callers may send the payload pre-serialized or as a JSON object
    let data = match req.assessment_data {
        serde_json::Value::String(s) => s,
        value => value.to_string(),
    };

    let assessment = state.store.save_assessment(&user, data).await?;

    Ok((
        StatusCode::CREATED,
        Json(SaveAssessmentResponse {
            message: "Assessment saved successfully.".to_string(),
            assessment: AssessmentRecord::from(assessment),
        }),
    ))
}

/// GET /assessments/:id
/// Fetch one assessment; ownership is checked before lookup
pub async fn get_assessment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let email = require_email(&headers)?;
    let user = require_user(&state, &email).await?;
    let assessment_id = parse_assessment_id(&id)?;

    if !user.owns(&assessment_id) {
        return Err(ApiError::NotFound(
            "Assessment not associated with the user.".to_string(),
        ));
    }

    let assessment = state
        .store
        .fetch_assessment(&assessment_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Assessment not found.".to_string()))?;

    Ok(Json(AssessmentResponse {
        assessment: AssessmentRecord::from(assessment),
    }))
}

/// DELETE /assessments/:id
/// Delete one assessment and unlink it from the calling user
pub async fn delete_assessment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let email = require_email(&headers)?;
    let user = require_user(&state, &email).await?;
    let assessment_id = parse_assessment_id(&id)?;

    if !user.owns(&assessment_id) {
        return Err(ApiError::NotFound(
            "Assessment not associated with the user.".to_string(),
        ));
    }

    state.store.delete_assessment(&user, &assessment_id).await?;

    Ok(Json(MessageResponse {
        message: "Assessment deleted successfully.".to_string(),
    }))
}

// ============================================================================
// Upload Handlers
// ============================================================================

/// GET /upload
pub async fn upload_status() -> impl IntoResponse {
    Json(MessageResponse {
        message: "Upload API is running".to_string(),
    })
}

/// POST /upload
/// Accept one answer video and forward it to the object store
pub async fn upload_video(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut question_index = String::from("0");
    let mut file: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "questionIndex" => {
                question_index = field
                    .text()
                    .await
                    .map_err(|e| ApiError::Validation(e.to_string()))?;
            }
            "file" => {
                let filename = field
                    .file_name()
                    .unwrap_or("recording.mp4")
                    .to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();

                if !content_type.starts_with("video/") {
                    return Err(ApiError::UnsupportedMedia);
                }

                let bytes = field
                    .bytes()
                    .await
                    .map_err(|_| ApiError::PayloadTooLarge)?;

                if bytes.len() > MAX_UPLOAD_BYTES {
                    return Err(ApiError::PayloadTooLarge);
                }

                file = Some((filename, content_type, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let (filename, content_type, bytes) = file
        .ok_or_else(|| ApiError::Validation("No file uploaded".to_string()))?;

    let index: usize = question_index.parse().unwrap_or(0);

    info!(
        "Uploading video for question {} ({} bytes)",
        index,
        bytes.len()
    );

    let stored = state
        .storage
        .put_video(index, &filename, &content_type, bytes)
        .await
        .map_err(|e| ApiError::Upstream(e.to_string()))?;

    Ok(Json(UploadResponse {
        success: true,
        url: stored.url,
        key: stored.key,
        question_index,
    }))
}
