//! Workout video endpoints (CDN-backed uploads).

use crate::auth::RequireAdmin;
use crate::cdn::storage_path_from_url;
use crate::server::state::AppState;
use crate::store::{ListFilter, MediaStore as _};
use crate::types::{Difficulty, Video, VideoCategory};
use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use fitsphere_web::AppError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::MessageResponse;

/// Listing filters.
#[derive(Debug, Default, Deserialize)]
pub struct VideoQuery {
    /// Restrict to one category
    pub category: Option<String>,
    /// Restrict to one difficulty
    pub difficulty: Option<String>,
    /// Case-insensitive title substring
    pub search: Option<String>,
    /// Rows to skip
    #[serde(default)]
    pub skip: i64,
    /// Maximum rows returned
    #[serde(default)]
    pub limit: i64,
}

/// Upload acknowledgement.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Whether the upload succeeded
    pub success: bool,
    /// Original file name
    pub file_name: String,
    /// Public CDN URL
    pub cdn_url: String,
    /// Created metadata row
    pub video: Video,
}

/// Partial video update; absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct VideoUpdate {
    /// New title
    pub title: Option<String>,
    /// New category
    pub category: Option<VideoCategory>,
    /// New difficulty
    pub difficulty: Option<Difficulty>,
    /// New duration in seconds
    pub duration: Option<u32>,
    /// New description
    pub description: Option<String>,
    /// New thumbnail URL
    pub thumbnail_url: Option<String>,
    /// Publish or hide
    pub is_public: Option<bool>,
}

struct UploadFields {
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
    title: String,
    category: VideoCategory,
    difficulty: Difficulty,
    duration: u32,
    description: String,
}

async fn read_upload(mut multipart: Multipart) -> Result<UploadFields, AppError> {
    let mut file_name = None;
    let mut content_type = None;
    let mut bytes = None;
    let mut title = None;
    let mut category = None;
    let mut difficulty = None;
    let mut duration = None;
    let mut description = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                file_name = field.file_name().map(ToString::to_string);
                content_type = field.content_type().map(ToString::to_string);
                bytes = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| AppError::bad_request(format!("Failed to read file: {e}")))?
                        .to_vec(),
                );
            }
            "title" => title = Some(read_text(field).await?),
            "category" => {
                let raw = read_text(field).await?;
                category = Some(parse_enum(&raw, "category")?);
            }
            "difficulty" => {
                let raw = read_text(field).await?;
                difficulty = Some(parse_enum(&raw, "difficulty")?);
            }
            "duration" => {
                let raw = read_text(field).await?;
                duration = Some(
                    raw.parse()
                        .map_err(|_| AppError::bad_request("duration must be a number"))?,
                );
            }
            "description" => description = Some(read_text(field).await?),
            _ => {}
        }
    }

    let content_type =
        content_type.ok_or_else(|| AppError::bad_request("A video file is required"))?;
    if !content_type.starts_with("video/") {
        return Err(AppError::bad_request("File must be a video"));
    }

    Ok(UploadFields {
        file_name: file_name.ok_or_else(|| AppError::bad_request("File name is required"))?,
        content_type,
        bytes: bytes.ok_or_else(|| AppError::bad_request("A video file is required"))?,
        title: title.ok_or_else(|| AppError::bad_request("title is required"))?,
        category: category.ok_or_else(|| AppError::bad_request("category is required"))?,
        difficulty: difficulty.ok_or_else(|| AppError::bad_request("difficulty is required"))?,
        duration: duration.ok_or_else(|| AppError::bad_request("duration is required"))?,
        description: description.ok_or_else(|| AppError::bad_request("description is required"))?,
    })
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::bad_request(format!("Malformed field: {e}")))
}

fn parse_enum<T: serde::de::DeserializeOwned>(raw: &str, name: &str) -> Result<T, AppError> {
    serde_json::from_value(serde_json::Value::String(raw.to_string()))
        .map_err(|_| AppError::bad_request(format!("Invalid {name}: {raw}")))
}

/// Upload a video to the CDN and persist its metadata (admin).
pub async fn upload_video(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    let upload = read_upload(multipart).await?;

    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    let safe_name = upload.file_name.replace(' ', "_");
    let path = format!("videos/{timestamp}_{safe_name}");

    let cdn_url = state
        .storage
        .upload(&path, upload.bytes, &upload.content_type)
        .await?;

    let now = Utc::now();
    let video = Video {
        id: Uuid::new_v4(),
        title: upload.title,
        category: upload.category,
        difficulty: upload.difficulty,
        duration: upload.duration,
        description: upload.description,
        video_url: cdn_url.clone(),
        thumbnail_url: None,
        is_public: true,
        view_count: 0,
        created_at: now,
        updated_at: now,
    };
    state.stores().media.insert_video(&video).await?;

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            success: true,
            file_name: upload.file_name,
            cdn_url,
            video,
        }),
    ))
}

/// List videos.
pub async fn list_videos(
    State(state): State<AppState>,
    Query(query): Query<VideoQuery>,
) -> Result<Json<Vec<Video>>, AppError> {
    let videos = state
        .stores()
        .media
        .list_videos(
            &ListFilter {
                category: query.category,
                search: query.search,
                skip: query.skip,
                limit: query.limit,
            },
            query.difficulty.as_deref(),
        )
        .await?;
    Ok(Json(videos))
}

/// Fetch one video.
pub async fn get_video(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Video>, AppError> {
    let video = state
        .stores()
        .media
        .video(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Video", id))?;
    Ok(Json(video))
}

/// Update video metadata (admin).
pub async fn update_video(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<VideoUpdate>,
) -> Result<Json<Video>, AppError> {
    let mut video = state
        .stores()
        .media
        .video(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Video", id))?;

    if let Some(title) = update.title {
        video.title = title;
    }
    if let Some(category) = update.category {
        video.category = category;
    }
    if let Some(difficulty) = update.difficulty {
        video.difficulty = difficulty;
    }
    if let Some(duration) = update.duration {
        video.duration = duration;
    }
    if let Some(description) = update.description {
        video.description = description;
    }
    if let Some(thumbnail_url) = update.thumbnail_url {
        video.thumbnail_url = Some(thumbnail_url);
    }
    if let Some(is_public) = update.is_public {
        video.is_public = is_public;
    }
    video.updated_at = Utc::now();

    state.stores().media.update_video(&video).await?;
    Ok(Json(video))
}

/// Delete a video from the database and, best-effort, from the CDN (admin).
pub async fn delete_video(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let video = state
        .stores()
        .media
        .video(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Video", id))?;

    if let Some(path) = storage_path_from_url(&video.video_url) {
        if let Err(err) = state.storage.delete(&path).await {
            tracing::warn!(video_id = %id, error = %err, "CDN delete failed; metadata removed anyway");
        }
    }

    state.stores().media.delete_video(&id).await?;
    Ok(Json(MessageResponse::new("Video deleted successfully")))
}
