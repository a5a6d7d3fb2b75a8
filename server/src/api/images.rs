//! Gallery/banner image endpoints (CDN-backed uploads).

use crate::auth::RequireAdmin;
use crate::cdn::storage_path_from_url;
use crate::server::state::AppState;
use crate::store::MediaStore as _;
use crate::types::{Image, ImageKind};
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
pub struct ImageQuery {
    /// Restrict to one image kind
    pub image_type: Option<ImageKind>,
    /// Rows to skip
    #[serde(default)]
    pub skip: i64,
    /// Maximum rows returned
    #[serde(default)]
    pub limit: i64,
}

/// Upload acknowledgement.
#[derive(Debug, Serialize)]
pub struct ImageUploadResponse {
    /// Whether the upload succeeded
    pub success: bool,
    /// Original file name
    pub file_name: String,
    /// Public CDN URL
    pub cdn_url: String,
    /// Created metadata row
    pub image: Image,
}

/// Upload an image to the CDN and persist its metadata (admin).
pub async fn upload_image(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ImageUploadResponse>), AppError> {
    let mut file_name = None;
    let mut content_type = None;
    let mut bytes = None;
    let mut title = None;
    let mut image_type = None;
    let mut description = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(format!("Malformed multipart body: {e}")))?
    {
        match field.name().unwrap_or_default() {
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
            "title" => {
                title = Some(field.text().await.map_err(|e| {
                    AppError::bad_request(format!("Malformed field: {e}"))
                })?);
            }
            "image_type" => {
                let raw = field.text().await.map_err(|e| {
                    AppError::bad_request(format!("Malformed field: {e}"))
                })?;
                image_type = Some(
                    serde_json::from_value::<ImageKind>(serde_json::Value::String(raw.clone()))
                        .map_err(|_| AppError::bad_request(format!("Invalid image type: {raw}")))?,
                );
            }
            "description" => {
                description = Some(field.text().await.map_err(|e| {
                    AppError::bad_request(format!("Malformed field: {e}"))
                })?);
            }
            _ => {}
        }
    }

    let content_type =
        content_type.ok_or_else(|| AppError::bad_request("An image file is required"))?;
    if !content_type.starts_with("image/") {
        return Err(AppError::bad_request("File must be an image"));
    }
    let file_name = file_name.ok_or_else(|| AppError::bad_request("File name is required"))?;
    let bytes = bytes.ok_or_else(|| AppError::bad_request("An image file is required"))?;
    let title = title.ok_or_else(|| AppError::bad_request("title is required"))?;
    let image_type = image_type.ok_or_else(|| AppError::bad_request("image_type is required"))?;

    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    let safe_name = file_name.replace(' ', "_");
    let path = format!("images/{timestamp}_{safe_name}");

    let cdn_url = state.storage.upload(&path, bytes, &content_type).await?;

    let image = Image {
        id: Uuid::new_v4(),
        title,
        image_type,
        image_url: cdn_url.clone(),
        description,
        created_at: Utc::now(),
    };
    state.stores().media.insert_image(&image).await?;

    Ok((
        StatusCode::CREATED,
        Json(ImageUploadResponse {
            success: true,
            file_name,
            cdn_url,
            image,
        }),
    ))
}

/// List images.
pub async fn list_images(
    State(state): State<AppState>,
    Query(query): Query<ImageQuery>,
) -> Result<Json<Vec<Image>>, AppError> {
    let images = state
        .stores()
        .media
        .list_images(query.image_type, query.skip, query.limit)
        .await?;
    Ok(Json(images))
}

/// Delete an image from the database and, best-effort, from the CDN (admin).
pub async fn delete_image(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let image = state
        .stores()
        .media
        .image(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Image", id))?;

    if let Some(path) = storage_path_from_url(&image.image_url) {
        if let Err(err) = state.storage.delete(&path).await {
            tracing::warn!(image_id = %id, error = %err, "CDN delete failed; metadata removed anyway");
        }
    }

    state.stores().media.delete_image(&id).await?;
    Ok(Json(MessageResponse::new("Image deleted successfully")))
}
