//! Floor-plan image upload and serving.
//!
//! Uploads land under a unique filename in the maps directory and flip
//! the facility settings' active floor-plan URL over to the new file. Clients read the
//! active URL, load the image, and capture its natural dimensions before
//! accepting any click-based mutation.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use tracing::{error, info};

use authority::{Authority, FacilitySettings};

use crate::api::ApiError;
use crate::AppState;

pub async fn active(State(state): State<AppState>) -> Result<Json<FacilitySettings>, ApiError> {
    Ok(Json(state.authority.read().get_settings()?))
}

#[derive(Debug, Deserialize)]
pub struct UploadParams {
    /// File extension of the uploaded image, e.g. "png".
    #[serde(default = "default_ext")]
    pub ext: String,
}

fn default_ext() -> String {
    "png".to_string()
}

pub async fn upload(
    State(state): State<AppState>,
    Query(params): Query<UploadParams>,
    body: Bytes,
) -> Result<Json<FacilitySettings>, (StatusCode, String)> {
    if body.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "empty upload".to_string()));
    }
    if !params.ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err((StatusCode::BAD_REQUEST, "invalid extension".to_string()));
    }

    let filename = format!("{}.{}", uuid::Uuid::new_v4(), params.ext);
    let path = state.maps_dir.join(&filename);
    if let Err(err) = tokio::fs::write(&path, &body).await {
        error!("failed to store floor plan: {err}");
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            "failed to store file".to_string(),
        ));
    }

    let url = format!("/maps/{filename}");
    info!("floor plan uploaded: {url}");
    let settings = state
        .authority
        .write()
        .set_floor_plan_url(url)
        .map_err(|err| (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()))?;
    Ok(Json(settings))
}

pub async fn serve_map(
    State(state): State<AppState>,
    Path(file): Path<String>,
) -> impl IntoResponse {
    // No traversal: the filename is a uuid plus extension.
    if file.contains('/') || file.contains("..") {
        return (StatusCode::BAD_REQUEST, "invalid filename").into_response();
    }

    match tokio::fs::read(state.maps_dir.join(&file)).await {
        Ok(bytes) => {
            let content_type = content_type_for(&file);
            ([(header::CONTENT_TYPE, content_type)], bytes).into_response()
        }
        Err(_) => (StatusCode::NOT_FOUND, "no such map").into_response(),
    }
}

fn content_type_for(file: &str) -> &'static str {
    match file.rsplit('.').next().unwrap_or("") {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::content_type_for;

    #[test]
    fn image_content_types() {
        assert_eq!(content_type_for("a.png"), "image/png");
        assert_eq!(content_type_for("a.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("a.svg"), "image/svg+xml");
        assert_eq!(content_type_for("plain"), "application/octet-stream");
    }
}
