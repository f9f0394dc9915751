//! REST surface over the in-memory authority.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use authority::{
    Authority, AuthorityError, FacilitySettings, Landmark, Point3, Product, Route, Sku, Waypoint,
};

use crate::AppState;

/// API error envelope: status code plus `{"error": ...}` JSON.
#[derive(Debug)]
pub struct ApiError(AuthorityError);

impl From<AuthorityError> for ApiError {
    fn from(err: AuthorityError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self.0 {
            AuthorityError::NotFound => StatusCode::NOT_FOUND,
            AuthorityError::InvalidReference => StatusCode::UNPROCESSABLE_ENTITY,
            AuthorityError::Network(_) => StatusCode::BAD_GATEWAY,
        };
        let body = Json(serde_json::json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

pub async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(state.authority.read().list_products()?))
}

pub async fn create_product(
    State(state): State<AppState>,
    Json(product): Json<Product>,
) -> Result<Json<Product>, ApiError> {
    Ok(Json(state.authority.write().create_product(product)?))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(sku): Path<Sku>,
    Json(product): Json<Product>,
) -> Result<Json<Product>, ApiError> {
    Ok(Json(state.authority.write().update_product(&sku, product)?))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(sku): Path<Sku>,
) -> Result<StatusCode, ApiError> {
    state.authority.write().delete_product(&sku)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct AssignBody {
    pub waypoint_id: String,
}

pub async fn assign_product(
    State(state): State<AppState>,
    Path(sku): Path<Sku>,
    Json(body): Json<AssignBody>,
) -> Result<Json<Product>, ApiError> {
    Ok(Json(
        state
            .authority
            .write()
            .assign_product_to_waypoint(&sku, &body.waypoint_id)?,
    ))
}

pub async fn list_waypoints(
    State(state): State<AppState>,
) -> Result<Json<Vec<Waypoint>>, ApiError> {
    Ok(Json(state.authority.read().list_waypoints()?))
}

pub async fn create_waypoint(
    State(state): State<AppState>,
    Json(location): Json<Point3>,
) -> Result<Json<Waypoint>, ApiError> {
    Ok(Json(state.authority.write().create_waypoint(location)?))
}

pub async fn move_waypoint(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(location): Json<Point3>,
) -> Result<Json<Waypoint>, ApiError> {
    Ok(Json(state.authority.write().move_waypoint(&id, location)?))
}

#[derive(Debug, Deserialize)]
pub struct ConnectBody {
    pub a: String,
    pub b: String,
}

pub async fn connect_waypoints(
    State(state): State<AppState>,
    Json(body): Json<ConnectBody>,
) -> Result<StatusCode, ApiError> {
    state.authority.write().connect_waypoints(&body.a, &body.b)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_waypoint(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.authority.write().delete_waypoint(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_settings(
    State(state): State<AppState>,
) -> Result<Json<FacilitySettings>, ApiError> {
    Ok(Json(state.authority.read().get_settings()?))
}

#[derive(Debug, Deserialize)]
pub struct LandmarkBody {
    pub kind: Landmark,
    pub location: Point3,
}

pub async fn update_landmark(
    State(state): State<AppState>,
    Json(body): Json<LandmarkBody>,
) -> Result<Json<FacilitySettings>, ApiError> {
    Ok(Json(
        state
            .authority
            .write()
            .update_landmark(body.kind, body.location)?,
    ))
}

pub async fn optimize_route(
    State(state): State<AppState>,
    Json(skus): Json<Vec<Sku>>,
) -> Result<Json<Route>, ApiError> {
    Ok(Json(state.authority.read().optimized_route(&skus)?))
}
