use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::http::Method;
use axum::routing::{delete, get, post, put};
use axum::Router;
use parking_lot::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use authority::InMemoryAuthority;

mod api;
mod floorplan;

#[derive(Clone)]
struct AppState {
    authority: Arc<RwLock<InMemoryAuthority>>,
    maps_dir: PathBuf,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let addr: SocketAddr = env::var("WAYFINDER_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
        .parse()
        .expect("invalid WAYFINDER_ADDR");
    let maps_dir = env::var("WAYFINDER_MAPS_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./uploaded-maps"));

    if let Err(err) = tokio::fs::create_dir_all(&maps_dir).await {
        warn!("failed to create maps dir: {err}");
    }

    let state = AppState {
        authority: Arc::new(RwLock::new(InMemoryAuthority::new())),
        maps_dir,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE]);

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/api/products", get(api::list_products).post(api::create_product))
        .route(
            "/api/products/:sku",
            put(api::update_product).delete(api::delete_product),
        )
        .route("/api/products/:sku/waypoint", put(api::assign_product))
        .route("/api/waypoints", get(api::list_waypoints).post(api::create_waypoint))
        .route("/api/waypoints/connect", post(api::connect_waypoints))
        .route("/api/waypoints/:id/location", put(api::move_waypoint))
        .route("/api/waypoints/:id", delete(api::delete_waypoint))
        .route("/api/settings", get(api::get_settings))
        .route("/api/settings/landmark", put(api::update_landmark))
        .route("/api/route/optimize", post(api::optimize_route))
        .route("/api/floorplan/active", get(floorplan::active))
        .route("/api/floorplan/upload", post(floorplan::upload))
        .route("/maps/:file", get(floorplan::serve_map))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("wayfinder authority listening on http://{addr}");
    axum::serve(tokio::net::TcpListener::bind(addr).await.unwrap(), app)
        .await
        .unwrap();
}

async fn healthz() -> &'static str {
    "ok"
}
