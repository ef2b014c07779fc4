use std::sync::Arc;

use axum::extract::{Path as AxumPath, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use foundation::{GeographicTilingScheme, MAX_TILE_LEVEL};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::quadtree::{City, QuadTree};

pub const DEFAULT_MAX_POINTS: usize = 4;

#[derive(Clone)]
pub struct AppState {
    pub tree: Arc<QuadTree>,
    pub scheme: GeographicTilingScheme,
    pub max_points: usize,
}

impl AppState {
    pub fn new(tree: QuadTree, max_points: usize) -> Self {
        Self {
            tree: Arc::new(tree),
            scheme: GeographicTilingScheme::new(),
            max_points,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TileResponse<'a> {
    pub features: Vec<&'a City>,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods([Method::GET, Method::OPTIONS]);

    Router::new()
        .route("/healthz", get(healthz))
        .route("/:grid/:z/:x/:tile", get(get_tile))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> Response {
    (StatusCode::OK, "ok").into_response()
}

/// `/{grid}/{z}/{x}/{y}.{format}`. Grid and format are accepted as-is; the
/// tile is always a geographic-scheme tile answered with JSON.
async fn get_tile(
    State(state): State<AppState>,
    AxumPath((grid, z, x, tile)): AxumPath<(String, u32, u32, String)>,
) -> Response {
    let Some((y, _format)) = tile.split_once('.') else {
        return (StatusCode::BAD_REQUEST, "expected {y}.{format}").into_response();
    };
    let Ok(y) = y.parse::<u32>() else {
        return (StatusCode::BAD_REQUEST, "invalid tile row").into_response();
    };

    match tile_features(&state, z, x, y) {
        Some(features) => {
            debug!("{grid}/{z}/{x}/{y}: {} features", features.len());
            Json(TileResponse { features }).into_response()
        }
        None => (StatusCode::BAD_REQUEST, "tile out of range").into_response(),
    }
}

/// Cities to show on geographic tile `(z, x, y)`, or `None` if no such tile.
pub fn tile_features(state: &AppState, z: u32, x: u32, y: u32) -> Option<Vec<&City>> {
    if z > MAX_TILE_LEVEL
        || x >= state.scheme.tiles_x_at_level(z)
        || y >= state.scheme.tiles_y_at_level(z)
    {
        return None;
    }

    let bbox = state.scheme.tile_xy_to_rectangle(x, y, z);
    Some(state.tree.box_points(&bbox, Some(state.max_points)))
}
