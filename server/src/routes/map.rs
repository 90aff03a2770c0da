use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::get;
use axum::{Json, Router};
use tracing::{instrument, warn};

use app_core::atlas::{pinned_entries, viewport};
use app_core::model::SortOrder;

use crate::app_state::SharedState;
use crate::auth::require_identity;
use crate::http_error::ApiResult;
use crate::schema::{Entry, MapResponse};

pub fn router() -> Router<SharedState> {
    Router::new().route("/", get(get_map))
}

#[utoipa::path(get, path = "/api/map", responses((status = 200, body = MapResponse)))]
#[instrument(skip(app_state, headers))]
pub async fn get_map(
    State(app_state): State<SharedState>,
    headers: HeaderMap,
) -> ApiResult<Json<MapResponse>> {
    let identity = require_identity(&app_state, &headers).await?;
    let entries = app_state
        .store
        .list_for_owner(&identity.id, SortOrder::NewestFirst, None)
        .await
        .map_err(|err| {
            warn!(%err, "map fetch failed");
            err
        })?;
    let pins = pinned_entries(&entries);
    let viewport = viewport(&pins);
    Ok(Json(MapResponse::new(
        pins.iter().map(Entry::from).collect(),
        viewport,
    )))
}
