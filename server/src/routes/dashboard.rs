use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::get;
use axum::{Json, Router};
use tracing::{instrument, warn};

use app_core::model::SortOrder;
use app_core::stats::{journal_stats, recent_entries};

use crate::app_state::SharedState;
use crate::auth::require_identity;
use crate::http_error::ApiResult;
use crate::schema::{DashboardResponse, Entry};

/// The dashboard shows at most this many recent adventures.
const RECENT_COUNT: usize = 3;

pub fn router() -> Router<SharedState> {
    Router::new().route("/", get(get_dashboard))
}

#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses((status = 200, body = DashboardResponse))
)]
#[instrument(skip(app_state, headers))]
pub async fn get_dashboard(
    State(app_state): State<SharedState>,
    headers: HeaderMap,
) -> ApiResult<Json<DashboardResponse>> {
    let identity = require_identity(&app_state, &headers).await?;
    let entries = app_state
        .store
        .list_for_owner(&identity.id, SortOrder::NewestFirst, None)
        .await
        .map_err(|err| {
            warn!(%err, "dashboard fetch failed");
            err
        })?;
    Ok(Json(DashboardResponse {
        stats: journal_stats(&entries).into(),
        recent_entries: recent_entries(&entries, RECENT_COUNT)
            .iter()
            .map(Entry::from)
            .collect(),
    }))
}
