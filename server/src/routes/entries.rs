use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::Utc;
use tracing::{instrument, warn};

use app_core::model::{EntryDraft, ImageFile};
use app_core::submit::{submit, Submission};
use app_core::{export, pipeline};

use crate::app_state::SharedState;
use crate::auth::require_identity;
use crate::http_error::{ApiError, ApiResult};
use crate::schema::{
    CreateEntryRequest, Entry, ImagePayload, SubmitResponse, TimelineQuery, TimelineResponse,
    UploadFallback,
};

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(get_entries))
        .route("/", post(create_entry))
        .route("/export", get(export_entries))
}

#[utoipa::path(
    get,
    path = "/api/entries",
    params(TimelineQuery),
    responses((status = 200, body = TimelineResponse))
)]
#[instrument(skip(app_state, headers))]
pub async fn get_entries(
    State(app_state): State<SharedState>,
    Query(query): Query<TimelineQuery>,
    headers: HeaderMap,
) -> ApiResult<Json<TimelineResponse>> {
    let identity = require_identity(&app_state, &headers).await?;
    let sort = query.sort.unwrap_or_default();
    let source = app_state
        .store
        .list_for_owner(&identity.id, sort, None)
        .await
        .map_err(|err| {
            warn!(%err, "timeline fetch failed");
            err
        })?;
    let search = query.search.as_deref().unwrap_or("");
    tracing::debug!(%sort, total = source.len(), "deriving timeline view");
    let view = pipeline::derive_view(&source, search, &query.filter());
    Ok(Json(TimelineResponse {
        total: source.len(),
        matching: view.len(),
        entries: view.iter().map(Entry::from).collect(),
        sort,
    }))
}

fn decode_image(payload: ImagePayload) -> Result<ImageFile, ApiError> {
    let bytes = BASE64
        .decode(payload.data.as_bytes())
        .map_err(|_| ApiError::BadRequest("image data is not valid base64".to_owned()))?;
    Ok(ImageFile {
        bytes,
        mime_type: payload.mime_type,
        file_name: payload.file_name.unwrap_or_else(|| String::from("upload")),
    })
}

/// Submissions are single-shot: no automatic retry, and no idempotency
/// key, so a client that crashes mid-request and resubmits can produce a
/// duplicate entry.
#[utoipa::path(
    post,
    path = "/api/entries",
    request_body = CreateEntryRequest,
    responses(
        (status = 201, body = SubmitResponse),
        (status = 200, body = SubmitResponse, description = "submission abandoned after a failed image upload"),
    )
)]
#[instrument(skip(app_state, headers, request))]
pub async fn create_entry(
    State(app_state): State<SharedState>,
    headers: HeaderMap,
    Json(request): Json<CreateEntryRequest>,
) -> ApiResult<Response> {
    let identity = require_identity(&app_state, &headers).await?;
    let image = request.image.map(decode_image).transpose()?;
    let draft = EntryDraft {
        title: request.title,
        story: request.story,
        date: request.date.unwrap_or_else(|| Utc::now().date_naive()),
        location: request.location.map(Into::into),
        image,
    };
    let submission = submit(
        draft,
        Some(&identity),
        app_state.store.as_ref(),
        app_state.images.as_ref(),
    )
    .await?;
    let response = match submission {
        Submission::Saved(entry) => (
            StatusCode::CREATED,
            Json(SubmitResponse::Saved {
                entry: Entry::from(&entry),
                without_image: false,
            }),
        ),
        Submission::AwaitingImageDecision { reason, pending } => match request.if_upload_fails {
            UploadFallback::SaveWithoutImage => {
                let entry = pending.save_without_image(app_state.store.as_ref()).await?;
                (
                    StatusCode::CREATED,
                    Json(SubmitResponse::Saved {
                        entry: Entry::from(&entry),
                        without_image: true,
                    }),
                )
            }
            UploadFallback::Abandon => (
                StatusCode::OK,
                Json(SubmitResponse::NotSaved {
                    reason: format!("Image upload failed: {reason}"),
                }),
            ),
        },
    };
    Ok(response.into_response())
}

#[utoipa::path(
    get,
    path = "/api/entries/export",
    responses((status = 200, body = String, content_type = "application/json"))
)]
#[instrument(skip(app_state, headers))]
pub async fn export_entries(
    State(app_state): State<SharedState>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let identity = require_identity(&app_state, &headers).await?;
    let entries = app_state
        .store
        .list_for_owner(&identity.id, Default::default(), None)
        .await?;
    let document = export::export_document(&entries)?;
    let file_name = export::export_file_name(Utc::now().date_naive());
    let headers = [
        (header::CONTENT_TYPE, "application/json".to_owned()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{file_name}\""),
        ),
    ];
    Ok((headers, document).into_response())
}
