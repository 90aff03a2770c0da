use utoipa::OpenApi;

use crate::routes;
use crate::schema;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::entries::get_entries,
        routes::entries::create_entry,
        routes::entries::export_entries,
        routes::dashboard::get_dashboard,
        routes::map::get_map,
    ),
    components(schemas(
        schema::Entry,
        schema::Location,
        schema::TimelineResponse,
        schema::ImagePayload,
        schema::UploadFallback,
        schema::CreateEntryRequest,
        schema::SubmitResponse,
        schema::Stats,
        schema::DashboardResponse,
        schema::MapResponse,
    ))
)]
pub struct ApiDoc;
