use serde::Serialize;
use utoipa::ToSchema;

use app_core::atlas::Viewport;

use super::Entry;

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MapResponse {
    /// entries with coordinates, in retrieval order
    pub pins: Vec<Entry>,
    pub center_lat: f64,
    pub center_lng: f64,
    pub zoom: u8,
}

impl MapResponse {
    pub fn new(pins: Vec<Entry>, viewport: Viewport) -> MapResponse {
        MapResponse {
            pins,
            center_lat: viewport.center_lat,
            center_lng: viewport.center_lon,
            zoom: viewport.zoom,
        }
    }
}
