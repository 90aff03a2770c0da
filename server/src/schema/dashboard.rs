use serde::Serialize;
use utoipa::ToSchema;

use app_core::stats::JournalStats;

use super::Entry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_entries: usize,
    pub total_places: usize,
    pub total_photos: usize,
    pub total_countries: usize,
}

impl From<JournalStats> for Stats {
    fn from(value: JournalStats) -> Self {
        Stats {
            total_entries: value.total_entries,
            total_places: value.total_places,
            total_photos: value.total_photos,
            total_countries: value.total_countries,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub stats: Stats,
    pub recent_entries: Vec<Entry>,
}
