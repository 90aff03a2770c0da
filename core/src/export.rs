//! One-shot JSON export of a user's whole journal, for download and
//! safekeeping outside the platform.

use chrono::{DateTime, NaiveDate, Utc};
use eyre::{Context, Result};
use serde::Serialize;

use crate::model::Entry;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportedEntry {
    id: String,
    title: String,
    story: String,
    date: NaiveDate,
    location: Option<ExportedLocation>,
    image_url: Option<String>,
    user_name: String,
    user_email: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
struct ExportedLocation {
    lat: Option<f64>,
    lng: Option<f64>,
    address: String,
}

impl From<&Entry> for ExportedEntry {
    fn from(entry: &Entry) -> Self {
        ExportedEntry {
            id: entry.id.0.clone(),
            title: entry.title.clone(),
            story: entry.story.clone(),
            date: entry.date,
            location: entry.location.as_ref().map(|location| ExportedLocation {
                lat: location.coordinates.map(|c| c.lat_degrees()),
                lng: location.coordinates.map(|c| c.lon_degrees()),
                address: location.address.clone(),
            }),
            image_url: entry.image_url.clone(),
            user_name: entry.owner.display_name.clone(),
            user_email: entry.owner.email.clone(),
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}

pub fn export_document(entries: &[Entry]) -> Result<String> {
    let exported: Vec<ExportedEntry> = entries.iter().map(ExportedEntry::from).collect();
    serde_json::to_string_pretty(&exported).wrap_err("error serializing export")
}

pub fn export_file_name(today: NaiveDate) -> String {
    format!("travel-journal-export-{today}.json")
}
