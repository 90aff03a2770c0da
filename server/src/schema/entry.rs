use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use app_core::model;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: String,
    pub title: String,
    pub story: String,
    pub date: NaiveDate,
    pub location: Option<Location>,
    pub image_url: Option<String>,
    pub user_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Wire shape of a location: coordinates are a pair of optional decimal
/// degrees, the web client omits them for a hand-typed address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub address: Option<String>,
}

impl From<&model::Entry> for Entry {
    fn from(value: &model::Entry) -> Self {
        Entry {
            id: value.id.0.clone(),
            title: value.title.clone(),
            story: value.story.clone(),
            date: value.date,
            location: value.location.as_ref().map(Into::into),
            image_url: value.image_url.clone(),
            user_name: value.owner.display_name.clone(),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl From<&model::EntryLocation> for Location {
    fn from(value: &model::EntryLocation) -> Self {
        Location {
            lat: value.coordinates.map(|c| c.lat_degrees()),
            lng: value.coordinates.map(|c| c.lon_degrees()),
            address: Some(value.address.clone()),
        }
    }
}

impl From<Location> for model::EntryLocation {
    fn from(value: Location) -> Self {
        let coordinates = match (value.lat, value.lng) {
            (Some(lat), Some(lng)) => Some(model::GpsCoordinates::from_degrees(lat, lng)),
            _ => None,
        };
        model::EntryLocation {
            coordinates,
            address: value.address.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct TimelineQuery {
    /// "desc" (newest first, the default) or "asc"
    #[param(value_type = Option<String>)]
    pub sort: Option<model::SortOrder>,
    pub search: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub has_location: Option<bool>,
    pub has_photo: Option<bool>,
}

impl TimelineQuery {
    pub fn filter(&self) -> model::EntryFilter {
        model::EntryFilter {
            date_from: self.date_from,
            date_to: self.date_to,
            has_location: self.has_location.unwrap_or(false),
            has_photo: self.has_photo.unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimelineResponse {
    pub entries: Vec<Entry>,
    /// size of the unfiltered source list
    pub total: usize,
    /// size of the displayed list after search and filters
    pub matching: usize,
    #[schema(value_type = String)]
    pub sort: model::SortOrder,
}

/// Image bytes travel base64-encoded in the request body.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImagePayload {
    pub data: String,
    pub mime_type: String,
    pub file_name: Option<String>,
}

/// What to do when the entry is fine but its image upload fails. The
/// default abandons the submission so nothing is saved behind the
/// author's back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum UploadFallback {
    SaveWithoutImage,
    #[default]
    Abandon,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntryRequest {
    pub title: String,
    pub story: String,
    /// defaults to today when absent
    pub date: Option<NaiveDate>,
    pub location: Option<Location>,
    pub image: Option<ImagePayload>,
    #[serde(default)]
    pub if_upload_fails: UploadFallback,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum SubmitResponse {
    #[serde(rename_all = "camelCase")]
    Saved { entry: Entry, without_image: bool },
    #[serde(rename_all = "camelCase")]
    NotSaved { reason: String },
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn location_with_one_missing_coordinate_has_no_coordinates() {
        let location: model::EntryLocation = Location {
            lat: Some(48.85),
            lng: None,
            address: Some("Paris".to_owned()),
        }
        .into();
        assert_eq!(location.coordinates, None);
        assert_eq!(location.address, "Paris");
    }

    #[test]
    fn create_request_defaults_to_abandon_on_upload_failure() {
        let request: CreateEntryRequest =
            serde_json::from_str(r#"{ "title": "t", "story": "s" }"#).unwrap();
        assert_eq!(request.if_upload_fails, UploadFallback::Abandon);
        assert_eq!(request.date, None);
    }

    #[test]
    fn submit_response_is_status_tagged() {
        let json = serde_json::to_value(SubmitResponse::NotSaved {
            reason: "Image upload failed".to_owned(),
        })
        .unwrap();
        assert_eq!(json["status"], "notSaved");
        assert_eq!(json["reason"], "Image upload failed");
    }
}
