use chrono::{DateTime, NaiveDate, Utc};

use super::{EntryId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry {
    pub id: EntryId,
    /// Non-empty after trimming, enforced on submission
    pub title: String,
    /// Non-empty after trimming, enforced on submission
    pub story: String,
    /// Calendar date the author assigned, no time component
    pub date: NaiveDate,
    pub location: Option<EntryLocation>,
    pub image_url: Option<String>,
    pub owner: OwnerStamp,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Entry fields as sent to the remote store, before it assigns an id
/// and creation timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NewEntry {
    pub title: String,
    pub story: String,
    pub date: NaiveDate,
    pub location: Option<EntryLocation>,
    pub image_url: Option<String>,
    pub owner: OwnerStamp,
}

/// Identity of the creating user, captured at creation time and never
/// updated afterwards even if the profile changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnerStamp {
    pub id: UserId,
    pub email: String,
    pub display_name: String,
}

/// A location may carry an address without coordinates (hand-typed in the
/// form); such a location does not count as "located" for filtering or
/// map purposes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryLocation {
    pub coordinates: Option<GpsCoordinates>,
    pub address: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GpsCoordinates {
    /// degrees multiplied by 10e8
    pub lat: i64,
    /// degrees multiplied by 10e8
    pub lon: i64,
}

const GPS_SCALE: f64 = 100_000_000.0;

impl GpsCoordinates {
    pub fn from_degrees(lat: f64, lon: f64) -> GpsCoordinates {
        GpsCoordinates {
            lat: (lat * GPS_SCALE) as i64,
            lon: (lon * GPS_SCALE) as i64,
        }
    }

    pub fn lat_degrees(&self) -> f64 {
        self.lat as f64 / GPS_SCALE
    }

    pub fn lon_degrees(&self) -> f64 {
        self.lon as f64 / GPS_SCALE
    }
}

impl Entry {
    pub fn coordinates(&self) -> Option<GpsCoordinates> {
        self.location.as_ref().and_then(|l| l.coordinates)
    }

    pub fn has_photo(&self) -> bool {
        self.image_url.is_some()
    }
}
