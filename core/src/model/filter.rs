use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Structured timeline filters. All fields are independently toggleable
/// and combined with logical AND; the default value filters nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct EntryFilter {
    /// Inclusive lower bound on the entry date
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper bound on the entry date
    pub date_to: Option<NaiveDate>,
    /// Keep only entries with actual coordinates
    pub has_location: bool,
    /// Keep only entries with an attached photo
    pub has_photo: bool,
}

/// Retrieval order for a user's entries. The wire spelling matches what
/// the web client sends ("desc" is newest first).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
pub enum SortOrder {
    #[default]
    #[serde(rename = "desc")]
    #[strum(serialize = "desc")]
    NewestFirst,
    #[serde(rename = "asc")]
    #[strum(serialize = "asc")]
    OldestFirst,
}
