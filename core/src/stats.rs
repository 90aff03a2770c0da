//! Dashboard aggregates over a user's entries, all derived in memory
//! from a single by-owner fetch.

use itertools::Itertools;
use serde::Serialize;

use crate::model::Entry;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct JournalStats {
    pub total_entries: usize,
    /// distinct coordinate pairs among located entries
    pub total_places: usize,
    pub total_photos: usize,
    /// rough estimate, one country per three distinct places
    pub total_countries: usize,
}

pub fn journal_stats(entries: &[Entry]) -> JournalStats {
    let total_places = entries
        .iter()
        .filter_map(|entry| entry.coordinates())
        .unique()
        .count();
    let total_photos = entries.iter().filter(|entry| entry.has_photo()).count();
    JournalStats {
        total_entries: entries.len(),
        total_places,
        total_photos,
        total_countries: total_places.min(total_places.div_ceil(3)),
    }
}

/// The most recently created entries, newest first.
pub fn recent_entries(entries: &[Entry], count: usize) -> Vec<Entry> {
    let mut sorted: Vec<Entry> = entries.to_vec();
    sorted.sort_by(|a, b| (b.created_at, &b.id).cmp(&(a.created_at, &a.id)));
    sorted.truncate(count);
    sorted
}

#[cfg(test)]
mod test {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use crate::model::{EntryId, EntryLocation, GpsCoordinates, OwnerStamp, UserId};

    use super::*;

    fn entry(id: &str) -> Entry {
        Entry {
            id: EntryId::from(id),
            title: id.to_owned(),
            story: "story".to_owned(),
            date: "2024-01-01".parse().unwrap(),
            location: None,
            image_url: None,
            owner: OwnerStamp {
                id: UserId::from("user-1"),
                email: "ada@example.com".to_owned(),
                display_name: "Ada".to_owned(),
            },
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn located(id: &str, lat: f64, lon: f64) -> Entry {
        let mut e = entry(id);
        e.location = Some(EntryLocation {
            coordinates: Some(GpsCoordinates::from_degrees(lat, lon)),
            address: String::new(),
        });
        e
    }

    #[test]
    fn counts_distinct_places_and_photos() {
        let mut with_photo = entry("p");
        with_photo.image_url = Some("https://i.example/p.jpg".to_owned());
        let entries = vec![
            located("a", 48.85, 2.35),
            located("b", 48.85, 2.35),
            located("c", 35.68, 139.69),
            with_photo,
            entry("plain"),
        ];
        let stats = journal_stats(&entries);
        assert_eq!(stats.total_entries, 5);
        assert_eq!(stats.total_places, 2);
        assert_eq!(stats.total_photos, 1);
        assert_eq!(stats.total_countries, 1);
    }

    #[test]
    fn country_estimate_scales_with_places() {
        assert_eq!(journal_stats(&[]).total_countries, 0);
        let one = vec![located("a", 1.0, 1.0)];
        assert_eq!(journal_stats(&one).total_countries, 1);
        let four: Vec<Entry> = (0..4).map(|i| located(&format!("e{i}"), i as f64, 0.0)).collect();
        assert_eq!(journal_stats(&four).total_countries, 2);
    }

    #[test]
    fn recent_entries_are_newest_first_and_capped() {
        let mut entries = Vec::new();
        for (i, hour) in [(0usize, 8u32), (1, 10), (2, 9)] {
            let mut e = entry(&format!("e{i}"));
            e.created_at = Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap();
            entries.push(e);
        }
        let recent = recent_entries(&entries, 2);
        assert_eq!(
            recent.iter().map(|e| e.id.0.as_str()).collect::<Vec<_>>(),
            vec!["e1", "e2"]
        );
    }
}
