//! Map-view derivation: which entries become pins, and where the map
//! should initially look.

use serde::Serialize;

use crate::model::Entry;

/// Fallback view over the Atlantic seaboard when nothing is pinned yet.
pub const DEFAULT_CENTER: (f64, f64) = (40.7128, -74.0060);

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub center_lat: f64,
    pub center_lon: f64,
    pub zoom: u8,
}

/// Only entries with actual coordinates become pins; an address alone is
/// not mappable.
pub fn pinned_entries(entries: &[Entry]) -> Vec<Entry> {
    entries
        .iter()
        .filter(|entry| entry.coordinates().is_some())
        .cloned()
        .collect()
}

/// Center on the arithmetic mean of the pins, zoomed close for a single
/// pin and wide for a spread.
pub fn viewport(pins: &[Entry]) -> Viewport {
    let coordinates: Vec<_> = pins.iter().filter_map(|entry| entry.coordinates()).collect();
    if coordinates.is_empty() {
        return Viewport {
            center_lat: DEFAULT_CENTER.0,
            center_lon: DEFAULT_CENTER.1,
            zoom: 2,
        };
    }
    let count = coordinates.len() as f64;
    Viewport {
        center_lat: coordinates.iter().map(|c| c.lat_degrees()).sum::<f64>() / count,
        center_lon: coordinates.iter().map(|c| c.lon_degrees()).sum::<f64>() / count,
        zoom: if coordinates.len() == 1 { 10 } else { 4 },
    }
}
