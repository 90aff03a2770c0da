//! Derivation of the displayed timeline from a user's full entry list.
//!
//! The displayed list is a pure function of `(source, search term,
//! filters)`: search and every active filter are independent predicates
//! combined by intersection, and the source order is preserved. There is
//! no cached state, the presentation layer recomputes on every input
//! change.

use crate::model::{Entry, EntryFilter, SortOrder};

/// Compute the displayed subset of `source`. With an empty search term
/// and a default filter this returns the source list unchanged.
pub fn derive_view(source: &[Entry], search_term: &str, filter: &EntryFilter) -> Vec<Entry> {
    let needle = search_term.trim().to_lowercase();
    source
        .iter()
        .filter(|entry| matches_search(entry, &needle) && matches_filter(entry, filter))
        .cloned()
        .collect()
}

/// Case-insensitive substring match over title, story and address. An
/// entry without an address simply cannot match on it.
fn matches_search(entry: &Entry, needle_lowercase: &str) -> bool {
    if needle_lowercase.is_empty() {
        return true;
    }
    entry.title.to_lowercase().contains(needle_lowercase)
        || entry.story.to_lowercase().contains(needle_lowercase)
        || entry
            .location
            .as_ref()
            .is_some_and(|location| location.address.to_lowercase().contains(needle_lowercase))
}

fn matches_filter(entry: &Entry, filter: &EntryFilter) -> bool {
    if let Some(from) = filter.date_from {
        if entry.date < from {
            return false;
        }
    }
    if let Some(to) = filter.date_to {
        if entry.date > to {
            return false;
        }
    }
    if filter.has_location && entry.coordinates().is_none() {
        return false;
    }
    if filter.has_photo && !entry.has_photo() {
        return false;
    }
    true
}

/// In-memory re-sort, equivalent to re-fetching in the other order.
/// Ties on the calendar date break by creation time, then id, so
/// repeated renders never reorder visually identical entries.
pub fn sort_entries(entries: &mut [Entry], order: SortOrder) {
    entries.sort_by(|a, b| {
        let ordering = (a.date, a.created_at, &a.id).cmp(&(b.date, b.created_at, &b.id));
        match order {
            SortOrder::OldestFirst => ordering,
            SortOrder::NewestFirst => ordering.reverse(),
        }
    });
}
