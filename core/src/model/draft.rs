use chrono::NaiveDate;
use thiserror::Error;

use super::EntryLocation;

/// An in-progress entry as captured by the submission form, before any
/// validation has run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryDraft {
    pub title: String,
    pub story: String,
    pub date: NaiveDate,
    pub location: Option<EntryLocation>,
    pub image: Option<ImageFile>,
}

/// Raw image attachment. Never persisted itself, only handed to the
/// image host which returns a public URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageFile {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub file_name: String,
}

impl ImageFile {
    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("story must not be empty")]
    EmptyStory,
}

/// A draft whose text fields are trimmed and known non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValidDraft {
    pub title: String,
    pub story: String,
    pub date: NaiveDate,
    pub location: Option<EntryLocation>,
    pub image: Option<ImageFile>,
}

impl EntryDraft {
    pub fn validated(self) -> Result<ValidDraft, DraftError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(DraftError::EmptyTitle);
        }
        let story = self.story.trim();
        if story.is_empty() {
            return Err(DraftError::EmptyStory);
        }
        Ok(ValidDraft {
            title: title.to_owned(),
            story: story.to_owned(),
            date: self.date,
            location: self.location,
            image: self.image,
        })
    }
}
