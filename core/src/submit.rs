use chrono::Utc;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::image::{validate_image, ImageHost, ImageRejected, UploadError};
use crate::model::{DraftError, Entry, EntryDraft, Identity, NewEntry};
use crate::store::{EntryStore, StoreError};

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Draft(#[from] DraftError),
    #[error(transparent)]
    Image(#[from] ImageRejected),
    #[error("you must be signed in to save an entry")]
    NotSignedIn,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Outcome of a submission attempt that did not fail outright.
#[derive(Debug)]
pub enum Submission {
    Saved(Entry),
    /// The image upload failed but the rest of the entry is intact. The
    /// caller decides: resolve the continuation to save without the
    /// image, or drop it to abandon the submission. Either way the
    /// narrative is never lost silently.
    AwaitingImageDecision {
        reason: UploadError,
        pending: PendingEntry,
    },
}

/// A fully validated entry record held back by a failed image upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEntry {
    record: NewEntry,
}

impl PendingEntry {
    /// Persist the held-back record with no image attached. Exactly one
    /// insert call, performed here.
    pub async fn save_without_image(self, store: &dyn EntryStore) -> Result<Entry, StoreError> {
        debug_assert!(self.record.image_url.is_none());
        store.insert(self.record).await
    }
}

/// Validate a draft, upload its image if any, and persist the entry.
///
/// Pure function of its inputs: the authenticated identity is passed in
/// explicitly and denormalized onto the record at this instant. Local
/// validation runs before any collaborator is contacted, and a failed
/// upload never aborts the submission on its own (see [`Submission`]).
/// Store failures are returned classified and are not retried; the
/// operator resubmits by hand if they choose to.
#[instrument(skip_all, fields(has_image = draft.image.is_some()))]
pub async fn submit(
    draft: EntryDraft,
    identity: Option<&Identity>,
    store: &dyn EntryStore,
    images: &dyn ImageHost,
) -> Result<Submission, SubmitError> {
    let draft = draft.validated()?;
    let identity = identity.ok_or(SubmitError::NotSignedIn)?;
    let owner = identity.stamp();

    let mut record = NewEntry {
        title: draft.title,
        story: draft.story,
        date: draft.date,
        location: draft.location,
        image_url: None,
        owner,
    };

    if let Some(image) = &draft.image {
        validate_image(image)?;
        let name = format!(
            "adventure_{}_{}",
            record.owner.id.0,
            Utc::now().timestamp_millis()
        );
        match images.upload(image, Some(&name)).await {
            Ok(url) => {
                record.image_url = Some(url);
            }
            Err(reason) => {
                warn!(%reason, "image upload failed, awaiting decision");
                return Ok(Submission::AwaitingImageDecision {
                    reason,
                    pending: PendingEntry { record },
                });
            }
        }
    }

    let entry = store.insert(record).await?;
    info!(id = %entry.id, "entry saved");
    Ok(Submission::Saved(entry))
}
