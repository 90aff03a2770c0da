mod firestore;
pub use firestore::*;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{Entry, NewEntry, SortOrder, UserId};

/// Failure classes of the remote entry store. Each maps to a distinct
/// user-facing message; none is ever retried automatically.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("entry store denied permission")]
    PermissionDenied,
    #[error("entry store is unavailable")]
    Unavailable,
    #[error("entry store rejected the session")]
    Unauthenticated,
    #[error("entry store quota exceeded")]
    QuotaExceeded,
    #[error("could not reach the entry store")]
    Network(#[source] reqwest::Error),
    #[error("entry store error: {message}")]
    Other { message: String },
}

impl StoreError {
    /// Message shown to the operator, who may correct the situation and
    /// resubmit by hand.
    pub fn user_message(&self) -> String {
        match self {
            StoreError::PermissionDenied => {
                "You don't have permission to save entries. Please check your account.".to_owned()
            }
            StoreError::Unavailable => {
                "Database is currently unavailable. Please try again later.".to_owned()
            }
            StoreError::Unauthenticated => {
                "Your session has expired. Please log in again.".to_owned()
            }
            StoreError::QuotaExceeded => {
                "Storage quota exceeded. Please contact support.".to_owned()
            }
            StoreError::Network(_) => {
                "Network error. Please check your internet connection.".to_owned()
            }
            StoreError::Other { message } => message.clone(),
        }
    }
}

/// Remote entry store collaborator. Insert and by-owner retrieval is all
/// this application ever needs; deletion happens out of band.
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Persist a new entry. The store assigns the id and the creation
    /// timestamps returned on the stored entry.
    async fn insert(&self, entry: NewEntry) -> Result<Entry, StoreError>;

    /// All entries owned by `owner`, ordered by entry date with creation
    /// time as tie-break.
    async fn list_for_owner(
        &self,
        owner: &UserId,
        order: SortOrder,
        limit: Option<u32>,
    ) -> Result<Vec<Entry>, StoreError>;
}
