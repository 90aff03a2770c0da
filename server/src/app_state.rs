use std::sync::Arc;

use app_core::{auth::IdentityProvider, image::ImageHost, store::EntryStore};

pub struct AppState {
    pub store: Arc<dyn EntryStore>,
    pub images: Arc<dyn ImageHost>,
    pub identity: Arc<dyn IdentityProvider>,
}

pub type SharedState = Arc<AppState>;
