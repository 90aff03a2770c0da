mod imgbb;
pub use imgbb::*;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::ImageFile;

/// Uploads stay well under the host's own cap so a single oversized photo
/// cannot stall a submission for minutes.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageRejected {
    #[error("file must be an image, got {mime_type}")]
    NotAnImage { mime_type: String },
    #[error("image size must be less than 10 MiB, got {size_bytes} bytes")]
    TooLarge { size_bytes: usize },
}

/// Local pre-flight check, run before any network call is made.
pub fn validate_image(file: &ImageFile) -> Result<(), ImageRejected> {
    if !file.mime_type.starts_with("image/") {
        return Err(ImageRejected::NotAnImage {
            mime_type: file.mime_type.clone(),
        });
    }
    if file.size_bytes() > MAX_IMAGE_BYTES {
        return Err(ImageRejected::TooLarge {
            size_bytes: file.size_bytes(),
        });
    }
    Ok(())
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("image host API key not configured")]
    MissingApiKey,
    #[error(transparent)]
    Rejected(#[from] ImageRejected),
    #[error("image host returned HTTP status {status}")]
    Http { status: u16 },
    #[error("image host reported an error: {message}")]
    Service { message: String },
    #[error("could not reach the image host")]
    Network(#[source] reqwest::Error),
}

/// Remote image host collaborator: takes image bytes, returns a public
/// URL where the image can be viewed.
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Precondition (checked): `file` passes [`validate_image`].
    async fn upload(&self, file: &ImageFile, name: Option<&str>) -> Result<String, UploadError>;
}
