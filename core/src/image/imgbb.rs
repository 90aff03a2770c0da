use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::model::ImageFile;

use super::{validate_image, ImageHost, ImageRejected, UploadError};

pub const IMGBB_API_URL: &str = "https://api.imgbb.com";

/// Client for the imgbb upload API: one multipart POST, one JSON
/// response carrying either a public URL or an error message.
pub struct ImgbbHost {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl ImgbbHost {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> ImgbbHost {
        ImgbbHost {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key,
        }
    }

    fn upload_url(&self) -> String {
        format!("{}/1/upload", self.base_url)
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    success: bool,
    data: Option<UploadData>,
    error: Option<UploadResponseError>,
}

#[derive(Debug, Deserialize)]
struct UploadData {
    url: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponseError {
    message: Option<String>,
}

#[async_trait]
impl ImageHost for ImgbbHost {
    #[instrument(skip(self, file), fields(size = file.size_bytes(), mime = %file.mime_type))]
    async fn upload(&self, file: &ImageFile, name: Option<&str>) -> Result<String, UploadError> {
        let api_key = self.api_key.as_deref().ok_or(UploadError::MissingApiKey)?;
        validate_image(file)?;

        let image_part = multipart::Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.mime_type)
            .map_err(|_| {
                UploadError::Rejected(ImageRejected::NotAnImage {
                    mime_type: file.mime_type.clone(),
                })
            })?;
        let mut form = multipart::Form::new().part("image", image_part);
        if let Some(name) = name {
            form = form.text("name", name.to_owned());
        }

        let response = self
            .client
            .post(self.upload_url())
            .query(&[("key", api_key)])
            .multipart(form)
            .send()
            .await
            .map_err(UploadError::Network)?;
        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::Http {
                status: status.as_u16(),
            });
        }
        let body: UploadResponse = response.json().await.map_err(UploadError::Network)?;
        match (body.success, body.data) {
            (true, Some(data)) => {
                debug!(url = %data.url, "image uploaded");
                Ok(data.url)
            }
            _ => Err(UploadError::Service {
                message: body
                    .error
                    .and_then(|e| e.message)
                    .unwrap_or_else(|| String::from("upload failed")),
            }),
        }
    }
}

#[cfg(test)]
mod test {
    use claims::assert_ok_eq;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn photo() -> ImageFile {
        ImageFile {
            bytes: vec![1, 2, 3, 4],
            mime_type: "image/jpeg".to_owned(),
            file_name: "sunset.jpg".to_owned(),
        }
    }

    #[tokio::test]
    async fn upload_returns_public_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/1/upload"))
            .and(query_param("key", "k123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": { "url": "https://i.example/abc.jpg" },
            })))
            .expect(1)
            .mount(&server)
            .await;

        let host = ImgbbHost::new(server.uri(), Some("k123".to_owned()));
        assert_ok_eq!(
            host.upload(&photo(), Some("adventure_u1_1")).await,
            "https://i.example/abc.jpg"
        );
    }

    #[tokio::test]
    async fn service_reported_error_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/1/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "error": { "message": "Invalid API v1 key" },
            })))
            .mount(&server)
            .await;

        let host = ImgbbHost::new(server.uri(), Some("bad".to_owned()));
        let err = host.upload(&photo(), None).await.unwrap_err();
        match err {
            UploadError::Service { message } => assert_eq!(message, "Invalid API v1 key"),
            other => panic!("expected a service error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_success_status_maps_to_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/1/upload"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let host = ImgbbHost::new(server.uri(), Some("k".to_owned()));
        let err = host.upload(&photo(), None).await.unwrap_err();
        assert!(matches!(err, UploadError::Http { status: 502 }));
    }

    #[tokio::test]
    async fn missing_api_key_fails_before_any_request() {
        let server = MockServer::start().await;
        // expect(0) would be implicit; no mock is mounted so any request
        // would 404 and fail the Http assertion below
        let host = ImgbbHost::new(server.uri(), None);
        let err = host.upload(&photo(), None).await.unwrap_err();
        assert!(matches!(err, UploadError::MissingApiKey));
    }

    #[tokio::test]
    async fn oversized_file_fails_before_any_request() {
        let host = ImgbbHost::new("http://127.0.0.1:9", Some("k".to_owned()));
        let file = ImageFile {
            bytes: vec![0; super::super::MAX_IMAGE_BYTES + 1],
            mime_type: "image/png".to_owned(),
            file_name: "big.png".to_owned(),
        };
        let err = host.upload(&file, None).await.unwrap_err();
        assert!(matches!(
            err,
            UploadError::Rejected(ImageRejected::TooLarge { .. })
        ));
    }
}
