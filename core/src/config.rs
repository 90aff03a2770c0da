use camino::{Utf8Path as Path, Utf8PathBuf as PathBuf};
use color_eyre::eyre::{Context, Result};
use serde::Deserialize;

use crate::auth::IDENTITY_TOOLKIT_URL;
use crate::image::IMGBB_API_URL;
use crate::store::FIRESTORE_API_URL;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct TomlStore {
    project_id: String,
    api_key: Option<String>,
    base_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct TomlImageHost {
    api_key: Option<String>,
    base_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct TomlAuth {
    api_key: String,
    base_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct TomlConfig {
    address: Option<String>,
    port: Option<u16>,
    static_dir: Option<String>,
    #[serde(rename = "Store")]
    store: TomlStore,
    #[serde(rename = "ImageHost")]
    image_host: Option<TomlImageHost>,
    #[serde(rename = "Auth")]
    auth: TomlAuth,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub project_id: String,
    pub api_key: Option<String>,
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHostConfig {
    /// uploads fail with a configuration error when absent
    pub api_key: Option<String>,
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    pub api_key: String,
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub address: Option<String>,
    pub port: Option<u16>,
    pub static_dir: Option<PathBuf>,
    pub store: StoreConfig,
    pub image_host: ImageHostConfig,
    pub auth: AuthConfig,
}

fn from_toml(toml_config: TomlConfig) -> Config {
    let store = StoreConfig {
        project_id: toml_config.store.project_id,
        api_key: toml_config.store.api_key,
        base_url: toml_config
            .store
            .base_url
            .unwrap_or_else(|| FIRESTORE_API_URL.to_owned()),
    };
    let image_host = match toml_config.image_host {
        Some(image_host) => ImageHostConfig {
            api_key: image_host.api_key,
            base_url: image_host
                .base_url
                .unwrap_or_else(|| IMGBB_API_URL.to_owned()),
        },
        None => ImageHostConfig {
            api_key: None,
            base_url: IMGBB_API_URL.to_owned(),
        },
    };
    let auth = AuthConfig {
        api_key: toml_config.auth.api_key,
        base_url: toml_config
            .auth
            .base_url
            .unwrap_or_else(|| IDENTITY_TOOLKIT_URL.to_owned()),
    };
    Config {
        address: toml_config.address,
        port: toml_config.port,
        static_dir: toml_config.static_dir.map(PathBuf::from),
        store,
        image_host,
        auth,
    }
}

pub fn parse_config(toml_str: &str) -> Result<Config> {
    let toml_config: TomlConfig = toml::from_str(toml_str).context("Error parsing config file")?;
    Ok(from_toml(toml_config))
}

pub async fn read_config(path: &Path) -> Result<Config> {
    let toml_str = tokio::fs::read_to_string(path)
        .await
        .context(format!("Error reading config file {}", path))?;
    parse_config(&toml_str)
}

#[cfg(test)]
mod test {
    use claims::assert_ok;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_a_full_config() {
        let config = assert_ok!(parse_config(
            r#"
address = "0.0.0.0"
port = 8080
static_dir = "./static"

[Store]
project_id = "demo-project"
api_key = "store-key"

[ImageHost]
api_key = "img-key"

[Auth]
api_key = "web-key"
base_url = "http://localhost:9099"
"#,
        ));
        assert_eq!(config.address.as_deref(), Some("0.0.0.0"));
        assert_eq!(config.port, Some(8080));
        assert_eq!(config.store.project_id, "demo-project");
        assert_eq!(config.store.base_url, FIRESTORE_API_URL);
        assert_eq!(config.image_host.api_key.as_deref(), Some("img-key"));
        assert_eq!(config.auth.base_url, "http://localhost:9099");
    }

    #[test]
    fn image_host_section_is_optional() {
        let config = assert_ok!(parse_config(
            r#"
[Store]
project_id = "demo-project"

[Auth]
api_key = "web-key"
"#,
        ));
        assert_eq!(config.image_host.api_key, None);
        assert_eq!(config.image_host.base_url, IMGBB_API_URL);
        assert_eq!(config.static_dir, None);
    }
}
