//! reqwest implementation of [`Backend`].

use async_trait::async_trait;
use image::RgbaImage;
use reqwest::{header, Client, Response, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{Backend, SaveAck};
use crate::error::StampError;
use crate::placement::ConfigStore;

/// Talks to a stamp server over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base: Url,
}

impl HttpBackend {
    /// Create a backend for the server at `base_url` (e.g. `http://127.0.0.1:5000`).
    pub fn new(base_url: &str) -> Result<Self, StampError> {
        let client = Client::builder()
            .user_agent(concat!("stampcal/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Self::with_client(client, base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Result<Self, StampError> {
        let base = Url::parse(base_url)
            .map_err(|e| StampError::Config(format!("Invalid backend URL '{}': {}", base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(StampError::Config(format!(
                "Backend URL '{}' cannot be used as a base",
                base_url
            )));
        }
        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Build `base/<segments...>`, percent-encoding each segment.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, StampError> {
        debug!(%url, "GET");
        let response = self.client.get(url).send().await?;
        let bytes = ensure_success(response).await?.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

async fn ensure_success(response: Response) -> Result<Response, StampError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(StampError::Backend(format!(
            "{} returned {}",
            response.url(),
            status
        )))
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn list_stamps(&self) -> Result<Vec<String>, StampError> {
        self.get_json(self.endpoint(&["api", "stamps"])).await
    }

    async fn load_config(&self) -> Result<ConfigStore, StampError> {
        self.get_json(self.endpoint(&["api", "config"])).await
    }

    async fn save_config(&self, store: &ConfigStore) -> Result<SaveAck, StampError> {
        let url = self.endpoint(&["api", "config"]);
        let body = serde_json::to_vec(store)?;
        debug!(%url, stamps = store.len(), bytes = body.len(), "POST config");

        let response = self
            .client
            .post(url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;
        let bytes = ensure_success(response).await?.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn load_image(&self, name: &str) -> Result<RgbaImage, StampError> {
        let url = self.endpoint(&["images", name]);
        debug!(%url, "GET image");
        let response = self.client.get(url).send().await?;
        let bytes = ensure_success(response).await?.bytes().await?;
        Ok(image::load_from_memory(&bytes)?.to_rgba8())
    }
}
