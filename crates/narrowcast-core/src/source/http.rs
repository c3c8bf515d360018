use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, Proxy, Response};
use serde::Serialize;
use url::Url;

use super::{Photo, PosterSource};
use crate::config::AppConfig;
use crate::poster::PosterList;
use crate::{Error, Result};

const POSTERS_PATH: &str = "api/handler/poster";
const PHOTO_PATH: &str = "api/handler/poster/photo";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PhotoRequest<'a> {
    album_ids: &'a [u64],
}

/// Poster source backed by the signage backend's HTTP API
pub struct HttpPosterSource {
    client: Client,
    base_url: Url,
}

impl HttpPosterSource {
    /// Create a new source from configuration
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = Self::build_client(config.api.request_timeout_secs, &config.api.proxy_url)?;
        let base_url = Self::normalize_base(&config.api.base_url)?;

        Ok(Self { client, base_url })
    }

    /// Build HTTP client with optional proxy
    fn build_client(timeout_secs: u64, proxy_url: &Option<String>) -> Result<Client> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .default_headers(headers)
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(10));

        if let Some(ref proxy) = proxy_url {
            let proxy = Proxy::all(proxy)
                .map_err(|e| Error::Config(format!("Invalid proxy URL: {}", e)))?;
            builder = builder.proxy(proxy);
            tracing::info!("Using HTTP proxy for poster fetching");
        }

        builder.build().map_err(Error::Http)
    }

    /// Parse the base URL and make sure relative joins keep its path
    fn normalize_base(base: &str) -> Result<Url> {
        let mut url = Url::parse(base)?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    /// Resolve an endpoint path against the base URL
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// Turn non-2xx responses into API errors carrying the body text
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        Err(Error::Api {
            status: status.as_u16(),
            message: if message.is_empty() {
                status.canonical_reason().unwrap_or("unknown").to_string()
            } else {
                message
            },
        })
    }
}

#[async_trait::async_trait]
impl PosterSource for HttpPosterSource {
    async fn get_posters(&self) -> Result<PosterList> {
        let url = self.endpoint(POSTERS_PATH)?;
        tracing::debug!(%url, "Fetching posters");

        let response = Self::check(self.client.get(url).send().await?).await?;
        let list: PosterList = response.json().await?;

        tracing::debug!(
            posters = list.posters.len(),
            borrel_mode = list.borrel_mode,
            "Fetched posters"
        );
        Ok(list)
    }

    async fn get_photo(&self, album_ids: &[u64]) -> Result<Photo> {
        let url = self.endpoint(PHOTO_PATH)?;
        tracing::debug!(%url, ?album_ids, "Fetching photo");

        let body = PhotoRequest { album_ids };
        let response = Self::check(self.client.post(url).json(&body).send().await?).await?;
        Ok(response.json().await?)
    }
}
