use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::json;

use super::error::PhotosError;
use super::types::{Album, AlbumListPage, SearchPage, SearchRequest};
use super::PhotosApi;

pub const DEFAULT_BASE_URL: &str = "https://photoslibrary.googleapis.com/v1";

/// Bearer-token HTTP client for the Photos Library API.
#[derive(Clone)]
pub struct PhotosClient {
    http: Client,
    base_url: String,
    access_token: String,
}

impl std::fmt::Debug for PhotosClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotosClient")
            .field("base_url", &self.base_url)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

impl PhotosClient {
    pub fn new(http: Client, access_token: String) -> Self {
        Self::with_base_url(http, DEFAULT_BASE_URL, access_token)
    }

    pub fn with_base_url(http: Client, base_url: &str, access_token: String) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, PhotosError> {
        let response = builder.bearer_auth(&self.access_token).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(PhotosError::from_response(status.as_u16(), &body));
        }
        // Some endpoints answer `{}` or an empty body on success
        let body = if body.trim().is_empty() { "{}" } else { body.as_str() };
        Ok(serde_json::from_str(body)?)
    }
}

#[async_trait::async_trait]
impl PhotosApi for PhotosClient {
    async fn list_albums(
        &self,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<AlbumListPage, PhotosError> {
        let url = self.url("albums");
        tracing::debug!("GET {}", url);
        let mut builder = self
            .http
            .get(&url)
            .query(&[("pageSize", page_size.to_string())]);
        if let Some(token) = page_token {
            builder = builder.query(&[("pageToken", token)]);
        }
        self.send(builder).await
    }

    async fn create_album(&self, title: &str) -> Result<Album, PhotosError> {
        let url = self.url("albums");
        tracing::debug!("POST {}", url);
        let album: Album = self
            .send(self.http.post(&url).json(&json!({"album": {"title": title}})))
            .await?;
        if album.id.is_empty() {
            return Err(PhotosError::InvalidResponse(
                "created album has no id".to_string(),
            ));
        }
        Ok(album)
    }

    async fn search_media_items(&self, request: &SearchRequest) -> Result<SearchPage, PhotosError> {
        let url = self.url("mediaItems:search");
        tracing::debug!("POST {}", url);
        self.send(self.http.post(&url).json(request)).await
    }

    async fn batch_add_media_items(
        &self,
        album_id: &str,
        media_item_ids: &[String],
    ) -> Result<(), PhotosError> {
        let url = self.url(&format!("albums/{album_id}:batchAddMediaItems"));
        tracing::debug!("POST {} ({} ids)", url, media_item_ids.len());
        let _: serde_json::Value = self
            .send(
                self.http
                    .post(&url)
                    .json(&json!({"mediaItemIds": media_item_ids})),
            )
            .await?;
        Ok(())
    }
}
