//! Photos Library service: the provider seam plus the three steps built on
//! it (search aggregation, album reconciliation, batch assignment).

pub mod album;
pub mod assign;
pub mod client;
pub mod error;
pub mod search;
pub mod types;

#[cfg(test)]
pub(crate) mod fake;

pub use album::{reconcile_album, ResolvedAlbum};
pub use assign::{add_media_items_to_album, AssignSummary};
pub use client::PhotosClient;
pub use error::PhotosError;
pub use search::fetch_media_for_year;
pub use types::{Album, AlbumListPage, SearchPage, SearchRequest};

/// The provider operations this tool consumes.
///
/// Every step is written against this trait; [`PhotosClient`] is the HTTP
/// implementation.
#[async_trait::async_trait]
pub trait PhotosApi: Send + Sync {
    async fn list_albums(
        &self,
        page_size: u32,
        page_token: Option<&str>,
    ) -> Result<AlbumListPage, PhotosError>;

    async fn create_album(&self, title: &str) -> Result<Album, PhotosError>;

    async fn search_media_items(&self, request: &SearchRequest) -> Result<SearchPage, PhotosError>;

    async fn batch_add_media_items(
        &self,
        album_id: &str,
        media_item_ids: &[String],
    ) -> Result<(), PhotosError>;
}
