//! In-memory [`PhotosApi`] used by the component tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

use tokio_util::sync::CancellationToken;

use super::error::PhotosError;
use super::types::{Album, AlbumListPage, RawMediaItem, SearchPage, SearchRequest};
use super::PhotosApi;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListAlbums { page_token: Option<String> },
    CreateAlbum { title: String },
    Search(SearchRequest),
    BatchAdd { album_id: String, ids: Vec<String> },
}

#[derive(Default)]
pub struct FakePhotosApi {
    pub calls: Mutex<Vec<Call>>,
    /// Album listing pages, served in order by cursor "0", "1", ...
    album_pages: Vec<Vec<Album>>,
    /// Search pages for date-range queries, served in order.
    search_pages: Mutex<VecDeque<Result<SearchPage, PhotosError>>>,
    /// Album id -> count query response.
    album_counts: HashMap<String, Result<SearchPage, String>>,
    fail_create: bool,
    fail_list: bool,
    /// Zero-based batch indexes that fail.
    failing_batches: HashSet<usize>,
    batches_seen: Mutex<usize>,
    /// Cancel this token once the batch at the given index has been served.
    cancel_on_batch: Option<(usize, CancellationToken)>,
}

pub fn album(id: &str, title: &str, count: Option<u64>) -> Album {
    Album {
        id: id.to_string(),
        title: title.to_string(),
        media_items_count: count.map(|c| c.to_string()),
        ..Default::default()
    }
}

pub fn raw_item(id: Option<&str>) -> RawMediaItem {
    RawMediaItem {
        id: id.map(str::to_string),
        ..Default::default()
    }
}

pub fn page(ids: &[Option<&str>], next: Option<&str>) -> SearchPage {
    SearchPage {
        media_items: ids.iter().map(|id| raw_item(*id)).collect(),
        next_page_token: next.map(str::to_string),
        total_media_items: None,
    }
}

impl FakePhotosApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_albums(mut self, albums: Vec<Album>) -> Self {
        self.album_pages = vec![albums];
        self
    }

    pub fn with_album_pages(mut self, pages: Vec<Vec<Album>>) -> Self {
        self.album_pages = pages;
        self
    }

    pub fn with_search_pages(self, pages: Vec<Result<SearchPage, PhotosError>>) -> Self {
        *self.search_pages.lock().unwrap() = pages.into();
        self
    }

    pub fn with_album_count_page(mut self, album_id: &str, page: SearchPage) -> Self {
        self.album_counts.insert(album_id.to_string(), Ok(page));
        self
    }

    pub fn with_album_count_error(mut self, album_id: &str) -> Self {
        self.album_counts
            .insert(album_id.to_string(), Err("count unavailable".to_string()));
        self
    }

    pub fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    pub fn failing_list(mut self) -> Self {
        self.fail_list = true;
        self
    }

    pub fn failing_batches(mut self, indexes: &[usize]) -> Self {
        self.failing_batches = indexes.iter().copied().collect();
        self
    }

    pub fn cancelling_on_batch(mut self, index: usize, token: CancellationToken) -> Self {
        self.cancel_on_batch = Some((index, token));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn create_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::CreateAlbum { title } => Some(title),
                _ => None,
            })
            .collect()
    }

    pub fn batch_calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::BatchAdd { album_id, ids } => Some((album_id, ids)),
                _ => None,
            })
            .collect()
    }

    pub fn search_calls(&self) -> Vec<SearchRequest> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Search(req) => Some(req),
                _ => None,
            })
            .collect()
    }
}

pub fn api_error(status: u16, message: &str) -> PhotosError {
    PhotosError::Api {
        status,
        message: message.to_string(),
    }
}

#[async_trait::async_trait]
impl PhotosApi for FakePhotosApi {
    async fn list_albums(
        &self,
        _page_size: u32,
        page_token: Option<&str>,
    ) -> Result<AlbumListPage, PhotosError> {
        self.calls.lock().unwrap().push(Call::ListAlbums {
            page_token: page_token.map(str::to_string),
        });
        if self.fail_list {
            return Err(api_error(500, "listing failed"));
        }
        let index: usize = page_token.map(|t| t.parse().unwrap()).unwrap_or(0);
        let albums = self.album_pages.get(index).cloned().unwrap_or_default();
        let next_page_token = (index + 1 < self.album_pages.len()).then(|| (index + 1).to_string());
        Ok(AlbumListPage {
            albums,
            next_page_token,
        })
    }

    async fn create_album(&self, title: &str) -> Result<Album, PhotosError> {
        self.calls.lock().unwrap().push(Call::CreateAlbum {
            title: title.to_string(),
        });
        if self.fail_create {
            return Err(api_error(403, "create failed"));
        }
        Ok(album(&format!("created:{title}"), title, None))
    }

    async fn search_media_items(&self, request: &SearchRequest) -> Result<SearchPage, PhotosError> {
        self.calls.lock().unwrap().push(Call::Search(request.clone()));
        if let Some(album_id) = &request.album_id {
            return match self.album_counts.get(album_id) {
                Some(Ok(page)) => Ok(page.clone()),
                Some(Err(msg)) => Err(api_error(500, msg)),
                None => Ok(SearchPage::default()),
            };
        }
        self.search_pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(SearchPage::default()))
    }

    async fn batch_add_media_items(
        &self,
        album_id: &str,
        media_item_ids: &[String],
    ) -> Result<(), PhotosError> {
        self.calls.lock().unwrap().push(Call::BatchAdd {
            album_id: album_id.to_string(),
            ids: media_item_ids.to_vec(),
        });
        let mut seen = self.batches_seen.lock().unwrap();
        let index = *seen;
        *seen += 1;
        if let Some((at, token)) = &self.cancel_on_batch {
            if *at == index {
                token.cancel();
            }
        }
        if self.failing_batches.contains(&index) {
            return Err(api_error(400, "invalid media item id"));
        }
        Ok(())
    }
}
