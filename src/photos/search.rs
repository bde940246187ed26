//! Year-wide media search with cursor pagination.

use super::error::PhotosError;
use super::types::{continuation, MediaItem, RawMediaItem, SearchRequest};
use super::PhotosApi;
use crate::progress::Spinner;
use crate::types::DateRange;

/// Items per search request.
pub const SEARCH_PAGE_SIZE: u32 = 100;

/// Result of a year-wide search. `error` is set when pagination stopped
/// early; `items` then holds everything collected before the failure.
#[derive(Debug)]
pub struct MediaFetch {
    pub items: Vec<MediaItem>,
    pub pages: u32,
    pub error: Option<PhotosError>,
}

impl MediaFetch {
    pub fn is_partial(&self) -> bool {
        self.error.is_some()
    }
}

/// Collect every media item captured within `range`.
///
/// A failed page ends the search without retry; the error is logged and
/// returned alongside the items gathered so far.
pub async fn fetch_media_for_year(
    api: &dyn PhotosApi,
    range: &DateRange,
    include_archived: bool,
    show_progress: bool,
) -> MediaFetch {
    tracing::debug!(%range, include_archived, "Searching media items");
    let spinner = Spinner::start(show_progress, "Fetching media items...");
    let mut request = SearchRequest::for_date_range(range, include_archived, SEARCH_PAGE_SIZE);
    let mut items: Vec<MediaItem> = Vec::new();
    let mut pages = 0u32;
    let mut error = None;

    loop {
        let page = match api.search_media_items(&request).await {
            Ok(page) => page,
            Err(e) => {
                spinner.suspend(|| {
                    tracing::error!(
                        page = pages + 1,
                        "Media search failed, keeping {} items fetched so far: {}",
                        items.len(),
                        e
                    );
                    tracing::debug!("Media search error detail: {:?}", e);
                });
                error = Some(e);
                break;
            }
        };
        pages += 1;

        let received = page.media_items.len();
        let before = items.len();
        items.extend(page.media_items.into_iter().filter_map(RawMediaItem::into_valid));
        let dropped = received - (items.len() - before);
        if dropped > 0 {
            tracing::debug!(page = pages, "Dropped {} media items without an id", dropped);
        }

        spinner.set_message(format!("Fetching media items... Found {} items", items.len()));
        spinner.suspend(|| tracing::info!("Fetching media items... Found {} items", items.len()));

        match continuation(page.next_page_token) {
            Some(token) => request.page_token = Some(token),
            None => break,
        }
    }

    spinner.finish().await;
    tracing::info!("Media item fetching completed");

    MediaFetch {
        items,
        pages,
        error,
    }
}
