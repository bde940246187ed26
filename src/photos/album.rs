//! Decide which album the year's items go into: reuse, rename, or create.

use anyhow::Result;

use super::types::{Album, SearchRequest};
use super::PhotosApi;
use crate::prompt::Prompt;

/// Albums requested per listing page (the API maximum).
pub const ALBUM_PAGE_SIZE: u32 = 50;

/// Album id returned by a simulated creation.
pub const DRY_RUN_ALBUM_ID: &str = "dry_run_album_id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlbumOrigin {
    /// The default-titled album existed and was empty.
    ReusedEmpty,
    /// The default-titled album had items and the operator kept it.
    ReusedExisting,
    Created,
    /// Creation was simulated; the id is [`DRY_RUN_ALBUM_ID`].
    DryRunPlaceholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAlbum {
    pub id: String,
    pub title: String,
    pub origin: AlbumOrigin,
}

/// Find an album with exactly `title`, walking every listing page.
pub async fn find_album_by_title(api: &dyn PhotosApi, title: &str) -> Result<Option<Album>> {
    let mut page_token: Option<String> = None;
    loop {
        let page = api
            .list_albums(ALBUM_PAGE_SIZE, page_token.as_deref())
            .await?;
        if let Some(album) = page.albums.into_iter().find(|a| a.title == title) {
            return Ok(Some(album));
        }
        match super::types::continuation(page.next_page_token) {
            Some(token) => page_token = Some(token),
            None => return Ok(None),
        }
    }
}

/// Number of items in `album`. Uses the count from the listing when the
/// provider sent one, otherwise a one-item search scoped to the album.
/// A failed query counts as empty.
pub async fn album_item_count(api: &dyn PhotosApi, album: &Album) -> u64 {
    if let Some(count) = album.item_count() {
        return count;
    }
    match api
        .search_media_items(&SearchRequest::for_album(&album.id, 1))
        .await
    {
        Ok(page) => page
            .total_media_items
            .unwrap_or(page.media_items.len() as u64),
        Err(e) => {
            tracing::error!("An error occurred while getting album item count: {}", e);
            0
        }
    }
}

/// Create an album, or simulate it in dry-run mode. Failures are logged and
/// reported as `None`.
pub async fn create_album(api: &dyn PhotosApi, title: &str, dry_run: bool) -> Option<Album> {
    if dry_run {
        tracing::info!("Dry run: Would create album '{}'", title);
        return Some(Album {
            id: DRY_RUN_ALBUM_ID.to_string(),
            title: title.to_string(),
            ..Default::default()
        });
    }
    tracing::debug!("Creating album '{}'", title);
    match api.create_album(title).await {
        Ok(album) => {
            tracing::debug!("Album created with ID: {}", album.id);
            Some(album)
        }
        Err(e) => {
            tracing::error!("An error occurred while creating the album: {}", e);
            None
        }
    }
}

async fn create_resolved(api: &dyn PhotosApi, title: &str, dry_run: bool) -> Option<ResolvedAlbum> {
    let album = create_album(api, title, dry_run).await?;
    if !dry_run {
        tracing::info!("Created new album: {}", title);
    }
    Some(ResolvedAlbum {
        id: album.id,
        title: title.to_string(),
        origin: if dry_run {
            AlbumOrigin::DryRunPlaceholder
        } else {
            AlbumOrigin::Created
        },
    })
}

/// Resolve the album for `default_title`.
///
/// - no album with that title: create it
/// - exists and empty: reuse it
/// - exists with items: ask for another name; empty answer reuses it,
///   anything else creates a new album with that name
///
/// `Ok(None)` means album creation failed (already logged).
pub async fn reconcile_album(
    api: &dyn PhotosApi,
    default_title: &str,
    dry_run: bool,
    prompt: &dyn Prompt,
) -> Result<Option<ResolvedAlbum>> {
    tracing::debug!("Checking for existing albums...");
    let existing = match find_album_by_title(api, default_title).await? {
        Some(album) => album,
        None => return Ok(create_resolved(api, default_title, dry_run).await),
    };

    let item_count = album_item_count(api, &existing).await;
    if item_count == 0 {
        tracing::info!(
            "Empty album '{}' already exists. Using this album.",
            default_title
        );
        return Ok(Some(ResolvedAlbum {
            id: existing.id,
            title: default_title.to_string(),
            origin: AlbumOrigin::ReusedEmpty,
        }));
    }

    tracing::info!(
        "Album '{}' already exists and contains {} items.",
        default_title,
        item_count
    );
    let answer = prompt
        .ask("Enter a new album name (or press Enter to use the existing album): ")
        .await?;
    let answer = answer.trim();
    if answer.is_empty() {
        return Ok(Some(ResolvedAlbum {
            id: existing.id,
            title: default_title.to_string(),
            origin: AlbumOrigin::ReusedExisting,
        }));
    }

    Ok(create_resolved(api, answer, dry_run).await)
}
