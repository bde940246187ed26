use tokio_util::sync::CancellationToken;

use super::types::MediaItem;
use super::PhotosApi;

/// Maximum ids the provider accepts per `batchAddMediaItems` call.
pub const BATCH_LIMIT: usize = 50;

/// Outcome of [`add_media_items_to_album`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssignSummary {
    pub batches_sent: usize,
    pub items_added: usize,
    pub failed_batches: usize,
    pub interrupted: bool,
}

/// Attach `items` to `album_id` in consecutive chunks of [`BATCH_LIMIT`].
///
/// A failed chunk is logged and skipped. The shutdown token is checked
/// before each chunk; an in-flight request is never cancelled.
pub async fn add_media_items_to_album(
    api: &dyn PhotosApi,
    album_id: &str,
    items: &[MediaItem],
    dry_run: bool,
    shutdown: &CancellationToken,
) -> AssignSummary {
    let mut summary = AssignSummary::default();

    if dry_run {
        tracing::info!(
            "Dry run: Would add {} items to album {}",
            items.len(),
            album_id
        );
        return summary;
    }

    for (index, chunk) in items.chunks(BATCH_LIMIT).enumerate() {
        if shutdown.is_cancelled() {
            tracing::info!("Operation interrupted by user. Exiting...");
            summary.interrupted = true;
            break;
        }

        let ids: Vec<String> = chunk.iter().map(|item| item.id.clone()).collect();
        summary.batches_sent += 1;
        match api.batch_add_media_items(album_id, &ids).await {
            Ok(()) => {
                summary.items_added += ids.len();
                tracing::debug!(batch = index + 1, "Added {} items to album", ids.len());
            }
            Err(e) => {
                summary.failed_batches += 1;
                tracing::error!(batch = index + 1, "Error adding items to album: {}", e);
            }
        }
    }

    summary
}
