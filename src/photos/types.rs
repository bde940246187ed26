//! Wire types for the Photos Library API v1.

use serde::{Deserialize, Serialize};

use crate::types::DateRange;

/// A media item as returned by the provider. The id is optional here because
/// malformed responses do occur; see [`RawMediaItem::into_valid`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMediaItem {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub product_url: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub media_metadata: Option<MediaMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaMetadata {
    #[serde(default)]
    pub creation_time: Option<String>,
    #[serde(default)]
    pub width: Option<String>,
    #[serde(default)]
    pub height: Option<String>,
}

/// A media item with a guaranteed non-empty id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    pub id: String,
    pub filename: Option<String>,
    pub mime_type: Option<String>,
    pub product_url: Option<String>,
    pub base_url: Option<String>,
    pub media_metadata: Option<MediaMetadata>,
}

impl RawMediaItem {
    /// Drop items without an identifier.
    pub fn into_valid(self) -> Option<MediaItem> {
        let id = self.id.filter(|id| !id.is_empty())?;
        Some(MediaItem {
            id,
            filename: self.filename,
            mime_type: self.mime_type,
            product_url: self.product_url,
            base_url: self.base_url,
            media_metadata: self.media_metadata,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_url: Option<String>,
    /// int64 sent as a decimal string; absent for some albums.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_items_count: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_writeable: Option<bool>,
}

impl Album {
    pub fn item_count(&self) -> Option<u64> {
        self.media_items_count.as_deref()?.trim().parse().ok()
    }
}

/// `GET /v1/albums` response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumListPage {
    #[serde(default)]
    pub albums: Vec<Album>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// `POST /v1/mediaItems:search` response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    #[serde(default)]
    pub media_items: Vec<RawMediaItem>,
    #[serde(default)]
    pub next_page_token: Option<String>,
    /// Not part of the documented response, but honored when a backend sends it.
    #[serde(default, deserialize_with = "deserialize_count")]
    pub total_media_items: Option<u64>,
}

/// Returns the continuation cursor, treating an empty token as absent.
pub fn continuation(token: Option<String>) -> Option<String> {
    token.filter(|t| !t.is_empty())
}

fn deserialize_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Num(u64),
        Str(String),
    }
    Ok(match Option::<Count>::deserialize(deserializer)? {
        Some(Count::Num(n)) => Some(n),
        Some(Count::Str(s)) => s.trim().parse().ok(),
        None => None,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ApiDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl From<chrono::NaiveDate> for ApiDate {
    fn from(d: chrono::NaiveDate) -> Self {
        use chrono::Datelike;
        Self {
            year: d.year(),
            month: d.month(),
            day: d.day(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDateRange {
    pub start_date: ApiDate,
    pub end_date: ApiDate,
}

impl From<&DateRange> for ApiDateRange {
    fn from(range: &DateRange) -> Self {
        Self {
            start_date: range.start().into(),
            end_date: range.last_day().into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateFilter {
    pub ranges: Vec<ApiDateRange>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaTypeFilter {
    pub media_types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    pub date_filter: DateFilter,
    pub include_archived_media: bool,
    pub media_type_filter: MediaTypeFilter,
}

/// `POST /v1/mediaItems:search` body. Either `album_id` or `filters` is set;
/// the API rejects requests carrying both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album_id: Option<String>,
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<SearchFilters>,
}

impl SearchRequest {
    /// Every media type captured inside `range`.
    pub fn for_date_range(range: &DateRange, include_archived: bool, page_size: u32) -> Self {
        Self {
            album_id: None,
            page_size,
            page_token: None,
            filters: Some(SearchFilters {
                date_filter: DateFilter {
                    ranges: vec![range.into()],
                },
                include_archived_media: include_archived,
                media_type_filter: MediaTypeFilter {
                    media_types: vec!["ALL_MEDIA".to_string()],
                },
            }),
        }
    }

    /// The contents of one album.
    pub fn for_album(album_id: &str, page_size: u32) -> Self {
        Self {
            album_id: Some(album_id.to_string()),
            page_size,
            page_token: None,
            filters: None,
        }
    }
}
