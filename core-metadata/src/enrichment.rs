//! Song Information Client
//!
//! Fetches the details of a song from the external song information service.
//!
//! ## API Endpoint
//!
//! - **Info**: `GET {base_url}?group={artist}&song={title}`
//!
//! The response body is a JSON object:
//!
//! ```json
//! { "releaseDate": "16.07.2006", "text": "verse one\n\nverse two", "link": "https://..." }
//! ```
//!
//! A lookup is a single attempt. Any non-2xx status or transport failure is
//! reported as an error and the caller is expected to abort whatever it was
//! creating.
//!
//! ## Usage
//!
//! ```ignore
//! use core_metadata::{HttpSongMetadataProvider, SongMetadataProvider};
//! use std::sync::Arc;
//!
//! let provider = HttpSongMetadataProvider::new(http_client, "http://localhost:8081/info");
//! let details = provider.lookup("Muse", "Supermassive Black Hole").await?;
//! ```

use crate::error::{MetadataError, Result};
use async_trait::async_trait;
use bridge_traits::http::{HttpClient, HttpRequest, RetryPolicy};
use chrono::NaiveDate;
use core_library::models::SongDraft;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default timeout for a lookup request
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Release date layouts accepted from the service, tried in order
const RELEASE_DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d.%m.%Y"];

/// Attributes the service supplies for a song
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongDetails {
    pub release_date: Option<NaiveDate>,
    pub lyrics: String,
    pub link: String,
}

impl SongDetails {
    /// Combine with the requested artist and title into an insertable song.
    pub fn into_draft(self, artist: impl Into<String>, title: impl Into<String>) -> SongDraft {
        SongDraft {
            artist: artist.into(),
            title: title.into(),
            release_date: self.release_date,
            lyrics: self.lyrics,
            link: self.link,
        }
    }
}

/// Source of song details used when a song is added to the catalog
#[async_trait]
pub trait SongMetadataProvider: Send + Sync {
    /// Look up a song by artist and title
    ///
    /// # Errors
    /// Any failure to obtain a usable answer, including non-2xx statuses
    async fn lookup(&self, artist: &str, title: &str) -> Result<SongDetails>;
}

/// Wire format of the info endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SongInfoResponse {
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    text: String,
    #[serde(default)]
    link: String,
}

/// [`SongMetadataProvider`] backed by the HTTP info endpoint
pub struct HttpSongMetadataProvider {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout: Duration,
}

impl HttpSongMetadataProvider {
    /// Creates a provider for the given endpoint
    ///
    /// # Arguments
    ///
    /// * `http_client` - HTTP client for making requests
    /// * `base_url` - Full URL of the info endpoint, without query parameters
    pub fn new(http_client: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
            timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn lookup_url(&self, artist: &str, title: &str) -> String {
        let separator = if self.base_url.contains('?') { '&' } else { '?' };
        format!(
            "{}{}group={}&song={}",
            self.base_url,
            separator,
            urlencoding::encode(artist),
            urlencoding::encode(title)
        )
    }
}

#[async_trait]
impl SongMetadataProvider for HttpSongMetadataProvider {
    async fn lookup(&self, artist: &str, title: &str) -> Result<SongDetails> {
        if self.base_url.trim().is_empty() {
            return Err(MetadataError::NotConfigured(
                "song info endpoint URL is empty".to_string(),
            ));
        }

        let url = self.lookup_url(artist, title);
        debug!(url = %url, "Requesting song details");

        let request = HttpRequest::get(url)
            .header("Accept", "application/json")
            .timeout(self.timeout);

        let response = self
            .http_client
            .execute_with_retry(request, RetryPolicy::none())
            .await
            .map_err(|e| {
                warn!(error = %e, artist, title, "Song details request failed");
                MetadataError::Bridge(e)
            })?;

        if !response.is_success() {
            warn!(status = response.status, artist, title, "Song details lookup rejected");
            return Err(MetadataError::LookupFailed {
                status: response.status,
                body: String::from_utf8_lossy(&response.body).to_string(),
            });
        }

        let body: SongInfoResponse = serde_json::from_slice(&response.body).map_err(|e| {
            MetadataError::InvalidResponse(format!("Failed to parse song details: {}", e))
        })?;

        let release_date = body.release_date.as_deref().and_then(parse_release_date);
        info!(artist, title, has_release_date = release_date.is_some(), "Fetched song details");

        Ok(SongDetails {
            release_date,
            lyrics: body.text,
            link: body.link,
        })
    }
}

/// Parse a release date as sent by the service.
///
/// Accepts `YYYY-MM-DD` and `DD.MM.YYYY`. Anything else is logged and treated
/// as no date.
pub fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let parsed = RELEASE_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok());

    if parsed.is_none() {
        warn!(release_date = raw, "Unrecognised release date, storing none");
    }
    parsed
}
