//! Catalog API client.

use crate::error::{CatalogClientError, Result};
use crate::store::CatalogStore;
use crate::types::{CatalogConfig, CatalogSlice, RefreshSummary};
use ahoy_core::{Artist, Catalog, CatalogItem, PodcastShow};
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Client for the catalog endpoints.
///
/// Every slice is a plain GET returning a JSON object with one named array.
/// A failed slice never clears data: [`CatalogClient::refresh`] only replaces
/// the slices that were fetched and parsed successfully.
///
/// # Example
///
/// ```ignore
/// use ahoy_catalog::{CatalogClient, CatalogConfig, CatalogStore};
///
/// let client = CatalogClient::new(CatalogConfig::new("https://app.ahoy.ooo"))?;
/// let store = CatalogStore::new();
/// let summary = client.refresh(&store).await;
/// println!("{:?} tracks", summary.tracks);
/// ```
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: Client,
    base_url: String,
}

impl CatalogClient {
    /// Create a new client with the given configuration.
    pub fn new(config: CatalogConfig) -> Result<Self> {
        if config.base_url.is_empty() {
            return Err(CatalogClientError::InvalidUrl("URL cannot be empty".into()));
        }

        let base_url = config.base_url.trim_end_matches('/').to_string();
        let parsed = url::Url::parse(&base_url)
            .map_err(|e| CatalogClientError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(CatalogClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let http = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(format!("AhoyMediaService/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, base_url })
    }

    /// Normalized base URL (no trailing slash).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the raw records of one slice.
    pub async fn fetch_slice(&self, slice: CatalogSlice) -> Result<Vec<Value>> {
        let url = format!("{}{}", self.base_url, slice.path());
        debug!(url = %url, "Fetching catalog slice");

        let response = self
            .http
            .get(&url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await?;

        let status = response.status();

        if status.is_success() {
            let body: Value = response.json().await.map_err(|e| {
                CatalogClientError::ParseError(format!("Failed to parse {} response: {}", slice.field(), e))
            })?;

            match body.get(slice.field()) {
                Some(Value::Array(records)) => Ok(records.clone()),
                _ => Err(CatalogClientError::ParseError(format!(
                    "Response has no `{}` array",
                    slice.field()
                ))),
            }
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(CatalogClientError::ServerError {
                status: status.as_u16(),
                message: error_text,
            })
        }
    }

    /// Fetch and interpret all tracks.
    pub async fn fetch_tracks(&self) -> Result<Vec<CatalogItem>> {
        let records = self.fetch_slice(CatalogSlice::Tracks).await?;
        Ok(Catalog::tracks_from_values(&records, &self.base_url))
    }

    /// Fetch and interpret all artists.
    pub async fn fetch_artists(&self) -> Result<Vec<Artist>> {
        let records = self.fetch_slice(CatalogSlice::Artists).await?;
        Ok(Catalog::artists_from_values(&records, &self.base_url))
    }

    /// Fetch and interpret all podcast shows with their episodes.
    pub async fn fetch_shows(&self) -> Result<Vec<PodcastShow>> {
        let records = self.fetch_slice(CatalogSlice::Shows).await?;
        Ok(Catalog::shows_from_values(&records, &self.base_url))
    }

    /// Refresh every slice of `store`.
    ///
    /// Slices are fetched concurrently and replaced independently; a failed
    /// slice is logged and keeps its previous contents.
    pub async fn refresh(&self, store: &CatalogStore) -> RefreshSummary {
        let (tracks, artists, shows) =
            tokio::join!(self.fetch_tracks(), self.fetch_artists(), self.fetch_shows());

        let mut summary = RefreshSummary::default();

        match tracks {
            Ok(tracks) => {
                summary.tracks = Some(tracks.len());
                store.replace_tracks(tracks);
            }
            Err(e) => warn!(error = %e, "Keeping previous tracks"),
        }

        match artists {
            Ok(artists) => {
                summary.artists = Some(artists.len());
                store.replace_artists(artists);
            }
            Err(e) => warn!(error = %e, "Keeping previous artists"),
        }

        match shows {
            Ok(shows) => {
                summary.shows = Some(shows.len());
                store.replace_shows(shows);
            }
            Err(e) => warn!(error = %e, "Keeping previous podcast shows"),
        }

        let snapshot = store.snapshot();
        info!(
            tracks = snapshot.tracks.len(),
            artists = snapshot.artists.len(),
            shows = snapshot.shows.len(),
            "Catalog refreshed"
        );

        summary
    }
}
