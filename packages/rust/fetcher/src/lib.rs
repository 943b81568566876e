//! Page fetching for the enrichment run.
//!
//! Each input record maps to one page at `<base_url>/<region_code>/<locality_name>`.
//! The [`Fetcher`] builds that URL and downloads the raw body. Fetches are
//! issued one at a time by the caller; this crate never spawns work.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, instrument, warn};
use url::Url;

use walkscore_shared::{FetchConfig, Result, WalkScoreError};

/// User-Agent string for page requests.
const USER_AGENT: &str = concat!("walkscore/", env!("CARGO_PKG_VERSION"));

/// Maximum number of redirects to follow per page.
const MAX_REDIRECTS: usize = 5;

// ---------------------------------------------------------------------------
// FetchedPage
// ---------------------------------------------------------------------------

/// A downloaded page body.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL that was requested.
    pub url: Url,
    /// HTTP status code of the response.
    pub status: u16,
    /// Raw body bytes. Never empty.
    pub body: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Fetcher
// ---------------------------------------------------------------------------

/// HTTP client bound to a single base URL.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    base_url: Url,
}

impl Fetcher {
    /// Create a fetcher from the `[fetch]` configuration.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let base_url = config.parsed_base_url()?;
        let user_agent = config.user_agent.as_deref().unwrap_or(USER_AGENT);

        let client = Client::builder()
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WalkScoreError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    /// Base URL every record path is appended to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build the page URL for one record.
    ///
    /// Names are split on `/` so each piece becomes its own path level, as in
    /// `TX,a/b` → `/TX/a/b`. Pieces are percent-encoded (`New York` →
    /// `New%20York`, `?` and `#` stay in the path). Empty names are kept, so
    /// an empty region yields `//Seattle`.
    pub fn record_url(&self, region_code: &str, locality_name: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                WalkScoreError::config(format!("{} cannot carry path segments", self.base_url))
            })?
            .pop_if_empty()
            .extend(region_code.split('/'))
            .extend(locality_name.split('/'));

        Ok(url)
    }

    /// GET `url` and read the full body.
    ///
    /// Transport and body-read failures map to [`WalkScoreError::Network`], a
    /// zero-length body to [`WalkScoreError::EmptyBody`]. A non-2xx status is
    /// logged but the body is still returned.
    #[instrument(skip_all, fields(url = %url))]
    pub async fn fetch(&self, url: &Url) -> Result<FetchedPage> {
        debug!("fetching page");

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| WalkScoreError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "non-success status, scanning body anyway");
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| WalkScoreError::Network(format!("{url}: body read failed: {e}")))?;

        if body.is_empty() {
            return Err(WalkScoreError::EmptyBody {
                url: url.to_string(),
            });
        }

        debug!(status = status.as_u16(), bytes = body.len(), "page fetched");

        Ok(FetchedPage {
            url: url.clone(),
            status: status.as_u16(),
            body: body.to_vec(),
        })
    }
}
