use std::path::PathBuf;
use std::time::Duration;

use reqwest::blocking::Client;

use super::ReferenceSource;
use crate::foundation::error::{DeckImageError, DeckImageResult};
use crate::model::master::{MasterData, ShipStats};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MASTER_DOCUMENT: &str = "START2.json";

/// Remote locations of the reference documents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferenceLocation {
    /// Full URL of the master document.
    pub master_url: String,
    /// Base URL of the per-ship detail resources (`<ship_url>/<id>.json`).
    pub ship_url: String,
}

impl ReferenceLocation {
    /// `<base>/START2.json` and `<base>/ship`.
    pub fn from_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            master_url: format!("{base}/{MASTER_DOCUMENT}"),
            ship_url: format!("{base}/ship"),
        }
    }

    fn ship(&self, ship_id: u32) -> String {
        format!("{}/{ship_id}.json", self.ship_url.trim_end_matches('/'))
    }
}

/// Fetches reference documents over HTTP, optionally keeping raw bodies in a cache directory.
#[derive(Debug)]
pub struct HttpSource {
    location: ReferenceLocation,
    cache_dir: Option<PathBuf>,
    client: Client,
}

impl HttpSource {
    pub fn new(location: ReferenceLocation) -> DeckImageResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("deckimage/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DeckImageError::reference(format!("build HTTP client: {e}")))?;
        Ok(Self {
            location,
            cache_dir: None,
            client,
        })
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    fn fetch(&self, url: &str, cache_name: &str) -> DeckImageResult<Vec<u8>> {
        let cached = self.cache_dir.as_ref().map(|dir| dir.join(cache_name));
        if let Some(path) = &cached
            && path.is_file()
        {
            tracing::debug!(path = %path.display(), "using cached reference document");
            return std::fs::read(path).map_err(|e| {
                DeckImageError::reference(format!("read cache '{}': {e}", path.display()))
            });
        }

        tracing::debug!(url, "fetching reference document");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| DeckImageError::reference(format!("GET {url}: {e}")))?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DeckImageError::validation(format!("no reference document at {url}")));
        }
        if !status.is_success() {
            return Err(DeckImageError::reference(format!("GET {url}: HTTP {status}")));
        }
        let body = response
            .bytes()
            .map_err(|e| DeckImageError::reference(format!("read body of {url}: {e}")))?
            .to_vec();

        if let Some(path) = &cached {
            let written = path
                .parent()
                .map_or(Ok(()), std::fs::create_dir_all)
                .and_then(|()| std::fs::write(path, &body));
            if let Err(e) = written {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "could not cache reference document"
                );
            }
        }
        Ok(body)
    }
}

impl ReferenceSource for HttpSource {
    fn master_data(&self) -> DeckImageResult<MasterData> {
        MasterData::from_slice(&self.fetch(&self.location.master_url, MASTER_DOCUMENT)?)
    }

    fn ship_stats(&self, ship_id: u32) -> DeckImageResult<ShipStats> {
        let url = self.location.ship(ship_id);
        ShipStats::from_slice(&self.fetch(&url, &format!("ship/{ship_id}.json"))?)
    }

    fn use_cache_dir(&mut self, dir: PathBuf) {
        self.cache_dir = Some(dir);
    }
}
