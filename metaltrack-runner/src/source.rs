//! Data file sources: a local path or an HTTP(S) URL.
//!
//! The whole document is fetched and parsed before anything is handed back,
//! so a failed load never yields a partial record list.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use metaltrack_core::DataFile;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("malformed data file {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Where a data file lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Url(String),
}

impl FromStr for DataSource {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Ok(Self::Url(s.trim().to_string()))
        } else {
            Ok(Self::File(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// Trait for anything that can produce a parsed data file.
///
/// The record store only sees this trait, so tests can hand it canned
/// documents without touching the filesystem or network.
pub trait DataFileProvider {
    fn fetch(&self, source: &DataSource) -> Result<DataFile, SourceError>;
}

/// Reads files from disk and URLs over blocking HTTP.
pub struct HttpFileProvider {
    timeout: Duration,
}

impl Default for HttpFileProvider {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

impl HttpFileProvider {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn fetch_url(&self, url: &str) -> Result<String, SourceError> {
        let http_err = |source| SourceError::Http {
            url: url.to_string(),
            source,
        };
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(http_err)?;
        let response = client.get(url).send().map_err(http_err)?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        response.text().map_err(http_err)
    }
}

impl DataFileProvider for HttpFileProvider {
    fn fetch(&self, source: &DataSource) -> Result<DataFile, SourceError> {
        debug!(%source, "fetching data file");
        let body = match source {
            DataSource::File(path) => {
                std::fs::read_to_string(path).map_err(|e| SourceError::Io {
                    path: path.clone(),
                    source: e,
                })?
            }
            DataSource::Url(url) => self.fetch_url(url)?,
        };
        parse_data_file(&body, &source.to_string())
    }
}

/// Parse a data file document. `origin` is only used in the error message.
pub fn parse_data_file(body: &str, origin: &str) -> Result<DataFile, SourceError> {
    serde_json::from_str(body).map_err(|source| SourceError::Parse {
        origin: origin.to_string(),
        source,
    })
}
