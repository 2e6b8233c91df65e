//! Document retrieval
//!
//! The scanner only ever sees fully materialized text. This module turns a
//! command-line argument into that text: a literal, a file, or (with the
//! `fetch` feature) an HTTP(S) URL. Failures here are reported separately
//! from scan errors.

use std::path::PathBuf;

#[cfg(feature = "fetch")]
use std::time::Duration;

/// Timeout for fetching a document over HTTP
#[cfg(feature = "fetch")]
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Where a document comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    /// Text given directly on the command line
    Literal(String),
    /// Path to a local file
    File(PathBuf),
    /// `http://` or `https://` URL
    Url(String),
}

/// Failure to obtain the document text
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("Request to {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Cannot fetch {0}: built without the `fetch` feature")]
    FetchDisabled(String),
}

impl DocumentSource {
    /// Classify an argument: `!text` is a literal, an `http(s)://` prefix is
    /// a URL, anything else a file path.
    pub fn from_arg(arg: &str) -> Self {
        if let Some(literal) = arg.strip_prefix('!') {
            DocumentSource::Literal(literal.to_string())
        } else if arg.starts_with("http://") || arg.starts_with("https://") {
            DocumentSource::Url(arg.to_string())
        } else {
            DocumentSource::File(PathBuf::from(arg))
        }
    }

    /// Read the document text
    pub fn load(&self) -> Result<String, SourceError> {
        match self {
            DocumentSource::Literal(text) => Ok(text.clone()),
            DocumentSource::File(path) => {
                tracing::debug!(path = %path.display(), "reading document");
                std::fs::read_to_string(path).map_err(|source| SourceError::Io {
                    path: path.clone(),
                    source,
                })
            }
            DocumentSource::Url(url) => fetch(url),
        }
    }
}

#[cfg(feature = "fetch")]
fn fetch(url: &str) -> Result<String, SourceError> {
    tracing::debug!(url, "fetching document");

    let request_error = |e: reqwest::Error| SourceError::Request {
        url: url.to_string(),
        message: e.to_string(),
    };

    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("xmlstats/", env!("CARGO_PKG_VERSION")))
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(request_error)?;

    let response = client.get(url).send().map_err(request_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().map_err(request_error)
}

#[cfg(not(feature = "fetch"))]
fn fetch(url: &str) -> Result<String, SourceError> {
    Err(SourceError::FetchDisabled(url.to_string()))
}
