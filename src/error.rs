// Catalog fetch errors
//
// Every variant is fatal to a fetch: the caller gets no partial catalog.

use thiserror::Error;

/// Errors raised while fetching the remote catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Transport or body decoding failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("API error ({status}) for {url}: {message}")]
    Api {
        status: u16,
        url: String,
        message: String,
    },

    /// A response body did not have the expected shape
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
