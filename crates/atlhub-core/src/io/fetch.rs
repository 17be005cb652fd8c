//! Remote asset retrieval.
//!
//! Every body is buffered in memory: APKs and icons are small enough that
//! streaming to disk buys nothing, and the icon has to be decoded whole anyway.

use bytes::Bytes;
use reqwest::{Client, StatusCode};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP error fetching {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned {status}")]
    Status { url: String, status: StatusCode },
}

/// Build the HTTP client shared by every entry of a run.
pub fn build_client() -> reqwest::Result<Client> {
    Client::builder().user_agent(crate::USER_AGENT).build()
}

/// GET `url` and return the full response body.
///
/// Non-success statuses are errors. Nothing is retried.
pub async fn fetch_bytes(client: &Client, url: &str) -> Result<Bytes, FetchError> {
    let http = |source| FetchError::Http {
        url: url.to_string(),
        source,
    };

    let response = client
        .get(url)
        .header(reqwest::header::USER_AGENT, crate::USER_AGENT)
        .send()
        .await
        .map_err(http)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status,
        });
    }

    let body = response.bytes().await.map_err(http)?;
    tracing::debug!("fetched {} bytes from {url}", body.len());
    Ok(body)
}
