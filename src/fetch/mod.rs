//! HTTP retrieval of remote data sources.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::Result;
use tracing::debug;

use crate::error::TrafficError;

/// Issues a single GET for `url` and returns the body. No retries.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?;
    let status = resp.status();
    debug!(url, status = status.as_u16(), "Response received");
    if !status.is_success() {
        return Err(TrafficError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        }
        .into());
    }

    Ok(resp.bytes().await?.to_vec())
}
