//! Table list retrieval with all-tables → reserved-tables fallback.
//!
//! DESIGN
//! ======
//! With the reservation checkbox ticked only the reserved endpoint is asked.
//! Otherwise the all-tables endpoint is tried first and any transport failure
//! or non-2xx answer falls through to the reserved endpoint. Only the reserved
//! endpoint's failure reaches the caller. Bodies are parsed as JSON but row
//! shape is left to the renderer.

use serde_json::Value;

use crate::config::WidgetConfig;

/// Status and raw body of a completed request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    #[must_use]
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("{url} answered {status}")]
    Status { url: String, status: u16 },
    #[error("{url} returned invalid JSON: {message}")]
    Decode { url: String, message: String },
}

/// One async GET carrying same-origin credentials.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// # Errors
    ///
    /// Returns [`FetchError::Transport`] when no response was received.
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError>;
}

pub struct TableFetcher<T> {
    transport: T,
    reserved_url: String,
    all_url: Option<String>,
}

impl<T: Transport> TableFetcher<T> {
    pub fn new(transport: T, config: &WidgetConfig) -> Self {
        Self {
            transport,
            reserved_url: config.reserved_url.clone(),
            all_url: config.all_url.clone(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch candidate tables as raw JSON.
    ///
    /// # Errors
    ///
    /// Fails when the reserved endpoint cannot be reached, answers non-2xx, or
    /// when the body finally chosen is not JSON.
    pub async fn fetch(&self, use_reserved: bool) -> Result<Value, FetchError> {
        if !use_reserved && let Some(all_url) = &self.all_url {
            match self.transport.get(all_url).await {
                Ok(resp) if resp.ok() => return decode(all_url, &resp.body),
                Ok(resp) => log::warn!("{all_url} answered {}, falling back to reserved tables", resp.status),
                Err(err) => log::warn!("{err}, falling back to reserved tables"),
            }
        }
        let resp = self.transport.get(&self.reserved_url).await?;
        if !resp.ok() {
            return Err(FetchError::Status { url: self.reserved_url.clone(), status: resp.status });
        }
        decode(&self.reserved_url, &resp.body)
    }
}

fn decode(url: &str, body: &str) -> Result<Value, FetchError> {
    serde_json::from_str(body).map_err(|e| FetchError::Decode { url: url.to_owned(), message: e.to_string() })
}

#[cfg(test)]
#[path = "fetcher_test.rs"]
mod tests;
