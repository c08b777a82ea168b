//! Browser transport over `gloo-net`.

use gloo_net::http::Request;
use web_sys::RequestCredentials;

use super::fetcher::{FetchError, HttpResponse, Transport};

#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserTransport;

impl Transport for BrowserTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        let transport = |e: gloo_net::Error| FetchError::Transport { url: url.to_owned(), message: e.to_string() };
        let resp = Request::get(url)
            .credentials(RequestCredentials::SameOrigin)
            .send()
            .await
            .map_err(transport)?;
        let status = resp.status();
        let body = resp.text().await.map_err(transport)?;
        Ok(HttpResponse { status, body })
    }
}
