//! Networking: the transport port and the table fetcher built on it.
//!
//! SYSTEM CONTEXT
//! ==============
//! `fetcher` owns endpoint selection and fallback; `http` is the `gloo-net`
//! transport used in the browser.

pub mod fetcher;
#[cfg(feature = "hydrate")]
pub mod http;

pub use fetcher::{FetchError, HttpResponse, TableFetcher, Transport};
