//! Fetching bytes from a URL.
//!
//! The fetcher only depends on the [`Transport`] trait; [`CurlTransport`] is the
//! libcurl-backed implementation used by the CLI.

mod curl_transport;

pub use curl_transport::CurlTransport;

use std::io::{self, Write};
use thiserror::Error;

/// Streams the body of a URL into a writer, one chunk at a time.
pub trait Transport {
    /// Writes the response body of a GET for `url` into `sink` and returns the byte count.
    /// Non-2xx responses, connection failures and short bodies are errors.
    fn fetch(&self, url: &str, sink: &mut dyn Write) -> Result<u64, TransportError>;
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("GET {url} returned HTTP {status}")]
    Status { url: String, status: u32 },

    #[error("GET {url} failed ({}): {source}", failure_kind(.source))]
    Curl {
        url: String,
        #[source]
        source: curl::Error,
    },

    #[error("writing body of {url} failed: {source}")]
    Sink {
        url: String,
        #[source]
        source: io::Error,
    },
}

/// Short human label for a curl failure.
pub fn failure_kind(e: &curl::Error) -> &'static str {
    if e.is_operation_timedout() {
        return "timed out";
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_send_error()
        || e.is_ssl_connect_error()
    {
        return "connection failed";
    }
    if e.is_partial_file() || e.is_recv_error() || e.is_got_nothing() || e.is_read_error() {
        return "transfer interrupted";
    }
    "transfer failed"
}
