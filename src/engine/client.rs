//! Engine client setup and middleware configuration.
//!
//! Builds the reqwest client every transfer operation runs against:
//! tracing middleware for request/response logging, the configured connect
//! timeout, optional proxy and default headers. There is deliberately no
//! retry middleware — a failed transfer is terminal for its unit and the
//! caller decides what happens next.

use crate::error::{Error, Result};

use reqwest::{header::HeaderMap, Proxy};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;
use std::time::Duration;

/// Default connection timeout in seconds.
pub const DEFAULT_CONNECTION_TIMEOUT: u64 = 30;

/// Configuration for engine client setup.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Connection timeout in seconds, applied when the transfer starts.
    pub connection_timeout: u64,
    /// Optional proxy configuration.
    pub proxy: Option<Proxy>,
    /// Default headers to include with all requests.
    pub headers: Option<HeaderMap>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT,
            proxy: None,
            headers: None,
        }
    }
}

/// Creates the engine client with middleware configuration.
///
/// # Example
///
/// ```rust
/// use hauler::engine::{create_engine_client, EngineConfig};
///
/// let client = create_engine_client(EngineConfig::default()).unwrap();
/// ```
pub fn create_engine_client(config: EngineConfig) -> Result<ClientWithMiddleware> {
    let mut inner_builder =
        reqwest::Client::builder().connect_timeout(Duration::from_secs(config.connection_timeout));

    if let Some(proxy) = config.proxy {
        inner_builder = inner_builder.proxy(proxy);
    }

    if let Some(headers) = config.headers {
        inner_builder = inner_builder.default_headers(headers);
    }

    let inner = inner_builder.build().map_err(Error::from)?;

    // Trace HTTP requests. See the tracing crate to make use of these traces.
    let client = ClientBuilder::new(inner)
        .with(TracingMiddleware::default())
        .build();

    Ok(client)
}
