//! HTTP access to the testcase service

use reqwest::{Client, Response, StatusCode, Url};

use crate::config::RemoteConfig;
use crate::error::{AojError, AojResult};

/// Thin wrapper around a `reqwest::Client` bound to the service base URL
#[derive(Debug, Clone)]
pub struct Remote {
    client: Client,
    base_url: String,
}

impl Remote {
    pub fn new(config: &RemoteConfig) -> AojResult<Self> {
        let mut builder = Client::builder().timeout(config.http_timeout);
        if is_loopback(&config.base_url) {
            builder = builder.no_proxy();
        }
        let client = builder
            .build()
            .map_err(|e| AojError::transport(&config.base_url, e))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build the URL of `endpoint` with the given query parameters
    pub fn url(&self, endpoint: &str, query: &[(&str, &str)]) -> AojResult<Url> {
        let raw = format!("{}/{}", self.base_url, endpoint);
        Url::parse_with_params(&raw, query).map_err(|e| AojError::Transport {
            url: raw,
            status: None,
            message: e.to_string(),
        })
    }

    /// Issue a GET and fail on anything but 200 OK
    pub async fn get(&self, endpoint: &str, query: &[(&str, &str)]) -> AojResult<Response> {
        let url = self.url(endpoint, query)?;
        tracing::debug!(%url, "GET");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| AojError::transport(url.as_str(), e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(AojError::Transport {
                url: url.to_string(),
                status: Some(status.as_u16()),
                message: format!("http status code={}", status.as_u16()),
            });
        }

        Ok(response)
    }
}

/// Local services are reached directly even when a system proxy is set
fn is_loopback(base_url: &str) -> bool {
    Url::parse(base_url)
        .ok()
        .and_then(|url| url.host_str().map(|h| matches!(h, "localhost" | "127.0.0.1" | "[::1]")))
        .unwrap_or(false)
}
