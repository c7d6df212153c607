use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::warn;

use crate::catalog::browser_headers;
use crate::error::ManifestError;

/// Waits applied between retries, keyed by the condition that triggered
/// them. Rate limiting and timeouts are retried indefinitely: giving up on
/// either would silently under-report catalog coverage, and the limiter
/// relents in practice.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub rate_limit_wait: Duration,
    pub timeout_wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            rate_limit_wait: Duration::from_secs(30),
            timeout_wait: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Zero-wait variant for tests.
    pub fn no_wait() -> Self {
        Self {
            rate_limit_wait: Duration::ZERO,
            timeout_wait: Duration::ZERO,
        }
    }
}

/// Outcome of a single download attempt, before retry classification.
pub struct AttemptResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Transport-level failure of a single attempt. Timeouts are retriable;
/// anything else definitively fails the asset.
pub enum AttemptError {
    Timeout(String),
    Transport(String),
}

/// Runs download attempts until one resolves definitively: a success body,
/// or a failure that is neither a rate limit nor a timeout. HTTP 429 sleeps
/// the rate-limit wait and retries; a timeout sleeps the timeout wait and
/// retries.
pub fn fetch_with_policy<F>(policy: &RetryPolicy, mut attempt: F) -> Result<Vec<u8>, ManifestError>
where
    F: FnMut() -> Result<AttemptResponse, AttemptError>,
{
    loop {
        match attempt() {
            Ok(response) if response.status == 429 => {
                warn!(
                    wait_secs = policy.rate_limit_wait.as_secs(),
                    "rate limited, waiting before retry"
                );
                thread::sleep(policy.rate_limit_wait);
            }
            Ok(response) if (200..300).contains(&response.status) => {
                return Ok(response.body);
            }
            Ok(response) => {
                return Err(ManifestError::AssetStatus {
                    status: response.status,
                    message: String::from_utf8_lossy(&response.body)
                        .chars()
                        .take(200)
                        .collect(),
                });
            }
            Err(AttemptError::Timeout(reason)) => {
                warn!(
                    wait_secs = policy.timeout_wait.as_secs(),
                    reason, "timeout, waiting before retry"
                );
                thread::sleep(policy.timeout_wait);
            }
            Err(AttemptError::Transport(message)) => {
                return Err(ManifestError::AssetHttp(message));
            }
        }
    }
}

pub trait AssetClient: Send + Sync {
    fn download(&self, url: &str) -> Result<Vec<u8>, ManifestError>;
}

#[derive(Clone)]
pub struct HttpAssetFetcher {
    client: Client,
    policy: RetryPolicy,
}

impl HttpAssetFetcher {
    pub fn new(policy: RetryPolicy) -> Result<Self, ManifestError> {
        let client = Client::builder()
            .default_headers(browser_headers())
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|err| ManifestError::AssetHttp(err.to_string()))?;
        Ok(Self { client, policy })
    }
}

impl AssetClient for HttpAssetFetcher {
    fn download(&self, url: &str) -> Result<Vec<u8>, ManifestError> {
        fetch_with_policy(&self.policy, || {
            let response = self.client.get(url).send().map_err(classify)?;
            let status = response.status().as_u16();
            let body = response.bytes().map_err(classify)?.to_vec();
            Ok(AttemptResponse { status, body })
        })
    }
}

fn classify(err: reqwest::Error) -> AttemptError {
    if err.is_timeout() {
        AttemptError::Timeout(err.to_string())
    } else {
        AttemptError::Transport(err.to_string())
    }
}
