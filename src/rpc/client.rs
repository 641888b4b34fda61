//! JSON-RPC client used by the read-through accessor.
//!
//! Wraps an alloy HTTP provider with retry and optional rate limiting. The
//! pipeline only ever issues `eth_call`s against current state; everything
//! block-stream related belongs to the host.

use std::future::Future;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use alloy::network::Ethereum;
use alloy::primitives::{Address, Bytes, TxKind};
use alloy::providers::{Provider, RootProvider};
use alloy::rpc::types::{TransactionInput, TransactionRequest};
use governor::clock::{QuantaClock, QuantaInstant};
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Jitter, Quota, RateLimiter};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("RPC transport error: {0}")]
    Transport(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl RpcError {
    /// Check if this error is likely transient and worth retrying
    pub fn is_retryable(&self) -> bool {
        match self {
            RpcError::Transport(msg) => Self::is_retryable_message(msg),
            RpcError::InvalidUrl(_) => false,
        }
    }

    fn is_retryable_message(msg: &str) -> bool {
        let msg_lower = msg.to_lowercase();
        msg_lower.contains("connection")
            || msg_lower.contains("timeout")
            || msg_lower.contains("timed out")
            || msg_lower.contains("reset")
            || msg_lower.contains("broken pipe")
            || msg_lower.contains("network")
            || msg_lower.contains("rate limit")
            || msg_lower.contains("too many requests")
            || msg_lower.contains("429")
            || msg_lower.contains("502")
            || msg_lower.contains("503")
            || msg_lower.contains("504")
            || msg_lower.contains("service unavailable")
            || msg_lower.contains("bad gateway")
            || msg_lower.contains("try again")
    }
}

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (0 = no retries)
    pub max_retries: u32,
    /// Initial delay before first retry
    pub initial_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Calculate the delay for a given attempt number (0-indexed)
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let delay_ms = self.initial_delay.as_millis() as f64
            * self.backoff_multiplier.powi(attempt as i32 - 1);
        let delay = Duration::from_millis(delay_ms as u64);
        std::cmp::min(delay, self.max_delay)
    }
}

/// Execute an async operation with retry logic
pub async fn with_retry<F, Fut, T>(
    config: &RetryConfig,
    operation_name: &str,
    mut operation: F,
) -> Result<T, RpcError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RpcError>>,
{
    let mut last_error = None;

    for attempt in 0..=config.max_retries {
        if attempt > 0 {
            let delay = config.delay_for_attempt(attempt);
            tracing::warn!(
                "RPC retry {}/{} for '{}' in {:?}",
                attempt,
                config.max_retries,
                operation_name,
                delay
            );
            tokio::time::sleep(delay).await;
        }

        match operation().await {
            Ok(result) => {
                if attempt > 0 {
                    tracing::info!(
                        "RPC '{}' succeeded after {} retries",
                        operation_name,
                        attempt
                    );
                }
                return Ok(result);
            }
            Err(e) => {
                if e.is_retryable() && attempt < config.max_retries {
                    tracing::warn!(
                        "RPC '{}' failed (attempt {}/{}): {}",
                        operation_name,
                        attempt + 1,
                        config.max_retries + 1,
                        e
                    );
                    last_error = Some(e);
                } else {
                    return Err(e);
                }
            }
        }
    }

    Err(last_error.unwrap_or_else(|| RpcError::Transport("Unknown error".to_string())))
}

pub type StandardRateLimiter =
    RateLimiter<NotKeyed, InMemoryState, QuantaClock, NoOpMiddleware<QuantaInstant>>;

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub requests_per_second: NonZeroU32,
    pub jitter_min_ms: u64,
    pub jitter_max_ms: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: NonZeroU32::new(10).unwrap(),
            jitter_min_ms: 5,
            jitter_max_ms: 50,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RpcClientConfig {
    pub url: Url,
    pub rate_limit: Option<RateLimitConfig>,
    pub retry: RetryConfig,
}

impl RpcClientConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            rate_limit: None,
            retry: RetryConfig::default(),
        }
    }

    pub fn with_rate_limit(mut self, config: RateLimitConfig) -> Self {
        self.rate_limit = Some(config);
        self
    }

    pub fn with_retry(mut self, config: RetryConfig) -> Self {
        self.retry = config;
        self
    }
}

pub struct RpcClient {
    provider: RootProvider<Ethereum>,
    config: RpcClientConfig,
    rate_limiter: Option<Arc<StandardRateLimiter>>,
    jitter: Option<Jitter>,
}

impl RpcClient {
    pub fn new(config: RpcClientConfig) -> Result<Self, RpcError> {
        let provider = RootProvider::<Ethereum>::new_http(config.url.clone());

        let (rate_limiter, jitter) = if let Some(ref rate_config) = config.rate_limit {
            let quota = Quota::per_second(rate_config.requests_per_second);
            let limiter = RateLimiter::direct(quota);
            let jitter = Jitter::new(
                Duration::from_millis(rate_config.jitter_min_ms),
                Duration::from_millis(rate_config.jitter_max_ms),
            );
            (Some(Arc::new(limiter)), Some(jitter))
        } else {
            (None, None)
        };

        Ok(Self {
            provider,
            config,
            rate_limiter,
            jitter,
        })
    }

    pub fn from_url(url: &str) -> Result<Self, RpcError> {
        let url = url
            .parse::<Url>()
            .map_err(|e| RpcError::InvalidUrl(e.to_string()))?;
        Self::new(RpcClientConfig::new(url))
    }

    async fn throttle(&self) {
        if let Some(ref limiter) = self.rate_limiter {
            match self.jitter {
                Some(jitter) => limiter.until_ready_with_jitter(jitter).await,
                None => limiter.until_ready().await,
            }
        }
    }

    /// Issue an `eth_call` against current state.
    pub async fn call(&self, to: Address, calldata: Bytes) -> Result<Bytes, RpcError> {
        let request = TransactionRequest {
            to: Some(TxKind::Call(to)),
            input: TransactionInput::new(calldata),
            ..Default::default()
        };

        with_retry(&self.config.retry, "eth_call", || {
            let request = request.clone();
            async move {
                self.throttle().await;
                self.provider
                    .call(request)
                    .await
                    .map_err(|e| RpcError::Transport(e.to_string()))
            }
        })
        .await
    }
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("url", &self.config.url.as_str())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_for_attempt_backs_off() {
        let config = RetryConfig {
            max_retries: 5,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(1),
            backoff_multiplier: 2.0,
        };

        assert_eq!(config.delay_for_attempt(0), Duration::ZERO);
        assert_eq!(config.delay_for_attempt(1), Duration::from_millis(100));
        assert_eq!(config.delay_for_attempt(2), Duration::from_millis(200));
        assert_eq!(config.delay_for_attempt(3), Duration::from_millis(400));
        // clamped to max_delay
        assert_eq!(config.delay_for_attempt(10), Duration::from_secs(1));
    }

    #[test]
    fn test_retryable_errors() {
        assert!(RpcError::Transport("connection reset by peer".to_string()).is_retryable());
        assert!(RpcError::Transport("429 Too Many Requests".to_string()).is_retryable());
        assert!(!RpcError::Transport("execution reverted".to_string()).is_retryable());
        assert!(!RpcError::InvalidUrl("not a url".to_string()).is_retryable());
    }
}
