pub mod client;

pub use client::{RateLimitConfig, RetryConfig, RpcClient, RpcClientConfig, RpcError};
