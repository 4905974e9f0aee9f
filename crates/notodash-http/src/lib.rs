//! HTTP access for the dashboard
//!
//! A small mockable client used to fetch the previously published state
//! snapshot. GET requests are retried with exponential backoff on transient
//! failures (timeouts, connection errors, 5xx, 429).

pub mod client;
pub mod config;
pub mod error;
pub mod middleware;

pub use client::{shared_client, HttpClient, HttpClientTrait};
pub use config::HttpConfig;
pub use error::{HttpError, Result};
pub use middleware::{RetryConfig, RetryMiddleware};
pub use reqwest::Response;
