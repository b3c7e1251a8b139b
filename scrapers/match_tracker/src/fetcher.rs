use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use nonzero_ext::nonzero;
use std::{num::NonZeroU32, thread, time::Duration};
use tracing::{debug, info};

use crate::config::TrackerConfig;
use crate::error::FetchError;

const INITIAL_RETRY_DELAY: Duration = Duration::from_millis(500);
const RATE_LIMIT_POLL: Duration = Duration::from_millis(100);

/// Source of page bodies. Swapped for canned pages in tests.
pub trait HtmlFetcher {
    fn fetch_html(&self, url: &str) -> Result<String, FetchError>;
}

pub struct HttpFetcher {
    client: reqwest::blocking::Client,
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    max_retries: u32,
    retry_delay: Duration,
}

impl HttpFetcher {
    pub fn new(config: &TrackerConfig) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(&config.scraping.user_agent)
            .timeout(Duration::from_secs(config.scraping.request_timeout_secs))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        let rps = NonZeroU32::new(config.rate_limits.requests_per_second).unwrap_or(nonzero!(1u32));
        let rate_limiter = RateLimiter::direct(Quota::per_second(rps));

        Ok(Self {
            client,
            rate_limiter,
            max_retries: config.scraping.max_retries,
            retry_delay: INITIAL_RETRY_DELAY,
        })
    }

    /// Overrides the first backoff delay; later retries double it.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    fn wait_for_slot(&self) {
        while self.rate_limiter.check().is_err() {
            thread::sleep(RATE_LIMIT_POLL);
        }
    }

    fn fetch_once(&self, url: &str) -> Result<String, FetchError> {
        self.wait_for_slot();
        let response = self.client.get(url).send().map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })
    }
}

impl HtmlFetcher for HttpFetcher {
    fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        retry_with_backoff(self.max_retries, self.retry_delay, || {
            debug!("Fetching {}", url);
            let html = self.fetch_once(url)?;
            info!("Fetched {} ({} bytes)", url, html.len());
            Ok(html)
        })
    }
}

/// Runs `operation` up to `1 + max_retries` times, doubling the delay
/// between attempts. Client errors (4xx) are not retried.
pub fn retry_with_backoff<F, T>(max_retries: u32, initial_delay: Duration, mut operation: F) -> Result<T, FetchError>
where
    F: FnMut() -> Result<T, FetchError>,
{
    let mut delay = initial_delay;
    let mut attempt = 0;

    loop {
        match operation() {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= max_retries || !is_retryable(&e) => return Err(e),
            Err(e) => {
                attempt += 1;
                info!("Retry attempt {} after error: {}", attempt, e);
                thread::sleep(delay);
                delay *= 2;
            }
        }
    }
}

fn is_retryable(error: &FetchError) -> bool {
    match error {
        FetchError::Status { status, .. } => *status >= 500 || *status == 429,
        FetchError::Request { .. } => true,
        FetchError::Client(_) => false,
    }
}
