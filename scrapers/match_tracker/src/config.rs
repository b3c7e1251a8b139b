use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::env;
use tracing::warn;

use crate::error::ConfigError;

/// One competition fixtures page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Source {
    pub competition: String,
    pub url: String,
}

impl Source {
    pub fn new(competition: &str, url: &str) -> Self {
        Self {
            competition: competition.to_string(),
            url: url.to_string(),
        }
    }
}

fn default_sources() -> Vec<Source> {
    vec![
        Source::new("Premier League", "https://onefootball.com/en/competition/premier-league-9/fixtures"),
        Source::new("Championship", "https://onefootball.com/en/competition/efl-championship-27/fixtures"),
        Source::new("League 1", "https://onefootball.com/en/competition/efl-league-one-42/fixtures"),
        Source::new("League 2", "https://onefootball.com/en/competition/efl-league-two-43/fixtures"),
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RateLimits {
    pub requests_per_second: u32,
}

impl Default for RateLimits {
    fn default() -> Self {
        Self {
            requests_per_second: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScrapingConfig {
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
}

impl Default for ScrapingConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (compatible; MatchTracker/0.1)".to_string(),
            request_timeout_secs: 10,
            max_retries: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrackerConfig {
    pub sources: Vec<Source>,
    pub rate_limits: RateLimits,
    pub scraping: ScrapingConfig,
    /// IANA zone the fixtures site renders plain-text times in.
    pub source_timezone: String,
    pub share_base_url: String,
}

impl TrackerConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(raw) = env::var("TRACKER_SOURCES") {
            match parse_sources(&raw) {
                Ok(sources) if !sources.is_empty() => config.sources = sources,
                Ok(_) => warn!("TRACKER_SOURCES is empty, using default sources"),
                Err(e) => warn!("Ignoring TRACKER_SOURCES: {}", e),
            }
        }
        if let Ok(tz) = env::var("SOURCE_TIMEZONE") {
            config.source_timezone = tz;
        }
        if let Ok(Some(rps)) = env::var("RATE_LIMIT_RPS").map_or(Ok(None), |r| r.parse::<u32>().map(Some)) {
            config.rate_limits.requests_per_second = rps;
        }
        if let Ok(user_agent) = env::var("SCRAPER_USER_AGENT") {
            config.scraping.user_agent = user_agent;
        }
        if let Ok(Some(timeout)) = env::var("SCRAPER_TIMEOUT_SECS").map_or(Ok(None), |t| t.parse::<u64>().map(Some)) {
            config.scraping.request_timeout_secs = timeout;
        }
        if let Ok(Some(retries)) = env::var("SCRAPER_MAX_RETRIES").map_or(Ok(None), |t| t.parse::<u32>().map(Some)) {
            config.scraping.max_retries = retries;
        }
        if let Ok(url) = env::var("SHARE_BASE_URL") {
            config.share_base_url = url;
        }

        config
    }

    pub fn source_tz(&self) -> Result<Tz, ConfigError> {
        self.source_timezone
            .parse::<Tz>()
            .map_err(|_| ConfigError::Timezone(self.source_timezone.clone()))
    }

    pub fn competitions(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.competition.as_str()).collect()
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            rate_limits: RateLimits::default(),
            scraping: ScrapingConfig::default(),
            source_timezone: "UTC".to_string(),
            share_base_url: "https://score-tracker.streamlit.app/".to_string(),
        }
    }
}

/// Parses `Name=url;Name=url`.
pub fn parse_sources(raw: &str) -> Result<Vec<Source>, ConfigError> {
    raw.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (name, url) = entry
                .split_once('=')
                .ok_or_else(|| ConfigError::Source(entry.to_string()))?;
            let (name, url) = (name.trim(), url.trim());
            if name.is_empty() || url.is_empty() {
                return Err(ConfigError::Source(entry.to_string()));
            }
            Ok(Source::new(name, url))
        })
        .collect()
}
