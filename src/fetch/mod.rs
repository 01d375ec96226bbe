//! Elering metering-data API client
//!
//! Authenticates with the OAuth client-credentials flow and requests the
//! daily consumption for the current month.

use crate::cache::{unix_secs, ApiCache, Cached};
use crate::core::{Config, Credentials, Error, Result};
use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::time::{Duration, Instant};

const TOKEN_TIMEOUT: Duration = Duration::from_secs(10);
const DATA_TIMEOUT: Duration = Duration::from_secs(30);
const API_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S.000Z";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Client for the metering-data API
pub struct EleringClient {
    http: reqwest::Client,
    token_url: String,
    api_url: String,
    credentials: Credentials,
}

impl EleringClient {
    pub fn new(config: &Config, credentials: Credentials) -> Self {
        Self {
            http: reqwest::Client::new(),
            token_url: config.data.token_url.clone(),
            api_url: config.data.api_url.clone(),
            credentials,
        }
    }

    async fn access_token(&self) -> Result<String> {
        let form = [
            ("client_id", self.credentials.client_id.as_str()),
            ("client_secret", self.credentials.client_secret.as_str()),
            ("grant_type", "client_credentials"),
        ];

        let token: TokenResponse = self
            .http
            .post(&self.token_url)
            .form(&form)
            .timeout(TOKEN_TIMEOUT)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(token.access_token)
    }

    /// Daily consumption from the first of the month (UTC) up to `now`
    pub async fn fetch_month_to_date(&self, now: DateTime<Utc>) -> Result<Value> {
        let started = Instant::now();
        let token = self.access_token().await?;
        let (start, end) = month_to_date_range(now)?;

        let data = self
            .http
            .get(&self.api_url)
            .bearer_auth(token)
            .query(&[
                ("startDateTime", start.as_str()),
                ("endDateTime", end.as_str()),
                ("resolution", "one_day"),
            ])
            .timeout(DATA_TIMEOUT)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;

        log::info!("API fetch took {:.2} seconds", started.elapsed().as_secs_f64());
        Ok(data)
    }
}

/// Query bounds for the current month, formatted for the API
pub fn month_to_date_range(now: DateTime<Utc>) -> Result<(String, String)> {
    let start = Utc
        .with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .ok_or_else(|| Error::Fetch(format!("Invalid month start for {}", now)))?;

    Ok((
        start.format(API_TIME_FORMAT).to_string(),
        now.format(API_TIME_FORMAT).to_string(),
    ))
}

/// Load metering data: a fresh cache entry, else a remote fetch (which
/// refreshes the cache), else whatever stale entry exists, else nothing.
pub async fn load_data(
    config: &Config,
    credentials: Option<Credentials>,
    now: DateTime<Utc>,
) -> Result<Cached> {
    let cache = ApiCache::new(config.cache_file()?, config.data.cache_ttl_secs);

    let loaded = match cache.load_fresh(now) {
        Some(cached) => Some(cached),
        None => match fetch_and_store(config, credentials, &cache, now).await {
            Ok(cached) => Some(cached),
            Err(e) => {
                log::error!("Error fetching remote data: {}", e);
                cache.load_stale()
            }
        },
    };

    Ok(loaded.filter(has_data).unwrap_or_else(|| Cached {
        data: Value::Array(Vec::new()),
        cached_at: unix_secs(now),
    }))
}

async fn fetch_and_store(
    config: &Config,
    credentials: Option<Credentials>,
    cache: &ApiCache,
    now: DateTime<Utc>,
) -> Result<Cached> {
    let credentials = credentials.ok_or_else(|| {
        Error::Fetch(
            "No Elering API credentials found in environment variables (AUTH_CLIENT_ID, AUTH_CLIENT_SECRET)"
                .to_string(),
        )
    })?;

    let client = EleringClient::new(config, credentials);
    let data = client.fetch_month_to_date(now).await?;

    if let Err(e) = cache.store(&data, now) {
        log::warn!("Failed to write cache: {}", e);
    }

    Ok(Cached {
        data,
        cached_at: unix_secs(now),
    })
}

fn has_data(cached: &Cached) -> bool {
    match &cached.data {
        Value::Null => false,
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        _ => true,
    }
}
