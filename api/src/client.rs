use crate::espn::ScoreboardResponse;
use chrono::NaiveDate;
use log::{debug, warn};
use reqwest::{Client, Url};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub type ApiResult<T> = Result<T, ApiError>;

pub const ESPN_SPORTS_BASE: &str = "https://site.api.espn.com/apis/site/v2/sports";
const SCOREBOARD_PATH: &str = "golf/pga/scoreboard";

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Opt-in response caching for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachePolicy {
    pub key: String,
    pub ttl: Duration,
}

/// One scoreboard request: optional `dates=YYYYMMDD` filter and cache policy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreboardQuery {
    pub date: Option<NaiveDate>,
    pub cache: Option<CachePolicy>,
}

impl ScoreboardQuery {
    /// Uncached request for the live scoreboard.
    pub fn live() -> Self {
        Self::default()
    }

    pub fn on_date(date: NaiveDate) -> Self {
        Self { date: Some(date), cache: None }
    }

    pub fn cached(mut self, key: impl Into<String>, ttl: Duration) -> Self {
        self.cache = Some(CachePolicy { key: key.into(), ttl });
        self
    }

    pub fn params(&self) -> Vec<(&'static str, String)> {
        self.date
            .map(|d| vec![("dates", d.format("%Y%m%d").to_string())])
            .unwrap_or_default()
    }
}

/// Anything that can produce a golf scoreboard. The poll cycle only talks to
/// this, so tests can script responses without a server.
pub trait ScoreboardSource {
    fn fetch_scoreboard(
        &self,
        query: &ScoreboardQuery,
    ) -> impl Future<Output = ApiResult<ScoreboardResponse>> + Send;

    /// Forget any responses held between polls.
    fn clear_cache(&self) {}
}

#[derive(Debug, Clone)]
struct CachedResponse {
    stored_at: Instant,
    ttl: Duration,
    response: ScoreboardResponse,
}

impl CachedResponse {
    fn is_fresh(&self) -> bool {
        self.stored_at.elapsed() < self.ttl
    }
}

/// PGA scoreboard client backed by ESPN's public site API.
#[derive(Debug, Clone)]
pub struct PgaApi {
    client: Client,
    base_url: String,
    timeout: Duration,
    cache: Arc<Mutex<HashMap<String, CachedResponse>>>,
}

impl Default for PgaApi {
    fn default() -> Self {
        Self::with_base_url(ESPN_SPORTS_BASE)
    }
}

impl PgaApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the client at another host (mirrors, test servers).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .user_agent("pgatui/0.1 (leaderboard display)")
                .build()
                .unwrap_or_default(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            timeout: Duration::from_secs(10),
            cache: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn scoreboard_url(&self, query: &ScoreboardQuery) -> ApiResult<Url> {
        let raw = format!("{}/{SCOREBOARD_PATH}", self.base_url);
        let mut url = Url::parse(&raw)
            .map_err(|e| ApiError::Other(format!("invalid scoreboard url {raw}: {e}")))?;
        let params = query.params();
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        Ok(url)
    }

    /// Fetch the scoreboard, honouring the query's cache policy.
    pub async fn fetch(&self, query: &ScoreboardQuery) -> ApiResult<ScoreboardResponse> {
        if let Some(policy) = &query.cache
            && let Some(hit) = self.cached(&policy.key)
        {
            debug!("cache hit for {}", policy.key);
            return Ok(hit);
        }

        let url = self.scoreboard_url(query)?;
        let response: ScoreboardResponse = self.get(url).await?;

        if let Some(policy) = &query.cache {
            self.store(policy, &response);
        }
        Ok(response)
    }

    /// Drop every cached response.
    pub fn clear_cache(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.clear();
        }
    }

    fn cached(&self, key: &str) -> Option<ScoreboardResponse> {
        let mut cache = self.cache.lock().ok()?;
        match cache.get(key) {
            Some(entry) if entry.is_fresh() => Some(entry.response.clone()),
            Some(_) => {
                cache.remove(key);
                None
            }
            None => None,
        }
    }

    fn store(&self, policy: &CachePolicy, response: &ScoreboardResponse) {
        match self.cache.lock() {
            Ok(mut cache) => {
                cache.insert(
                    policy.key.clone(),
                    CachedResponse {
                        stored_at: Instant::now(),
                        ttl: policy.ttl,
                        response: response.clone(),
                    },
                );
            }
            Err(e) => warn!("scoreboard cache unavailable: {e}"),
        }
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, url: Url) -> ApiResult<T> {
        let url_text = url.to_string();
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url_text.clone()))?;

        let response = response
            .error_for_status()
            .map_err(|e| ApiError::Api(e, url_text.clone()))?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Parsing(e, url_text))
    }
}

impl ScoreboardSource for PgaApi {
    fn fetch_scoreboard(
        &self,
        query: &ScoreboardQuery,
    ) -> impl Future<Output = ApiResult<ScoreboardResponse>> + Send {
        self.fetch(query)
    }

    fn clear_cache(&self) {
        PgaApi::clear_cache(self);
    }
}
