//! YAML configuration and the engine settings resolved from it.
//!
//! The file is read once at startup. Numeric options are parsed leniently:
//! missing keys, `null` and non-numeric values all fall back to the
//! documented defaults, so a sloppy config never aborts a run. Source
//! definitions are validated strictly because a bad URL is never useful.
//!
//! ```yaml
//! consolidation:
//!   maxItems: 3
//!   similarityThreshold: 0.5
//!   scoring:
//!     sourceCountWeight: 2.0
//!     recencyWeight: 1.0
//!     engagementWeight: 0.5
//! sources:
//!   - name: Bloomberg
//!     kind: rss
//!     url: https://feeds.bloomberg.com/markets/news.rss
//! ```

use serde::Deserialize;
use serde_yaml::Value;
use std::path::Path;
use thiserror::Error;
use tracing::{info, instrument, warn};
use url::Url;

pub const DEFAULT_MAX_ITEMS: usize = 3;
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.5;
pub const DEFAULT_SOURCE_COUNT_WEIGHT: f64 = 2.0;
pub const DEFAULT_RECENCY_WEIGHT: f64 = 1.0;
pub const DEFAULT_ENGAGEMENT_WEIGHT: f64 = 0.5;
pub const DEFAULT_MAX_AGE_HOURS: f64 = 24.0;
pub const DEFAULT_MAX_ENGAGEMENT: f64 = 500.0;

pub const DEFAULT_DELAY_MS: u64 = 2000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_RETRIES: usize = 2;
pub const DEFAULT_MIN_LENGTH: usize = 15;
pub const DEFAULT_MAX_LENGTH: usize = 250;
pub const DEFAULT_MAX_PER_SOURCE: usize = 20;

/// Placeholder in a search source URL replaced by the encoded query.
const QUERY_PLACEHOLDER: &str = "{query}";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("source '{name}' is invalid: {reason}")]
    InvalidSource { name: String, reason: String },
}

/// Weights and bounds used by the scorer.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    pub source_count_weight: f64,
    pub recency_weight: f64,
    pub engagement_weight: f64,
    /// Age at which recency reaches zero.
    pub max_age_hours: f64,
    /// Engagement at which the engagement score saturates.
    pub max_engagement: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            source_count_weight: DEFAULT_SOURCE_COUNT_WEIGHT,
            recency_weight: DEFAULT_RECENCY_WEIGHT,
            engagement_weight: DEFAULT_ENGAGEMENT_WEIGHT,
            max_age_hours: DEFAULT_MAX_AGE_HOURS,
            max_engagement: DEFAULT_MAX_ENGAGEMENT,
        }
    }
}

/// Everything the consolidation engine needs, already defaulted.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Digest length; 0 when the file asked for zero or a negative count.
    pub max_items: usize,
    pub similarity_threshold: f64,
    pub scoring: ScoringConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_items: DEFAULT_MAX_ITEMS,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            scoring: ScoringConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// RSS 2.0 feed; headlines are `<item><title>`.
    Rss,
    /// HTML page; headlines are the text of elements matching `selector`.
    Html,
    /// JSON search API returning `articles` or `hits`.
    Search,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceConfig {
    pub name: String,
    pub kind: SourceKind,
    pub url: String,
    /// CSS selector for [`SourceKind::Html`] sources.
    #[serde(default)]
    pub selector: Option<String>,
    /// Search terms for [`SourceKind::Search`] sources.
    #[serde(default)]
    pub query: Option<String>,
}

impl SourceConfig {
    /// The URL to request, with `{query}` replaced by the encoded search terms.
    pub fn request_url(&self) -> Result<Url, ConfigError> {
        let raw = match (&self.query, self.url.contains(QUERY_PLACEHOLDER)) {
            (Some(query), true) => self
                .url
                .replace(QUERY_PLACEHOLDER, &urlencoding::encode(query)),
            (None, true) => {
                return Err(ConfigError::InvalidSource {
                    name: self.name.clone(),
                    reason: format!("url contains {QUERY_PLACEHOLDER} but no query is set"),
                });
            }
            _ => self.url.clone(),
        };

        Url::parse(&raw).map_err(|e| ConfigError::InvalidSource {
            name: self.name.clone(),
            reason: format!("bad url '{raw}': {e}"),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchConfig {
    /// Pause between two sources.
    pub delay_ms: u64,
    pub timeout_secs: u64,
    /// Extra attempts after the first failed request.
    pub retries: usize,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_DELAY_MS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            retries: DEFAULT_RETRIES,
            user_agent: concat!("headline_digest/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Upstream headline filter applied per source before consolidation.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterConfig {
    pub min_length: usize,
    pub max_length: usize,
    /// Case-insensitive substrings that disqualify a headline.
    pub exclude: Vec<String>,
    /// When non-empty, a headline must contain at least one of these.
    pub require_keywords: Vec<String>,
    pub max_per_source: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_LENGTH,
            max_length: DEFAULT_MAX_LENGTH,
            exclude: Vec::new(),
            require_keywords: Vec::new(),
            max_per_source: DEFAULT_MAX_PER_SOURCE,
        }
    }
}

/// The `consolidation` section as written, before defaulting.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawConsolidation {
    max_items: Option<Value>,
    similarity_threshold: Option<Value>,
    scoring: RawScoring,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawScoring {
    source_count_weight: Option<Value>,
    recency_weight: Option<Value>,
    engagement_weight: Option<Value>,
    max_age_hours: Option<Value>,
    max_engagement: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawFetch {
    delay_ms: Option<Value>,
    timeout_secs: Option<Value>,
    retries: Option<Value>,
    user_agent: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawFilter {
    min_length: Option<Value>,
    max_length: Option<Value>,
    exclude: Vec<String>,
    require_keywords: Vec<String>,
    max_per_source: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    consolidation: RawConsolidation,
    fetch: RawFetch,
    filter: RawFilter,
    sources: Vec<SourceConfig>,
}

/// Fully resolved application configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub engine: EngineConfig,
    pub fetch: FetchConfig,
    pub filter: FilterConfig,
    pub sources: Vec<SourceConfig>,
}

impl Config {
    /// Load and resolve a YAML config file.
    ///
    /// # Arguments
    ///
    /// * `path` - Location of the YAML file
    ///
    /// # Returns
    ///
    /// The resolved [`Config`], with every numeric option defaulted.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The text is not valid YAML or a section has the wrong shape
    /// - A source has an unparseable URL
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.display().to_string(),
                source,
            })?;
        let config = Self::from_yaml_str(&text)?;
        info!(
            sources = config.sources.len(),
            max_items = config.engine.max_items,
            threshold = config.engine.similarity_threshold,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Parse and resolve YAML text. An empty document yields all defaults.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = if text.trim().is_empty() {
            RawConfig::default()
        } else {
            serde_yaml::from_str(text)?
        };

        for source in &raw.sources {
            source.request_url()?;
            if source.kind == SourceKind::Search && source.query.is_none() {
                warn!(source = %source.name, "Search source has no query; requesting url as-is");
            }
        }

        Ok(Self {
            engine: resolve_engine(&raw.consolidation),
            fetch: resolve_fetch(raw.fetch),
            filter: resolve_filter(raw.filter),
            sources: raw.sources,
        })
    }
}

fn resolve_engine(raw: &RawConsolidation) -> EngineConfig {
    let max_items = lenient_i64(raw.max_items.as_ref(), "maxItems", DEFAULT_MAX_ITEMS as i64);
    let scoring = &raw.scoring;

    EngineConfig {
        max_items: usize::try_from(max_items).unwrap_or(0),
        similarity_threshold: lenient_f64(
            raw.similarity_threshold.as_ref(),
            "similarityThreshold",
            DEFAULT_SIMILARITY_THRESHOLD,
        ),
        scoring: ScoringConfig {
            source_count_weight: lenient_f64(
                scoring.source_count_weight.as_ref(),
                "scoring.sourceCountWeight",
                DEFAULT_SOURCE_COUNT_WEIGHT,
            ),
            recency_weight: lenient_f64(
                scoring.recency_weight.as_ref(),
                "scoring.recencyWeight",
                DEFAULT_RECENCY_WEIGHT,
            ),
            engagement_weight: lenient_f64(
                scoring.engagement_weight.as_ref(),
                "scoring.engagementWeight",
                DEFAULT_ENGAGEMENT_WEIGHT,
            ),
            max_age_hours: positive(
                lenient_f64(scoring.max_age_hours.as_ref(), "scoring.maxAgeHours", DEFAULT_MAX_AGE_HOURS),
                "scoring.maxAgeHours",
                DEFAULT_MAX_AGE_HOURS,
            ),
            max_engagement: positive(
                lenient_f64(
                    scoring.max_engagement.as_ref(),
                    "scoring.maxEngagement",
                    DEFAULT_MAX_ENGAGEMENT,
                ),
                "scoring.maxEngagement",
                DEFAULT_MAX_ENGAGEMENT,
            ),
        },
    }
}

fn resolve_fetch(raw: RawFetch) -> FetchConfig {
    let timeout_secs = lenient_count(raw.timeout_secs.as_ref(), "fetch.timeoutSecs", DEFAULT_TIMEOUT_SECS);

    FetchConfig {
        delay_ms: lenient_count(raw.delay_ms.as_ref(), "fetch.delayMs", DEFAULT_DELAY_MS),
        timeout_secs: if timeout_secs == 0 {
            warn!(
                key = "fetch.timeoutSecs",
                default = DEFAULT_TIMEOUT_SECS,
                "Timeout must be positive; using default"
            );
            DEFAULT_TIMEOUT_SECS
        } else {
            timeout_secs
        },
        retries: lenient_count(raw.retries.as_ref(), "fetch.retries", DEFAULT_RETRIES as u64) as usize,
        user_agent: raw.user_agent.unwrap_or_else(|| FetchConfig::default().user_agent),
    }
}

fn resolve_filter(raw: RawFilter) -> FilterConfig {
    FilterConfig {
        min_length: lenient_count(raw.min_length.as_ref(), "filter.minLength", DEFAULT_MIN_LENGTH as u64)
            as usize,
        max_length: lenient_count(raw.max_length.as_ref(), "filter.maxLength", DEFAULT_MAX_LENGTH as u64)
            as usize,
        exclude: raw.exclude,
        require_keywords: raw.require_keywords,
        max_per_source: lenient_count(
            raw.max_per_source.as_ref(),
            "filter.maxPerSource",
            DEFAULT_MAX_PER_SOURCE as u64,
        ) as usize,
    }
}

fn lenient_f64(value: Option<&Value>, key: &str, default: f64) -> f64 {
    let parsed = match value {
        None | Some(Value::Null) => return default,
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    match parsed {
        Some(v) if v.is_finite() => v,
        _ => {
            warn!(key, value = ?value, default, "Non-numeric config value; using default");
            default
        }
    }
}

fn lenient_i64(value: Option<&Value>, key: &str, default: i64) -> i64 {
    let parsed = match value {
        None | Some(Value::Null) => return default,
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        Some(_) => None,
    };

    parsed.unwrap_or_else(|| {
        warn!(key, value = ?value, default, "Non-integer config value; using default");
        default
    })
}

/// Like [`lenient_i64`], with negative values clamped to zero.
fn lenient_count(value: Option<&Value>, key: &str, default: u64) -> u64 {
    let parsed = lenient_i64(value, key, default as i64);
    u64::try_from(parsed).unwrap_or_else(|_| {
        warn!(key, value = parsed, "Negative config value; clamping to 0");
        0
    })
}

fn positive(value: f64, key: &str, default: f64) -> f64 {
    if value > 0.0 {
        value
    } else {
        warn!(key, value, default, "Config value must be positive; using default");
        default
    }
}
