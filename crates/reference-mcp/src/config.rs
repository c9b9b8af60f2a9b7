//! Configuration for the reference search MCP server.

use std::time::Duration;

/// API and pipeline configuration constants.
pub mod api {
    use std::time::Duration;

    /// Semantic Scholar Graph API endpoint.
    pub const SEMANTIC_SCHOLAR_API: &str = "https://api.semanticscholar.org/graph/v1";

    /// DBLP publication search endpoint.
    pub const DBLP_API: &str = "https://dblp.org/search/publ/api";

    /// OpenAlex API endpoint.
    pub const OPENALEX_API: &str = "https://api.openalex.org";

    /// arXiv Atom query endpoint.
    pub const ARXIV_API: &str = "https://export.arxiv.org/api/query";

    /// Per-provider request timeout.
    pub const PROVIDER_TIMEOUT: Duration = Duration::from_secs(4);

    /// arXiv answers more slowly than the JSON APIs.
    pub const ARXIV_TIMEOUT: Duration = Duration::from_secs(5);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

    /// Upper bound on results requested from a single provider.
    pub const MAX_PER_QUERY: usize = 100;

    /// Upper bound on results requested from arXiv.
    pub const ARXIV_MAX_PER_QUERY: usize = 50;

    /// Provider-level cache TTL (15 minutes).
    pub const PROVIDER_CACHE_TTL: Duration = Duration::from_secs(15 * 60);

    /// Provider-level cache capacity.
    pub const PROVIDER_CACHE_MAX_SIZE: u64 = 100;

    /// Aggregated result cache TTL (10 minutes).
    pub const RESULT_CACHE_TTL: Duration = Duration::from_secs(10 * 60);

    /// Interval of the background sweep over the result cache.
    pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

    /// Entry count above which `set` sweeps expired entries inline.
    pub const SWEEP_THRESHOLD: usize = 256;

    /// Default number of references returned.
    pub const DEFAULT_MAX_RESULTS: usize = 20;

    /// Largest accepted `maxResults` / `topK`.
    pub const MAX_RESULTS_LIMIT: usize = 100;

    /// Providers are asked for this many times the requested count so
    /// deduplication has material to work with.
    pub const OVERFETCH_FACTOR: usize = 2;

    /// User agent sent to every provider.
    pub const USER_AGENT: &str = concat!("reference-mcp/", env!("CARGO_PKG_VERSION"));
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Semantic Scholar API key (optional).
    pub semantic_scholar_api_key: Option<String>,

    /// Contact address for the OpenAlex polite pool (optional).
    pub openalex_mailto: Option<String>,

    /// Base URL for Semantic Scholar (for testing with mock servers).
    pub semantic_scholar_url: String,

    /// Base URL for DBLP.
    pub dblp_url: String,

    /// Base URL for OpenAlex.
    pub openalex_url: String,

    /// arXiv query endpoint.
    pub arxiv_url: String,

    /// Per-provider timeout applied by the fanout.
    pub provider_timeout: Duration,

    /// Timeout for the arXiv provider.
    pub arxiv_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Provider cache TTL.
    pub provider_cache_ttl: Duration,

    /// Provider cache capacity.
    pub provider_cache_max_size: u64,

    /// Result cache TTL.
    pub result_cache_ttl: Duration,

    /// Result cache sweep interval.
    pub sweep_interval: Duration,

    /// Result cache size that triggers an inline sweep.
    pub sweep_threshold: usize,
}

impl Config {
    /// Create a new configuration with optional credentials.
    #[must_use]
    pub fn new(semantic_scholar_api_key: Option<String>, openalex_mailto: Option<String>) -> Self {
        Self {
            semantic_scholar_api_key,
            openalex_mailto,
            semantic_scholar_url: api::SEMANTIC_SCHOLAR_API.to_string(),
            dblp_url: api::DBLP_API.to_string(),
            openalex_url: api::OPENALEX_API.to_string(),
            arxiv_url: api::ARXIV_API.to_string(),
            provider_timeout: api::PROVIDER_TIMEOUT,
            arxiv_timeout: api::ARXIV_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            provider_cache_ttl: api::PROVIDER_CACHE_TTL,
            provider_cache_max_size: api::PROVIDER_CACHE_MAX_SIZE,
            result_cache_ttl: api::RESULT_CACHE_TTL,
            sweep_interval: api::SWEEP_INTERVAL,
            sweep_threshold: api::SWEEP_THRESHOLD,
        }
    }

    /// Create a test configuration pointing every provider at one mock server.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            semantic_scholar_api_key: None,
            openalex_mailto: None,
            semantic_scholar_url: format!("{}/graph/v1", base_url),
            dblp_url: format!("{}/search/publ/api", base_url),
            openalex_url: base_url.to_string(),
            arxiv_url: format!("{}/api/query", base_url),
            provider_timeout: Duration::from_secs(5),
            arxiv_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            provider_cache_ttl: Duration::from_secs(0), // No caching in tests
            provider_cache_max_size: 0,
            result_cache_ttl: api::RESULT_CACHE_TTL,
            sweep_interval: api::SWEEP_INTERVAL,
            sweep_threshold: api::SWEEP_THRESHOLD,
        }
    }

    /// Override the result cache TTL.
    #[must_use]
    pub const fn with_result_cache_ttl(mut self, ttl: Duration) -> Self {
        self.result_cache_ttl = ttl;
        self
    }

    /// Check if a Semantic Scholar API key is configured.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.semantic_scholar_api_key.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(None, None)
    }
}
