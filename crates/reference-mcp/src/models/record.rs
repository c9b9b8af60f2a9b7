//! Bibliographic record model shared by every provider.

use serde::{Deserialize, Serialize};

/// Metadata from a specific provider about a record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderMeta {
    /// Provider name (e.g., "dblp", "semantic_scholar").
    pub name: String,

    /// Provider-specific relevance score.
    #[serde(default)]
    pub relevance_score: Option<f64>,

    /// Direct URL to this record on the provider.
    #[serde(default)]
    pub url: Option<String>,

    /// Raw response payload from the provider.
    #[serde(default)]
    pub raw_data: Option<serde_json::Value>,
}

impl ProviderMeta {
    /// Create provider metadata with only a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Default::default() }
    }

    /// Set the relevance score.
    #[must_use]
    pub const fn with_score(mut self, score: f64) -> Self {
        self.relevance_score = Some(score);
        self
    }

    /// Set the provider URL.
    #[must_use]
    pub fn with_url(mut self, url: Option<String>) -> Self {
        self.url = url;
        self
    }

    /// Attach the raw provider payload.
    #[must_use]
    pub fn with_raw(mut self, raw: serde_json::Value) -> Self {
        self.raw_data = Some(raw);
        self
    }
}

/// Academic reference with metadata and a BibTeX representation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Paper title.
    pub title: String,

    /// Author names in first-seen order.
    pub authors: Vec<String>,

    /// Publication year.
    #[serde(default)]
    pub year: Option<i32>,

    /// Digital Object Identifier.
    #[serde(default)]
    pub doi: Option<String>,

    /// arXiv identifier, possibly with a version suffix.
    #[serde(default)]
    pub arxiv_id: Option<String>,

    /// Semantic Scholar paper ID.
    #[serde(default)]
    pub s2_paper_id: Option<String>,

    /// DBLP key.
    #[serde(default)]
    pub dblp_key: Option<String>,

    /// Journal or conference name.
    #[serde(default)]
    pub venue: Option<String>,

    #[serde(default)]
    pub volume: Option<String>,

    #[serde(default)]
    pub issue: Option<String>,

    #[serde(default)]
    pub pages: Option<String>,

    #[serde(default)]
    pub publisher: Option<String>,

    /// Paper abstract.
    #[serde(default)]
    pub r#abstract: Option<String>,

    /// BibTeX-formatted citation.
    pub bibtex: String,

    /// Number of citations.
    #[serde(default)]
    pub citation_count: Option<u64>,

    /// Providers that returned this record. Only ever appended to.
    #[serde(default)]
    pub sources: Vec<ProviderMeta>,

    /// Aggregated relevance score across providers.
    #[serde(default)]
    pub score: f64,
}

impl Record {
    /// Create a record with the required fields.
    #[must_use]
    pub fn new(title: impl Into<String>, authors: Vec<String>, bibtex: impl Into<String>) -> Self {
        Self { title: title.into(), authors, bibtex: bibtex.into(), ..Default::default() }
    }

    /// Get the first author's name if available.
    #[must_use]
    pub fn first_author(&self) -> Option<&str> {
        self.authors.first().map(String::as_str)
    }

    /// Last whitespace-delimited token of the first author, lower-cased.
    ///
    /// Returns an empty string when there is no usable first author.
    #[must_use]
    pub fn first_author_last_name(&self) -> String {
        self.first_author()
            .and_then(|name| name.split_whitespace().last())
            .map(str::to_lowercase)
            .unwrap_or_default()
    }

    /// Get author names as a comma-separated string.
    #[must_use]
    pub fn author_names(&self) -> String {
        self.authors.join(", ")
    }

    /// Names of the providers that contributed to this record, in order.
    #[must_use]
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name.as_str()).collect()
    }

    /// Recompute the aggregated score as the mean of all finite provider scores.
    pub fn recompute_score(&mut self) {
        let scores: Vec<f64> = self
            .sources
            .iter()
            .filter_map(|s| s.relevance_score)
            .filter(|s| s.is_finite())
            .collect();
        self.score = if scores.is_empty() {
            0.0
        } else {
            scores.iter().sum::<f64>() / scores.len() as f64
        };
    }
}
