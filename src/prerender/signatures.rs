//! Crawler classification.
//!
//! # Responsibilities
//! - Hold the crawler signature set (immutable after construction)
//! - Classify a raw User-Agent header value as crawler / regular client
//!
//! # Design Decisions
//! - Case-insensitive substring containment; no regex, no word boundaries.
//!   A signature anywhere in the header qualifies. This over-matches on
//!   purpose: serving a snapshot to a browser is harmless, while serving the
//!   empty SPA shell to an indexer costs rankings.
//! - Signatures are normalized to lowercase at construction so the per-request
//!   cost is one lowercase pass over the header plus n `contains` scans.

/// Search and social fetchers known to request pages without executing
/// application scripts.
pub const DEFAULT_SIGNATURES: &[&str] = &[
    "googlebot",
    "google-inspectiontool",
    "bingbot",
    "yandexbot",
    "duckduckbot",
    "baiduspider",
    "slurp",
    "applebot",
    "facebookexternalhit",
    "facebot",
    "twitterbot",
    "linkedinbot",
    "whatsapp",
    "telegrambot",
    "discordbot",
    "slackbot",
    "pinterestbot",
    "embedly",
    "quora link preview",
    "outbrain",
    "vkshare",
    "w3c_validator",
];

/// Classifier over a fixed crawler signature set.
///
/// Pure and deterministic: the same User-Agent always yields the same answer,
/// and classification never mutates the set.
#[derive(Debug, Clone)]
pub struct Classifier {
    /// Lowercased signatures.
    signatures: Vec<String>,
}

impl Classifier {
    /// Build a classifier from the given signatures (lowercased internally).
    pub fn new<I, S>(signatures: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            signatures: signatures
                .into_iter()
                .map(|s| s.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Returns true if the User-Agent contains any known crawler signature.
    ///
    /// Total over arbitrary input: empty strings, very long strings and
    /// non-ASCII content all classify without panicking. An absent header
    /// should be passed as `""` and classifies as non-crawler.
    pub fn is_crawler(&self, user_agent: &str) -> bool {
        if user_agent.is_empty() {
            return false;
        }
        let ua = user_agent.to_lowercase();
        self.signatures.iter().any(|sig| ua.contains(sig.as_str()))
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(DEFAULT_SIGNATURES.iter().copied())
    }
}
