//! Relevance filtering of the fact log.
//!
//! Provides the [`RelevanceScorer`] trait, a Hugging Face implementation, and
//! [`RelevanceFilter`], which narrows a fact log to the lines most similar to a
//! query. The filter holds no state between calls.
//!
//! When the scoring service cannot be reached the filter falls back to returning
//! the log unchanged. Rejected or missing credentials are reported instead.

pub mod huggingface;

use thiserror::Error;
use tracing::{debug, warn};

use crate::config::RelevanceConfig;
use crate::memory::error::{MemoryError, Result};
use crate::memory::facts;
use crate::memory::types::FilterMode;

/// Why a scoring round trip failed.
#[derive(Debug, Error)]
pub enum ScoreError {
    /// Network failure, timeout, or a server-side error.
    #[error("relevance service unreachable: {0}")]
    Unreachable(String),
    /// The service rejected the credentials.
    #[error("relevance service rejected credentials: {0}")]
    Unauthorized(String),
    /// The service answered with something that is not a score per candidate.
    #[error("unexpected relevance response: {0}")]
    Malformed(String),
}

/// Scores candidate sentences against a query.
///
/// Implementations return one score per candidate, in candidate order; higher
/// means more relevant. Calls are blocking.
pub trait RelevanceScorer: Send + Sync {
    fn score(
        &self,
        query: &str,
        candidates: &[&str],
        api_key: &str,
    ) -> std::result::Result<Vec<f32>, ScoreError>;
}

/// Create a scorer from config.
pub fn create_scorer(config: &RelevanceConfig) -> anyhow::Result<Box<dyn RelevanceScorer>> {
    let scorer = huggingface::HuggingFaceScorer::new(config)?;
    Ok(Box::new(scorer))
}

/// Narrows a fact log to the lines relevant to a query.
pub struct RelevanceFilter {
    scorer: Box<dyn RelevanceScorer>,
    top_k: usize,
    min_score: f32,
}

impl RelevanceFilter {
    pub fn new(scorer: Box<dyn RelevanceScorer>, top_k: usize, min_score: f32) -> Self {
        Self {
            scorer,
            top_k,
            min_score,
        }
    }

    pub fn from_config(config: &RelevanceConfig) -> anyhow::Result<Self> {
        Ok(Self::new(
            create_scorer(config)?,
            config.top_k,
            config.min_score,
        ))
    }

    /// Filter `fact_text` for `query`.
    ///
    /// `Passthrough` returns the text untouched. `EmbeddingRank` keeps the
    /// `top_k` best-scoring lines at or above `min_score`, in log order.
    pub fn filter(
        &self,
        query: &str,
        fact_text: &str,
        mode: FilterMode,
        api_key: Option<&str>,
    ) -> Result<String> {
        if mode == FilterMode::Passthrough {
            return Ok(fact_text.to_string());
        }

        let candidates: Vec<&str> = facts::lines(fact_text).collect();
        if candidates.is_empty() {
            return Ok(fact_text.to_string());
        }

        let api_key = match api_key.map(str::trim) {
            Some(key) if !key.is_empty() => key,
            _ => {
                return Err(MemoryError::FilterUnauthorized(
                    "no API key configured for relevance ranking".into(),
                ))
            }
        };

        let scores = match self.scorer.score(query, &candidates, api_key) {
            Ok(scores) if scores.len() == candidates.len() => scores,
            Ok(scores) => {
                warn!(
                    expected = candidates.len(),
                    got = scores.len(),
                    "score count mismatch, returning facts unfiltered"
                );
                return Ok(fact_text.to_string());
            }
            Err(ScoreError::Unauthorized(detail)) => {
                return Err(MemoryError::FilterUnauthorized(detail));
            }
            Err(e) => {
                warn!(error = %e, "relevance ranking unavailable, returning facts unfiltered");
                return Ok(fact_text.to_string());
            }
        };

        let keep = select(&scores, self.top_k, self.min_score);
        debug!(
            candidates = candidates.len(),
            kept = keep.len(),
            "facts ranked"
        );

        let mut out = String::new();
        for i in keep {
            out.push_str(candidates[i]);
            out.push('\n');
        }
        Ok(out)
    }
}

/// Indices of the `top_k` highest scores at or above `min_score`, ascending.
fn select(scores: &[f32], top_k: usize, min_score: f32) -> Vec<usize> {
    let mut ranked: Vec<usize> = (0..scores.len())
        .filter(|&i| scores[i] >= min_score)
        .collect();
    ranked.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]).then(a.cmp(&b)));
    ranked.truncate(top_k);
    ranked.sort_unstable();
    ranked
}
