//! Hugging Face inference API scorer.
//!
//! Uses the sentence-similarity task: the query is the source sentence and each
//! fact line is a candidate. The response is a JSON array with one cosine score
//! per candidate.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Serialize;

use super::{RelevanceScorer, ScoreError};
use crate::config::RelevanceConfig;

#[derive(Serialize)]
struct SimilarityRequest<'a> {
    inputs: SimilarityInputs<'a>,
}

#[derive(Serialize)]
struct SimilarityInputs<'a> {
    source_sentence: &'a str,
    sentences: &'a [&'a str],
}

pub struct HuggingFaceScorer {
    client: Client,
    url: String,
}

impl HuggingFaceScorer {
    pub fn new(config: &RelevanceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build HTTP client")?;
        let url = format!(
            "{}/{}",
            config.endpoint.trim_end_matches('/'),
            config.model
        );
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl RelevanceScorer for HuggingFaceScorer {
    fn score(
        &self,
        query: &str,
        candidates: &[&str],
        api_key: &str,
    ) -> std::result::Result<Vec<f32>, ScoreError> {
        let body = SimilarityRequest {
            inputs: SimilarityInputs {
                source_sentence: query,
                sentences: candidates,
            },
        };

        tracing::debug!(url = %self.url, candidates = candidates.len(), "requesting similarity scores");

        let resp = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    ScoreError::Unreachable("request timed out".into())
                } else if e.is_connect() {
                    ScoreError::Unreachable(format!("connection failed: {e}"))
                } else {
                    ScoreError::Unreachable(format!("request error: {e}"))
                }
            })?;

        let status = resp.status();
        if let Some(err) = classify_status(status) {
            return Err(err);
        }

        resp.json::<Vec<f32>>()
            .map_err(|e| ScoreError::Malformed(e.to_string()))
    }
}

/// Map a non-success HTTP status onto a [`ScoreError`].
fn classify_status(status: StatusCode) -> Option<ScoreError> {
    if status.is_success() {
        None
    } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        Some(ScoreError::Unauthorized(format!("HTTP {status}")))
    } else if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
        Some(ScoreError::Unreachable(format!("HTTP {status}")))
    } else {
        Some(ScoreError::Malformed(format!("HTTP {status}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_endpoint_and_model() {
        let config = RelevanceConfig {
            endpoint: "https://example.test/models/".into(),
            model: "org/model".into(),
            ..RelevanceConfig::default()
        };
        let scorer = HuggingFaceScorer::new(&config).unwrap();
        assert_eq!(scorer.url(), "https://example.test/models/org/model");
    }

    #[test]
    fn request_body_matches_similarity_task() {
        let sentences = ["a", "b"];
        let body = SimilarityRequest {
            inputs: SimilarityInputs {
                source_sentence: "q",
                sentences: &sentences,
            },
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"inputs": {"source_sentence": "q", "sentences": ["a", "b"]}})
        );
    }

    #[test]
    fn auth_statuses_are_unauthorized() {
        for status in [StatusCode::UNAUTHORIZED, StatusCode::FORBIDDEN] {
            assert!(matches!(
                classify_status(status),
                Some(ScoreError::Unauthorized(_))
            ));
        }
    }

    #[test]
    fn server_statuses_are_unreachable() {
        for status in [
            StatusCode::SERVICE_UNAVAILABLE,
            StatusCode::BAD_GATEWAY,
            StatusCode::TOO_MANY_REQUESTS,
        ] {
            assert!(matches!(
                classify_status(status),
                Some(ScoreError::Unreachable(_))
            ));
        }
        assert!(classify_status(StatusCode::OK).is_none());
        assert!(matches!(
            classify_status(StatusCode::BAD_REQUEST),
            Some(ScoreError::Malformed(_))
        ));
    }

    #[test]
    fn unreachable_host_is_reported_as_unreachable() {
        let config = RelevanceConfig {
            endpoint: "http://127.0.0.1:9".into(),
            timeout_secs: 2,
            ..RelevanceConfig::default()
        };
        let scorer = HuggingFaceScorer::new(&config).unwrap();
        let err = scorer.score("q", &["a"], "key").unwrap_err();
        assert!(matches!(err, ScoreError::Unreachable(_)), "got {err:?}");
    }
}
