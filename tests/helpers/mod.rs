#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use shellmind::memory::{Memory, StoreConfig};
use shellmind::relevance::{RelevanceFilter, RelevanceScorer, ScoreError};
use tempfile::TempDir;

/// A scorer that returns canned results and records what it was asked.
#[derive(Clone)]
pub struct StubScorer {
    response: Arc<dyn Fn(&[&str]) -> Result<Vec<f32>, ScoreError> + Send + Sync>,
    pub calls: Arc<Mutex<Vec<(String, Vec<String>, String)>>>,
}

impl StubScorer {
    /// Scores each candidate by whether it contains `needle` (1.0) or not (0.0).
    pub fn matching(needle: &'static str) -> Self {
        Self::with(move |candidates| {
            Ok(candidates
                .iter()
                .map(|c| if c.contains(needle) { 1.0 } else { 0.0 })
                .collect())
        })
    }

    pub fn failing(make: fn() -> ScoreError) -> Self {
        Self::with(move |_| Err(make()))
    }

    pub fn with(
        f: impl Fn(&[&str]) -> Result<Vec<f32>, ScoreError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            response: Arc::new(f),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl RelevanceScorer for StubScorer {
    fn score(&self, query: &str, candidates: &[&str], api_key: &str) -> Result<Vec<f32>, ScoreError> {
        self.calls.lock().unwrap().push((
            query.to_string(),
            candidates.iter().map(|c| c.to_string()).collect(),
            api_key.to_string(),
        ));
        (self.response)(candidates)
    }
}

pub fn stub_filter(scorer: &StubScorer) -> RelevanceFilter {
    RelevanceFilter::new(Box::new(scorer.clone()), 5, 0.5)
}

/// A façade over fresh store paths inside `tmp`. The history file is not created.
pub fn test_memory(tmp: &TempDir, scorer: &StubScorer) -> Memory {
    Memory::new(
        StoreConfig::new(tmp.path().join("history.json")),
        StoreConfig::new(tmp.path().join("facts").join("fact_memory.txt")),
        stub_filter(scorer),
    )
}

/// Matches `HH:MM:SS DD/MM/YYYY ` at the start of a fact line.
pub fn has_timestamp_prefix(line: &str) -> bool {
    let b = line.as_bytes();
    if b.len() < 20 {
        return false;
    }
    let digit = |i: usize| b[i].is_ascii_digit();
    [0, 1, 3, 4, 6, 7, 9, 10, 12, 13, 15, 16, 17, 18].iter().all(|&i| digit(i))
        && b[2] == b':'
        && b[5] == b':'
        && b[8] == b' '
        && b[11] == b'/'
        && b[14] == b'/'
        && b[19] == b' '
}
