//! Local memory: interaction history, fact log, and the façade that routes to them.
//!
//! [`Memory`] is the single entry point for the CLI layer. It owns an
//! [`InteractionStore`](interactions::InteractionStore), a
//! [`FactStore`](facts::FactStore), and a
//! [`RelevanceFilter`](crate::relevance::RelevanceFilter), and does no work
//! beyond routing between them.

pub mod error;
pub mod facts;
pub mod interactions;
pub mod types;

use std::path::PathBuf;

use crate::config::ShellmindConfig;
use crate::relevance::RelevanceFilter;
use error::{MemoryError, Result};
use facts::FactStore;
use interactions::InteractionStore;
use types::{FilterMode, InteractionRecord, RecallKey};

/// Where a store keeps its backing file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub path: PathBuf,
}

impl StoreConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// A history record paired with its reverse index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedRecord {
    pub index: usize,
    pub record: InteractionRecord,
}

pub struct Memory {
    interactions: InteractionStore,
    facts: FactStore,
    filter: RelevanceFilter,
}

impl Memory {
    pub fn new(history: StoreConfig, facts: StoreConfig, filter: RelevanceFilter) -> Self {
        Self {
            interactions: InteractionStore::new(history),
            facts: FactStore::new(facts),
            filter,
        }
    }

    pub fn from_config(config: &ShellmindConfig) -> anyhow::Result<Self> {
        Ok(Self::new(
            config.history_store(),
            config.fact_store(),
            RelevanceFilter::from_config(&config.relevance)?,
        ))
    }

    pub fn interactions(&self) -> &InteractionStore {
        &self.interactions
    }

    pub fn facts(&self) -> &FactStore {
        &self.facts
    }

    /// Create the interaction store if it does not exist yet.
    pub fn init(&self) -> Result<()> {
        self.interactions.init()
    }

    /// Record one prompt/response exchange. Returns the new history length.
    pub fn remember(
        &self,
        input: &str,
        output: &str,
        name: Option<&str>,
        favorite: bool,
    ) -> Result<usize> {
        self.interactions
            .append(InteractionRecord::new(input, output, name, favorite))
    }

    pub fn recall_by_index(&self, index: usize) -> Result<InteractionRecord> {
        self.interactions.get_by_reverse_index(index)
    }

    /// Route a parsed recall token.
    pub fn recall(&self, key: RecallKey) -> Result<InteractionRecord> {
        match key {
            RecallKey::Index(i) => self.recall_by_index(i),
            // Extension point: freeform lookup has no defined semantics yet.
            RecallKey::Freeform(query) => Err(MemoryError::FreeformRecallUnsupported(query)),
        }
    }

    /// All records, most recent first, each with its reverse index.
    pub fn history(&self) -> Result<Vec<IndexedRecord>> {
        Ok(self
            .interactions
            .load_all()?
            .into_iter()
            .rev()
            .enumerate()
            .map(|(index, record)| IndexedRecord { index, record })
            .collect())
    }

    pub fn memorize_fact(&self, text: &str) -> Result<()> {
        self.facts.append(text)
    }

    /// The raw fact log.
    pub fn list_facts(&self) -> Result<String> {
        self.facts.read_all()
    }

    /// Facts relevant to `query`, ready to splice into a prompt.
    ///
    /// Returns `Ok(None)` when no facts have been stored.
    pub fn retrieve_fact(
        &self,
        query: &str,
        mode: FilterMode,
        api_key: Option<&str>,
    ) -> Result<Option<String>> {
        let all = self.facts.read_all()?;
        if facts::lines(&all).next().is_none() {
            return Ok(None);
        }
        self.filter.filter(query, &all, mode, api_key).map(Some)
    }

    pub fn clear_facts(&self) -> Result<()> {
        self.facts.clear()
    }
}
