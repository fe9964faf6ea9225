//! Character repository: cache first, then the backing source, then the built-in samples.
//! Created once per service and shared via Arc; lookups never fail, a missing id is `None`.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::data::cache::{Clock, SystemClock, TtlCache};
use crate::data::character::Character;
use crate::data::normalize::{normalize_character, NormalizeError};
use crate::data::samples::{find_sample, sample_characters};
use crate::data::source::{fetch_with_retry, CharacterSource, SourceError};

pub const CHARACTERS_LIST_KEY: &str = "characters_list";
pub const DEFAULT_SOURCE_BASE_URL: &str = "https://api.dokkan.example.com";
pub const DEFAULT_SOURCE_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SOURCE_RETRIES: u32 = 3;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

pub fn character_key(id: &str) -> String {
    format!("character_{id}")
}

#[derive(Debug, Clone, PartialEq)]
pub struct RepositoryConfig {
    /// Per-attempt timeout for backing-source fetches.
    pub timeout: Duration,
    /// Extra attempts after the first failure.
    pub retries: u32,
    pub ttl: Duration,
    pub base_url: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_SOURCE_TIMEOUT_SECS),
            retries: DEFAULT_SOURCE_RETRIES,
            ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            base_url: DEFAULT_SOURCE_BASE_URL.to_string(),
        }
    }
}

/// Why a fetch could not produce characters. Never leaves the repository: every
/// variant is answered with the sample fallback.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("invalid character record: {0}")]
    Normalize(#[from] NormalizeError),
}

#[derive(Debug, Clone)]
enum Cached {
    List(Vec<Character>),
    One(Character),
}

pub struct CharacterRepository {
    source: Arc<dyn CharacterSource>,
    cache: TtlCache<Cached>,
    config: RepositoryConfig,
}

impl CharacterRepository {
    pub fn new(source: Arc<dyn CharacterSource>, config: RepositoryConfig) -> Self {
        Self::with_clock(source, config, Arc::new(SystemClock))
    }

    pub fn with_clock(
        source: Arc<dyn CharacterSource>,
        config: RepositoryConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let cache = TtlCache::new(config.ttl, clock);
        Self {
            source,
            cache,
            config,
        }
    }

    /// All known characters. Falls back to the built-in samples when the source
    /// or normalization fails; the fallback is not cached.
    pub async fn get_characters(&self) -> Vec<Character> {
        if let Some(Cached::List(characters)) = self.cache.get(CHARACTERS_LIST_KEY) {
            tracing::debug!(count = characters.len(), "character list served from cache");
            return characters;
        }

        match self.load_characters().await {
            Ok(characters) => {
                tracing::info!(count = characters.len(), "character list fetched");
                self.cache
                    .insert(CHARACTERS_LIST_KEY, Cached::List(characters.clone()));
                characters
            }
            Err(err) => {
                tracing::warn!(error = %err, "character list fetch failed, using sample data");
                sample_characters()
            }
        }
    }

    /// One character by id, or `None` when no such character exists.
    pub async fn get_character(&self, id: &str) -> Option<Character> {
        let key = character_key(id);
        if let Some(Cached::One(character)) = self.cache.get(&key) {
            tracing::debug!(id, "character served from cache");
            return Some(character);
        }

        match self.load_character(id).await {
            Ok(Some(character)) => {
                tracing::info!(id, name = %character.name, "character fetched");
                self.cache.insert(key, Cached::One(character.clone()));
                Some(character)
            }
            Ok(None) => {
                tracing::warn!(id, "character not found");
                None
            }
            Err(err) => {
                tracing::warn!(id, error = %err, "character fetch failed, searching sample data");
                find_sample(id)
            }
        }
    }

    /// Close the backing source. Call once on shutdown.
    pub async fn close(&self) {
        self.source.close().await;
    }

    async fn load_characters(&self) -> Result<Vec<Character>, RepositoryError> {
        let records = fetch_with_retry(
            "characters",
            self.config.timeout,
            self.config.retries,
            || self.source.fetch_all(),
        )
        .await?;

        let characters = records
            .iter()
            .map(normalize_character)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(characters)
    }

    async fn load_character(&self, id: &str) -> Result<Option<Character>, RepositoryError> {
        let record = fetch_with_retry(
            "character",
            self.config.timeout,
            self.config.retries,
            || self.source.fetch_one(id),
        )
        .await?;

        match record {
            Some(raw) => Ok(Some(normalize_character(&raw)?)),
            None => Ok(None),
        }
    }
}
