//! Dare, punishment and random-event prompt pools.
//!
//! Prompt documents are either a flat array of strings or a map from level
//! (`"1"`, `"2"`, `"3"`) to arrays of strings. Both shapes are normalized
//! into a [`PromptDeck`] once at load time. Non-string entries are dropped
//! and an unrecognized document becomes an empty pool, so lookups fall back
//! to placeholder text instead of failing.
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::numbers::unit_to_index;
use crate::rng::{RandomSource, RollStream};

const DEFAULT_DARES: &str = include_str!("../assets/data/dares.json");
const DEFAULT_PUNISHMENTS: &str = include_str!("../assets/data/punishments.json");
const DEFAULT_EVENTS: &str = include_str!("../assets/data/random_events.json");

/// Errors raised while loading bundled or external data documents.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to parse {asset}: {source}")]
    Parse {
        asset: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Raw prompt document as authored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PromptPool {
    Flat(Vec<String>),
    Leveled(BTreeMap<u8, Vec<String>>),
}

impl PromptPool {
    /// Interpret a JSON value as a prompt pool.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Array(items) => Self::Flat(strings(items)),
            Value::Object(map) => {
                let mut levels = BTreeMap::new();
                for (key, entry) in map {
                    let Ok(level) = key.trim().parse::<u8>() else {
                        continue;
                    };
                    if let Value::Array(items) = entry {
                        levels.entry(level).or_insert_with(Vec::new).extend(strings(items));
                    }
                }
                Self::Leveled(levels)
            }
            _ => Self::Flat(Vec::new()),
        }
    }
}

fn strings(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect()
}

/// Normalized prompt pool: per-level lists plus every prompt flattened.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PromptDeck {
    by_level: BTreeMap<u8, Vec<String>>,
    all: Vec<String>,
}

impl PromptDeck {
    #[must_use]
    pub fn from_pool(pool: PromptPool) -> Self {
        match pool {
            PromptPool::Flat(all) => Self {
                by_level: BTreeMap::new(),
                all,
            },
            PromptPool::Leveled(by_level) => {
                let all = by_level.values().flatten().cloned().collect();
                Self { by_level, all }
            }
        }
    }

    /// Parse and normalize a prompt document.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not valid JSON. Valid JSON with an
    /// unexpected shape yields an empty deck.
    pub fn from_json(asset: &'static str, json: &str) -> Result<Self, DataError> {
        let value: Value =
            serde_json::from_str(json).map_err(|source| DataError::Parse { asset, source })?;
        Ok(Self::from_pool(PromptPool::from_value(&value)))
    }

    /// Prompts keyed to `level`, or every prompt when that level has none.
    #[must_use]
    pub fn pool_for(&self, level: u8) -> &[String] {
        match self.by_level.get(&level) {
            Some(pool) if !pool.is_empty() => pool,
            _ => &self.all,
        }
    }

    #[must_use]
    pub fn all(&self) -> &[String] {
        &self.all
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.all.len()
    }

    /// Pick a prompt for `level`, or `fallback` when nothing is available.
    pub fn pick<R: RandomSource + ?Sized>(&self, level: u8, rng: &mut R, fallback: &str) -> String {
        pick_random(self.pool_for(level), rng, fallback)
    }

    /// Pick from the whole deck regardless of level.
    pub fn pick_any<R: RandomSource + ?Sized>(&self, rng: &mut R, fallback: &str) -> String {
        pick_random(&self.all, rng, fallback)
    }
}

/// Uniform pick over `pool`, returning `fallback` for an empty pool.
pub fn pick_random<R: RandomSource + ?Sized>(pool: &[String], rng: &mut R, fallback: &str) -> String {
    unit_to_index(rng.next_unit(RollStream::Prompt), pool.len())
        .and_then(|idx| pool.get(idx))
        .map_or_else(|| fallback.to_string(), Clone::clone)
}

/// Every prompt pool a match draws from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PromptLibrary {
    pub dares: PromptDeck,
    pub punishments: PromptDeck,
    pub events: PromptDeck,
}

impl PromptLibrary {
    /// Library with no prompts; every pick yields fallback text.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a library from three JSON documents.
    ///
    /// # Errors
    ///
    /// Returns an error if any document is not valid JSON.
    pub fn from_json(dares: &str, punishments: &str, events: &str) -> Result<Self, DataError> {
        Ok(Self {
            dares: PromptDeck::from_json("dares", dares)?,
            punishments: PromptDeck::from_json("punishments", punishments)?,
            events: PromptDeck::from_json("random_events", events)?,
        })
    }

    /// Library backed by the prompt assets compiled into the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if a bundled asset fails to parse.
    pub fn bundled() -> Result<Self, DataError> {
        Self::from_json(DEFAULT_DARES, DEFAULT_PUNISHMENTS, DEFAULT_EVENTS)
    }
}
