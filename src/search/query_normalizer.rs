//! Transliterates query words through a dictionary.
//!
//! Users often type lyrics in Latin letters for songs transcribed in another
//! script. Each query word is matched against the dictionary keys and replaced
//! by the value of the closest key above the similarity cutoff.

use super::similarity::similarity_ratio;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

pub const DEFAULT_TRANSLIT_CUTOFF: f64 = 0.7;

pub struct QueryNormalizer {
    // sorted by key; of equally close keys the last one wins
    entries: Vec<(String, String)>,
    cutoff: f64,
}

impl QueryNormalizer {
    pub fn new(dictionary: HashMap<String, String>, cutoff: f64) -> Self {
        let mut entries: Vec<(String, String)> = dictionary
            .into_iter()
            .map(|(key, value)| (key.to_lowercase(), value))
            .collect();
        entries.sort();
        Self { entries, cutoff }
    }

    /// A normalizer that leaves every query untouched.
    pub fn empty() -> Self {
        Self::new(HashMap::new(), DEFAULT_TRANSLIT_CUTOFF)
    }

    /// Loads a JSON object mapping words to their transliteration.
    pub fn load(path: &Path, cutoff: f64) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read transliteration dictionary {:?}", path))?;
        let dictionary: HashMap<String, String> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse transliteration dictionary {:?}", path))?;
        debug!(
            "Loaded {} transliteration entries from {:?}",
            dictionary.len(),
            path
        );
        Ok(Self::new(dictionary, cutoff))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rewrites `query` with the transliterated words.
    ///
    /// When at least one word has a close enough dictionary entry, the result
    /// holds only the transliterated words; otherwise the query is returned
    /// unchanged.
    pub fn normalize(&self, query: &str) -> String {
        let mapped: Vec<&str> = query
            .split(' ')
            .filter(|word| !word.is_empty())
            .filter_map(|word| self.closest(word))
            .collect();
        if mapped.is_empty() {
            query.to_string()
        } else {
            mapped.join(" ")
        }
    }

    fn closest(&self, word: &str) -> Option<&str> {
        let word = word.to_lowercase();
        let mut best: Option<(f64, &str)> = None;
        for (key, value) in &self.entries {
            let ratio = similarity_ratio(key, &word);
            if ratio < self.cutoff {
                continue;
            }
            if best.map_or(true, |(best_ratio, _)| ratio >= best_ratio) {
                best = Some((ratio, value.as_str()));
            }
        }
        best.map(|(_, value)| value)
    }
}
