use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub db_path: Option<String>,
    pub translit_dict_path: Option<String>,
    pub cover_base_url: Option<String>,
    pub no_cover_base_url: Option<String>,

    pub search: Option<SearchConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct SearchConfig {
    /// Share of the query words a line must contain, in (0, 1].
    pub min_match_ratio: Option<f64>,
    pub max_matches: Option<usize>,
    /// Minimum similarity for a query word to be transliterated.
    pub translit_cutoff: Option<f64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
