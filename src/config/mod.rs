mod file_config;

pub use file_config::{FileConfig, SearchConfig};

use crate::search::{
    CoverUrls, SearchSettings, DEFAULT_COVER_BASE_URL, DEFAULT_MAX_MATCHES,
    DEFAULT_MIN_MATCH_RATIO, DEFAULT_NO_COVER_BASE_URL, DEFAULT_TRANSLIT_CUTOFF,
};
use anyhow::{bail, Result};
use std::path::PathBuf;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_path: Option<PathBuf>,
    pub translit_dict_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub translit_dict_path: Option<PathBuf>,
    pub covers: CoverUrls,
    pub search: SearchSettings,
    pub translit_cutoff: f64,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_path = file
            .db_path
            .map(PathBuf::from)
            .or_else(|| cli.db_path.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("db_path must be specified via --db or in config file")
            })?;
        if db_path.is_dir() {
            bail!("db_path is a directory: {:?}", db_path);
        }

        let translit_dict_path = file
            .translit_dict_path
            .map(PathBuf::from)
            .or_else(|| cli.translit_dict_path.clone());
        if let Some(path) = &translit_dict_path {
            if !path.is_file() {
                bail!("Transliteration dictionary not found: {:?}", path);
            }
        }

        let covers = CoverUrls {
            cover_base_url: file
                .cover_base_url
                .unwrap_or_else(|| DEFAULT_COVER_BASE_URL.to_string()),
            no_cover_base_url: file
                .no_cover_base_url
                .unwrap_or_else(|| DEFAULT_NO_COVER_BASE_URL.to_string()),
        };

        let search_file = file.search.unwrap_or_default();
        let min_match_ratio = search_file
            .min_match_ratio
            .unwrap_or(DEFAULT_MIN_MATCH_RATIO);
        if !(min_match_ratio > 0.0 && min_match_ratio <= 1.0) {
            bail!(
                "search.min_match_ratio must be in (0, 1], got {}",
                min_match_ratio
            );
        }
        let max_matches = search_file.max_matches.unwrap_or(DEFAULT_MAX_MATCHES);
        if max_matches == 0 {
            bail!("search.max_matches must be positive");
        }
        let translit_cutoff = search_file
            .translit_cutoff
            .unwrap_or(DEFAULT_TRANSLIT_CUTOFF);
        if !(0.0..=1.0).contains(&translit_cutoff) {
            bail!(
                "search.translit_cutoff must be in [0, 1], got {}",
                translit_cutoff
            );
        }

        Ok(Self {
            db_path,
            translit_dict_path,
            covers,
            search: SearchSettings {
                min_match_ratio,
                max_matches,
            },
            translit_cutoff,
        })
    }
}
