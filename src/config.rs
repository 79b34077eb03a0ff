// ⚙️ Application configuration
//
// Defaults, then an optional JSON file, then REVIEW_INSIGHTS_* environment
// variables. Later layers win.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming the JSON config file
pub const CONFIG_ENV: &str = "REVIEW_INSIGHTS_CONFIG";

const ENV_PREFIX: &str = "REVIEW_INSIGHTS_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite file holding custom reports
    pub db_path: PathBuf,

    /// Import reviews from this CSV instead of generating mock data
    pub reviews_csv: Option<PathBuf>,

    pub mock_review_count: usize,

    /// Fixed seed for mock data; random when absent
    pub seed: Option<u64>,

    pub server_addr: String,

    pub default_page_size: usize,

    /// Branch searches shorter than this return nothing
    pub search_min_chars: usize,

    /// Default tracing filter, overridden by RUST_LOG
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            db_path: PathBuf::from("review_insights.db"),
            reviews_csv: None,
            mock_review_count: crate::mock::DEFAULT_REVIEW_COUNT,
            seed: None,
            server_addr: "0.0.0.0:3000".to_string(),
            default_page_size: 10,
            search_min_chars: 3,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from JSON file (fields not present keep their defaults)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Resolve the full configuration: explicit path, else `$REVIEW_INSIGHTS_CONFIG`,
    /// else defaults; then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let from_env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let mut config = match path.map(Path::to_path_buf).or(from_env) {
            Some(file) => Self::from_file(file)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(format!("{}{}", ENV_PREFIX, key)).ok())?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (`DB_PATH`, `SEED`, ...)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("DB_PATH") {
            self.db_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("REVIEWS_CSV") {
            self.reviews_csv = Some(PathBuf::from(v)).filter(|p| !p.as_os_str().is_empty());
        }
        if let Some(v) = lookup("MOCK_REVIEW_COUNT") {
            self.mock_review_count = v
                .trim()
                .parse()
                .context("MOCK_REVIEW_COUNT must be a number")?;
        }
        if let Some(v) = lookup("SEED") {
            self.seed = Some(v.trim().parse().context("SEED must be a number")?);
        }
        if let Some(v) = lookup("SERVER_ADDR") {
            self.server_addr = v;
        }
        if let Some(v) = lookup("PAGE_SIZE") {
            self.default_page_size = v.trim().parse().context("PAGE_SIZE must be a number")?;
        }
        if let Some(v) = lookup("SEARCH_MIN_CHARS") {
            self.search_min_chars = v.trim().parse().context("SEARCH_MIN_CHARS must be a number")?;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            self.log_level = v;
        }
        Ok(())
    }

    /// Whether a branch search query is long enough to run
    pub fn accepts_search(&self, query: &str) -> bool {
        query.trim().chars().count() >= self.search_min_chars
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_file_fills_missing_fields_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"seed": 7, "default_page_size": 25}}"#).unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.default_page_size, 25);
        assert_eq!(config.search_min_chars, 3);
        assert_eq!(config.server_addr, "0.0.0.0:3000");
    }

    #[test]
    fn test_overrides_win() {
        let env: HashMap<&str, &str> = [
            ("SEED", "99"),
            ("SEARCH_MIN_CHARS", "1"),
            ("REVIEWS_CSV", "data.csv"),
        ]
        .into_iter()
        .collect();
        let mut config = AppConfig::default();
        config
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.seed, Some(99));
        assert_eq!(config.search_min_chars, 1);
        assert_eq!(config.reviews_csv, Some(PathBuf::from("data.csv")));
    }

    #[test]
    fn test_bad_override_is_an_error() {
        let mut config = AppConfig::default();
        let result = config.apply_overrides(|key| (key == "SEED").then(|| "soon".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(AppConfig::from_file("/definitely/not/here.json").is_err());
    }

    #[test]
    fn test_search_policy() {
        let config = AppConfig::default();
        assert!(!config.accepts_search("br"));
        assert!(config.accepts_search("bri"));
    }
}
