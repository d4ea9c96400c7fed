use config::{Config as ConfigBuilder, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for a search run.
///
/// # Configuration Locations
///
/// The configuration can be loaded from multiple locations in order of precedence:
/// 1. Custom config file specified via `--config` flag
/// 2. Local `.textfinder.yaml` in the current directory
/// 3. Global `$HOME/.config/textfinder/config.yaml`
///
/// # Configuration Format
///
/// ```yaml
/// # Literal, case-sensitive text to count
/// target: "lorem"
///
/// # File holding the corpus, one record per line
/// corpus_path: "lorem.txt"
///
/// # Worker count (default: CPU cores)
/// worker_count: 4
///
/// # Print the per-worker breakdown
/// per_worker: true
///
/// # Log one line per match
/// log_matches: false
///
/// # Log level (trace, debug, info, warn, error)
/// log_level: "info"
///
/// # How to handle invalid UTF-8 (failfast, lossy)
/// encoding_mode: "failfast"
/// ```
///
/// Command-line arguments take precedence over file values; see `merge_with_cli`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Text to search for
    #[serde(default)]
    pub target: String,

    /// Corpus file to load
    #[serde(default)]
    pub corpus_path: Option<PathBuf>,

    /// Number of workers. Zero is rejected when the search starts.
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    /// Whether to report counts per worker
    #[serde(default)]
    pub per_worker: bool,

    /// Whether to emit a log event for every match
    #[serde(default)]
    pub log_matches: bool,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// How to handle invalid UTF-8 in the corpus
    #[serde(default)]
    pub encoding_mode: EncodingMode,
}

/// Controls how invalid UTF-8 in a corpus file is handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingMode {
    /// Refuse the corpus
    #[default]
    FailFast,
    /// Replace invalid sequences with U+FFFD
    Lossy,
}

impl std::str::FromStr for EncodingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "failfast" | "fail-fast" => Ok(Self::FailFast),
            "lossy" => Ok(Self::Lossy),
            other => Err(format!("unknown encoding mode '{}'", other)),
        }
    }
}

fn default_worker_count() -> usize {
    num_cpus::get()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            target: String::new(),
            corpus_path: None,
            worker_count: default_worker_count(),
            per_worker: false,
            log_matches: false,
            log_level: default_log_level(),
            encoding_mode: EncodingMode::default(),
        }
    }
}

impl SearchConfig {
    /// Loads configuration from the default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Loads configuration from the default locations plus a specific file
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        let config_files = [
            dirs::config_dir().map(|p| p.join("textfinder/config.yaml")),
            Some(PathBuf::from(".textfinder.yaml")),
        ];

        for path in config_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        // An explicitly requested file must exist
        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder.build()?.try_deserialize()
    }

    /// Merges CLI arguments with configuration file values.
    ///
    /// The target and worker count are required on the command line, so the CLI
    /// value always wins, even when it is empty or zero and will be rejected by
    /// the search. Callers fill optional flags the user left out from `self`
    /// before merging, so `log_level` and `encoding_mode` are taken as given.
    pub fn merge_with_cli(mut self, cli_config: SearchConfig) -> Self {
        self.target = cli_config.target;
        if cli_config.corpus_path.is_some() {
            self.corpus_path = cli_config.corpus_path;
        }
        self.worker_count = cli_config.worker_count;
        if cli_config.per_worker {
            self.per_worker = true;
        }
        if cli_config.log_matches {
            self.log_matches = true;
        }
        self.log_level = cli_config.log_level;
        self.encoding_mode = cli_config.encoding_mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_load_config_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        let config_content = r#"
            target: "lorem"
            corpus_path: "lorem.txt"
            worker_count: 4
            per_worker: true
            log_matches: true
            log_level: "debug"
            encoding_mode: "lossy"
        "#;

        let mut file = File::create(&config_path).unwrap();
        file.write_all(config_content.as_bytes()).unwrap();

        let config = SearchConfig::load_from(Some(&config_path)).unwrap();
        assert_eq!(config.target, "lorem");
        assert_eq!(config.corpus_path, Some(PathBuf::from("lorem.txt")));
        assert_eq!(config.worker_count, 4);
        assert!(config.per_worker);
        assert!(config.log_matches);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.encoding_mode, EncodingMode::Lossy);
    }

    #[test]
    fn test_merge_with_cli() {
        let config_file = SearchConfig {
            target: "lorem".to_string(),
            corpus_path: Some(PathBuf::from("a.txt")),
            worker_count: 4,
            per_worker: true,
            log_matches: false,
            log_level: "info".to_string(),
            encoding_mode: EncodingMode::Lossy,
        };

        let cli_config = SearchConfig {
            target: "ipsum".to_string(),
            corpus_path: None,
            worker_count: 8,
            per_worker: false,
            log_matches: true,
            log_level: "warn".to_string(),
            encoding_mode: EncodingMode::FailFast,
        };

        let merged = config_file.merge_with_cli(cli_config);
        assert_eq!(merged.target, "ipsum"); // CLI value
        assert_eq!(merged.corpus_path, Some(PathBuf::from("a.txt"))); // File value (CLI None)
        assert_eq!(merged.worker_count, 8); // CLI value
        assert!(merged.per_worker); // File value
        assert!(merged.log_matches); // CLI value
        assert_eq!(merged.log_level, "warn"); // CLI value, even though it is the default
        assert_eq!(merged.encoding_mode, EncodingMode::FailFast); // CLI value
    }

    #[test]
    fn test_merge_keeps_empty_cli_target() {
        let config_file = SearchConfig {
            target: "abc".to_string(),
            ..SearchConfig::default()
        };
        let cli_config = SearchConfig {
            target: String::new(),
            worker_count: 2,
            ..SearchConfig::default()
        };

        let merged = config_file.merge_with_cli(cli_config);
        assert!(merged.target.is_empty());
        assert_eq!(merged.worker_count, 2);
    }

    #[test]
    fn test_default_values() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        let mut file = File::create(&config_path).unwrap();
        file.write_all(b"target: \"abc\"\n").unwrap();

        let config = SearchConfig::load_from(Some(&config_path)).unwrap();
        assert_eq!(config.target, "abc");
        assert_eq!(config.corpus_path, None);
        assert_eq!(config.worker_count, num_cpus::get());
        assert!(!config.per_worker);
        assert!(!config.log_matches);
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.encoding_mode, EncodingMode::FailFast);
    }

    #[test]
    fn test_invalid_config() {
        let config_content = r#"
            target: []
            worker_count: "many"
        "#;

        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        let mut file = File::create(&config_path).unwrap();
        file.write_all(config_content.as_bytes()).unwrap();

        let result = SearchConfig::load_from(Some(&config_path));
        assert!(result.is_err(), "Expected error loading invalid config");
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = SearchConfig::load_from(Some(Path::new("nonexistent.yaml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_encoding_mode_from_str() {
        assert_eq!("lossy".parse::<EncodingMode>(), Ok(EncodingMode::Lossy));
        assert_eq!("FailFast".parse::<EncodingMode>(), Ok(EncodingMode::FailFast));
        assert!("utf16".parse::<EncodingMode>().is_err());
    }
}
