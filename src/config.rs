// src/config.rs
// =============================================================================
// Crawl settings loaded from a JSON file (or assembled from CLI flags).
//
// Example settings file:
//   {
//     "startPages": ["https://www.rust-lang.org/"],
//     "ignoredUrls": ["https://www\\.rust-lang\\.org/tools/.*"],
//     "ignoredWords": ["^.{1,3}$"],
//     "parallelism": 4,
//     "maxDepth": 2,
//     "timeoutSeconds": 10,
//     "popularWordCount": 5,
//     "profileOutputPath": "profile.txt",
//     "resultPath": "result.json"
//   }
//
// Every field is optional. The values are checked when they are read:
// a negative maxDepth or a zero timeout is a ConfigError, not a crawl.
// =============================================================================

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

// Defaults shared by the settings file and the `site` flags
pub const DEFAULT_MAX_DEPTH: i64 = 2;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_POPULAR_WORD_COUNT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CrawlSettings {
    pub start_pages: Vec<String>,
    pub ignored_urls: Vec<String>,
    pub ignored_words: Vec<String>,
    /// Worker threads; defaults to the number of CPUs
    pub parallelism: Option<usize>,
    pub max_depth: i64,
    pub timeout_seconds: u64,
    pub popular_word_count: usize,
    pub profile_output_path: Option<PathBuf>,
    pub result_path: Option<PathBuf>,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            start_pages: Vec::new(),
            ignored_urls: Vec::new(),
            ignored_words: Vec::new(),
            parallelism: None,
            max_depth: DEFAULT_MAX_DEPTH,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            popular_word_count: DEFAULT_POPULAR_WORD_COUNT,
            profile_output_path: None,
            result_path: None,
        }
    }
}

impl CrawlSettings {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn max_depth(&self) -> Result<usize, ConfigError> {
        usize::try_from(self.max_depth).map_err(|_| ConfigError::NegativeDepth(self.max_depth))
    }

    pub fn timeout(&self) -> Result<Duration, ConfigError> {
        match self.timeout_seconds {
            0 => Err(ConfigError::ZeroTimeout),
            seconds => Ok(Duration::from_secs(seconds)),
        }
    }

    pub fn parallelism(&self) -> Result<usize, ConfigError> {
        match self.parallelism {
            Some(0) => Err(ConfigError::ZeroParallelism),
            Some(threads) => Ok(threads),
            None => Ok(std::thread::available_parallelism().map_or(1, |n| n.get())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_full_settings() {
        let settings = CrawlSettings::from_json(
            r#"{
                "startPages": ["https://a.test/", "https://b.test/"],
                "ignoredUrls": ["https://a\\.test/skip.*"],
                "ignoredWords": ["the"],
                "parallelism": 3,
                "maxDepth": 4,
                "timeoutSeconds": 9,
                "popularWordCount": 7,
                "profileOutputPath": "profile.txt",
                "resultPath": "result.json"
            }"#,
        )
        .unwrap();

        assert_eq!(settings.start_pages.len(), 2);
        assert_eq!(settings.ignored_urls, vec!["https://a\\.test/skip.*"]);
        assert_eq!(settings.parallelism().unwrap(), 3);
        assert_eq!(settings.max_depth().unwrap(), 4);
        assert_eq!(settings.timeout().unwrap(), Duration::from_secs(9));
        assert_eq!(settings.popular_word_count, 7);
        assert_eq!(settings.result_path, Some(PathBuf::from("result.json")));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings = CrawlSettings::from_json(r#"{"startPages": ["https://a.test/"]}"#).unwrap();
        assert_eq!(settings.max_depth().unwrap(), 2);
        assert_eq!(settings.timeout().unwrap(), Duration::from_secs(30));
        assert_eq!(settings.popular_word_count, 10);
        assert!(settings.parallelism().unwrap() >= 1);
        assert!(settings.profile_output_path.is_none());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let settings =
            CrawlSettings::from_json(r#"{"maxDepth": -1, "timeoutSeconds": 0, "parallelism": 0}"#)
                .unwrap();
        assert!(matches!(settings.max_depth(), Err(ConfigError::NegativeDepth(-1))));
        assert!(matches!(settings.timeout(), Err(ConfigError::ZeroTimeout)));
        assert!(matches!(settings.parallelism(), Err(ConfigError::ZeroParallelism)));
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        let err = CrawlSettings::from_json(r#"{"maxDepth": "deep"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed(_)));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"startPages": ["file:///tmp/index.html"], "maxDepth": 0}}"#).unwrap();

        let settings = CrawlSettings::from_path(file.path()).unwrap();
        assert_eq!(settings.start_pages, vec!["file:///tmp/index.html"]);
        assert_eq!(settings.max_depth().unwrap(), 0);

        let err = CrawlSettings::from_path(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
