//! Configuration types for gazette-grep

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Network and storage configuration for the scan and fetch stages
///
/// Groups settings related to where the index page lives and where downloaded
/// and extracted files land on disk. Used as a nested sub-config within
/// [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Index page holding the archive links (default: the weekly gazette index)
    #[serde(default = "default_index_url")]
    pub index_url: String,

    /// Directory downloaded archives are written to (default: "./downloads")
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    /// Directory text members are extracted into (default: "./extracted")
    #[serde(default = "default_extract_dir")]
    pub extract_dir: PathBuf,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            index_url: default_index_url(),
            download_dir: default_download_dir(),
            extract_dir: default_extract_dir(),
            user_agent: default_user_agent(),
        }
    }
}

/// Search behavior configuration
///
/// Groups settings for member selection and decoding. Used as a nested
/// sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Ordered encoding labels tried when decoding a member; the first label
    /// that decodes the whole file without error wins
    #[serde(default = "default_encodings")]
    pub encodings: Vec<String>,

    /// Filename suffix selecting text members inside the archive,
    /// compared case-insensitively (default: ".txt")
    #[serde(default = "default_text_suffix")]
    pub text_suffix: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            encodings: default_encodings(),
            text_suffix: default_text_suffix(),
        }
    }
}

/// Main configuration for [`GazetteGrep`](crate::GazetteGrep)
///
/// Every field has a sensible default; `Config::default()` works out of the
/// box against the public gazette index.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Scan and fetch settings
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Search settings
    #[serde(default)]
    pub search: SearchConfig,
}

fn default_index_url() -> String {
    "https://revistas.inpi.gov.br/rpi/".to_string()
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("./downloads")
}

fn default_extract_dir() -> PathBuf {
    PathBuf::from("./extracted")
}

fn default_user_agent() -> String {
    format!("gazette-grep/{}", env!("CARGO_PKG_VERSION"))
}

fn default_encodings() -> Vec<String> {
    vec![
        "utf-8".to_string(),
        "windows-1252".to_string(),
        "iso-8859-1".to_string(),
    ]
}

fn default_text_suffix() -> String {
    ".txt".to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_points_at_gazette_index() {
        let config = Config::default();
        assert_eq!(config.fetch.index_url, "https://revistas.inpi.gov.br/rpi/");
        assert_eq!(config.fetch.download_dir, PathBuf::from("./downloads"));
        assert_eq!(config.fetch.extract_dir, PathBuf::from("./extracted"));
        assert_eq!(config.search.text_suffix, ".txt");
    }

    #[test]
    fn default_encoding_order_tries_utf8_first() {
        let config = Config::default();
        assert_eq!(config.search.encodings[0], "utf-8");
        assert!(config.search.encodings.len() > 1, "fallbacks expected");
    }

    #[test]
    fn partial_json_fills_remaining_fields_with_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"fetch": {"index_url": "http://localhost/idx/"}}"#).unwrap();
        assert_eq!(config.fetch.index_url, "http://localhost/idx/");
        assert_eq!(config.fetch.download_dir, PathBuf::from("./downloads"));
        assert_eq!(config.search.encodings, Config::default().search.encodings);
    }
}
