//! Startup configuration.
//!
//! Settings come from a `.env` style key=value file plus the process
//! environment. The file is loaded into the environment once; the values the
//! pipeline needs are then copied into an explicit [`Config`] that is passed
//! to the backend constructors.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Variable holding the text-generation API credential.
pub const API_KEY_VAR: &str = "API_KEY";
/// Optional model override.
pub const MODEL_VAR: &str = "PITCH_MODEL";
/// Optional sampling temperature.
pub const TEMPERATURE_VAR: &str = "PITCH_TEMPERATURE";
/// Optional completion length limit.
pub const MAX_TOKENS_VAR: &str = "PITCH_MAX_TOKENS";
/// Optional Wikipedia language edition, e.g. `en`.
pub const WIKI_LANG_VAR: &str = "PITCH_WIKI_LANG";
/// Optional number of Wikipedia pages to summarize.
pub const WIKI_TOP_K_VAR: &str = "PITCH_WIKI_TOP_K";
/// Optional character cap on the research text.
pub const WIKI_MAX_CHARS_VAR: &str = "PITCH_WIKI_MAX_CHARS";

/// Errors from loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("API_KEY is not set - add it to your .env file or export it")]
    MissingApiKey,

    #[error("Failed to read env file {path}: {source}")]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    #[error("Invalid value for {key}: '{value}' ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Settings for the Wikipedia research lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct WikipediaConfig {
    /// Language edition subdomain.
    pub language: String,
    /// Number of search hits to summarize.
    pub top_k_results: usize,
    /// Maximum characters of research text.
    pub max_chars: usize,
}

impl Default for WikipediaConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            top_k_results: 3,
            max_chars: 4000,
        }
    }
}

/// Everything the pipeline needs at startup.
#[derive(Clone)]
pub struct Config {
    /// Credential for the text-generation backend.
    pub api_key: String,
    /// Model override; the client default is used when absent.
    pub model: Option<String>,
    /// Sampling temperature for both chains.
    pub temperature: f32,
    /// Completion length limit.
    pub max_tokens: usize,
    /// Research lookup settings.
    pub wikipedia: WikipediaConfig,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("wikipedia", &self.wikipedia)
            .finish()
    }
}

impl Config {
    /// Default sampling temperature. Low, so titles stay on topic.
    pub const DEFAULT_TEMPERATURE: f32 = 0.1;
    /// Default completion length limit.
    pub const DEFAULT_MAX_TOKENS: usize = 1024;

    /// Create a config with defaults around the given credential.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: None,
            temperature: Self::DEFAULT_TEMPERATURE,
            max_tokens: Self::DEFAULT_MAX_TOKENS,
            wikipedia: WikipediaConfig::default(),
        }
    }

    /// Load the env file into the process environment, then read the config.
    ///
    /// With `env_file = None`, a `.env` in the working directory (or a parent)
    /// is loaded if present. An explicit path must exist. Variables already
    /// set in the environment take precedence over the file.
    pub fn load(env_file: Option<&Path>) -> Result<Self, ConfigError> {
        match env_file {
            Some(path) => {
                dotenvy::from_path(path).map_err(|source| ConfigError::EnvFile {
                    path: path.to_path_buf(),
                    source,
                })?;
                info!(path = %path.display(), "Loaded env file");
            }
            None => match dotenvy::dotenv() {
                Ok(path) => info!(path = %path.display(), "Loaded env file"),
                Err(e) => debug!(error = %e, "No .env file loaded"),
            },
        }

        Self::from_vars(utf8_vars(std::env::vars_os()))
    }

    /// Read a config from an env file without touching the process environment.
    pub fn from_env_file(path: &Path) -> Result<Self, ConfigError> {
        let env_error = |source| ConfigError::EnvFile {
            path: path.to_path_buf(),
            source,
        };
        let vars = dotenvy::from_path_iter(path)
            .map_err(env_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(env_error)?;
        Self::from_vars(vars)
    }

    /// Build a config from key/value pairs. Unknown keys are ignored.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut api_key = None;
        let mut config = Self::new(String::new());

        for (key, value) in vars {
            let value: String = value.into();
            match key.as_ref() {
                API_KEY_VAR => api_key = Some(value),
                MODEL_VAR => {
                    let model = value.trim();
                    config.model = (!model.is_empty()).then(|| model.to_string());
                }
                TEMPERATURE_VAR => {
                    let temperature: f32 = parse_value(TEMPERATURE_VAR, &value)?;
                    if !(0.0..=1.0).contains(&temperature) {
                        return Err(invalid(TEMPERATURE_VAR, &value, "must be between 0.0 and 1.0"));
                    }
                    config.temperature = temperature;
                }
                MAX_TOKENS_VAR => config.max_tokens = parse_positive(MAX_TOKENS_VAR, &value)?,
                WIKI_LANG_VAR => {
                    let language = value.trim();
                    if language.is_empty()
                        || !language.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
                    {
                        return Err(invalid(WIKI_LANG_VAR, &value, "expected a language code like `en`"));
                    }
                    config.wikipedia.language = language.to_string();
                }
                WIKI_TOP_K_VAR => {
                    config.wikipedia.top_k_results = parse_positive(WIKI_TOP_K_VAR, &value)?
                }
                WIKI_MAX_CHARS_VAR => {
                    config.wikipedia.max_chars = parse_positive(WIKI_MAX_CHARS_VAR, &value)?
                }
                _ => {}
            }
        }

        config.api_key = api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        debug!(?config, "Configuration resolved");
        Ok(config)
    }
}

fn invalid(key: &'static str, value: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: reason.into(),
    }
}

fn parse_value<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| invalid(key, value, e.to_string()))
}

fn parse_positive(key: &'static str, value: &str) -> Result<usize, ConfigError> {
    match parse_value::<usize>(key, value)? {
        0 => Err(invalid(key, value, "must be greater than zero")),
        n => Ok(n),
    }
}

/// Environment entries with a UTF-8 name and value. Others are skipped.
fn utf8_vars<I>(vars: I) -> impl Iterator<Item = (String, String)>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter()
        .filter_map(|(key, value)| match (key.into_string(), value.into_string()) {
            (Ok(key), Ok(value)) => Some((key, value)),
            (key, _) => {
                debug!(key = ?key, "Skipping environment variable that is not UTF-8");
                None
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::from_vars([(API_KEY_VAR, "sk-test")]).unwrap();
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.model, None);
        assert_eq!(config.temperature, 0.1);
        assert_eq!(config.max_tokens, 1024);
        assert_eq!(config.wikipedia, WikipediaConfig::default());
    }

    #[test]
    fn test_missing_api_key() {
        let err = Config::from_vars([(MODEL_VAR, "claude-3-5-haiku-20241022")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));
    }

    #[test]
    fn test_blank_api_key_is_missing() {
        let err = Config::from_vars([(API_KEY_VAR, "   ")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_vars([
            (API_KEY_VAR, "sk-test"),
            (MODEL_VAR, "claude-3-5-haiku-20241022"),
            (TEMPERATURE_VAR, "0.7"),
            (MAX_TOKENS_VAR, "512"),
            (WIKI_LANG_VAR, "de"),
            (WIKI_TOP_K_VAR, "5"),
            (WIKI_MAX_CHARS_VAR, "2000"),
            ("UNRELATED", "ignored"),
        ])
        .unwrap();

        assert_eq!(config.model.as_deref(), Some("claude-3-5-haiku-20241022"));
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.max_tokens, 512);
        assert_eq!(config.wikipedia.language, "de");
        assert_eq!(config.wikipedia.top_k_results, 5);
        assert_eq!(config.wikipedia.max_chars, 2000);
    }

    #[test]
    fn test_invalid_numbers() {
        let err = Config::from_vars([(API_KEY_VAR, "k"), (TEMPERATURE_VAR, "warm")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: TEMPERATURE_VAR, .. }));

        let err = Config::from_vars([(API_KEY_VAR, "k"), (TEMPERATURE_VAR, "1.5")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: TEMPERATURE_VAR, .. }));

        let err = Config::from_vars([(API_KEY_VAR, "k"), (WIKI_TOP_K_VAR, "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: WIKI_TOP_K_VAR, .. }));

        let err = Config::from_vars([(API_KEY_VAR, "k"), (WIKI_LANG_VAR, "en/../x")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: WIKI_LANG_VAR, .. }));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = Config::new("sk-very-secret");
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-very-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_from_env_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# sales agent settings").unwrap();
        writeln!(file, "API_KEY=sk-from-file").unwrap();
        writeln!(file, "PITCH_TEMPERATURE=0.3").unwrap();

        let config = Config::from_env_file(file.path()).unwrap();
        assert_eq!(config.api_key, "sk-from-file");
        assert_eq!(config.temperature, 0.3);
    }

    #[test]
    fn test_from_env_file_without_key() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "OTHER=1").unwrap();

        let err = Config::from_env_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));
    }

    #[test]
    fn test_missing_env_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::from_env_file(&dir.path().join("absent.env")).unwrap_err();
        assert!(matches!(err, ConfigError::EnvFile { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_environment_entries_are_skipped() {
        use std::os::unix::ffi::OsStringExt;

        let vars = vec![
            (OsString::from("API_KEY"), OsString::from("sk-test")),
            (OsString::from("LANG_RAW"), OsString::from_vec(vec![0x66, 0xff, 0x6f])),
            (OsString::from_vec(vec![0xfe]), OsString::from("x")),
            (OsString::from(MAX_TOKENS_VAR), OsString::from("256")),
        ];

        let config = Config::from_vars(utf8_vars(vars)).unwrap();
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.max_tokens, 256);
    }
}
