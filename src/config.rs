use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = ".glossrc.json";

/// How translation keys are extracted from source files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMode {
    /// Shallow textual pattern match over the raw file text.
    Regex,
    /// Full syntax-tree walk via swc.
    Syntax,
}

impl ExtractionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMode::Regex => "regex",
            ExtractionMode::Syntax => "syntax",
        }
    }
}

/// Policy for hardcoded text detection in JSX files.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HardcodedPolicy {
    #[serde(default = "default_hardcoded_enabled")]
    pub enabled: bool,
    /// Minimum trimmed length for a string to count as prose.
    #[serde(default = "default_min_length")]
    pub min_length: usize,
    /// Regular expressions; matching texts are never reported.
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

fn default_hardcoded_enabled() -> bool {
    true
}

fn default_min_length() -> usize {
    3
}

impl Default for HardcodedPolicy {
    fn default() -> Self {
        Self {
            enabled: default_hardcoded_enabled(),
            min_length: default_min_length(),
            exclude_patterns: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Locale codes, in reporting order (e.g., ["en", "nl"]).
    #[serde(default = "default_locales")]
    pub locales: Vec<String>,
    /// The locale whose values are treated as the placeholder reference.
    #[serde(default = "default_locale")]
    pub default_locale: String,
    /// Directory containing one `<locale>.json` per locale.
    #[serde(default = "default_translations_root", alias = "translationsDir")]
    pub translations_root: String,
    /// Root of the source tree to scan.
    #[serde(default = "default_source_root")]
    pub source_root: String,
    /// Include globs applied to relative paths; empty means everything.
    #[serde(default)]
    pub includes: Vec<String>,
    /// Exclude globs applied to relative paths.
    #[serde(default)]
    pub excludes: Vec<String>,
    #[serde(default = "default_extraction_mode")]
    pub extraction_mode: ExtractionMode,
    /// When true, placeholder/plural mismatches are errors instead of warnings.
    #[serde(default)]
    pub strict_placeholders: bool,
    #[serde(default)]
    pub hardcoded: HardcodedPolicy,
    /// How long a writer waits for the translation lock before giving up.
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
}

fn default_locales() -> Vec<String> {
    vec!["en".to_string()]
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_translations_root() -> String {
    "./locales".to_string()
}

fn default_source_root() -> String {
    "./".to_string()
}

fn default_extraction_mode() -> ExtractionMode {
    ExtractionMode::Regex
}

fn default_lock_timeout_ms() -> u64 {
    5_000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locales: default_locales(),
            default_locale: default_locale(),
            translations_root: default_translations_root(),
            source_root: default_source_root(),
            includes: Vec::new(),
            excludes: Vec::new(),
            extraction_mode: default_extraction_mode(),
            strict_placeholders: false,
            hardcoded: HardcodedPolicy::default(),
            lock_timeout_ms: default_lock_timeout_ms(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Configuration errors are fatal: the caller must not start any scan or
    /// write with an invalid configuration.
    pub fn validate(&self) -> Result<()> {
        if self.locales.is_empty() {
            bail!("'locales' must list at least one locale code");
        }
        if !self.locales.contains(&self.default_locale) {
            bail!(
                "'defaultLocale' \"{}\" is not listed in 'locales'",
                self.default_locale
            );
        }

        for pattern in self.includes.iter().chain(&self.excludes) {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in scan config: \"{}\"", pattern))?;
        }

        for pattern in &self.hardcoded.exclude_patterns {
            regex::Regex::new(pattern).with_context(|| {
                format!(
                    "Invalid regex in 'hardcoded.excludePatterns': \"{}\"",
                    pattern
                )
            })?;
        }

        Ok(())
    }

    /// Resolve the translations directory relative to the source root.
    pub fn resolved_translations_dir(&self) -> PathBuf {
        let p = Path::new(&self.translations_root);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            let rel = p.strip_prefix(Path::new(".")).unwrap_or(p);
            let root = Path::new(&self.source_root);
            let root = root.strip_prefix(Path::new(".")).unwrap_or(root);
            if root.as_os_str().is_empty() {
                rel.to_path_buf()
            } else {
                root.join(rel)
            }
        }
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        }),
    }
}

#[cfg(test)]
mod tests {
    use crate::config::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.locales, vec!["en"]);
        assert_eq!(config.default_locale, "en");
        assert_eq!(config.extraction_mode, ExtractionMode::Regex);
        assert!(!config.strict_placeholders);
        assert!(config.hardcoded.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let json = r#"{
              "locales": ["en", "nl"],
              "defaultLocale": "en",
              "translationsRoot": "./messages",
              "extractionMode": "syntax"
          }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.locales, vec!["en", "nl"]);
        assert_eq!(config.translations_root, "./messages");
        assert_eq!(config.extraction_mode, ExtractionMode::Syntax);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let json = r#"{ "locales": ["en", "de"] }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.locales, vec!["en", "de"]);
        assert_eq!(config.default_locale, "en");
        assert_eq!(config.lock_timeout_ms, 5_000);
    }

    #[test]
    fn test_backward_compatibility_translations_dir() {
        let json = r#"{ "translationsDir": "./messages" }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.translations_root, "./messages");
    }

    #[test]
    fn test_validate_empty_locales() {
        let config = Config {
            locales: Vec::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_default_locale_not_listed() {
        let config = Config {
            locales: vec!["nl".to_string()],
            default_locale: "en".to_string(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("defaultLocale"));
    }

    #[test]
    fn test_validate_invalid_glob() {
        let config = Config {
            excludes: vec!["[invalid".to_string()], // unclosed bracket
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_invalid_exclude_regex() {
        let config = Config {
            hardcoded: HardcodedPolicy {
                exclude_patterns: vec!["(unclosed".to_string()],
                ..Default::default()
            },
            ..Default::default()
        };
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("excludePatterns"));
    }

    #[test]
    fn test_find_config_file() {
        let dir = tempdir().unwrap();
        let sub_dir = dir.path().join("src").join("components");
        fs::create_dir_all(&sub_dir).unwrap();

        let config_path = dir.path().join(CONFIG_FILE_NAME);
        File::create(&config_path).unwrap();

        let found = find_config_file(&sub_dir);
        assert!(found.is_some());
        assert_eq!(found.unwrap(), config_path);
    }

    #[test]
    fn test_find_config_stops_at_git_root() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        let found = find_config_file(dir.path());
        assert!(found.is_none());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        fs::write(&config_path, r#"{ "locales": ["en", "fr"] }"#).unwrap();

        let result = load_config(dir.path()).unwrap();
        assert!(result.from_file);
        assert_eq!(result.config.locales, vec!["en", "fr"]);
    }

    #[test]
    fn test_load_config_default_when_not_found() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        let result = load_config(dir.path()).unwrap();
        assert!(!result.from_file);
        assert_eq!(result.config.locales, vec!["en"]);
    }

    #[test]
    fn test_load_config_with_invalid_pattern_fails() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);

        fs::write(&config_path, r#"{ "excludes": ["[invalid"] }"#).unwrap();

        assert!(load_config(dir.path()).is_err());
    }

    #[test]
    fn test_resolved_translations_dir_relative() {
        let config = Config {
            source_root: "/project".to_string(),
            translations_root: "./locales".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.resolved_translations_dir(),
            PathBuf::from("/project/locales")
        );
    }

    #[test]
    fn test_resolved_translations_dir_absolute() {
        let config = Config {
            source_root: "/project".to_string(),
            translations_root: "/data/locales".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.resolved_translations_dir(),
            PathBuf::from("/data/locales")
        );
    }

    #[test]
    fn test_serialization_uses_camel_case() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("defaultLocale"));
        assert!(json.contains("translationsRoot"));
        assert!(json.contains("strictPlaceholders"));
    }
}
