// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Driver configuration: defaults, then a TOML file, then command-line flags.

use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};

use clap::ValueEnum;
use log::LevelFilter;
use toml_edit::{DocumentMut, Item, TomlError};

/// Environment variable naming a config file when `--config` is absent.
pub const CONFIG_ENV: &str = "TESTCHAMBER_CONFIG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Color when stdout is a terminal and `NO_COLOR` is unset
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "auto" => Some(Self::Auto),
            "always" => Some(Self::Always),
            "never" => Some(Self::Never),
            _ => None,
        }
    }

    pub fn enabled(self, is_terminal: bool, no_color: bool) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => is_terminal && !no_color,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub color: ColorChoice,
    pub log_level: LevelFilter,
    /// Also run the chambers that fail on purpose
    pub with_failures: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            color: ColorChoice::Auto,
            log_level: LevelFilter::Warn,
            with_failures: false,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: io::Error },
    Parse { path: PathBuf, source: TomlError },
    Invalid { key: String, reason: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read {}: {source}", path.display()),
            Self::Parse { path, source } => write!(f, "cannot parse {}: {source}", path.display()),
            Self::Invalid { key, reason } => write!(f, "invalid `{key}`: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Invalid { .. } => None,
        }
    }
}

fn invalid(key: &str, reason: &'static str) -> ConfigError {
    ConfigError::Invalid {
        key: key.into(),
        reason,
    }
}

fn expect_str<'a>(key: &str, item: &'a Item) -> Result<&'a str, ConfigError> {
    item.as_str().ok_or_else(|| invalid(key, "expected a string"))
}

impl Config {
    /// Overlay the keys of a parsed config document.
    pub fn merge(&mut self, doc: &DocumentMut) -> Result<(), ConfigError> {
        for (key, item) in doc.iter() {
            match key {
                "color" => {
                    self.color = ColorChoice::parse(expect_str(key, item)?)
                        .ok_or_else(|| invalid(key, "expected auto, always or never"))?;
                }
                "log_level" => {
                    self.log_level = expect_str(key, item)?
                        .parse()
                        .map_err(|_| invalid(key, "expected off, error, warn, info, debug or trace"))?;
                }
                "with_failures" => {
                    self.with_failures = item
                        .as_bool()
                        .ok_or_else(|| invalid(key, "expected a boolean"))?;
                }
                _ => return Err(invalid(key, "unknown key")),
            }
        }
        Ok(())
    }

    pub fn merge_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        debug!("loading config from {}", path.display());
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        let doc = text
            .parse::<DocumentMut>()
            .map_err(|source| ConfigError::Parse {
                path: path.to_owned(),
                source,
            })?;
        self.merge(&doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Config, ConfigError> {
        let mut config = Config::default();
        config.merge(&text.parse::<DocumentMut>().unwrap())?;
        Ok(config)
    }

    #[test]
    fn test_defaults_survive_empty_file() {
        assert_eq!(parse("").unwrap(), Config::default());
    }

    #[test]
    fn test_all_keys() {
        let config = parse(
            r#"
            color = "never"
            log_level = "debug"
            with_failures = true
            "#,
        )
        .unwrap();
        assert_eq!(config.color, ColorChoice::Never);
        assert_eq!(config.log_level, LevelFilter::Debug);
        assert!(config.with_failures);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = parse(r#"color = "sometimes""#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "color"));

        let err = parse("with_failures = 1").unwrap_err();
        assert_eq!(err.to_string(), "invalid `with_failures`: expected a boolean");

        let err = parse("log_level = \"chatty\"").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));

        let err = parse("colour = \"always\"").unwrap_err();
        assert_eq!(err.to_string(), "invalid `colour`: unknown key");
    }

    #[test]
    fn test_missing_file() {
        let mut config = Config::default();
        let err = config
            .merge_file(Path::new("/nonexistent/testchamber.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_auto_color() {
        assert!(ColorChoice::Auto.enabled(true, false));
        assert!(!ColorChoice::Auto.enabled(true, true));
        assert!(!ColorChoice::Auto.enabled(false, false));
        assert!(ColorChoice::Always.enabled(false, true));
        assert!(!ColorChoice::Never.enabled(true, false));
    }
}
