// Configuration parsing for sample-packages
// SPDX-License-Identifier: GPL-3.0-or-later

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::defaults;
use crate::package::{Package, RamSize};
use crate::{debug, info, warn};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Missing key: {0}")]
    MissingKey(String),
    #[error("Parse error for {0}: {1}")]
    ParseError(String, String),
    #[error("Invalid value for {0}: {1}")]
    Invalid(String, String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Every key a config file may set
pub const KNOWN_KEYS: &[&str] = &[
    "scale_factors",
    "cpu_cap_floor",
    "name_prefix",
    "version",
    "group",
    "top_cpu_cap",
    "top_max_lwps",
    "top_max_physical_memory",
    "top_max_swap",
    "top_quota",
    "top_zfs_io_priority",
];

/// Raw key=value configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    values: HashMap<String, String>,
}

impl Config {
    /// Load configuration from `path`, or an empty config when none is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            debug!("No config file, using built-in defaults");
            return Ok(Self::default());
        };

        info!("Load: {}", path.display());
        let content = fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    /// Parse `key=value` lines. Comments and lines without '=' are skipped,
    /// later keys override earlier ones.
    pub fn parse(content: &str) -> Self {
        let mut values = HashMap::new();

        for line in content.lines() {
            let line = line.trim();

            if line.starts_with('#') || !line.contains('=') {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                if !KNOWN_KEYS.contains(&key) {
                    warn!("Unknown config key ignored: {}", key);
                    continue;
                }
                values.insert(key.to_string(), value.trim().to_string());
            }
        }

        Self { values }
    }

    /// Check if a key has been explicitly set (vs default)
    pub fn has_explicit(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Get a string value
    pub fn get(&self, key: &str) -> Result<&str> {
        self.values
            .get(key)
            .map(|s| s.as_str())
            .ok_or_else(|| ConfigError::MissingKey(key.to_string()))
    }

    /// Get value as specific type
    pub fn get_as<T: std::str::FromStr>(&self, key: &str) -> Result<T>
    where
        T::Err: std::fmt::Display,
    {
        let value = self.get(key)?;
        value
            .parse()
            .map_err(|e: T::Err| ConfigError::ParseError(key.to_string(), e.to_string()))
    }

    /// Get value as specific type, or `default` when the key is not set
    pub fn get_or<T: std::str::FromStr>(&self, key: &str, default: T) -> Result<T>
    where
        T::Err: std::fmt::Display,
    {
        if self.has_explicit(key) {
            self.get_as(key)
        } else {
            Ok(default)
        }
    }

    /// Get optional value
    pub fn get_opt(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    /// Get a comma separated list of RAM sizes
    pub fn get_sizes(&self, key: &str) -> Result<Vec<RamSize>> {
        self.get(key)?
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<RamSize>().map_err(|e| {
                    ConfigError::ParseError(key.to_string(), format!("{:?}: {}", s, e))
                })
            })
            .collect()
    }
}

/// Effective inputs for one generation run
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub top: Package,
    pub scale_factors: Vec<RamSize>,
    pub cpu_cap_floor: u32,
    pub name_prefix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            top: Package::top(),
            scale_factors: defaults::SCALE_FACTORS_GB
                .iter()
                .copied()
                .map(RamSize::from)
                .collect(),
            cpu_cap_floor: defaults::CPU_CAP_FLOOR,
            name_prefix: defaults::NAME_PREFIX.to_string(),
        }
    }
}

impl Settings {
    /// Overlay explicit config values on the built-in defaults
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut settings = Self::default();
        let top = &mut settings.top;

        top.cpu_cap = config.get_or("top_cpu_cap", top.cpu_cap)?;
        top.max_lwps = config.get_or("top_max_lwps", top.max_lwps)?;
        top.max_physical_memory =
            config.get_or("top_max_physical_memory", top.max_physical_memory)?;
        top.max_swap = config.get_or("top_max_swap", top.max_swap)?;
        top.quota = config.get_or("top_quota", top.quota)?;
        top.zfs_io_priority = config.get_or("top_zfs_io_priority", top.zfs_io_priority)?;
        if let Some(version) = config.get_opt("version") {
            top.version = version.to_string();
        }
        if let Some(group) = config.get_opt("group") {
            top.group = group.to_string();
        }

        if config.has_explicit("scale_factors") {
            settings.scale_factors = config.get_sizes("scale_factors")?;
        }
        settings.cpu_cap_floor = config.get_or("cpu_cap_floor", settings.cpu_cap_floor)?;
        if let Some(prefix) = config.get_opt("name_prefix") {
            settings.name_prefix = prefix.to_string();
        }

        settings.check()?;
        Ok(settings)
    }

    fn check(&self) -> Result<()> {
        if self.cpu_cap_floor == 0 {
            return Err(ConfigError::Invalid(
                "cpu_cap_floor".to_string(),
                "must be positive".to_string(),
            ));
        }
        if self.top.max_physical_memory == 0 {
            return Err(ConfigError::Invalid(
                "top_max_physical_memory".to_string(),
                "must be positive".to_string(),
            ));
        }
        if self.name_prefix.is_empty() {
            return Err(ConfigError::Invalid(
                "name_prefix".to_string(),
                "must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Effective key-value pairs, in `KNOWN_KEYS` order
    pub fn config_pairs(&self) -> Vec<(&'static str, String)> {
        let sizes: Vec<String> = self.scale_factors.iter().map(|s| s.to_string()).collect();
        vec![
            ("scale_factors", sizes.join(",")),
            ("cpu_cap_floor", self.cpu_cap_floor.to_string()),
            ("name_prefix", self.name_prefix.clone()),
            ("version", self.top.version.clone()),
            ("group", self.top.group.clone()),
            ("top_cpu_cap", self.top.cpu_cap.to_string()),
            ("top_max_lwps", self.top.max_lwps.to_string()),
            ("top_max_physical_memory", self.top.max_physical_memory.to_string()),
            ("top_max_swap", self.top.max_swap.to_string()),
            ("top_quota", self.top.quota.to_string()),
            ("top_zfs_io_priority", self.top.zfs_io_priority.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_simple_config() {
        let config = Config::parse(
            "# comment\n\
             cpu_cap_floor = 10\n\
             not a pair\n\
             bogus_key=1\n\
             name_prefix=demo\n\
             name_prefix=late\n",
        );
        assert_eq!(config.get_as::<u32>("cpu_cap_floor").unwrap(), 10);
        assert_eq!(config.get("name_prefix").unwrap(), "late");
        assert!(!config.has_explicit("bogus_key"));
        assert!(matches!(
            config.get("group"),
            Err(ConfigError::MissingKey(_))
        ));
    }

    #[test]
    fn test_defaults_without_file() {
        let config = Config::load(None).unwrap();
        assert_eq!(Settings::from_config(&config).unwrap(), Settings::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "scale_factors=0.5, 2, 8").unwrap();
        writeln!(file, "top_cpu_cap=400").unwrap();
        writeln!(file, "group=Demo").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        let settings = Settings::from_config(&config).unwrap();
        assert_eq!(
            settings.scale_factors,
            vec![RamSize::new(0.5), RamSize::new(2.0), RamSize::new(8.0)]
        );
        assert_eq!(settings.top.cpu_cap, 400);
        assert_eq!(settings.top.group, "Demo");
        assert_eq!(settings.top.max_physical_memory, defaults::TOP_MAX_PHYSICAL_MEMORY);
        assert_eq!(settings.cpu_cap_floor, defaults::CPU_CAP_FLOOR);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(dir.path().join("absent.conf").as_path())).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_parse_errors_name_the_key() {
        let config = Config::parse("top_quota=big\n");
        match Settings::from_config(&config) {
            Err(ConfigError::ParseError(key, _)) => assert_eq!(key, "top_quota"),
            other => panic!("unexpected {:?}", other),
        }

        let config = Config::parse("scale_factors=1,two\n");
        match Settings::from_config(&config) {
            Err(ConfigError::ParseError(key, msg)) => {
                assert_eq!(key, "scale_factors");
                assert!(msg.contains("two"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_zero_floor_rejected() {
        let config = Config::parse("cpu_cap_floor=0\n");
        assert!(matches!(
            Settings::from_config(&config),
            Err(ConfigError::Invalid(..))
        ));
    }

    #[test]
    fn test_config_pairs() {
        let pairs = Settings::default().config_pairs();
        assert_eq!(pairs.len(), KNOWN_KEYS.len());
        for ((key, _), known) in pairs.iter().zip(KNOWN_KEYS) {
            assert_eq!(key, known);
        }
        assert_eq!(pairs[0].1, "0.25,0.5,1.0,4.0,8.0,16.0");
        assert_eq!(pairs[1].1, "20");
    }
}
