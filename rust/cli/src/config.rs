//! Layered configuration: defaults, then the TOML file named by
//! `FELT_CONFIG`, then `FELT_*` environment variables. Command-line flags are
//! applied on top by each command.

use felt_ai::Profile;
use felt_engine::game::{MAX_SEATS, MAX_TABLE_CHIPS, MIN_SEATS};
use felt_runtime::RuntimeConfig;
use serde::{Deserialize, Serialize};
use std::fs;

pub const CONFIG_ENV: &str = "FELT_CONFIG";
pub const SEED_ENV: &str = "FELT_SEED";
pub const SEATS_ENV: &str = "FELT_SEATS";
pub const STACK_ENV: &str = "FELT_STACK";
pub const PROFILE_ENV: &str = "FELT_PROFILE";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub seats: usize,
    pub starting_stack: u32,
    pub small_blind: u32,
    pub big_blind: u32,
    pub seed: Option<u64>,
    pub profile: Profile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub seats: ValueSource,
    pub starting_stack: ValueSource,
    pub small_blind: ValueSource,
    pub big_blind: ValueSource,
    pub seed: ValueSource,
    pub profile: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            seats: ValueSource::Default,
            starting_stack: ValueSource::Default,
            small_blind: ValueSource::Default,
            big_blind: ValueSource::Default,
            seed: ValueSource::Default,
            profile: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seats: 6,
            starting_stack: 10_000,
            small_blind: 50,
            big_blind: 100,
            seed: None,
            profile: Profile::Tight,
        }
    }
}

impl Config {
    /// All-CPU runtime settings for this table.
    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            starting_stack: self.starting_stack,
            small_blind: self.small_blind,
            big_blind: self.big_blind,
            seed: self.seed,
            cpu_profile: self.profile,
            ..RuntimeConfig::all_cpu(self.seats)
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config file: {}", e),
            ConfigError::Invalid(msg) => f.write_str(msg),
        }
    }
}

pub fn load() -> Result<Config, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var(CONFIG_ENV)
        && !path.is_empty()
    {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.seats {
            cfg.seats = v;
            sources.seats = ValueSource::File;
        }
        if let Some(v) = f.starting_stack {
            cfg.starting_stack = v;
            sources.starting_stack = ValueSource::File;
        }
        if let Some(v) = f.small_blind {
            cfg.small_blind = v;
            sources.small_blind = ValueSource::File;
        }
        if let Some(v) = f.big_blind {
            cfg.big_blind = v;
            sources.big_blind = ValueSource::File;
        }
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.profile {
            cfg.profile = v;
            sources.profile = ValueSource::File;
        }
    }

    if let Some(seed) = env_value(SEED_ENV) {
        cfg.seed = Some(
            seed.parse()
                .map_err(|_| ConfigError::Invalid(format!("Invalid {}: {}", SEED_ENV, seed)))?,
        );
        sources.seed = ValueSource::Env;
    }
    if let Some(seats) = env_value(SEATS_ENV) {
        cfg.seats = seats
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("Invalid {}: {}", SEATS_ENV, seats)))?;
        sources.seats = ValueSource::Env;
    }
    if let Some(stack) = env_value(STACK_ENV) {
        cfg.starting_stack = stack
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("Invalid {}: {}", STACK_ENV, stack)))?;
        sources.starting_stack = ValueSource::Env;
    }
    if let Some(profile) = env_value(PROFILE_ENV) {
        cfg.profile = profile.parse().map_err(ConfigError::Invalid)?;
        sources.profile = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    seats: Option<usize>,
    #[serde(default)]
    starting_stack: Option<u32>,
    #[serde(default)]
    small_blind: Option<u32>,
    #[serde(default)]
    big_blind: Option<u32>,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    profile: Option<Profile>,
}

pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if !(MIN_SEATS..=MAX_SEATS).contains(&cfg.seats) {
        return Err(ConfigError::Invalid(format!(
            "Invalid configuration: seats must be between {} and {}",
            MIN_SEATS, MAX_SEATS
        )));
    }
    if cfg.starting_stack == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: starting_stack must be >0".into(),
        ));
    }
    if cfg.seats as u64 * cfg.starting_stack as u64 > MAX_TABLE_CHIPS {
        return Err(ConfigError::Invalid(format!(
            "Invalid configuration: seats * starting_stack must not exceed {}",
            MAX_TABLE_CHIPS
        )));
    }
    if cfg.big_blind == 0 || cfg.small_blind == 0 || cfg.small_blind > cfg.big_blind {
        return Err(ConfigError::Invalid(
            "Invalid configuration: blinds must satisfy 0 < small_blind <= big_blind".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn rejects_invalid_tables() {
        let bad = [
            Config {
                seats: 1,
                ..Config::default()
            },
            Config {
                seats: 11,
                ..Config::default()
            },
            Config {
                starting_stack: 0,
                ..Config::default()
            },
            Config {
                small_blind: 150,
                ..Config::default()
            },
            Config {
                seats: 5,
                starting_stack: 1_000_000_000,
                ..Config::default()
            },
        ];
        for cfg in bad {
            assert!(validate(&cfg).is_err(), "{:?}", cfg);
        }
    }

    #[test]
    fn runtime_config_is_all_cpu_and_valid() {
        let cfg = Config {
            seats: 3,
            seed: Some(8),
            profile: Profile::Loose,
            ..Config::default()
        };
        let rc = cfg.runtime_config();
        assert_eq!(rc.cpu_seats, vec![0, 1, 2]);
        assert_eq!(rc.seed, Some(8));
        assert_eq!(rc.cpu_profile, Profile::Loose);
        assert!(rc.validate().is_ok());
    }

    #[test]
    fn file_config_rejects_unknown_keys() {
        assert!(toml::from_str::<FileConfig>("seats = 4\nlevel = 2\n").is_err());
        let f: FileConfig = toml::from_str("seats = 4\nprofile = \"loose\"\n").unwrap();
        assert_eq!(f.seats, Some(4));
        assert_eq!(f.profile, Some(Profile::Loose));
    }
}
