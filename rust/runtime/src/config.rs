use std::time::Duration;

use felt_ai::Profile;
use felt_engine::game::{MAX_SEATS, MAX_TABLE_CHIPS, MIN_SEATS};
use felt_engine::rules::TableRules;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Table and timer settings for one [`crate::runtime::TableRuntime`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RuntimeConfig {
    pub seat_count: usize,
    pub starting_stack: u32,
    pub small_blind: u32,
    pub big_blind: u32,
    /// Fixed seed for a replayable table; `None` draws from OS entropy.
    pub seed: Option<u64>,
    pub cpu_seats: Vec<usize>,
    pub cpu_profile: Profile,
    /// Pause before a CPU seat acts.
    pub cpu_action_delay_ms: u64,
    /// How long after the CPU timer the watchdog forces the move.
    pub watchdog_grace_ms: u64,
    /// Human turn limit; `None` waits forever.
    pub player_action_timeout_ms: Option<u64>,
    pub auto_deal_delay_ms: u64,
    /// Stop auto-dealing once this many hands have been played.
    pub hand_limit: Option<u64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            seat_count: 6,
            starting_stack: 10_000,
            small_blind: 50,
            big_blind: 100,
            seed: None,
            cpu_seats: (1..6).collect(),
            cpu_profile: Profile::Tight,
            cpu_action_delay_ms: 800,
            watchdog_grace_ms: 1_500,
            player_action_timeout_ms: Some(30_000),
            auto_deal_delay_ms: 2_500,
            hand_limit: None,
        }
    }
}

impl RuntimeConfig {
    /// Every seat played by the CPU, no waiting anywhere. Used for simulations.
    pub fn all_cpu(seat_count: usize) -> Self {
        Self {
            seat_count,
            cpu_seats: (0..seat_count).collect(),
            cpu_action_delay_ms: 0,
            watchdog_grace_ms: 1,
            player_action_timeout_ms: None,
            auto_deal_delay_ms: 0,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_SEATS..=MAX_SEATS).contains(&self.seat_count) {
            return Err(ConfigError::InvalidValue(format!(
                "seat_count must be between {} and {}",
                MIN_SEATS, MAX_SEATS
            )));
        }
        if self.big_blind == 0 {
            return Err(ConfigError::InvalidValue(
                "big_blind must be greater than 0".to_string(),
            ));
        }
        if self.small_blind == 0 || self.small_blind > self.big_blind {
            return Err(ConfigError::InvalidValue(
                "small_blind must be between 1 and big_blind".to_string(),
            ));
        }
        if self.starting_stack == 0 {
            return Err(ConfigError::InvalidValue(
                "starting_stack must be greater than 0".to_string(),
            ));
        }
        let chips = self.seat_count as u64 * self.starting_stack as u64;
        if chips > MAX_TABLE_CHIPS {
            return Err(ConfigError::InvalidValue(format!(
                "seat_count * starting_stack is {}, more than {}",
                chips, MAX_TABLE_CHIPS
            )));
        }
        if let Some(seat) = self.cpu_seats.iter().find(|&&s| s >= self.seat_count) {
            return Err(ConfigError::InvalidValue(format!(
                "cpu seat {} is outside a {}-seat table",
                seat, self.seat_count
            )));
        }
        // the watchdog has to trail the timer it guards
        if self.watchdog_grace_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "watchdog_grace_ms must be greater than 0".to_string(),
            ));
        }
        if self.player_action_timeout_ms == Some(0) {
            return Err(ConfigError::InvalidValue(
                "player_action_timeout_ms must be greater than 0".to_string(),
            ));
        }
        if self.hand_limit == Some(0) {
            return Err(ConfigError::InvalidValue(
                "hand_limit must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn rules(&self) -> TableRules {
        TableRules {
            small_blind: self.small_blind,
            big_blind: self.big_blind,
        }
    }

    pub fn cpu_delay(&self) -> Duration {
        Duration::from_millis(self.cpu_action_delay_ms)
    }

    /// Delay from arming to the watchdog firing.
    pub fn watchdog_delay(&self) -> Duration {
        Duration::from_millis(self.cpu_action_delay_ms + self.watchdog_grace_ms)
    }

    pub fn player_timeout(&self) -> Option<Duration> {
        self.player_action_timeout_ms.map(Duration::from_millis)
    }

    pub fn auto_deal_delay(&self) -> Duration {
        Duration::from_millis(self.auto_deal_delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(RuntimeConfig::default().validate().is_ok());
        assert!(RuntimeConfig::all_cpu(9).validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_seats() {
        let config = RuntimeConfig {
            seat_count: 11,
            ..RuntimeConfig::default()
        };
        assert!(config.validate().is_err());

        let config = RuntimeConfig {
            seat_count: 3,
            cpu_seats: vec![1, 3],
            ..RuntimeConfig::default()
        };
        match config.validate() {
            Err(ConfigError::InvalidValue(msg)) => assert!(msg.contains("cpu seat 3")),
            other => panic!("expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn rejects_bad_blinds_and_timers() {
        let bad = [
            RuntimeConfig {
                big_blind: 0,
                ..RuntimeConfig::default()
            },
            RuntimeConfig {
                small_blind: 200,
                ..RuntimeConfig::default()
            },
            RuntimeConfig {
                watchdog_grace_ms: 0,
                ..RuntimeConfig::default()
            },
            RuntimeConfig {
                player_action_timeout_ms: Some(0),
                ..RuntimeConfig::default()
            },
        ];
        for config in bad {
            assert!(config.validate().is_err(), "{:?}", config);
        }
    }

    #[test]
    fn rejects_more_chips_than_a_pot_can_hold() {
        let config = RuntimeConfig {
            seat_count: 5,
            starting_stack: 1_000_000_000,
            ..RuntimeConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("5000000000"), "{}", err);

        let config = RuntimeConfig {
            seat_count: 4,
            starting_stack: u32::MAX / 4,
            ..RuntimeConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: RuntimeConfig =
            serde_json::from_str(r#"{"seat_count": 4, "cpu_profile": "loose"}"#).unwrap();
        assert_eq!(config.seat_count, 4);
        assert_eq!(config.cpu_profile, Profile::Loose);
        assert_eq!(config.big_blind, RuntimeConfig::default().big_blind);
    }

    #[test]
    fn watchdog_trails_the_cpu_timer() {
        let config = RuntimeConfig::default();
        assert!(config.watchdog_delay() > config.cpu_delay());
    }
}
