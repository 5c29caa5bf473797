use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::Validate;

pub const DEFAULT_TICK_INTERVAL_MS: u32 = 150;
pub const FOOD_REWARD: u32 = 10;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSettings {
    pub tick_interval_ms: u32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
        }
    }
}

impl GameSettings {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms as u64)
    }
}

impl Validate for GameSettings {
    fn validate(&self) -> Result<(), String> {
        if self.tick_interval_ms < 50 || self.tick_interval_ms > 5000 {
            return Err("Tick interval must be between 50ms and 5000ms".to_string());
        }
        Ok(())
    }
}
