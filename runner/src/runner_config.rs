use serde::{Deserialize, Serialize};

use snake_engine::config::{ConfigManager, FileContentConfigProvider, Validate, YamlConfigSerializer};
use snake_engine::snake::{GameSettings, GridSize};

use crate::bot_controller::BotKind;

const CONFIG_FILE_NAME: &str = "snake_runner_config.yaml";

pub fn default_config_path() -> String {
    if let Ok(exe_path) = std::env::current_exe()
        && let Some(exe_dir) = exe_path.parent()
    {
        return exe_dir.join(CONFIG_FILE_NAME).to_string_lossy().into_owned();
    }
    CONFIG_FILE_NAME.to_string()
}

pub fn get_config_manager(
    path: &str,
) -> ConfigManager<FileContentConfigProvider, RunnerConfig, YamlConfigSerializer> {
    ConfigManager::from_yaml_file(path)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub grid_size: GridSize,
    pub two_player: bool,
    pub tick_interval_ms: u32,
    pub games: u32,
    pub max_ticks_per_game: u64,
    pub bot: BotKind,
    pub preferences_file: String,
    pub seed: Option<u64>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            grid_size: GridSize::Medium,
            two_player: false,
            tick_interval_ms: GameSettings::default().tick_interval_ms,
            games: 3,
            max_ticks_per_game: 5000,
            bot: BotKind::Efficient,
            preferences_file: "snake_preferences.yaml".to_string(),
            seed: None,
        }
    }
}

impl RunnerConfig {
    pub fn game_settings(&self) -> GameSettings {
        GameSettings {
            tick_interval_ms: self.tick_interval_ms,
        }
    }
}

impl Validate for RunnerConfig {
    fn validate(&self) -> Result<(), String> {
        self.game_settings().validate()?;
        if !(1..=1000).contains(&self.games) {
            return Err("Games must be between 1 and 1000".to_string());
        }
        if self.max_ticks_per_game == 0 {
            return Err("Max ticks per game must be positive".to_string());
        }
        if self.preferences_file.trim().is_empty() {
            return Err("Preferences file must not be empty".to_string());
        }
        Ok(())
    }
}
