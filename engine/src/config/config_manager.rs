use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use super::{
    ConfigContentProvider, ConfigSerializer, FileContentConfigProvider, Validate,
    YamlConfigSerializer,
};

/// Loads a validated config once and caches it; writes go through validation
/// before they reach storage.
pub struct ConfigManager<TConfigContentProvider, TConfig, TConfigSerializer = YamlConfigSerializer>
where
    TConfigContentProvider: ConfigContentProvider,
    TConfig: Clone + for<'de> Deserialize<'de> + Serialize + Validate + Default,
    TConfigSerializer: ConfigSerializer<TConfig>,
{
    config_serializer: TConfigSerializer,
    config_content_provider: TConfigContentProvider,
    config: Arc<Mutex<Option<TConfig>>>,
}

impl<TConfig> ConfigManager<FileContentConfigProvider, TConfig, YamlConfigSerializer>
where
    TConfig: Clone + for<'de> Deserialize<'de> + Serialize + Validate + Default,
{
    pub fn from_yaml_file(file_path: impl Into<PathBuf>) -> Self {
        Self::new(
            FileContentConfigProvider::new(file_path),
            YamlConfigSerializer::new(),
        )
    }
}

impl<TConfigContentProvider, TConfig, TConfigSerializer>
    ConfigManager<TConfigContentProvider, TConfig, TConfigSerializer>
where
    TConfigContentProvider: ConfigContentProvider,
    TConfig: Clone + for<'de> Deserialize<'de> + Serialize + Validate + Default,
    TConfigSerializer: ConfigSerializer<TConfig>,
{
    pub fn new(
        config_content_provider: TConfigContentProvider,
        config_serializer: TConfigSerializer,
    ) -> Self {
        Self {
            config: Arc::new(Mutex::new(None)),
            config_content_provider,
            config_serializer,
        }
    }

    /// Returns the stored config, or `TConfig::default()` when nothing is stored.
    pub fn get_config(&self) -> Result<TConfig, String> {
        let mut current = self
            .config
            .lock()
            .map_err(|_| "Config cache lock poisoned".to_string())?;

        if let Some(config) = current.as_ref() {
            return Ok(config.clone());
        }

        let Some(config_data) = self.config_content_provider.get_config_content()? else {
            return Ok(TConfig::default());
        };

        let config = self.config_serializer.deserialize(&config_data)?;
        config
            .validate()
            .map_err(|e| format!("Config validation error: {}", e))?;

        *current = Some(config.clone());
        Ok(config)
    }

    /// Like [`get_config`](Self::get_config), but writes the defaults out
    /// when nothing is stored yet, leaving a file to edit.
    pub fn get_or_create_config(&self) -> Result<TConfig, String> {
        if self.config_content_provider.get_config_content()?.is_some() {
            return self.get_config();
        }
        let config = TConfig::default();
        self.set_config(&config)?;
        Ok(config)
    }

    pub fn set_config(&self, config: &TConfig) -> Result<(), String> {
        config
            .validate()
            .map_err(|e| format!("Config validation error: {}", e))?;

        let serialized_config = self.config_serializer.serialize(config)?;
        self.config_content_provider
            .set_config_content(&serialized_config)?;

        let mut current = self
            .config
            .lock()
            .map_err(|_| "Config cache lock poisoned".to_string())?;
        *current = Some(config.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryContentProvider;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Sample {
        rounds: u32,
    }

    impl Default for Sample {
        fn default() -> Self {
            Self { rounds: 1 }
        }
    }

    impl Validate for Sample {
        fn validate(&self) -> Result<(), String> {
            if self.rounds == 0 {
                return Err("rounds must be positive".to_string());
            }
            Ok(())
        }
    }

    fn manager(provider: MemoryContentProvider) -> ConfigManager<MemoryContentProvider, Sample> {
        ConfigManager::new(provider, YamlConfigSerializer::new())
    }

    #[test]
    fn test_empty_storage_yields_default() {
        let manager = manager(MemoryContentProvider::new());
        assert_eq!(manager.get_config().unwrap(), Sample::default());
    }

    #[test]
    fn test_set_then_get_from_fresh_manager() {
        let provider = MemoryContentProvider::new();
        manager(provider.clone())
            .set_config(&Sample { rounds: 7 })
            .unwrap();
        assert_eq!(manager(provider).get_config().unwrap(), Sample { rounds: 7 });
    }

    #[test]
    fn test_get_or_create_writes_defaults_once() {
        let provider = MemoryContentProvider::new();
        let created = manager(provider.clone()).get_or_create_config().unwrap();
        assert_eq!(created, Sample::default());
        assert_eq!(provider.get_config_content().unwrap().as_deref(), Some("rounds: 1\n"));

        provider.set_config_content("rounds: 4\n").unwrap();
        assert_eq!(manager(provider).get_or_create_config().unwrap(), Sample { rounds: 4 });
    }

    #[test]
    fn test_invalid_config_is_not_written() {
        let provider = MemoryContentProvider::new();
        let result = manager(provider.clone()).set_config(&Sample { rounds: 0 });
        assert!(result.unwrap_err().contains("rounds must be positive"));
        assert_eq!(provider.get_config_content().unwrap(), None);
    }

    #[test]
    fn test_invalid_stored_config_is_rejected() {
        let provider = MemoryContentProvider::new();
        provider.set_config_content("rounds: 0\n").unwrap();
        assert!(manager(provider).get_config().is_err());
    }
}
