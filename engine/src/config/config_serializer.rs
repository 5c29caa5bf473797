use serde::{Deserialize, Serialize};

pub trait ConfigSerializer<TConfig> {
    fn serialize(&self, config: &TConfig) -> Result<String, String>;
    fn deserialize(&self, content: &str) -> Result<TConfig, String>;
}

#[derive(Default, Clone, Copy)]
pub struct YamlConfigSerializer;

impl YamlConfigSerializer {
    pub fn new() -> Self {
        Self
    }
}

impl<TConfig> ConfigSerializer<TConfig> for YamlConfigSerializer
where
    TConfig: for<'de> Deserialize<'de> + Serialize,
{
    fn serialize(&self, config: &TConfig) -> Result<String, String> {
        serde_yaml_ng::to_string(config).map_err(|e| format!("Failed to serialize YAML: {}", e))
    }

    fn deserialize(&self, content: &str) -> Result<TConfig, String> {
        serde_yaml_ng::from_str(content).map_err(|e| format!("Failed to parse YAML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn test_string_map_survives_yaml() {
        let serializer = YamlConfigSerializer::new();
        let mut map = BTreeMap::new();
        map.insert("gridSize".to_string(), "large".to_string());
        map.insert("snakeHighScore".to_string(), "120".to_string());

        let text = serializer.serialize(&map).unwrap();
        assert!(text.contains("gridSize: large"));

        let parsed: BTreeMap<String, String> = serializer.deserialize(&text).unwrap();
        assert_eq!(parsed, map);
    }

    #[test]
    fn test_malformed_yaml_is_an_error() {
        let serializer = YamlConfigSerializer::new();
        let result: Result<BTreeMap<String, String>, String> = serializer.deserialize("- [unclosed");
        assert!(result.unwrap_err().starts_with("Failed to parse YAML"));
    }
}
