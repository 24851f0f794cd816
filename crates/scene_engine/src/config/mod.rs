//! Configuration system

pub use serde::{Deserialize, Serialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, Default::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// One named texture to preload into the resource cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextureEntry {
    /// Cache name the scene objects refer to
    pub name: String,

    /// Image file on disk
    pub file: String,
}

/// Viewer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// SQLite database file for scene persistence
    pub database_path: String,

    /// Textures to preload
    pub textures: Vec<TextureEntry>,

    /// Initial camera position
    pub camera_position: [f32; 3],
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            database_path: "kitchen_scene.db".to_string(),
            textures: vec![
                TextureEntry {
                    name: "wood".to_string(),
                    file: "textures/wood.png".to_string(),
                },
                TextureEntry {
                    name: "metal".to_string(),
                    file: "textures/metal.png".to_string(),
                },
            ],
            camera_position: [0.0, 0.0, 5.0],
        }
    }
}

impl Config for ViewerConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_round_trips_through_toml() {
        let config = ViewerConfig::default();
        let rendered = toml::to_string_pretty(&config).unwrap();
        let parsed: ViewerConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.database_path, config.database_path);
        assert_eq!(parsed.textures.len(), 2);
        assert_eq!(parsed.camera_position, [0.0, 0.0, 5.0]);
    }
}
