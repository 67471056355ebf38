use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context};
use serde::Deserialize;

use super::paths::AppPaths;

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama3-8b-8192";

/// Application configuration, merged from an optional `config.yml` and
/// environment variable overrides. The API credential is env-first so it
/// never has to live in the config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub groq: GroqConfig,
    pub server: ServerConfig,
    pub history: HistoryConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GroqConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f64,
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Per-session transcript cap. 0 keeps every turn for the process
    /// lifetime; a positive value retains only the newest N turns.
    pub max_turns: usize,
}

impl AppConfig {
    pub fn load(paths: &AppPaths) -> anyhow::Result<Self> {
        let mut config = match config_path(paths) {
            Some(path) => {
                let contents = fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                serde_yaml::from_str(&contents)
                    .with_context(|| format!("Failed to parse {}", path.display()))?
            }
            None => AppConfig::default(),
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(key) = env::var("GROQ_API_KEY") {
            if !key.trim().is_empty() {
                self.groq.api_key = Some(key);
            }
        }
        if let Ok(model) = env::var("GROQ_MODEL") {
            self.groq.model = model;
        }
        if let Ok(url) = env::var("GROQ_BASE_URL") {
            self.groq.base_url = url;
        }
        if let Ok(host) = env::var("RAGCHAT_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("RAGCHAT_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Ok(max) = env::var("RAGCHAT_MAX_TURNS") {
            if let Ok(max) = max.parse() {
                self.history.max_turns = max;
            }
        }
    }

    fn validate(&self) -> anyhow::Result<()> {
        if !(0.0..=2.0).contains(&self.groq.temperature) {
            bail!(
                "groq.temperature must be between 0.0 and 2.0, got {}",
                self.groq.temperature
            );
        }
        if self.groq.base_url.trim().is_empty() {
            bail!("groq.base_url must not be empty");
        }
        if self.groq.model.trim().is_empty() {
            bail!("groq.model must not be empty");
        }
        Ok(())
    }
}

fn config_path(paths: &AppPaths) -> Option<PathBuf> {
    if let Ok(path) = env::var("RAGCHAT_CONFIG_PATH") {
        return Some(PathBuf::from(path));
    }

    let user_config = paths.user_data_dir.join("config.yml");
    if user_config.exists() {
        return Some(user_config);
    }

    let project_config = paths.project_root.join("config.yml");
    if project_config.exists() {
        return Some(project_config);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_groq_chat_setup() {
        let config = AppConfig::default();
        assert_eq!(config.groq.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.groq.model, DEFAULT_MODEL);
        assert!((config.groq.temperature - 0.7).abs() < f64::EPSILON);
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.history.max_turns, 0);
        assert!(config.groq.api_key.is_none());
    }

    #[test]
    fn partial_yaml_fills_in_defaults() {
        let yaml = "groq:\n  model: mixtral-8x7b-32768\nserver:\n  port: 8080\n";
        let config: AppConfig = serde_yaml::from_str(yaml).expect("yaml should parse");
        assert_eq!(config.groq.model, "mixtral-8x7b-32768");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.groq.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn load_reads_config_from_the_data_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(
            dir.path().join("config.yml"),
            "history:\n  max_turns: 40\n",
        )
        .expect("write config");

        let paths = AppPaths {
            project_root: dir.path().to_path_buf(),
            user_data_dir: dir.path().to_path_buf(),
            log_dir: dir.path().join("logs"),
        };

        let config = AppConfig::load(&paths).expect("load should succeed");
        assert_eq!(config.history.max_turns, 40);
    }

    #[test]
    fn out_of_range_temperature_is_rejected() {
        let config = AppConfig {
            groq: GroqConfig {
                temperature: 3.5,
                ..GroqConfig::default()
            },
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
