use serde::Deserialize;
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::error::{EventAgentError, Result};

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const DATA_DIR_ENV: &str = "DATA_DIR";
pub const BIND_ENV: &str = "EVENT_AGENT_BIND";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub events_file_name: String,
    pub bind_addr: SocketAddr,
    pub log_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            events_file_name: "all-events.json".to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            log_dir: PathBuf::from("logs"),
        }
    }
}

/// Optional `config.toml` contents; every key may be omitted
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    data: DataSection,
    server: ServerSection,
    logging: LoggingSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct DataSection {
    dir: Option<PathBuf>,
    events_file: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ServerSection {
    bind: Option<SocketAddr>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct LoggingSection {
    dir: Option<PathBuf>,
}

impl Config {
    /// Defaults, then the TOML file (if present), then the environment.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let path = config_path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
        let mut config = Self::default();

        if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                EventAgentError::Config(format!(
                    "Failed to read config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
            config.apply_file(toml::from_str(&content)?);
        } else if config_path.is_some() {
            return Err(EventAgentError::Config(format!(
                "Config file '{}' does not exist",
                path.display()
            )));
        }

        config.apply_env(env::var(DATA_DIR_ENV).ok(), env::var(BIND_ENV).ok())?;
        Ok(config)
    }

    fn apply_file(&mut self, file: FileConfig) {
        if let Some(dir) = file.data.dir {
            self.data_dir = dir;
        }
        if let Some(name) = file.data.events_file {
            self.events_file_name = name;
        }
        if let Some(bind) = file.server.bind {
            self.bind_addr = bind;
        }
        if let Some(dir) = file.logging.dir {
            self.log_dir = dir;
        }
    }

    fn apply_env(&mut self, data_dir: Option<String>, bind: Option<String>) -> Result<()> {
        if let Some(dir) = data_dir.filter(|d| !d.is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(bind) = bind.filter(|b| !b.is_empty()) {
            self.bind_addr = bind.parse().map_err(|e| {
                EventAgentError::Config(format!("Invalid {} '{}': {}", BIND_ENV, bind, e))
            })?;
        }
        Ok(())
    }

    pub fn events_path(&self) -> PathBuf {
        self.data_dir.join(&self.events_file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_events_path() {
        assert_eq!(
            Config::default().events_path(),
            PathBuf::from("data").join("all-events.json")
        );
    }

    #[test]
    fn test_file_values_override_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("agent.toml");
        fs::write(
            &path,
            "[data]\ndir = \"/srv/events\"\nevents_file = \"events.json\"\n\n[server]\nbind = \"0.0.0.0:9000\"\n",
        )
        .unwrap();

        let mut config = Config::default();
        config.apply_file(toml::from_str(&fs::read_to_string(&path).unwrap()).unwrap());

        assert_eq!(config.events_path(), PathBuf::from("/srv/events/events.json"));
        assert_eq!(config.bind_addr, "0.0.0.0:9000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.log_dir, PathBuf::from("logs"));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_env(Some("/tmp/feed".to_string()), Some("127.0.0.1:7000".to_string()))
            .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/feed"));
        assert_eq!(config.bind_addr.port(), 7000);

        let err = config.apply_env(None, Some("not an address".to_string()));
        assert!(matches!(err, Err(EventAgentError::Config(_))));
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.toml");

        assert!(matches!(
            Config::load(Some(missing.as_path())),
            Err(EventAgentError::Config(_))
        ));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[server]\nport = 1\n").unwrap();

        assert!(matches!(Config::load(Some(path.as_path())), Err(EventAgentError::Toml(_))));
    }
}
