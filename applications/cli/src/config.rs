/// CLI configuration
use crate::error::{CliError, Result};
use leakify_playback::PlaybackConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "leakify.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CliConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default)]
    pub auth: AuthSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_playback")]
    pub playback: PlaybackSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_url")]
    pub url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthSettings {
    pub user: Option<String>,
    pub pass: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackSettings {
    #[serde(default = "default_volume")]
    pub default_volume: u8,

    #[serde(default = "default_fade_secs")]
    pub fade_secs: u64,

    #[serde(default = "default_history_size")]
    pub history_size: usize,

    /// Used to estimate track length from the stream size
    #[serde(default = "default_bitrate")]
    pub assumed_bitrate_kbps: u32,

    #[serde(default)]
    pub shuffle: bool,

    #[serde(default)]
    pub repeat: bool,
}

impl CliConfig {
    /// Load configuration from file and environment.
    ///
    /// An explicit `path` must exist; otherwise `leakify.toml` is read when
    /// present. `LEAKIFY_*` variables override both, with `__` separating
    /// sections (`LEAKIFY_SERVER__URL`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => Some(config::File::from(path).required(true)),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                default
                    .exists()
                    .then(|| config::File::from(default).required(false))
            }
        };
        Self::from_sources(file, leakify_env())
    }

    fn from_sources<F>(file: Option<F>, env: config::Environment) -> Result<Self>
    where
        F: config::Source + Send + Sync + 'static,
    {
        let mut settings = config::Config::builder();
        if let Some(file) = file {
            settings = settings.add_source(file);
        }
        settings = settings.add_source(env);

        let config = settings.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.server.url)
            .map_err(|e| CliError::Config(format!("server.url {:?}: {}", self.server.url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(CliError::Config(format!(
                "server.url must be http or https, got {}",
                url.scheme()
            )));
        }

        if self.playback.default_volume > 100 {
            return Err(CliError::Config(format!(
                "playback.default_volume must be 0-100, got {}",
                self.playback.default_volume
            )));
        }

        if self.playback.fade_secs == 0 {
            return Err(CliError::Config(
                "playback.fade_secs must be at least 1".to_string(),
            ));
        }

        if self.playback.assumed_bitrate_kbps == 0 {
            return Err(CliError::Config(
                "playback.assumed_bitrate_kbps must be positive".to_string(),
            ));
        }

        if self.auth.user.is_some() != self.auth.pass.is_some() {
            return Err(CliError::Config(
                "auth.user and auth.pass must be set together".to_string(),
            ));
        }

        Ok(())
    }

    /// Credentials, if both halves are configured
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.auth.user, &self.auth.pass) {
            (Some(user), Some(pass)) => Some((user, pass)),
            _ => None,
        }
    }

    /// Where likes and recently played are persisted
    pub fn preferences_path(&self) -> PathBuf {
        self.storage.data_dir.join("preferences.json")
    }

    pub fn playback_config(&self) -> PlaybackConfig {
        PlaybackConfig {
            history_size: self.playback.history_size,
            default_volume: self.playback.default_volume,
            fade_duration: Duration::from_secs(self.playback.fade_secs),
            shuffle: self.playback.shuffle,
            repeat: self.playback.repeat,
            shuffle_seed: None,
        }
    }

    pub fn client_config(&self) -> leakify_client::ClientConfig {
        leakify_client::ClientConfig {
            url: self.server.url.clone(),
            timeout_secs: self.server.timeout_secs,
        }
    }
}

fn leakify_env() -> config::Environment {
    config::Environment::with_prefix("LEAKIFY")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        url: default_url(),
        timeout_secs: default_timeout_secs(),
    }
}

fn default_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        data_dir: default_data_dir(),
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_playback() -> PlaybackSettings {
    PlaybackSettings {
        default_volume: default_volume(),
        fade_secs: default_fade_secs(),
        history_size: default_history_size(),
        assumed_bitrate_kbps: default_bitrate(),
        shuffle: false,
        repeat: false,
    }
}

fn default_volume() -> u8 {
    80
}

fn default_fade_secs() -> u64 {
    3
}

fn default_history_size() -> usize {
    50
}

fn default_bitrate() -> u32 {
    192
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            auth: AuthSettings::default(),
            storage: default_storage(),
            playback: default_playback(),
        }
    }
}
