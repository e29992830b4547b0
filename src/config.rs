use std::{env, fs, path::PathBuf, time::Duration};

use directories::BaseDirs;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::access::{Role, TabVisibility, UserContext};
use crate::core::DataSource;
use crate::core::pagination::DEFAULT_PAGE_SIZE;
use crate::tui::keybindings::KeyBinding;

const CONFIG: &str = include_str!("../.config/config.json5");

/// Feed used by the Explore page when nothing else is configured
pub const DEFAULT_PLAY_ENDPOINT: &str = "https://europe-west3-showheroes-bi.cloudfunctions.net/test-2";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

#[derive(Clone, Debug, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub config_dir: PathBuf,
}

/// Endpoint per data page
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceEndpoints {
    #[serde(default)]
    pub market_lines: Option<String>,
    #[serde(default)]
    pub sellers_json: Option<String>,
    #[serde(default)]
    pub play: Option<String>,
}

impl SourceEndpoints {
    pub fn get(&self, source: DataSource) -> Option<&str> {
        match source {
            DataSource::MarketLines => self.market_lines.as_deref(),
            DataSource::SellersJson => self.sellers_json.as_deref(),
            DataSource::Play => self.play.as_deref(),
        }
    }

    pub fn set(&mut self, source: DataSource, endpoint: impl Into<String>) {
        let endpoint = Some(endpoint.into());
        match source {
            DataSource::MarketLines => self.market_lines = endpoint,
            DataSource::SellersJson => self.sellers_json = endpoint,
            DataSource::Play => self.play = endpoint,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Dark,
    Light,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default, flatten)]
    pub config: AppConfig,
    #[serde(default)]
    pub sources: SourceEndpoints,
    pub request_timeout_secs: u64,
    pub page_size: usize,
    pub notification_ttl_secs: u64,
    pub base_path: String,
    #[serde(default)]
    pub tab_visibility: TabVisibility,
    #[serde(default)]
    pub admin_emails: Vec<String>,
    #[serde(default)]
    pub user: Option<UserContext>,
    #[serde(default)]
    pub theme: ThemeName,
    #[serde(default)]
    pub keybindings: Vec<KeyBinding>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config: AppConfig {
                data_dir: get_data_dir(),
                config_dir: get_config_dir(),
            },
            sources: SourceEndpoints {
                play: Some(DEFAULT_PLAY_ENDPOINT.to_string()),
                ..SourceEndpoints::default()
            },
            request_timeout_secs: 30,
            page_size: DEFAULT_PAGE_SIZE,
            notification_ttl_secs: 5,
            base_path: "/Test_".to_string(),
            tab_visibility: TabVisibility::default(),
            admin_emails: Vec::new(),
            user: None,
            theme: ThemeName::Dark,
            keybindings: Vec::new(),
        }
    }
}

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase().to_string();
    pub static ref DATA_FOLDER: Option<PathBuf> =
        env::var(format!("{}_DATA", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
    pub static ref CONFIG_FOLDER: Option<PathBuf> =
        env::var(format!("{}_CONFIG", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
}

impl Config {
    /// Layer the embedded defaults under the user file.
    ///
    /// Without an explicit path the home config is used, and written from the
    /// embedded defaults when it does not exist yet.
    pub fn from_path(config_path: Option<&PathBuf>) -> Result<Self, ConfigError> {
        let data_dir = get_data_dir();
        let config_dir = get_config_dir();

        let selected_path = match config_path {
            Some(p) => expand_tilde(p),
            None => {
                let home_cfg = default_home_config_path();
                if !home_cfg.exists() {
                    if let Some(parent) = home_cfg.parent() {
                        fs::create_dir_all(parent)?;
                    }
                    if let Err(e) = fs::write(&home_cfg, CONFIG) {
                        tracing::warn!("could not write default config to {}: {}", home_cfg.display(), e);
                    }
                }
                home_cfg
            }
        };

        let builder = Self::defaults_builder(&data_dir, &config_dir)?
            .add_source(
                config::File::from(selected_path.clone())
                    .format(config::FileFormat::Json5)
                    .required(config_path.is_some()),
            );

        let cfg: Self = builder.build()?.try_deserialize()?;
        tracing::info!("loaded configuration from {}", selected_path.display());
        Ok(cfg)
    }

    /// The embedded defaults alone
    pub fn embedded() -> Result<Self, ConfigError> {
        let cfg = Self::defaults_builder(&get_data_dir(), &get_config_dir())?
            .build()?
            .try_deserialize()?;
        Ok(cfg)
    }

    /// Folder defaults plus the embedded JSON5, the base layer of every load
    fn defaults_builder(
        data_dir: &std::path::Path,
        config_dir: &std::path::Path,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Ok(config::Config::builder()
            .set_default("data_dir", data_dir.to_string_lossy().to_string())?
            .set_default("config_dir", config_dir.to_string_lossy().to_string())?
            .add_source(config::File::from_str(CONFIG, config::FileFormat::Json5)))
    }

    pub fn endpoint(&self, source: DataSource) -> Option<&str> {
        self.sources.get(source)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn notification_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.notification_ttl_secs as i64)
    }

    /// Role granted to someone signing in with `email`
    pub fn role_for(&self, email: &str) -> Role {
        let email = email.trim();
        if self.admin_emails.iter().any(|a| a.eq_ignore_ascii_case(email)) {
            Role::Admin
        } else {
            Role::User
        }
    }

    /// Where CSV exports land
    pub fn export_dir(&self) -> PathBuf {
        self.config.data_dir.join("exports")
    }
}

fn expand_tilde(path: &PathBuf) -> PathBuf {
    if let Some(s) = path.to_str() {
        if let Some(rest) = s.strip_prefix('~') {
            if let Some(base) = BaseDirs::new() {
                return PathBuf::from(format!("{}{}", base.home_dir().display(), rest));
            }
        }
    }
    path.clone()
}

fn default_home_config_path() -> PathBuf {
    if let Some(base) = BaseDirs::new() {
        return base.home_dir().join(".sheetdash-config.json5");
    }
    PathBuf::from(".sheetdash-config.json5")
}

pub fn get_data_dir() -> PathBuf {
    if let Some(s) = DATA_FOLDER.clone() {
        s
    } else {
        PathBuf::from(".").join(".data")
    }
}

pub fn get_config_dir() -> PathBuf {
    if let Some(s) = CONFIG_FOLDER.clone() {
        s
    } else {
        PathBuf::from(".").join(".config")
    }
}
