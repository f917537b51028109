use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub club: ClubConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    /// Maximum database connections (default: 5)
    pub max_db_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/clubhouse.db".to_string(),
            log_level: "info".to_string(),
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,

    /// Whether to set the Secure flag on session cookies.
    /// Default: true for production safety. Set to false for local development without HTTPS.
    pub secure_cookies: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            secure_cookies: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClubConfig {
    /// Shared secret a signed-up account must supply to join the club.
    pub join_passcode: String,

    /// Separate secret a member must supply to gain admin rights.
    pub admin_passcode: String,

    /// Key material for signing session cookies. Must be at least 64 bytes.
    pub session_secret: String,
}

impl Default for ClubConfig {
    fn default() -> Self {
        Self {
            join_passcode: "open sesame".to_string(),
            admin_passcode: "change-me".to_string(),
            session_secret: "change-me-change-me-change-me-change-me-change-me-change-me-64b!"
                .to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            server: ServerConfig::default(),
            club: ClubConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                let mut config = Self::load_from_path(path)?;
                config.apply_env_overrides();
                return Ok(config);
            }
        }

        info!("No config file found, using defaults");
        let mut config = Self::default();
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Secrets can be supplied through the environment (e.g. from `.env`)
    /// instead of the config file.
    fn apply_env_overrides(&mut self) {
        if let Ok(passcode) = std::env::var("CLUBHOUSE_JOIN_PASSCODE") {
            self.club.join_passcode = passcode;
        }
        if let Ok(passcode) = std::env::var("CLUBHOUSE_ADMIN_PASSCODE") {
            self.club.admin_passcode = passcode;
        }
        if let Ok(secret) = std::env::var("CLUBHOUSE_SESSION_SECRET") {
            self.club.session_secret = secret;
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::default_config_path();
        self.save_to_path(&path)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("clubhouse").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".clubhouse").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.club.join_passcode.is_empty() {
            anyhow::bail!("Join passcode cannot be empty");
        }

        if self.club.admin_passcode.is_empty() {
            anyhow::bail!("Admin passcode cannot be empty");
        }

        // Key::from needs at least 64 bytes of key material
        if self.club.session_secret.len() < 64 {
            anyhow::bail!("Session secret must be at least 64 bytes");
        }

        Ok(())
    }
}
