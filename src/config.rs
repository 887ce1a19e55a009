use std::path::{Path, PathBuf};
use std::time::Duration;

use color_eyre::eyre::{Result, WrapErr, eyre};
use serde::{Deserialize, Serialize};

const DEFAULT_CONFIG: &str = r#"# Spotify playlist IDs to copy into Tidal
sync_playlists = []
# Sync every public playlist of `spotify.username` instead of `sync_playlists`
sync_all = false

[spotify]
client_id = ""
client_secret = ""
username = ""
# refresh_token = ""

[tidal]
client_id = ""
# client_secret = ""
# refresh_token = ""

[matching]
title_weight = 0.6
artist_weight = 0.4
min_score = 0.8
tie_margin = 0.02
duration_tolerance_secs = 2
title_threshold = 0.9
artist_threshold = 0.8
album_threshold = 0.9
search_limit = 10
"#;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub spotify: SpotifyConfig,
    pub tidal: TidalConfig,
    #[serde(default)]
    pub sync_playlists: Vec<String>,
    #[serde(default)]
    pub sync_all: bool,
    #[serde(default)]
    pub matching: MatchingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default)]
    pub username: Option<String>,
    /// Enables reading private playlists of the user who issued the token.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TidalConfig {
    pub client_id: String,
    #[serde(default)]
    pub client_secret: Option<String>,
    /// Skips the device login when present.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Tunables of the track matcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    pub title_weight: f64,
    pub artist_weight: f64,
    /// Minimum combined score a candidate needs to be accepted.
    pub min_score: f64,
    /// Scores closer than this are considered tied.
    pub tie_margin: f64,
    pub duration_tolerance_secs: u64,
    /// Title similarity at which the title counts as agreeing.
    pub title_threshold: f64,
    pub artist_threshold: f64,
    pub album_threshold: f64,
    /// Number of search results requested per track.
    pub search_limit: u32,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            title_weight: 0.6,
            artist_weight: 0.4,
            min_score: 0.8,
            tie_margin: 0.02,
            duration_tolerance_secs: 2,
            title_threshold: 0.9,
            artist_threshold: 0.8,
            album_threshold: 0.9,
            search_limit: 10,
        }
    }
}

impl MatchingConfig {
    pub fn duration_tolerance(&self) -> Duration {
        Duration::from_secs(self.duration_tolerance_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.title_weight < 0.0 || self.artist_weight < 0.0 {
            return Err(eyre!("Matching weights must not be negative"));
        }
        if self.title_weight + self.artist_weight <= 0.0 {
            return Err(eyre!("At least one matching weight must be positive"));
        }
        for (name, value) in [
            ("min_score", self.min_score),
            ("tie_margin", self.tie_margin),
            ("title_threshold", self.title_threshold),
            ("artist_threshold", self.artist_threshold),
            ("album_threshold", self.album_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(eyre!("matching.{} must be between 0 and 1, got {}", name, value));
            }
        }
        if self.search_limit == 0 {
            return Err(eyre!("matching.search_limit must be positive"));
        }
        Ok(())
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .wrap_err(format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&contents)
            .wrap_err(format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.matching.validate()?;
        Ok(config)
    }

    /// Get the default config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|path| path.join("playlist-sync").join("config.toml"))
    }

    /// Load config from the default location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path().ok_or(eyre!("Config file not found"))?;

        Self::from_file(&config_path)
    }

    /// Write the default config template, leaving an existing file untouched.
    pub fn create_default() -> Result<PathBuf> {
        let config_path = Self::config_path().ok_or(eyre!("No config directory available"))?;
        Self::write_default(&config_path)?;
        Ok(config_path)
    }

    fn write_default(path: &Path) -> Result<()> {
        if path.exists() {
            log::info!("Config already exists at {}", path.display());
            return Ok(());
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .wrap_err(format!("Failed to create config directory: {}", parent.display()))?;
        }
        std::fs::write(path, DEFAULT_CONFIG)
            .wrap_err(format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }
}
