use log::debug;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

// --- Error Type ---
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Validation(String),
}

// --- Enums for Choices ---
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SerializerType {
    #[default]
    Json,
    Binary,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SenderType {
    #[default]
    Stdio,
    File,
    WebSocket,
    Null,
}

// --- Configuration Sections ---

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ArenaSettings {
    pub width: f32,
    pub height: f32,
}

/// A group of balls to create at startup.
///
/// Missing `position` or `velocity` are randomized by the runner: position
/// anywhere the ball fits, velocity of magnitude `speed` in a random direction.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct BallSpawnConfig {
    #[serde(default = "default_count")]
    pub count: u32,
    #[serde(default = "default_radius")]
    pub radius: f32,
    #[serde(default = "default_speed")]
    pub speed: f32,
    #[serde(default)]
    pub color: Option<[u8; 3]>,
    #[serde(default)]
    pub position: Option<[f32; 2]>,
    #[serde(default)]
    pub velocity: Option<[f32; 2]>,
}

fn default_count() -> u32 { 1 }
fn default_radius() -> f32 { 10.0 }
fn default_speed() -> f32 { 20.0 }

#[derive(Deserialize, Debug, Clone, Default)]
pub struct SenderConfig {
    #[serde(rename = "type", default)]
    pub sender_type: SenderType,
    pub options: Option<serde_json::Value>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct TransportConfig {
    #[serde(default)]
    pub serializer: SerializerType,
    #[serde(default)]
    pub sender: SenderConfig,
}

// --- Top-Level Config Struct ---

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub framerate: u32,
    /// Seed for spawn randomization; entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    pub arena: ArenaSettings,
    #[serde(default)]
    pub balls: Vec<BallSpawnConfig>,
    #[serde(default)]
    pub transport: TransportConfig,
}

// --- Sender Options ---
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WebSocketOptions {
    #[serde(default = "default_ws_host")]
    pub host: String,
    #[serde(default = "default_ws_port")]
    pub port: u16,
}

fn default_ws_host() -> String { "127.0.0.1".to_string() }
fn default_ws_port() -> u16 { 8080 }

impl Default for WebSocketOptions {
    fn default() -> Self {
        Self {
            host: default_ws_host(),
            port: default_ws_port(),
        }
    }
}

impl WebSocketOptions {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FileOptions {
    #[serde(default = "default_file_path")]
    pub path: PathBuf,
}

fn default_file_path() -> PathBuf { PathBuf::from("ball_actions.log") }

impl Default for FileOptions {
    fn default() -> Self {
        Self { path: default_file_path() }
    }
}

// Helper methods for extracting options
impl SenderConfig {
    pub fn websocket_options(&self) -> WebSocketOptions {
        self.parse_options().unwrap_or_default()
    }

    pub fn file_options(&self) -> FileOptions {
        self.parse_options().unwrap_or_default()
    }

    fn parse_options<T: for<'de> Deserialize<'de>>(&self) -> Option<T> {
        let value = self.options.as_ref()?;
        match serde_json::from_value(value.clone()) {
            Ok(options) => Some(options),
            Err(e) => {
                debug!("Ignoring malformed sender options ({}), using defaults", e);
                None
            }
        }
    }
}

// --- Command Line Overrides ---

/// Settings that can be overridden from the command line.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override the target framerate
    #[arg(long)]
    pub framerate: Option<u32>,

    /// Override the arena width
    #[arg(long)]
    pub width: Option<f32>,

    /// Override the arena height
    #[arg(long)]
    pub height: Option<f32>,

    /// Override the spawn seed
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Config {
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(framerate) = overrides.framerate {
            self.framerate = framerate;
        }
        if let Some(width) = overrides.width {
            self.arena.width = width;
        }
        if let Some(height) = overrides.height {
            self.arena.height = height;
        }
        if overrides.seed.is_some() {
            self.seed = overrides.seed;
        }
    }

    /// Total number of balls the config asks for.
    pub fn ball_count(&self) -> u32 {
        self.balls.iter().map(|b| b.count).sum()
    }
}

// --- Loading Functions ---

/// Parses a config file without validating it. `.toml` files are read as
/// TOML, anything else as JSON.
pub fn parse_config(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path)?;
    let is_toml = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("toml"));

    let config = if is_toml {
        toml::from_str(&content)?
    } else {
        serde_json::from_str(&content)?
    };
    Ok(config)
}

/// Parses and validates a config file.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let config = parse_config(path)?;
    validate(&config)?;
    Ok(config)
}

pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.framerate == 0 {
        return Err(ConfigError::Validation("Framerate cannot be zero.".to_string()));
    }

    let ArenaSettings { width, height } = config.arena;
    if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
        return Err(ConfigError::Validation(format!(
            "Arena dimensions must be positive, got {}x{}.",
            width, height
        )));
    }

    for (idx, ball) in config.balls.iter().enumerate() {
        if !(ball.radius.is_finite() && ball.radius > 0.0) {
            return Err(ConfigError::Validation(format!(
                "Ball group {}: radius must be positive, got {}.",
                idx, ball.radius
            )));
        }
        if ball.radius * 2.0 >= width.min(height) {
            return Err(ConfigError::Validation(format!(
                "Ball group {}: diameter {} does not fit in a {}x{} arena.",
                idx,
                ball.radius * 2.0,
                width,
                height
            )));
        }
        if !(ball.speed.is_finite() && ball.speed >= 0.0) {
            return Err(ConfigError::Validation(format!(
                "Ball group {}: speed must be non-negative, got {}.",
                idx, ball.speed
            )));
        }
        if let Some([x, y]) = ball.position {
            // Centers may start overlapping a wall; the first tick clamps them back in.
            if !(x.abs() <= width / 2.0 && y.abs() <= height / 2.0) {
                return Err(ConfigError::Validation(format!(
                    "Ball group {}: position ({}, {}) is outside the arena.",
                    idx, x, y
                )));
            }
        }
        if let Some([vx, vy]) = ball.velocity {
            if !(vx.is_finite() && vy.is_finite()) {
                return Err(ConfigError::Validation(format!(
                    "Ball group {}: velocity must be finite.",
                    idx
                )));
            }
        }
    }

    Ok(())
}
