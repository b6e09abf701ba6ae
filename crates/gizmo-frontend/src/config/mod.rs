//! Application configuration
//!
//! UI and scene preferences persisted as RON in the OS config directory.

mod manager;

pub use manager::{ConfigError, ConfigManager};

use gizmo_renderer::RendererConfig;
use serde::{Deserialize, Serialize};

/// UI theme
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum UiTheme {
    #[default]
    Dark,
    Light,
}

/// UI preferences
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UiConfig {
    pub theme: UiTheme,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: UiTheme::Dark,
        }
    }
}

/// Demo scene preferences
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SceneConfig {
    /// Number of boxes spawned on startup.
    pub box_count: usize,
    /// Half-extent of the random placement volume.
    pub spread: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            box_count: 10,
            spread: 8.0,
        }
    }
}

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    pub ui: UiConfig,
    pub scene: SceneConfig,
    pub renderer: RendererConfig,
    /// Throttle window for the drag-event log consumer, in milliseconds.
    pub drag_log_throttle_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ui: UiConfig::default(),
            scene: SceneConfig::default(),
            renderer: RendererConfig::default(),
            drag_log_throttle_ms: 100,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }
}
