//! Renderer configuration

use serde::{Deserialize, Serialize};

/// Camera projection settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub near_plane: f32,
    pub far_plane: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near_plane: 0.1,
            far_plane: 1000.0,
        }
    }
}

/// Ground grid settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GridConfig {
    pub enabled: bool,
    pub size: f32,
    pub spacing: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            size: crate::constants::grid::DEFAULT_SIZE,
            spacing: crate::constants::grid::DEFAULT_SPACING,
        }
    }
}

/// Top-level renderer configuration, persisted with the app config.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct RendererConfig {
    pub background: BackgroundConfig,
    pub camera: CameraConfig,
    pub grid: GridConfig,
}

/// Viewport clear color.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BackgroundConfig {
    pub color: [f32; 4],
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            color: [0.08, 0.09, 0.11, 1.0],
        }
    }
}
