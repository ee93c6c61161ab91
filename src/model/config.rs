use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::window::{Monitor, WindowGeometry};

/// Configuration from config.toml (every field optional)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub persistence: PersistenceConfig,
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Quiet period before the task list is written
    #[serde(default = "default_save_delay_ms")]
    pub save_delay_ms: u64,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        PersistenceConfig {
            save_delay_ms: default_save_delay_ms(),
        }
    }
}

/// What the close button does once geometry has been flushed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloseBehavior {
    /// Keep running in the background with the window hidden
    #[default]
    Hide,
    /// Close the window for real
    Close,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Quiet period before moved/resized geometry is written
    #[serde(default = "default_state_delay_ms")]
    pub state_delay_ms: u64,
    /// Initial always-on-top state
    #[serde(default = "default_true")]
    pub pinned: bool,
    #[serde(default)]
    pub close_behavior: CloseBehavior,
    #[serde(default = "default_x")]
    pub x: i32,
    #[serde(default = "default_y")]
    pub y: i32,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    /// Pixels per nudge key in the terminal host
    #[serde(default = "default_move_step")]
    pub move_step: u32,
    #[serde(default = "default_monitors")]
    pub monitors: Vec<Monitor>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            state_delay_ms: default_state_delay_ms(),
            pinned: true,
            close_behavior: CloseBehavior::Hide,
            x: default_x(),
            y: default_y(),
            width: default_width(),
            height: default_height(),
            move_step: default_move_step(),
            monitors: default_monitors(),
        }
    }
}

impl WindowConfig {
    /// Placement used before any geometry has been persisted
    pub fn default_geometry(&self) -> WindowGeometry {
        WindowGeometry {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    /// Hex overrides for theme slots, e.g. `highlight = "#FB4196"`
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            show_key_hints: true,
            colors: HashMap::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_save_delay_ms() -> u64 {
    400
}

fn default_state_delay_ms() -> u64 {
    300
}

fn default_x() -> i32 {
    100
}

fn default_y() -> i32 {
    100
}

fn default_width() -> u32 {
    360
}

fn default_height() -> u32 {
    520
}

fn default_move_step() -> u32 {
    20
}

fn default_monitors() -> Vec<Monitor> {
    vec![Monitor {
        x: 0,
        y: 0,
        width: 1920,
        height: 1080,
    }]
}
