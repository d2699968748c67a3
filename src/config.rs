//! Startup configuration.
//!
//! Every field is optional in the TOML file; anything left out keeps the
//! defaults below. A minimal file looks like:
//!
//! ```toml
//! seed = 42
//! frames = 600
//!
//! [engine]
//! fullscreen = false
//! window_width = 1920
//! window_height = 1080
//! ```

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::layout::SeededRandom;

/// Parameters handed to the engine before it initializes.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineParameters {
    pub window_width: u32,
    pub window_height: u32,
    pub fullscreen: bool,
    pub vsync: bool,
    pub frame_limiter: bool,
    pub render_path: String,
}

impl Default for EngineParameters {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            fullscreen: true,
            vsync: false,
            frame_limiter: false,
            render_path: "RenderPaths/Forward.xml".to_string(),
        }
    }
}

/// Rotation of the scene node in degrees per second around each axis.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpinRates {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Default for SpinRates {
    fn default() -> Self {
        Self {
            x: 5.0,
            y: -20.0,
            z: 10.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub engine: EngineParameters,
    /// Seed for the sparse bands; a fresh seed is drawn when unset.
    pub seed: Option<u64>,
    /// Number of frames the headless host runs before exiting.
    pub frames: u32,
    pub spin: SpinRates,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            engine: EngineParameters::default(),
            seed: None,
            frames: 300,
            spin: SpinRates::default(),
        }
    }
}

impl DemoConfig {
    pub fn from_toml_str(source: &str) -> anyhow::Result<Self> {
        toml::from_str(source).context("Invalid demo configuration")
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config file {}", path.display()))?;
        Self::from_toml_str(&source)
            .with_context(|| format!("Could not parse config file {}", path.display()))
    }

    pub fn random_source(&self) -> SeededRandom {
        match self.seed {
            Some(seed) => SeededRandom::new(seed),
            None => SeededRandom::from_entropy(),
        }
    }
}
