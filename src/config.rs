//! Startup configuration.

use std::path::PathBuf;

/// Environment variable that overrides [`Config::assets_dir`].
pub const ASSETS_ENV: &str = "PHONG_DESK_ASSETS";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub clear_colour: wgpu::Color,
    /// Directory textures are read from (`<assets_dir>/images/...`).
    pub assets_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "phong-desk".to_string(),
            width: 800,
            height: 600,
            clear_colour: wgpu::Color {
                r: 0.1,
                g: 0.1,
                b: 0.1,
                a: 1.0,
            },
            assets_dir: PathBuf::from("assets"),
        }
    }
}

impl Config {
    /// Defaults, with the asset directory taken from `PHONG_DESK_ASSETS` when set.
    pub fn from_env() -> Self {
        Self::default().with_assets_dir(std::env::var_os(ASSETS_ENV).map(PathBuf::from))
    }

    fn with_assets_dir(mut self, dir: Option<PathBuf>) -> Self {
        match dir {
            Some(dir) if !dir.as_os_str().is_empty() => self.assets_dir = dir,
            _ => (),
        }
        self
    }
}
