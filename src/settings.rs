//! Game settings and tuning
//!
//! Every gameplay constant can be overridden from JSON. Missing fields fall back to
//! the defaults in [`crate::consts`].

use anyhow::{Context, bail};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::spawn_point;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    /// Sphere tessellation (latitude and longitude bands)
    pub fn sphere_segments(&self) -> u32 {
        match self {
            QualityPreset::Low => 12,
            QualityPreset::Medium => 24,
            QualityPreset::High => 32,
        }
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Run seed; `None` picks one from the clock at startup
    pub seed: Option<u64>,
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Physics ===
    /// Vertical gravity (negative pulls down)
    pub gravity: f32,
    pub ball_radius: f32,
    pub ball_mass: f32,
    pub ball_damping: f32,
    pub ball_lane: f32,
    pub ball_spawn_height: f32,

    // === Input ===
    /// Vertical velocity set by a jump
    pub jump_power: f32,
    /// Allow jumping while airborne
    pub allow_air_jump: bool,

    // === Obstacles ===
    pub pillar_pairs: usize,
    pub pillar_spacing: f32,
    pub pillar_start_x: f32,
    pub pillar_gap: f32,
    pub pillar_width: f32,
    pub pillar_min_height: f32,
    pub pillar_max_height: f32,
    pub pillar_total_height: f32,
    pub scroll_step: f32,
    pub recycle_below_x: f32,
    /// Where recycled pairs reappear; `None` follows the pool size and spacing
    pub recycle_to_x: Option<f32>,
    /// Draw a new gap height when a pair is recycled
    pub reroll_on_recycle: bool,

    // === Camera / feedback ===
    pub look_ahead: f32,
    pub fov_degrees: f32,
    pub highlight_ticks: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            quality: QualityPreset::Medium,

            gravity: GRAVITY,
            ball_radius: BALL_RADIUS,
            ball_mass: BALL_MASS,
            ball_damping: BALL_DAMPING,
            ball_lane: BALL_LANE,
            ball_spawn_height: BALL_SPAWN_HEIGHT,

            jump_power: JUMP_POWER,
            allow_air_jump: true,

            pillar_pairs: PILLAR_PAIRS,
            pillar_spacing: PILLAR_SPACING,
            pillar_start_x: PILLAR_START_X,
            pillar_gap: PILLAR_GAP,
            pillar_width: PILLAR_WIDTH,
            pillar_min_height: PILLAR_MIN_HEIGHT,
            pillar_max_height: PILLAR_MAX_HEIGHT,
            pillar_total_height: PILLAR_TOTAL_HEIGHT,
            scroll_step: SCROLL_STEP,
            recycle_below_x: RECYCLE_BELOW_X,
            recycle_to_x: None,
            reroll_on_recycle: true,

            look_ahead: LOOK_AHEAD,
            fov_degrees: CAMERA_FOV_DEGREES,
            highlight_ticks: HIGHLIGHT_TICKS,
        }
    }
}

impl Settings {
    /// Parse settings from JSON and validate them
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let settings: Settings =
            serde_json::from_str(json).context("settings are not valid JSON")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject tunings that break the obstacle or physics invariants
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.ball_radius <= 0.0 {
            bail!("ball_radius must be positive (got {})", self.ball_radius);
        }
        if self.pillar_pairs == 0 {
            bail!("pillar_pairs must be at least 1");
        }
        if self.pillar_width <= 0.0 || self.pillar_gap <= 0.0 {
            bail!(
                "pillar_width and pillar_gap must be positive (got {} / {})",
                self.pillar_width,
                self.pillar_gap
            );
        }
        if self.pillar_min_height <= 0.0 || self.pillar_min_height >= self.pillar_max_height {
            bail!(
                "pillar height range [{}, {}) is empty",
                self.pillar_min_height,
                self.pillar_max_height
            );
        }
        let tallest_upper_free = self.pillar_total_height - self.pillar_max_height - self.pillar_gap;
        if tallest_upper_free <= 0.0 {
            bail!(
                "pillar_total_height {} leaves no room for an upper pillar (max {} + gap {})",
                self.pillar_total_height,
                self.pillar_max_height,
                self.pillar_gap
            );
        }
        if self.pillar_spacing <= 0.0 {
            bail!("pillar_spacing must be positive (got {})", self.pillar_spacing);
        }
        if self.scroll_step <= 0.0 {
            bail!("scroll_step must be positive (got {})", self.scroll_step);
        }
        let recycle_to_x = self.recycle_target();
        if recycle_to_x <= self.recycle_below_x {
            bail!(
                "recycle_to_x {} must lie ahead of recycle_below_x {}",
                recycle_to_x,
                self.recycle_below_x
            );
        }
        if !(1.0..179.0).contains(&self.fov_degrees) {
            bail!("fov_degrees {} out of range", self.fov_degrees);
        }
        Ok(())
    }

    /// Height the ball is clamped to (resting on the ground)
    pub fn floor_y(&self) -> f32 {
        self.ball_radius
    }

    pub fn ball_spawn(&self) -> Vec3 {
        spawn_point(self.ball_lane, self.ball_spawn_height)
    }

    /// Initial x of pair `index` in the evenly spaced layout
    pub fn pair_start_x(&self, index: usize) -> f32 {
        self.pillar_start_x + index as f32 * self.pillar_spacing
    }

    /// X a recycled pair jumps to
    ///
    /// Defaults to one pool length ahead of the recycle line, which keeps the pairs
    /// `pillar_spacing` apart.
    pub fn recycle_target(&self) -> f32 {
        self.recycle_to_x.unwrap_or(
            self.recycle_below_x + self.pillar_pairs as f32 * self.pillar_spacing,
        )
    }

    /// Load settings from the page's `<script id="settings">` block (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("settings"))
            .and_then(|el| el.text_content());

        if let Some(json) = json {
            match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from page");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring page settings: {:#}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Load settings from a JSON file (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path(path: &std::path::Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("in {}", path.display()))
    }
}
