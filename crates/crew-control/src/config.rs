//! Crew station tuning, loadable from YAML or JSON

use crate::error::{ControlError, Result};
use crate::types::AmmoType;
use anyhow::Context;
use crew_parser::Lexicon;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GunnerConfig {
    /// Turret traverse rate
    pub yaw_speed_deg: f32,
    /// Gun elevation rate
    pub pitch_speed_deg: f32,
    /// (depression, elevation) limits, positive is up
    pub pitch_limits_deg: (f32, f32),
    pub min_range_m: f32,
    pub max_range_m: f32,
    pub initial_range_m: f32,
    /// Alignment completes once yaw and pitch are within this of their targets
    pub align_tolerance_deg: f32,
    /// Distance along the bore from the turret pivot to the projectile spawn
    pub muzzle_offset_m: f32,
}

impl Default for GunnerConfig {
    fn default() -> Self {
        Self {
            yaw_speed_deg: 120.0,
            pitch_speed_deg: 90.0,
            pitch_limits_deg: (-10.0, 20.0),
            min_range_m: 5.0,
            max_range_m: 2000.0,
            initial_range_m: 800.0,
            align_tolerance_deg: 0.5,
            muzzle_offset_m: 0.05,
        }
    }
}

impl GunnerConfig {
    pub fn validate(&self) -> Result<()> {
        let (low, high) = self.pitch_limits_deg;
        if !(self.yaw_speed_deg > 0.0 && self.pitch_speed_deg > 0.0) {
            return Err(ControlError::Config(
                "gunner rates must be positive".to_string(),
            ));
        }
        if !(low <= high) {
            return Err(ControlError::Config(format!(
                "pitch limits inverted: ({low}, {high})"
            )));
        }
        if !(self.min_range_m > 0.0 && self.min_range_m <= self.max_range_m) {
            return Err(ControlError::Config(format!(
                "range bounds invalid: [{}, {}]",
                self.min_range_m, self.max_range_m
            )));
        }
        if !(self.align_tolerance_deg >= 0.0 && self.muzzle_offset_m >= 0.0) {
            return Err(ControlError::Config(
                "align tolerance and muzzle offset must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Reload-time scale per ammunition type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmmoMultipliers {
    pub ap: f32,
    pub he: f32,
}

impl Default for AmmoMultipliers {
    fn default() -> Self {
        Self { ap: 1.0, he: 1.0 }
    }
}

impl AmmoMultipliers {
    pub fn for_ammo(&self, ammo: AmmoType) -> f32 {
        match ammo {
            AmmoType::Ap => self.ap,
            AmmoType::He => self.he,
            AmmoType::None => 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub reload_seconds: f32,
    pub time_multiplier: AmmoMultipliers,
    /// Initial "last selected" type, used by a bare load order
    pub default_ammo: AmmoType,
    /// Start loading the last selected type as soon as a round is fired
    pub auto_reload_after_fire: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            reload_seconds: 10.0,
            time_multiplier: AmmoMultipliers::default(),
            default_ammo: AmmoType::Ap,
            auto_reload_after_fire: false,
        }
    }
}

impl LoaderConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.reload_seconds >= 0.0) {
            return Err(ControlError::Config(format!(
                "reload_seconds must be non-negative, got {}",
                self.reload_seconds
            )));
        }
        let m = &self.time_multiplier;
        if !(m.ap >= 0.0 && m.he >= 0.0) {
            return Err(ControlError::Config(
                "reload multipliers must be non-negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Seconds needed to load one round of `ammo`
    pub fn reload_duration(&self, ammo: AmmoType) -> f32 {
        self.reload_seconds * self.time_multiplier.for_ammo(ammo)
    }
}

/// Full crew configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CrewConfig {
    pub lexicon: Lexicon,
    pub gunner: GunnerConfig,
    pub loader: LoaderConfig,
}

impl CrewConfig {
    pub fn validate(&self) -> Result<()> {
        self.lexicon.validate()?;
        self.gunner.validate()?;
        self.loader.validate()
    }

    pub fn from_yaml_str(s: &str) -> anyhow::Result<Self> {
        let cfg: Self = serde_yaml::from_str(s).context("parsing crew config YAML")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_str(s: &str) -> anyhow::Result<Self> {
        let cfg: Self = serde_json::from_str(s).context("parsing crew config JSON")?;
        cfg.validate()?;
        Ok(cfg)
    }
}

/// Load a crew config, choosing the decoder by file extension (`.json`,
/// otherwise YAML).
pub fn load_crew_config(path: impl AsRef<Path>) -> anyhow::Result<CrewConfig> {
    let path = path.as_ref();
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading crew config: {}", path.display()))?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    let cfg = if is_json {
        CrewConfig::from_json_str(&data)
    } else {
        CrewConfig::from_yaml_str(&data)
    };
    let cfg = cfg.with_context(|| format!("loading crew config: {}", path.display()))?;
    tracing::info!("Loaded crew config from {}", path.display());
    Ok(cfg)
}
