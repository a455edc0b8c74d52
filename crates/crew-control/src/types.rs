use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ammunition type handled by the loader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmmoType {
    #[default]
    None,
    Ap,
    He,
}

impl fmt::Display for AmmoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::None => "None",
            Self::Ap => "AP",
            Self::He => "HE",
        };
        f.pad(s)
    }
}

/// World-space origin and unit direction of a round leaving the muzzle.
/// Y is up; heading 0 looks down +Z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MuzzlePose {
    pub origin: Vec3,
    pub direction: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GunnerPhase {
    Idle,
    Aligning,
    Aiming,
}

impl fmt::Display for GunnerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "Idle",
            Self::Aligning => "Aligning",
            Self::Aiming => "Aiming",
        };
        f.pad(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoaderPhase {
    Idle,
    Loading,
    Loaded,
}

impl fmt::Display for LoaderPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "Idle",
            Self::Loading => "Loading",
            Self::Loaded => "Loaded",
        };
        f.pad(s)
    }
}

/// Point-in-time view of the gunner station
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GunnerState {
    pub phase: GunnerPhase,
    /// Present exactly when `phase` is `Aiming`
    pub target: Option<Vec3>,
    pub range_m: f32,
    pub turret_yaw_deg: f32,
    pub gun_pitch_deg: f32,
}

/// Point-in-time view of the loader station
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoaderState {
    pub phase: LoaderPhase,
    /// Round in the breech, `None` unless `phase` is `Loaded`
    pub loaded_ammo: AmmoType,
    /// Round being loaded, `None` unless `phase` is `Loading`
    pub loading_ammo: AmmoType,
    pub last_selected: AmmoType,
    /// Reload progress in `[0, 1]`
    pub progress: f32,
}

impl LoaderState {
    pub fn is_loaded(&self) -> bool {
        self.phase == LoaderPhase::Loaded
    }

    pub fn is_loading(&self) -> bool {
        self.phase == LoaderPhase::Loading
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ammo_display_and_serde() {
        assert_eq!(AmmoType::Ap.to_string(), "AP");
        assert_eq!(AmmoType::He.to_string(), "HE");
        assert_eq!(AmmoType::default(), AmmoType::None);
        let ammo: AmmoType = serde_json::from_str("\"he\"").unwrap();
        assert_eq!(ammo, AmmoType::He);
    }
}
