use crate::types::{AmmoType, MuzzlePose};
use crew_parser::{DriverCommand, Intensity};
use glam::Vec3;

/// Commander's designation: the last world point marked as a target.
pub trait DesignationSource: Send {
    fn try_get_last_point(&self) -> Option<Vec3>;
}

/// Hull heading and turret/gun pose. Angles are degrees; yaw is a world
/// heading, pitch is elevation with positive up.
pub trait TurretRig: Send {
    fn hull_heading_deg(&self) -> f32;
    /// World position of the turret pivot
    fn turret_position(&self) -> Vec3;
    fn turret_yaw_deg(&self) -> f32;
    fn gun_pitch_deg(&self) -> f32;
    fn set_turret_yaw_deg(&mut self, yaw_deg: f32);
    fn set_gun_pitch_deg(&mut self, pitch_deg: f32);
}

/// Spawns the visual/physical projectile when the gun fires.
pub trait FireEffect: Send {
    fn spawn_projectile(&mut self, muzzle: MuzzlePose, ammo: AmmoType);
}

/// Vehicle movement sink for driver orders.
pub trait DriveTrain: Send {
    fn execute(&mut self, command: DriverCommand, intensity: Intensity);
}

/// Breech state as seen by the gunner.
pub trait AmmoFeed {
    fn is_loaded(&self) -> bool;
    fn is_loading(&self) -> bool;
    fn loaded_ammo(&self) -> AmmoType;
    /// Mark the loaded round as fired
    fn consume_round(&mut self);
}
