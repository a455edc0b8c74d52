//! In-process collaborators for the CLI and tests

use crate::traits::{DesignationSource, DriveTrain, FireEffect, TurretRig};
use crate::types::{AmmoType, MuzzlePose};
use crew_parser::{DriverCommand, Intensity};
use glam::Vec3;
use parking_lot::Mutex;
use std::sync::Arc;

/// Designation point shared between the commander's input and the gunner.
#[derive(Clone, Default)]
pub struct SharedDesignation {
    point: Arc<Mutex<Option<Vec3>>>,
}

impl SharedDesignation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn designate(&self, point: Vec3) {
        tracing::debug!("designated {:?}", point);
        *self.point.lock() = Some(point);
    }

    pub fn clear(&self) {
        *self.point.lock() = None;
    }
}

impl DesignationSource for SharedDesignation {
    fn try_get_last_point(&self) -> Option<Vec3> {
        *self.point.lock()
    }
}

/// Kinematic turret that applies every commanded pose immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimTurretRig {
    pub hull_heading_deg: f32,
    pub position: Vec3,
    pub yaw_deg: f32,
    pub pitch_deg: f32,
}

impl SimTurretRig {
    pub fn new(position: Vec3, hull_heading_deg: f32) -> Self {
        Self {
            hull_heading_deg,
            position,
            yaw_deg: hull_heading_deg,
            pitch_deg: 0.0,
        }
    }
}

impl TurretRig for SimTurretRig {
    fn hull_heading_deg(&self) -> f32 {
        self.hull_heading_deg
    }

    fn turret_position(&self) -> Vec3 {
        self.position
    }

    fn turret_yaw_deg(&self) -> f32 {
        self.yaw_deg
    }

    fn gun_pitch_deg(&self) -> f32 {
        self.pitch_deg
    }

    fn set_turret_yaw_deg(&mut self, yaw_deg: f32) {
        self.yaw_deg = yaw_deg;
    }

    fn set_gun_pitch_deg(&mut self, pitch_deg: f32) {
        self.pitch_deg = pitch_deg;
    }
}

/// Keeps every shot for later inspection; clones share the log.
#[derive(Clone, Default)]
pub struct RecordingFireEffect {
    shots: Arc<Mutex<Vec<(MuzzlePose, AmmoType)>>>,
}

impl RecordingFireEffect {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shots(&self) -> Vec<(MuzzlePose, AmmoType)> {
        self.shots.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.shots.lock().len()
    }
}

impl FireEffect for RecordingFireEffect {
    fn spawn_projectile(&mut self, muzzle: MuzzlePose, ammo: AmmoType) {
        tracing::info!(
            "Projectile {} from {:?} along {:?}",
            ammo,
            muzzle.origin,
            muzzle.direction
        );
        self.shots.lock().push((muzzle, ammo));
    }
}

/// Drive train that only reports what it was told to do.
#[derive(Debug, Default)]
pub struct LoggingDriveTrain;

impl DriveTrain for LoggingDriveTrain {
    fn execute(&mut self, command: DriverCommand, intensity: Intensity) {
        tracing::info!("[Driver] {:?} ({})", command, intensity);
    }
}

/// Records driver orders; clones share the log.
#[derive(Clone, Default)]
pub struct RecordingDriveTrain {
    orders: Arc<Mutex<Vec<(DriverCommand, Intensity)>>>,
}

impl RecordingDriveTrain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn orders(&self) -> Vec<(DriverCommand, Intensity)> {
        self.orders.lock().clone()
    }
}

impl DriveTrain for RecordingDriveTrain {
    fn execute(&mut self, command: DriverCommand, intensity: Intensity) {
        self.orders.lock().push((command, intensity));
    }
}
