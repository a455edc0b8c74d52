//! Gunner station: ranging, rate-limited laying of the gun and firing

use crate::angles::{
    delta_angle, direction_from, elevation_of, heading_of, move_towards_angle,
};
use crate::config::GunnerConfig;
use crate::error::{CommandRejected, Result};
use crate::traits::{AmmoFeed, DesignationSource, FireEffect, TurretRig};
use crate::types::{GunnerPhase, GunnerState, MuzzlePose};
use glam::Vec3;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Task {
    Idle,
    Aligning,
    Aiming(Vec3),
}

pub struct GunnerController {
    config: GunnerConfig,
    task: Task,
    range_m: f32,
    rig: Box<dyn TurretRig>,
    designation: Box<dyn DesignationSource>,
    fire_effect: Box<dyn FireEffect>,
}

impl GunnerController {
    pub fn new(
        config: GunnerConfig,
        rig: Box<dyn TurretRig>,
        designation: Box<dyn DesignationSource>,
        fire_effect: Box<dyn FireEffect>,
    ) -> Result<Self> {
        config.validate()?;
        let range_m = config
            .initial_range_m
            .clamp(config.min_range_m, config.max_range_m);
        Ok(Self {
            config,
            task: Task::Idle,
            range_m,
            rig,
            designation,
            fire_effect,
        })
    }

    pub fn config(&self) -> &GunnerConfig {
        &self.config
    }

    /// Set the sight range, clamped to the configured bounds. Returns the
    /// range now in effect.
    pub fn set_range(&mut self, meters: f32) -> f32 {
        if meters.is_nan() {
            tracing::warn!("[Gunner] ignoring NaN range");
            return self.range_m;
        }
        self.range_m = meters.clamp(self.config.min_range_m, self.config.max_range_m);
        tracing::info!("[Gunner] range set to {:.0}m", self.range_m);
        self.range_m
    }

    /// Shift the sight range by `delta_m`, clamped like [`Self::set_range`].
    pub fn nudge_range(&mut self, delta_m: f32) -> f32 {
        self.set_range(self.range_m + delta_m)
    }

    pub fn range_m(&self) -> f32 {
        self.range_m
    }

    /// Lay the gun on the commander's designated point.
    pub fn aim(&mut self) -> std::result::Result<(), CommandRejected> {
        let Some(target) = self.designation.try_get_last_point() else {
            return Err(CommandRejected::NoDesignatedPoint);
        };
        self.task = Task::Aiming(target);
        tracing::info!("[Gunner] aiming at {:?}", target);
        Ok(())
    }

    /// Bring the turret back over the hull front with the gun level.
    pub fn align_hull(&mut self) {
        self.task = Task::Aligning;
        tracing::info!("[Gunner] aligning turret with hull");
    }

    /// Drop any aiming or aligning task. The current pose is held.
    pub fn cease_action(&mut self) {
        if self.task != Task::Idle {
            tracing::info!("[Gunner] ceasing {}", self.phase());
        }
        self.task = Task::Idle;
    }

    /// Fire the loaded round. The gunner keeps its current task.
    pub fn fire(
        &mut self,
        feed: &mut dyn AmmoFeed,
    ) -> std::result::Result<(), CommandRejected> {
        if feed.is_loading() {
            return Err(CommandRejected::Reloading);
        }
        if !feed.is_loaded() {
            return Err(CommandRejected::NotLoaded);
        }

        let ammo = feed.loaded_ammo();
        let muzzle = self.muzzle_pose();
        self.fire_effect.spawn_projectile(muzzle, ammo);
        feed.consume_round();
        tracing::info!("[Gunner] fired {} at {:.0}m", ammo, self.range_m);
        Ok(())
    }

    /// Advance the current task by `dt`.
    pub fn tick(&mut self, dt: Duration) {
        let dt = dt.as_secs_f32();
        match self.task {
            Task::Idle => {}
            Task::Aiming(target) => self.step_aim(target, dt),
            Task::Aligning => self.step_align(dt),
        }
    }

    fn step_aim(&mut self, target: Vec3, dt: f32) {
        let to_target = target - self.rig.turret_position();

        if let Some(bearing) = heading_of(to_target) {
            let yaw = move_towards_angle(
                self.rig.turret_yaw_deg(),
                bearing,
                self.config.yaw_speed_deg * dt,
            );
            self.rig.set_turret_yaw_deg(yaw);
        }

        // only the goal is held inside the envelope; a gun outside it is
        // walked back at the elevation rate
        let (low, high) = self.config.pitch_limits_deg;
        let wanted = elevation_of(to_target).clamp(low, high);
        let pitch = move_towards_angle(
            self.rig.gun_pitch_deg(),
            wanted,
            self.config.pitch_speed_deg * dt,
        );
        self.rig.set_gun_pitch_deg(pitch);
    }

    fn step_align(&mut self, dt: f32) {
        let heading = self.rig.hull_heading_deg();
        let yaw = move_towards_angle(
            self.rig.turret_yaw_deg(),
            heading,
            self.config.yaw_speed_deg * dt,
        );
        let pitch = move_towards_angle(
            self.rig.gun_pitch_deg(),
            0.0,
            self.config.pitch_speed_deg * dt,
        );
        self.rig.set_turret_yaw_deg(yaw);
        self.rig.set_gun_pitch_deg(pitch);

        let tol = self.config.align_tolerance_deg;
        if delta_angle(yaw, heading).abs() <= tol && pitch.abs() <= tol {
            self.task = Task::Idle;
            tracing::info!("[Gunner] turret aligned");
        }
    }

    /// Where a round would leave the barrel right now.
    pub fn muzzle_pose(&self) -> MuzzlePose {
        let direction = direction_from(self.rig.turret_yaw_deg(), self.rig.gun_pitch_deg());
        MuzzlePose {
            origin: self.rig.turret_position() + direction * self.config.muzzle_offset_m,
            direction,
        }
    }

    pub fn phase(&self) -> GunnerPhase {
        match self.task {
            Task::Idle => GunnerPhase::Idle,
            Task::Aligning => GunnerPhase::Aligning,
            Task::Aiming(_) => GunnerPhase::Aiming,
        }
    }

    pub fn state(&self) -> GunnerState {
        let target = match self.task {
            Task::Aiming(p) => Some(p),
            _ => None,
        };
        GunnerState {
            phase: self.phase(),
            target,
            range_m: self.range_m,
            turret_yaw_deg: self.rig.turret_yaw_deg(),
            gun_pitch_deg: self.rig.gun_pitch_deg(),
        }
    }
}
