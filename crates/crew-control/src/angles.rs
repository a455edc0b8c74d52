//! Degree-based angle helpers. Y is up and heading 0 looks down +Z, growing
//! toward +X.

use glam::Vec3;

/// Wrap an angle into `(-180, 180]`.
pub fn normalize_angle(deg: f32) -> f32 {
    let wrapped = deg.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Shortest signed rotation from `from` to `to`.
pub fn delta_angle(from: f32, to: f32) -> f32 {
    normalize_angle(to - from)
}

/// Rotate `current` toward `target` by at most `max_step` degrees along the
/// shorter arc. Lands exactly on `target` once within reach.
pub fn move_towards_angle(current: f32, target: f32, max_step: f32) -> f32 {
    let delta = delta_angle(current, target);
    if delta.abs() <= max_step {
        normalize_angle(target)
    } else {
        normalize_angle(current + max_step.max(0.0) * delta.signum())
    }
}

/// Heading of `v` projected on the ground plane, `None` when `v` is vertical.
pub fn heading_of(v: Vec3) -> Option<f32> {
    if v.x * v.x + v.z * v.z <= f32::EPSILON {
        return None;
    }
    Some(v.x.atan2(v.z).to_degrees())
}

/// Angle of `v` above the ground plane.
pub fn elevation_of(v: Vec3) -> f32 {
    let ground = (v.x * v.x + v.z * v.z).sqrt();
    v.y.atan2(ground).to_degrees()
}

/// Unit vector for a heading and elevation in degrees.
pub fn direction_from(heading_deg: f32, elevation_deg: f32) -> Vec3 {
    let (sy, cy) = heading_deg.to_radians().sin_cos();
    let (sp, cp) = elevation_deg.to_radians().sin_cos();
    Vec3::new(cp * sy, sp, cp * cy)
}
