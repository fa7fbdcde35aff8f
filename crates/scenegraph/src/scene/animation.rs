//! Animation behaviors for transform nodes
//!
//! An animation is a function from elapsed time to a matrix. The container
//! pairs each registered behavior with a transform node by name and writes
//! the produced matrix into the node's animation slot every tick, so
//! behaviors stay decoupled from the tree structure.

use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec3};

/// A time-driven animation transform
///
/// Called once per tick with the elapsed time in seconds; the returned
/// matrix replaces the target transform node's animation transform.
pub type AnimationFn = Box<dyn FnMut(f32) -> Mat4 + Send>;

/// Back-and-forth translation along an axis
///
/// The target oscillates between `-amplitude` and `+amplitude` world units
/// along `axis`, completing a full cycle every `2π / speed` seconds.
pub fn shuttle(axis: Vec3, amplitude: f32, speed: f32) -> AnimationFn {
    Box::new(move |t| {
        let offset = axis * (amplitude * (speed * t).sin());
        Mat4::translation(offset.x, offset.y, offset.z)
    })
}

/// Continuous rotation about an axis through the node's origin
pub fn orbit(axis: Vec3, degrees_per_second: f32) -> AnimationFn {
    Box::new(move |t| Mat4::rotation(utils::deg_to_rad(degrees_per_second * t), axis))
}

/// Pendulum rotation about an axis
///
/// Swings between `-amplitude_degrees` and `+amplitude_degrees`, the way a
/// walking figure's limb pivots at its joint.
pub fn swing(axis: Vec3, amplitude_degrees: f32, speed: f32) -> AnimationFn {
    Box::new(move |t| {
        let angle = utils::deg_to_rad(amplitude_degrees) * (speed * t).sin();
        Mat4::rotation(angle, axis)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec4;
    use approx::assert_relative_eq;
    use std::f32::consts::PI;

    #[test]
    fn test_shuttle_oscillates() {
        let mut anim = shuttle(Vec3::new(1.0, 0.0, 0.0), 2.0, 1.0);

        let at_zero = anim(0.0) * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(at_zero.x, 0.0, epsilon = 1e-6);

        let at_peak = anim(PI / 2.0) * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(at_peak.x, 2.0, epsilon = 1e-5);

        let at_trough = anim(3.0 * PI / 2.0) * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(at_trough.x, -2.0, epsilon = 1e-5);
    }

    #[test]
    fn test_orbit_rotates_at_constant_rate() {
        let mut anim = orbit(Vec3::new(0.0, 1.0, 0.0), 90.0);
        let rotated = anim(1.0) * Vec4::new(1.0, 0.0, 0.0, 0.0);
        // 90 degrees about Y carries +X to -Z
        assert_relative_eq!(rotated.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(rotated.z, -1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_swing_stays_within_amplitude() {
        let mut anim = swing(Vec3::new(0.0, 0.0, 1.0), 30.0, 1.0);
        for step in 0..100 {
            let t = step as f32 * 0.1;
            let rotated = anim(t) * Vec4::new(0.0, -1.0, 0.0, 0.0);
            // a limb hanging along -Y never rises above the 30 degree cone
            assert!(rotated.y <= -(utils::deg_to_rad(30.0).cos()) + 1e-5);
        }
    }
}
