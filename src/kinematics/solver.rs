//! Planar two-link inverse kinematics for one leg.
//!
//! The leg is a five-bar linkage: the front servo pivots at (0, 0), the rear servo at
//! (`REAR_OFFSET`, 0), and both drive an upper/lower link pair meeting at the foot.
//! Each joint angle is recovered from the triangle {upper link, lower link, pivot-to-foot
//! distance}: its area (Heron) gives the knee height over the hypotenuse, the height
//! gives the knee bend, and the polar angle of the foot closes the sum.
use core::f64::consts::PI;

use crate::config::{HORN_CORRECTION_DEG, LOWER_LEG_LEN, REAR_OFFSET, UPPER_LEG_LEN};
use crate::error::ActuationError;

/// Foot target in the leg's local frame, origin on the front pivot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FootPosition {
    pub x: f64,
    pub y: f64,
}

impl FootPosition {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Solved joint angles in degrees, before calibration and mirroring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolvedAngles {
    pub front: f64,
    pub rear: f64,
}

impl SolvedAngles {
    /// Whole degrees, truncated toward zero.
    pub fn truncated(&self) -> (i32, i32) {
        (self.front as i32, self.rear as i32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegGeometry {
    pub upper: f64,
    pub lower: f64,
    pub rear_offset: f64,
}

impl LegGeometry {
    pub const DEFAULT: LegGeometry = LegGeometry {
        upper: UPPER_LEG_LEN,
        lower: LOWER_LEG_LEN,
        rear_offset: REAR_OFFSET,
    };

    /// Returns the front and rear joint angles that put the foot at `foot`.
    ///
    /// Fails with [`ActuationError::UnreachableTarget`] when either pivot-to-foot
    /// distance breaks the triangle inequality or is zero.
    pub fn solve(&self, foot: FootPosition) -> Result<SolvedAngles, ActuationError> {
        let FootPosition { x, y } = foot;

        let front_hypo = libm::hypot(x, y);
        let rear_hypo = libm::hypot(x - self.rear_offset, y);

        let front_knee = self.knee_angle(front_hypo)?;
        let rear_knee = self.knee_angle(rear_hypo)?;

        let front_polar = libm::atan2(y, x);
        let rear_polar = libm::atan2(y, self.rear_offset - x);

        let front = 180.0 - to_degrees(front_knee + front_polar) - HORN_CORRECTION_DEG;
        let rear = -(180.0 - to_degrees(rear_knee + rear_polar)) + HORN_CORRECTION_DEG;

        Ok(SolvedAngles { front, rear })
    }

    /// Whether both pivots can reach `foot`.
    pub fn is_reachable(&self, foot: FootPosition) -> bool {
        self.reaches(libm::hypot(foot.x, foot.y))
            && self.reaches(libm::hypot(foot.x - self.rear_offset, foot.y))
    }

    fn reaches(&self, hypo: f64) -> bool {
        let min = libm::fabs(self.upper - self.lower);
        let max = self.upper + self.lower;
        hypo > 0.0 && (min..=max).contains(&hypo)
    }

    /// Angle (radians) between the upper link and the pivot-to-foot line.
    fn knee_angle(&self, hypo: f64) -> Result<f64, ActuationError> {
        if !self.reaches(hypo) {
            return Err(ActuationError::UnreachableTarget);
        }

        let semi_perimeter = (hypo + self.upper + self.lower) / 2.0;
        let radicand = semi_perimeter
            * (semi_perimeter - self.upper)
            * (semi_perimeter - self.lower)
            * (semi_perimeter - hypo);
        // Degenerate (flat) triangles at the workspace boundary can round below zero.
        let area = libm::sqrt(radicand.max(0.0));
        let height = 2.0 * area / hypo;

        let mut angle = libm::asin((height / self.upper).min(1.0));
        let lower_run = libm::sqrt((self.lower * self.lower - height * height).max(0.0));
        if lower_run > hypo {
            angle = PI - angle;
        }
        Ok(angle)
    }
}

impl Default for LegGeometry {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Solves `foot` with the built-in leg geometry.
pub fn solve(foot: FootPosition) -> Result<SolvedAngles, ActuationError> {
    LegGeometry::DEFAULT.solve(foot)
}

fn to_degrees(radians: f64) -> f64 {
    radians * 180.0 / PI
}
