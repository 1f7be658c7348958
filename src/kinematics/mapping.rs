//! Solved angle to servo angle, per side.
//!
//! The two legs are mounted mirrored, so the sign of the calibration arithmetic
//! flips between sides and between the front and rear joint of a leg.
use crate::error::ActuationError;
use crate::robot::joint::{Joint, JointAngle};
use crate::robot::leg::Side;

/// Applies the calibration offset and mirroring rule without range checking.
pub const fn map_angle(side: Side, joint: Joint, solved: i32, angle_offset: i32) -> i32 {
    match (side, joint) {
        (Side::Left, Joint::Front) => solved - angle_offset,
        (Side::Left, Joint::Rear) => angle_offset - solved,
        (Side::Right, Joint::Front) => angle_offset - solved,
        (Side::Right, Joint::Rear) => solved - angle_offset,
    }
}

/// [`map_angle`] followed by the servo range check.
pub fn to_actuator_angle(
    side: Side,
    joint: Joint,
    solved: i32,
    angle_offset: i32,
) -> Result<JointAngle, ActuationError> {
    JointAngle::new(map_angle(side, joint, solved, angle_offset))
}
