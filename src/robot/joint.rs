//! Joint identifiers and the validated joint angle.
//!
//! Defines [`Joint`] (front or rear on a leg), [`JointId`] (one of the four joints
//! of the rig) and [`JointAngle`], the only angle type that reaches the hardware.
use core::fmt::Display;

use crate::config::{SERVO_MAX_DEGREE, SERVO_MIN_DEGREE};
use crate::error::ActuationError;
use crate::robot::leg::Side;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Joint {
    Front = 0,
    Rear = 1,
}

impl Display for Joint {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Joint::Front => f.write_str("front"),
            Joint::Rear => f.write_str("rear"),
        }
    }
}

/// One of the four actuated joints.
///
/// The discriminant order is the positional order of the four-value command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JointId {
    LeftFront = 0,
    LeftRear = 1,
    RightFront = 2,
    RightRear = 3,
}

impl JointId {
    pub const ALL: [JointId; 4] = [
        JointId::LeftFront,
        JointId::LeftRear,
        JointId::RightFront,
        JointId::RightRear,
    ];

    pub const fn new(side: Side, joint: Joint) -> Self {
        match (side, joint) {
            (Side::Left, Joint::Front) => JointId::LeftFront,
            (Side::Left, Joint::Rear) => JointId::LeftRear,
            (Side::Right, Joint::Front) => JointId::RightFront,
            (Side::Right, Joint::Rear) => JointId::RightRear,
        }
    }

    /// Maps the operator's 1-based servo selector to a joint.
    pub const fn from_selector(selector: i32) -> Option<Self> {
        match selector {
            1 => Some(JointId::LeftFront),
            2 => Some(JointId::LeftRear),
            3 => Some(JointId::RightFront),
            4 => Some(JointId::RightRear),
            _ => None,
        }
    }

    pub const fn side(self) -> Side {
        match self {
            JointId::LeftFront | JointId::LeftRear => Side::Left,
            JointId::RightFront | JointId::RightRear => Side::Right,
        }
    }

    pub const fn joint(self) -> Joint {
        match self {
            JointId::LeftFront | JointId::RightFront => Joint::Front,
            JointId::LeftRear | JointId::RightRear => Joint::Rear,
        }
    }
}

impl Display for JointId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} {}", self.side(), self.joint())
    }
}

/// Servo angle in degrees, always within `SERVO_MIN_DEGREE..=SERVO_MAX_DEGREE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct JointAngle(i32);

impl JointAngle {
    pub const CENTER: JointAngle = JointAngle(0);
    pub const MIN: JointAngle = JointAngle(SERVO_MIN_DEGREE);
    pub const MAX: JointAngle = JointAngle(SERVO_MAX_DEGREE);

    pub fn new(degrees: i32) -> Result<Self, ActuationError> {
        if (SERVO_MIN_DEGREE..=SERVO_MAX_DEGREE).contains(&degrees) {
            Ok(JointAngle(degrees))
        } else {
            Err(ActuationError::AngleOutOfRange(degrees))
        }
    }

    pub const fn degrees(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for JointAngle {
    type Error = ActuationError;

    fn try_from(degrees: i32) -> Result<Self, Self::Error> {
        JointAngle::new(degrees)
    }
}

impl PartialEq<i32> for JointAngle {
    fn eq(&self, other: &i32) -> bool {
        self.0 == *other
    }
}

impl Display for JointAngle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}°", self.0)
    }
}
