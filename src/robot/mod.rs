//! Core robot types: joints, servo channels, legs, the rig and the command path.
//!
//! - [`joint`]: joint identifiers and the validated [`joint::JointAngle`].
//! - [`servo`]: [`servo::ServoChannel`], one PWM comparator driving one servo.
//! - [`leg`]: [`leg::LegActuator`], front and rear servo on one timer.
//! - [`rig`]: [`rig::BipedRig`], both legs on separate clock groups.
//! - [`commands`]: decoding of operator lines into [`commands::CommandRecord`].
//! - [`dispatcher`]: [`dispatcher::CommandDispatcher`], the single consumer of the
//!   command queue.
use crate::error::ActuationError;
use crate::kinematics::solver::FootPosition;

pub mod commands;
pub mod dispatcher;
pub mod joint;
pub mod leg;
pub mod rig;
pub mod servo;

use joint::JointId;
use leg::Side;

/// Joint-level actuation, the surface a dispatcher or gait engine drives.
pub trait Actuation {
    /// Writes `degrees` to `joint` without calibration.
    fn set_joint_angle(&mut self, joint: JointId, degrees: i32) -> Result<(), ActuationError>;

    /// Moves one foot through the leg solver.
    fn set_foot_position(&mut self, side: Side, foot: FootPosition) -> Result<(), ActuationError>;
}
