use embedded_hal::pwm::SetDutyCycle;
use log::{error, info};

use super::joint::{JointAngle, JointId};
use super::leg::{LegActuator, Side};
use super::Actuation;
use crate::error::ActuationError;
use crate::kinematics::solver::FootPosition;

/// Both legs of the robot, each on its own clock group.
#[derive(Debug)]
pub struct BipedRig<LF, LR, RF, RR> {
    left: LegActuator<LF, LR>,
    right: LegActuator<RF, RR>,
}

impl<LF, LR, RF, RR> BipedRig<LF, LR, RF, RR>
where
    LF: SetDutyCycle,
    LR: SetDutyCycle,
    RF: SetDutyCycle,
    RR: SetDutyCycle,
{
    /// Fails with [`ActuationError::ClockGroupConflict`] unless `left` is the left leg
    /// and `right` the right one, which puts them on distinct clock groups.
    pub fn new(
        left: LegActuator<LF, LR>,
        right: LegActuator<RF, RR>,
    ) -> Result<Self, ActuationError> {
        if left.side() != Side::Left
            || right.side() != Side::Right
            || left.clock_group() == right.clock_group()
        {
            error!("[RIG] legs handed to the wrong side");
            return Err(ActuationError::ClockGroupConflict);
        }
        info!("[RIG] Both legs set up and ready to roll!");
        Ok(Self { left, right })
    }

    pub fn left(&self) -> &LegActuator<LF, LR> {
        &self.left
    }

    pub fn right(&self) -> &LegActuator<RF, RR> {
        &self.right
    }

    /// Last commanded angle of `joint`.
    pub fn current_angle(&self, joint: JointId) -> JointAngle {
        match joint {
            JointId::LeftFront => self.left.front().current_angle(),
            JointId::LeftRear => self.left.rear().current_angle(),
            JointId::RightFront => self.right.front().current_angle(),
            JointId::RightRear => self.right.rear().current_angle(),
        }
    }

    /// All four angles in command-line order.
    pub fn current_angles(&self) -> [JointAngle; 4] {
        JointId::ALL.map(|joint| self.current_angle(joint))
    }
}

impl<LF, LR, RF, RR> Actuation for BipedRig<LF, LR, RF, RR>
where
    LF: SetDutyCycle,
    LR: SetDutyCycle,
    RF: SetDutyCycle,
    RR: SetDutyCycle,
{
    fn set_joint_angle(&mut self, joint: JointId, degrees: i32) -> Result<(), ActuationError> {
        let result = match joint.side() {
            Side::Left => self.left.set_joint_angle(joint.joint(), degrees),
            Side::Right => self.right.set_joint_angle(joint.joint(), degrees),
        };
        result.inspect_err(|e| error!("[RIG] {joint} not set to {degrees}: {e}"))
    }

    fn set_foot_position(&mut self, side: Side, foot: FootPosition) -> Result<(), ActuationError> {
        let result = match side {
            Side::Left => self.left.set_foot_position(foot),
            Side::Right => self.right.set_foot_position(foot),
        };
        result.inspect_err(|e| error!("[RIG] {side} foot not moved to ({}, {}): {e}", foot.x, foot.y))
    }
}
