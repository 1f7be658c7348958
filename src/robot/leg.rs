use core::fmt::Display;

use embedded_hal::pwm::SetDutyCycle;
use log::info;

use super::joint::{Joint, JointId};
use super::servo::ServoChannel;
use crate::config::{
    LEFT_FRONT_ANGLE_OFFSET, LEFT_REAR_ANGLE_OFFSET, RIGHT_FRONT_ANGLE_OFFSET,
    RIGHT_REAR_ANGLE_OFFSET,
};
use crate::error::ActuationError;
use crate::kinematics::mapping::map_angle;
use crate::kinematics::solver::{FootPosition, LegGeometry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left = 0,
    Right = 1,
}

impl Side {
    /// Hardware PWM group that generates this leg's timer.
    pub const fn clock_group(self) -> ClockGroup {
        match self {
            Side::Left => ClockGroup::Group0,
            Side::Right => ClockGroup::Group1,
        }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

/// Independently clocked PWM peripheral (MCPWM0 / MCPWM1 on the ESP32).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockGroup {
    Group0 = 0,
    Group1 = 1,
}

/// Per-joint calibration offsets of one leg, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegCalibration {
    pub front_offset: i32,
    pub rear_offset: i32,
}

impl LegCalibration {
    pub const fn for_side(side: Side) -> Self {
        match side {
            Side::Left => LegCalibration {
                front_offset: LEFT_FRONT_ANGLE_OFFSET,
                rear_offset: LEFT_REAR_ANGLE_OFFSET,
            },
            Side::Right => LegCalibration {
                front_offset: RIGHT_FRONT_ANGLE_OFFSET,
                rear_offset: RIGHT_REAR_ANGLE_OFFSET,
            },
        }
    }
}

/// A leg: front and rear servo sharing one timer.
#[derive(Debug)]
pub struct LegActuator<F, R> {
    front: ServoChannel<F>,
    rear: ServoChannel<R>,
    side: Side,
    geometry: LegGeometry,
}

impl<F, R> LegActuator<F, R>
where
    F: SetDutyCycle,
    R: SetDutyCycle,
{
    /// Wraps the leg's two PWM channels, centring both servos.
    pub fn new(
        side: Side,
        front_pwm: F,
        rear_pwm: R,
        calibration: LegCalibration,
    ) -> Result<Self, ActuationError> {
        let front = ServoChannel::new(
            front_pwm,
            JointId::new(side, Joint::Front),
            calibration.front_offset,
        )?;
        let rear = ServoChannel::new(
            rear_pwm,
            JointId::new(side, Joint::Rear),
            calibration.rear_offset,
        )?;
        info!("[LEG] {side} leg setup on clock group {:?}", side.clock_group());

        Ok(Self {
            front,
            rear,
            side,
            geometry: LegGeometry::DEFAULT,
        })
    }

    /// Moves the foot to `foot` through the solver and the calibration mapping.
    ///
    /// The front joint is written first. If the rear write then fails, the front
    /// joint keeps its new angle.
    pub fn set_foot_position(&mut self, foot: FootPosition) -> Result<(), ActuationError> {
        let (front_solved, rear_solved) = self.geometry.solve(foot)?.truncated();

        let front_angle = map_angle(
            self.side,
            Joint::Front,
            front_solved,
            self.front.angle_offset(),
        );
        let rear_angle = map_angle(self.side, Joint::Rear, rear_solved, self.rear.angle_offset());

        self.front.set_angle(front_angle)?;
        self.rear.set_angle(rear_angle)?;

        info!(
            "[LEG] Set {} leg to ({}, {}): angles {}, {}",
            self.side, foot.x, foot.y, front_angle, rear_angle
        );
        Ok(())
    }

    /// Writes `degrees` straight to one joint.
    ///
    /// No calibration offset or mirroring is applied on this path.
    pub fn set_joint_angle(&mut self, joint: Joint, degrees: i32) -> Result<(), ActuationError> {
        match joint {
            Joint::Front => self.front.set_angle(degrees),
            Joint::Rear => self.rear.set_angle(degrees),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn clock_group(&self) -> ClockGroup {
        self.side.clock_group()
    }

    pub fn front(&self) -> &ServoChannel<F> {
        &self.front
    }

    pub fn rear(&self) -> &ServoChannel<R> {
        &self.rear
    }
}
