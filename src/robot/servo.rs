use embedded_hal::pwm::SetDutyCycle;
use log::{debug, error};

use crate::config::SERVO_TIMEBASE_PERIOD;
use crate::error::ActuationError;
use crate::kinematics::pulse::to_pulse_ticks;
use crate::robot::joint::{JointAngle, JointId};

/// One servo: a PWM comparator/generator pair on its leg's timer.
#[derive(Debug)]
pub struct ServoChannel<PWM> {
    pwm: PWM,
    max_duty: u32,
    current_angle: JointAngle,
    angle_offset: i32,
    joint_id: JointId,
}

impl<PWM> ServoChannel<PWM>
where
    PWM: SetDutyCycle,
{
    /// Takes ownership of `pwm` and centres the servo.
    ///
    /// Fails with [`ActuationError::HardwareFault`] if the centring write is rejected.
    pub fn new(pwm: PWM, joint_id: JointId, angle_offset: i32) -> Result<Self, ActuationError> {
        let max_duty = pwm.max_duty_cycle() as u32;
        let mut servo = Self {
            pwm,
            max_duty,
            current_angle: JointAngle::CENTER,
            angle_offset,
            joint_id,
        };
        servo.write(JointAngle::CENTER)?;
        Ok(servo)
    }

    /// Sets the servo angle in degrees.
    ///
    /// # Returns
    /// * `Ok(())` on success
    /// * `Err(AngleOutOfRange)` if `degrees` is outside [-90, 90]; nothing is written
    /// * `Err(HardwareFault)` if the PWM driver fails to update the compare value
    pub fn set_angle(&mut self, degrees: i32) -> Result<(), ActuationError> {
        let angle = JointAngle::new(degrees).inspect_err(|e| {
            error!("[SERVO] {} rejected: {e}", self.joint_id);
        })?;
        self.write(angle)?;
        self.current_angle = angle;
        Ok(())
    }

    fn write(&mut self, angle: JointAngle) -> Result<(), ActuationError> {
        let ticks = to_pulse_ticks(angle);
        // max_duty + 1 counter steps make up one period
        let duty = (ticks * (self.max_duty + 1) / SERVO_TIMEBASE_PERIOD).min(self.max_duty) as u16;
        debug!("[SERVO] {} -> {angle} ({duty})", self.joint_id);
        self.pwm.set_duty_cycle(duty).map_err(|e| {
            error!(
                "[SERVO] {} Error writing angle {}: {:?}",
                self.joint_id, angle, e
            );
            ActuationError::HardwareFault
        })
    }

    pub fn current_angle(&self) -> JointAngle {
        self.current_angle
    }

    pub fn angle_offset(&self) -> i32 {
        self.angle_offset
    }

    pub fn joint_id(&self) -> JointId {
        self.joint_id
    }

    /// The underlying PWM channel.
    pub fn pwm(&self) -> &PWM {
        &self.pwm
    }
}
