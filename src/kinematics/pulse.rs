//! Servo angle to PWM compare value.
use fugit::MicrosDurationU32;

use crate::config::{
    SERVO_MAX_DEGREE, SERVO_MAX_PULSEWIDTH_US, SERVO_MIN_DEGREE, SERVO_MIN_PULSEWIDTH_US,
    SERVO_TIMEBASE_RESOLUTION,
};
use crate::robot::joint::JointAngle;

/// Pulse width for `angle`, linearly interpolated over the servo's pulse range.
pub fn to_pulse_width(angle: JointAngle) -> MicrosDurationU32 {
    let span_deg = (SERVO_MAX_DEGREE - SERVO_MIN_DEGREE) as u32;
    let span_us = SERVO_MAX_PULSEWIDTH_US - SERVO_MIN_PULSEWIDTH_US;
    let from_min = (angle.degrees() - SERVO_MIN_DEGREE) as u32;
    MicrosDurationU32::from_ticks(from_min * span_us / span_deg + SERVO_MIN_PULSEWIDTH_US)
}

/// Compare value, in timebase ticks, that produces the pulse for `angle`.
pub fn to_pulse_ticks(angle: JointAngle) -> u32 {
    let pulse_us = to_pulse_width(angle).ticks();
    // 1 tick per us at the 1 MHz timebase
    pulse_us * (SERVO_TIMEBASE_RESOLUTION.raw() / 1_000_000)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticks(degrees: i32) -> u32 {
        to_pulse_ticks(JointAngle::new(degrees).unwrap())
    }

    #[test]
    fn endpoints_and_center() {
        assert_eq!(ticks(-90), 500);
        assert_eq!(ticks(0), 1500);
        assert_eq!(ticks(90), 2500);
    }

    #[test]
    fn strictly_increasing() {
        for degrees in -90..90 {
            assert!(ticks(degrees) < ticks(degrees + 1), "at {degrees}");
        }
    }

    #[test]
    fn truncates_fractional_microseconds() {
        // 1 degree is 11.1 us
        assert_eq!(ticks(-89), 511);
        assert_eq!(ticks(45), 2000);
    }

    #[test]
    fn pulse_width_matches_ticks_at_1mhz() {
        let angle = JointAngle::new(30).unwrap();
        assert_eq!(to_pulse_width(angle).ticks(), to_pulse_ticks(angle));
    }
}
