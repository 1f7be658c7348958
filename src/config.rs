//! Compile-time configuration for the biped.
//!
//! Leg geometry, servo pulse range, PWM timebase, per-joint calibration and the
//! queue/network sizes. Nothing here is runtime configurable.
use fugit::HertzU32;

use crate::kinematics::solver::FootPosition;

// LEG SIZE
pub const UPPER_LEG_LEN: f64 = 24.0;
pub const LOWER_LEG_LEN: f64 = 40.0;
/// Horizontal distance between the front pivot (0, 0) and the rear pivot.
pub const REAR_OFFSET: f64 = 21.0;
/// Servo horn mounting correction folded into the solved angles.
pub const HORN_CORRECTION_DEG: f64 = 45.0;

// Please consult the datasheet of your servo before changing the following parameters
pub const SERVO_MIN_PULSEWIDTH_US: u32 = 500;
pub const SERVO_MAX_PULSEWIDTH_US: u32 = 2500;
pub const SERVO_MIN_DEGREE: i32 = -90;
pub const SERVO_MAX_DEGREE: i32 = 90;

/// 1MHz, 1us per tick
pub const SERVO_TIMEBASE_RESOLUTION: HertzU32 = HertzU32::MHz(1);
pub const SERVO_FREQUENCY: HertzU32 = HertzU32::Hz(50);
/// 20000 ticks, 20ms
pub const SERVO_TIMEBASE_PERIOD: u32 = SERVO_TIMEBASE_RESOLUTION.raw() / SERVO_FREQUENCY.raw();

/// Calibration offsets (degrees) between the solved angle and the servo horn zero.
///
/// The solver already applies [`HORN_CORRECTION_DEG`], so these are residual trims
/// measured per joint after mounting the horns.
pub const LEFT_FRONT_ANGLE_OFFSET: i32 = 0;
pub const LEFT_REAR_ANGLE_OFFSET: i32 = 0;
pub const RIGHT_FRONT_ANGLE_OFFSET: i32 = 0;
pub const RIGHT_REAR_ANGLE_OFFSET: i32 = 0;

//SERVO GPIO: [front, rear]
//LEFT: [32, 33]
//RIGHT: [27, 26]
pub const FRONT_LEFT_SERVO: u8 = 32;
pub const BACK_LEFT_SERVO: u8 = 33;
pub const FRONT_RIGHT_SERVO: u8 = 27;
pub const BACK_RIGHT_SERVO: u8 = 26;

// COMMANDS
pub const COMMAND_QUEUE_SIZE: usize = 4;
pub const COMMAND_LINE_CAPACITY: usize = 64;
pub const JOG_STEP: f64 = 5.0;
pub const START_FOOT: FootPosition = FootPosition::new(REAR_OFFSET / 2.0, 20.0);

// NETWORK
pub const PORT: u16 = 3333;
pub const RX_BUF_SIZE: usize = 1024;
pub const TX_BUF_SIZE: usize = 256;
