//! Leg kinematics and servo conversion.
//!
//! - [`solver`] turns a foot target into front/rear joint angles.
//! - [`mapping`] applies per-joint calibration and the left/right mirroring.
//! - [`pulse`] converts a servo angle to a PWM compare value.
//!
//! Everything here is pure and can run on any task.
pub mod mapping;
pub mod pulse;
pub mod solver;
