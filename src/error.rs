//! Error taxonomy shared by the solver, the servo channels and the dispatcher.
use core::fmt::{self, Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuationError {
    /// Foot target outside the leg's workspace, or on top of a pivot.
    UnreachableTarget,
    /// Joint angle (degrees) outside the servo range after mapping.
    AngleOutOfRange(i32),
    /// A command line decoded fewer fields than its grammar requires.
    IncompleteCommand,
    /// The PWM channel rejected a compare write.
    HardwareFault,
    /// A leg was handed to the rig side that does not own its clock group.
    ClockGroupConflict,
}

impl Display for ActuationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ActuationError::UnreachableTarget => f.write_str("unreachable foot target"),
            ActuationError::AngleOutOfRange(angle) => {
                write!(f, "angle {angle} outside servo range")
            }
            ActuationError::IncompleteCommand => f.write_str("incomplete command"),
            ActuationError::HardwareFault => f.write_str("pwm channel rejected the write"),
            ActuationError::ClockGroupConflict => f.write_str("leg placed on the wrong clock group"),
        }
    }
}

impl core::error::Error for ActuationError {}
