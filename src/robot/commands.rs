//! Command records decoded from operator lines.
//!
//! Grammars accepted on one line:
//! - `a,b,c,d`: absolute angles for left-front, left-rear, right-front, right-rear
//! - `L,x,y` / `R,x,y`: foot target for one leg
//! - `w a s d` / `i j k l` / `r`: jog the left/right foot target, or reset both
//! - a bare integer: servo selector or angle, depending on the dispatcher state
use heapless::Vec;

use super::leg::Side;
use crate::error::ActuationError;
use crate::kinematics::solver::FootPosition;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CommandRecord {
    /// Direct angles in [`JointId::ALL`](super::joint::JointId::ALL) order.
    Quad([i32; 4]),
    Foot { side: Side, foot: FootPosition },
    Jog(Jog),
    /// A lone integer; the dispatcher decides whether it is a selector or an angle.
    Number(i32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Jog {
    Step { side: Side, dx: f64, dy: f64 },
    Reset,
}

impl Jog {
    /// Key bindings of the single-key jog mode, `step` units per press.
    pub fn from_key(key: char, step: f64) -> Option<Self> {
        let (side, dx, dy) = match key {
            'w' => (Side::Left, 0.0, step),
            'a' => (Side::Left, step, 0.0),
            's' => (Side::Left, 0.0, -step),
            'd' => (Side::Left, -step, 0.0),
            'i' => (Side::Right, 0.0, step),
            'j' => (Side::Right, step, 0.0),
            'k' => (Side::Right, 0.0, -step),
            'l' => (Side::Right, -step, 0.0),
            'r' => return Some(Jog::Reset),
            _ => return None,
        };
        Some(Jog::Step { side, dx, dy })
    }
}

impl CommandRecord {
    /// Decodes one line. Anything that does not yield every field of its grammar is
    /// an [`ActuationError::IncompleteCommand`].
    pub fn parse(line: &str, jog_step: f64) -> Result<Self, ActuationError> {
        let line = line.trim();

        let mut chars = line.chars();
        if let (Some(key), None) = (chars.next(), chars.next()) {
            if let Some(jog) = Jog::from_key(key, jog_step) {
                return Ok(CommandRecord::Jog(jog));
            }
        }

        if !line.contains(',') {
            return line
                .parse::<i32>()
                .map(CommandRecord::Number)
                .map_err(|_| ActuationError::IncompleteCommand);
        }

        let fields: Vec<&str, 4> = line.split(',').map(str::trim).take(4).collect();
        match fields.first().copied() {
            Some("L" | "l") => Self::parse_foot(Side::Left, &fields[1..]),
            Some("R" | "r") => Self::parse_foot(Side::Right, &fields[1..]),
            _ => Self::parse_quad(&fields),
        }
    }

    fn parse_quad(fields: &[&str]) -> Result<Self, ActuationError> {
        let mut angles = [0; 4];
        if fields.len() < angles.len() {
            return Err(ActuationError::IncompleteCommand);
        }
        for (angle, field) in angles.iter_mut().zip(fields) {
            *angle = field
                .parse()
                .map_err(|_| ActuationError::IncompleteCommand)?;
        }
        Ok(CommandRecord::Quad(angles))
    }

    fn parse_foot(side: Side, fields: &[&str]) -> Result<Self, ActuationError> {
        let [x, y, ..] = fields else {
            return Err(ActuationError::IncompleteCommand);
        };
        let x = x.parse().map_err(|_| ActuationError::IncompleteCommand)?;
        let y = y.parse().map_err(|_| ActuationError::IncompleteCommand)?;
        Ok(CommandRecord::Foot {
            side,
            foot: FootPosition::new(x, y),
        })
    }
}
