//! Command dispatcher: the single consumer of the command queue.
//!
//! Lines are decoded into [`CommandRecord`]s and applied to the rig one at a time,
//! each fully applied before the next line is received. Direct servo selection is a
//! two-line exchange: a selector line (1..4) puts the dispatcher in
//! [`DispatchState::AwaitAngle`], and the following line is read as that joint's angle.
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Receiver;
use log::{debug, error, info, warn};

use super::commands::{CommandRecord, Jog};
use super::joint::JointId;
use super::leg::Side;
use super::Actuation;
use crate::config::{JOG_STEP, START_FOOT};
use crate::error::ActuationError;
use crate::kinematics::solver::FootPosition;
use crate::transport::CommandLine;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    AwaitSelector,
    /// `None` when the selector was out of range; the next line is discarded.
    AwaitAngle(Option<JointId>),
}

pub struct CommandDispatcher<A> {
    actuator: A,
    state: DispatchState,
    feet: [FootPosition; 2],
}

impl<A: Actuation> CommandDispatcher<A> {
    pub fn new(actuator: A) -> Self {
        Self {
            actuator,
            state: DispatchState::AwaitSelector,
            feet: [START_FOOT; 2],
        }
    }

    /// Receives lines forever, applying each before waiting for the next.
    pub async fn run<M: RawMutex, const N: usize>(
        &mut self,
        receiver: Receiver<'_, M, CommandLine, N>,
    ) {
        info!("[DISPATCH] waiting for commands");
        loop {
            // Failures are logged where they happen
            let _ = self.step(&receiver).await;
        }
    }

    /// Waits for one line and applies it.
    pub async fn step<M: RawMutex, const N: usize>(
        &mut self,
        receiver: &Receiver<'_, M, CommandLine, N>,
    ) -> Result<(), ActuationError> {
        let line = receiver.receive().await;
        self.handle_line(&line)
    }

    /// Decodes and applies one line.
    ///
    /// For a four-angle line every joint is attempted; the first failure is returned
    /// after the remaining joints have been written.
    pub fn handle_line(&mut self, line: &str) -> Result<(), ActuationError> {
        debug!("[DISPATCH] received '{}'", line.trim());

        if let DispatchState::AwaitAngle(joint) = self.state {
            self.state = DispatchState::AwaitSelector;
            return self.apply_selected_angle(joint, line);
        }

        let record = CommandRecord::parse(line, JOG_STEP).inspect_err(|e| {
            warn!("[DISPATCH] discarded '{}': {e}", line.trim());
        })?;

        match record {
            CommandRecord::Number(selector) => {
                let joint = JointId::from_selector(selector);
                match joint {
                    Some(joint) => info!("[DISPATCH] Servo {selector} ({joint}) selected"),
                    None => warn!("[DISPATCH] Bad servo selection {selector}"),
                }
                self.state = DispatchState::AwaitAngle(joint);
                Ok(())
            }
            CommandRecord::Quad(angles) => self.apply_quad(angles),
            CommandRecord::Foot { side, foot } => {
                self.feet[side as usize] = foot;
                self.actuator.set_foot_position(side, foot)
            }
            CommandRecord::Jog(jog) => self.apply_jog(jog),
        }
    }

    fn apply_selected_angle(
        &mut self,
        joint: Option<JointId>,
        line: &str,
    ) -> Result<(), ActuationError> {
        let angle = line.trim().parse::<i32>().map_err(|_| {
            warn!("[DISPATCH] expected an angle, got '{}'", line.trim());
            ActuationError::IncompleteCommand
        })?;
        match joint {
            Some(joint) => {
                info!("[DISPATCH] Servo {joint} set to angle {angle}");
                self.actuator.set_joint_angle(joint, angle)
            }
            None => {
                error!("[DISPATCH] Bad servo selection, angle {angle} discarded");
                Err(ActuationError::IncompleteCommand)
            }
        }
    }

    fn apply_quad(&mut self, angles: [i32; 4]) -> Result<(), ActuationError> {
        let mut result = Ok(());
        for (joint, angle) in JointId::ALL.into_iter().zip(angles) {
            if let Err(e) = self.actuator.set_joint_angle(joint, angle) {
                warn!("[DISPATCH] {joint} skipped: {e}");
                result = result.and(Err(e));
            }
        }
        result
    }

    fn apply_jog(&mut self, jog: Jog) -> Result<(), ActuationError> {
        match jog {
            Jog::Step { side, dx, dy } => {
                let foot = &mut self.feet[side as usize];
                foot.x += dx;
                foot.y += dy;
            }
            Jog::Reset => self.feet = [START_FOOT; 2],
        }
        let [left, right] = self.feet;
        info!(
            "[DISPATCH] Set left leg to ({},{}) and right leg to ({},{})",
            left.x, left.y, right.x, right.y
        );
        let left = self.actuator.set_foot_position(Side::Left, left);
        let right = self.actuator.set_foot_position(Side::Right, right);
        left.and(right)
    }

    pub fn state(&self) -> DispatchState {
        self.state
    }

    /// Foot target the jog commands move from.
    pub fn foot_target(&self, side: Side) -> FootPosition {
        self.feet[side as usize]
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::Vec;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Call {
        Joint(JointId, i32),
        Foot(Side, FootPosition),
    }

    /// Records calls; joint angles outside [-90, 90] fail like a servo would.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call, 16>,
    }

    impl Actuation for Recorder {
        fn set_joint_angle(&mut self, joint: JointId, degrees: i32) -> Result<(), ActuationError> {
            self.calls.push(Call::Joint(joint, degrees)).unwrap();
            if (-90..=90).contains(&degrees) {
                Ok(())
            } else {
                Err(ActuationError::AngleOutOfRange(degrees))
            }
        }

        fn set_foot_position(
            &mut self,
            side: Side,
            foot: FootPosition,
        ) -> Result<(), ActuationError> {
            self.calls.push(Call::Foot(side, foot)).unwrap();
            Ok(())
        }
    }

    fn dispatcher() -> CommandDispatcher<Recorder> {
        CommandDispatcher::new(Recorder::default())
    }

    #[test]
    fn quad_line_applies_in_joint_order() {
        let mut d = dispatcher();
        d.handle_line("10,-5,20,-15").unwrap();
        assert_eq!(
            d.actuator().calls.as_slice(),
            &[
                Call::Joint(JointId::LeftFront, 10),
                Call::Joint(JointId::LeftRear, -5),
                Call::Joint(JointId::RightFront, 20),
                Call::Joint(JointId::RightRear, -15),
            ]
        );
    }

    #[test]
    fn incomplete_quad_applies_nothing() {
        let mut d = dispatcher();
        assert_eq!(d.handle_line("10,-5,20"), Err(ActuationError::IncompleteCommand));
        assert!(d.actuator().calls.is_empty());
        assert_eq!(d.state(), DispatchState::AwaitSelector);
    }

    #[test]
    fn quad_keeps_going_after_a_bad_joint() {
        let mut d = dispatcher();
        assert_eq!(
            d.handle_line("10,120,20,-15"),
            Err(ActuationError::AngleOutOfRange(120))
        );
        assert_eq!(d.actuator().calls.len(), 4);
    }

    #[test]
    fn selector_then_angle() {
        let mut d = dispatcher();
        d.handle_line("2").unwrap();
        assert_eq!(d.state(), DispatchState::AwaitAngle(Some(JointId::LeftRear)));
        d.handle_line("45").unwrap();
        assert_eq!(d.state(), DispatchState::AwaitSelector);
        assert_eq!(
            d.actuator().calls.as_slice(),
            &[Call::Joint(JointId::LeftRear, 45)]
        );
    }

    #[test]
    fn bad_selector_discards_next_line() {
        let mut d = dispatcher();
        d.handle_line("7").unwrap();
        assert_eq!(d.state(), DispatchState::AwaitAngle(None));
        assert_eq!(d.handle_line("30"), Err(ActuationError::IncompleteCommand));
        assert_eq!(d.state(), DispatchState::AwaitSelector);
        assert!(d.actuator().calls.is_empty());

        // back in sync
        d.handle_line("1").unwrap();
        d.handle_line("-30").unwrap();
        assert_eq!(
            d.actuator().calls.as_slice(),
            &[Call::Joint(JointId::LeftFront, -30)]
        );
    }

    #[test]
    fn non_numeric_angle_resets_to_selector() {
        let mut d = dispatcher();
        d.handle_line("3").unwrap();
        assert_eq!(d.handle_line("abc"), Err(ActuationError::IncompleteCommand));
        assert_eq!(d.state(), DispatchState::AwaitSelector);
        assert!(d.actuator().calls.is_empty());
    }

    #[test]
    fn foot_command_updates_jog_target() {
        let mut d = dispatcher();
        d.handle_line("R,12,30").unwrap();
        assert_eq!(d.foot_target(Side::Right), FootPosition::new(12.0, 30.0));
        assert_eq!(d.foot_target(Side::Left), START_FOOT);
        assert_eq!(
            d.actuator().calls.as_slice(),
            &[Call::Foot(Side::Right, FootPosition::new(12.0, 30.0))]
        );
    }

    #[test]
    fn jog_moves_target_and_drives_both_legs() {
        let mut d = dispatcher();
        d.handle_line("w").unwrap();
        let left = FootPosition::new(START_FOOT.x, START_FOOT.y + JOG_STEP);
        assert_eq!(d.foot_target(Side::Left), left);
        assert_eq!(
            d.actuator().calls.as_slice(),
            &[
                Call::Foot(Side::Left, left),
                Call::Foot(Side::Right, START_FOOT)
            ]
        );

        d.handle_line("j").unwrap();
        assert_eq!(d.foot_target(Side::Right).x, START_FOOT.x + JOG_STEP);

        d.handle_line("r").unwrap();
        assert_eq!(d.foot_target(Side::Left), START_FOOT);
        assert_eq!(d.foot_target(Side::Right), START_FOOT);
    }
}
