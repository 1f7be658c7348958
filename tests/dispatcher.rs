//! Command lines through the queue, the dispatcher and the rig, down to the compare
//! values written on each PWM channel.
use std::cell::Cell;
use std::rc::Rc;

use biped_robot::config::{COMMAND_QUEUE_SIZE, START_FOOT};
use biped_robot::error::ActuationError;
use biped_robot::kinematics::solver::FootPosition;
use biped_robot::robot::dispatcher::{CommandDispatcher, DispatchState};
use biped_robot::robot::joint::{JointAngle, JointId};
use biped_robot::robot::leg::{LegActuator, LegCalibration, Side};
use biped_robot::robot::rig::BipedRig;
use biped_robot::transport::{enqueue_line, CommandLine, EnqueueError, LineFramer};
use embassy_futures::block_on;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embedded_hal::pwm::{ErrorKind, ErrorType, SetDutyCycle};

/// PWM channel whose compare value can be read after the rig takes ownership.
#[derive(Clone, Default)]
struct SharedPwm {
    duty: Rc<Cell<Option<u16>>>,
}

impl ErrorType for SharedPwm {
    type Error = ErrorKind;
}

impl SetDutyCycle for SharedPwm {
    fn max_duty_cycle(&self) -> u16 {
        19_999
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.duty.set(Some(duty));
        Ok(())
    }
}

type Rig = BipedRig<SharedPwm, SharedPwm, SharedPwm, SharedPwm>;
type Queue = Channel<CriticalSectionRawMutex, CommandLine, COMMAND_QUEUE_SIZE>;

/// Rig plus handles on its four channels in [`JointId::ALL`] order.
fn rig() -> (Rig, [SharedPwm; 4]) {
    let pwms: [SharedPwm; 4] = Default::default();
    let [lf, lr, rf, rr] = pwms.clone();
    let left = LegActuator::new(Side::Left, lf, lr, LegCalibration::for_side(Side::Left)).unwrap();
    let right =
        LegActuator::new(Side::Right, rf, rr, LegCalibration::for_side(Side::Right)).unwrap();
    (BipedRig::new(left, right).unwrap(), pwms)
}

fn duties(pwms: &[SharedPwm; 4]) -> [Option<u16>; 4] {
    [0, 1, 2, 3].map(|i| pwms[i].duty.get())
}

#[test]
fn rig_starts_centred() {
    let (_, pwms) = rig();
    assert_eq!(duties(&pwms), [Some(1500); 4]);
}

#[test]
fn quad_line_reaches_every_channel() {
    let (rig, pwms) = rig();
    let queue = Queue::new();
    let mut dispatcher = CommandDispatcher::new(rig);

    enqueue_line(&queue.sender(), "10,-5,20,-15").unwrap();
    block_on(dispatcher.step(&queue.receiver())).unwrap();

    let angles = dispatcher.actuator().current_angles();
    assert_eq!(angles.map(JointAngle::degrees), [10, -5, 20, -15]);
    // (angle + 90) * 2000 / 180 + 500
    assert_eq!(
        duties(&pwms),
        [Some(1611), Some(1444), Some(1722), Some(1333)]
    );
}

#[test]
fn incomplete_line_leaves_rig_untouched() {
    let (rig, pwms) = rig();
    let queue = Queue::new();
    let mut dispatcher = CommandDispatcher::new(rig);

    enqueue_line(&queue.sender(), "10,-5,20").unwrap();
    assert_eq!(
        block_on(dispatcher.step(&queue.receiver())),
        Err(ActuationError::IncompleteCommand)
    );
    assert_eq!(duties(&pwms), [Some(1500); 4]);
}

#[test]
fn selector_and_angle_arrive_as_two_lines() {
    let (rig, pwms) = rig();
    let queue = Queue::new();
    let mut dispatcher = CommandDispatcher::new(rig);

    enqueue_line(&queue.sender(), "4").unwrap();
    enqueue_line(&queue.sender(), "-89").unwrap();
    block_on(dispatcher.step(&queue.receiver())).unwrap();
    assert_eq!(
        dispatcher.state(),
        DispatchState::AwaitAngle(Some(JointId::RightRear))
    );
    block_on(dispatcher.step(&queue.receiver())).unwrap();

    assert_eq!(dispatcher.state(), DispatchState::AwaitSelector);
    assert_eq!(dispatcher.actuator().current_angle(JointId::RightRear), -89);
    assert_eq!(pwms[3].duty.get(), Some(511));
}

#[test]
fn out_of_range_angle_keeps_the_others() {
    let (rig, _) = rig();
    let mut dispatcher = CommandDispatcher::new(rig);

    assert_eq!(
        dispatcher.handle_line("30,95,-30,0"),
        Err(ActuationError::AngleOutOfRange(95))
    );
    let angles = dispatcher.actuator().current_angles();
    assert_eq!(angles.map(JointAngle::degrees), [30, 0, -30, 0]);
}

#[test]
fn foot_line_mirrors_the_legs() {
    let (rig, _) = rig();
    let mut dispatcher = CommandDispatcher::new(rig);

    dispatcher.handle_line("L,10,15").unwrap();
    dispatcher.handle_line("R,10,15").unwrap();

    let rig = dispatcher.actuator();
    assert_eq!(rig.current_angle(JointId::LeftFront), -65);
    assert_eq!(rig.current_angle(JointId::LeftRear), -58);
    assert_eq!(rig.current_angle(JointId::RightFront), 65);
    assert_eq!(rig.current_angle(JointId::RightRear), 58);
}

#[test]
fn unreachable_foot_is_rejected_whole() {
    let (rig, pwms) = rig();
    let mut dispatcher = CommandDispatcher::new(rig);

    assert_eq!(
        dispatcher.handle_line("L,0,0"),
        Err(ActuationError::UnreachableTarget)
    );
    assert_eq!(duties(&pwms), [Some(1500); 4]);
    // target still recorded for jogging
    assert_eq!(
        dispatcher.foot_target(Side::Left),
        FootPosition::new(0.0, 0.0)
    );
}

#[test]
fn jog_reset_returns_to_start_pose() {
    let (rig, _) = rig();
    let mut dispatcher = CommandDispatcher::new(rig);

    dispatcher.handle_line("r").unwrap();
    let rig = dispatcher.actuator();
    let front = rig.current_angle(JointId::LeftFront);
    let rear = rig.current_angle(JointId::LeftRear);
    assert_eq!(front, -rig.current_angle(JointId::RightFront).degrees());
    assert_eq!(rear, -rig.current_angle(JointId::RightRear).degrees());
    assert_eq!(dispatcher.foot_target(Side::Right), START_FOOT);
}

#[test]
fn framed_bytes_fill_the_queue_and_overflow_drops() {
    let (rig, _) = rig();
    let queue = Queue::new();
    let mut dispatcher = CommandDispatcher::new(rig);
    let mut framer = LineFramer::<64>::new();
    let mut results = Vec::new();

    framer.push(b"1,1,1,1\n2,2,2,2\r\n3,3,3,3\n4,4,", |line| {
        results.push(enqueue_line(&queue.sender(), line))
    });
    framer.push(b"4,4\n5,5,5,5\n", |line| {
        results.push(enqueue_line(&queue.sender(), line))
    });
    assert_eq!(
        results,
        [Ok(()), Ok(()), Ok(()), Ok(()), Err(EnqueueError::QueueFull)]
    );

    for _ in 0..COMMAND_QUEUE_SIZE {
        block_on(dispatcher.step(&queue.receiver())).unwrap();
    }
    assert_eq!(
        dispatcher.actuator().current_angles().map(JointAngle::degrees),
        [4; 4]
    );
    assert!(queue.is_empty());
}
