//! ESP32 servo wiring.
//!
//! Each leg gets its own MCPWM unit (left on MCPWM0, right on MCPWM1) running a
//! 1 MHz timebase with a 20 ms period. Operator 0 of the unit drives the front
//! servo on output A and the rear servo on output B.
//!
//! The [`McPwm`](esp_hal::mcpwm::McPwm) itself stays with the caller and must
//! outlive the leg, dropping it releases the peripheral clock.
use esp_hal::gpio::AnyPin;
use esp_hal::mcpwm::operator::{Operator, PwmPin, PwmPinConfig};
use esp_hal::mcpwm::timer::{PwmWorkingMode, Timer};
use esp_hal::mcpwm::{PeripheralClockConfig, PwmPeripheral};
use esp_hal::peripherals::{MCPWM0, MCPWM1};
use esp_hal::time::Rate;
use log::{error, info};

use crate::config::{SERVO_FREQUENCY, SERVO_TIMEBASE_PERIOD, SERVO_TIMEBASE_RESOLUTION};
use crate::error::ActuationError;
use crate::robot::leg::{LegActuator, LegCalibration, Side};
use crate::robot::rig::BipedRig;

pub type FrontPin<PWM> = PwmPin<'static, PWM, 0, true>;
pub type RearPin<PWM> = PwmPin<'static, PWM, 0, false>;

pub type LeftLeg = LegActuator<FrontPin<MCPWM0<'static>>, RearPin<MCPWM0<'static>>>;
pub type RightLeg = LegActuator<FrontPin<MCPWM1<'static>>, RearPin<MCPWM1<'static>>>;

/// The rig as wired on the robot.
pub type Rig = BipedRig<
    FrontPin<MCPWM0<'static>>,
    RearPin<MCPWM0<'static>>,
    FrontPin<MCPWM1<'static>>,
    RearPin<MCPWM1<'static>>,
>;

/// Peripheral clock giving the servo timebase resolution.
pub fn servo_clock() -> Result<PeripheralClockConfig, ActuationError> {
    PeripheralClockConfig::with_frequency(Rate::from_hz(SERVO_TIMEBASE_RESOLUTION.raw())).map_err(
        |e| {
            error!("[HW] servo clock: {e:?}");
            ActuationError::HardwareFault
        },
    )
}

/// Starts `timer` at the servo frequency and hands the operator's two outputs to
/// a [`LegActuator`], which centres both servos.
pub fn setup_leg<PWM: PwmPeripheral + 'static>(
    side: Side,
    clock_cfg: PeripheralClockConfig,
    mut operator: Operator<'static, 0, PWM>,
    timer: &mut Timer<0, PWM>,
    front_pin: AnyPin<'static>,
    rear_pin: AnyPin<'static>,
) -> Result<LegActuator<FrontPin<PWM>, RearPin<PWM>>, ActuationError> {
    operator.set_timer(timer);
    let (front, rear) = operator.with_pins(
        front_pin,
        PwmPinConfig::UP_ACTIVE_HIGH,
        rear_pin,
        PwmPinConfig::UP_ACTIVE_HIGH,
    );

    // The counter runs 0..=period, so one less than the tick count
    let timer_cfg = clock_cfg
        .timer_clock_with_frequency(
            (SERVO_TIMEBASE_PERIOD - 1) as u16,
            PwmWorkingMode::Increase,
            Rate::from_hz(SERVO_FREQUENCY.raw()),
        )
        .map_err(|e| {
            error!("[HW] {side} leg timer: {e:?}");
            ActuationError::HardwareFault
        })?;
    timer.start(timer_cfg);
    info!(
        "[HW] {side} leg timer running on clock group {:?}",
        side.clock_group()
    );

    LegActuator::new(side, front, rear, LegCalibration::for_side(side))
}
