//! Rotor speed control task
//!
//! Every sample period:
//! 1. Take the encoder count
//! 2. Update the controller and apply the new duty
//! 3. Feed the stall detector
//!
//! On shutdown the duty drops to zero and the driver is disabled.

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_time::{Duration, Ticker};
use portable_atomic::Ordering;

use pov_core::traits::DutyOutput;
use pov_drivers::motor::{SpeedControlConfig, SpeedController, StallChange, StallDetector};
use pov_hal_rp2040::MotorPwm;

use crate::channels::{shutdown_requested, DUTY, ENCODER, LAST_PULSES, MOTOR_STALL};

/// Speed control task - regulates the rotor motor
///
/// `disable` is the driver's active-high disable input, `dir` its
/// direction input (high for clockwise).
#[embassy_executor::task]
pub async fn speed_control_task(
    mut pwm: MotorPwm<'static>,
    mut disable: Output<'static>,
    mut dir: Output<'static>,
    config: SpeedControlConfig,
    stall_periods: u8,
) {
    info!(
        "Speed control task started: {} rpm target, {} pulses per period",
        config.target_rpm,
        config.expected_pulses()
    );

    dir.set_high();
    disable.set_low();

    let mut controller = SpeedController::new(config);
    let mut stall = StallDetector::new(stall_periods);
    let mut ticker = Ticker::every(Duration::from_millis(config.period_ms as u64));

    // Discard edges counted while the motor was still disabled
    ENCODER.take();

    loop {
        ticker.next().await;

        if shutdown_requested() {
            pwm.off();
            disable.set_high();
            DUTY.store(0);
            info!("Motor stopped");
            return;
        }

        let pulses = ENCODER.take();
        let duty = controller.update(pulses);
        pwm.set_duty(duty);

        DUTY.store(duty);
        LAST_PULSES.store(pulses, Ordering::Relaxed);

        match stall.update(pulses) {
            Some(StallChange::Stalled) => {
                warn!("Motor stall detected! Duty at {}", duty);
                MOTOR_STALL.signal(true);
            }
            Some(StallChange::Cleared) => {
                info!("Motor stall cleared");
                MOTOR_STALL.signal(false);
            }
            None => {}
        }

        trace!("Speed: {} pulses, duty {}", pulses, duty);
    }
}
