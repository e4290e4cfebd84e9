//! Motor output traits

/// PWM duty output for the rotor drive motor
///
/// Duty is expressed in counts, `0` is off and [`max_duty`](Self::max_duty)
/// is fully on.
pub trait DutyOutput {
    /// Apply a duty value, clamped to `max_duty`
    fn set_duty(&mut self, duty: u16);

    /// Largest duty value the output accepts
    fn max_duty(&self) -> u16;

    /// Stop driving the motor
    fn off(&mut self) {
        self.set_duty(0);
    }
}
