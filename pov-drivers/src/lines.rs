//! LED output line bank
//!
//! Maps a slot mask onto a fixed array of GPIO outputs: bit `j` of the mask
//! drives pin `j`. Works with any `embedded-hal` output pin.

use embedded_hal::digital::{OutputPin, PinState};
use pov_core::traits::OutputLines;

/// A fixed bank of output pins
pub struct LineBank<P, const N: usize> {
    pins: [P; N],
}

impl<P: OutputPin, const N: usize> LineBank<P, N> {
    /// Take ownership of the pins; pin `j` is driven by mask bit `j`
    pub fn new(pins: [P; N]) -> Self {
        Self { pins }
    }

    /// Release the pins
    pub fn into_inner(self) -> [P; N] {
        self.pins
    }
}

impl<P: OutputPin, const N: usize> OutputLines for LineBank<P, N> {
    fn write_mask(&mut self, mask: u32) {
        for (bit, pin) in self.pins.iter_mut().enumerate() {
            let state = PinState::from(bit < 32 && mask & (1 << bit) != 0);
            // GPIO writes on the supported boards are infallible
            let _ = pin.set_state(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    #[derive(Default)]
    struct MockPin {
        high: bool,
    }

    impl ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.high = true;
            Ok(())
        }
    }

    fn levels<const N: usize>(bank: LineBank<MockPin, N>) -> [bool; N] {
        bank.into_inner().map(|pin| pin.high)
    }

    #[test]
    fn test_mask_bits_map_to_pins() {
        let mut bank: LineBank<MockPin, 4> = LineBank::new(Default::default());
        bank.write_mask(0b1010);
        assert_eq!(levels(bank), [false, true, false, true]);
    }

    #[test]
    fn test_all_off() {
        let mut bank: LineBank<MockPin, 24> =
            LineBank::new(core::array::from_fn(|_| MockPin::default()));
        bank.write_mask(0xFF_FFFF);
        bank.all_off();
        assert_eq!(levels(bank), [false; 24]);
    }

    #[test]
    fn test_high_bits_ignored() {
        let mut bank: LineBank<MockPin, 2> = LineBank::new(Default::default());
        bank.write_mask(0xFFFF_FFFC);
        assert_eq!(levels(bank), [false, false]);
    }
}
