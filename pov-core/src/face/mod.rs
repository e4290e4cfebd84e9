//! Clock face composition
//!
//! The static unit draws the hands onto [`BASE_FACE`] and ships the result to
//! the rotor as a single `display` message. Each hand is three slots wide: a
//! long centre slot with a slightly shorter slot on either side.

pub mod clock;
pub mod pattern;

pub use clock::{strikes_for_hour, ChimeSchedule, ClockTime, WallClock};
pub use pattern::BASE_FACE;

use pov_protocol::{CommandWord, Line, LineWriter, ProtocolError, MAX_LINE_LEN};

use crate::frame::{wrap_slot, Frame};

/// Minute hand centre slot mask (21 LEDs)
pub const MINUTE_HAND_CENTER: u32 = 0x1F_FFFF;
/// Minute hand side slot mask (20 LEDs)
pub const MINUTE_HAND_SIDE: u32 = 0x0F_FFFF;
/// Hour hand centre slot mask (13 LEDs)
pub const HOUR_HAND_CENTER: u32 = 0x1FFF;
/// Hour hand side slot mask (12 LEDs)
pub const HOUR_HAND_SIDE: u32 = 0x0FFF;

/// Default interval between minute checks
pub const DEFAULT_FACE_REFRESH_MS: u32 = 500;

/// Slot the minute hand points at
pub fn minute_slot(minute: u8) -> u8 {
    wrap_slot(minute as i32 * 2)
}

/// Slot the hour hand points at, creeping forward every six minutes
pub fn hour_slot(hour: u8, minute: u8) -> u8 {
    wrap_slot(hour as i32 * 10 + minute as i32 / 6)
}

fn draw_hand(face: &mut Frame, center: u8, center_mask: u32, side_mask: u32) {
    let center = center as i32;
    face.overlay(wrap_slot(center - 1), side_mask);
    face.overlay(wrap_slot(center), center_mask);
    face.overlay(wrap_slot(center + 1), side_mask);
}

/// Draw both hands for `hour:minute` onto the base face
///
/// Hours of 12 and above wrap around the dial.
pub fn compose_face(hour: u8, minute: u8) -> Frame {
    let mut face = Frame::from_slots(BASE_FACE);
    draw_hand(
        &mut face,
        minute_slot(minute),
        MINUTE_HAND_CENTER,
        MINUTE_HAND_SIDE,
    );
    draw_hand(
        &mut face,
        hour_slot(hour, minute),
        HOUR_HAND_CENTER,
        HOUR_HAND_SIDE,
    );
    face
}

/// Encode a face as a `display` message carrying every lit slot
pub fn face_message(face: &Frame, sender: &str, receiver: &str) -> Result<Line, ProtocolError> {
    let mut writer = LineWriter::<MAX_LINE_LEN>::new(sender, receiver, CommandWord::Display)?;
    for update in face.lit_slots() {
        writer.slot(update)?;
    }
    writer.finish()
}

/// Recomposes the face only when the displayed minute changes
#[derive(Debug, Clone, Default)]
pub struct FaceUpdater {
    shown: Option<ClockTime>,
}

impl FaceUpdater {
    pub fn new() -> Self {
        Self { shown: None }
    }

    /// Returns a new face when `now` differs from the last composed time
    pub fn poll(&mut self, now: ClockTime) -> Option<Frame> {
        if self.shown == Some(now) {
            return None;
        }
        self.shown = Some(now);
        Some(compose_face(now.hour, now.minute))
    }

    /// Force the next poll to recompose
    pub fn invalidate(&mut self) {
        self.shown = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pov_protocol::{Command, Message};

    #[test]
    fn test_three_oclock() {
        let face = compose_face(3, 0);

        // Minute hand at 12
        assert_eq!(face.get(0), BASE_FACE[0] | MINUTE_HAND_CENTER);
        assert_eq!(face.get(119), BASE_FACE[119] | MINUTE_HAND_SIDE);
        assert_eq!(face.get(1), BASE_FACE[1] | MINUTE_HAND_SIDE);

        // Hour hand at 3
        assert_eq!(face.get(30), BASE_FACE[30] | HOUR_HAND_CENTER);
        assert_eq!(face.get(29), BASE_FACE[29] | HOUR_HAND_SIDE);
        assert_eq!(face.get(31), BASE_FACE[31] | HOUR_HAND_SIDE);

        assert_eq!(face.get(60), BASE_FACE[60]);
    }

    #[test]
    fn test_half_past_midnight() {
        let face = compose_face(0, 30);

        assert_eq!(minute_slot(30), 60);
        assert_eq!(face.get(60), BASE_FACE[60] | MINUTE_HAND_CENTER);
        assert_eq!(face.get(59), BASE_FACE[59] | MINUTE_HAND_SIDE);
        assert_eq!(face.get(61), BASE_FACE[61] | MINUTE_HAND_SIDE);

        assert_eq!(hour_slot(0, 30), 5);
        assert_eq!(face.get(5), BASE_FACE[5] | HOUR_HAND_CENTER);
        assert_eq!(face.get(4), BASE_FACE[4] | HOUR_HAND_SIDE);
        assert_eq!(face.get(6), BASE_FACE[6] | HOUR_HAND_SIDE);
    }

    #[test]
    fn test_afternoon_wraps() {
        assert_eq!(compose_face(15, 0), compose_face(3, 0));
        assert_eq!(hour_slot(23, 59), 119);
    }

    #[test]
    fn test_hour_hand_wraps_past_last_slot() {
        let face = compose_face(23, 59);

        assert_eq!(minute_slot(59), 118);
        assert_eq!(hour_slot(23, 59), 119);
        assert_eq!(face.get(0), BASE_FACE[0] | HOUR_HAND_SIDE);
        assert_eq!(
            face.get(119),
            BASE_FACE[119] | HOUR_HAND_CENTER | MINUTE_HAND_SIDE
        );
        assert_eq!(
            face.get(118),
            BASE_FACE[118] | MINUTE_HAND_CENTER | HOUR_HAND_SIDE
        );
        assert_eq!(face.get(1), BASE_FACE[1]);
    }

    #[test]
    fn test_face_message_lists_lit_slots() {
        let face = compose_face(3, 0);
        let line = face_message(&face, "10.0.0.1", "10.0.0.2").unwrap();
        assert!(line.starts_with("10.0.0.1,10.0.0.2,display,0,9FFFFF,1,"));
        assert!(line.ends_with("119,8FFFFF\n"));

        let msg = Message::parse(&line).unwrap();
        let Command::Display(args) = msg.command else {
            panic!("expected display");
        };
        assert_eq!(args.len(), face.lit_slots().count());
    }

    #[test]
    fn test_updater_only_on_change() {
        let mut updater = FaceUpdater::new();
        let now = ClockTime { hour: 8, minute: 15 };

        assert!(updater.poll(now).is_some());
        assert!(updater.poll(now).is_none());
        assert!(updater.poll(ClockTime { hour: 8, minute: 16 }).is_some());

        updater.invalidate();
        assert!(updater.poll(ClockTime { hour: 8, minute: 16 }).is_some());
    }
}
