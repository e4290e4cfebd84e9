//! Static clock face artwork

use crate::frame::SLOT_COUNT;

/// Rim, tick marks and the 12/3/6/9 numerals
///
/// One row per five minutes of the dial, slot 0 is twelve o'clock.
#[rustfmt::skip]
pub const BASE_FACE: [u32; SLOT_COUNT] = [
    0x800400, 0xA70400, 0xC90000, 0xB10000, 0x800000, 0x800000, 0x800000, 0x800000, 0x800000, 0x800000,
    0xC00000, 0x800000, 0x800000, 0x800000, 0x800000, 0x800000, 0x800000, 0x800000, 0x800000, 0x800000,
    0xC00000, 0x800000, 0x800000, 0x800000, 0x800000, 0x800000, 0x800000, 0x840000, 0x8A0000, 0x880400,
    0xEC0400, 0x880400, 0x8A0000, 0x840000, 0x800000, 0x800000, 0x800000, 0x800000, 0x800000, 0x800000,
    0xC00000, 0x800000, 0x800000, 0x800000, 0x800000, 0x800000, 0x800000, 0x800000, 0x800000, 0x800000,
    0xC00000, 0x800000, 0x800000, 0x800000, 0x800000, 0x800000, 0xF00000, 0x800000, 0x800000, 0x800400,
    0x800400, 0x800400, 0x800000, 0x800000, 0xF00000, 0x800000, 0x800000, 0x800000, 0x800000, 0x800000,
    0xC00000, 0x800000, 0x800000, 0x800000, 0x800000, 0x800000, 0x800000, 0x800000, 0x800000, 0x800000,
    0xC00000, 0x800000, 0x800000, 0x800000, 0x800000, 0x800000, 0x800000, 0x840000, 0x8A0000, 0x820400,
    0xE60400, 0x8A0400, 0x8A0000, 0x840000, 0x800000, 0x800000, 0x800000, 0x800000, 0x800000, 0x800000,
    0xC00000, 0x800000, 0x800000, 0x800000, 0x800000, 0x800000, 0x800000, 0x800000, 0x800000, 0x800000,
    0xC00000, 0x800000, 0x800000, 0x800000, 0x800000, 0x800000, 0xA10000, 0xFF0000, 0x810400, 0x800400,];
