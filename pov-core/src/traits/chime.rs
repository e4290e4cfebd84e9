//! Chime playback trait

/// Something that can sound the hourly chime
///
/// Implementations must return quickly; the actual playback runs elsewhere.
pub trait Chime {
    /// Start a chime of `strikes` strikes
    fn strike(&mut self, strikes: u8);
}
