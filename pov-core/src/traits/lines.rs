//! LED output line traits

/// A bank of output lines addressed by a bit mask
pub trait OutputLines {
    /// Drive line `j` high when bit `j` of `mask` is set, low otherwise
    fn write_mask(&mut self, mask: u32);

    /// Drive every line low
    fn all_off(&mut self) {
        self.write_mask(0);
    }
}
