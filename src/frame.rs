//! Frame container shared by sources and inference backends.
//!
//! A `Frame` is produced once per capture, handed to whichever backends run
//! this cycle, and dropped at the end of the cycle. Nothing downstream
//! retains pixel data.

/// One captured frame. Pixels are packed RGB, row-major.
#[derive(Clone, Debug)]
pub struct Frame {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Capture sequence number, assigned by the source.
    pub seq: u64,
}

impl Frame {
    pub fn new(pixels: Vec<u8>, width: u32, height: u32, seq: u64) -> Self {
        Self {
            pixels,
            width,
            height,
            seq,
        }
    }

    pub fn byte_len(&self) -> usize {
        self.pixels.len()
    }
}
