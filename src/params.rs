//! Parameters shared by the stripe clipper, cell clipper and world-copy driver.

use crate::extent::TileExtents;

/// Zoom above which a single edge spanning almost the whole world triggers a diagnostic
/// warning (spec's own open question: heuristic, never a correctness gate).
pub const WARN_MIN_ZOOM: u8 = 6;

pub struct SliceParams<'a> {
    pub buffer: f64,
    pub neighbor_buffer: f64,
    pub z: u8,
    pub w: i64,
    pub area: bool,
    pub extents: &'a dyn TileExtents,
}

impl<'a> SliceParams<'a> {
    pub fn new(buffer: f64, z: u8, area: bool, extents: &'a dyn TileExtents) -> Self {
        SliceParams {
            buffer,
            neighbor_buffer: buffer + crate::extent::NEIGHBOR_BUFFER_EPS,
            z,
            w: 1i64 << z,
            area,
            extents,
        }
    }

    #[inline]
    pub fn k1(&self) -> f64 {
        -self.buffer
    }

    #[inline]
    pub fn k2(&self) -> f64 {
        1.0 + self.buffer
    }
}
