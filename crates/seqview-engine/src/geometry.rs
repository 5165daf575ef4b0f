//! Coordinate transforms between sequence indices and screen space.
//!
//! The linear view lays bases out left to right inside a block; the circular
//! view places index 0 at 12 o'clock (after rotation by the central index) and
//! runs clockwise.

use std::f64::consts::TAU;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Horizontal offset of `index` inside the block starting at `block_start`.
/// Callers filter out indices that are not in the block.
#[inline(always)]
pub fn to_cartesian(index: usize, char_width: f64, block_start: usize) -> f64 {
    (index as f64 - block_start as f64) * char_width
}

/// Index of the base drawn at horizontal offset `x` of a block.
pub fn index_from_x(x: f64, char_width: f64, block_start: usize) -> usize {
    if char_width <= 0.0 || !x.is_finite() {
        return block_start;
    }
    block_start + (x / char_width).floor().max(0.0) as usize
}

/// Index at a fractional offset into an element showing `bases` bases over
/// `width` pixels, rounded to the nearest base boundary.
pub fn index_at_offset(distance_from_left: f64, width: f64, bases: usize) -> usize {
    if width <= 0.0 || !distance_from_left.is_finite() {
        return 0;
    }
    let fraction = (distance_from_left / width).clamp(0.0, 1.0);
    (fraction * bases as f64).round() as usize
}

/// Polar coordinate of `index` at `radius`, see [`CircularFrame::to_polar`].
pub fn to_polar(
    index: f64,
    radius: f64,
    seq_len: usize,
    central_index: usize,
    center: Point,
) -> Point {
    CircularFrame::new(center, seq_len, central_index).to_polar(index, radius)
}

/// The polar coordinate system of the circular map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircularFrame {
    pub center: Point,
    pub seq_len: usize,
    pub central_index: usize,
}

impl CircularFrame {
    pub fn new(center: Point, seq_len: usize, central_index: usize) -> Self {
        Self {
            center,
            seq_len,
            central_index,
        }
    }

    /// Clockwise angle from 12 o'clock, in radians.
    pub fn angle(&self, index: f64) -> f64 {
        if self.seq_len == 0 {
            return 0.0;
        }
        TAU * ((index - self.central_index as f64) / self.seq_len as f64)
    }

    /// Angle subtended by `bases` bases.
    pub fn sweep(&self, bases: f64) -> f64 {
        if self.seq_len == 0 {
            return 0.0;
        }
        TAU * bases / self.seq_len as f64
    }

    pub fn to_polar(&self, index: f64, radius: f64) -> Point {
        self.point_at_angle(self.angle(index), radius)
    }

    pub fn point_at_angle(&self, theta: f64, radius: f64) -> Point {
        Point::new(
            self.center.x + radius * theta.sin(),
            self.center.y - radius * theta.cos(),
        )
    }

    /// Fractional sequence index under `point`, in `[0, seq_len)`.
    pub fn index_at(&self, point: Point) -> f64 {
        if self.seq_len == 0 {
            return 0.0;
        }
        let dx = point.x - self.center.x;
        let dy = point.y - self.center.y;
        let theta = dx.atan2(-dy);
        let len = self.seq_len as f64;
        (self.central_index as f64 + theta / TAU * len).rem_euclid(len)
    }

    /// Nearest base boundary under `point`, in `[0, seq_len)`.
    pub fn nearest_index(&self, point: Point) -> usize {
        if self.seq_len == 0 {
            return 0;
        }
        (self.index_at(point).round() as usize) % self.seq_len
    }

    pub fn radius_at(&self, point: Point) -> f64 {
        self.center.distance(&point)
    }
}
