//! Planar coordinate type.
//!
//! `Point` uses `f64` so that positions reached by repeated straight-line
//! steps stay representable, and so that "snap to target" produces a value
//! bit-identical to the target.  Co-location elsewhere in the workspace is
//! exact `==` on `Point`, never an epsilon test.

/// An immutable `(x, y)` coordinate on the simulation plane.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance.
    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// The point `fraction` of the way from `self` to `other`.
    ///
    /// `fraction` is not clamped; callers that need to stay on the segment
    /// keep it in `[0, 1]`.
    #[inline]
    pub fn lerp(self, other: Point, fraction: f64) -> Point {
        Point {
            x: self.x + (other.x - self.x) * fraction,
            y: self.y + (other.y - self.y) * fraction,
        }
    }

    /// `true` if both coordinates are finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}
