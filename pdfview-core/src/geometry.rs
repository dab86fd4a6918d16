//! Points, sizes and rectangles in document and viewport space.
//!
//! Real-valued types (`PointF`, `SizeF`) carry the geometric model; integer
//! types (`IPoint`, `ISize`, `IRect`) address framebuffer pixels.

use std::ops::{Add, AddAssign, Neg, Sub};

/// Decimal precision used when comparing zoom and pan values.
///
/// Two reals are equal when they agree after rounding to the nearest 1/1000.
pub const REAL_PRECISION: i32 = 1000;

/// Compare two reals up to `precision` (e.g. `1000` compares three decimal digits).
pub fn equal_reals(a: f64, b: f64, precision: i32) -> bool {
    let precision = f64::from(precision);
    (a * precision).round() == (b * precision).round()
}

/// Round half away from zero and saturate into `i32`.
pub fn round_to_i32(value: f64) -> i32 {
    value.round() as i32
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointF {
    pub x: f64,
    pub y: f64,
}

impl PointF {
    pub const ZERO: PointF = PointF { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both components equal under [`REAL_PRECISION`].
    pub fn fuzzy_eq(&self, other: &PointF) -> bool {
        equal_reals(self.x, other.x, REAL_PRECISION) && equal_reals(self.y, other.y, REAL_PRECISION)
    }

    pub fn rounded(&self) -> IPoint {
        IPoint::new(round_to_i32(self.x), round_to_i32(self.y))
    }
}

impl Add for PointF {
    type Output = PointF;

    fn add(self, rhs: PointF) -> PointF {
        PointF::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for PointF {
    fn add_assign(&mut self, rhs: PointF) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for PointF {
    type Output = PointF;

    fn sub(self, rhs: PointF) -> PointF {
        PointF::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for PointF {
    type Output = PointF;

    fn neg(self) -> PointF {
        PointF::new(-self.x, -self.y)
    }
}

/// A size in points (page space) or fractional pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SizeF {
    pub width: f64,
    pub height: f64,
}

impl SizeF {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn transposed(&self) -> SizeF {
        SizeF::new(self.height, self.width)
    }

    pub fn scaled(&self, factor: f64) -> SizeF {
        SizeF::new(self.width * factor, self.height * factor)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IPoint {
    pub x: i32,
    pub y: i32,
}

impl IPoint {
    pub const ZERO: IPoint = IPoint { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for IPoint {
    type Output = IPoint;

    fn add(self, rhs: IPoint) -> IPoint {
        IPoint::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for IPoint {
    type Output = IPoint;

    fn sub(self, rhs: IPoint) -> IPoint {
        IPoint::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for IPoint {
    type Output = IPoint;

    fn neg(self) -> IPoint {
        IPoint::new(-self.x, -self.y)
    }
}

/// Viewport size in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub struct ISize {
    pub width: u32,
    pub height: u32,
}

impl ISize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn to_f64(self) -> SizeF {
        SizeF::new(f64::from(self.width), f64::from(self.height))
    }

    /// The rectangle `(0, 0, width, height)`.
    pub fn bounds(&self) -> IRect {
        IRect::new(0, 0, self.width as i32, self.height as i32)
    }
}

/// Axis-aligned integer rectangle. Empty when width or height is not positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl IRect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        IRect::new(left, top, right - left, bottom - top)
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    /// One past the last column.
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// One past the last row.
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn top_left(&self) -> IPoint {
        IPoint::new(self.x, self.y)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn area(&self) -> u64 {
        if self.is_empty() {
            0
        } else {
            self.width as u64 * self.height as u64
        }
    }

    pub fn translated(&self, offset: IPoint) -> IRect {
        IRect::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }

    /// Intersection, or an empty rectangle when the two do not overlap.
    pub fn intersect(&self, other: &IRect) -> IRect {
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= left || bottom <= top {
            IRect::default()
        } else {
            IRect::from_edges(left, top, right, bottom)
        }
    }

    pub fn intersects(&self, other: &IRect) -> bool {
        !self.intersect(other).is_empty()
    }

    pub fn contains_rect(&self, other: &IRect) -> bool {
        !other.is_empty()
            && other.left() >= self.left()
            && other.top() >= self.top()
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// `self` minus `other`, as up to four non-overlapping rectangles.
    ///
    /// Full-width bands above and below the overlap come first, then the
    /// left and right remainders of the overlap's rows.
    pub fn subtract(&self, other: &IRect) -> Vec<IRect> {
        if self.is_empty() {
            return Vec::new();
        }
        let overlap = self.intersect(other);
        if overlap.is_empty() {
            return vec![*self];
        }

        let pieces = [
            IRect::from_edges(self.left(), self.top(), self.right(), overlap.top()),
            IRect::from_edges(self.left(), overlap.bottom(), self.right(), self.bottom()),
            IRect::from_edges(self.left(), overlap.top(), overlap.left(), overlap.bottom()),
            IRect::from_edges(overlap.right(), overlap.top(), self.right(), overlap.bottom()),
        ];
        pieces.into_iter().filter(|piece| !piece.is_empty()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_reals_compares_three_digits() {
        assert!(equal_reals(1.0, 1.0004, REAL_PRECISION));
        assert!(equal_reals(2.3331, 2.3329, REAL_PRECISION));
        assert!(!equal_reals(1.0, 1.002, REAL_PRECISION));
        assert!(!equal_reals(1.0, 1.0006, REAL_PRECISION));
    }

    #[test]
    fn intersect_of_disjoint_rects_is_empty() {
        let a = IRect::new(0, 0, 10, 10);
        let b = IRect::new(10, 0, 5, 5);
        assert!(a.intersect(&b).is_empty());
        assert!(!a.intersects(&b));
    }

    #[test]
    fn intersect_clips_to_overlap() {
        let a = IRect::new(-5, -5, 20, 20);
        let b = IRect::new(0, 0, 10, 10);
        assert_eq!(a.intersect(&b), IRect::new(0, 0, 10, 10));
    }

    #[test]
    fn subtract_hole_leaves_four_pieces_with_same_area() {
        let outer = IRect::new(0, 0, 10, 10);
        let hole = IRect::new(3, 3, 4, 4);
        let pieces = outer.subtract(&hole);

        assert_eq!(pieces.len(), 4);
        let area: u64 = pieces.iter().map(IRect::area).sum();
        assert_eq!(area, 100 - 16);
        for (i, a) in pieces.iter().enumerate() {
            assert!(!a.intersects(&hole));
            for b in &pieces[i + 1..] {
                assert!(!a.intersects(b));
            }
        }
    }

    #[test]
    fn subtract_covering_rect_leaves_nothing() {
        let inner = IRect::new(2, 2, 3, 3);
        assert!(inner.subtract(&IRect::new(0, 0, 10, 10)).is_empty());
    }

    #[test]
    fn subtract_edge_strip() {
        let full = IRect::new(0, 0, 100, 50);
        let top = IRect::new(0, 0, 100, 10);
        assert_eq!(full.subtract(&top), vec![IRect::new(0, 10, 100, 40)]);
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(PointF::new(1.5, -1.5).rounded(), IPoint::new(2, -2));
        assert_eq!(PointF::new(0.49, -0.49).rounded(), IPoint::new(0, 0));
    }
}
