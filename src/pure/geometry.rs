//! Geometry primitives
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An x,y coordinate pair
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Point {
    /// An absolute x coordinate relative to the root window
    pub x: i32,
    /// An absolute y coordinate relative to the root window
    pub y: i32,
}

/// An X window / monitor position: top left corner + extent
///
/// Client windows are free to sit partially (or entirely) off screen so, unlike
/// their extent, the coordinates of a Rect may be negative.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Default, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Rect {
    /// The x-coordinate of the top left corner of this rect
    pub x: i32,
    /// The y-coordinate of the top left corner of this rect
    pub y: i32,
    /// The width of this rect
    pub w: u32,
    /// The height of this rect
    pub h: u32,
}

impl Rect {
    /// Create a new Rect.
    pub const fn new(x: i32, y: i32, w: u32, h: u32) -> Rect {
        Rect { x, y, w, h }
    }

    /// The midpoint of this rectangle.
    ///
    /// Odd side lengths will lead to a truncated point towards the top left corner
    /// in order to maintain integer coordinates.
    /// ```
    /// # use tyle::pure::geometry::{Rect, Point};
    /// let r = Rect::new(0, 0, 100, 200);
    ///
    /// assert_eq!(r.midpoint(), Point { x: 50, y: 100 });
    /// ```
    pub fn midpoint(&self) -> Point {
        Point {
            x: self.x + (self.w / 2) as i32,
            y: self.y + (self.h / 2) as i32,
        }
    }

    /// Check whether this Rect contains `p`.
    ///
    /// The right and bottom edges are exclusive so that a point on the boundary
    /// between two adjacent monitors belongs to exactly one of them.
    pub fn contains_point(&self, p: Point) -> bool {
        let (x, y) = (i64::from(p.x), i64::from(p.y));
        let (x0, y0) = (i64::from(self.x), i64::from(self.y));

        (x0..x0 + i64::from(self.w)).contains(&x) && (y0..y0 + i64::from(self.h)).contains(&y)
    }

    /// The area (in square pixels) of the region shared by this Rect and `other`.
    /// ```
    /// # use tyle::pure::geometry::Rect;
    /// let r1 = Rect::new(0, 0, 100, 100);
    /// let r2 = Rect::new(50, 50, 100, 100);
    ///
    /// assert_eq!(r1.overlap(&r2), 2500);
    /// assert_eq!(r1.overlap(&Rect::new(200, 200, 10, 10)), 0);
    /// ```
    pub fn overlap(&self, other: &Rect) -> u64 {
        let span = |a: i32, la: u32, b: i32, lb: u32| {
            let start = i64::from(a).max(i64::from(b));
            let end = (i64::from(a) + i64::from(la)).min(i64::from(b) + i64::from(lb));

            (end - start).max(0) as u64
        };

        span(self.x, self.w, other.x, other.w) * span(self.y, self.h, other.y, other.h)
    }

    /// Re-express this Rect, currently positioned relative to the monitor area `from`,
    /// in the coordinate space of the monitor area `to`.
    ///
    /// Each axis is scaled independently by the ratio of the two monitor sizes so that
    /// the result occupies the same proportion of `to` as `self` did of `from`. Results
    /// are rounded to the nearest pixel. A degenerate (zero sized) `from` leaves the
    /// corresponding axis unscaled.
    /// ```
    /// # use tyle::pure::geometry::Rect;
    /// let r = Rect::new(10, 10, 200, 100);
    /// let from = Rect::new(0, 0, 1000, 1000);
    /// let to = Rect::new(0, 0, 2000, 500);
    ///
    /// assert_eq!(r.project(&from, &to), Rect::new(20, 5, 400, 50));
    /// ```
    pub fn project(&self, from: &Rect, to: &Rect) -> Rect {
        let ratio = |now: u32, old: u32| {
            if old == 0 {
                1.0
            } else {
                f64::from(now) / f64::from(old)
            }
        };

        let (xrat, yrat) = (ratio(to.w, from.w), ratio(to.h, from.h));
        let x = f64::from(to.x) + f64::from(self.x - from.x) * xrat;
        let y = f64::from(to.y) + f64::from(self.y - from.y) * yrat;

        Rect {
            x: x.round() as i32,
            y: y.round() as i32,
            w: (f64::from(self.w) * xrat).round() as u32,
            h: (f64::from(self.h) * yrat).round() as u32,
        }
    }
}
