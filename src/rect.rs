/// A rectangular portion of the infinite grid.
///
/// `(x, y)` is the top-left corner; the rectangle covers the columns
/// `x..x + width` and the rows `y - height + 1..=y` (rows grow northwards).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LifeRect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl LifeRect {
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The square of side `width` whose lower-left cell is `(x, y)`.
    pub fn from_lower_left(x: i64, y: i64, width: i64) -> Self {
        Self::new(x, y + width - 1, width, width)
    }

    /// Lowest row covered by the rectangle.
    pub fn bottom(&self) -> i64 {
        self.y - self.height + 1
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn contains(&self, x: i64, y: i64) -> bool {
        self.x <= x && x < self.x + self.width && self.bottom() <= y && y <= self.y
    }

    /// Two rectangles overlap iff both their horizontal and vertical extents do.
    pub fn overlaps(&self, other: &LifeRect) -> bool {
        fn segments_overlap(p1: i64, l1: i64, p2: i64, l2: i64) -> bool {
            p1 < p2 + l2 && p2 < p1 + l1
        }

        !self.is_empty()
            && !other.is_empty()
            && segments_overlap(self.x, self.width, other.x, other.width)
            && segments_overlap(self.bottom(), self.height, other.bottom(), other.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_uses_top_left_corner() {
        let r = LifeRect::new(-2, 3, 4, 2);
        assert!(r.contains(-2, 3));
        assert!(r.contains(1, 2));
        assert!(!r.contains(2, 3));
        assert!(!r.contains(0, 1));
        assert!(!r.contains(0, 4));
    }

    #[test]
    fn test_overlaps() {
        let r = LifeRect::new(0, 9, 10, 10);
        assert!(r.overlaps(&LifeRect::from_lower_left(9, 9, 5)));
        assert!(r.overlaps(&LifeRect::from_lower_left(-4, -4, 5)));
        assert!(!r.overlaps(&LifeRect::from_lower_left(10, 0, 5)));
        assert!(!r.overlaps(&LifeRect::from_lower_left(0, -5, 5)));
        assert!(!r.overlaps(&LifeRect::new(0, 9, 0, 10)));
    }

    #[test]
    fn test_from_lower_left() {
        let r = LifeRect::from_lower_left(-8, -8, 16);
        assert_eq!(r, LifeRect::new(-8, 7, 16, 16));
        assert_eq!(r.bottom(), -8);
    }
}
