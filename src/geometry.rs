use crate::Point;

/// Axis aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}
impl Bounds {
    /// The degenerate box containing only `p`.
    pub fn from_point(p: Point) -> Self {
        Self {
            x_min: p.x,
            x_max: p.x,
            y_min: p.y,
            y_max: p.y,
        }
    }

    /// Grow the box to contain `p`.
    pub fn include(&mut self, p: Point) {
        self.x_min = self.x_min.min(p.x);
        self.x_max = self.x_max.max(p.x);
        self.y_min = self.y_min.min(p.y);
        self.y_max = self.y_max.max(p.y);
    }

    /// Grow each side by `ratio * (extent + 1)`. The `+ 1` keeps a box around a single point
    /// from staying empty.
    pub fn padded(self, ratio: f64) -> Self {
        let dx = (self.width() + 1.0) * ratio;
        let dy = (self.height() + 1.0) * ratio;
        Self {
            x_min: self.x_min - dx,
            x_max: self.x_max + dx,
            y_min: self.y_min - dy,
            y_max: self.y_max + dy,
        }
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    pub fn contains(&self, p: Point) -> bool {
        (self.x_min..=self.x_max).contains(&p.x) && (self.y_min..=self.y_max).contains(&p.y)
    }

    /// Clip the segment `a`-`b` to the box (Liang-Barsky). Returns `None` if no part of it is
    /// inside.
    pub fn clip(&self, a: Point, b: Point) -> Option<(Point, Point)> {
        let d = b - a;

        let p = [-d.x, d.x, -d.y, d.y];
        let q = [
            a.x - self.x_min,
            self.x_max - a.x,
            a.y - self.y_min,
            self.y_max - a.y,
        ];

        let mut t0 = 0.0_f64;
        let mut t1 = 1.0_f64;

        for (p, q) in p.into_iter().zip(q) {
            if p == 0.0 {
                // parallel to this side
                if q < 0.0 {
                    return None;
                }
            } else {
                let t = q / p;
                if p < 0.0 {
                    t0 = t0.max(t);
                } else {
                    t1 = t1.min(t);
                }
            }
        }

        if t0 > t1 {
            return None;
        }

        Some((a + d * t0, a + d * t1))
    }
}

/// Coordinate equality up to `epsilon`. With an epsilon of zero this is exact equality.
pub(crate) fn near(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() <= epsilon
}

/// Relative error of a circle event x, computed from three sites.
const SWEEP_ROUNDING: f64 = 1e-12;

/// Whether two sweep positions are the same, up to `epsilon` or to the rounding of
/// [`circle`]. Circles through different triples of cocircular sites must compare equal here.
pub(crate) fn same_sweep(a: f64, b: f64, epsilon: f64) -> bool {
    let scale = a.abs().max(b.abs()).max(1.0);
    (a - b).abs() <= epsilon.max(SWEEP_ROUNDING * scale)
}

/// Find the circle through `a`, `b` and `c`, for the arc of `b` between the arcs of `a` and
/// `c`.
///
/// Returns the x coordinate where the sweep line becomes tangent to the circle, which is when
/// the arc of `b` shrinks to nothing, and the center of the circle. Returns `None` if `c` is a
/// left turn from `a`->`b` (the arc is growing, not collapsing) or if the points are collinear.
pub fn circle(a: Point, b: Point, c: Point, epsilon: f64) -> Option<(f64, Point)> {
    let ab = b - a;
    let ac = c - a;

    if ab.perp_dot(ac) > 0.0 {
        return None;
    }

    // O'Rourke, Computational Geometry in C, 2nd ed. p. 189.
    let e = ab.x * (a.x + b.x) + ab.y * (a.y + b.y);
    let f = ac.x * (a.x + c.x) + ac.y * (a.y + c.y);
    let g = 2.0 * (ab.x * (c.y - b.y) - ab.y * (c.x - b.x));

    if near(g, 0.0, epsilon) {
        // collinear
        return None;
    }

    let center = Point::new((ac.y * e - ab.y * f) / g, (ab.x * f - ac.x * e) / g);

    // the rightmost point of the circle
    let x = center.x + a.dist(center);

    Some((x, center))
}

/// The x coordinate of the parabola with the given `focus` and directrix `x = l`, at height
/// `y`.
///
/// A focus on the directrix degenerates the parabola into a horizontal ray; in that case this
/// returns `l`.
pub fn parabola_x(focus: Point, y: f64, l: f64) -> f64 {
    let d = 2.0 * (focus.x - l);
    if d == 0.0 {
        return l;
    }
    let dy = focus.y - y;
    (focus.x * focus.x + dy * dy - l * l) / d
}

/// The breakpoint between the parabola of `p0` (below) and the parabola of `p1` (above), both
/// with directrix `x = l`.
pub fn intersection(p0: Point, p1: Point, l: f64, epsilon: f64) -> Point {
    let mut p = p0;

    let y = if near(p0.x, p1.x, epsilon) {
        (p0.y + p1.y) / 2.0
    } else if near(p1.x, l, epsilon) {
        p1.y
    } else if near(p0.x, l, epsilon) {
        p = p1;
        p0.y
    } else {
        // Equate the two parabolas and solve the quadratic in y.
        let z0 = 2.0 * (p0.x - l);
        let z1 = 2.0 * (p1.x - l);

        let a = 1.0 / z0 - 1.0 / z1;
        let b = -2.0 * (p0.y / z0 - p1.y / z1);
        let c = (p0.y * p0.y + p0.x * p0.x - l * l) / z0
            - (p1.y * p1.y + p1.x * p1.x - l * l) / z1;

        // Two distinct parabolas opening the same way always cross, so the discriminant is
        // only negative by rounding.
        let disc = (b * b - 4.0 * a * c).max(0.0);
        (-b - disc.sqrt()) / (2.0 * a)
    };

    Point::new(parabola_x(p, y, l), y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debugln;
    use proptest::prelude::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= (a.abs() + b.abs()).max(1.0) * 1e-9
    }

    #[test]
    fn circle_of_triangle() {
        let a = Point::new(10.0, 0.0);
        let b = Point::new(0.0, 0.0);
        let c = Point::new(5.0, 10.0);

        let (x, o) = circle(a, b, c, 0.0).unwrap();

        assert!(close(o.x, 5.0));
        assert!(close(o.y, 3.75));
        assert!(close(x, 5.0 + 6.25));
    }

    #[test]
    fn circle_rejects_left_turn() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        let c = Point::new(5.0, 10.0);

        assert_eq!(circle(a, b, c, 0.0), None);
    }

    #[test]
    fn sweep_positions_compare_up_to_rounding() {
        let x = 1.0 + 2.0f64.sqrt();
        assert!(same_sweep(x, x + 4.0 * f64::EPSILON, 0.0));
        assert!(!same_sweep(x, x + 1e-9, 0.0));
        assert!(same_sweep(x, x + 1e-9, 1e-6));
        assert!(same_sweep(1e9, 1e9 + 1e-4, 0.0));
    }

    #[test]
    fn circle_rejects_collinear() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(5.0, 0.0);
        let c = Point::new(10.0, 0.0);

        assert_eq!(circle(a, b, c, 0.0), None);
        assert_eq!(circle(c, b, a, 0.0), None);
        // two arcs of the same site around another one
        assert_eq!(circle(a, b, a, 0.0), None);
    }

    proptest! {
        #[test]
        fn circle_is_circumscribed(a: (i8, i8), b: (i8, i8), c: (i8, i8)) {
            let a = Point::new(a.0 as f64, a.1 as f64);
            let b = Point::new(b.0 as f64, b.1 as f64);
            let c = Point::new(c.0 as f64, c.1 as f64);

            let Some((x, o)) = circle(a, b, c, 0.0) else {
                return Ok(());
            };

            let (ra, rb, rc) = (a.dist(o), b.dist(o), c.dist(o));
            debugln!("ra: {}, rb: {}, rc: {}", ra, rb, rc);

            prop_assert!(close(ra, rb));
            prop_assert!(close(ra, rc));
            prop_assert!(close(x, o.x + ra));
        }

        #[test]
        fn breakpoint_is_equidistant(p0: (i8, i8), p1: (i8, i8), dl in 1u8..100) {
            let p0 = Point::new(p0.0 as f64, p0.1 as f64);
            let p1 = Point::new(p1.0 as f64, p1.1 as f64);
            prop_assume!(p0 != p1);

            // the directrix is always to the right of the sites
            let l = p0.x.max(p1.x) + dl as f64;
            let z = intersection(p0, p1, l, 0.0);

            let d0 = p0.dist(z);
            let d1 = p1.dist(z);
            let dl = l - z.x;
            debugln!("z: {:?}, d0: {}, d1: {}, dl: {}", z, d0, d1, dl);

            prop_assert!((d0 - d1).abs() <= d0.max(1.0) * 1e-6);
            prop_assert!((d0 - dl).abs() <= d0.max(1.0) * 1e-6);
        }
    }

    #[test]
    fn breakpoint_equal_x() {
        let z = intersection(Point::new(0.0, 0.0), Point::new(0.0, 4.0), 2.0, 0.0);
        assert_eq!(z.y, 2.0);
        // (0 + 4 - 4) / -4
        assert_eq!(z.x, 0.0);
    }

    #[test]
    fn breakpoint_on_directrix() {
        let p0 = Point::new(0.0, 0.0);
        let p1 = Point::new(10.0, 0.0);

        // p1 is on the directrix, the breakpoint is right to its left
        let z = intersection(p0, p1, 10.0, 0.0);
        assert_eq!(z, Point::new(5.0, 0.0));

        let z = intersection(p1, p0, 10.0, 0.0);
        assert_eq!(z, Point::new(5.0, 0.0));
    }

    #[test]
    fn breakpoint_orders_lower_first() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(5.0, 10.0);

        let low = intersection(a, b, 10.0, 0.0);
        let high = intersection(b, a, 10.0, 0.0);

        assert!(low.y < high.y, "{:?} {:?}", low, high);
    }

    #[test]
    fn parabola_degenerate() {
        assert_eq!(parabola_x(Point::new(3.0, 1.0), 7.0, 3.0), 3.0);
        // the vertex of the parabola is halfway to the directrix
        assert_eq!(parabola_x(Point::new(0.0, 0.0), 0.0, 4.0), 2.0);
    }

    #[test]
    fn bounds() {
        let mut b = Bounds::from_point(Point::new(0.0, 0.0));
        b.include(Point::new(10.0, -4.0));
        assert_eq!(
            b,
            Bounds {
                x_min: 0.0,
                x_max: 10.0,
                y_min: -4.0,
                y_max: 0.0
            }
        );

        let p = b.padded(0.2);
        assert!(close(p.x_min, -2.2));
        assert!(close(p.x_max, 12.2));
        assert!(close(p.y_min, -5.0));
        assert!(close(p.y_max, 1.0));
        assert!(p.contains(Point::new(11.0, 0.5)));
        assert!(!p.contains(Point::new(13.0, 0.5)));
    }

    #[test]
    fn clip_segment() {
        let b = Bounds {
            x_min: 0.0,
            x_max: 10.0,
            y_min: 0.0,
            y_max: 10.0,
        };

        let (a, c) = b
            .clip(Point::new(5.0, -10.0), Point::new(5.0, 20.0))
            .unwrap();
        assert!(close(a.x, 5.0) && close(a.y, 0.0), "{:?}", a);
        assert!(close(c.x, 5.0) && close(c.y, 10.0), "{:?}", c);

        let inside = (Point::new(1.0, 1.0), Point::new(2.0, 3.0));
        assert_eq!(b.clip(inside.0, inside.1), Some(inside));

        assert_eq!(b.clip(Point::new(-5.0, 1.0), Point::new(-1.0, 20.0)), None);
        assert_eq!(b.clip(Point::new(11.0, 1.0), Point::new(11.0, 2.0)), None);
    }
}
