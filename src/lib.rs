//! Voronoi diagrams of point sets, computed with Fortune's sweep-line algorithm.
//!
//! The sweep line moves along the x axis. Sites are added to a [`Voronoi`] one at a time and
//! [`Voronoi::compute`] produces a [`Diagram`], whose edges are plain line [`Segment`]s.
//!
//! ```
//! use sweepline_voronoi::{Point, Voronoi};
//!
//! let mut voronoi = Voronoi::new();
//! voronoi.add_point(Point::new(0.0, 0.0)).unwrap();
//! voronoi.add_point(Point::new(10.0, 0.0)).unwrap();
//! let diagram = voronoi.compute();
//!
//! for segment in diagram.finished_segments() {
//!     assert!((segment.start().x - 5.0).abs() < 1e-9);
//! }
//! ```
use std::cmp::Ordering;

mod beachline;
mod config;
mod error;
mod event;
mod geometry;
mod heap;
mod sweep;


pub use beachline::{Arc, ArcIdx, ArcState, Beachline, CircleState};
pub use config::SweepConfig;
pub use error::{Result, VoronoiError};
pub use event::{CircleEvent, Event, EventIdx, EventQueue};
pub use geometry::{circle, intersection, parabola_x, Bounds};
pub use sweep::{fortune_algorithm, Diagram, SweepStats, Voronoi};

#[macro_export]
macro_rules! debugln {
    ($($arg:tt)*) => {
        #[cfg(not(coverage))]
        if cfg!(feature = "trace") {
            println!($($arg)*)
        }
    };
}

/// A point in 2D space. It is ordered in lexicographic order, x first, which is the order the
/// sweep visits sites in.
#[derive(PartialEq, Clone, Copy, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}
impl std::ops::Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}
impl std::ops::Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}
impl std::ops::Mul<f64> for Point {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}
impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// The z component of the cross product. Positive if `other` is counter-clockwise from
    /// `self`.
    pub fn perp_dot(&self, other: Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn dist(&self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}
impl std::fmt::Debug for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Point")
            .field(&self.x)
            .field(&self.y)
            .finish()
    }
}
impl std::hash::Hash for Point {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.x.to_bits().hash(state);
        self.y.to_bits().hash(state);
    }
}
impl Eq for Point {}
impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Point {
    fn cmp(&self, other: &Self) -> Ordering {
        // Sites are checked to be finite when added, so NaN never reaches the queues.
        let x = self.x.partial_cmp(&other.x).unwrap_or(Ordering::Equal);
        x.then_with(|| self.y.partial_cmp(&other.y).unwrap_or(Ordering::Equal))
    }
}

pub type SegmentIdx = u32;

/// A piece of an edge of the diagram.
///
/// A segment is created open, with only its start point, when the boundary between two arcs
/// appears in the beachline, and is closed exactly once, when that boundary ends at a vertex
/// or is cut by the edge finisher.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    start: Point,
    end: Option<Point>,
    sites: (Point, Point),
}
impl Segment {
    pub fn new(start: Point, sites: (Point, Point)) -> Self {
        Self {
            start,
            end: None,
            sites,
        }
    }

    pub fn start(&self) -> Point {
        self.start
    }

    /// The end point, if the segment was already finished.
    pub fn end(&self) -> Option<Point> {
        self.end
    }

    pub fn is_done(&self) -> bool {
        self.end.is_some()
    }

    /// The two sites whose regions this segment separates.
    pub fn sites(&self) -> (Point, Point) {
        self.sites
    }

    /// Close the segment at `p`. A finished segment is never changed again, so this returns
    /// false and does nothing on the second call.
    pub fn finish(&mut self, p: Point) -> bool {
        if self.end.is_some() {
            return false;
        }
        self.end = Some(p);
        true
    }
}
