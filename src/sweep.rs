use std::fmt;

use crate::beachline::{push_segment, ArcState, Beachline};
use crate::config::SweepConfig;
use crate::error::{Result, VoronoiError};
use crate::event::{Event, EventIdx, EventQueue};
use crate::geometry::{intersection, Bounds};
use crate::{debugln, Point, Segment};

/// Collects the sites of a diagram.
///
/// Sites can be added in any order; the sweep visits them by increasing x.
#[derive(Debug)]
pub struct Voronoi {
    config: SweepConfig,
    queue: EventQueue,
    bounds: Option<Bounds>,
    sites: usize,
}
impl Default for Voronoi {
    fn default() -> Self {
        Self::new()
    }
}
impl Voronoi {
    pub fn new() -> Self {
        Self {
            config: SweepConfig::default(),
            queue: EventQueue::new(),
            bounds: None,
            sites: 0,
        }
    }

    pub fn with_config(config: SweepConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::new()
        })
    }

    pub fn add_point(&mut self, p: Point) -> Result<()> {
        if !p.is_finite() {
            return Err(VoronoiError::NonFiniteSite { x: p.x, y: p.y });
        }

        match &mut self.bounds {
            Some(bounds) => bounds.include(p),
            None => self.bounds = Some(Bounds::from_point(p)),
        }
        self.queue.push_site(p);
        self.sites += 1;
        Ok(())
    }

    /// Add every point of `points`, stopping at the first invalid one.
    pub fn add_points(&mut self, points: impl IntoIterator<Item = Point>) -> Result<()> {
        points.into_iter().try_for_each(|p| self.add_point(p))
    }

    /// Number of sites added so far.
    pub fn len(&self) -> usize {
        self.sites
    }

    pub fn is_empty(&self) -> bool {
        self.sites == 0
    }

    /// The bounding box of the sites added so far, before padding.
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    pub fn compute(self) -> Diagram {
        self.compute_with_progress(&mut |_, _| {})
    }

    /// Run the sweep, calling `on_progress` with the beachline and the segments after every
    /// event.
    pub fn compute_with_progress(
        self,
        on_progress: &mut impl FnMut(&Beachline, &[Segment]),
    ) -> Diagram {
        let bounds = self
            .bounds
            .unwrap_or_else(|| Bounds::from_point(Point::default()))
            .padded(self.config.margin_ratio);

        let mut sweep = Sweep {
            beachline: Beachline::new(self.config.epsilon),
            queue: self.queue,
            segments: Vec::new(),
            vertices: Vec::new(),
            sites: Vec::new(),
            bounds,
            epsilon: self.config.epsilon,
            sweep_x: f64::NEG_INFINITY,
            last_site: None,
            stats: SweepStats {
                sites: self.sites,
                ..SweepStats::default()
            },
        };

        sweep.run(on_progress);
        sweep.finish_edges();

        sweep.stats.circle_events_scheduled = sweep.queue.scheduled();
        sweep.stats.circle_events_discarded += sweep.queue.discarded();

        Diagram {
            segments: sweep.segments,
            vertices: sweep.vertices,
            sites: sweep.sites,
            beachline: sweep.beachline.sites().collect(),
            bounds: sweep.bounds,
            stats: sweep.stats,
        }
    }
}

/// Compute the diagram of `sites` with the default configuration.
pub fn fortune_algorithm(sites: &[Point]) -> Result<Diagram> {
    let mut voronoi = Voronoi::new();
    voronoi.add_points(sites.iter().copied())?;
    Ok(voronoi.compute())
}

/// Counters of a finished sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SweepStats {
    /// Sites added, duplicates included.
    pub sites: usize,
    /// Sites skipped because an identical site was already swept.
    pub duplicate_sites: usize,
    pub circle_events_scheduled: usize,
    /// Circle events that removed an arc and produced a vertex.
    pub circle_events_fired: usize,
    /// Sites that landed exactly on a breakpoint of the beachline. Each produced a vertex.
    pub breakpoint_sites: usize,
    /// Circle events dropped because they were invalidated or their arc was already gone.
    pub circle_events_discarded: usize,
}

struct Sweep {
    beachline: Beachline,
    queue: EventQueue,
    segments: Vec<Segment>,
    vertices: Vec<Point>,
    /// Distinct sites, in sweep order.
    sites: Vec<Point>,
    /// The padded bounding box.
    bounds: Bounds,
    epsilon: f64,
    sweep_x: f64,
    last_site: Option<Point>,
    stats: SweepStats,
}
impl Sweep {
    fn run(&mut self, on_progress: &mut impl FnMut(&Beachline, &[Segment])) {
        while let Some(event) = self.queue.pop_next() {
            match event {
                Event::Site(p) => self.process_site(p),
                Event::Circle(e) => self.process_circle_event(e),
            }
            on_progress(&self.beachline, &self.segments);
        }
    }

    fn advance(&mut self, x: f64) {
        debug_assert!(x >= self.sweep_x, "sweep moved back from {} to {}", self.sweep_x, x);
        self.sweep_x = x;
    }

    fn process_site(&mut self, p: Point) {
        debugln!("site {:?} in {:?}", p, self.beachline);
        self.advance(p.x);

        // duplicates are adjacent in the site queue
        if self.last_site == Some(p) {
            debugln!("duplicated site {:?}", p);
            self.stats.duplicate_sites += 1;
            return;
        }
        self.last_site = Some(p);
        self.sites.push(p);

        let vertex =
            self.beachline
                .insert_site(p, self.bounds.x_min, &mut self.queue, &mut self.segments);
        if let Some(vertex) = vertex {
            self.stats.breakpoint_sites += 1;
            self.vertices.push(vertex);
        }
    }

    fn process_circle_event(&mut self, e: EventIdx) {
        let event = *self.queue.event(e);
        let arc = self.beachline.arc(event.arc).clone();
        debugln!("circle event {} {:?} in {:?}", e, event, self.beachline);

        let (ArcState::Active, Some(prev), Some(next)) = (arc.state, arc.prev, arc.next) else {
            debugln!("arc {} is gone", event.arc);
            self.stats.circle_events_discarded += 1;
            return;
        };

        self.advance(event.x);
        self.stats.circle_events_fired += 1;
        self.vertices.push(event.center);

        let sites = (
            self.beachline.arc(prev).site,
            self.beachline.arc(next).site,
        );
        let s = push_segment(&mut self.segments, Segment::new(event.center, sites));

        self.beachline.remove(event.arc, s, &mut self.queue);

        // the two edges of the removed arc end at the new vertex
        for seg in [arc.left, arc.right].into_iter().flatten() {
            self.segments[seg as usize].finish(event.center);
        }

        self.beachline
            .check_circle_event(prev, event.x, &mut self.queue);
        self.beachline
            .check_circle_event(next, event.x, &mut self.queue);
    }

    /// Cut the edges still traced by the beachline, by moving the sweep line far past the
    /// bounding box.
    fn finish_edges(&mut self) {
        let far = self.bounds.x_max + 2.0 * (self.bounds.width() + self.bounds.height());
        debugln!("finishing edges at x {}", far);

        let arcs: Vec<_> = self.beachline.iter().collect();
        for pair in arcs.windows(2) {
            let (a, b) = (self.beachline.arc(pair[0]), self.beachline.arc(pair[1]));
            if let Some(seg) = a.right {
                let end = intersection(a.site, b.site, far, self.epsilon);
                self.segments[seg as usize].finish(end);
            }
        }
    }
}

/// The result of a sweep.
#[derive(Clone, Debug)]
pub struct Diagram {
    segments: Vec<Segment>,
    vertices: Vec<Point>,
    sites: Vec<Point>,
    beachline: Vec<Point>,
    bounds: Bounds,
    stats: SweepStats,
}
impl Diagram {
    /// Every segment created by the sweep, in creation order.
    ///
    /// An edge of the diagram may be made of more than one segment: a boundary that starts
    /// where a new site hits the beachline grows in both directions, and is emitted as two
    /// segments sharing their start point.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn finished_segments(&self) -> impl Iterator<Item = &Segment> + '_ {
        self.segments.iter().filter(|s| s.is_done())
    }

    /// The finished segments cut to the padded bounding box. Segments entirely outside it are
    /// left out.
    pub fn clipped_segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.segments
            .iter()
            .filter_map(|s| self.bounds.clip(s.start(), s.end()?))
    }

    /// The segments on the boundary of the cell of `site`.
    pub fn cell_segments(&self, site: Point) -> impl Iterator<Item = &Segment> + '_ {
        self.segments.iter().filter(move |s| {
            let (a, b) = s.sites();
            a == site || b == site
        })
    }

    /// The vertices of the diagram, in discovery order: one per fired circle event and one per
    /// site that landed on a breakpoint. Cocircular sites give repeated vertices.
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// The distinct sites, by increasing x.
    pub fn sites(&self) -> &[Point] {
        &self.sites
    }

    /// The sites of the final beachline, from bottom to top.
    pub fn beachline_sites(&self) -> &[Point] {
        &self.beachline
    }

    /// The bounding box of the sites, padded by the configured margin.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn stats(&self) -> SweepStats {
        self.stats
    }

    /// The index in [`Self::beachline_sites`] of the site closest to `q`, or `None` if there
    /// are no sites.
    ///
    /// This is an approximation, not a point location in the computed diagram: it scans the
    /// final beachline by Euclidean distance. Only sites with unbounded cells are left in the
    /// beachline, so for a `q` inside a bounded cell the answer is the nearest of those sites,
    /// not the owner of the cell. Use [`Self::nearest_site`] for that.
    pub fn locate_cell(&self, q: Point) -> Option<usize> {
        nearest(&self.beachline, q)
    }

    /// The site closest to `q`, by a linear scan over all sites. This is the site whose cell
    /// contains `q`.
    pub fn nearest_site(&self, q: Point) -> Option<Point> {
        nearest(&self.sites, q).map(|i| self.sites[i])
    }
}

fn nearest(sites: &[Point], q: Point) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, site) in sites.iter().enumerate() {
        let d = q.dist(*site);
        if best.map_or(true, |(_, min)| d < min) {
            best = Some((i, d));
        }
    }
    best.map(|(i, _)| i)
}

/// One line with the padded bounding box, `x_min x_max y_min y_max`, then one line
/// `start.x start.y end.x end.y` per finished segment.
impl fmt::Display for Diagram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = self.bounds;
        writeln!(f, "{} {} {} {}", b.x_min, b.x_max, b.y_min, b.y_max)?;
        for s in &self.segments {
            if let Some(end) = s.end() {
                writeln!(f, "{} {} {} {}", s.start().x, s.start().y, end.x, end.y)?;
            }
        }
        Ok(())
    }
}
