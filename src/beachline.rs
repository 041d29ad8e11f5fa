use crate::event::{EventIdx, EventQueue};
use crate::geometry::{circle, intersection, near, parabola_x, same_sweep};
use crate::{debugln, Point, Segment, SegmentIdx};

pub type ArcIdx = u32;

/// Whether an arc has a circle event in the queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CircleState {
    Idle,
    Scheduled(EventIdx),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArcState {
    /// Part of the beachline.
    Active,
    /// Unlinked by its circle event. Terminal.
    Removed,
}

/// The parabolic front of one site.
#[derive(Clone, Debug)]
pub struct Arc {
    pub site: Point,
    /// The arc below this one.
    pub prev: Option<ArcIdx>,
    /// The arc above this one.
    pub next: Option<ArcIdx>,
    pub circle: CircleState,
    /// The edge traced by the breakpoint with `prev`.
    pub left: Option<SegmentIdx>,
    /// The edge traced by the breakpoint with `next`.
    pub right: Option<SegmentIdx>,
    pub state: ArcState,
}

/// The sweep front: a doubly linked list of arcs, ordered by increasing y.
///
/// Arcs live in an arena and link to each other by index. A removed arc keeps its slot, marked
/// as [`ArcState::Removed`], so stale handles held by old events stay harmless.
#[derive(Clone)]
pub struct Beachline {
    arcs: Vec<Arc>,
    head: Option<ArcIdx>,
    epsilon: f64,
}
impl std::fmt::Debug for Beachline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.iter().map(|i| (i, self.get(i).site)))
            .finish()
    }
}
impl Beachline {
    pub fn new(epsilon: f64) -> Self {
        Self {
            arcs: Vec::new(),
            head: None,
            epsilon,
        }
    }

    /// The lowest arc.
    pub fn head(&self) -> Option<ArcIdx> {
        self.head
    }

    pub fn arc(&self, i: ArcIdx) -> &Arc {
        self.get(i)
    }

    /// Number of arcs currently in the beachline.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// The arcs, from bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = ArcIdx> + '_ {
        std::iter::successors(self.head, move |&i| self.get(i).next)
    }

    /// The sites of the arcs, from bottom to top. A site can appear many times.
    pub fn sites(&self) -> impl Iterator<Item = Point> + '_ {
        self.iter().map(|i| self.get(i).site)
    }

    fn get(&self, i: ArcIdx) -> &Arc {
        &self.arcs[i as usize]
    }

    fn get_mut(&mut self, i: ArcIdx) -> &mut Arc {
        &mut self.arcs[i as usize]
    }

    fn alloc(&mut self, site: Point, prev: Option<ArcIdx>, next: Option<ArcIdx>) -> ArcIdx {
        let idx = self.arcs.len() as ArcIdx;
        self.arcs.push(Arc {
            site,
            prev,
            next,
            circle: CircleState::Idle,
            left: None,
            right: None,
            state: ArcState::Active,
        });
        idx
    }

    /// Insert the site `p`, with the sweep line at `p.x`.
    ///
    /// The arc above `p` is split in two, with the new arc in between, and the two new
    /// boundaries start tracing segments from the point of the old arc level with `p`. If
    /// no arc is above `p` (every arc so far has the same x as `p`), `p` is appended on top,
    /// with a horizontal boundary starting at `x_min`.
    ///
    /// If `p` lands exactly on the breakpoint of two arcs, it goes in between them without a
    /// split. The breakpoint is a vertex of the diagram and is returned.
    pub fn insert_site(
        &mut self,
        p: Point,
        x_min: f64,
        queue: &mut EventQueue,
        segments: &mut Vec<Segment>,
    ) -> Option<Point> {
        let Some(head) = self.head else {
            debugln!("first site {:?}", p);
            self.head = Some(self.alloc(p, None, None));
            return None;
        };

        let found = self
            .iter()
            .find_map(|i| self.intersect(p, i).map(|z| (i, z)));

        if let Some((lower, upper, vertex)) = found.and_then(|(i, _)| self.on_breakpoint(p, i)) {
            self.insert_between(p, lower, upper, vertex, queue, segments);
            return Some(vertex);
        }

        let Some((i, z)) = found else {
            let last = self.iter().last().unwrap_or(head);
            let q = self.get(last).site;
            debugln!("{:?} is under no arc, appending after {:?}", p, q);

            let j = self.alloc(p, Some(last), None);
            self.get_mut(last).next = Some(j);

            let start = Point::new(x_min, (p.y + q.y) / 2.0);
            let s = push_segment(segments, Segment::new(start, (q, p)));
            self.get_mut(last).right = Some(s);
            self.get_mut(j).left = Some(s);
            return None;
        };

        let site = self.get(i).site;
        let next = self.get(i).next;
        debugln!("{:?} splits arc {} of {:?} at {:?}", p, i, site, z);

        // i, j, copy, next
        let copy = self.alloc(site, None, next);
        if let Some(next) = next {
            self.get_mut(next).prev = Some(copy);
        }
        self.get_mut(copy).right = self.get(i).right;

        let j = self.alloc(p, Some(i), Some(copy));
        self.get_mut(copy).prev = Some(j);
        self.get_mut(i).next = Some(j);

        let left = push_segment(segments, Segment::new(z, (site, p)));
        let right = push_segment(segments, Segment::new(z, (p, site)));
        self.get_mut(i).right = Some(left);
        self.get_mut(j).left = Some(left);
        self.get_mut(j).right = Some(right);
        self.get_mut(copy).left = Some(right);

        self.check_circle_event(j, p.x, queue);
        self.check_circle_event(i, p.x, queue);
        self.check_circle_event(copy, p.x, queue);
        None
    }

    /// If `p` lies on the lower or upper breakpoint of arc `i`, return the arcs meeting there,
    /// bottom first, and the breakpoint.
    ///
    /// Splitting `i` there would leave a piece of it with no width between `p` and the
    /// neighbor, squeezed by a circle through `p` that is tangent to the sweep line.
    fn on_breakpoint(&self, p: Point, i: ArcIdx) -> Option<(ArcIdx, ArcIdx, Point)> {
        let arc = self.get(i);
        let upper = arc
            .next
            .map(|next| (i, next, (p, arc.site, self.get(next).site)));
        let lower = arc
            .prev
            .map(|prev| (prev, i, (self.get(prev).site, arc.site, p)));

        upper.into_iter().chain(lower).find_map(|(lo, hi, (a, b, c))| {
            let (x, center) = circle(a, b, c, self.epsilon)?;
            (x <= p.x || same_sweep(x, p.x, self.epsilon)).then_some((lo, hi, center))
        })
    }

    /// Link `p` between the adjacent arcs `lower` and `upper`, at the vertex where their
    /// boundary ends.
    fn insert_between(
        &mut self,
        p: Point,
        lower: ArcIdx,
        upper: ArcIdx,
        vertex: Point,
        queue: &mut EventQueue,
        segments: &mut Vec<Segment>,
    ) {
        debugln!("{:?} hits the breakpoint of {} and {} at {:?}", p, lower, upper, vertex);

        if let Some(s) = self.get(lower).right {
            segments[s as usize].finish(vertex);
        }

        let j = self.alloc(p, Some(lower), Some(upper));
        self.get_mut(lower).next = Some(j);
        self.get_mut(upper).prev = Some(j);

        let (a, b) = (self.get(lower).site, self.get(upper).site);
        let left = push_segment(segments, Segment::new(vertex, (a, p)));
        let right = push_segment(segments, Segment::new(vertex, (p, b)));
        self.get_mut(lower).right = Some(left);
        self.get_mut(j).left = Some(left);
        self.get_mut(j).right = Some(right);
        self.get_mut(upper).left = Some(right);

        self.check_circle_event(lower, p.x, queue);
        self.check_circle_event(upper, p.x, queue);
    }

    /// Check if arc `i` will vanish, with the sweep line at `x0`, and schedule a circle event
    /// for it. Any event scheduled before for `i` is superseded, and invalidated if it was for
    /// a different x.
    ///
    /// A circle tangent to the sweep line at `x0` means the arc already has no width: it is
    /// scheduled at `x0` and collapses before the sweep moves on.
    pub fn check_circle_event(&mut self, i: ArcIdx, x0: f64, queue: &mut EventQueue) -> bool {
        if let CircleState::Scheduled(e) = self.get(i).circle {
            if !same_sweep(queue.event(e).x, x0, self.epsilon) {
                queue.invalidate(e);
            }
        }
        self.get_mut(i).circle = CircleState::Idle;

        let arc = self.get(i);
        let (Some(prev), Some(next)) = (arc.prev, arc.next) else {
            return false;
        };

        let Some((x, center)) = circle(
            self.get(prev).site,
            arc.site,
            self.get(next).site,
            self.epsilon,
        ) else {
            return false;
        };

        if x > x0 || same_sweep(x, x0, self.epsilon) {
            let e = queue.push_circle(x.max(x0), center, i);
            self.get_mut(i).circle = CircleState::Scheduled(e);
            return true;
        }

        false
    }

    /// If the horizontal line through `p` hits arc `i` (with the sweep line at `p.x`), return
    /// the point where it does.
    pub fn intersect(&self, p: Point, i: ArcIdx) -> Option<Point> {
        let arc = self.get(i);

        // the arc is a ray, with nothing below or above it
        if near(arc.site.x, p.x, self.epsilon) {
            return None;
        }

        let above_prev = arc.prev.map_or(true, |prev| {
            intersection(self.get(prev).site, arc.site, p.x, self.epsilon).y <= p.y
        });
        let below_next = arc.next.map_or(true, |next| {
            p.y <= intersection(arc.site, self.get(next).site, p.x, self.epsilon).y
        });

        if above_prev && below_next {
            Some(Point::new(parabola_x(arc.site, p.y, p.x), p.y))
        } else {
            None
        }
    }

    /// Unlink arc `i`. `segment` becomes the boundary between its old neighbors, which are
    /// returned.
    pub fn remove(
        &mut self,
        i: ArcIdx,
        segment: SegmentIdx,
        queue: &mut EventQueue,
    ) -> (Option<ArcIdx>, Option<ArcIdx>) {
        let (prev, next) = (self.get(i).prev, self.get(i).next);
        debugln!("removing arc {} between {:?} and {:?}", i, prev, next);

        match prev {
            Some(prev) => {
                let arc = self.get_mut(prev);
                arc.next = next;
                arc.right = Some(segment);
            }
            None => self.head = next,
        }
        if let Some(next) = next {
            let arc = self.get_mut(next);
            arc.prev = prev;
            arc.left = Some(segment);
        }

        let arc = self.get_mut(i);
        arc.prev = None;
        arc.next = None;
        arc.state = ArcState::Removed;
        if let CircleState::Scheduled(e) = std::mem::replace(&mut arc.circle, CircleState::Idle) {
            queue.invalidate(e);
        }

        (prev, next)
    }
}

pub(crate) fn push_segment(segments: &mut Vec<Segment>, segment: Segment) -> SegmentIdx {
    let idx = segments.len() as SegmentIdx;
    segments.push(segment);
    idx
}
