use std::cmp::Ordering;

use crate::beachline::ArcIdx;
use crate::heap::Heap;
use crate::{debugln, Point};

pub type EventIdx = u32;

/// The predicted disappearance of an arc from the beachline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircleEvent {
    /// Sweep position where the arc vanishes: the x of the circumcenter plus the circumradius.
    pub x: f64,
    /// The circumcenter, which becomes a vertex of the diagram.
    pub center: Point,
    /// The arc that vanishes.
    pub arc: ArcIdx,
    valid: bool,
}
impl CircleEvent {
    /// False once the event was superseded. Invalid events stay in the queue and are skipped
    /// when they reach the top.
    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// A site to insert in the beachline.
    Site(Point),
    /// A circle event that is still valid.
    Circle(EventIdx),
}

/// A circle event in the heap. The trigger x is copied here so the heap comparator doesn't
/// need to see the event list.
#[derive(Clone, Copy, Debug)]
struct Pending {
    x: f64,
    idx: EventIdx,
}

type Cmp<T> = fn(&T, &T) -> Ordering;

fn by_trigger(a: &Pending, b: &Pending) -> Ordering {
    a.x.partial_cmp(&b.x)
        .unwrap_or(Ordering::Equal)
        .then(a.idx.cmp(&b.idx))
}

/// The site queue and the circle event queue, popped together in sweep order.
pub struct EventQueue {
    sites: Heap<Point, Cmp<Point>>,
    circles: Heap<Pending, Cmp<Pending>>,
    /// Every circle event ever scheduled, indexed by `EventIdx`.
    events: Vec<CircleEvent>,
    discarded: usize,
}
impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}
impl EventQueue {
    pub fn new() -> Self {
        Self {
            sites: Heap::new(Point::cmp as Cmp<Point>),
            circles: Heap::new(by_trigger as Cmp<Pending>),
            events: Vec::new(),
            discarded: 0,
        }
    }

    pub fn push_site(&mut self, p: Point) {
        self.sites.push(p);
    }

    /// Schedule the removal of `arc` when the sweep reaches `x`.
    pub fn push_circle(&mut self, x: f64, center: Point, arc: ArcIdx) -> EventIdx {
        let idx = self.events.len() as EventIdx;
        self.events.push(CircleEvent {
            x,
            center,
            arc,
            valid: true,
        });
        self.circles.push(Pending { x, idx });
        debugln!("scheduled circle event {} at x {} for arc {}", idx, x, arc);
        idx
    }

    pub fn invalidate(&mut self, idx: EventIdx) {
        debugln!("invalidating circle event {}", idx);
        self.events[idx as usize].valid = false;
    }

    pub fn event(&self, idx: EventIdx) -> &CircleEvent {
        &self.events[idx as usize]
    }

    /// Pop the next event in sweep order.
    ///
    /// A circle event is taken before the next site if its trigger x is not greater than the
    /// site's x. Invalid circle events are dropped on the way.
    pub fn pop_next(&mut self) -> Option<Event> {
        loop {
            let circle_first = match (self.circles.peek(), self.sites.peek()) {
                (None, None) => return None,
                (Some(c), Some(s)) => c.x <= s.x,
                (Some(_), None) => true,
                (None, Some(_)) => false,
            };

            if !circle_first {
                return self.sites.pop().map(Event::Site);
            }

            if let Some(Pending { idx, .. }) = self.circles.pop() {
                if self.events[idx as usize].valid {
                    return Some(Event::Circle(idx));
                }
                debugln!("discarding invalid circle event {}", idx);
                self.discarded += 1;
            }
        }
    }

    /// How many circle events were ever scheduled.
    pub fn scheduled(&self) -> usize {
        self.events.len()
    }

    /// How many invalid circle events were popped and dropped.
    pub fn discarded(&self) -> usize {
        self.discarded
    }
}

impl std::fmt::Debug for EventQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventQueue")
            .field("sites", &self.sites)
            .field("circles", &self.circles)
            .finish()
    }
}
