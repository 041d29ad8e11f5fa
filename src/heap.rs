use core::fmt;
use std::cmp::Ordering;

/// A binary min-heap, with a custom comparator.
///
/// Elements are never removed from the middle: the event queue invalidates entries in place
/// and drops them when they reach the top.
pub struct Heap<T, F> {
    data: Vec<T>,
    cmp: F,
}
impl<T, F: Fn(&T, &T) -> Ordering> Heap<T, F> {
    pub fn new(cmp: F) -> Self {
        Heap {
            data: Vec::new(),
            cmp,
        }
    }

    pub fn push(&mut self, value: T) {
        self.data.push(value);
        self.sift_up(self.data.len() - 1);
    }

    pub fn pop(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let ret = self.data.swap_remove(0);
        self.sift_down(0);
        Some(ret)
    }

    pub fn peek(&self) -> Option<&T> {
        self.data.first()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn less(&self, i: usize, j: usize) -> bool {
        (self.cmp)(&self.data[i], &self.data[j]) == Ordering::Less
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if !self.less(i, parent) {
                break;
            }
            self.data.swap(i, parent);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let len = self.data.len();
        loop {
            let l = 2 * i + 1;
            let r = l + 1;
            if l >= len {
                break;
            }
            let child = if r < len && self.less(r, l) { r } else { l };
            if !self.less(child, i) {
                break;
            }
            self.data.swap(i, child);
            i = child;
        }
    }
}

impl<T: fmt::Debug, F> fmt::Debug for Heap<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self.data)
    }
}
