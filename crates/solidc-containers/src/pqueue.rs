//! Priority queue
//!
//! A binary max-heap over a caller-supplied comparator: the element the
//! comparator ranks greatest is always on top. [`MinQueue`] and [`MaxQueue`]
//! cover the common `Ord` cases.
//!
//! ```
//! use solidc_containers::PriorityQueue;
//!
//! // Shortest job first.
//! let mut jobs = PriorityQueue::new(|a: &Job, b: &Job| b.secs.cmp(&a.secs));
//! jobs.push(Job { name: "build", secs: 30 });
//! jobs.push(Job { name: "lint", secs: 5 });
//! jobs.push(Job { name: "test", secs: 12 });
//! assert_eq!(jobs.pop().map(|j| j.name), Some("lint"));
//! assert_eq!(jobs.peek().map(|j| j.secs), Some(12));
//!
//! struct Job {
//!     name: &'static str,
//!     secs: u32,
//! }
//! ```

use std::cmp::Ordering;
use std::fmt;

/// Binary heap ordered by `F`.
pub struct PriorityQueue<T, F>
where
    F: FnMut(&T, &T) -> Ordering,
{
    heap: Vec<T>,
    cmp: F,
}

/// Comparator type of the [`MinQueue`]/[`MaxQueue`] aliases.
pub type OrdFn<T> = fn(&T, &T) -> Ordering;

/// Queue popping the smallest element first.
pub type MinQueue<T> = PriorityQueue<T, OrdFn<T>>;

/// Queue popping the largest element first.
pub type MaxQueue<T> = PriorityQueue<T, OrdFn<T>>;

impl<T: Ord> PriorityQueue<T, OrdFn<T>> {
    /// Empty queue popping the smallest element first.
    pub fn min() -> MinQueue<T> {
        Self::new(|a, b| b.cmp(a))
    }

    /// Empty queue popping the largest element first.
    pub fn max() -> MaxQueue<T> {
        Self::new(|a, b| a.cmp(b))
    }
}

impl<T, F> PriorityQueue<T, F>
where
    F: FnMut(&T, &T) -> Ordering,
{
    /// Empty queue ordered by `cmp`.
    pub fn new(cmp: F) -> Self {
        Self {
            heap: Vec::new(),
            cmp,
        }
    }

    /// Empty queue with room for `capacity` elements.
    pub fn with_capacity(capacity: usize, cmp: F) -> Self {
        Self {
            heap: Vec::with_capacity(capacity),
            cmp,
        }
    }

    /// Number of queued elements.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// True if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drop every element.
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    /// The top element.
    pub fn peek(&self) -> Option<&T> {
        self.heap.first()
    }

    /// Queued elements in heap order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.heap.iter()
    }

    /// Add an element.
    pub fn push(&mut self, item: T) {
        self.heap.push(item);
        self.sift_up(self.heap.len() - 1);
    }

    /// Remove and return the top element.
    pub fn pop(&mut self) -> Option<T> {
        if self.heap.is_empty() {
            return None;
        }
        let top = self.heap.swap_remove(0);
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some(top)
    }

    /// Consume the queue, returning its elements sorted ascending by the
    /// comparator.
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.heap.len());
        while let Some(item) = self.pop() {
            out.push(item);
        }
        out.reverse();
        out
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if (self.cmp)(&self.heap[i], &self.heap[parent]) != Ordering::Greater {
                break;
            }
            self.heap.swap(i, parent);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let len = self.heap.len();
        loop {
            let (left, right) = (2 * i + 1, 2 * i + 2);
            let mut top = i;
            if left < len && (self.cmp)(&self.heap[left], &self.heap[top]) == Ordering::Greater {
                top = left;
            }
            if right < len && (self.cmp)(&self.heap[right], &self.heap[top]) == Ordering::Greater {
                top = right;
            }
            if top == i {
                break;
            }
            self.heap.swap(i, top);
            i = top;
        }
    }
}

impl<T, F> Extend<T> for PriorityQueue<T, F>
where
    F: FnMut(&T, &T) -> Ordering,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push(item);
        }
    }
}

impl<T: fmt::Debug, F> fmt::Debug for PriorityQueue<T, F>
where
    F: FnMut(&T, &T) -> Ordering,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriorityQueue")
            .field("heap", &self.heap)
            .finish_non_exhaustive()
    }
}
