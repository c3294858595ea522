//! Array-backed binary min-heap keyed by `f64` priority.
//!
//! The heap does not deduplicate items: pushing the same item twice with
//! different priorities stores two entries. Callers that relax priorities
//! (such as the A* driver) push the improved entry and discard stale ones when
//! they surface.

#[derive(Debug, Clone)]
struct HeapEntry<T> {
    priority: f64,
    item: T,
}

/// Min-heap returning the lowest priority first.
#[derive(Debug, Clone)]
pub struct MinHeap<T> {
    entries: Vec<HeapEntry<T>>,
}

impl<T> MinHeap<T> {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert `item` with `priority`. O(log n).
    pub fn push(&mut self, item: T, priority: f64) {
        self.entries.push(HeapEntry { priority, item });
        self.sift_up(self.entries.len() - 1);
    }

    /// Remove and return the item with the lowest priority. O(log n).
    pub fn pop(&mut self) -> Option<(T, f64)> {
        if self.entries.is_empty() {
            return None;
        }
        let last = self.entries.len() - 1;
        self.entries.swap(0, last);
        let entry = self.entries.pop()?;
        if !self.entries.is_empty() {
            self.sift_down(0);
        }
        Some((entry.item, entry.priority))
    }

    /// Lowest priority currently queued.
    pub fn peek_priority(&self) -> Option<f64> {
        self.entries.first().map(|entry| entry.priority)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn less(&self, a: usize, b: usize) -> bool {
        self.entries[a]
            .priority
            .total_cmp(&self.entries[b].priority)
            .is_lt()
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if !self.less(index, parent) {
                break;
            }
            self.entries.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.entries.len();
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut smallest = index;

            if left < len && self.less(left, smallest) {
                smallest = left;
            }
            if right < len && self.less(right, smallest) {
                smallest = right;
            }
            if smallest == index {
                break;
            }
            self.entries.swap(index, smallest);
            index = smallest;
        }
    }
}

impl<T> Default for MinHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Extend<(T, f64)> for MinHeap<T> {
    fn extend<I: IntoIterator<Item = (T, f64)>>(&mut self, iter: I) {
        for (item, priority) in iter {
            self.push(item, priority);
        }
    }
}
