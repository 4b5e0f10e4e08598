use std::collections::HashMap;
use std::hash::Hash;

/// Binary min-heap of items keyed by an `f32` score.
///
/// Unlike `std::collections::BinaryHeap`, an item's score can be changed
/// after insertion (`rescore`) and an item can be removed from the middle of
/// the heap (`remove`). A position index makes both O(log n). Ties between
/// equal scores pop in an unspecified (but deterministic) order.
#[derive(Debug, Clone)]
pub struct PriorityQueue<T> {
    heap: Vec<(T, f32)>,
    positions: HashMap<T, usize>,
}

impl<T: Copy + Eq + Hash> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy + Eq + Hash> PriorityQueue<T> {
    pub fn new() -> Self {
        Self {
            heap: Vec::new(),
            positions: HashMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: Vec::with_capacity(capacity),
            positions: HashMap::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn contains(&self, item: &T) -> bool {
        self.positions.contains_key(item)
    }

    /// Current score of a queued item
    pub fn score(&self, item: &T) -> Option<f32> {
        self.positions.get(item).map(|&idx| self.heap[idx].1)
    }

    /// Insert an item. Pushing an item that is already queued rescores it.
    pub fn push(&mut self, item: T, score: f32) {
        if self.contains(&item) {
            self.rescore(item, score);
            return;
        }
        let idx = self.heap.len();
        self.heap.push((item, score));
        self.positions.insert(item, idx);
        self.sift_up(idx);
    }

    /// Remove and return the minimum-scored item.
    pub fn pop(&mut self) -> Option<T> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.swap(0, last);
        let (item, _) = self.heap.pop()?;
        self.positions.remove(&item);
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some(item)
    }

    pub fn peek(&self) -> Option<T> {
        self.heap.first().map(|&(item, _)| item)
    }

    /// Change a queued item's score and restore heap order. Returns false if
    /// the item is not queued.
    pub fn rescore(&mut self, item: T, score: f32) -> bool {
        let Some(&idx) = self.positions.get(&item) else {
            return false;
        };
        let old = self.heap[idx].1;
        self.heap[idx].1 = score;
        if score < old {
            self.sift_up(idx);
        } else {
            self.sift_down(idx);
        }
        true
    }

    /// Remove an arbitrary item. Returns false if the item is not queued.
    pub fn remove(&mut self, item: T) -> bool {
        let Some(idx) = self.positions.remove(&item) else {
            return false;
        };
        let last = self.heap.len() - 1;
        self.heap.swap_remove(idx);
        if idx < last {
            // the former last element may belong above or below its new slot
            let moved = self.heap[idx].0;
            self.positions.insert(moved, idx);
            self.sift_up(idx);
            let idx = self.positions[&moved];
            self.sift_down(idx);
        }
        true
    }

    fn sift_up(&mut self, mut idx: usize) {
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if self.heap[idx].1 < self.heap[parent].1 {
                self.swap(idx, parent);
                idx = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut idx: usize) {
        let len = self.heap.len();
        loop {
            let left = idx * 2 + 1;
            let right = left + 1;
            let mut smallest = idx;
            if left < len && self.heap[left].1 < self.heap[smallest].1 {
                smallest = left;
            }
            if right < len && self.heap[right].1 < self.heap[smallest].1 {
                smallest = right;
            }
            if smallest == idx {
                break;
            }
            self.swap(idx, smallest);
            idx = smallest;
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.heap.swap(a, b);
        self.positions.insert(self.heap[a].0, a);
        self.positions.insert(self.heap[b].0, b);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_pop_returns_in_score_order() {
        let mut queue = PriorityQueue::new();
        for (item, score) in [(1, 5.0), (2, 1.0), (3, 3.0), (4, 4.0), (5, 2.0)] {
            queue.push(item, score);
        }
        let order: Vec<i32> = std::iter::from_fn(|| queue.pop()).collect();
        assert_eq!(order, vec![2, 5, 3, 4, 1]);
    }

    #[test]
    fn test_pop_empty_is_none() {
        let mut queue: PriorityQueue<u32> = PriorityQueue::new();
        assert_eq!(queue.len(), 0);
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn test_rescore_moves_item_both_ways() {
        let mut queue = PriorityQueue::new();
        queue.push('a', 1.0);
        queue.push('b', 2.0);
        queue.push('c', 3.0);
        assert!(queue.rescore('c', 0.5));
        assert_eq!(queue.peek(), Some('c'));
        assert!(queue.rescore('c', 10.0));
        assert_eq!(queue.pop(), Some('a'));
        assert_eq!(queue.pop(), Some('b'));
        assert_eq!(queue.pop(), Some('c'));
        assert!(!queue.rescore('z', 1.0));
    }

    #[test]
    fn test_remove_from_middle() {
        let mut queue = PriorityQueue::new();
        for i in 0..10 {
            queue.push(i, (10 - i) as f32);
        }
        assert!(queue.remove(4));
        assert!(!queue.remove(4));
        assert_eq!(queue.len(), 9);
        let order: Vec<i32> = std::iter::from_fn(|| queue.pop()).collect();
        assert_eq!(order, vec![9, 8, 7, 6, 5, 3, 2, 1, 0]);
    }

    #[test]
    fn test_random_interleaving_always_pops_minimum() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut queue = PriorityQueue::new();
        let mut shadow: HashMap<u32, f32> = HashMap::new();
        let mut next_id = 0u32;

        for _ in 0..2000 {
            match rng.gen_range(0..4) {
                0 | 1 => {
                    let score = rng.gen_range(0.0..100.0);
                    queue.push(next_id, score);
                    shadow.insert(next_id, score);
                    next_id += 1;
                }
                2 if !shadow.is_empty() => {
                    let key = *shadow.keys().min().unwrap();
                    let score = rng.gen_range(0.0..100.0);
                    queue.rescore(key, score);
                    shadow.insert(key, score);
                }
                _ if queue.len() > 0 => {
                    let min = shadow.values().cloned().fold(f32::INFINITY, f32::min);
                    let item = queue.pop().unwrap();
                    assert_eq!(shadow.remove(&item), Some(min));
                }
                _ => {}
            }
        }
    }
}
