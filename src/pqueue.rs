use std::collections::VecDeque;

/// A bucketed priority queue with O(1) push and amortised O(1) pop-min when
/// priorities grow monotonically, as they do in A* with a consistent
/// heuristic. Buckets are allocated on demand. Items of equal priority come
/// out in insertion order.
pub struct PriorityQueue<T> {
    buckets: Vec<VecDeque<T>>,
    bitmap: Vec<u64>,
    // No non-empty bucket lives in a bitmap word below this one
    cursor: usize,
    len: usize,
}

impl<T> PriorityQueue<T> {
    pub fn new() -> Self {
        Self {
            buckets: Vec::new(),
            bitmap: Vec::new(),
            cursor: 0,
            len: 0,
        }
    }

    pub fn push(&mut self, priority: usize, item: T) {
        if priority >= self.buckets.len() {
            self.buckets.resize_with(priority + 1, VecDeque::new);
            self.bitmap.resize(priority / 64 + 1, 0);
        }
        self.buckets[priority].push_back(item);

        // Update bitmap
        let word_idx = priority / 64;
        let bit_idx = priority % 64;
        self.bitmap[word_idx] |= 1u64 << bit_idx;
        self.cursor = self.cursor.min(word_idx);
        self.len += 1;
    }

    pub fn pop_min(&mut self) -> Option<T> {
        // Find first non-empty word at or after the cursor
        let word_idx = (self.cursor..self.bitmap.len()).find(|&i| self.bitmap[i] != 0)?;
        self.cursor = word_idx;

        // Find first non-empty bucket in that word
        let bit_idx = self.bitmap[word_idx].trailing_zeros() as usize;
        let priority = word_idx * 64 + bit_idx;

        // Pop item from bucket
        let item = self.buckets[priority].pop_front()?;
        self.len -= 1;

        // Update bitmap if bucket is now empty
        if self.buckets[priority].is_empty() {
            self.bitmap[word_idx] &= !(1u64 << bit_idx);
        }

        Some(item)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<T> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_single() {
        let mut pq = PriorityQueue::new();
        pq.push(10, "hello");
        assert_eq!(pq.len(), 1);
        assert_eq!(pq.pop_min(), Some("hello"));
        assert_eq!(pq.pop_min(), None);
        assert!(pq.is_empty());
    }

    #[test]
    fn test_push_pop_ordered() {
        let mut pq = PriorityQueue::new();
        pq.push(10, "low");
        pq.push(5, "lower");
        pq.push(15, "high");

        assert_eq!(pq.pop_min(), Some("lower"));
        assert_eq!(pq.pop_min(), Some("low"));
        assert_eq!(pq.pop_min(), Some("high"));
        assert_eq!(pq.pop_min(), None);
    }

    #[test]
    fn test_push_pop_same_priority() {
        let mut pq = PriorityQueue::new();
        pq.push(10, "first");
        pq.push(10, "second");
        pq.push(10, "third");

        assert_eq!(pq.pop_min(), Some("first"));
        assert_eq!(pq.pop_min(), Some("second"));
        assert_eq!(pq.pop_min(), Some("third"));
        assert_eq!(pq.pop_min(), None);
    }

    #[test]
    fn test_push_pop_mixed() {
        let mut pq = PriorityQueue::new();
        pq.push(100, "a");
        pq.push(50, "b");
        assert_eq!(pq.pop_min(), Some("b"));
        pq.push(25, "c");
        pq.push(75, "d");
        assert_eq!(pq.pop_min(), Some("c"));
        assert_eq!(pq.pop_min(), Some("d"));
        assert_eq!(pq.pop_min(), Some("a"));
    }

    #[test]
    fn test_large_priorities() {
        let mut pq = PriorityQueue::new();
        pq.push(0, "min");
        pq.push(100_000, "max");
        pq.push(5000, "mid");

        assert_eq!(pq.pop_min(), Some("min"));
        assert_eq!(pq.pop_min(), Some("mid"));
        assert_eq!(pq.pop_min(), Some("max"));
        assert_eq!(pq.len(), 0);
    }

    #[test]
    fn test_empty_queue() {
        let mut pq: PriorityQueue<i32> = PriorityQueue::new();
        assert_eq!(pq.pop_min(), None);
    }

    #[test]
    fn test_bitmap_word_boundaries() {
        let mut pq = PriorityQueue::new();
        // Test across word boundaries (each word is 64 buckets)
        pq.push(63, "word0_last");
        pq.push(64, "word1_first");
        pq.push(128, "word2_first");
        pq.push(0, "word0_first");

        assert_eq!(pq.pop_min(), Some("word0_first"));
        assert_eq!(pq.pop_min(), Some("word0_last"));
        assert_eq!(pq.pop_min(), Some("word1_first"));
        // Pushing below the cursor must still be seen
        pq.push(1, "low_again");
        assert_eq!(pq.pop_min(), Some("low_again"));
        assert_eq!(pq.pop_min(), Some("word2_first"));
    }
}
