/// Binary min-heap of items keyed by weight. Order among equal weights is unspecified.
#[derive(Debug)]
pub struct MinPq<W, I> {
    queue: Vec<(W, I)>,
}

impl<W: Ord, I> MinPq<W, I> {
    pub fn new() -> Self {
        Self { queue: Vec::new() }
    }

    pub fn insert(&mut self, weight: W, item: I) {
        self.queue.push((weight, item));
        self.swim(self.queue.len() - 1);
    }

    /// Remove and return the item with the smallest weight, or None if the queue is empty.
    pub fn pop_min(&mut self) -> Option<I> {
        if self.queue.is_empty() {
            return None;
        }
        let last = self.queue.len() - 1;
        self.queue.swap(0, last);
        let (_, item) = self.queue.pop()?;
        self.sink(0);
        Some(item)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    fn swim(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.queue[i].0 >= self.queue[parent].0 {
                break;
            }
            self.queue.swap(i, parent);
            i = parent;
        }
    }

    fn sink(&mut self, mut i: usize) {
        let n = self.queue.len();
        loop {
            let left = 2 * i + 1;
            if left >= n {
                break;
            }
            // Pick the smaller child
            let mut child = left;
            if left + 1 < n && self.queue[left + 1].0 < self.queue[left].0 {
                child = left + 1;
            }
            if self.queue[i].0 <= self.queue[child].0 {
                break;
            }
            self.queue.swap(i, child);
            i = child;
        }
    }
}

impl<W: Ord, I> Default for MinPq<W, I> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::MinPq;

    #[test]
    fn ordering_test() {
        let mut q = MinPq::new();
        for (w, c) in [(5, 'e'), (1, 'a'), (4, 'd'), (2, 'b'), (9, 'z'), (3, 'c')] {
            q.insert(w, c);
        }
        assert_eq!(q.len(), 6);
        let out: Vec<char> = std::iter::from_fn(|| q.pop_min()).collect();
        assert_eq!(out, vec!['a', 'b', 'c', 'd', 'e', 'z']);
        assert!(q.is_empty());
    }

    #[test]
    fn interleaved_test() {
        let mut q = MinPq::new();
        q.insert(10_u64, 10);
        q.insert(3, 3);
        assert_eq!(q.pop_min(), Some(3));
        q.insert(7, 7);
        q.insert(1, 1);
        assert_eq!(q.pop_min(), Some(1));
        assert_eq!(q.pop_min(), Some(7));
        assert_eq!(q.pop_min(), Some(10));
        assert_eq!(q.pop_min(), None);
    }
}
