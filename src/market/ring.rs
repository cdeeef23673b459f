use crate::market::kline::Kline;

/// Fixed-capacity, insertion-ordered history of closed klines for one (symbol, interval) series.
///
/// Backed by a `Vec<Option<Kline>>` slot ring rather than `BTreeMap` so that both
/// push and the ordered walk needed to serve `GET /klines` are O(1) amortized / O(K),
/// with no reallocation once the ring has filled.
#[derive(Debug, Clone)]
pub struct KlineRing {
    slots: Vec<Option<Kline>>,
    capacity: usize,
    start: usize,
    len: usize,
}

impl KlineRing {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "ring capacity must be non-zero");
        Self {
            slots: vec![None; capacity],
            capacity,
            start: 0,
            len: 0,
        }
    }

    /// Appends a closed kline, overwriting the oldest entry once the ring is full.
    pub fn push(&mut self, kline: Kline) {
        let write_idx = (self.start + self.len) % self.capacity;
        self.slots[write_idx] = Some(kline);

        if self.len < self.capacity {
            self.len += 1;
        } else {
            self.start = (self.start + 1) % self.capacity;
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Walks the ring oldest-to-newest, most recent `limit` entries (or all if `limit` exceeds `len`).
    pub fn last(&self, limit: usize) -> Vec<Kline> {
        let take = limit.min(self.len);
        let skip = self.len - take;
        (skip..self.len)
            .map(|offset| {
                let idx = (self.start + offset) % self.capacity;
                self.slots[idx].clone().expect("slot within len is populated")
            })
            .collect()
    }
}
