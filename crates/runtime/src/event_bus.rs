use std::collections::VecDeque;

/// A queued item tagged with its arrival order.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope<T> {
    pub seq: u64,
    pub item: T,
}

/// Single-consumer FIFO through which every state change is serialized.
///
/// Sequence numbers are assigned on push and never reused, so a consumer can
/// tell how many items it has seen in total.
#[derive(Debug)]
pub struct EventQueue<T> {
    items: VecDeque<Envelope<T>>,
    next_seq: u64,
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self {
            items: VecDeque::new(),
            next_seq: 0,
        }
    }
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: T) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.items.push_back(Envelope { seq, item });
        seq
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = T>) {
        for item in items {
            self.push(item);
        }
    }

    pub fn pop(&mut self) -> Option<Envelope<T>> {
        self.items.pop_front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of items ever pushed.
    pub fn pushed(&self) -> u64 {
        self.next_seq
    }

    pub fn drain(&mut self) -> Vec<Envelope<T>> {
        self.items.drain(..).collect()
    }
}
