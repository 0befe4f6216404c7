//! Unbounded blocking FIFO used between log producers and the flush thread
//!
//! Producers never block beyond the brief lock acquisition; consumers may
//! wait indefinitely (`pop`) or until a deadline (`pop_timeout`). Closing the
//! queue wakes every waiter: remaining items are still handed out, after which
//! `pop` reports end-of-stream with `None`.

use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

struct Inner<T> {
    items: VecDeque<T>,
    closed: bool,
}

/// Thread-safe unbounded FIFO with blocking and timed-blocking pop.
pub struct BlockingQueue<T> {
    inner: Mutex<Inner<T>>,
    /// Signalled when the queue becomes non-empty or is closed
    available: Condvar,
}

impl<T> BlockingQueue<T> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                items: VecDeque::new(),
                closed: false,
            }),
            available: Condvar::new(),
        }
    }

    /// Append an item at the tail and wake all waiters.
    ///
    /// Returns `false` only if the queue has been closed; capacity is never
    /// a reason to refuse an item.
    pub fn push(&self, item: T) -> bool {
        let mut inner = self.inner.lock();
        if inner.closed {
            return false;
        }
        inner.items.push_back(item);
        drop(inner);
        self.available.notify_all();
        true
    }

    /// Remove and return the head, blocking while the queue is empty.
    ///
    /// Returns `None` once the queue is closed and drained.
    pub fn pop(&self) -> Option<T> {
        let mut inner = self.inner.lock();
        loop {
            if let Some(item) = inner.items.pop_front() {
                return Some(item);
            }
            if inner.closed {
                return None;
            }
            self.available.wait(&mut inner);
        }
    }

    /// Like [`pop`](Self::pop), but gives up after `timeout`.
    ///
    /// The deadline is fixed at entry on the monotonic clock, so spurious
    /// wakeups do not extend the total wait. A timeout too large to be
    /// represented as a deadline waits like [`pop`](Self::pop).
    pub fn pop_timeout(&self, timeout: Duration) -> Option<T> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return self.pop();
        };
        let mut inner = self.inner.lock();
        loop {
            if let Some(item) = inner.items.pop_front() {
                return Some(item);
            }
            if inner.closed {
                return None;
            }
            if self.available.wait_until(&mut inner, deadline).timed_out() {
                return inner.items.pop_front();
            }
        }
    }

    /// Remove every queued item. Waiters are not woken.
    pub fn clear(&self) {
        self.inner.lock().items.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().items.len()
    }

    /// Mark end-of-stream and wake all waiters
    pub fn close(&self) {
        self.inner.lock().closed = true;
        self.available.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.inner.lock().closed
    }
}

impl<T: Clone> BlockingQueue<T> {
    /// Copy of the head without removing it
    pub fn front(&self) -> Option<T> {
        self.inner.lock().items.front().cloned()
    }

    /// Copy of the tail without removing it
    pub fn back(&self) -> Option<T> {
        self.inner.lock().items.back().cloned()
    }
}

impl<T> Default for BlockingQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_push_pop_fifo() {
        let queue = BlockingQueue::new();
        assert!(queue.push(1));
        assert!(queue.push(2));
        assert!(queue.push(3));

        assert_eq!(queue.pop(), Some(1));
        assert_eq!(queue.pop(), Some(2));
        assert_eq!(queue.pop(), Some(3));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_front_back_do_not_remove() {
        let queue = BlockingQueue::new();
        assert_eq!(queue.front(), None::<String>);
        assert_eq!(queue.back(), None::<String>);

        queue.push("a".to_string());
        queue.push("b".to_string());

        assert_eq!(queue.front().as_deref(), Some("a"));
        assert_eq!(queue.back().as_deref(), Some("b"));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_clear() {
        let queue = BlockingQueue::new();
        queue.push(1);
        queue.push(2);
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn test_pop_timeout_on_empty_queue() {
        let queue: BlockingQueue<u32> = BlockingQueue::new();
        let start = Instant::now();
        assert_eq!(queue.pop_timeout(Duration::from_millis(100)), None);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(100), "returned early: {:?}", elapsed);
        assert!(elapsed < Duration::from_millis(500), "returned late: {:?}", elapsed);
    }

    #[test]
    fn test_pop_timeout_returns_pushed_item() {
        let queue = Arc::new(BlockingQueue::new());
        let producer = {
            let queue = queue.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(20));
                queue.push(42);
            })
        };

        assert_eq!(queue.pop_timeout(Duration::from_secs(5)), Some(42));
        producer.join().unwrap();
    }

    #[test]
    fn test_pop_timeout_with_unbounded_timeout() {
        let queue = BlockingQueue::new();
        queue.push(1);
        assert_eq!(queue.pop_timeout(Duration::MAX), Some(1));

        queue.close();
        assert_eq!(queue.pop_timeout(Duration::MAX), None);
    }

    #[test]
    fn test_pop_blocks_until_push() {
        let queue = Arc::new(BlockingQueue::new());
        let consumer = {
            let queue = queue.clone();
            thread::spawn(move || {
                let start = Instant::now();
                let value = queue.pop();
                (value, start.elapsed())
            })
        };

        thread::sleep(Duration::from_millis(50));
        queue.push("late");

        let (value, waited) = consumer.join().unwrap();
        assert_eq!(value, Some("late"));
        assert!(waited >= Duration::from_millis(40));
    }

    #[test]
    fn test_close_wakes_blocked_pop() {
        let queue: Arc<BlockingQueue<u8>> = Arc::new(BlockingQueue::new());
        let consumer = {
            let queue = queue.clone();
            thread::spawn(move || queue.pop())
        };

        thread::sleep(Duration::from_millis(20));
        queue.close();
        assert_eq!(consumer.join().unwrap(), None);
    }

    #[test]
    fn test_close_drains_before_end_of_stream() {
        let queue = BlockingQueue::new();
        queue.push(1);
        queue.push(2);
        queue.close();

        assert!(queue.is_closed());
        assert!(!queue.push(3));
        assert_eq!(queue.pop(), Some(1));
        assert_eq!(queue.pop(), Some(2));
        assert_eq!(queue.pop(), None);
        assert_eq!(queue.pop_timeout(Duration::from_millis(10)), None);
    }

    #[test]
    fn test_multiple_producers_keep_per_producer_order() {
        let queue = Arc::new(BlockingQueue::new());
        let producers: Vec<_> = (0..4usize)
            .map(|id| {
                let queue = queue.clone();
                thread::spawn(move || {
                    for seq in 0..250u32 {
                        queue.push((id, seq));
                    }
                })
            })
            .collect();
        for p in producers {
            p.join().unwrap();
        }
        queue.close();

        let mut last = [None; 4];
        let mut count = 0;
        while let Some((id, seq)) = queue.pop() {
            if let Some(prev) = last[id] {
                assert!(seq > prev);
            }
            last[id] = Some(seq);
            count += 1;
        }
        assert_eq!(count, 1000);
    }

    proptest! {
        #[test]
        fn prop_pops_follow_push_order(items in proptest::collection::vec(any::<i64>(), 0..200)) {
            let queue = BlockingQueue::new();
            for item in &items {
                prop_assert!(queue.push(*item));
            }
            prop_assert_eq!(queue.len(), items.len());

            let mut popped = Vec::with_capacity(items.len());
            while let Some(item) = queue.pop_timeout(Duration::ZERO) {
                popped.push(item);
            }
            prop_assert_eq!(popped, items);
        }
    }
}
