//! Thread-safe relay message queue.
//!
//! The queue buffers browser-to-host calls between the control
//! server's request tasks (producers) and the host tick (consumer).
//! Messages without a payload and messages with a payload live in
//! separate lanes, each FIFO on its own.
//!
//! # Locking
//!
//! Each lane has its own mutex, held only long enough to push or to
//! swap the lane contents out. Draining never holds a lock while the
//! drained messages are dispatched, so a relay request arriving
//! mid-dispatch is never blocked; it lands in the next drain.

// ============================================================================
// Imports
// ============================================================================

use std::collections::VecDeque;

use parking_lot::Mutex;
use tracing::trace;

use super::message::RelayMessage;

// ============================================================================
// RelayQueue
// ============================================================================

/// Two-lane FIFO queue of pending relay messages.
///
/// A drain returns the bare lane first, then the valued lane; within
/// each lane arrival order is preserved. Callers that need a global
/// arrival order across both lanes should not rely on the drain order
/// between lanes.
///
/// # Examples
///
/// ```
/// use browser_bridge::relay::{RelayMessage, RelayQueue};
///
/// let queue = RelayQueue::new();
/// queue.enqueue(RelayMessage::bare("game", "reset"));
/// queue.enqueue(RelayMessage::with_number("game", "setScore", 42.0));
///
/// let drained = queue.drain_all();
/// assert_eq!(drained.len(), 2);
/// assert!(queue.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct RelayQueue {
    /// Lane for messages without a payload.
    bare: Mutex<VecDeque<RelayMessage>>,
    /// Lane for messages with a payload.
    valued: Mutex<VecDeque<RelayMessage>>,
}

impl RelayQueue {
    /// Creates an empty queue.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message to the lane matching its payload presence.
    pub fn enqueue(&self, message: RelayMessage) {
        trace!(message = %message, "relay message enqueued");
        if message.has_payload() {
            self.valued.lock().push_back(message);
        } else {
            self.bare.lock().push_back(message);
        }
    }

    /// Removes and returns all pending messages.
    ///
    /// Bare messages come first, then valued messages, each lane in
    /// arrival order. Both lane locks are released before this
    /// returns, so dispatching the result cannot block producers.
    #[must_use]
    pub fn drain_all(&self) -> Vec<RelayMessage> {
        let bare = std::mem::take(&mut *self.bare.lock());
        let valued = std::mem::take(&mut *self.valued.lock());

        let mut drained = Vec::with_capacity(bare.len() + valued.len());
        drained.extend(bare);
        drained.extend(valued);
        drained
    }

    /// Returns the number of pending messages across both lanes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bare.lock().len() + self.valued.lock().len()
    }

    /// Returns `true` if no messages are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bare.lock().is_empty() && self.valued.lock().is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use proptest::prelude::*;

    use super::*;
    use crate::relay::message::RelayPayload;

    #[test]
    fn test_empty_queue() {
        let queue = RelayQueue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.len(), 0);
        assert!(queue.drain_all().is_empty());
    }

    #[test]
    fn test_fifo_within_lane() {
        let queue = RelayQueue::new();
        queue.enqueue(RelayMessage::with_number("game", "first", 1.0));
        queue.enqueue(RelayMessage::with_number("game", "second", 2.0));
        queue.enqueue(RelayMessage::with_number("game", "third", 3.0));

        let drained = queue.drain_all();
        let methods: Vec<&str> = drained.iter().map(|m| m.method.as_str()).collect();
        assert_eq!(methods, ["first", "second", "third"]);
    }

    #[test]
    fn test_bare_lane_drains_before_valued_lane() {
        let queue = RelayQueue::new();
        queue.enqueue(RelayMessage::with_text("game", "setName", "Ada"));
        queue.enqueue(RelayMessage::bare("game", "reset"));

        let drained = queue.drain_all();
        assert_eq!(drained[0].method, "reset");
        assert_eq!(drained[1].method, "setName");
    }

    #[test]
    fn test_drain_empties_queue() {
        let queue = RelayQueue::new();
        queue.enqueue(RelayMessage::bare("a", "b"));
        queue.enqueue(RelayMessage::with_number("a", "c", 1.0));
        assert_eq!(queue.len(), 2);

        let drained = queue.drain_all();
        assert_eq!(drained.len(), 2);
        assert!(queue.is_empty());
        assert!(queue.drain_all().is_empty());
    }

    #[test]
    fn test_enqueue_after_drain() {
        let queue = RelayQueue::new();
        queue.enqueue(RelayMessage::bare("a", "first"));
        let _ = queue.drain_all();

        queue.enqueue(RelayMessage::bare("a", "second"));
        let drained = queue.drain_all();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].method, "second");
    }

    #[test]
    fn test_concurrent_producers() {
        let queue = Arc::new(RelayQueue::new());
        let mut handles = Vec::new();

        for i in 0..3 {
            let queue = Arc::clone(&queue);
            handles.push(std::thread::spawn(move || {
                queue.enqueue(RelayMessage::with_number("game", "tap", f64::from(i)));
            }));
        }
        for handle in handles {
            handle.join().expect("producer thread");
        }

        let drained = queue.drain_all();
        assert_eq!(drained.len(), 3);

        let mut values: Vec<f64> = drained
            .iter()
            .filter_map(|m| m.payload.as_ref().and_then(RelayPayload::as_number))
            .collect();
        values.sort_by(f64::total_cmp);
        assert_eq!(values, [0.0, 1.0, 2.0]);
    }

    proptest! {
        /// Arrival order survives within each lane for any interleaving.
        #[test]
        fn prop_drain_preserves_lane_order(tagged in prop::collection::vec(any::<bool>(), 0..64)) {
            let queue = RelayQueue::new();
            for (seq, has_payload) in tagged.iter().enumerate() {
                let method = format!("m{seq}");
                if *has_payload {
                    queue.enqueue(RelayMessage::with_number("t", method, seq as f64));
                } else {
                    queue.enqueue(RelayMessage::bare("t", method));
                }
            }

            let drained = queue.drain_all();
            prop_assert_eq!(drained.len(), tagged.len());

            let bare_count = tagged.iter().filter(|p| !**p).count();
            let (bare, valued) = drained.split_at(bare_count);
            prop_assert!(bare.iter().all(|m| !m.has_payload()));
            prop_assert!(valued.iter().all(RelayMessage::has_payload));

            // Sequence numbers embedded in the method names must ascend
            // within each lane.
            for lane in [bare, valued] {
                let seqs: Vec<usize> = lane
                    .iter()
                    .map(|m| m.method[1..].parse().expect("sequence"))
                    .collect();
                prop_assert!(seqs.windows(2).all(|w| w[0] < w[1]));
            }
        }
    }
}
