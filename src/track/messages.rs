use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

const MAX_PENDING: usize = 256;

/// Informational messages produced by background or load work. They must not
/// be written to the terminal directly while the foreground loop may be
/// blocked on input; the loop drains the queue at safe points instead.
#[derive(Debug, Clone, Default)]
pub struct MessageQueue {
    inner: Arc<Mutex<VecDeque<String>>>,
}

impl MessageQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, message: impl Into<String>) {
        let mut queue = self.inner.lock().expect("message queue lock poisoned");
        if queue.len() == MAX_PENDING {
            queue.pop_front();
        }
        queue.push_back(message.into());
    }

    pub fn drain(&self) -> Vec<String> {
        let mut queue = self.inner.lock().expect("message queue lock poisoned");
        queue.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_empties_in_order() {
        let queue = MessageQueue::new();
        queue.push("first");
        queue.push("second");

        assert_eq!(queue.drain(), vec!["first", "second"]);
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn oldest_message_is_dropped_beyond_capacity() {
        let queue = MessageQueue::new();
        for i in 0..=MAX_PENDING {
            queue.push(format!("m{i}"));
        }

        let drained = queue.drain();
        assert_eq!(drained.len(), MAX_PENDING);
        assert_eq!(drained.first().map(String::as_str), Some("m1"));
    }
}
