//! Fan-out message queue for change notifications.

/// Broadcast queue for one-to-many message distribution.
///
/// Every subscriber receives every message sent after it subscribed.
/// Subscribers whose receiver has been dropped are pruned on the next send.
/// Backed by unbounded flume channels, so sending never blocks the editor.
pub struct BroadcastQueue<T> {
    senders: Vec<flume::Sender<T>>,
}

impl<T> Default for BroadcastQueue<T> {
    fn default() -> Self {
        Self {
            senders: Vec::new(),
        }
    }
}

impl<T: Clone> BroadcastQueue<T> {
    /// create a new broadcast queue
    pub fn new() -> Self {
        Self::default()
    }

    /// send a message to every live subscriber
    pub fn send(
        &mut self,
        msg: T,
    ) {
        self.senders.retain(|tx| tx.send(msg.clone()).is_ok());
    }

    /// subscribe to the queue
    pub fn subscribe(&mut self) -> flume::Receiver<T> {
        let (tx, rx) = flume::unbounded();
        self.senders.push(tx);
        rx
    }

    /// number of live subscribers as of the last send
    pub fn subscriber_count(&self) -> usize {
        self.senders.len()
    }
}

#[cfg(test)]
mod tests {
    use super::BroadcastQueue;

    #[test]
    fn test_every_subscriber_receives() {
        let mut queue = BroadcastQueue::new();
        let a = queue.subscribe();
        let b = queue.subscribe();
        queue.send(7);
        assert_eq!(a.try_recv().ok(), Some(7));
        assert_eq!(b.try_recv().ok(), Some(7));
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let mut queue = BroadcastQueue::new();
        let a = queue.subscribe();
        let b = queue.subscribe();
        drop(b);
        queue.send("x");
        assert_eq!(queue.subscriber_count(), 1);
        assert_eq!(a.try_recv().ok(), Some("x"));
    }
}
