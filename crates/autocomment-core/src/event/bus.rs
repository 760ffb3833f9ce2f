//! Broadcast bus distributing `ViolationEvent` to session observers.
//!
//! Built on `tokio::sync::broadcast`. Publishing with no active subscribers
//! is a no-op, so editing never depends on anyone listening.

use autocomment_types::event::ViolationEvent;
use tokio::sync::broadcast;

/// Multi-consumer bus for refused-operation notices.
///
/// Cloning the bus clones the sender; every clone feeds the same channel.
pub struct ViolationBus {
    sender: broadcast::Sender<ViolationEvent>,
}

impl ViolationBus {
    /// Create a bus with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ViolationEvent> {
        self.sender.subscribe()
    }

    /// Publish to all current subscribers; dropped silently when there are none.
    pub fn publish(&self, event: ViolationEvent) {
        let _ = self.sender.send(event);
    }
}

impl Default for ViolationBus {
    fn default() -> Self {
        Self::new(256)
    }
}

impl Clone for ViolationBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl std::fmt::Debug for ViolationBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViolationBus")
            .field("receiver_count", &self.sender.receiver_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autocomment_types::error::AllocationError;
    use uuid::Uuid;

    fn sample_event() -> ViolationEvent {
        ViolationEvent::from_error(Uuid::now_v7(), &AllocationError::EditorBusy)
    }

    #[tokio::test]
    async fn test_publish_and_subscribe_delivers_event() {
        let bus = ViolationBus::new(16);
        let mut rx = bus.subscribe();

        bus.publish(sample_event());

        let received = rx.recv().await.unwrap();
        assert_eq!(received.code, "EDITOR_BUSY");
    }

    #[tokio::test]
    async fn test_multiple_subscribers_each_receive_event() {
        let bus = ViolationBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(sample_event());

        assert_eq!(rx1.recv().await.unwrap().code, "EDITOR_BUSY");
        assert_eq!(rx2.recv().await.unwrap().code, "EDITOR_BUSY");
    }

    #[test]
    fn test_publish_with_no_subscribers_does_not_panic() {
        let bus = ViolationBus::new(16);
        bus.publish(sample_event());
        assert_eq!(bus.sender.receiver_count(), 0);
    }

    #[test]
    fn test_clone_shares_channel() {
        let bus = ViolationBus::new(16);
        let bus2 = bus.clone();
        let mut rx = bus.subscribe();

        bus2.publish(sample_event());

        assert!(rx.try_recv().is_ok());
    }

    #[test]
    fn test_debug_impl() {
        let bus = ViolationBus::new(16);
        let debug = format!("{bus:?}");
        assert!(debug.contains("ViolationBus"));
        assert!(debug.contains("receiver_count"));
    }
}
