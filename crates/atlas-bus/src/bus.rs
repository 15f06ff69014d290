//! The event bus boundary and its in-process implementation.
//!
//! The real deployment puts a broker (AMQP, Kafka, ...) behind this
//! trait; delivery reliability and wire encoding are that collaborator's
//! concern. [`LocalBus`] fans out over a `tokio::sync::broadcast`
//! channel, which is all the core needs for single-process wiring and
//! tests.

use tokio::sync::broadcast;
use tracing::trace;

use crate::config::BusConfig;
use crate::error::BusError;
use crate::event::BusMessage;

/// A stream of inbound bus messages.
pub type MessageStream = broadcast::Receiver<BusMessage>;

/// Publish/subscribe boundary for catalog mutation events.
pub trait EventBus: Send + Sync {
    /// Publish a message to all subscribers.
    fn publish(&self, message: BusMessage) -> Result<(), BusError>;

    /// Subscribe to all subsequent messages.
    fn subscribe(&self) -> MessageStream;
}

/// In-process bus: broadcast fan-out with a bounded per-subscriber
/// buffer.
pub struct LocalBus {
    sender: broadcast::Sender<BusMessage>,
}

impl LocalBus {
    /// Create a bus with the configured channel capacity.
    pub fn new(config: &BusConfig) -> Self {
        let (sender, _) = broadcast::channel(config.channel_capacity);
        Self { sender }
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for LocalBus {
    fn default() -> Self {
        Self::new(&BusConfig::default())
    }
}

impl EventBus for LocalBus {
    fn publish(&self, message: BusMessage) -> Result<(), BusError> {
        // A broadcast with no subscribers is not a failure.
        match self.sender.send(message) {
            Ok(delivered) => {
                trace!(subscribers = delivered, "bus message published");
            }
            Err(_) => {
                trace!("bus message dropped, no subscribers");
            }
        }
        Ok(())
    }

    fn subscribe(&self) -> MessageStream {
        self.sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{AckEvent, EventId, ServiceId};

    fn ack() -> BusMessage {
        BusMessage::Ack(AckEvent {
            origin: ServiceId::new("test"),
            acked: EventId::generate(),
        })
    }

    #[test]
    fn publish_without_subscribers_is_fine() {
        let bus = LocalBus::default();
        bus.publish(ack()).unwrap();
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn subscribers_receive_published_messages() {
        let bus = LocalBus::default();
        let mut stream = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        let message = ack();
        bus.publish(message.clone()).unwrap();
        assert_eq!(stream.try_recv().unwrap(), message);
        assert!(stream.try_recv().is_err());
    }

    #[test]
    fn each_subscriber_gets_every_message() {
        let bus = LocalBus::default();
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();

        bus.publish(ack()).unwrap();
        assert!(a.try_recv().is_ok());
        assert!(b.try_recv().is_ok());
    }

    #[test]
    fn subscription_starts_at_the_present() {
        let bus = LocalBus::default();
        bus.publish(ack()).unwrap();
        // hold a subscriber so the channel has at least one receiver
        let _early = bus.subscribe();
        bus.publish(ack()).unwrap();

        let mut late = bus.subscribe();
        bus.publish(ack()).unwrap();
        // The late subscriber sees only messages sent after it joined.
        assert!(late.try_recv().is_ok());
        assert!(late.try_recv().is_err());
    }
}
