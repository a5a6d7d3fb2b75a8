//! Notification/chat relay.
//!
//! Fans state-change events out to connected WebSocket clients over a
//! `tokio::sync::broadcast` channel. Emission is fire-and-forget: a relay
//! with no listeners or a lagging listener never fails the request that
//! produced the event.

use crate::types::{ChatMessage, Notification, Role, UserId};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Default capacity of the broadcast ring buffer.
const RELAY_CAPACITY: usize = 256;

/// An event fanned out to connected clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RelayEvent {
    /// A new chat message was persisted
    NewMessage {
        /// The message
        message: ChatMessage,
    },
    /// An admin-facing notification was raised
    Notification {
        /// The notification
        notification: Notification,
    },
}

impl RelayEvent {
    /// Whether a connected client should receive this event.
    ///
    /// Chat messages go to the addressed receiver and to administrators
    /// (messages without a receiver are the "admin room" broadcast);
    /// notifications go to administrators only. Senders do not get their own
    /// messages echoed back.
    #[must_use]
    pub fn is_for(&self, user_id: &UserId, role: Role) -> bool {
        match self {
            Self::NewMessage { message } => {
                if message.sender_id == *user_id {
                    return false;
                }
                match message.receiver_id {
                    Some(receiver) => receiver == *user_id || role == Role::Admin,
                    None => role == Role::Admin,
                }
            }
            Self::Notification { .. } => role == Role::Admin,
        }
    }
}

/// Broadcast-based relay shared through application state.
#[derive(Clone)]
pub struct Relay {
    tx: broadcast::Sender<RelayEvent>,
}

impl Relay {
    /// Creates a relay with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(RELAY_CAPACITY);
        Self { tx }
    }

    /// Subscribes a new listener.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<RelayEvent> {
        self.tx.subscribe()
    }

    /// Emits an event to all listeners. Never fails the caller.
    pub fn emit(&self, event: RelayEvent) {
        // send only errors when no receiver is connected, which is the
        // normal state when no dashboard is open.
        if let Err(err) = self.tx.send(event) {
            tracing::debug!(error = %err, "Relay event dropped (no listeners)");
        }
    }

    /// Number of connected listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Relay {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::NotificationKind;
    use chrono::Utc;
    use uuid::Uuid;

    fn message(sender: UserId, receiver: Option<UserId>) -> ChatMessage {
        ChatMessage {
            id: Uuid::new_v4(),
            sender_id: sender,
            sender_name: "Sarah".to_string(),
            sender_role: Role::User,
            receiver_id: receiver,
            message: "hello".to_string(),
            is_read: false,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn events_reach_subscribers() {
        let relay = Relay::new();
        let mut rx = relay.subscribe();
        relay.emit(RelayEvent::Notification {
            notification: Notification::new(NotificationKind::NewBooking, "booked"),
        });
        assert!(matches!(
            rx.recv().await.unwrap(),
            RelayEvent::Notification { .. }
        ));
    }

    #[test]
    fn emit_without_listeners_is_silent() {
        let relay = Relay::new();
        relay.emit(RelayEvent::Notification {
            notification: Notification::new(NotificationKind::LowStock, "low"),
        });
        assert_eq!(relay.listener_count(), 0);
    }

    #[test]
    fn direct_message_routing() {
        let sender = UserId::new();
        let receiver = UserId::new();
        let other = UserId::new();
        let event = RelayEvent::NewMessage {
            message: message(sender, Some(receiver)),
        };

        assert!(event.is_for(&receiver, Role::User));
        assert!(!event.is_for(&other, Role::User));
        assert!(event.is_for(&other, Role::Admin));
        assert!(!event.is_for(&sender, Role::User));
    }

    #[test]
    fn admin_broadcast_routing() {
        let sender = UserId::new();
        let event = RelayEvent::NewMessage {
            message: message(sender, None),
        };
        assert!(event.is_for(&UserId::new(), Role::Admin));
        assert!(!event.is_for(&UserId::new(), Role::User));
    }

    #[test]
    fn notifications_are_admin_only() {
        let event = RelayEvent::Notification {
            notification: Notification::new(NotificationKind::NewOrder, "order"),
        };
        assert!(event.is_for(&UserId::new(), Role::Admin));
        assert!(!event.is_for(&UserId::new(), Role::User));
    }
}
