//! The booking & settlement engine.
//!
//! Owns slot availability, the booking lifecycle, payment linkage and the
//! counter/inventory mutations triggered by verified payments. Everything
//! else (catalog, identity, CDN, relay transport) is a collaborator reached
//! through a trait object.
//!
//! Ordering within one lifecycle is reserve → intent → verify →
//! mutate-counters → notify; validation and ownership checks always run
//! before any external call.

mod booking;
mod settlement;

pub use booking::{AdminBookingStatus, BookingUpdate, CreateBookingRequest};
pub use settlement::{OrderDraft, OrderLine, PaymentIntent, VerifyOutcome};

use crate::gateway::{PaymentGateway, SignatureVerifier};
use crate::relay::{Relay, RelayEvent};
use crate::store::{NotificationStore as _, Stores};
use crate::types::{Notification, NotificationKind, Role, UserId};
use std::sync::Arc;

/// The authenticated principal on whose behalf an operation runs.
#[derive(Debug, Clone, Copy)]
pub struct Caller {
    /// Subject id from the access token
    pub user_id: UserId,
    /// Role from the access token
    pub role: Role,
}

impl Caller {
    /// Whether this caller is an administrator.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Whether this caller may act on a resource owned by `owner`.
    #[must_use]
    pub fn owns_or_admin(&self, owner: &UserId) -> bool {
        self.is_admin() || self.user_id == *owner
    }
}

/// The booking & settlement engine.
///
/// Cheap to clone; collaborators are shared behind `Arc`.
#[derive(Clone)]
pub struct Engine {
    pub(crate) stores: Stores,
    pub(crate) gateway: Arc<dyn PaymentGateway>,
    pub(crate) verifier: SignatureVerifier,
    pub(crate) relay: Relay,
    pub(crate) currency: String,
    pub(crate) gateway_key_id: String,
}

impl Engine {
    /// Assembles the engine from its collaborators.
    #[must_use]
    pub fn new(
        stores: Stores,
        gateway: Arc<dyn PaymentGateway>,
        verifier: SignatureVerifier,
        relay: Relay,
        currency: impl Into<String>,
        gateway_key_id: impl Into<String>,
    ) -> Self {
        Self {
            stores,
            gateway,
            verifier,
            relay,
            currency: currency.into(),
            gateway_key_id: gateway_key_id.into(),
        }
    }

    /// Store handles, exposed for handlers that read collaborator-owned
    /// collections directly.
    #[must_use]
    pub const fn stores(&self) -> &Stores {
        &self.stores
    }

    /// Relay handle for WebSocket subscriptions.
    #[must_use]
    pub const fn relay(&self) -> &Relay {
        &self.relay
    }

    /// Persists and fans out a notification. Fire-and-forget: failures are
    /// logged and never propagate to the triggering request.
    pub(crate) async fn notify(&self, kind: NotificationKind, message: impl Into<String>) {
        let notification = Notification::new(kind, message);
        if let Err(err) = self.stores.notifications.insert(&notification).await {
            tracing::warn!(error = %err, "Failed to persist notification");
        }
        self.relay.emit(RelayEvent::Notification { notification });
    }
}
