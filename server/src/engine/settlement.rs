//! Payment settlement: intent creation, signature verification, and the
//! counter mutations gated behind a verified payment.

use super::{Caller, Engine};
use crate::store::{
    BookingStore as _, CatalogStore as _, OrderStore as _, PaymentStore as _, UserStore as _,
};
use crate::error::{Error, Result};
use crate::types::{
    Booking, BookingId, BookingStatus, Money, NotificationKind, Order, OrderId, OrderItem,
    OrderStatus, PaymentId, PaymentRecord, PaymentStatus,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

/// Stock level at or below which a low-stock notification is raised.
const LOW_STOCK_THRESHOLD: i64 = 10;

/// A payment intent opened for a booking or order.
#[derive(Debug, Clone)]
pub struct PaymentIntent {
    /// Local booking/order id
    pub local_id: Uuid,
    /// Gateway order id to pay against
    pub gateway_order_id: String,
    /// Amount due
    pub amount: Money,
    /// Currency charged
    pub currency: String,
    /// Public gateway key the client checkout needs
    pub gateway_key_id: String,
}

/// Outcome of a verification call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// Signature matched and side effects were applied exactly once
    Settled,
    /// Payment was already verified earlier; nothing was repeated
    AlreadyProcessed,
}

/// One requested line of a retail order.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderLine {
    /// Product to buy
    pub product_id: crate::types::ProductId,
    /// Quantity
    pub quantity: u32,
}

/// A retail purchase request.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderDraft {
    /// Requested lines
    pub items: Vec<OrderLine>,
    /// Customer display name
    pub customer_name: String,
    /// Customer email
    pub customer_email: String,
    /// Customer phone
    pub customer_phone: String,
    /// Delivery address
    pub shipping_address: String,
}

impl Engine {
    // ========================================================================
    // Bookings
    // ========================================================================

    /// Opens a payment intent for a booking.
    ///
    /// A gateway failure or timeout leaves the booking `pending` with its
    /// previous gateway linkage untouched, so the call is retryable.
    ///
    /// # Errors
    ///
    /// `NotFound`, `Forbidden` (caller does not own the booking),
    /// `AlreadyProcessed` when the booking is already paid, `Upstream` on
    /// gateway failure.
    pub async fn create_booking_payment(
        &self,
        caller: &Caller,
        id: &BookingId,
    ) -> Result<PaymentIntent> {
        let mut booking = self.booking_for(caller, id).await?;
        if booking.payment_status == PaymentStatus::Success {
            return Err(Error::AlreadyProcessed);
        }
        if booking.status != BookingStatus::Pending {
            return Err(Error::Validation(format!(
                "Cannot take payment for a {} booking",
                booking.status
            )));
        }

        let remote = self
            .gateway
            .create_order(
                booking.amount.paise(),
                &self.currency,
                &booking.id.to_string(),
            )
            .await?;

        booking.gateway_order_id = Some(remote.id.clone());
        booking.updated_at = Utc::now();
        self.stores.bookings.update(&booking).await?;

        Ok(PaymentIntent {
            local_id: *booking.id.as_uuid(),
            gateway_order_id: remote.id,
            amount: booking.amount,
            currency: remote.currency,
            gateway_key_id: self.gateway_key_id.clone(),
        })
    }

    /// Verifies a booking payment and settles it.
    ///
    /// Signature verification happens before any lookup or write; a
    /// mismatch mutates nothing. On a match the immutable audit row is
    /// written first — its uniqueness on the gateway order id is the
    /// idempotency guard, so a replayed signature (or a concurrent retry)
    /// resolves to [`VerifyOutcome::AlreadyProcessed`] without repeating
    /// side effects.
    ///
    /// # Errors
    ///
    /// `InvalidSignature` on mismatch, `NotFound` when no booking carries
    /// the gateway order id.
    pub async fn verify_booking_payment(
        &self,
        gateway_order_id: &str,
        gateway_payment_id: &str,
        signature: &str,
    ) -> Result<VerifyOutcome> {
        self.verifier
            .verify(gateway_order_id, gateway_payment_id, signature)?;

        let mut booking = self
            .stores
            .bookings
            .get_by_gateway_order(gateway_order_id)
            .await?
            .ok_or_else(|| Error::not_found("Booking", gateway_order_id))?;

        if booking.payment_status == PaymentStatus::Success {
            return Ok(VerifyOutcome::AlreadyProcessed);
        }

        match self
            .record_payment(
                *booking.id.as_uuid(),
                gateway_order_id,
                gateway_payment_id,
                signature,
                booking.amount,
            )
            .await
        {
            Ok(()) => {}
            Err(Error::AlreadyProcessed) => {
                // The audit row exists but this booking is not settled: a
                // concurrent verification owns the flip, or an earlier
                // attempt stopped between the audit write and the status
                // update. Surface it rather than swallowing.
                tracing::warn!(
                    booking_id = %booking.id,
                    gateway_order_id,
                    "Audit row already present for an unsettled booking"
                );
                return Ok(VerifyOutcome::AlreadyProcessed);
            }
            Err(err) => return Err(err),
        }

        booking.payment_status = PaymentStatus::Success;
        booking.status = BookingStatus::Confirmed;
        booking.gateway_payment_id = Some(gateway_payment_id.to_string());
        booking.updated_at = Utc::now();
        self.stores.bookings.update(&booking).await?;

        // Counter increments are atomic at the storage layer. A failure
        // here must not silently lose the session: flag the booking for
        // manual reconciliation and raise an alert.
        let counters = self.apply_booking_counters(&booking).await;
        if let Err(err) = counters {
            self.flag_booking_reconciliation(&mut booking, &err).await;
        }

        tracing::info!(
            booking_id = %booking.id,
            gateway_order_id,
            gateway_payment_id,
            "Booking payment verified"
        );
        Ok(VerifyOutcome::Settled)
    }

    async fn apply_booking_counters(&self, booking: &Booking) -> Result<()> {
        self.stores
            .catalog
            .increment_sessions(&booking.trainer_id)
            .await?;
        self.stores
            .catalog
            .increment_enrollment(&booking.program_id)
            .await?;
        Ok(())
    }

    async fn flag_booking_reconciliation(&self, booking: &mut Booking, err: &Error) {
        tracing::error!(
            booking_id = %booking.id,
            gateway_order_id = ?booking.gateway_order_id,
            gateway_payment_id = ?booking.gateway_payment_id,
            error = %err,
            "Counter update failed after payment was recorded; booking needs reconciliation"
        );
        booking.needs_reconciliation = true;
        booking.updated_at = Utc::now();
        if let Err(update_err) = self.stores.bookings.update(booking).await {
            tracing::error!(
                booking_id = %booking.id,
                error = %update_err,
                "Failed to persist reconciliation flag"
            );
        }
        self.notify(
            NotificationKind::SystemError,
            format!(
                "Booking {} paid but counters were not updated; manual reconciliation required",
                booking.id
            ),
        )
        .await;
    }

    // ========================================================================
    // Orders
    // ========================================================================

    /// Creates a retail order and opens its payment intent in one step.
    ///
    /// Line prices are captured from the catalog at order time; the total is
    /// fixed here. The gateway intent is opened before the local insert so a
    /// gateway failure leaves no dangling order.
    ///
    /// # Errors
    ///
    /// `Validation` for an empty cart or zero quantities, `NotFound` for an
    /// unknown product or user, `Upstream` on gateway failure.
    pub async fn create_order(
        &self,
        caller: &Caller,
        draft: OrderDraft,
    ) -> Result<(Order, PaymentIntent)> {
        if draft.items.is_empty() {
            return Err(Error::Validation("Order must contain at least one item".to_string()));
        }

        let user = self
            .stores
            .users
            .get(&caller.user_id)
            .await?
            .ok_or_else(|| Error::not_found("User", caller.user_id))?;

        let mut items = Vec::with_capacity(draft.items.len());
        let mut total = Money::ZERO;
        for line in &draft.items {
            if line.quantity == 0 {
                return Err(Error::Validation("Item quantity must be at least 1".to_string()));
            }
            let product = self
                .stores
                .catalog
                .product(&line.product_id)
                .await?
                .ok_or_else(|| Error::not_found("Product", line.product_id))?;
            total = total.add(product.price.multiply(line.quantity));
            items.push(OrderItem {
                product_id: product.id,
                product_name: product.name.clone(),
                quantity: line.quantity,
                price: product.price,
            });
        }

        let order_id = OrderId::new();
        let remote = self
            .gateway
            .create_order(total.paise(), &self.currency, &order_id.to_string())
            .await?;

        let now = Utc::now();
        let order = Order {
            id: order_id,
            user_id: user.id,
            items,
            total_amount: total,
            customer_name: draft.customer_name,
            customer_email: draft.customer_email,
            customer_phone: draft.customer_phone,
            shipping_address: draft.shipping_address,
            order_status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            gateway_order_id: Some(remote.id.clone()),
            gateway_payment_id: None,
            needs_reconciliation: false,
            created_at: now,
            updated_at: now,
        };
        self.stores.orders.insert(&order).await?;

        tracing::info!(order_id = %order.id, amount = %order.total_amount, "Order created");
        self.notify(
            NotificationKind::NewOrder,
            format!(
                "New order received: {} - {}",
                order.customer_name, order.total_amount
            ),
        )
        .await;

        Ok((
            order,
            PaymentIntent {
                local_id: *order_id.as_uuid(),
                gateway_order_id: remote.id,
                amount: total,
                currency: remote.currency,
                gateway_key_id: self.gateway_key_id.clone(),
            },
        ))
    }

    /// Verifies an order payment, settles it, and decrements stock exactly
    /// once per line item.
    ///
    /// # Errors
    ///
    /// `InvalidSignature` on mismatch, `NotFound` when no order carries the
    /// gateway order id.
    pub async fn verify_order_payment(
        &self,
        gateway_order_id: &str,
        gateway_payment_id: &str,
        signature: &str,
    ) -> Result<VerifyOutcome> {
        self.verifier
            .verify(gateway_order_id, gateway_payment_id, signature)?;

        let mut order = self
            .stores
            .orders
            .get_by_gateway_order(gateway_order_id)
            .await?
            .ok_or_else(|| Error::not_found("Order", gateway_order_id))?;

        if order.payment_status == PaymentStatus::Success {
            return Ok(VerifyOutcome::AlreadyProcessed);
        }

        match self
            .record_payment(
                *order.id.as_uuid(),
                gateway_order_id,
                gateway_payment_id,
                signature,
                order.total_amount,
            )
            .await
        {
            Ok(()) => {}
            Err(Error::AlreadyProcessed) => {
                tracing::warn!(
                    order_id = %order.id,
                    gateway_order_id,
                    "Audit row already present for an unsettled order"
                );
                return Ok(VerifyOutcome::AlreadyProcessed);
            }
            Err(err) => return Err(err),
        }

        order.payment_status = PaymentStatus::Success;
        order.order_status = OrderStatus::Processing;
        order.gateway_payment_id = Some(gateway_payment_id.to_string());
        order.updated_at = Utc::now();
        self.stores.orders.update(&order).await?;

        if let Err(err) = self.apply_stock_decrements(&order).await {
            tracing::error!(
                order_id = %order.id,
                gateway_order_id,
                error = %err,
                "Stock update failed after payment was recorded; order needs reconciliation"
            );
            order.needs_reconciliation = true;
            order.updated_at = Utc::now();
            if let Err(update_err) = self.stores.orders.update(&order).await {
                tracing::error!(
                    order_id = %order.id,
                    error = %update_err,
                    "Failed to persist reconciliation flag"
                );
            }
            self.notify(
                NotificationKind::SystemError,
                format!(
                    "Order {} paid but stock was not updated; manual reconciliation required",
                    order.id
                ),
            )
            .await;
        }

        tracing::info!(
            order_id = %order.id,
            gateway_order_id,
            gateway_payment_id,
            "Order payment verified"
        );
        Ok(VerifyOutcome::Settled)
    }

    async fn apply_stock_decrements(&self, order: &Order) -> Result<()> {
        for item in &order.items {
            let new_stock = self
                .stores
                .catalog
                .decrement_stock(&item.product_id, item.quantity)
                .await?;
            if new_stock < LOW_STOCK_THRESHOLD {
                self.notify(
                    NotificationKind::LowStock,
                    format!(
                        "Low stock alert: {} has only {} items left",
                        item.product_name,
                        new_stock.max(0)
                    ),
                )
                .await;
            }
        }
        Ok(())
    }

    // ========================================================================
    // Shared
    // ========================================================================

    /// Writes the immutable audit row. `AlreadyProcessed` surfaces when a
    /// row for this gateway order already exists.
    async fn record_payment(
        &self,
        parent_id: Uuid,
        gateway_order_id: &str,
        gateway_payment_id: &str,
        signature: &str,
        amount: Money,
    ) -> Result<()> {
        let record = PaymentRecord {
            id: PaymentId::new(),
            parent_id,
            gateway_order_id: gateway_order_id.to_string(),
            gateway_payment_id: gateway_payment_id.to_string(),
            signature: signature.to_string(),
            amount,
            status: PaymentStatus::Success,
            created_at: Utc::now(),
        };
        self.stores.payments.insert(&record).await
    }
}
