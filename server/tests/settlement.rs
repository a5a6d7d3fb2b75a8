//! Settlement tests: payment intents, signature verification, idempotency,
//! counter/stock mutations and reconciliation flagging.

#![allow(clippy::unwrap_used)]

mod common;

use common::{TestHarness, caller, home_location};
use fitsphere_server::engine::{CreateBookingRequest, OrderDraft, OrderLine, VerifyOutcome};
use fitsphere_server::error::Error;
use fitsphere_server::store::{
    BookingStore as _, CatalogStore as _, NotificationStore as _, OrderStore as _,
    PaymentStore as _,
};
use fitsphere_server::types::{
    AttendanceMode, BookingStatus, NotificationKind, OrderStatus, PaymentStatus, Role,
};

async fn booked(h: &TestHarness) -> (fitsphere_server::types::UserAccount, fitsphere_server::types::Booking) {
    let user = h.seed_user("sarah@example.com", Role::User).await;
    let trainer = h.seed_trainer().await;
    let program = h.seed_program(trainer.id).await;
    let booking = h
        .engine
        .create_booking(
            &caller(&user),
            CreateBookingRequest {
                program_id: program.id,
                trainer_id: trainer.id,
                booking_date: "2026-03-01".parse().unwrap(),
                time_slot: "09:00-10:00".to_string(),
                attendance_mode: AttendanceMode::Gym,
                location: None,
                notes: None,
            },
        )
        .await
        .unwrap();
    (user, booking)
}

#[tokio::test]
async fn intent_links_gateway_order_in_paise() {
    let h = TestHarness::new();
    let (user, booking) = booked(&h).await;

    let intent = h
        .engine
        .create_booking_payment(&caller(&user), &booking.id)
        .await
        .unwrap();

    assert_eq!(intent.amount.paise(), 349_900);
    assert_eq!(intent.currency, "INR");
    assert_eq!(intent.gateway_key_id, "rzp_test_key");

    let stored = h.stores.bookings.get(&booking.id).await.unwrap().unwrap();
    assert_eq!(
        stored.gateway_order_id.as_deref(),
        Some(intent.gateway_order_id.as_str())
    );
    // Still pending until verification.
    assert_eq!(stored.status, BookingStatus::Pending);
    assert_eq!(stored.payment_status, PaymentStatus::Pending);
}

#[tokio::test]
async fn foreign_caller_cannot_open_intent() {
    let h = TestHarness::new();
    let (_, booking) = booked(&h).await;
    let stranger = h.seed_user("stranger@example.com", Role::User).await;

    let result = h
        .engine
        .create_booking_payment(&caller(&stranger), &booking.id)
        .await;
    assert!(matches!(result, Err(Error::Forbidden(_))));
}

#[tokio::test]
async fn verify_settles_booking_and_counters_exactly_once() {
    let h = TestHarness::new();
    let (user, booking) = booked(&h).await;
    let intent = h
        .engine
        .create_booking_payment(&caller(&user), &booking.id)
        .await
        .unwrap();

    let signature = h.verifier.sign(&intent.gateway_order_id, "pay_001");
    let outcome = h
        .engine
        .verify_booking_payment(&intent.gateway_order_id, "pay_001", &signature)
        .await
        .unwrap();
    assert_eq!(outcome, VerifyOutcome::Settled);

    let settled = h.stores.bookings.get(&booking.id).await.unwrap().unwrap();
    assert_eq!(settled.status, BookingStatus::Confirmed);
    assert_eq!(settled.payment_status, PaymentStatus::Success);
    assert_eq!(settled.gateway_payment_id.as_deref(), Some("pay_001"));
    assert!(!settled.needs_reconciliation);

    // Exactly one audit row.
    let audit = h
        .stores
        .payments
        .get_by_gateway_order(&intent.gateway_order_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(audit.amount.paise(), 349_900);
    assert_eq!(h.stores.payments.list().await.unwrap().len(), 1);

    // Counters moved by exactly one.
    let trainer = h
        .stores
        .catalog
        .trainer(&booking.trainer_id)
        .await
        .unwrap()
        .unwrap();
    let program = h
        .stores
        .catalog
        .program(&booking.program_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(trainer.total_sessions, 1);
    assert_eq!(program.enrolled_count, 1);

    // Replaying the same valid signature is acknowledged without repeating
    // side effects.
    let replay = h
        .engine
        .verify_booking_payment(&intent.gateway_order_id, "pay_001", &signature)
        .await
        .unwrap();
    assert_eq!(replay, VerifyOutcome::AlreadyProcessed);

    let trainer = h
        .stores
        .catalog
        .trainer(&booking.trainer_id)
        .await
        .unwrap()
        .unwrap();
    let program = h
        .stores
        .catalog
        .program(&booking.program_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(trainer.total_sessions, 1);
    assert_eq!(program.enrolled_count, 1);
    assert_eq!(h.stores.payments.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn tampered_signature_mutates_nothing() {
    let h = TestHarness::new();
    let (user, booking) = booked(&h).await;
    let intent = h
        .engine
        .create_booking_payment(&caller(&user), &booking.id)
        .await
        .unwrap();

    let mut signature = h.verifier.sign(&intent.gateway_order_id, "pay_001");
    let last = signature.pop().unwrap();
    signature.push(if last == '0' { '1' } else { '0' });

    let result = h
        .engine
        .verify_booking_payment(&intent.gateway_order_id, "pay_001", &signature)
        .await;
    assert!(matches!(result, Err(Error::InvalidSignature)));

    let stored = h.stores.bookings.get(&booking.id).await.unwrap().unwrap();
    assert_eq!(stored.status, BookingStatus::Pending);
    assert_eq!(stored.payment_status, PaymentStatus::Pending);
    assert!(h.stores.payments.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_gateway_order_is_not_found() {
    let h = TestHarness::new();
    let signature = h.verifier.sign("order_ghost", "pay_001");
    let result = h
        .engine
        .verify_booking_payment("order_ghost", "pay_001", &signature)
        .await;
    assert!(matches!(result, Err(Error::NotFound { .. })));
}

#[tokio::test]
async fn counter_failure_flags_reconciliation() {
    let h = TestHarness::new();
    let (user, booking) = booked(&h).await;
    let intent = h
        .engine
        .create_booking_payment(&caller(&user), &booking.id)
        .await
        .unwrap();

    // Remove the trainer so the post-payment counter increment fails.
    h.stores
        .catalog
        .delete_trainer(&booking.trainer_id)
        .await
        .unwrap();

    let signature = h.verifier.sign(&intent.gateway_order_id, "pay_001");
    let outcome = h
        .engine
        .verify_booking_payment(&intent.gateway_order_id, "pay_001", &signature)
        .await
        .unwrap();
    assert_eq!(outcome, VerifyOutcome::Settled);

    let stored = h.stores.bookings.get(&booking.id).await.unwrap().unwrap();
    assert_eq!(stored.payment_status, PaymentStatus::Success);
    assert!(stored.needs_reconciliation);

    // The inconsistency is surfaced as a system-error notification.
    let notifications = h.stores.notifications.list(false, 0, 50).await.unwrap();
    assert!(
        notifications
            .iter()
            .any(|n| n.notification_type == NotificationKind::SystemError)
    );
}

#[tokio::test]
async fn order_settlement_decrements_stock_exactly_once() {
    let h = TestHarness::new();
    let user = h.seed_user("sarah@example.com", Role::User).await;
    let product = h.seed_product(50).await;

    let (order, intent) = h
        .engine
        .create_order(
            &caller(&user),
            OrderDraft {
                items: vec![OrderLine {
                    product_id: product.id,
                    quantity: 3,
                }],
                customer_name: "Sarah Johnson".to_string(),
                customer_email: "sarah@example.com".to_string(),
                customer_phone: "+91 98765 43210".to_string(),
                shipping_address: "4 Residency Road, Bengaluru".to_string(),
            },
        )
        .await
        .unwrap();

    // 3 × 1499.00 captured at order time.
    assert_eq!(order.total_amount.rupees(), 4497.00);
    assert_eq!(order.order_status, OrderStatus::Pending);

    let signature = h.verifier.sign(&intent.gateway_order_id, "pay_ord");
    let outcome = h
        .engine
        .verify_order_payment(&intent.gateway_order_id, "pay_ord", &signature)
        .await
        .unwrap();
    assert_eq!(outcome, VerifyOutcome::Settled);

    let settled = h.stores.orders.get(&order.id).await.unwrap().unwrap();
    assert_eq!(settled.order_status, OrderStatus::Processing);
    assert_eq!(settled.payment_status, PaymentStatus::Success);

    let stocked = h.stores.catalog.product(&product.id).await.unwrap().unwrap();
    assert_eq!(stocked.stock, 47);

    // Replay: stock must not move again.
    let replay = h
        .engine
        .verify_order_payment(&intent.gateway_order_id, "pay_ord", &signature)
        .await
        .unwrap();
    assert_eq!(replay, VerifyOutcome::AlreadyProcessed);
    let stocked = h.stores.catalog.product(&product.id).await.unwrap().unwrap();
    assert_eq!(stocked.stock, 47);
}

#[tokio::test]
async fn stock_decrement_below_threshold_raises_low_stock() {
    let h = TestHarness::new();
    let user = h.seed_user("sarah@example.com", Role::User).await;
    let product = h.seed_product(11).await;

    let (_, intent) = h
        .engine
        .create_order(
            &caller(&user),
            OrderDraft {
                items: vec![OrderLine {
                    product_id: product.id,
                    quantity: 2,
                }],
                customer_name: "Sarah Johnson".to_string(),
                customer_email: "sarah@example.com".to_string(),
                customer_phone: "+91 98765 43210".to_string(),
                shipping_address: "4 Residency Road, Bengaluru".to_string(),
            },
        )
        .await
        .unwrap();

    let signature = h.verifier.sign(&intent.gateway_order_id, "pay_low");
    h.engine
        .verify_order_payment(&intent.gateway_order_id, "pay_low", &signature)
        .await
        .unwrap();

    let notifications = h.stores.notifications.list(false, 0, 50).await.unwrap();
    assert!(
        notifications
            .iter()
            .any(|n| n.notification_type == NotificationKind::LowStock)
    );
}

#[tokio::test]
async fn empty_cart_and_zero_quantity_are_rejected() {
    let h = TestHarness::new();
    let user = h.seed_user("sarah@example.com", Role::User).await;
    let product = h.seed_product(5).await;

    let empty = h
        .engine
        .create_order(
            &caller(&user),
            OrderDraft {
                items: vec![],
                customer_name: "Sarah".to_string(),
                customer_email: "sarah@example.com".to_string(),
                customer_phone: "+91 98765 43210".to_string(),
                shipping_address: "somewhere".to_string(),
            },
        )
        .await;
    assert!(matches!(empty, Err(Error::Validation(_))));

    let zero = h
        .engine
        .create_order(
            &caller(&user),
            OrderDraft {
                items: vec![OrderLine {
                    product_id: product.id,
                    quantity: 0,
                }],
                customer_name: "Sarah".to_string(),
                customer_email: "sarah@example.com".to_string(),
                customer_phone: "+91 98765 43210".to_string(),
                shipping_address: "somewhere".to_string(),
            },
        )
        .await;
    assert!(matches!(zero, Err(Error::Validation(_))));
}

#[tokio::test]
async fn paid_booking_cannot_open_second_intent() {
    let h = TestHarness::new();
    let (user, booking) = booked(&h).await;
    let intent = h
        .engine
        .create_booking_payment(&caller(&user), &booking.id)
        .await
        .unwrap();
    let signature = h.verifier.sign(&intent.gateway_order_id, "pay_001");
    h.engine
        .verify_booking_payment(&intent.gateway_order_id, "pay_001", &signature)
        .await
        .unwrap();

    let result = h
        .engine
        .create_booking_payment(&caller(&user), &booking.id)
        .await;
    assert!(matches!(result, Err(Error::AlreadyProcessed)));
}
