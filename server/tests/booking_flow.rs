//! Booking lifecycle tests: creation validation, pricing, availability,
//! conflict enforcement under concurrency, and the admin state machine.

#![allow(clippy::unwrap_used, clippy::panic)]

mod common;

use common::{TestHarness, caller, home_location};
use fitsphere_server::engine::{AdminBookingStatus, BookingUpdate, CreateBookingRequest};
use fitsphere_server::error::Error;
use fitsphere_server::slots::SLOT_UNIVERSE;
use fitsphere_server::store::BookingStore as _;
use fitsphere_server::types::{AttendanceMode, BookingStatus, Role, TrainerId};

fn request(
    program_id: fitsphere_server::types::ProgramId,
    trainer_id: TrainerId,
    date: &str,
    slot: &str,
) -> CreateBookingRequest {
    CreateBookingRequest {
        program_id,
        trainer_id,
        booking_date: date.parse().unwrap(),
        time_slot: slot.to_string(),
        attendance_mode: AttendanceMode::Gym,
        location: None,
        notes: None,
    }
}

#[tokio::test]
async fn gym_booking_uses_program_price_and_venue_location() {
    let h = TestHarness::new();
    let user = h.seed_user("sarah@example.com", Role::User).await;
    let trainer = h.seed_trainer().await;
    let program = h.seed_program(trainer.id).await;
    h.seed_venue().await;

    let booking = h
        .engine
        .create_booking(
            &caller(&user),
            request(program.id, trainer.id, "2026-03-01", "09:00-10:00"),
        )
        .await
        .unwrap();

    assert_eq!(booking.amount.rupees(), 3499.00);
    assert_eq!(booking.status, BookingStatus::Pending);
    assert!(booking.gym_location.is_some());
    assert!(booking.user_location.is_none());
}

#[tokio::test]
async fn home_visit_adds_surcharge() {
    let h = TestHarness::new();
    let user = h.seed_user("sarah@example.com", Role::User).await;
    let trainer = h.seed_trainer().await;
    let program = h.seed_program(trainer.id).await;

    let mut req = request(program.id, trainer.id, "2026-03-01", "09:00-10:00");
    req.attendance_mode = AttendanceMode::HomeVisit;
    req.location = Some(home_location());

    let booking = h.engine.create_booking(&caller(&user), req).await.unwrap();
    assert_eq!(booking.amount.rupees(), 3999.00);
    assert!(booking.user_location.is_some());
}

#[tokio::test]
async fn home_visit_without_location_is_rejected() {
    let h = TestHarness::new();
    let user = h.seed_user("sarah@example.com", Role::User).await;
    let trainer = h.seed_trainer().await;
    let program = h.seed_program(trainer.id).await;

    let mut req = request(program.id, trainer.id, "2026-03-01", "09:00-10:00");
    req.attendance_mode = AttendanceMode::HomeVisit;

    let result = h.engine.create_booking(&caller(&user), req).await;
    assert!(matches!(result, Err(Error::Validation(_))));
}

#[tokio::test]
async fn home_visit_on_gym_only_program_is_rejected() {
    let h = TestHarness::new();
    let user = h.seed_user("sarah@example.com", Role::User).await;
    let trainer = h.seed_trainer().await;
    let program = h.seed_gym_only_program(trainer.id).await;

    let mut req = request(program.id, trainer.id, "2026-03-01", "09:00-10:00");
    req.attendance_mode = AttendanceMode::HomeVisit;
    req.location = Some(home_location());

    let result = h.engine.create_booking(&caller(&user), req).await;
    assert!(matches!(result, Err(Error::Validation(_))));
}

#[tokio::test]
async fn unknown_references_are_not_found() {
    let h = TestHarness::new();
    let user = h.seed_user("sarah@example.com", Role::User).await;
    let trainer = h.seed_trainer().await;
    let program = h.seed_program(trainer.id).await;

    // Unknown trainer
    let result = h
        .engine
        .create_booking(
            &caller(&user),
            request(program.id, TrainerId::new(), "2026-03-01", "09:00-10:00"),
        )
        .await;
    assert!(matches!(result, Err(Error::NotFound { .. })));

    // Unknown program
    let result = h
        .engine
        .create_booking(
            &caller(&user),
            request(
                fitsphere_server::types::ProgramId::new(),
                trainer.id,
                "2026-03-01",
                "09:00-10:00",
            ),
        )
        .await;
    assert!(matches!(result, Err(Error::NotFound { .. })));
}

#[tokio::test]
async fn bad_slot_label_is_rejected() {
    let h = TestHarness::new();
    let user = h.seed_user("sarah@example.com", Role::User).await;
    let trainer = h.seed_trainer().await;
    let program = h.seed_program(trainer.id).await;

    let result = h
        .engine
        .create_booking(
            &caller(&user),
            request(program.id, trainer.id, "2026-03-01", "06:00-07:00"),
        )
        .await;
    assert!(matches!(result, Err(Error::Validation(_))));
}

#[tokio::test]
async fn booked_slot_conflicts_until_cancelled() {
    let h = TestHarness::new();
    let user = h.seed_user("sarah@example.com", Role::User).await;
    let trainer = h.seed_trainer().await;
    let program = h.seed_program(trainer.id).await;

    let booking = h
        .engine
        .create_booking(
            &caller(&user),
            request(program.id, trainer.id, "2026-03-01", "09:00-10:00"),
        )
        .await
        .unwrap();

    let result = h
        .engine
        .create_booking(
            &caller(&user),
            request(program.id, trainer.id, "2026-03-01", "09:00-10:00"),
        )
        .await;
    assert!(matches!(result, Err(Error::Conflict(_))));

    // Cancelling releases the slot.
    h.engine
        .update_booking(
            &booking.id,
            BookingUpdate {
                status: Some(AdminBookingStatus::Cancelled),
                ..BookingUpdate::default()
            },
        )
        .await
        .unwrap();

    h.engine
        .create_booking(
            &caller(&user),
            request(program.id, trainer.id, "2026-03-01", "09:00-10:00"),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn concurrent_requests_for_one_slot_yield_one_winner() {
    let h = TestHarness::new();
    let user = h.seed_user("sarah@example.com", Role::User).await;
    let trainer = h.seed_trainer().await;
    let program = h.seed_program(trainer.id).await;

    let mut handles = Vec::new();
    for _ in 0..16 {
        let engine = h.engine.clone();
        let caller = caller(&user);
        let req = request(program.id, trainer.id, "2026-03-01", "10:00-11:00");
        handles.push(tokio::spawn(async move {
            engine.create_booking(&caller, req).await
        }));
    }

    let mut created = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(Error::Conflict(_)) => conflicts += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(created, 1);
    assert_eq!(conflicts, 15);
}

#[tokio::test]
async fn availability_partitions_the_fixed_universe() {
    let h = TestHarness::new();
    let user = h.seed_user("sarah@example.com", Role::User).await;
    let trainer = h.seed_trainer().await;
    let program = h.seed_program(trainer.id).await;
    let date = "2026-03-01";

    let initial = h
        .engine
        .list_available_slots(&trainer.id, date.parse().unwrap())
        .await
        .unwrap();
    assert_eq!(initial.available.len(), SLOT_UNIVERSE.len());
    assert!(initial.booked.is_empty());

    let booking = h
        .engine
        .create_booking(
            &caller(&user),
            request(program.id, trainer.id, date, "16:00-17:00"),
        )
        .await
        .unwrap();

    let partition = h
        .engine
        .list_available_slots(&trainer.id, date.parse().unwrap())
        .await
        .unwrap();
    assert_eq!(partition.booked, vec!["16:00-17:00"]);
    assert_eq!(partition.available.len(), SLOT_UNIVERSE.len() - 1);
    assert!(
        !h.engine
            .check_availability(&trainer.id, date.parse().unwrap(), "16:00-17:00")
            .await
            .unwrap()
    );

    // Completed bookings do not occupy slots. Drive the booking through the
    // legal path: settle it, then complete it.
    let intent = h
        .engine
        .create_booking_payment(&caller(&user), &booking.id)
        .await
        .unwrap();
    let signature = h.verifier.sign(&intent.gateway_order_id, "pay_done");
    h.engine
        .verify_booking_payment(&intent.gateway_order_id, "pay_done", &signature)
        .await
        .unwrap();
    h.engine
        .update_booking(
            &booking.id,
            BookingUpdate {
                status: Some(AdminBookingStatus::Completed),
                ..BookingUpdate::default()
            },
        )
        .await
        .unwrap();

    let after = h
        .engine
        .list_available_slots(&trainer.id, date.parse().unwrap())
        .await
        .unwrap();
    assert!(after.booked.is_empty());
}

#[tokio::test]
async fn admin_cannot_confirm_via_status_update() {
    // BookingUpdate's status variants are cancelled/completed only; the
    // closest illegal move is completing a pending booking.
    let h = TestHarness::new();
    let user = h.seed_user("sarah@example.com", Role::User).await;
    let trainer = h.seed_trainer().await;
    let program = h.seed_program(trainer.id).await;

    let booking = h
        .engine
        .create_booking(
            &caller(&user),
            request(program.id, trainer.id, "2026-03-01", "09:00-10:00"),
        )
        .await
        .unwrap();

    let result = h
        .engine
        .update_booking(
            &booking.id,
            BookingUpdate {
                status: Some(AdminBookingStatus::Completed),
                ..BookingUpdate::default()
            },
        )
        .await;
    assert!(matches!(result, Err(Error::Validation(_))));

    let stored = h.stores.bookings.get(&booking.id).await.unwrap().unwrap();
    assert_eq!(stored.status, BookingStatus::Pending);
}

#[tokio::test]
async fn reschedule_recheck_conflicts() {
    let h = TestHarness::new();
    let user = h.seed_user("sarah@example.com", Role::User).await;
    let trainer = h.seed_trainer().await;
    let program = h.seed_program(trainer.id).await;

    let first = h
        .engine
        .create_booking(
            &caller(&user),
            request(program.id, trainer.id, "2026-03-01", "09:00-10:00"),
        )
        .await
        .unwrap();
    let second = h
        .engine
        .create_booking(
            &caller(&user),
            request(program.id, trainer.id, "2026-03-01", "10:00-11:00"),
        )
        .await
        .unwrap();

    // Moving the second booking onto the first's slot must conflict.
    let result = h
        .engine
        .update_booking(
            &second.id,
            BookingUpdate {
                time_slot: Some("09:00-10:00".to_string()),
                ..BookingUpdate::default()
            },
        )
        .await;
    assert!(matches!(result, Err(Error::Conflict(_))));

    // Moving it to a free slot succeeds.
    let moved = h
        .engine
        .update_booking(
            &second.id,
            BookingUpdate {
                time_slot: Some("11:00-12:00".to_string()),
                ..BookingUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.time_slot.as_str(), "11:00-12:00");
    let _ = first;
}

#[tokio::test]
async fn foreign_booking_is_forbidden() {
    let h = TestHarness::new();
    let owner = h.seed_user("owner@example.com", Role::User).await;
    let other = h.seed_user("other@example.com", Role::User).await;
    let admin = h.seed_user("admin@example.com", Role::Admin).await;
    let trainer = h.seed_trainer().await;
    let program = h.seed_program(trainer.id).await;

    let booking = h
        .engine
        .create_booking(
            &caller(&owner),
            request(program.id, trainer.id, "2026-03-01", "09:00-10:00"),
        )
        .await
        .unwrap();

    assert!(matches!(
        h.engine.booking_for(&caller(&other), &booking.id).await,
        Err(Error::Forbidden(_))
    ));
    assert!(h.engine.booking_for(&caller(&owner), &booking.id).await.is_ok());
    assert!(h.engine.booking_for(&caller(&admin), &booking.id).await.is_ok());
}
