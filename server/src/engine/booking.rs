//! Booking lifecycle: creation, availability, admin updates.

use super::{Caller, Engine};
use crate::store::{BookingStore as _, CatalogStore as _, UserStore as _};
use crate::error::{Error, Result};
use crate::slots::{self, SlotLabel, SlotPartition};
use crate::types::{
    AttendanceMode, Booking, BookingId, BookingStatus, GeoLocation, NotificationKind,
    PaymentStatus, TrainerId,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

/// A validated reservation request.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookingRequest {
    /// Program to book
    pub program_id: crate::types::ProgramId,
    /// Trainer to book
    pub trainer_id: TrainerId,
    /// Session date (`YYYY-MM-DD`)
    pub booking_date: NaiveDate,
    /// Slot label from the fixed universe
    pub time_slot: String,
    /// Gym or home visit; defaults to gym
    #[serde(default = "default_mode")]
    pub attendance_mode: AttendanceMode,
    /// Customer location; required for home visits
    pub location: Option<GeoLocation>,
    /// Free-text note
    pub notes: Option<String>,
}

const fn default_mode() -> AttendanceMode {
    AttendanceMode::Gym
}

/// Lifecycle statuses an administrator may set directly.
///
/// `confirmed` is deliberately absent: confirmation is a side effect of
/// payment verification and cannot be reached from a status-update call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminBookingStatus {
    /// Cancel a pending or confirmed booking
    Cancelled,
    /// Mark a confirmed booking's session as held
    Completed,
}

/// Tagged admin update for a booking.
///
/// Exactly these fields may change; anything else on the record is
/// unreachable from the status endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingUpdate {
    /// Lifecycle transition
    pub status: Option<AdminBookingStatus>,
    /// Replace the note
    pub notes: Option<String>,
    /// Move to another date (with `time_slot`)
    pub booking_date: Option<NaiveDate>,
    /// Move to another slot
    pub time_slot: Option<String>,
}

impl Engine {
    /// Creates a pending booking for the calling customer.
    ///
    /// Validation order: referenced records first, then attendance-mode
    /// rules, then the conflict-safe insert. The amount is fixed here from
    /// the program price plus any home-visit surcharge and never recomputed.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown user/program/trainer, `Validation` for a bad
    /// slot or unsupported mode or missing location, `Conflict` when the
    /// slot is already held by a live booking.
    pub async fn create_booking(
        &self,
        caller: &Caller,
        request: CreateBookingRequest,
    ) -> Result<Booking> {
        let user = self
            .stores
            .users
            .get(&caller.user_id)
            .await?
            .ok_or_else(|| Error::not_found("User", caller.user_id))?;
        let program = self
            .stores
            .catalog
            .program(&request.program_id)
            .await?
            .ok_or_else(|| Error::not_found("Program", request.program_id))?;
        let trainer = self
            .stores
            .catalog
            .trainer(&request.trainer_id)
            .await?
            .ok_or_else(|| Error::not_found("Trainer", request.trainer_id))?;

        let time_slot = SlotLabel::parse(&request.time_slot).map_err(Error::Validation)?;

        let (amount, user_location, gym_location) = match request.attendance_mode {
            AttendanceMode::HomeVisit => {
                if !program.supports_home_visit {
                    return Err(Error::Validation(format!(
                        "Program '{}' does not support home visits",
                        program.title
                    )));
                }
                let location = request.location.ok_or_else(|| {
                    Error::Validation(
                        "Location with address and coordinates is required for home visits"
                            .to_string(),
                    )
                })?;
                if !location.is_valid() {
                    return Err(Error::Validation(
                        "Location must include an address and valid coordinates".to_string(),
                    ));
                }
                (
                    program.price.add(program.home_visit_surcharge),
                    Some(location),
                    None,
                )
            }
            AttendanceMode::Gym => {
                if !program.supports_gym_attendance {
                    return Err(Error::Validation(format!(
                        "Program '{}' does not support gym attendance",
                        program.title
                    )));
                }
                let venue = self.stores.catalog.venue_settings().await?;
                (program.price, None, venue.map(|v| v.location))
            }
        };

        let now = Utc::now();
        let booking = Booking {
            id: BookingId::new(),
            user_id: user.id,
            user_name: user.name.clone(),
            user_email: user.email.clone(),
            user_phone: user.phone.clone(),
            program_id: program.id,
            program_title: program.title.clone(),
            trainer_id: trainer.id,
            trainer_name: trainer.name.clone(),
            booking_date: request.booking_date,
            time_slot,
            attendance_mode: request.attendance_mode,
            user_location,
            gym_location,
            amount,
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Pending,
            gateway_order_id: None,
            gateway_payment_id: None,
            notes: request.notes,
            needs_reconciliation: false,
            created_at: now,
            updated_at: now,
        };

        // The ledger insert is the conflict check; a racing request for the
        // same slot loses on the storage-level uniqueness guarantee.
        self.stores.bookings.insert(&booking).await?;

        tracing::info!(
            booking_id = %booking.id,
            trainer_id = %booking.trainer_id,
            date = %booking.booking_date,
            slot = %booking.time_slot,
            "Booking created"
        );
        self.notify(
            NotificationKind::NewBooking,
            format!(
                "New session booked: {} - {} on {} at {}",
                booking.user_name, booking.program_title, booking.booking_date, booking.time_slot
            ),
        )
        .await;

        Ok(booking)
    }

    /// Availability partition for a trainer on a date, computed at request
    /// time from the ledger.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown trainer.
    pub async fn list_available_slots(
        &self,
        trainer_id: &TrainerId,
        date: NaiveDate,
    ) -> Result<SlotPartition> {
        if self.stores.catalog.trainer(trainer_id).await?.is_none() {
            return Err(Error::not_found("Trainer", *trainer_id));
        }
        let live = self.stores.bookings.live_slots(trainer_id, date).await?;
        Ok(slots::partition(&live))
    }

    /// Whether a slot is free for a trainer on a date.
    ///
    /// # Errors
    ///
    /// `Validation` for a label outside the universe; storage errors as
    /// `Upstream`.
    pub async fn check_availability(
        &self,
        trainer_id: &TrainerId,
        date: NaiveDate,
        slot: &str,
    ) -> Result<bool> {
        let label = SlotLabel::parse(slot).map_err(Error::Validation)?;
        let live = self.stores.bookings.live_slots(trainer_id, date).await?;
        Ok(!live.contains(&label))
    }

    /// Applies an administrator update to a booking.
    ///
    /// Allowed transitions: `pending|confirmed → cancelled` and
    /// `confirmed → completed`. Cancellation performs no counter reversal.
    /// Rescheduling re-runs the slot conflict check via the ledger update.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown booking, `Validation` for an illegal
    /// transition or bad slot, `Conflict` when a reschedule collides.
    pub async fn update_booking(
        &self,
        id: &BookingId,
        update: BookingUpdate,
    ) -> Result<Booking> {
        let mut booking = self
            .stores
            .bookings
            .get(id)
            .await?
            .ok_or_else(|| Error::not_found("Booking", *id))?;

        if let Some(status) = update.status {
            booking.status = match (booking.status, status) {
                (BookingStatus::Pending | BookingStatus::Confirmed, AdminBookingStatus::Cancelled) => {
                    BookingStatus::Cancelled
                }
                (BookingStatus::Confirmed, AdminBookingStatus::Completed) => {
                    BookingStatus::Completed
                }
                (current, requested) => {
                    return Err(Error::Validation(format!(
                        "Cannot move a {current} booking to {requested:?}"
                    )));
                }
            };
        }

        if update.booking_date.is_some() || update.time_slot.is_some() {
            if !booking.status.is_live() {
                return Err(Error::Validation(
                    "Only pending or confirmed bookings can be rescheduled".to_string(),
                ));
            }
            if let Some(date) = update.booking_date {
                booking.booking_date = date;
            }
            if let Some(slot) = &update.time_slot {
                booking.time_slot = SlotLabel::parse(slot).map_err(Error::Validation)?;
            }
        }

        if let Some(notes) = update.notes {
            booking.notes = Some(notes);
        }

        booking.updated_at = Utc::now();
        self.stores.bookings.update(&booking).await?;

        tracing::info!(booking_id = %booking.id, status = %booking.status, "Booking updated");
        Ok(booking)
    }

    /// Fetches a booking, enforcing that the caller owns it or is an admin.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown booking, `Forbidden` for a foreign one.
    pub async fn booking_for(&self, caller: &Caller, id: &BookingId) -> Result<Booking> {
        let booking = self
            .stores
            .bookings
            .get(id)
            .await?
            .ok_or_else(|| Error::not_found("Booking", *id))?;
        if !caller.owns_or_admin(&booking.user_id) {
            return Err(Error::Forbidden(
                "You do not have access to this booking".to_string(),
            ));
        }
        Ok(booking)
    }
}
