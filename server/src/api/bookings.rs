//! Booking endpoints.
//!
//! - `POST /api/bookings` — reserve a slot (auth)
//! - `GET /api/bookings` — all bookings (admin)
//! - `GET /api/bookings/user/my-bookings` — caller's bookings (auth)
//! - `GET /api/bookings/:id` — one booking (auth + ownership)
//! - `GET /api/bookings/trainer/:trainer_id/available-slots?booking_date=`
//! - `POST /api/bookings/:id/create-payment` — open a payment intent (auth)
//! - `POST /api/bookings/:id/verify-payment` — settle (form fields)
//! - `PUT /api/bookings/:id/status` — tagged admin update
//! - `GET /api/bookings/export/csv` — streamed CSV (admin)

use crate::auth::{RequireAdmin, SessionUser};
use crate::engine::{BookingUpdate, CreateBookingRequest, VerifyOutcome};
use crate::error::Error;
use crate::export;
use crate::server::state::AppState;
use crate::store::{BookingFilter, BookingStore as _};
use crate::types::{Booking, BookingId, BookingStatus, Money, PaymentStatus, TrainerId};
use axum::{
    Form, Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use fitsphere_web::AppError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status filters for the admin listing.
#[derive(Debug, Default, Deserialize)]
pub struct BookingListQuery {
    /// Restrict to one lifecycle status
    pub status: Option<BookingStatus>,
    /// Restrict to one payment status
    pub payment_status: Option<PaymentStatus>,
    /// Rows to skip
    #[serde(default)]
    pub skip: i64,
    /// Maximum rows returned
    #[serde(default)]
    pub limit: i64,
}

/// Query for the availability endpoint.
#[derive(Debug, Deserialize)]
pub struct AvailableSlotsQuery {
    /// Date to check (`YYYY-MM-DD`)
    pub booking_date: NaiveDate,
}

/// Availability partition response.
#[derive(Debug, Serialize)]
pub struct AvailableSlotsResponse {
    /// Date checked
    pub date: NaiveDate,
    /// Trainer checked
    pub trainer_id: TrainerId,
    /// Slots open for booking
    pub available_slots: Vec<String>,
    /// Slots held by live bookings
    pub booked_slots: Vec<String>,
}

/// Payment intent response for checkout.
#[derive(Debug, Serialize)]
pub struct CreatePaymentResponse {
    /// Booking being paid
    pub booking_id: Uuid,
    /// Gateway order to pay against
    pub gateway_order_id: String,
    /// Amount due
    pub amount: Money,
    /// Currency charged
    pub currency: String,
    /// Public gateway key for the client checkout widget
    pub gateway_key_id: String,
}

/// Form fields posted back after checkout.
#[derive(Debug, Deserialize)]
pub struct VerifyPaymentForm {
    /// Gateway order id
    pub gateway_order_id: String,
    /// Gateway payment id
    pub gateway_payment_id: String,
    /// Gateway-issued signature over order|payment
    pub signature: String,
}

/// Verification acknowledgement.
#[derive(Debug, Serialize)]
pub struct VerifyPaymentResponse {
    /// Whether the payment is settled
    pub success: bool,
    /// Human-readable outcome
    pub message: String,
}

/// Create a booking.
pub async fn create_booking(
    session: SessionUser,
    State(state): State<AppState>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let booking = state
        .engine
        .create_booking(&session.caller(), request)
        .await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// List all bookings (admin).
pub async fn list_bookings(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<BookingListQuery>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let bookings = state
        .stores()
        .bookings
        .list(&BookingFilter {
            status: query.status,
            payment_status: query.payment_status,
            skip: query.skip,
            limit: query.limit,
        })
        .await?;
    Ok(Json(bookings))
}

/// List the caller's bookings.
pub async fn my_bookings(
    session: SessionUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let bookings = state
        .stores()
        .bookings
        .list_for_user(&session.user_id)
        .await?;
    Ok(Json(bookings))
}

/// Fetch one booking (owner or admin).
pub async fn get_booking(
    session: SessionUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Booking>, AppError> {
    let booking = state
        .engine
        .booking_for(&session.caller(), &BookingId::from_uuid(id))
        .await?;
    Ok(Json(booking))
}

/// Availability partition for a trainer on a date.
pub async fn available_slots(
    State(state): State<AppState>,
    Path(trainer_id): Path<Uuid>,
    Query(query): Query<AvailableSlotsQuery>,
) -> Result<Json<AvailableSlotsResponse>, AppError> {
    let trainer_id = TrainerId::from_uuid(trainer_id);
    let partition = state
        .engine
        .list_available_slots(&trainer_id, query.booking_date)
        .await?;
    Ok(Json(AvailableSlotsResponse {
        date: query.booking_date,
        trainer_id,
        available_slots: partition.available,
        booked_slots: partition.booked,
    }))
}

/// Open a payment intent for a booking.
pub async fn create_payment(
    session: SessionUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CreatePaymentResponse>, AppError> {
    let intent = state
        .engine
        .create_booking_payment(&session.caller(), &BookingId::from_uuid(id))
        .await
        .map_err(|err| match err {
            Error::AlreadyProcessed => AppError::bad_request("Booking is already paid"),
            other => other.into(),
        })?;
    Ok(Json(CreatePaymentResponse {
        booking_id: intent.local_id,
        gateway_order_id: intent.gateway_order_id,
        amount: intent.amount,
        currency: intent.currency,
        gateway_key_id: intent.gateway_key_id,
    }))
}

/// Verify a booking payment.
///
/// Replayed verifications acknowledge success without repeating side
/// effects.
pub async fn verify_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Form(form): Form<VerifyPaymentForm>,
) -> Result<Json<VerifyPaymentResponse>, AppError> {
    // The gateway order must belong to the booking named in the path.
    let booking_id = BookingId::from_uuid(id);
    let booking = state
        .stores()
        .bookings
        .get(&booking_id)
        .await?
        .ok_or_else(|| AppError::not_found("Booking", booking_id))?;
    if booking.gateway_order_id.as_deref() != Some(form.gateway_order_id.as_str()) {
        return Err(AppError::bad_request(
            "Gateway order does not belong to this booking",
        ));
    }

    let outcome = state
        .engine
        .verify_booking_payment(&form.gateway_order_id, &form.gateway_payment_id, &form.signature)
        .await?;
    Ok(Json(match outcome {
        VerifyOutcome::Settled => VerifyPaymentResponse {
            success: true,
            message: "Payment verified successfully".to_string(),
        },
        VerifyOutcome::AlreadyProcessed => VerifyPaymentResponse {
            success: true,
            message: "Payment was already processed".to_string(),
        },
    }))
}

/// Apply a tagged admin update.
pub async fn update_status(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<BookingUpdate>,
) -> Result<Json<Booking>, AppError> {
    let booking = state
        .engine
        .update_booking(&BookingId::from_uuid(id), update)
        .await?;
    Ok(Json(booking))
}

/// Export every booking as CSV.
pub async fn export_csv(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let bookings = state
        .stores()
        .bookings
        .list(&BookingFilter {
            limit: i64::MAX,
            ..BookingFilter::default()
        })
        .await?;
    let body = export::bookings_csv(&bookings)?;
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=bookings.csv",
            ),
        ],
        body,
    )
        .into_response())
}
