//! Order endpoints.
//!
//! - `POST /api/orders/create-payment-order` — create order + gateway intent
//! - `POST /api/orders/verify-payment` — settle (form fields)
//! - `GET /api/orders` — all orders (admin)
//! - `GET /api/orders/user/my-orders` — caller's orders
//! - `GET /api/orders/:id` — one order (owner or admin)
//! - `PUT /api/orders/:id/status` — free-form admin status update
//! - `GET /api/orders/export/csv` — streamed CSV (admin)

use crate::auth::{RequireAdmin, SessionUser};
use crate::engine::{OrderDraft, VerifyOutcome};
use crate::export;
use crate::server::state::AppState;
use crate::store::{OrderFilter, OrderStore as _};
use crate::types::{Money, Order, OrderId, OrderStatus, PaymentStatus};
use axum::{
    Form, Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use fitsphere_web::AppError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status filters for the admin listing.
#[derive(Debug, Default, Deserialize)]
pub struct OrderListQuery {
    /// Restrict to one fulfilment status
    pub status: Option<OrderStatus>,
    /// Restrict to one payment status
    pub payment_status: Option<PaymentStatus>,
    /// Rows to skip
    #[serde(default)]
    pub skip: i64,
    /// Maximum rows returned
    #[serde(default)]
    pub limit: i64,
}

/// Response after creating an order with its payment intent.
#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    /// Local order id
    pub order_id: Uuid,
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
pub struct VerifyOrderPaymentForm {
    /// Gateway order id
    pub gateway_order_id: String,
    /// Gateway payment id
    pub gateway_payment_id: String,
    /// Gateway-issued signature over order|payment
    pub signature: String,
}

/// Verification acknowledgement.
#[derive(Debug, Serialize)]
pub struct VerifyOrderResponse {
    /// Whether the payment is settled
    pub success: bool,
    /// Human-readable outcome
    pub message: String,
}

/// Free-form admin status update (deliberately weaker than the booking
/// state machine).
#[derive(Debug, Deserialize)]
pub struct OrderStatusUpdate {
    /// New fulfilment status
    pub order_status: OrderStatus,
}

/// Create an order and open its payment intent.
pub async fn create_order(
    session: SessionUser,
    State(state): State<AppState>,
    Json(draft): Json<OrderDraft>,
) -> Result<(StatusCode, Json<CreateOrderResponse>), AppError> {
    let (order, intent) = state.engine.create_order(&session.caller(), draft).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateOrderResponse {
            order_id: *order.id.as_uuid(),
            gateway_order_id: intent.gateway_order_id,
            amount: intent.amount,
            currency: intent.currency,
            gateway_key_id: intent.gateway_key_id,
        }),
    ))
}

/// Verify an order payment.
pub async fn verify_payment(
    State(state): State<AppState>,
    Form(form): Form<VerifyOrderPaymentForm>,
) -> Result<Json<VerifyOrderResponse>, AppError> {
    let outcome = state
        .engine
        .verify_order_payment(&form.gateway_order_id, &form.gateway_payment_id, &form.signature)
        .await?;
    Ok(Json(match outcome {
        VerifyOutcome::Settled => VerifyOrderResponse {
            success: true,
            message: "Payment verified successfully".to_string(),
        },
        VerifyOutcome::AlreadyProcessed => VerifyOrderResponse {
            success: true,
            message: "Payment was already processed".to_string(),
        },
    }))
}

/// List all orders (admin).
pub async fn list_orders(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<OrderListQuery>,
) -> Result<Json<Vec<Order>>, AppError> {
    let orders = state
        .stores()
        .orders
        .list(&OrderFilter {
            status: query.status,
            payment_status: query.payment_status,
            skip: query.skip,
            limit: query.limit,
        })
        .await?;
    Ok(Json(orders))
}

/// List the caller's orders.
pub async fn my_orders(
    session: SessionUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Order>>, AppError> {
    let orders = state.stores().orders.list_for_user(&session.user_id).await?;
    Ok(Json(orders))
}

/// Fetch one order (owner or admin).
pub async fn get_order(
    session: SessionUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>, AppError> {
    let order_id = OrderId::from_uuid(id);
    let order = state
        .stores()
        .orders
        .get(&order_id)
        .await?
        .ok_or_else(|| AppError::not_found("Order", order_id))?;
    if !session.caller().owns_or_admin(&order.user_id) {
        return Err(AppError::forbidden("You do not have access to this order"));
    }
    Ok(Json(order))
}

/// Set an order's fulfilment status (admin).
pub async fn update_status(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<OrderStatusUpdate>,
) -> Result<Json<Order>, AppError> {
    let order_id = OrderId::from_uuid(id);
    let mut order = state
        .stores()
        .orders
        .get(&order_id)
        .await?
        .ok_or_else(|| AppError::not_found("Order", order_id))?;
    order.order_status = update.order_status;
    order.updated_at = Utc::now();
    state.stores().orders.update(&order).await?;
    Ok(Json(order))
}

/// Export every order as CSV.
pub async fn export_csv(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let orders = state
        .stores()
        .orders
        .list(&OrderFilter {
            limit: i64::MAX,
            ..OrderFilter::default()
        })
        .await?;
    let body = export::orders_csv(&orders)?;
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=orders.csv",
            ),
        ],
        body,
    )
        .into_response())
}
