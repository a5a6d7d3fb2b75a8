//! Dashboard analytics (admin).

use crate::auth::RequireAdmin;
use crate::server::state::AppState;
use crate::store::{
    BookingFilter, BookingStore as _, OrderFilter, OrderStore as _, PaymentStore as _,
    UserStore as _,
};
use crate::types::PaymentStatus;
use axum::{Json, extract::State};
use chrono::Utc;
use fitsphere_web::AppError;
use serde::Serialize;

/// Dashboard summary computed from the ledgers at request time.
#[derive(Debug, Serialize)]
pub struct AnalyticsSummary {
    /// Registered accounts
    pub total_users: u64,
    /// Revenue from settled orders and bookings, in rupees
    pub total_revenue: f64,
    /// Settled orders
    pub total_orders: u64,
    /// Settled bookings
    pub total_bookings: u64,
    /// Orders settled today (UTC)
    pub orders_today: u64,
    /// Share of audit rows among all payment attempts that settled, 0-100
    pub payment_success_rate: f64,
}

/// Compute the dashboard summary.
pub async fn dashboard(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<AnalyticsSummary>, AppError> {
    let stores = state.stores();

    let total_users = stores.users.count().await?;

    let paid_orders = stores
        .orders
        .list(&OrderFilter {
            payment_status: Some(PaymentStatus::Success),
            limit: i64::MAX,
            ..OrderFilter::default()
        })
        .await?;
    let paid_bookings = stores
        .bookings
        .list(&BookingFilter {
            payment_status: Some(PaymentStatus::Success),
            limit: i64::MAX,
            ..BookingFilter::default()
        })
        .await?;

    let order_revenue: f64 = paid_orders.iter().map(|o| o.total_amount.rupees()).sum();
    let booking_revenue: f64 = paid_bookings.iter().map(|b| b.amount.rupees()).sum();

    let today = Utc::now().date_naive();
    let orders_today = paid_orders
        .iter()
        .filter(|o| o.updated_at.date_naive() == today)
        .count() as u64;

    let payments = stores.payments.list().await?;
    let settled = payments
        .iter()
        .filter(|p| p.status == PaymentStatus::Success)
        .count();
    #[allow(clippy::cast_precision_loss)]
    let payment_success_rate = if payments.is_empty() {
        0.0
    } else {
        settled as f64 / payments.len() as f64 * 100.0
    };

    Ok(Json(AnalyticsSummary {
        total_users,
        total_revenue: order_revenue + booking_revenue,
        total_orders: paid_orders.len() as u64,
        total_bookings: paid_bookings.len() as u64,
        orders_today,
        payment_success_rate,
    }))
}
