//! Router configuration.
//!
//! Builds the complete Axum router with all endpoints under `/api`, the
//! WebSocket at `/ws`, and the health check at `/health`.

use super::health::health_check;
use super::state::AppState;
use crate::api::{
    analytics, auth, bookings, chat, images, notifications, orders, products, programs, settings,
    trainers, users, videos,
};
use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the complete Axum router.
#[must_use]
#[allow(clippy::too_many_lines)] // Route table is naturally long but flat
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Authentication
        .route("/auth/login", post(auth::admin_login))
        .route("/auth/user-login", post(auth::user_login))
        .route("/auth/register", post(auth::register))
        .route("/auth/me", get(auth::me))
        // Bookings (specific paths before the `:id` catch-all)
        .route("/bookings", post(bookings::create_booking))
        .route("/bookings", get(bookings::list_bookings))
        .route("/bookings/user/my-bookings", get(bookings::my_bookings))
        .route(
            "/bookings/trainer/:trainer_id/available-slots",
            get(bookings::available_slots),
        )
        .route("/bookings/export/csv", get(bookings::export_csv))
        .route("/bookings/:id", get(bookings::get_booking))
        .route("/bookings/:id/create-payment", post(bookings::create_payment))
        .route("/bookings/:id/verify-payment", post(bookings::verify_payment))
        .route("/bookings/:id/status", put(bookings::update_status))
        // Orders
        .route("/orders/create-payment-order", post(orders::create_order))
        .route("/orders/verify-payment", post(orders::verify_payment))
        .route("/orders", get(orders::list_orders))
        .route("/orders/user/my-orders", get(orders::my_orders))
        .route("/orders/export/csv", get(orders::export_csv))
        .route("/orders/:id", get(orders::get_order))
        .route("/orders/:id/status", put(orders::update_status))
        // Products
        .route("/products", post(products::create_product))
        .route("/products", get(products::list_products))
        .route("/products/:id", get(products::get_product))
        .route("/products/:id", put(products::update_product))
        .route("/products/:id", delete(products::delete_product))
        // Programs
        .route("/programs", post(programs::create_program))
        .route("/programs", get(programs::list_programs))
        .route("/programs/:id", get(programs::get_program))
        .route("/programs/:id", put(programs::update_program))
        .route("/programs/:id", delete(programs::delete_program))
        // Trainers
        .route("/trainers", post(trainers::create_trainer))
        .route("/trainers", get(trainers::list_trainers))
        .route("/trainers/:id", get(trainers::get_trainer))
        .route("/trainers/:id", put(trainers::update_trainer))
        .route("/trainers/:id", delete(trainers::delete_trainer))
        // Media
        .route("/videos/upload", post(videos::upload_video))
        .route("/videos", get(videos::list_videos))
        .route("/videos/:id", get(videos::get_video))
        .route("/videos/:id", put(videos::update_video))
        .route("/videos/:id", delete(videos::delete_video))
        .route("/images/upload", post(images::upload_image))
        .route("/images", get(images::list_images))
        .route("/images/:id", delete(images::delete_image))
        // Notifications
        .route("/notifications", get(notifications::list_notifications))
        .route("/notifications/:id/read", put(notifications::mark_read))
        // Chat
        .route("/chat/messages", get(chat::get_messages))
        .route("/chat/admin/messages", get(chat::admin_messages))
        .route("/chat/messages/:id/read", put(chat::mark_read))
        // Users
        .route("/users", get(users::list_users))
        .route("/users/:id", get(users::get_user))
        // Analytics
        .route("/analytics/dashboard", get(analytics::dashboard))
        // Venue settings
        .route("/settings/venue", get(settings::get_venue))
        .route("/settings/venue", put(settings::set_venue));

    Router::new()
        .route("/health", get(health_check))
        .route("/ws", get(chat::ws_handler))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
