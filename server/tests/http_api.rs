//! Router-level tests: auth gating, the booking/payment flow over HTTP,
//! and CSV export.

#![allow(clippy::unwrap_used)]

mod common;

use axum::http::{HeaderName, HeaderValue, header};
use axum_test::TestServer;
use common::TestHarness;
use fitsphere_server::server::build_router;
use fitsphere_server::types::Role;
use serde_json::{Value, json};

fn bearer(token: &str) -> (HeaderName, HeaderValue) {
    (
        header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
    )
}

async fn login(server: &TestServer, path: &str, email: &str) -> String {
    let response = server
        .post(path)
        .json(&json!({"email": email, "password": "password123"}))
        .await;
    response.assert_status_ok();
    response.json::<Value>()["access_token"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn health_endpoint_is_public() {
    let h = TestHarness::new();
    let server = TestServer::new(build_router(h.app_state())).unwrap();
    let response = server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "healthy");
}

#[tokio::test]
async fn booking_requires_authentication() {
    let h = TestHarness::new();
    let server = TestServer::new(build_router(h.app_state())).unwrap();
    let response = server.post("/api/bookings").json(&json!({})).await;
    response.assert_status_unauthorized();
}

#[tokio::test]
async fn admin_endpoints_reject_customers() {
    let h = TestHarness::new();
    h.seed_user("sarah@example.com", Role::User).await;
    let server = TestServer::new(build_router(h.app_state())).unwrap();
    let token = login(&server, "/api/auth/user-login", "sarah@example.com").await;

    let (name, value) = bearer(&token);
    let response = server
        .get("/api/bookings/export/csv")
        .add_header(name, value)
        .await;
    response.assert_status_forbidden();
}

#[tokio::test]
async fn full_booking_payment_flow_over_http() {
    let h = TestHarness::new();
    h.seed_user("sarah@example.com", Role::User).await;
    h.seed_user("admin@fitsphere.com", Role::Admin).await;
    let trainer = h.seed_trainer().await;
    let program = h.seed_program(trainer.id).await;
    h.seed_venue().await;

    let server = TestServer::new(build_router(h.app_state())).unwrap();
    let user_token = login(&server, "/api/auth/user-login", "sarah@example.com").await;

    // Reserve a slot.
    let (name, value) = bearer(&user_token);
    let response = server
        .post("/api/bookings")
        .add_header(name, value)
        .json(&json!({
            "program_id": program.id,
            "trainer_id": trainer.id,
            "booking_date": "2026-03-01",
            "time_slot": "09:00-10:00",
            "attendance_mode": "gym",
            "notes": "First session"
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let booking = response.json::<Value>();
    assert_eq!(booking["status"], "pending");
    assert_eq!(booking["amount"], 3499.0);
    let booking_id = booking["id"].as_str().unwrap().to_string();

    // The slot is now listed as booked.
    let response = server
        .get(&format!(
            "/api/bookings/trainer/{}/available-slots",
            trainer.id
        ))
        .add_query_param("booking_date", "2026-03-01")
        .await;
    response.assert_status_ok();
    let partition = response.json::<Value>();
    assert!(
        partition["booked_slots"]
            .as_array()
            .unwrap()
            .iter()
            .any(|s| s == "09:00-10:00")
    );

    // A second reservation for the same slot conflicts.
    let (name, value) = bearer(&user_token);
    let response = server
        .post("/api/bookings")
        .add_header(name, value)
        .json(&json!({
            "program_id": program.id,
            "trainer_id": trainer.id,
            "booking_date": "2026-03-01",
            "time_slot": "09:00-10:00",
            "attendance_mode": "gym"
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CONFLICT);

    // Open the payment intent.
    let (name, value) = bearer(&user_token);
    let response = server
        .post(&format!("/api/bookings/{booking_id}/create-payment"))
        .add_header(name, value)
        .await;
    response.assert_status_ok();
    let intent = response.json::<Value>();
    let gateway_order_id = intent["gateway_order_id"].as_str().unwrap().to_string();
    assert_eq!(intent["currency"], "INR");
    assert_eq!(intent["amount"], 3499.0);

    // Settle with a valid signature.
    let signature = h.verifier.sign(&gateway_order_id, "pay_http");
    let response = server
        .post(&format!("/api/bookings/{booking_id}/verify-payment"))
        .form(&json!({
            "gateway_order_id": gateway_order_id,
            "gateway_payment_id": "pay_http",
            "signature": signature,
        }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["success"], true);

    // The booking is now confirmed.
    let (name, value) = bearer(&user_token);
    let response = server
        .get(&format!("/api/bookings/{booking_id}"))
        .add_header(name, value)
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "confirmed");

    // A tampered signature is rejected even after settlement: the
    // signature check runs before the idempotency guard.
    let response = server
        .post(&format!("/api/bookings/{booking_id}/verify-payment"))
        .form(&json!({
            "gateway_order_id": gateway_order_id,
            "gateway_payment_id": "pay_http",
            "signature": "00000000000000000000000000000000",
        }))
        .await;
    response.assert_status_bad_request();

    // Replaying the original valid signature acknowledges without
    // repeating side effects.
    let response = server
        .post(&format!("/api/bookings/{booking_id}/verify-payment"))
        .form(&json!({
            "gateway_order_id": gateway_order_id,
            "gateway_payment_id": "pay_http",
            "signature": signature,
        }))
        .await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>()["message"],
        "Payment was already processed"
    );

    // Admin export includes the settled booking.
    let admin_token = login(&server, "/api/auth/login", "admin@fitsphere.com").await;
    let (name, value) = bearer(&admin_token);
    let response = server
        .get("/api/bookings/export/csv")
        .add_header(name, value)
        .await;
    response.assert_status_ok();
    let csv = response.text();
    assert!(csv.lines().next().unwrap().starts_with("Booking ID,"));
    assert!(csv.contains("Sarah Johnson"));
}

#[tokio::test]
async fn invalid_signature_is_rejected_over_http() {
    let h = TestHarness::new();
    h.seed_user("sarah@example.com", Role::User).await;
    let trainer = h.seed_trainer().await;
    let program = h.seed_program(trainer.id).await;

    let server = TestServer::new(build_router(h.app_state())).unwrap();
    let token = login(&server, "/api/auth/user-login", "sarah@example.com").await;

    let (name, value) = bearer(&token);
    let response = server
        .post("/api/bookings")
        .add_header(name, value)
        .json(&json!({
            "program_id": program.id,
            "trainer_id": trainer.id,
            "booking_date": "2026-03-02",
            "time_slot": "10:00-11:00",
            "attendance_mode": "gym"
        }))
        .await;
    let booking_id = response.json::<Value>()["id"].as_str().unwrap().to_string();

    let (name, value) = bearer(&token);
    let response = server
        .post(&format!("/api/bookings/{booking_id}/create-payment"))
        .add_header(name, value)
        .await;
    let gateway_order_id = response.json::<Value>()["gateway_order_id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = server
        .post(&format!("/api/bookings/{booking_id}/verify-payment"))
        .form(&json!({
            "gateway_order_id": gateway_order_id,
            "gateway_payment_id": "pay_bad",
            "signature": "deadbeefdeadbeefdeadbeefdeadbeef",
        }))
        .await;
    response.assert_status_bad_request();
    assert_eq!(response.json::<Value>()["code"], "INVALID_SIGNATURE");
}

#[tokio::test]
async fn registration_then_me_roundtrip() {
    let h = TestHarness::new();
    let server = TestServer::new(build_router(h.app_state())).unwrap();

    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "email": "new@example.com",
            "password": "password123",
            "name": "New Member",
            "phone": "+91 90000 00000"
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let token = response.json::<Value>()["access_token"]
        .as_str()
        .unwrap()
        .to_string();

    let (name, value) = bearer(&token);
    let response = server.get("/api/auth/me").add_header(name, value).await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["email"], "new@example.com");
    // The password hash never leaves the server.
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let h = TestHarness::new();
    let server = TestServer::new(build_router(h.app_state())).unwrap();

    let body = json!({
        "email": "dup@example.com",
        "password": "password123",
        "name": "Dup"
    });
    server.post("/api/auth/register").json(&body).await.assert_status(axum::http::StatusCode::CREATED);
    let response = server.post("/api/auth/register").json(&body).await;
    response.assert_status(axum::http::StatusCode::CONFLICT);
}
