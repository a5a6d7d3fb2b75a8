//! Shared fixtures: an engine wired to in-memory stores and the mock
//! gateway, plus seeded catalog records.

#![allow(dead_code, clippy::unwrap_used)]

use chrono::Utc;
use fitsphere_server::auth::{self, TokenService};
use fitsphere_server::cdn::MockStorage;
use fitsphere_server::engine::{Caller, Engine};
use fitsphere_server::gateway::{MockPaymentGateway, SignatureVerifier};
use fitsphere_server::relay::Relay;
use fitsphere_server::server::AppState;
use fitsphere_server::store::{CatalogStore as _, Stores, UserStore as _};
use fitsphere_server::types::{
    Difficulty, GeoLocation, Money, Product, ProductId, Program, ProgramId, Role, Trainer,
    TrainerId, UserAccount, UserId, VenueSettings,
};
use std::sync::Arc;

pub const TEST_SECRET: &str = "test_gateway_secret";
pub const TEST_JWT_SECRET: &str = "test_jwt_secret";

/// Engine + collaborators over fresh in-memory stores.
pub struct TestHarness {
    pub engine: Engine,
    pub stores: Stores,
    pub verifier: SignatureVerifier,
}

impl TestHarness {
    pub fn new() -> Self {
        let stores = Stores::memory();
        let verifier = SignatureVerifier::new(TEST_SECRET);
        let engine = Engine::new(
            stores.clone(),
            MockPaymentGateway::shared(),
            verifier.clone(),
            Relay::new(),
            "INR",
            "rzp_test_key",
        );
        Self {
            engine,
            stores,
            verifier,
        }
    }

    /// Full application state for router-level tests.
    pub fn app_state(&self) -> AppState {
        AppState::new(
            self.engine.clone(),
            TokenService::new(TEST_JWT_SECRET, 24),
            Arc::new(MockStorage::new()),
        )
    }

    pub async fn seed_user(&self, email: &str, role: Role) -> UserAccount {
        let user = UserAccount {
            id: UserId::new(),
            email: email.to_string(),
            name: "Sarah Johnson".to_string(),
            phone: Some("+91 98765 43210".to_string()),
            password_hash: auth::hash_password("password123").unwrap(),
            role,
            is_active: true,
            created_at: Utc::now(),
            last_login: None,
        };
        self.stores.users.insert(&user).await.unwrap();
        user
    }

    pub async fn seed_trainer(&self) -> Trainer {
        let now = Utc::now();
        let trainer = Trainer {
            id: TrainerId::new(),
            name: "Priya Sharma".to_string(),
            email: "priya@fitsphere.com".to_string(),
            phone: None,
            specialization: "Yoga & Flexibility".to_string(),
            experience_years: 8,
            bio: "Certified yoga instructor.".to_string(),
            certifications: vec!["RYT-500".to_string()],
            total_sessions: 0,
            photo_url: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.stores.catalog.insert_trainer(&trainer).await.unwrap();
        trainer
    }

    /// Program priced 3499.00 with a 500.00 home-visit surcharge.
    pub async fn seed_program(&self, trainer_id: TrainerId) -> Program {
        let now = Utc::now();
        let program = Program {
            id: ProgramId::new(),
            title: "Fat Burn HIIT Challenge".to_string(),
            description: "High-intensity interval training.".to_string(),
            category: "Cardio".to_string(),
            duration_weeks: 6,
            price: Money::from_rupees(3499.00),
            difficulty: Difficulty::Intermediate,
            trainer_id,
            sessions_per_week: 4,
            enrolled_count: 0,
            supports_gym_attendance: true,
            supports_home_visit: true,
            home_visit_surcharge: Money::from_rupees(500.00),
            created_at: now,
            updated_at: now,
        };
        self.stores.catalog.insert_program(&program).await.unwrap();
        program
    }

    /// Gym-only program (no home visits).
    pub async fn seed_gym_only_program(&self, trainer_id: TrainerId) -> Program {
        let mut program = self.seed_program(trainer_id).await;
        program.supports_home_visit = false;
        program.home_visit_surcharge = Money::ZERO;
        self.stores.catalog.update_program(&program).await.unwrap();
        program
    }

    pub async fn seed_product(&self, stock: i64) -> Product {
        let now = Utc::now();
        let product = Product {
            id: ProductId::new(),
            name: "Yoga Mat - Premium".to_string(),
            description: "Non-slip yoga mat.".to_string(),
            price: Money::from_rupees(1499.00),
            discount: 0.0,
            stock,
            category: "Equipment".to_string(),
            sku: "FS-MAT-001".to_string(),
            image_urls: vec![],
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.stores.catalog.insert_product(&product).await.unwrap();
        product
    }

    pub async fn seed_venue(&self) {
        self.stores
            .catalog
            .set_venue_settings(&VenueSettings {
                name: "FitSphere Studio".to_string(),
                location: GeoLocation {
                    address: "12 MG Road, Bengaluru".to_string(),
                    latitude: 12.9716,
                    longitude: 77.5946,
                },
            })
            .await
            .unwrap();
    }
}

pub fn caller(user: &UserAccount) -> Caller {
    Caller {
        user_id: user.id,
        role: user.role,
    }
}

pub fn home_location() -> GeoLocation {
    GeoLocation {
        address: "4 Residency Road, Bengaluru".to_string(),
        latitude: 12.9698,
        longitude: 77.6004,
    }
}
