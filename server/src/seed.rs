//! Startup bootstrap and demo-catalog seeding.

use crate::auth;
use crate::config::AuthConfig;
use crate::error::Result;
use crate::store::{CatalogStore as _, Stores, UserStore as _};
use crate::types::{
    Difficulty, GeoLocation, Money, Product, ProductId, Program, ProgramId, Role, Trainer,
    TrainerId, UserAccount, UserId, VenueSettings,
};
use chrono::Utc;

/// Creates the default administrator account when none exists.
///
/// # Errors
///
/// Propagates storage and hashing failures.
pub async fn ensure_default_admin(stores: &Stores, auth_config: &AuthConfig) -> Result<()> {
    if stores.users.count_admins().await? > 0 {
        return Ok(());
    }

    tracing::info!(
        email = %auth_config.default_admin_email,
        "No admin account found; creating default admin"
    );
    let admin = UserAccount {
        id: UserId::new(),
        email: auth_config.default_admin_email.clone(),
        name: "Admin".to_string(),
        phone: None,
        password_hash: auth::hash_password(&auth_config.default_admin_password)?,
        role: Role::Admin,
        is_active: true,
        created_at: Utc::now(),
        last_login: None,
    };
    stores.users.insert(&admin).await
}

/// Seeds a demo catalog: trainers, programs, products and venue settings.
///
/// Intended for fresh environments; inserting over existing data simply adds
/// more rows.
///
/// # Errors
///
/// Propagates storage failures.
#[allow(clippy::too_many_lines)] // Demo data is naturally long but flat
pub async fn seed_demo_catalog(stores: &Stores) -> Result<()> {
    let now = Utc::now();

    let trainers = vec![
        Trainer {
            id: TrainerId::new(),
            name: "Priya Sharma".to_string(),
            email: "priya@fitsphere.com".to_string(),
            phone: Some("+91 98765 11111".to_string()),
            specialization: "Yoga & Flexibility".to_string(),
            experience_years: 8,
            bio: "Certified yoga instructor specializing in Hatha and Vinyasa yoga."
                .to_string(),
            certifications: vec![
                "RYT-500".to_string(),
                "Prenatal Yoga Certified".to_string(),
            ],
            total_sessions: 0,
            photo_url: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        },
        Trainer {
            id: TrainerId::new(),
            name: "Anjali Reddy".to_string(),
            email: "anjali@fitsphere.com".to_string(),
            phone: Some("+91 98765 22222".to_string()),
            specialization: "Strength Training".to_string(),
            experience_years: 6,
            bio: "Personal trainer focused on women's strength and conditioning.".to_string(),
            certifications: vec![
                "NASM-CPT".to_string(),
                "Women's Fitness Specialist".to_string(),
            ],
            total_sessions: 0,
            photo_url: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        },
        Trainer {
            id: TrainerId::new(),
            name: "Meera Patel".to_string(),
            email: "meera@fitsphere.com".to_string(),
            phone: Some("+91 98765 33333".to_string()),
            specialization: "Cardio & HIIT".to_string(),
            experience_years: 5,
            bio: "High-energy fitness coach specializing in cardio and HIIT workouts."
                .to_string(),
            certifications: vec!["ACE Certified".to_string(), "HIIT Specialist".to_string()],
            total_sessions: 0,
            photo_url: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        },
    ];
    for trainer in &trainers {
        stores.catalog.insert_trainer(trainer).await?;
        tracing::info!(name = %trainer.name, "Seeded trainer");
    }

    let programs = vec![
        Program {
            id: ProgramId::new(),
            title: "Beginner Yoga Journey".to_string(),
            description: "Gentle flows and foundational poses for complete beginners."
                .to_string(),
            category: "Yoga".to_string(),
            duration_weeks: 4,
            price: Money::from_rupees(2999.00),
            difficulty: Difficulty::Beginner,
            trainer_id: trainers[0].id,
            sessions_per_week: 3,
            enrolled_count: 0,
            supports_gym_attendance: true,
            supports_home_visit: true,
            home_visit_surcharge: Money::from_rupees(500.00),
            created_at: now,
            updated_at: now,
        },
        Program {
            id: ProgramId::new(),
            title: "Strength Building Essentials".to_string(),
            description: "Progressive resistance training with proper form and technique."
                .to_string(),
            category: "Strength".to_string(),
            duration_weeks: 8,
            price: Money::from_rupees(4999.00),
            difficulty: Difficulty::Intermediate,
            trainer_id: trainers[1].id,
            sessions_per_week: 4,
            enrolled_count: 0,
            supports_gym_attendance: true,
            supports_home_visit: false,
            home_visit_surcharge: Money::ZERO,
            created_at: now,
            updated_at: now,
        },
        Program {
            id: ProgramId::new(),
            title: "Fat Burn HIIT Challenge".to_string(),
            description: "High-intensity interval training to boost metabolism.".to_string(),
            category: "Cardio".to_string(),
            duration_weeks: 6,
            price: Money::from_rupees(3499.00),
            difficulty: Difficulty::Intermediate,
            trainer_id: trainers[2].id,
            sessions_per_week: 4,
            enrolled_count: 0,
            supports_gym_attendance: true,
            supports_home_visit: true,
            home_visit_surcharge: Money::from_rupees(500.00),
            created_at: now,
            updated_at: now,
        },
    ];
    for program in &programs {
        stores.catalog.insert_program(program).await?;
        tracing::info!(title = %program.title, "Seeded program");
    }

    let products = vec![
        Product {
            id: ProductId::new(),
            name: "Yoga Mat - Premium".to_string(),
            description: "Non-slip yoga mat with extra cushioning.".to_string(),
            price: Money::from_rupees(1499.00),
            discount: 10.0,
            stock: 50,
            category: "Equipment".to_string(),
            sku: "FS-MAT-001".to_string(),
            image_urls: vec![],
            is_active: true,
            created_at: now,
            updated_at: now,
        },
        Product {
            id: ProductId::new(),
            name: "Resistance Bands Set".to_string(),
            description: "Five bands of graded resistance for home workouts.".to_string(),
            price: Money::from_rupees(899.00),
            discount: 0.0,
            stock: 80,
            category: "Equipment".to_string(),
            sku: "FS-BAND-002".to_string(),
            image_urls: vec![],
            is_active: true,
            created_at: now,
            updated_at: now,
        },
        Product {
            id: ProductId::new(),
            name: "Whey Protein - Vanilla".to_string(),
            description: "1kg whey protein isolate.".to_string(),
            price: Money::from_rupees(2499.00),
            discount: 5.0,
            stock: 30,
            category: "Nutrition".to_string(),
            sku: "FS-PROT-003".to_string(),
            image_urls: vec![],
            is_active: true,
            created_at: now,
            updated_at: now,
        },
    ];
    for product in &products {
        stores.catalog.insert_product(product).await?;
        tracing::info!(name = %product.name, "Seeded product");
    }

    stores
        .catalog
        .set_venue_settings(&VenueSettings {
            name: "FitSphere Studio".to_string(),
            location: GeoLocation {
                address: "12 MG Road, Bengaluru".to_string(),
                latitude: 12.9716,
                longitude: 77.5946,
            },
        })
        .await?;
    tracing::info!("Seeded venue settings");

    Ok(())
}
