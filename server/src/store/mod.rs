//! Persistence traits and backends.
//!
//! Each area of the document store is behind an object-safe async trait so
//! the engine and handlers stay storage-agnostic. Two backends implement
//! every trait: `postgres` (production) and `memory` (tests and local dev).
//!
//! Two invariants are enforced *here*, not in callers:
//!
//! - a live booking is unique per (trainer, date, slot) — the insert itself
//!   fails with `Conflict`, there is no check-then-insert window;
//! - counter mutations (stock, enrollment, sessions) are single atomic
//!   updates, never read-modify-write.

pub mod memory;
pub mod postgres;

use crate::error::Result;
use crate::slots::SlotLabel;
use crate::types::{
    Booking, BookingId, BookingStatus, ChatMessage, Image, ImageKind, Notification, Order,
    OrderId, OrderStatus, PaymentRecord, PaymentStatus, Product, ProductId, Program, ProgramId,
    Trainer, TrainerId, UserAccount, UserId, VenueSettings, Video,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use uuid::Uuid;

/// Pagination and status filters for booking listings.
#[derive(Debug, Clone, Default)]
pub struct BookingFilter {
    /// Restrict to one lifecycle status
    pub status: Option<BookingStatus>,
    /// Restrict to one payment status
    pub payment_status: Option<PaymentStatus>,
    /// Rows to skip
    pub skip: i64,
    /// Maximum rows returned (0 means the default page size)
    pub limit: i64,
}

/// Pagination and status filters for order listings.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    /// Restrict to one fulfilment status
    pub status: Option<OrderStatus>,
    /// Restrict to one payment status
    pub payment_status: Option<PaymentStatus>,
    /// Rows to skip
    pub skip: i64,
    /// Maximum rows returned (0 means the default page size)
    pub limit: i64,
}

/// Category/search filters shared by catalog and media listings.
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    /// Restrict to one category label
    pub category: Option<String>,
    /// Case-insensitive name/title substring
    pub search: Option<String>,
    /// Rows to skip
    pub skip: i64,
    /// Maximum rows returned (0 means the default page size)
    pub limit: i64,
}

/// The booking ledger: single source of truth for slot occupancy.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Inserts a new booking.
    ///
    /// # Errors
    ///
    /// `Conflict` when a live booking already holds the same
    /// (trainer, date, slot); storage failures as `Upstream`.
    async fn insert(&self, booking: &Booking) -> Result<()>;

    /// Fetches a booking by id.
    async fn get(&self, id: &BookingId) -> Result<Option<Booking>>;

    /// Fetches the booking linked to a gateway order id.
    async fn get_by_gateway_order(&self, gateway_order_id: &str) -> Result<Option<Booking>>;

    /// Slot labels held by live (`pending`/`confirmed`) bookings for a
    /// trainer on a date.
    async fn live_slots(&self, trainer_id: &TrainerId, date: NaiveDate) -> Result<Vec<SlotLabel>>;

    /// Lists bookings newest-first with optional filters.
    async fn list(&self, filter: &BookingFilter) -> Result<Vec<Booking>>;

    /// Lists one customer's bookings newest-first.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Booking>>;

    /// Rewrites a booking's mutable fields.
    ///
    /// # Errors
    ///
    /// `Conflict` when a reschedule collides with a live booking;
    /// `NotFound` when the row is gone.
    async fn update(&self, booking: &Booking) -> Result<()>;
}

/// The retail order ledger.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Inserts a new order.
    async fn insert(&self, order: &Order) -> Result<()>;

    /// Fetches an order by id.
    async fn get(&self, id: &OrderId) -> Result<Option<Order>>;

    /// Fetches the order linked to a gateway order id.
    async fn get_by_gateway_order(&self, gateway_order_id: &str) -> Result<Option<Order>>;

    /// Lists orders newest-first with optional filters.
    async fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>>;

    /// Lists one customer's orders newest-first.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Order>>;

    /// Rewrites an order's mutable fields.
    async fn update(&self, order: &Order) -> Result<()>;
}

/// Immutable payment audit log.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// Appends an audit row.
    ///
    /// # Errors
    ///
    /// `AlreadyProcessed` when a row for the same gateway order id exists;
    /// rows are never updated.
    async fn insert(&self, payment: &PaymentRecord) -> Result<()>;

    /// Fetches the audit row for a gateway order id.
    async fn get_by_gateway_order(&self, gateway_order_id: &str) -> Result<Option<PaymentRecord>>;

    /// All audit rows, newest-first.
    async fn list(&self) -> Result<Vec<PaymentRecord>>;
}

/// Catalog reference data: products, programs, trainers, venue settings.
///
/// The counter methods are the only way stock/enrollment/session numbers
/// change after creation; each is one atomic storage-level update.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Inserts a product.
    async fn insert_product(&self, product: &Product) -> Result<()>;
    /// Fetches a product by id.
    async fn product(&self, id: &ProductId) -> Result<Option<Product>>;
    /// Lists products with optional filters.
    async fn list_products(&self, filter: &ListFilter) -> Result<Vec<Product>>;
    /// Rewrites a product.
    async fn update_product(&self, product: &Product) -> Result<()>;
    /// Deletes a product; returns whether a row was removed.
    async fn delete_product(&self, id: &ProductId) -> Result<bool>;
    /// Atomically decrements stock by `quantity`; returns the new stock
    /// level.
    async fn decrement_stock(&self, id: &ProductId, quantity: u32) -> Result<i64>;

    /// Inserts a program.
    async fn insert_program(&self, program: &Program) -> Result<()>;
    /// Fetches a program by id.
    async fn program(&self, id: &ProgramId) -> Result<Option<Program>>;
    /// Lists programs with optional filters.
    async fn list_programs(&self, filter: &ListFilter) -> Result<Vec<Program>>;
    /// Rewrites a program.
    async fn update_program(&self, program: &Program) -> Result<()>;
    /// Deletes a program; returns whether a row was removed.
    async fn delete_program(&self, id: &ProgramId) -> Result<bool>;
    /// Atomically increments a program's enrollment counter.
    async fn increment_enrollment(&self, id: &ProgramId) -> Result<()>;

    /// Inserts a trainer.
    async fn insert_trainer(&self, trainer: &Trainer) -> Result<()>;
    /// Fetches a trainer by id.
    async fn trainer(&self, id: &TrainerId) -> Result<Option<Trainer>>;
    /// Lists trainers.
    async fn list_trainers(&self, filter: &ListFilter) -> Result<Vec<Trainer>>;
    /// Rewrites a trainer.
    async fn update_trainer(&self, trainer: &Trainer) -> Result<()>;
    /// Deletes a trainer; returns whether a row was removed.
    async fn delete_trainer(&self, id: &TrainerId) -> Result<bool>;
    /// Atomically increments a trainer's delivered-session counter.
    async fn increment_sessions(&self, id: &TrainerId) -> Result<()>;

    /// Fetches the singleton venue settings, if configured.
    async fn venue_settings(&self) -> Result<Option<VenueSettings>>;
    /// Replaces the singleton venue settings.
    async fn set_venue_settings(&self, settings: &VenueSettings) -> Result<()>;
}

/// Registered accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts an account.
    ///
    /// # Errors
    ///
    /// `Conflict` when the email is taken.
    async fn insert(&self, user: &UserAccount) -> Result<()>;
    /// Fetches an account by id.
    async fn get(&self, id: &UserId) -> Result<Option<UserAccount>>;
    /// Fetches an account by login email.
    async fn get_by_email(&self, email: &str) -> Result<Option<UserAccount>>;
    /// Lists accounts, newest-first.
    async fn list(&self, skip: i64, limit: i64) -> Result<Vec<UserAccount>>;
    /// Stamps a successful login.
    async fn touch_last_login(&self, id: &UserId) -> Result<()>;
    /// Number of administrator accounts; used by the startup bootstrap.
    async fn count_admins(&self) -> Result<u64>;
    /// Total number of accounts.
    async fn count(&self) -> Result<u64>;
}

/// CDN-backed media metadata (videos and images).
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Inserts a video row.
    async fn insert_video(&self, video: &Video) -> Result<()>;
    /// Fetches a video by id.
    async fn video(&self, id: &Uuid) -> Result<Option<Video>>;
    /// Lists videos with optional filters.
    async fn list_videos(&self, filter: &ListFilter, difficulty: Option<&str>)
    -> Result<Vec<Video>>;
    /// Rewrites a video row.
    async fn update_video(&self, video: &Video) -> Result<()>;
    /// Deletes a video row; returns whether a row was removed.
    async fn delete_video(&self, id: &Uuid) -> Result<bool>;

    /// Inserts an image row.
    async fn insert_image(&self, image: &Image) -> Result<()>;
    /// Fetches an image by id.
    async fn image(&self, id: &Uuid) -> Result<Option<Image>>;
    /// Lists images, optionally restricted to one kind.
    async fn list_images(&self, kind: Option<ImageKind>, skip: i64, limit: i64)
    -> Result<Vec<Image>>;
    /// Deletes an image row; returns whether a row was removed.
    async fn delete_image(&self, id: &Uuid) -> Result<bool>;
}

/// Admin notification log.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Appends a notification.
    async fn insert(&self, notification: &Notification) -> Result<()>;
    /// Lists notifications newest-first.
    async fn list(&self, unread_only: bool, skip: i64, limit: i64) -> Result<Vec<Notification>>;
    /// Marks one notification read; returns whether a row matched.
    async fn mark_read(&self, id: &Uuid) -> Result<bool>;
}

/// Persisted chat log.
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// Appends a message.
    async fn insert(&self, message: &ChatMessage) -> Result<()>;
    /// Messages sent or received by one user, oldest-first.
    async fn list_for_user(&self, user_id: &UserId, skip: i64, limit: i64)
    -> Result<Vec<ChatMessage>>;
    /// All messages (admin view), optionally narrowed to one participant,
    /// oldest-first.
    async fn list_all(
        &self,
        participant: Option<&UserId>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<ChatMessage>>;
    /// Marks one message read; returns whether a row matched.
    async fn mark_read(&self, id: &Uuid) -> Result<bool>;
}

/// Bundle of store handles shared through application state.
#[derive(Clone)]
pub struct Stores {
    /// Booking ledger
    pub bookings: Arc<dyn BookingStore>,
    /// Order ledger
    pub orders: Arc<dyn OrderStore>,
    /// Payment audit log
    pub payments: Arc<dyn PaymentStore>,
    /// Catalog reference data
    pub catalog: Arc<dyn CatalogStore>,
    /// Accounts
    pub users: Arc<dyn UserStore>,
    /// Media metadata
    pub media: Arc<dyn MediaStore>,
    /// Notification log
    pub notifications: Arc<dyn NotificationStore>,
    /// Chat log
    pub chat: Arc<dyn ChatStore>,
}

impl Stores {
    /// Wires every store to the Postgres pool.
    #[must_use]
    pub fn postgres(pool: sqlx::PgPool) -> Self {
        let pool = Arc::new(pool);
        Self {
            bookings: Arc::new(postgres::PostgresBookingStore::new(Arc::clone(&pool))),
            orders: Arc::new(postgres::PostgresOrderStore::new(Arc::clone(&pool))),
            payments: Arc::new(postgres::PostgresPaymentStore::new(Arc::clone(&pool))),
            catalog: Arc::new(postgres::PostgresCatalogStore::new(Arc::clone(&pool))),
            users: Arc::new(postgres::PostgresUserStore::new(Arc::clone(&pool))),
            media: Arc::new(postgres::PostgresMediaStore::new(Arc::clone(&pool))),
            notifications: Arc::new(postgres::PostgresNotificationStore::new(Arc::clone(&pool))),
            chat: Arc::new(postgres::PostgresChatStore::new(Arc::clone(&pool))),
        }
    }

    /// Wires every store to a fresh in-memory backend (tests, local dev).
    #[must_use]
    pub fn memory() -> Self {
        Self {
            bookings: Arc::new(memory::MemoryBookingStore::default()),
            orders: Arc::new(memory::MemoryOrderStore::default()),
            payments: Arc::new(memory::MemoryPaymentStore::default()),
            catalog: Arc::new(memory::MemoryCatalogStore::default()),
            users: Arc::new(memory::MemoryUserStore::default()),
            media: Arc::new(memory::MemoryMediaStore::default()),
            notifications: Arc::new(memory::MemoryNotificationStore::default()),
            chat: Arc::new(memory::MemoryChatStore::default()),
        }
    }
}

/// Default page size when a listing request does not set a limit.
pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// Normalizes a caller-supplied limit to a positive page size.
#[must_use]
pub const fn effective_limit(limit: i64) -> i64 {
    if limit <= 0 { DEFAULT_PAGE_SIZE } else { limit }
}
