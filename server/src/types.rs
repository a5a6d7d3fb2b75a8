//! Domain types for the FitSphere platform.
//!
//! Value objects, entities, and status enums for the booking/settlement core
//! and its surrounding catalog. All entities are flat documents keyed by a
//! generated identifier; money is carried in integer paise and exposed to
//! clients as rupees.

use crate::slots::SlotLabel;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for a user account
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a new random `UserId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `UserId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a trainer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrainerId(Uuid);

impl TrainerId {
    /// Creates a new random `TrainerId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `TrainerId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TrainerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TrainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a fitness program
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProgramId(Uuid);

impl ProgramId {
    /// Creates a new random `ProgramId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `ProgramId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ProgramId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a retail product
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(Uuid);

impl ProductId {
    /// Creates a new random `ProductId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `ProductId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ProductId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a booking
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingId(Uuid);

impl BookingId {
    /// Creates a new random `BookingId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `BookingId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for BookingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a retail order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(Uuid);

impl OrderId {
    /// Creates a new random `OrderId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an `OrderId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a payment audit record
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaymentId(Uuid);

impl PaymentId {
    /// Creates a new random `PaymentId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `PaymentId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for PaymentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PaymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Money Value Object (paise-based to avoid floating point errors)
// ============================================================================

/// Represents money in integer paise (minor currency units).
///
/// Amounts enter the system as rupee values and are converted once; all
/// arithmetic happens on integers so a 3499.00 program plus a 500.00
/// home-visit surcharge is exactly 3999.00. Serializes as a rupee float for
/// API compatibility.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(u64);

impl Money {
    /// Zero amount
    pub const ZERO: Self = Self(0);

    /// Creates a `Money` value from paise
    #[must_use]
    pub const fn from_paise(paise: u64) -> Self {
        Self(paise)
    }

    /// Creates a `Money` value from a rupee amount.
    ///
    /// Negative or non-finite inputs clamp to zero; fractional paise are
    /// rounded to the nearest unit.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_rupees(rupees: f64) -> Self {
        if !rupees.is_finite() || rupees <= 0.0 {
            return Self(0);
        }
        Self((rupees * 100.0).round() as u64)
    }

    // serde default hook for surcharge fields.
    fn zero_default() -> Self {
        Self::ZERO
    }

    /// Returns the amount in paise (the unit payment gateways charge in)
    #[must_use]
    pub const fn paise(&self) -> u64 {
        self.0
    }

    /// Returns the amount in rupees
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn rupees(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Checks if the amount is zero
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Adds two money amounts, saturating on overflow
    #[must_use]
    pub const fn add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Multiplies money by a quantity, saturating on overflow
    #[must_use]
    pub const fn multiply(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(quantity as u64))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "₹{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for Money {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.rupees())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rupees = f64::deserialize(deserializer)?;
        Ok(Self::from_rupees(rupees))
    }
}

// ============================================================================
// Status Enums
// ============================================================================

/// Role carried in access tokens
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Platform administrator
    Admin,
    /// Regular customer
    User,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::User => write!(f, "user"),
        }
    }
}

/// Booking lifecycle status.
///
/// `Pending` and `Confirmed` bookings occupy their time slot ("live");
/// `Cancelled` and `Completed` do not. `Confirmed` is reachable only through
/// payment verification, never through the admin status endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Reservation accepted, payment not yet verified
    Pending,
    /// Payment verified
    Confirmed,
    /// Cancelled by an administrator
    Cancelled,
    /// Session held
    Completed,
}

impl BookingStatus {
    /// Whether a booking in this status occupies its slot
    #[must_use]
    pub const fn is_live(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        };
        write!(f, "{s}")
    }
}

/// Retail order status. Admins may set any value (weaker contract than the
/// booking state machine, by product decision).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Created, payment not yet verified
    Pending,
    /// Paid, being prepared
    Processing,
    /// Handed to the courier
    Shipped,
    /// Received by the customer
    Delivered,
    /// Cancelled
    Cancelled,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

/// Payment status on bookings, orders and audit records.
///
/// The only transition the core performs is `Pending` → `Success`; clients
/// can never write this field directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Awaiting verification
    Pending,
    /// Signature verified, funds captured
    Success,
    /// Gateway reported failure
    Failed,
    /// Refunded out of band
    Refunded,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        };
        write!(f, "{s}")
    }
}

/// How a booked session is attended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceMode {
    /// Customer comes to the gym
    Gym,
    /// Trainer visits the customer (surcharge applies)
    HomeVisit,
}

/// Notification categories shown on the admin dashboard
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A retail order was placed
    NewOrder,
    /// A training session was booked
    NewBooking,
    /// A payment verification failed
    FailedPayment,
    /// Product stock dropped below the threshold
    LowStock,
    /// A user registered
    NewUser,
    /// Internal inconsistency requiring attention
    SystemError,
}

/// Workout video category
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoCategory {
    /// Yoga
    Yoga,
    /// Cardio
    Cardio,
    /// Strength
    Strength,
    /// Pilates
    Pilates,
    /// Dance
    Dance,
    /// Meditation
    Meditation,
}

/// Workout difficulty level
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// Beginner
    Beginner,
    /// Intermediate
    Intermediate,
    /// Advanced
    Advanced,
}

/// Gallery image category
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageKind {
    /// Landing page banner
    Banner,
    /// Trainer portrait
    Trainer,
    /// Gallery shot
    Gallery,
    /// Program cover
    Program,
}

// ============================================================================
// Value Objects
// ============================================================================

/// A street address with coordinates.
///
/// Required on home-visit bookings; copied from venue settings on gym
/// bookings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    /// Free-text street address
    pub address: String,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

impl GeoLocation {
    /// Checks that the address is non-empty and the coordinates are on the
    /// globe.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.address.trim().is_empty()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Singleton gym venue record
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VenueSettings {
    /// Venue display name
    pub name: String,
    /// Venue location copied onto gym bookings
    pub location: GeoLocation,
}

// ============================================================================
// Entities
// ============================================================================

/// One reservation of a trainer's time by a customer for a program.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    /// Unique booking identifier
    pub id: BookingId,
    /// Customer who booked
    pub user_id: UserId,
    /// Customer display name (captured at creation)
    pub user_name: String,
    /// Customer email (captured at creation)
    pub user_email: String,
    /// Customer phone, if known
    pub user_phone: Option<String>,
    /// Program being booked
    pub program_id: ProgramId,
    /// Program title (captured at creation)
    pub program_title: String,
    /// Trainer delivering the session
    pub trainer_id: TrainerId,
    /// Trainer name (captured at creation)
    pub trainer_name: String,
    /// Calendar date of the session
    pub booking_date: NaiveDate,
    /// Reserved time slot
    pub time_slot: SlotLabel,
    /// Gym or home visit
    pub attendance_mode: AttendanceMode,
    /// Customer location (home visits only)
    pub user_location: Option<GeoLocation>,
    /// Gym location copied from venue settings (gym attendance only)
    pub gym_location: Option<GeoLocation>,
    /// Price fixed at creation: program price plus any home-visit surcharge
    pub amount: Money,
    /// Lifecycle status
    pub status: BookingStatus,
    /// Payment status
    pub payment_status: PaymentStatus,
    /// Gateway order id once an intent exists
    pub gateway_order_id: Option<String>,
    /// Gateway payment id once verified
    pub gateway_payment_id: Option<String>,
    /// Free-text note from the customer or admin
    pub notes: Option<String>,
    /// Set when a post-payment counter mutation failed and needs manual
    /// replay
    #[serde(default)]
    pub needs_reconciliation: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// A single line of a retail order, with the unit price captured at order
/// time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Product ordered
    pub product_id: ProductId,
    /// Product name at order time
    pub product_name: String,
    /// Quantity ordered
    pub quantity: u32,
    /// Unit price at order time
    pub price: Money,
}

/// A retail purchase of one or more catalog products.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Unique order identifier
    pub id: OrderId,
    /// Customer who ordered
    pub user_id: UserId,
    /// Order lines
    pub items: Vec<OrderItem>,
    /// Total amount fixed at creation
    pub total_amount: Money,
    /// Customer display name
    pub customer_name: String,
    /// Customer email
    pub customer_email: String,
    /// Customer phone
    pub customer_phone: String,
    /// Delivery address
    pub shipping_address: String,
    /// Fulfilment status
    pub order_status: OrderStatus,
    /// Payment status
    pub payment_status: PaymentStatus,
    /// Gateway order id once an intent exists
    pub gateway_order_id: Option<String>,
    /// Gateway payment id once verified
    pub gateway_payment_id: Option<String>,
    /// Set when a post-payment stock mutation failed and needs manual replay
    #[serde(default)]
    pub needs_reconciliation: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Immutable audit record written exactly once per verified payment.
///
/// The existence of a row for a gateway order id is the evidence that
/// verification succeeded; rows are never updated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Unique payment identifier
    pub id: PaymentId,
    /// Local booking or order this payment settles
    pub parent_id: Uuid,
    /// Gateway order id (join key)
    pub gateway_order_id: String,
    /// Gateway payment id
    pub gateway_payment_id: String,
    /// Client-supplied signature that passed verification
    pub signature: String,
    /// Amount settled
    pub amount: Money,
    /// Always `Success` for persisted rows
    pub status: PaymentStatus,
    /// When verification succeeded
    pub created_at: DateTime<Utc>,
}

/// A fitness program customers book sessions for.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// Unique program identifier
    pub id: ProgramId,
    /// Program title
    pub title: String,
    /// Marketing description
    pub description: String,
    /// Category label (Yoga, Strength, ...)
    pub category: String,
    /// Length of the program
    pub duration_weeks: u32,
    /// Price per booking
    pub price: Money,
    /// Difficulty level
    pub difficulty: Difficulty,
    /// Trainer who runs the program
    pub trainer_id: TrainerId,
    /// Sessions per week
    pub sessions_per_week: u32,
    /// Number of paid enrollments; incremented by settlement only
    pub enrolled_count: u64,
    /// Whether the program can be attended at the gym
    #[serde(default = "default_true")]
    pub supports_gym_attendance: bool,
    /// Whether the trainer travels to the customer
    #[serde(default)]
    pub supports_home_visit: bool,
    /// Extra charge applied to home-visit bookings
    #[serde(default = "Money::zero_default")]
    pub home_visit_surcharge: Money,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

/// A trainer on the platform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trainer {
    /// Unique trainer identifier
    pub id: TrainerId,
    /// Trainer name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Contact phone
    pub phone: Option<String>,
    /// Discipline (e.g. "Yoga & Flexibility")
    pub specialization: String,
    /// Years of experience
    pub experience_years: u32,
    /// Short biography
    pub bio: String,
    /// Certification names
    pub certifications: Vec<String>,
    /// Sessions delivered; incremented by settlement only
    pub total_sessions: u64,
    /// Portrait URL
    pub photo_url: Option<String>,
    /// Whether the trainer accepts bookings
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// A retail product.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier
    pub id: ProductId,
    /// Product name
    pub name: String,
    /// Product description
    pub description: String,
    /// Unit price
    pub price: Money,
    /// Discount percentage
    pub discount: f64,
    /// Units in stock; decremented by settlement only
    pub stock: i64,
    /// Category label
    pub category: String,
    /// Stock-keeping unit
    pub sku: String,
    /// Product image URLs
    pub image_urls: Vec<String>,
    /// Whether the product is listed
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// A registered account (customer or administrator).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    /// Unique user identifier
    pub id: UserId,
    /// Login email (unique)
    pub email: String,
    /// Display name
    pub name: String,
    /// Contact phone
    pub phone: Option<String>,
    /// bcrypt password hash; persisted, but handlers must respond with
    /// [`UserProfile`] so it never reaches a client
    pub password_hash: String,
    /// Account role
    pub role: Role,
    /// Whether the account may log in
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last successful login
    pub last_login: Option<DateTime<Utc>>,
}

/// Client-facing view of an account, without credential material.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UserProfile {
    /// Unique user identifier
    pub id: UserId,
    /// Login email
    pub email: String,
    /// Display name
    pub name: String,
    /// Contact phone
    pub phone: Option<String>,
    /// Account role
    pub role: Role,
    /// Whether the account may log in
    pub is_active: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last successful login
    pub last_login: Option<DateTime<Utc>>,
}

impl From<UserAccount> for UserProfile {
    fn from(user: UserAccount) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            phone: user.phone,
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
            last_login: user.last_login,
        }
    }
}

/// A workout video hosted on the CDN.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Video {
    /// Unique video identifier
    pub id: Uuid,
    /// Video title
    pub title: String,
    /// Category
    pub category: VideoCategory,
    /// Difficulty
    pub difficulty: Difficulty,
    /// Duration in seconds
    pub duration: u32,
    /// Description
    pub description: String,
    /// CDN playback URL
    pub video_url: String,
    /// Thumbnail URL
    pub thumbnail_url: Option<String>,
    /// Whether the video is visible to members
    #[serde(default = "default_true")]
    pub is_public: bool,
    /// View counter
    pub view_count: u64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// A gallery/banner image hosted on the CDN.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Image {
    /// Unique image identifier
    pub id: Uuid,
    /// Image title
    pub title: String,
    /// Image category
    pub image_type: ImageKind,
    /// CDN URL
    pub image_url: String,
    /// Optional description
    pub description: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// An admin-facing notification row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Unique notification identifier
    pub id: Uuid,
    /// Category
    pub notification_type: NotificationKind,
    /// Human-readable message
    pub message: String,
    /// Whether an admin has seen it
    #[serde(default)]
    pub is_read: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Creates an unread notification stamped now.
    #[must_use]
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            notification_type: kind,
            message: message.into(),
            is_read: false,
            created_at: Utc::now(),
        }
    }
}

/// A persisted chat message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique message identifier
    pub id: Uuid,
    /// Sender user id
    pub sender_id: UserId,
    /// Sender display name
    pub sender_name: String,
    /// Sender role
    pub sender_role: Role,
    /// Receiver; `None` broadcasts to administrators
    pub receiver_id: Option<UserId>,
    /// Message body
    pub message: String,
    /// Whether the receiver has seen it
    #[serde(default)]
    pub is_read: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn money_from_rupees_is_exact() {
        assert_eq!(Money::from_rupees(3499.00).paise(), 349_900);
        assert_eq!(Money::from_rupees(3499.00).rupees(), 3499.00);
    }

    #[test]
    fn money_add_surcharge_is_exact() {
        let total = Money::from_rupees(3499.00).add(Money::from_rupees(500.00));
        assert_eq!(total.rupees(), 3999.00);
        assert_eq!(total.paise(), 399_900);
    }

    #[test]
    fn money_rejects_negative() {
        assert!(Money::from_rupees(-10.0).is_zero());
        assert!(Money::from_rupees(f64::NAN).is_zero());
    }

    #[test]
    fn money_serializes_as_rupees() {
        let json = serde_json::to_string(&Money::from_rupees(1499.50)).unwrap();
        assert_eq!(json, "1499.5");
        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(back.paise(), 149_950);
    }

    #[test]
    fn live_statuses() {
        assert!(BookingStatus::Pending.is_live());
        assert!(BookingStatus::Confirmed.is_live());
        assert!(!BookingStatus::Cancelled.is_live());
        assert!(!BookingStatus::Completed.is_live());
    }

    #[test]
    fn status_wire_values_are_snake_case() {
        assert_eq!(
            serde_json::to_string(&BookingStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::to_string(&AttendanceMode::HomeVisit).unwrap(),
            "\"home_visit\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Success).unwrap(),
            "\"success\""
        );
    }

    #[test]
    fn geo_location_validation() {
        let ok = GeoLocation {
            address: "12 MG Road, Bengaluru".to_string(),
            latitude: 12.9716,
            longitude: 77.5946,
        };
        assert!(ok.is_valid());

        let bad = GeoLocation {
            address: String::new(),
            latitude: 12.9716,
            longitude: 77.5946,
        };
        assert!(!bad.is_valid());

        let off_globe = GeoLocation {
            address: "Nowhere".to_string(),
            latitude: 99.0,
            longitude: 0.0,
        };
        assert!(!off_globe.is_valid());
    }
}
