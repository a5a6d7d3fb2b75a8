//! In-memory store backend.
//!
//! Backs the test-suite and local development. Every invariant the Postgres
//! schema enforces with constraints is enforced here under a single lock per
//! store: live-slot uniqueness is checked and inserted atomically, the
//! payment audit log rejects duplicate gateway order ids, and counters
//! mutate in one step.

use crate::error::{Error, Result};
use crate::slots::SlotLabel;
use crate::store::{
    BookingFilter, BookingStore, CatalogStore, ChatStore, ListFilter, MediaStore,
    NotificationStore, OrderFilter, OrderStore, PaymentStore, UserStore, effective_limit,
};
use crate::types::{
    Booking, BookingId, ChatMessage, Image, ImageKind, Notification, Order, OrderId,
    PaymentRecord, Product, ProductId, Program, ProgramId, Trainer, TrainerId, UserAccount,
    UserId, VenueSettings, Video,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

/// Locks a mutex, recovering the data from a poisoned lock.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn page<T: Clone>(rows: &[T], skip: i64, limit: i64) -> Vec<T> {
    let skip = usize::try_from(skip.max(0)).unwrap_or(0);
    let limit = usize::try_from(effective_limit(limit)).unwrap_or(usize::MAX);
    rows.iter().skip(skip).take(limit).cloned().collect()
}

// ============================================================================
// Bookings
// ============================================================================

/// In-memory booking ledger.
#[derive(Default)]
pub struct MemoryBookingStore {
    rows: Mutex<HashMap<BookingId, Booking>>,
}

impl MemoryBookingStore {
    fn slot_taken(rows: &HashMap<BookingId, Booking>, candidate: &Booking) -> bool {
        rows.values().any(|b| {
            b.id != candidate.id
                && b.trainer_id == candidate.trainer_id
                && b.booking_date == candidate.booking_date
                && b.time_slot == candidate.time_slot
                && b.status.is_live()
        })
    }
}

#[async_trait]
impl BookingStore for MemoryBookingStore {
    async fn insert(&self, booking: &Booking) -> Result<()> {
        let mut rows = lock(&self.rows);
        // Check and insert under one lock: no race window.
        if booking.status.is_live() && Self::slot_taken(&rows, booking) {
            return Err(Error::Conflict(format!(
                "Slot {} on {} is already booked",
                booking.time_slot, booking.booking_date
            )));
        }
        rows.insert(booking.id, booking.clone());
        Ok(())
    }

    async fn get(&self, id: &BookingId) -> Result<Option<Booking>> {
        Ok(lock(&self.rows).get(id).cloned())
    }

    async fn get_by_gateway_order(&self, gateway_order_id: &str) -> Result<Option<Booking>> {
        Ok(lock(&self.rows)
            .values()
            .find(|b| b.gateway_order_id.as_deref() == Some(gateway_order_id))
            .cloned())
    }

    async fn live_slots(&self, trainer_id: &TrainerId, date: NaiveDate) -> Result<Vec<SlotLabel>> {
        Ok(lock(&self.rows)
            .values()
            .filter(|b| b.trainer_id == *trainer_id && b.booking_date == date && b.status.is_live())
            .map(|b| b.time_slot.clone())
            .collect())
    }

    async fn list(&self, filter: &BookingFilter) -> Result<Vec<Booking>> {
        let rows = lock(&self.rows);
        let mut all: Vec<Booking> = rows
            .values()
            .filter(|b| filter.status.is_none_or(|s| b.status == s))
            .filter(|b| filter.payment_status.is_none_or(|s| b.payment_status == s))
            .cloned()
            .collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page(&all, filter.skip, filter.limit))
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Booking>> {
        let rows = lock(&self.rows);
        let mut all: Vec<Booking> = rows
            .values()
            .filter(|b| b.user_id == *user_id)
            .cloned()
            .collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn update(&self, booking: &Booking) -> Result<()> {
        let mut rows = lock(&self.rows);
        if !rows.contains_key(&booking.id) {
            return Err(Error::not_found("Booking", booking.id));
        }
        if booking.status.is_live() && Self::slot_taken(&rows, booking) {
            return Err(Error::Conflict(format!(
                "Slot {} on {} is already booked",
                booking.time_slot, booking.booking_date
            )));
        }
        rows.insert(booking.id, booking.clone());
        Ok(())
    }
}

// ============================================================================
// Orders
// ============================================================================

/// In-memory order ledger.
#[derive(Default)]
pub struct MemoryOrderStore {
    rows: Mutex<HashMap<OrderId, Order>>,
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn insert(&self, order: &Order) -> Result<()> {
        lock(&self.rows).insert(order.id, order.clone());
        Ok(())
    }

    async fn get(&self, id: &OrderId) -> Result<Option<Order>> {
        Ok(lock(&self.rows).get(id).cloned())
    }

    async fn get_by_gateway_order(&self, gateway_order_id: &str) -> Result<Option<Order>> {
        Ok(lock(&self.rows)
            .values()
            .find(|o| o.gateway_order_id.as_deref() == Some(gateway_order_id))
            .cloned())
    }

    async fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>> {
        let rows = lock(&self.rows);
        let mut all: Vec<Order> = rows
            .values()
            .filter(|o| filter.status.is_none_or(|s| o.order_status == s))
            .filter(|o| filter.payment_status.is_none_or(|s| o.payment_status == s))
            .cloned()
            .collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page(&all, filter.skip, filter.limit))
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Order>> {
        let rows = lock(&self.rows);
        let mut all: Vec<Order> = rows
            .values()
            .filter(|o| o.user_id == *user_id)
            .cloned()
            .collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn update(&self, order: &Order) -> Result<()> {
        let mut rows = lock(&self.rows);
        if !rows.contains_key(&order.id) {
            return Err(Error::not_found("Order", order.id));
        }
        rows.insert(order.id, order.clone());
        Ok(())
    }
}

// ============================================================================
// Payments
// ============================================================================

/// In-memory payment audit log, keyed by gateway order id.
#[derive(Default)]
pub struct MemoryPaymentStore {
    rows: Mutex<HashMap<String, PaymentRecord>>,
}

#[async_trait]
impl PaymentStore for MemoryPaymentStore {
    async fn insert(&self, payment: &PaymentRecord) -> Result<()> {
        let mut rows = lock(&self.rows);
        if rows.contains_key(&payment.gateway_order_id) {
            return Err(Error::AlreadyProcessed);
        }
        rows.insert(payment.gateway_order_id.clone(), payment.clone());
        Ok(())
    }

    async fn get_by_gateway_order(&self, gateway_order_id: &str) -> Result<Option<PaymentRecord>> {
        Ok(lock(&self.rows).get(gateway_order_id).cloned())
    }

    async fn list(&self) -> Result<Vec<PaymentRecord>> {
        let rows = lock(&self.rows);
        let mut all: Vec<PaymentRecord> = rows.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// In-memory catalog: products, programs, trainers, venue settings.
#[derive(Default)]
pub struct MemoryCatalogStore {
    products: Mutex<HashMap<ProductId, Product>>,
    programs: Mutex<HashMap<ProgramId, Program>>,
    trainers: Mutex<HashMap<TrainerId, Trainer>>,
    venue: Mutex<Option<VenueSettings>>,
}

fn matches_filter(name: &str, category: &str, filter: &ListFilter) -> bool {
    if let Some(wanted) = &filter.category {
        if !category.eq_ignore_ascii_case(wanted) {
            return false;
        }
    }
    if let Some(needle) = &filter.search {
        if !name.to_lowercase().contains(&needle.to_lowercase()) {
            return false;
        }
    }
    true
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn insert_product(&self, product: &Product) -> Result<()> {
        lock(&self.products).insert(product.id, product.clone());
        Ok(())
    }

    async fn product(&self, id: &ProductId) -> Result<Option<Product>> {
        Ok(lock(&self.products).get(id).cloned())
    }

    async fn list_products(&self, filter: &ListFilter) -> Result<Vec<Product>> {
        let rows = lock(&self.products);
        let mut all: Vec<Product> = rows
            .values()
            .filter(|p| matches_filter(&p.name, &p.category, filter))
            .cloned()
            .collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page(&all, filter.skip, filter.limit))
    }

    async fn update_product(&self, product: &Product) -> Result<()> {
        let mut rows = lock(&self.products);
        if !rows.contains_key(&product.id) {
            return Err(Error::not_found("Product", product.id));
        }
        rows.insert(product.id, product.clone());
        Ok(())
    }

    async fn delete_product(&self, id: &ProductId) -> Result<bool> {
        Ok(lock(&self.products).remove(id).is_some())
    }

    async fn decrement_stock(&self, id: &ProductId, quantity: u32) -> Result<i64> {
        let mut rows = lock(&self.products);
        let product = rows
            .get_mut(id)
            .ok_or_else(|| Error::not_found("Product", *id))?;
        product.stock -= i64::from(quantity);
        Ok(product.stock)
    }

    async fn insert_program(&self, program: &Program) -> Result<()> {
        lock(&self.programs).insert(program.id, program.clone());
        Ok(())
    }

    async fn program(&self, id: &ProgramId) -> Result<Option<Program>> {
        Ok(lock(&self.programs).get(id).cloned())
    }

    async fn list_programs(&self, filter: &ListFilter) -> Result<Vec<Program>> {
        let rows = lock(&self.programs);
        let mut all: Vec<Program> = rows
            .values()
            .filter(|p| matches_filter(&p.title, &p.category, filter))
            .cloned()
            .collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page(&all, filter.skip, filter.limit))
    }

    async fn update_program(&self, program: &Program) -> Result<()> {
        let mut rows = lock(&self.programs);
        if !rows.contains_key(&program.id) {
            return Err(Error::not_found("Program", program.id));
        }
        rows.insert(program.id, program.clone());
        Ok(())
    }

    async fn delete_program(&self, id: &ProgramId) -> Result<bool> {
        Ok(lock(&self.programs).remove(id).is_some())
    }

    async fn increment_enrollment(&self, id: &ProgramId) -> Result<()> {
        let mut rows = lock(&self.programs);
        let program = rows
            .get_mut(id)
            .ok_or_else(|| Error::not_found("Program", *id))?;
        program.enrolled_count += 1;
        Ok(())
    }

    async fn insert_trainer(&self, trainer: &Trainer) -> Result<()> {
        lock(&self.trainers).insert(trainer.id, trainer.clone());
        Ok(())
    }

    async fn trainer(&self, id: &TrainerId) -> Result<Option<Trainer>> {
        Ok(lock(&self.trainers).get(id).cloned())
    }

    async fn list_trainers(&self, filter: &ListFilter) -> Result<Vec<Trainer>> {
        let rows = lock(&self.trainers);
        let mut all: Vec<Trainer> = rows
            .values()
            .filter(|t| matches_filter(&t.name, &t.specialization, filter))
            .cloned()
            .collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page(&all, filter.skip, filter.limit))
    }

    async fn update_trainer(&self, trainer: &Trainer) -> Result<()> {
        let mut rows = lock(&self.trainers);
        if !rows.contains_key(&trainer.id) {
            return Err(Error::not_found("Trainer", trainer.id));
        }
        rows.insert(trainer.id, trainer.clone());
        Ok(())
    }

    async fn delete_trainer(&self, id: &TrainerId) -> Result<bool> {
        Ok(lock(&self.trainers).remove(id).is_some())
    }

    async fn increment_sessions(&self, id: &TrainerId) -> Result<()> {
        let mut rows = lock(&self.trainers);
        let trainer = rows
            .get_mut(id)
            .ok_or_else(|| Error::not_found("Trainer", *id))?;
        trainer.total_sessions += 1;
        Ok(())
    }

    async fn venue_settings(&self) -> Result<Option<VenueSettings>> {
        Ok(lock(&self.venue).clone())
    }

    async fn set_venue_settings(&self, settings: &VenueSettings) -> Result<()> {
        *lock(&self.venue) = Some(settings.clone());
        Ok(())
    }
}

// ============================================================================
// Users
// ============================================================================

/// In-memory account directory.
#[derive(Default)]
pub struct MemoryUserStore {
    rows: Mutex<HashMap<UserId, UserAccount>>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, user: &UserAccount) -> Result<()> {
        let mut rows = lock(&self.rows);
        if rows
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(Error::Conflict(format!(
                "An account with email {} already exists",
                user.email
            )));
        }
        rows.insert(user.id, user.clone());
        Ok(())
    }

    async fn get(&self, id: &UserId) -> Result<Option<UserAccount>> {
        Ok(lock(&self.rows).get(id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<UserAccount>> {
        Ok(lock(&self.rows)
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn list(&self, skip: i64, limit: i64) -> Result<Vec<UserAccount>> {
        let rows = lock(&self.rows);
        let mut all: Vec<UserAccount> = rows.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page(&all, skip, limit))
    }

    async fn touch_last_login(&self, id: &UserId) -> Result<()> {
        let mut rows = lock(&self.rows);
        if let Some(user) = rows.get_mut(id) {
            user.last_login = Some(chrono::Utc::now());
        }
        Ok(())
    }

    async fn count_admins(&self) -> Result<u64> {
        Ok(lock(&self.rows)
            .values()
            .filter(|u| u.role == crate::types::Role::Admin)
            .count() as u64)
    }

    async fn count(&self) -> Result<u64> {
        Ok(lock(&self.rows).len() as u64)
    }
}

// ============================================================================
// Media
// ============================================================================

/// In-memory media metadata.
#[derive(Default)]
pub struct MemoryMediaStore {
    videos: Mutex<HashMap<Uuid, Video>>,
    images: Mutex<HashMap<Uuid, Image>>,
}

#[async_trait]
impl MediaStore for MemoryMediaStore {
    async fn insert_video(&self, video: &Video) -> Result<()> {
        lock(&self.videos).insert(video.id, video.clone());
        Ok(())
    }

    async fn video(&self, id: &Uuid) -> Result<Option<Video>> {
        Ok(lock(&self.videos).get(id).cloned())
    }

    async fn list_videos(
        &self,
        filter: &ListFilter,
        difficulty: Option<&str>,
    ) -> Result<Vec<Video>> {
        let rows = lock(&self.videos);
        let mut all: Vec<Video> = rows
            .values()
            .filter(|v| {
                filter.category.as_ref().is_none_or(|c| {
                    serde_json::to_value(v.category)
                        .ok()
                        .and_then(|j| j.as_str().map(|s| s.eq_ignore_ascii_case(c)))
                        .unwrap_or(false)
                })
            })
            .filter(|v| {
                difficulty.is_none_or(|d| {
                    serde_json::to_value(v.difficulty)
                        .ok()
                        .and_then(|j| j.as_str().map(|s| s.eq_ignore_ascii_case(d)))
                        .unwrap_or(false)
                })
            })
            .filter(|v| {
                filter
                    .search
                    .as_ref()
                    .is_none_or(|s| v.title.to_lowercase().contains(&s.to_lowercase()))
            })
            .cloned()
            .collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page(&all, filter.skip, filter.limit))
    }

    async fn update_video(&self, video: &Video) -> Result<()> {
        let mut rows = lock(&self.videos);
        if !rows.contains_key(&video.id) {
            return Err(Error::not_found("Video", video.id));
        }
        rows.insert(video.id, video.clone());
        Ok(())
    }

    async fn delete_video(&self, id: &Uuid) -> Result<bool> {
        Ok(lock(&self.videos).remove(id).is_some())
    }

    async fn insert_image(&self, image: &Image) -> Result<()> {
        lock(&self.images).insert(image.id, image.clone());
        Ok(())
    }

    async fn image(&self, id: &Uuid) -> Result<Option<Image>> {
        Ok(lock(&self.images).get(id).cloned())
    }

    async fn list_images(
        &self,
        kind: Option<ImageKind>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Image>> {
        let rows = lock(&self.images);
        let mut all: Vec<Image> = rows
            .values()
            .filter(|i| kind.is_none_or(|k| i.image_type == k))
            .cloned()
            .collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page(&all, skip, limit))
    }

    async fn delete_image(&self, id: &Uuid) -> Result<bool> {
        Ok(lock(&self.images).remove(id).is_some())
    }
}

// ============================================================================
// Notifications
// ============================================================================

/// In-memory notification log.
#[derive(Default)]
pub struct MemoryNotificationStore {
    rows: Mutex<Vec<Notification>>,
}

#[async_trait]
impl NotificationStore for MemoryNotificationStore {
    async fn insert(&self, notification: &Notification) -> Result<()> {
        lock(&self.rows).push(notification.clone());
        Ok(())
    }

    async fn list(&self, unread_only: bool, skip: i64, limit: i64) -> Result<Vec<Notification>> {
        let rows = lock(&self.rows);
        let mut all: Vec<Notification> = rows
            .iter()
            .filter(|n| !unread_only || !n.is_read)
            .cloned()
            .collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page(&all, skip, limit))
    }

    async fn mark_read(&self, id: &Uuid) -> Result<bool> {
        let mut rows = lock(&self.rows);
        for n in rows.iter_mut() {
            if n.id == *id {
                n.is_read = true;
                return Ok(true);
            }
        }
        Ok(false)
    }
}

// ============================================================================
// Chat
// ============================================================================

/// In-memory chat log.
#[derive(Default)]
pub struct MemoryChatStore {
    rows: Mutex<Vec<ChatMessage>>,
}

#[async_trait]
impl ChatStore for MemoryChatStore {
    async fn insert(&self, message: &ChatMessage) -> Result<()> {
        lock(&self.rows).push(message.clone());
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<ChatMessage>> {
        let rows = lock(&self.rows);
        let mut all: Vec<ChatMessage> = rows
            .iter()
            .filter(|m| m.sender_id == *user_id || m.receiver_id == Some(*user_id))
            .cloned()
            .collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(page(&all, skip, limit))
    }

    async fn list_all(
        &self,
        participant: Option<&UserId>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<ChatMessage>> {
        let rows = lock(&self.rows);
        let mut all: Vec<ChatMessage> = rows
            .iter()
            .filter(|m| {
                participant.is_none_or(|p| m.sender_id == *p || m.receiver_id == Some(*p))
            })
            .cloned()
            .collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(page(&all, skip, limit))
    }

    async fn mark_read(&self, id: &Uuid) -> Result<bool> {
        let mut rows = lock(&self.rows);
        for m in rows.iter_mut() {
            if m.id == *id {
                m.is_read = true;
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{AttendanceMode, BookingStatus, Money, PaymentStatus, Role};
    use chrono::Utc;

    fn booking(trainer: TrainerId, date: &str, slot: &str, status: BookingStatus) -> Booking {
        Booking {
            id: BookingId::new(),
            user_id: UserId::new(),
            user_name: "Sarah Johnson".to_string(),
            user_email: "sarah@example.com".to_string(),
            user_phone: None,
            program_id: ProgramId::new(),
            program_title: "Beginner Yoga Journey".to_string(),
            trainer_id: trainer,
            trainer_name: "Priya Sharma".to_string(),
            booking_date: date.parse().unwrap(),
            time_slot: SlotLabel::parse(slot).unwrap(),
            attendance_mode: AttendanceMode::Gym,
            user_location: None,
            gym_location: None,
            amount: Money::from_rupees(2999.0),
            status,
            payment_status: PaymentStatus::Pending,
            gateway_order_id: None,
            gateway_payment_id: None,
            notes: None,
            needs_reconciliation: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn duplicate_live_slot_conflicts() {
        let store = MemoryBookingStore::default();
        let trainer = TrainerId::new();
        store
            .insert(&booking(trainer, "2026-03-01", "09:00-10:00", BookingStatus::Confirmed))
            .await
            .unwrap();

        let dup = booking(trainer, "2026-03-01", "09:00-10:00", BookingStatus::Pending);
        assert!(matches!(store.insert(&dup).await, Err(Error::Conflict(_))));
    }

    #[tokio::test]
    async fn cancelled_booking_frees_slot() {
        let store = MemoryBookingStore::default();
        let trainer = TrainerId::new();
        store
            .insert(&booking(trainer, "2026-03-01", "09:00-10:00", BookingStatus::Cancelled))
            .await
            .unwrap();

        let next = booking(trainer, "2026-03-01", "09:00-10:00", BookingStatus::Pending);
        assert!(store.insert(&next).await.is_ok());

        let live = store
            .live_slots(&trainer, "2026-03-01".parse().unwrap())
            .await
            .unwrap();
        assert_eq!(live.len(), 1);
    }

    #[tokio::test]
    async fn same_slot_different_trainer_is_fine() {
        let store = MemoryBookingStore::default();
        store
            .insert(&booking(TrainerId::new(), "2026-03-01", "09:00-10:00", BookingStatus::Pending))
            .await
            .unwrap();
        store
            .insert(&booking(TrainerId::new(), "2026-03-01", "09:00-10:00", BookingStatus::Pending))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn payment_audit_rejects_duplicates() {
        let store = MemoryPaymentStore::default();
        let record = PaymentRecord {
            id: crate::types::PaymentId::new(),
            parent_id: Uuid::new_v4(),
            gateway_order_id: "order_1".to_string(),
            gateway_payment_id: "pay_1".to_string(),
            signature: "sig".to_string(),
            amount: Money::from_rupees(100.0),
            status: PaymentStatus::Success,
            created_at: Utc::now(),
        };
        store.insert(&record).await.unwrap();
        assert!(matches!(
            store.insert(&record).await,
            Err(Error::AlreadyProcessed)
        ));
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let store = MemoryUserStore::default();
        let make = |email: &str| UserAccount {
            id: UserId::new(),
            email: email.to_string(),
            name: "Test".to_string(),
            phone: None,
            password_hash: "x".to_string(),
            role: Role::User,
            is_active: true,
            created_at: Utc::now(),
            last_login: None,
        };
        store.insert(&make("a@example.com")).await.unwrap();
        assert!(store.insert(&make("A@Example.com")).await.is_err());
    }
}
