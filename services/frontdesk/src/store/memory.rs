//! In-memory implementation of the hotel store.
//!
//! # Purpose
//! Implements [`HotelStore`] with `HashMap`s guarded by `tokio::sync::RwLock`.
//! Used for local development, tests, and deployments that can afford to lose
//! state on restart.
//!
//! # Consistency
//! - Not durable.
//! - Each record type has its own lock. A write that checks another
//!   collection (booking overlap, one invoice per booking) holds the relevant
//!   write lock across the check and the insert.
//!
//! # Metrics
//! Room counts by status are published as gauges whenever a room changes, the
//! same as the Postgres backend.
use super::{HotelStore, StoreError, StoreResult, publish_room_gauges};
use crate::model::{
    Booking, BookingFilter, HotelSettings, HousekeepingTask, Invoice, InvoiceFilter,
    MaintenanceFilter, MaintenanceRequest, Room, RoomFilter, Service, ServiceRequest,
    ServiceRequestFilter, TaskFilter, User, UserFilter,
};
use async_trait::async_trait;
use chrono::Utc;
use lodge_core::ids::{
    BookingId, InvoiceId, MaintenanceId, RoomId, ServiceId, ServiceRequestId, TaskId, UserId,
};
use lodge_core::{RoomStatus, StayRange};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::RwLock;

type Table<K, V> = Arc<RwLock<HashMap<K, V>>>;

fn table<K, V>() -> Table<K, V> {
    Arc::new(RwLock::new(HashMap::new()))
}

/// Replace an existing entry, failing when the key is unknown.
fn replace<K: Eq + Hash, V: Clone>(
    map: &mut HashMap<K, V>,
    key: K,
    value: V,
    what: &str,
) -> StoreResult<V> {
    match map.get_mut(&key) {
        Some(slot) => {
            *slot = value.clone();
            Ok(value)
        }
        None => Err(StoreError::NotFound(what.into())),
    }
}

fn remove<K: Eq + Hash, V>(map: &mut HashMap<K, V>, key: &K, what: &str) -> StoreResult<()> {
    map.remove(key)
        .map(|_| ())
        .ok_or_else(|| StoreError::NotFound(what.into()))
}

fn fetch<K: Eq + Hash, V: Clone>(map: &HashMap<K, V>, key: &K, what: &str) -> StoreResult<V> {
    map.get(key)
        .cloned()
        .ok_or_else(|| StoreError::NotFound(what.into()))
}

#[derive(Default)]
pub struct InMemoryStore {
    users: Table<UserId, User>,
    rooms: Table<RoomId, Room>,
    bookings: Table<BookingId, Booking>,
    invoices: Table<InvoiceId, Invoice>,
    tasks: Table<TaskId, HousekeepingTask>,
    maintenance: Table<MaintenanceId, MaintenanceRequest>,
    services: Table<ServiceId, Service>,
    service_requests: Table<ServiceRequestId, ServiceRequest>,
    settings: Arc<RwLock<Option<HotelSettings>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            users: table(),
            rooms: table(),
            bookings: table(),
            invoices: table(),
            tasks: table(),
            maintenance: table(),
            services: table(),
            service_requests: table(),
            settings: Arc::new(RwLock::new(None)),
        }
    }
}

#[async_trait]
impl HotelStore for InMemoryStore {
    async fn create_user(&self, user: User) -> StoreResult<User> {
        let mut users = self.users.write().await;
        if users.values().any(|existing| existing.email == user.email) {
            return Err(StoreError::Conflict("email already registered".into()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: UserId) -> StoreResult<User> {
        fetch(&*self.users.read().await, &id, "user")
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn list_users(&self, filter: &UserFilter) -> StoreResult<Vec<User>> {
        let mut items: Vec<User> = self
            .users
            .read()
            .await
            .values()
            .filter(|user| filter.matches(user))
            .cloned()
            .collect();
        items.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(items)
    }

    async fn update_user(&self, user: User) -> StoreResult<User> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|existing| existing.id != user.id && existing.email == user.email)
        {
            return Err(StoreError::Conflict("email already registered".into()));
        }
        replace(&mut *users, user.id, user, "user")
    }

    async fn delete_user(&self, id: UserId) -> StoreResult<()> {
        remove(&mut *self.users.write().await, &id, "user")
    }

    async fn create_room(&self, room: Room) -> StoreResult<Room> {
        let mut rooms = self.rooms.write().await;
        if rooms
            .values()
            .any(|existing| existing.room_number == room.room_number)
        {
            return Err(StoreError::Conflict("room number exists".into()));
        }
        rooms.insert(room.id, room.clone());
        publish_room_gauges(rooms.values().map(|room| &room.status));
        Ok(room)
    }

    async fn get_room(&self, id: RoomId) -> StoreResult<Room> {
        fetch(&*self.rooms.read().await, &id, "room")
    }

    async fn list_rooms(&self, filter: &RoomFilter) -> StoreResult<Vec<Room>> {
        let mut items: Vec<Room> = self
            .rooms
            .read()
            .await
            .values()
            .filter(|room| filter.matches(room))
            .cloned()
            .collect();
        items.sort_by(|a, b| a.room_number.cmp(&b.room_number));
        Ok(items)
    }

    async fn update_room(&self, room: Room) -> StoreResult<Room> {
        let mut rooms = self.rooms.write().await;
        if rooms
            .values()
            .any(|existing| existing.id != room.id && existing.room_number == room.room_number)
        {
            return Err(StoreError::Conflict("room number exists".into()));
        }
        let room = replace(&mut *rooms, room.id, room, "room")?;
        publish_room_gauges(rooms.values().map(|room| &room.status));
        Ok(room)
    }

    async fn set_room_status(&self, id: RoomId, status: RoomStatus) -> StoreResult<Room> {
        let mut rooms = self.rooms.write().await;
        let room = rooms
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound("room".into()))?;
        room.status = status;
        room.updated_at = Utc::now();
        let room = room.clone();
        publish_room_gauges(rooms.values().map(|room| &room.status));
        Ok(room)
    }

    async fn delete_room(&self, id: RoomId) -> StoreResult<()> {
        let mut rooms = self.rooms.write().await;
        remove(&mut *rooms, &id, "room")?;
        publish_room_gauges(rooms.values().map(|room| &room.status));
        Ok(())
    }

    async fn create_booking(
        &self,
        booking: Booking,
        reject_overlap: bool,
    ) -> StoreResult<Booking> {
        let mut bookings = self.bookings.write().await;
        if reject_overlap {
            let stay = booking
                .stay()
                .map_err(|err| StoreError::Unexpected(err.into()))?;
            let clash = bookings
                .values()
                .any(|existing| existing.room_id == booking.room_id && existing.blocks(&stay));
            if clash {
                return Err(StoreError::Conflict(
                    "room already booked for these dates".into(),
                ));
            }
        }
        bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn get_booking(&self, id: BookingId) -> StoreResult<Booking> {
        fetch(&*self.bookings.read().await, &id, "booking")
    }

    async fn list_bookings(&self, filter: &BookingFilter) -> StoreResult<Vec<Booking>> {
        let mut items: Vec<Booking> = self
            .bookings
            .read()
            .await
            .values()
            .filter(|booking| filter.matches(booking))
            .cloned()
            .collect();
        items.sort_by(|a, b| {
            b.check_in
                .cmp(&a.check_in)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(items)
    }

    async fn update_booking(&self, booking: Booking) -> StoreResult<Booking> {
        replace(
            &mut *self.bookings.write().await,
            booking.id,
            booking,
            "booking",
        )
    }

    async fn delete_booking(&self, id: BookingId) -> StoreResult<()> {
        remove(&mut *self.bookings.write().await, &id, "booking")
    }

    async fn booked_room_ids(&self, stay: &StayRange) -> StoreResult<Vec<RoomId>> {
        let mut ids: Vec<RoomId> = self
            .bookings
            .read()
            .await
            .values()
            .filter(|booking| booking.blocks(stay))
            .map(|booking| booking.room_id)
            .collect();
        ids.sort_by_key(|id| id.as_uuid());
        ids.dedup();
        Ok(ids)
    }

    async fn create_invoice(&self, invoice: Invoice) -> StoreResult<Invoice> {
        let mut invoices = self.invoices.write().await;
        if invoices
            .values()
            .any(|existing| existing.booking_id == invoice.booking_id)
        {
            return Err(StoreError::Conflict("invoice exists for booking".into()));
        }
        invoices.insert(invoice.id, invoice.clone());
        Ok(invoice)
    }

    async fn get_invoice(&self, id: InvoiceId) -> StoreResult<Invoice> {
        fetch(&*self.invoices.read().await, &id, "invoice")
    }

    async fn list_invoices(&self, filter: &InvoiceFilter) -> StoreResult<Vec<Invoice>> {
        let mut items: Vec<Invoice> = self
            .invoices
            .read()
            .await
            .values()
            .filter(|invoice| filter.matches(invoice))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.issued_at.cmp(&a.issued_at));
        Ok(items)
    }

    async fn update_invoice(&self, invoice: Invoice) -> StoreResult<Invoice> {
        replace(
            &mut *self.invoices.write().await,
            invoice.id,
            invoice,
            "invoice",
        )
    }

    async fn delete_invoice(&self, id: InvoiceId) -> StoreResult<()> {
        remove(&mut *self.invoices.write().await, &id, "invoice")
    }

    async fn create_task(&self, task: HousekeepingTask) -> StoreResult<HousekeepingTask> {
        self.tasks.write().await.insert(task.id, task.clone());
        Ok(task)
    }

    async fn get_task(&self, id: TaskId) -> StoreResult<HousekeepingTask> {
        fetch(&*self.tasks.read().await, &id, "housekeeping task")
    }

    async fn list_tasks(&self, filter: &TaskFilter) -> StoreResult<Vec<HousekeepingTask>> {
        let mut items: Vec<HousekeepingTask> = self
            .tasks
            .read()
            .await
            .values()
            .filter(|task| filter.matches(task))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn update_task(&self, task: HousekeepingTask) -> StoreResult<HousekeepingTask> {
        replace(
            &mut *self.tasks.write().await,
            task.id,
            task,
            "housekeeping task",
        )
    }

    async fn delete_task(&self, id: TaskId) -> StoreResult<()> {
        remove(&mut *self.tasks.write().await, &id, "housekeeping task")
    }

    async fn create_maintenance(
        &self,
        request: MaintenanceRequest,
    ) -> StoreResult<MaintenanceRequest> {
        self.maintenance
            .write()
            .await
            .insert(request.id, request.clone());
        Ok(request)
    }

    async fn get_maintenance(&self, id: MaintenanceId) -> StoreResult<MaintenanceRequest> {
        fetch(&*self.maintenance.read().await, &id, "maintenance request")
    }

    async fn list_maintenance(
        &self,
        filter: &MaintenanceFilter,
    ) -> StoreResult<Vec<MaintenanceRequest>> {
        let mut items: Vec<MaintenanceRequest> = self
            .maintenance
            .read()
            .await
            .values()
            .filter(|request| filter.matches(request))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn update_maintenance(
        &self,
        request: MaintenanceRequest,
    ) -> StoreResult<MaintenanceRequest> {
        replace(
            &mut *self.maintenance.write().await,
            request.id,
            request,
            "maintenance request",
        )
    }

    async fn delete_maintenance(&self, id: MaintenanceId) -> StoreResult<()> {
        remove(&mut *self.maintenance.write().await, &id, "maintenance request")
    }

    async fn create_service(&self, service: Service) -> StoreResult<Service> {
        self.services
            .write()
            .await
            .insert(service.id, service.clone());
        Ok(service)
    }

    async fn get_service(&self, id: ServiceId) -> StoreResult<Service> {
        fetch(&*self.services.read().await, &id, "service")
    }

    async fn list_services(&self) -> StoreResult<Vec<Service>> {
        let mut items: Vec<Service> = self.services.read().await.values().cloned().collect();
        items.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.name.cmp(&b.name)));
        Ok(items)
    }

    async fn update_service(&self, service: Service) -> StoreResult<Service> {
        replace(
            &mut *self.services.write().await,
            service.id,
            service,
            "service",
        )
    }

    async fn delete_service(&self, id: ServiceId) -> StoreResult<()> {
        remove(&mut *self.services.write().await, &id, "service")
    }

    async fn create_service_request(
        &self,
        request: ServiceRequest,
    ) -> StoreResult<ServiceRequest> {
        self.service_requests
            .write()
            .await
            .insert(request.id, request.clone());
        Ok(request)
    }

    async fn get_service_request(&self, id: ServiceRequestId) -> StoreResult<ServiceRequest> {
        fetch(&*self.service_requests.read().await, &id, "service request")
    }

    async fn list_service_requests(
        &self,
        filter: &ServiceRequestFilter,
    ) -> StoreResult<Vec<ServiceRequest>> {
        let mut items: Vec<ServiceRequest> = self
            .service_requests
            .read()
            .await
            .values()
            .filter(|request| filter.matches(request))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn update_service_request(
        &self,
        request: ServiceRequest,
    ) -> StoreResult<ServiceRequest> {
        replace(
            &mut *self.service_requests.write().await,
            request.id,
            request,
            "service request",
        )
    }

    async fn get_settings(&self) -> StoreResult<HotelSettings> {
        Ok(self.settings.read().await.clone().unwrap_or_default())
    }

    async fn put_settings(&self, settings: HotelSettings) -> StoreResult<HotelSettings> {
        *self.settings.write().await = Some(settings.clone());
        Ok(settings)
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    fn is_durable(&self) -> bool {
        false
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use lodge_core::{BookingStatus, PaymentStatus, Role, RoomType, UserStatus};
    use rust_decimal_macros::dec;

    fn jan(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
    }

    fn room(number: &str) -> Room {
        let now = Utc::now();
        Room {
            id: RoomId::new(),
            room_number: number.to_string(),
            room_type: RoomType::Double,
            floor: 1,
            price: dec!(100),
            beds: 2,
            status: RoomStatus::Available,
            amenities: vec!["wifi".to_string()],
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn booking(room_id: RoomId, check_in: u32, check_out: u32) -> Booking {
        let now = Utc::now();
        Booking {
            id: BookingId::new(),
            guest_id: UserId::new(),
            room_id,
            check_in: jan(check_in),
            check_out: jan(check_out),
            guests: 1,
            status: BookingStatus::Confirmed,
            total_amount: dec!(220.00),
            special_requests: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn user(email: &str) -> User {
        let now = Utc::now();
        User {
            id: UserId::new(),
            name: "Guest".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role: Role::Guest,
            department: None,
            status: UserStatus::Approved,
            preferences: Default::default(),
            contact: Default::default(),
            photo_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn user_emails_are_unique() {
        let store = InMemoryStore::new();
        store.create_user(user("a@example.com")).await.unwrap();
        let err = store.create_user(user("a@example.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        let found = store.find_user_by_email("a@example.com").await.unwrap();
        assert!(found.is_some());
        assert!(
            store
                .find_user_by_email("b@example.com")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn room_numbers_are_unique_and_listing_is_sorted() {
        let store = InMemoryStore::new();
        store.create_room(room("201")).await.unwrap();
        store.create_room(room("101")).await.unwrap();
        let err = store.create_room(room("101")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        let rooms = store.list_rooms(&RoomFilter::default()).await.unwrap();
        let numbers: Vec<_> = rooms.iter().map(|room| room.room_number.as_str()).collect();
        assert_eq!(numbers, vec!["101", "201"]);
    }

    #[tokio::test]
    async fn room_status_updates_and_missing_rooms() {
        let store = InMemoryStore::new();
        let created = store.create_room(room("101")).await.unwrap();
        let updated = store
            .set_room_status(created.id, RoomStatus::Cleaning)
            .await
            .unwrap();
        assert_eq!(updated.status, RoomStatus::Cleaning);
        let err = store
            .set_room_status(RoomId::new(), RoomStatus::Cleaning)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn overlapping_bookings_accepted_unless_rejected() {
        let store = InMemoryStore::new();
        let room = store.create_room(room("101")).await.unwrap();
        store
            .create_booking(booking(room.id, 10, 12), false)
            .await
            .unwrap();
        store
            .create_booking(booking(room.id, 11, 13), false)
            .await
            .expect("overlap allowed by default");
        let err = store
            .create_booking(booking(room.id, 11, 12), true)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        store
            .create_booking(booking(room.id, 13, 15), true)
            .await
            .expect("back-to-back stay");
    }

    #[tokio::test]
    async fn booked_rooms_ignore_released_bookings() {
        let store = InMemoryStore::new();
        let busy = store.create_room(room("101")).await.unwrap();
        let freed = store.create_room(room("102")).await.unwrap();
        store
            .create_booking(booking(busy.id, 10, 12), false)
            .await
            .unwrap();
        let mut canceled = booking(freed.id, 10, 12);
        canceled.status = BookingStatus::Canceled;
        store.create_booking(canceled, false).await.unwrap();

        let stay = StayRange::new(jan(11), jan(13)).unwrap();
        assert_eq!(store.booked_room_ids(&stay).await.unwrap(), vec![busy.id]);
        let later = StayRange::new(jan(13), jan(15)).unwrap();
        assert!(store.booked_room_ids(&later).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn one_invoice_per_booking() {
        let store = InMemoryStore::new();
        let booking_id = BookingId::new();
        let invoice = |id| Invoice {
            id,
            booking_id,
            guest_id: UserId::new(),
            room_charges: dec!(220.00),
            additional_services_charges: dec!(0),
            line_items: vec![],
            total_amount: dec!(220.00),
            payment_status: PaymentStatus::Pending,
            issued_at: Utc::now(),
            paid_at: None,
        };
        store.create_invoice(invoice(InvoiceId::new())).await.unwrap();
        let err = store
            .create_invoice(invoice(InvoiceId::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn settings_default_until_saved() {
        let store = InMemoryStore::new();
        let defaults = store.get_settings().await.unwrap();
        assert_eq!(defaults.tax_rate, dec!(0.10));
        let mut changed = defaults.clone();
        changed.hotel_name = "Seaside".to_string();
        store.put_settings(changed).await.unwrap();
        assert_eq!(store.get_settings().await.unwrap().hotel_name, "Seaside");
    }

    #[tokio::test]
    async fn deletes_report_missing_records() {
        let store = InMemoryStore::new();
        assert!(matches!(
            store.delete_booking(BookingId::new()).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.delete_service(ServiceId::new()).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(!store.is_durable());
        assert_eq!(store.backend_name(), "memory");
    }
}
