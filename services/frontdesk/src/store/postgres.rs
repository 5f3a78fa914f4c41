//! Postgres-backed implementation of the hotel store.
//!
//! # Purpose
//! Durable [`HotelStore`] on `sqlx::PgPool`. The schema lives in
//! `migrations/` and is applied at connect time.
//!
//! # Key invariants
//! - Status enums are stored as their wire strings and parsed back through
//!   `FromStr`; an unknown value in a row is an unexpected store error.
//! - Unique constraints (user email, room number, one invoice per booking)
//!   surface as [`StoreError::Conflict`].
//! - With overlap rejection on, booking creation locks the room row
//!   (`SELECT ... FOR UPDATE`) so concurrent inserts for the same room
//!   serialize on the overlap check.
//!
//! # Security notes
//! - Database URLs may contain credentials; they are never logged.
//! - All SQL is static; filters bind `NULL` for "match everything".
use super::{HotelStore, StoreError, StoreResult, publish_room_gauges};
use crate::config::PostgresConfig;
use crate::model::{
    Booking, BookingFilter, ContactInfo, HotelSettings, HousekeepingTask, Invoice, InvoiceFilter,
    MaintenanceFilter, MaintenanceRequest, Preferences, Room, RoomFilter, Service,
    ServiceRequest, ServiceRequestFilter, TaskFilter, User, UserFilter,
};
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use lodge_core::ids::{
    BookingId, InvoiceId, MaintenanceId, RoomId, ServiceId, ServiceRequestId, TaskId, UserId,
};
use lodge_core::{BookingStatus, DomainError, LineItem, RoomStatus, StayRange};
use rust_decimal::Decimal;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

const SETTINGS_ROW_ID: i16 = 1;

pub struct PostgresStore {
    pool: PgPool,
}

#[derive(Debug, FromRow)]
struct DbUser {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    department: Option<String>,
    status: String,
    theme: String,
    language: String,
    currency: String,
    phone: Option<String>,
    address: Option<String>,
    photo_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct DbRoom {
    id: Uuid,
    room_number: String,
    room_type: String,
    floor: i32,
    price: Decimal,
    beds: i32,
    status: String,
    amenities: Vec<String>,
    description: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct DbBooking {
    id: Uuid,
    guest_id: Uuid,
    room_id: Uuid,
    check_in: NaiveDate,
    check_out: NaiveDate,
    guests: i32,
    status: String,
    total_amount: Decimal,
    special_requests: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct DbInvoice {
    id: Uuid,
    booking_id: Uuid,
    guest_id: Uuid,
    room_charges: Decimal,
    additional_services_charges: Decimal,
    line_items: Json<Vec<LineItem>>,
    total_amount: Decimal,
    payment_status: String,
    issued_at: DateTime<Utc>,
    paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, FromRow)]
struct DbTask {
    id: Uuid,
    room_id: Uuid,
    assigned_to: Option<Uuid>,
    kind: String,
    status: String,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct DbMaintenance {
    id: Uuid,
    room_id: Uuid,
    reported_by: Uuid,
    assigned_to: Option<Uuid>,
    issue: String,
    priority: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct DbService {
    id: Uuid,
    name: String,
    description: Option<String>,
    category: String,
    price: Decimal,
    available: bool,
}

#[derive(Debug, FromRow)]
struct DbServiceRequest {
    id: Uuid,
    guest_id: Uuid,
    service_id: Uuid,
    booking_id: Uuid,
    status: String,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct DbSettings {
    hotel_name: String,
    currency: String,
    tax_rate: Decimal,
    check_in_time: String,
    check_out_time: String,
    updated_at: DateTime<Utc>,
}

const USER_COLUMNS: &str = "id, name, email, password_hash, role, department, status, theme, \
     language, currency, phone, address, photo_url, created_at, updated_at";
const ROOM_COLUMNS: &str = "id, room_number, room_type, floor, price, beds, status, amenities, \
     description, created_at, updated_at";
const BOOKING_COLUMNS: &str = "id, guest_id, room_id, check_in, check_out, guests, status, \
     total_amount, special_requests, created_at, updated_at";
const INVOICE_COLUMNS: &str = "id, booking_id, guest_id, room_charges, \
     additional_services_charges, line_items, total_amount, payment_status, issued_at, paid_at";
const TASK_COLUMNS: &str = "id, room_id, assigned_to, kind, status, notes, created_at, updated_at";
const MAINTENANCE_COLUMNS: &str = "id, room_id, reported_by, assigned_to, issue, priority, \
     status, created_at, updated_at";
const SERVICE_COLUMNS: &str = "id, name, description, category, price, available";
const SERVICE_REQUEST_COLUMNS: &str = "id, guest_id, service_id, booking_id, status, notes, \
     created_at, updated_at";

impl PostgresStore {
    /// Open the pool and apply migrations before any request is served.
    pub async fn connect(pg: &PostgresConfig) -> StoreResult<Self> {
        let connect_options = PgConnectOptions::from_str(&pg.url)?;
        let pool = PgPoolOptions::new()
            .max_connections(pg.max_connections)
            .acquire_timeout(Duration::from_millis(pg.acquire_timeout_ms))
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        let store = Self { pool };
        store.refresh_room_gauges().await;
        Ok(store)
    }

    /// Recount rooms by status. Metrics are best effort; a failed read is
    /// logged and skipped.
    async fn refresh_room_gauges(&self) {
        match sqlx::query_scalar::<_, String>("SELECT status FROM rooms")
            .fetch_all(&self.pool)
            .await
        {
            Ok(raw) => {
                let statuses: Vec<RoomStatus> = raw
                    .iter()
                    .filter_map(|value| RoomStatus::from_str(value).ok())
                    .collect();
                publish_room_gauges(statuses.iter());
            }
            Err(err) => tracing::warn!(error = %err, "failed to refresh room gauges"),
        }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        return db_err.code().is_some_and(|code| code == "23505");
    }
    false
}

/// Map a write error, turning a unique violation into a conflict.
fn write_error(err: sqlx::Error, conflict: &str) -> StoreError {
    if is_unique_violation(&err) {
        StoreError::Conflict(conflict.to_string())
    } else {
        err.into()
    }
}

fn ensure_affected(rows: u64, what: &str) -> StoreResult<()> {
    if rows == 0 {
        return Err(StoreError::NotFound(what.into()));
    }
    Ok(())
}

fn parse_enum<T>(value: &str) -> StoreResult<T>
where
    T: FromStr<Err = DomainError>,
{
    value
        .parse()
        .map_err(|err: DomainError| StoreError::Unexpected(err.into()))
}

fn parse_optional_enum<T>(value: Option<&str>) -> StoreResult<Option<T>>
where
    T: FromStr<Err = DomainError>,
{
    value.map(parse_enum).transpose()
}

fn to_u32(value: i32, column: &str) -> StoreResult<u32> {
    u32::try_from(value).map_err(|_| StoreError::Unexpected(anyhow!("negative {column}: {value}")))
}

fn to_i32(value: u32, column: &str) -> StoreResult<i32> {
    i32::try_from(value)
        .map_err(|_| StoreError::Unexpected(anyhow!("{column} out of range: {value}")))
}

fn live_booking_statuses() -> Vec<String> {
    BookingStatus::ALL
        .iter()
        .filter(|status| status.holds_inventory())
        .map(|status| status.as_str().to_string())
        .collect()
}

fn user_from_db(row: DbUser) -> StoreResult<User> {
    Ok(User {
        id: UserId::from_uuid(row.id),
        name: row.name,
        email: row.email,
        password_hash: row.password_hash,
        role: parse_enum(&row.role)?,
        department: parse_optional_enum(row.department.as_deref())?,
        status: parse_enum(&row.status)?,
        preferences: Preferences {
            theme: parse_enum(&row.theme)?,
            language: row.language,
            currency: row.currency,
        },
        contact: ContactInfo {
            phone: row.phone,
            address: row.address,
        },
        photo_url: row.photo_url,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn room_from_db(row: DbRoom) -> StoreResult<Room> {
    Ok(Room {
        id: RoomId::from_uuid(row.id),
        room_number: row.room_number,
        room_type: parse_enum(&row.room_type)?,
        floor: row.floor,
        price: row.price,
        beds: row.beds,
        status: parse_enum(&row.status)?,
        amenities: row.amenities,
        description: row.description,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn booking_from_db(row: DbBooking) -> StoreResult<Booking> {
    Ok(Booking {
        id: BookingId::from_uuid(row.id),
        guest_id: UserId::from_uuid(row.guest_id),
        room_id: RoomId::from_uuid(row.room_id),
        check_in: row.check_in,
        check_out: row.check_out,
        guests: to_u32(row.guests, "guests")?,
        status: parse_enum(&row.status)?,
        total_amount: row.total_amount,
        special_requests: row.special_requests,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn invoice_from_db(row: DbInvoice) -> StoreResult<Invoice> {
    Ok(Invoice {
        id: InvoiceId::from_uuid(row.id),
        booking_id: BookingId::from_uuid(row.booking_id),
        guest_id: UserId::from_uuid(row.guest_id),
        room_charges: row.room_charges,
        additional_services_charges: row.additional_services_charges,
        line_items: row.line_items.0,
        total_amount: row.total_amount,
        payment_status: parse_enum(&row.payment_status)?,
        issued_at: row.issued_at,
        paid_at: row.paid_at,
    })
}

fn task_from_db(row: DbTask) -> StoreResult<HousekeepingTask> {
    Ok(HousekeepingTask {
        id: TaskId::from_uuid(row.id),
        room_id: RoomId::from_uuid(row.room_id),
        assigned_to: row.assigned_to.map(UserId::from_uuid),
        kind: parse_enum(&row.kind)?,
        status: parse_enum(&row.status)?,
        notes: row.notes,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn maintenance_from_db(row: DbMaintenance) -> StoreResult<MaintenanceRequest> {
    Ok(MaintenanceRequest {
        id: MaintenanceId::from_uuid(row.id),
        room_id: RoomId::from_uuid(row.room_id),
        reported_by: UserId::from_uuid(row.reported_by),
        assigned_to: row.assigned_to.map(UserId::from_uuid),
        issue: row.issue,
        priority: parse_enum(&row.priority)?,
        status: parse_enum(&row.status)?,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn service_from_db(row: DbService) -> Service {
    Service {
        id: ServiceId::from_uuid(row.id),
        name: row.name,
        description: row.description,
        category: row.category,
        price: row.price,
        available: row.available,
    }
}

fn service_request_from_db(row: DbServiceRequest) -> StoreResult<ServiceRequest> {
    Ok(ServiceRequest {
        id: ServiceRequestId::from_uuid(row.id),
        guest_id: UserId::from_uuid(row.guest_id),
        service_id: ServiceId::from_uuid(row.service_id),
        booking_id: BookingId::from_uuid(row.booking_id),
        status: parse_enum(&row.status)?,
        notes: row.notes,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn collect<R, T>(rows: Vec<R>, convert: fn(R) -> StoreResult<T>) -> StoreResult<Vec<T>> {
    rows.into_iter().map(convert).collect()
}

#[async_trait]
impl HotelStore for PostgresStore {
    async fn create_user(&self, user: User) -> StoreResult<User> {
        sqlx::query(
            r#"INSERT INTO users (id, name, email, password_hash, role, department, status,
                   theme, language, currency, phone, address, photo_url, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)"#,
        )
        .bind(user.id.as_uuid())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.department.map(|department| department.as_str()))
        .bind(user.status.as_str())
        .bind(user.preferences.theme.as_str())
        .bind(&user.preferences.language)
        .bind(&user.preferences.currency)
        .bind(&user.contact.phone)
        .bind(&user.contact.address)
        .bind(&user.photo_url)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|err| write_error(err, "email already registered"))?;
        Ok(user)
    }

    async fn get_user(&self, id: UserId) -> StoreResult<User> {
        let row = sqlx::query_as::<_, DbUser>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound("user".into()))?;
        user_from_db(row)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        sqlx::query_as::<_, DbUser>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?
        .map(user_from_db)
        .transpose()
    }

    async fn list_users(&self, filter: &UserFilter) -> StoreResult<Vec<User>> {
        let rows = sqlx::query_as::<_, DbUser>(&format!(
            "SELECT {USER_COLUMNS} FROM users
             WHERE ($1::text IS NULL OR role = $1)
             ORDER BY created_at"
        ))
        .bind(filter.role.map(|role| role.as_str()))
        .fetch_all(&self.pool)
        .await?;
        collect(rows, user_from_db)
    }

    async fn update_user(&self, user: User) -> StoreResult<User> {
        let result = sqlx::query(
            r#"UPDATE users SET name = $2, email = $3, password_hash = $4, role = $5,
                   department = $6, status = $7, theme = $8, language = $9, currency = $10,
                   phone = $11, address = $12, photo_url = $13, updated_at = $14
               WHERE id = $1"#,
        )
        .bind(user.id.as_uuid())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.department.map(|department| department.as_str()))
        .bind(user.status.as_str())
        .bind(user.preferences.theme.as_str())
        .bind(&user.preferences.language)
        .bind(&user.preferences.currency)
        .bind(&user.contact.phone)
        .bind(&user.contact.address)
        .bind(&user.photo_url)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|err| write_error(err, "email already registered"))?;
        ensure_affected(result.rows_affected(), "user")?;
        Ok(user)
    }

    async fn delete_user(&self, id: UserId) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        ensure_affected(result.rows_affected(), "user")
    }

    async fn create_room(&self, room: Room) -> StoreResult<Room> {
        sqlx::query(
            r#"INSERT INTO rooms (id, room_number, room_type, floor, price, beds, status,
                   amenities, description, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)"#,
        )
        .bind(room.id.as_uuid())
        .bind(&room.room_number)
        .bind(room.room_type.as_str())
        .bind(room.floor)
        .bind(room.price)
        .bind(room.beds)
        .bind(room.status.as_str())
        .bind(&room.amenities)
        .bind(&room.description)
        .bind(room.created_at)
        .bind(room.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|err| write_error(err, "room number exists"))?;
        self.refresh_room_gauges().await;
        Ok(room)
    }

    async fn get_room(&self, id: RoomId) -> StoreResult<Room> {
        let row = sqlx::query_as::<_, DbRoom>(&format!(
            "SELECT {ROOM_COLUMNS} FROM rooms WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound("room".into()))?;
        room_from_db(row)
    }

    async fn list_rooms(&self, filter: &RoomFilter) -> StoreResult<Vec<Room>> {
        let rows = sqlx::query_as::<_, DbRoom>(&format!(
            "SELECT {ROOM_COLUMNS} FROM rooms
             WHERE ($1::text IS NULL OR room_type = $1)
               AND ($2::text IS NULL OR status = $2)
             ORDER BY room_number"
        ))
        .bind(filter.room_type.map(|kind| kind.as_str()))
        .bind(filter.status.map(|status| status.as_str()))
        .fetch_all(&self.pool)
        .await?;
        collect(rows, room_from_db)
    }

    async fn update_room(&self, room: Room) -> StoreResult<Room> {
        let result = sqlx::query(
            r#"UPDATE rooms SET room_number = $2, room_type = $3, floor = $4, price = $5,
                   beds = $6, status = $7, amenities = $8, description = $9, updated_at = $10
               WHERE id = $1"#,
        )
        .bind(room.id.as_uuid())
        .bind(&room.room_number)
        .bind(room.room_type.as_str())
        .bind(room.floor)
        .bind(room.price)
        .bind(room.beds)
        .bind(room.status.as_str())
        .bind(&room.amenities)
        .bind(&room.description)
        .bind(room.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|err| write_error(err, "room number exists"))?;
        ensure_affected(result.rows_affected(), "room")?;
        self.refresh_room_gauges().await;
        Ok(room)
    }

    async fn set_room_status(&self, id: RoomId, status: RoomStatus) -> StoreResult<Room> {
        let row = sqlx::query_as::<_, DbRoom>(&format!(
            "UPDATE rooms SET status = $2, updated_at = $3 WHERE id = $1 RETURNING {ROOM_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .bind(status.as_str())
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound("room".into()))?;
        self.refresh_room_gauges().await;
        room_from_db(row)
    }

    async fn delete_room(&self, id: RoomId) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM rooms WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        ensure_affected(result.rows_affected(), "room")?;
        self.refresh_room_gauges().await;
        Ok(())
    }

    async fn create_booking(
        &self,
        booking: Booking,
        reject_overlap: bool,
    ) -> StoreResult<Booking> {
        let mut tx = self.pool.begin().await?;
        if reject_overlap {
            sqlx::query("SELECT id FROM rooms WHERE id = $1 FOR UPDATE")
                .bind(booking.room_id.as_uuid())
                .fetch_optional(&mut *tx)
                .await?;
            let clash: bool = sqlx::query_scalar(
                r#"SELECT EXISTS (
                       SELECT 1 FROM bookings
                       WHERE room_id = $1 AND status = ANY($2)
                         AND check_in < $4 AND $3 < check_out
                   )"#,
            )
            .bind(booking.room_id.as_uuid())
            .bind(live_booking_statuses())
            .bind(booking.check_in)
            .bind(booking.check_out)
            .fetch_one(&mut *tx)
            .await?;
            if clash {
                return Err(StoreError::Conflict(
                    "room already booked for these dates".into(),
                ));
            }
        }
        sqlx::query(
            r#"INSERT INTO bookings (id, guest_id, room_id, check_in, check_out, guests, status,
                   total_amount, special_requests, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)"#,
        )
        .bind(booking.id.as_uuid())
        .bind(booking.guest_id.as_uuid())
        .bind(booking.room_id.as_uuid())
        .bind(booking.check_in)
        .bind(booking.check_out)
        .bind(to_i32(booking.guests, "guests")?)
        .bind(booking.status.as_str())
        .bind(booking.total_amount)
        .bind(&booking.special_requests)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(booking)
    }

    async fn get_booking(&self, id: BookingId) -> StoreResult<Booking> {
        let row = sqlx::query_as::<_, DbBooking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound("booking".into()))?;
        booking_from_db(row)
    }

    async fn list_bookings(&self, filter: &BookingFilter) -> StoreResult<Vec<Booking>> {
        let rows = sqlx::query_as::<_, DbBooking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings
             WHERE ($1::uuid IS NULL OR guest_id = $1)
               AND ($2::uuid IS NULL OR room_id = $2)
               AND ($3::text IS NULL OR status = $3)
             ORDER BY check_in DESC, created_at DESC"
        ))
        .bind(filter.guest_id.map(|id| id.as_uuid()))
        .bind(filter.room_id.map(|id| id.as_uuid()))
        .bind(filter.status.map(|status| status.as_str()))
        .fetch_all(&self.pool)
        .await?;
        collect(rows, booking_from_db)
    }

    async fn update_booking(&self, booking: Booking) -> StoreResult<Booking> {
        let result = sqlx::query(
            r#"UPDATE bookings SET guest_id = $2, room_id = $3, check_in = $4, check_out = $5,
                   guests = $6, status = $7, total_amount = $8, special_requests = $9,
                   updated_at = $10
               WHERE id = $1"#,
        )
        .bind(booking.id.as_uuid())
        .bind(booking.guest_id.as_uuid())
        .bind(booking.room_id.as_uuid())
        .bind(booking.check_in)
        .bind(booking.check_out)
        .bind(to_i32(booking.guests, "guests")?)
        .bind(booking.status.as_str())
        .bind(booking.total_amount)
        .bind(&booking.special_requests)
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await?;
        ensure_affected(result.rows_affected(), "booking")?;
        Ok(booking)
    }

    async fn delete_booking(&self, id: BookingId) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        ensure_affected(result.rows_affected(), "booking")
    }

    async fn booked_room_ids(&self, stay: &StayRange) -> StoreResult<Vec<RoomId>> {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            r#"SELECT DISTINCT room_id FROM bookings
               WHERE status = ANY($1) AND check_in < $3 AND $2 < check_out
               ORDER BY room_id"#,
        )
        .bind(live_booking_statuses())
        .bind(stay.check_in())
        .bind(stay.check_out())
        .fetch_all(&self.pool)
        .await?;
        Ok(ids.into_iter().map(RoomId::from_uuid).collect())
    }

    async fn create_invoice(&self, invoice: Invoice) -> StoreResult<Invoice> {
        sqlx::query(
            r#"INSERT INTO invoices (id, booking_id, guest_id, room_charges,
                   additional_services_charges, line_items, total_amount, payment_status,
                   issued_at, paid_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)"#,
        )
        .bind(invoice.id.as_uuid())
        .bind(invoice.booking_id.as_uuid())
        .bind(invoice.guest_id.as_uuid())
        .bind(invoice.room_charges)
        .bind(invoice.additional_services_charges)
        .bind(Json(&invoice.line_items))
        .bind(invoice.total_amount)
        .bind(invoice.payment_status.as_str())
        .bind(invoice.issued_at)
        .bind(invoice.paid_at)
        .execute(&self.pool)
        .await
        .map_err(|err| write_error(err, "invoice exists for booking"))?;
        Ok(invoice)
    }

    async fn get_invoice(&self, id: InvoiceId) -> StoreResult<Invoice> {
        let row = sqlx::query_as::<_, DbInvoice>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound("invoice".into()))?;
        invoice_from_db(row)
    }

    async fn list_invoices(&self, filter: &InvoiceFilter) -> StoreResult<Vec<Invoice>> {
        let rows = sqlx::query_as::<_, DbInvoice>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices
             WHERE ($1::uuid IS NULL OR guest_id = $1)
               AND ($2::uuid IS NULL OR booking_id = $2)
             ORDER BY issued_at DESC"
        ))
        .bind(filter.guest_id.map(|id| id.as_uuid()))
        .bind(filter.booking_id.map(|id| id.as_uuid()))
        .fetch_all(&self.pool)
        .await?;
        collect(rows, invoice_from_db)
    }

    async fn update_invoice(&self, invoice: Invoice) -> StoreResult<Invoice> {
        let result = sqlx::query(
            r#"UPDATE invoices SET room_charges = $2, additional_services_charges = $3,
                   line_items = $4, total_amount = $5, payment_status = $6, paid_at = $7
               WHERE id = $1"#,
        )
        .bind(invoice.id.as_uuid())
        .bind(invoice.room_charges)
        .bind(invoice.additional_services_charges)
        .bind(Json(&invoice.line_items))
        .bind(invoice.total_amount)
        .bind(invoice.payment_status.as_str())
        .bind(invoice.paid_at)
        .execute(&self.pool)
        .await?;
        ensure_affected(result.rows_affected(), "invoice")?;
        Ok(invoice)
    }

    async fn delete_invoice(&self, id: InvoiceId) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        ensure_affected(result.rows_affected(), "invoice")
    }

    async fn create_task(&self, task: HousekeepingTask) -> StoreResult<HousekeepingTask> {
        sqlx::query(
            r#"INSERT INTO housekeeping_tasks (id, room_id, assigned_to, kind, status, notes,
                   created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"#,
        )
        .bind(task.id.as_uuid())
        .bind(task.room_id.as_uuid())
        .bind(task.assigned_to.map(|id| id.as_uuid()))
        .bind(task.kind.as_str())
        .bind(task.status.as_str())
        .bind(&task.notes)
        .bind(task.created_at)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(task)
    }

    async fn get_task(&self, id: TaskId) -> StoreResult<HousekeepingTask> {
        let row = sqlx::query_as::<_, DbTask>(&format!(
            "SELECT {TASK_COLUMNS} FROM housekeeping_tasks WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound("housekeeping task".into()))?;
        task_from_db(row)
    }

    async fn list_tasks(&self, filter: &TaskFilter) -> StoreResult<Vec<HousekeepingTask>> {
        let rows = sqlx::query_as::<_, DbTask>(&format!(
            "SELECT {TASK_COLUMNS} FROM housekeeping_tasks
             WHERE ($1::text IS NULL OR status = $1)
               AND ($2::uuid IS NULL OR assigned_to = $2)
               AND ($3::uuid IS NULL OR room_id = $3)
             ORDER BY created_at DESC"
        ))
        .bind(filter.status.map(|status| status.as_str()))
        .bind(filter.assigned_to.map(|id| id.as_uuid()))
        .bind(filter.room_id.map(|id| id.as_uuid()))
        .fetch_all(&self.pool)
        .await?;
        collect(rows, task_from_db)
    }

    async fn update_task(&self, task: HousekeepingTask) -> StoreResult<HousekeepingTask> {
        let result = sqlx::query(
            r#"UPDATE housekeeping_tasks SET room_id = $2, assigned_to = $3, kind = $4,
                   status = $5, notes = $6, updated_at = $7
               WHERE id = $1"#,
        )
        .bind(task.id.as_uuid())
        .bind(task.room_id.as_uuid())
        .bind(task.assigned_to.map(|id| id.as_uuid()))
        .bind(task.kind.as_str())
        .bind(task.status.as_str())
        .bind(&task.notes)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await?;
        ensure_affected(result.rows_affected(), "housekeeping task")?;
        Ok(task)
    }

    async fn delete_task(&self, id: TaskId) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM housekeeping_tasks WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        ensure_affected(result.rows_affected(), "housekeeping task")
    }

    async fn create_maintenance(
        &self,
        request: MaintenanceRequest,
    ) -> StoreResult<MaintenanceRequest> {
        sqlx::query(
            r#"INSERT INTO maintenance_requests (id, room_id, reported_by, assigned_to, issue,
                   priority, status, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)"#,
        )
        .bind(request.id.as_uuid())
        .bind(request.room_id.as_uuid())
        .bind(request.reported_by.as_uuid())
        .bind(request.assigned_to.map(|id| id.as_uuid()))
        .bind(&request.issue)
        .bind(request.priority.as_str())
        .bind(request.status.as_str())
        .bind(request.created_at)
        .bind(request.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(request)
    }

    async fn get_maintenance(&self, id: MaintenanceId) -> StoreResult<MaintenanceRequest> {
        let row = sqlx::query_as::<_, DbMaintenance>(&format!(
            "SELECT {MAINTENANCE_COLUMNS} FROM maintenance_requests WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound("maintenance request".into()))?;
        maintenance_from_db(row)
    }

    async fn list_maintenance(
        &self,
        filter: &MaintenanceFilter,
    ) -> StoreResult<Vec<MaintenanceRequest>> {
        let rows = sqlx::query_as::<_, DbMaintenance>(&format!(
            "SELECT {MAINTENANCE_COLUMNS} FROM maintenance_requests
             WHERE ($1::text IS NULL OR status = $1)
               AND ($2::uuid IS NULL OR assigned_to = $2)
               AND ($3::uuid IS NULL OR room_id = $3)
             ORDER BY created_at DESC"
        ))
        .bind(filter.status.map(|status| status.as_str()))
        .bind(filter.assigned_to.map(|id| id.as_uuid()))
        .bind(filter.room_id.map(|id| id.as_uuid()))
        .fetch_all(&self.pool)
        .await?;
        collect(rows, maintenance_from_db)
    }

    async fn update_maintenance(
        &self,
        request: MaintenanceRequest,
    ) -> StoreResult<MaintenanceRequest> {
        let result = sqlx::query(
            r#"UPDATE maintenance_requests SET room_id = $2, reported_by = $3, assigned_to = $4,
                   issue = $5, priority = $6, status = $7, updated_at = $8
               WHERE id = $1"#,
        )
        .bind(request.id.as_uuid())
        .bind(request.room_id.as_uuid())
        .bind(request.reported_by.as_uuid())
        .bind(request.assigned_to.map(|id| id.as_uuid()))
        .bind(&request.issue)
        .bind(request.priority.as_str())
        .bind(request.status.as_str())
        .bind(request.updated_at)
        .execute(&self.pool)
        .await?;
        ensure_affected(result.rows_affected(), "maintenance request")?;
        Ok(request)
    }

    async fn delete_maintenance(&self, id: MaintenanceId) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM maintenance_requests WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        ensure_affected(result.rows_affected(), "maintenance request")
    }

    async fn create_service(&self, service: Service) -> StoreResult<Service> {
        sqlx::query(
            r#"INSERT INTO services (id, name, description, category, price, available)
               VALUES ($1, $2, $3, $4, $5, $6)"#,
        )
        .bind(service.id.as_uuid())
        .bind(&service.name)
        .bind(&service.description)
        .bind(&service.category)
        .bind(service.price)
        .bind(service.available)
        .execute(&self.pool)
        .await?;
        Ok(service)
    }

    async fn get_service(&self, id: ServiceId) -> StoreResult<Service> {
        let row = sqlx::query_as::<_, DbService>(&format!(
            "SELECT {SERVICE_COLUMNS} FROM services WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound("service".into()))?;
        Ok(service_from_db(row))
    }

    async fn list_services(&self) -> StoreResult<Vec<Service>> {
        let rows = sqlx::query_as::<_, DbService>(&format!(
            "SELECT {SERVICE_COLUMNS} FROM services ORDER BY category, name"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(service_from_db).collect())
    }

    async fn update_service(&self, service: Service) -> StoreResult<Service> {
        let result = sqlx::query(
            r#"UPDATE services SET name = $2, description = $3, category = $4, price = $5,
                   available = $6
               WHERE id = $1"#,
        )
        .bind(service.id.as_uuid())
        .bind(&service.name)
        .bind(&service.description)
        .bind(&service.category)
        .bind(service.price)
        .bind(service.available)
        .execute(&self.pool)
        .await?;
        ensure_affected(result.rows_affected(), "service")?;
        Ok(service)
    }

    async fn delete_service(&self, id: ServiceId) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM services WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        ensure_affected(result.rows_affected(), "service")
    }

    async fn create_service_request(
        &self,
        request: ServiceRequest,
    ) -> StoreResult<ServiceRequest> {
        sqlx::query(
            r#"INSERT INTO service_requests (id, guest_id, service_id, booking_id, status, notes,
                   created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"#,
        )
        .bind(request.id.as_uuid())
        .bind(request.guest_id.as_uuid())
        .bind(request.service_id.as_uuid())
        .bind(request.booking_id.as_uuid())
        .bind(request.status.as_str())
        .bind(&request.notes)
        .bind(request.created_at)
        .bind(request.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(request)
    }

    async fn get_service_request(&self, id: ServiceRequestId) -> StoreResult<ServiceRequest> {
        let row = sqlx::query_as::<_, DbServiceRequest>(&format!(
            "SELECT {SERVICE_REQUEST_COLUMNS} FROM service_requests WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound("service request".into()))?;
        service_request_from_db(row)
    }

    async fn list_service_requests(
        &self,
        filter: &ServiceRequestFilter,
    ) -> StoreResult<Vec<ServiceRequest>> {
        let rows = sqlx::query_as::<_, DbServiceRequest>(&format!(
            "SELECT {SERVICE_REQUEST_COLUMNS} FROM service_requests
             WHERE ($1::uuid IS NULL OR guest_id = $1)
               AND ($2::uuid IS NULL OR booking_id = $2)
               AND ($3::text IS NULL OR status = $3)
             ORDER BY created_at DESC"
        ))
        .bind(filter.guest_id.map(|id| id.as_uuid()))
        .bind(filter.booking_id.map(|id| id.as_uuid()))
        .bind(filter.status.map(|status| status.as_str()))
        .fetch_all(&self.pool)
        .await?;
        collect(rows, service_request_from_db)
    }

    async fn update_service_request(
        &self,
        request: ServiceRequest,
    ) -> StoreResult<ServiceRequest> {
        let result = sqlx::query(
            r#"UPDATE service_requests SET status = $2, notes = $3, updated_at = $4
               WHERE id = $1"#,
        )
        .bind(request.id.as_uuid())
        .bind(request.status.as_str())
        .bind(&request.notes)
        .bind(request.updated_at)
        .execute(&self.pool)
        .await?;
        ensure_affected(result.rows_affected(), "service request")?;
        Ok(request)
    }

    async fn get_settings(&self) -> StoreResult<HotelSettings> {
        let row = sqlx::query_as::<_, DbSettings>(
            r#"SELECT hotel_name, currency, tax_rate, check_in_time, check_out_time, updated_at
               FROM hotel_settings WHERE id = $1"#,
        )
        .bind(SETTINGS_ROW_ID)
        .fetch_optional(&self.pool)
        .await?;
        Ok(match row {
            Some(row) => HotelSettings {
                hotel_name: row.hotel_name,
                currency: row.currency,
                tax_rate: row.tax_rate,
                check_in_time: row.check_in_time,
                check_out_time: row.check_out_time,
                updated_at: Some(row.updated_at),
            },
            None => HotelSettings::default(),
        })
    }

    async fn put_settings(&self, settings: HotelSettings) -> StoreResult<HotelSettings> {
        let updated_at = settings.updated_at.unwrap_or_else(Utc::now);
        sqlx::query(
            r#"INSERT INTO hotel_settings (id, hotel_name, currency, tax_rate, check_in_time,
                   check_out_time, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               ON CONFLICT (id) DO UPDATE SET
                   hotel_name = EXCLUDED.hotel_name,
                   currency = EXCLUDED.currency,
                   tax_rate = EXCLUDED.tax_rate,
                   check_in_time = EXCLUDED.check_in_time,
                   check_out_time = EXCLUDED.check_out_time,
                   updated_at = EXCLUDED.updated_at"#,
        )
        .bind(SETTINGS_ROW_ID)
        .bind(&settings.hotel_name)
        .bind(&settings.currency)
        .bind(settings.tax_rate)
        .bind(&settings.check_in_time)
        .bind(&settings.check_out_time)
        .bind(updated_at)
        .execute(&self.pool)
        .await?;
        Ok(HotelSettings {
            updated_at: Some(updated_at),
            ..settings
        })
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn is_durable(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lodge_core::{Role, UserStatus};

    #[test]
    fn stored_strings_parse_back_into_enums() {
        let role: Role = parse_enum("staff").expect("role");
        assert_eq!(role, Role::Staff);
        let status: Option<UserStatus> = parse_optional_enum(Some("pending")).expect("status");
        assert_eq!(status, Some(UserStatus::Pending));
        let none: Option<UserStatus> = parse_optional_enum(None).expect("none");
        assert!(none.is_none());
        assert!(matches!(
            parse_enum::<Role>("owner"),
            Err(StoreError::Unexpected(_))
        ));
    }

    #[test]
    fn only_live_statuses_block_rooms() {
        let statuses = live_booking_statuses();
        assert_eq!(statuses, vec!["confirmed".to_string(), "checked-in".to_string()]);
    }

    #[test]
    fn counts_must_fit_their_columns() {
        assert_eq!(to_u32(3, "guests").expect("fits"), 3);
        assert!(to_u32(-1, "guests").is_err());
        assert!(to_i32(u32::MAX, "guests").is_err());
    }

    #[test]
    fn zero_affected_rows_is_not_found() {
        assert!(matches!(
            ensure_affected(0, "room"),
            Err(StoreError::NotFound(_))
        ));
        assert!(ensure_affected(1, "room").is_ok());
    }
}
