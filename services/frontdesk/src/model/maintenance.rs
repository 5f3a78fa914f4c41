use chrono::{DateTime, Utc};
use lodge_core::ids::{MaintenanceId, RoomId, UserId};
use lodge_core::{MaintenancePriority, MaintenanceStatus};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct MaintenanceRequest {
    pub id: MaintenanceId,
    pub room_id: RoomId,
    pub reported_by: UserId,
    pub assigned_to: Option<UserId>,
    pub issue: String,
    pub priority: MaintenancePriority,
    pub status: MaintenanceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
