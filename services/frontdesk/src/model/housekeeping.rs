use chrono::{DateTime, Utc};
use lodge_core::ids::{RoomId, TaskId, UserId};
use lodge_core::{HousekeepingStatus, TaskKind};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct HousekeepingTask {
    pub id: TaskId,
    pub room_id: RoomId,
    pub assigned_to: Option<UserId>,
    pub kind: TaskKind,
    pub status: HousekeepingStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
