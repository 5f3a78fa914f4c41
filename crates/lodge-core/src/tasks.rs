//! Housekeeping, maintenance and guest service-request workflows.
//!
//! All three are forward-only status enums advanced by staff. Housekeeping
//! and maintenance also push the room they concern into a new status.
use crate::{DomainError, DomainResult, RoomStatus};

string_enum! {
    HousekeepingStatus {
        Pending => "pending",
        InProgress => "in-progress",
        Completed => "completed",
    }
}

string_enum! {
    TaskKind {
        Cleaning => "cleaning",
        Restocking => "restocking",
        Inspection => "inspection",
    }
}

string_enum! {
    MaintenanceStatus {
        Open => "open",
        InProgress => "in-progress",
        Resolved => "resolved",
    }
}

string_enum! {
    MaintenancePriority {
        Low => "low",
        Medium => "medium",
        High => "high",
        Urgent => "urgent",
    }
}

string_enum! {
    ServiceRequestStatus {
        Pending => "pending",
        InProgress => "in-progress",
        Completed => "completed",
        Canceled => "canceled",
    }
}

fn refuse<T: std::fmt::Display>(kind: &'static str, from: T, to: T) -> DomainError {
    DomainError::InvalidStatusTransition {
        kind,
        from: from.to_string(),
        to: to.to_string(),
    }
}

impl HousekeepingStatus {
    pub fn transition(self, next: HousekeepingStatus) -> DomainResult<HousekeepingStatus> {
        use HousekeepingStatus::*;
        match (self, next) {
            (Pending, InProgress) | (Pending, Completed) | (InProgress, Completed) => Ok(next),
            _ => Err(refuse("housekeeping task", self, next)),
        }
    }

    pub fn room_effect(self) -> Option<RoomStatus> {
        match self {
            HousekeepingStatus::Completed => Some(RoomStatus::Available),
            _ => None,
        }
    }
}

impl MaintenanceStatus {
    pub fn transition(self, next: MaintenanceStatus) -> DomainResult<MaintenanceStatus> {
        use MaintenanceStatus::*;
        match (self, next) {
            (Open, InProgress) | (Open, Resolved) | (InProgress, Resolved) => Ok(next),
            _ => Err(refuse("maintenance request", self, next)),
        }
    }

    pub fn room_effect(self) -> Option<RoomStatus> {
        match self {
            MaintenanceStatus::InProgress => Some(RoomStatus::Maintenance),
            MaintenanceStatus::Resolved => Some(RoomStatus::Available),
            MaintenanceStatus::Open => None,
        }
    }

    pub fn is_open(self) -> bool {
        self != MaintenanceStatus::Resolved
    }
}

impl ServiceRequestStatus {
    pub fn transition(self, next: ServiceRequestStatus) -> DomainResult<ServiceRequestStatus> {
        use ServiceRequestStatus::*;
        match (self, next) {
            (Pending, InProgress)
            | (Pending, Completed)
            | (InProgress, Completed)
            | (Pending, Canceled)
            | (InProgress, Canceled) => Ok(next),
            _ => Err(refuse("service request", self, next)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn housekeeping_moves_forward_and_frees_the_room() {
        let started = HousekeepingStatus::Pending
            .transition(HousekeepingStatus::InProgress)
            .unwrap();
        let done = started.transition(HousekeepingStatus::Completed).unwrap();
        assert_eq!(done.room_effect(), Some(RoomStatus::Available));
        assert_eq!(started.room_effect(), None);
        assert!(done.transition(HousekeepingStatus::Pending).is_err());
        assert!(
            HousekeepingStatus::Pending
                .transition(HousekeepingStatus::Pending)
                .is_err()
        );
    }

    #[test]
    fn maintenance_room_effects() {
        let working = MaintenanceStatus::Open
            .transition(MaintenanceStatus::InProgress)
            .unwrap();
        assert_eq!(working.room_effect(), Some(RoomStatus::Maintenance));
        let fixed = working.transition(MaintenanceStatus::Resolved).unwrap();
        assert_eq!(fixed.room_effect(), Some(RoomStatus::Available));
        assert!(!fixed.is_open());
        assert!(fixed.transition(MaintenanceStatus::Open).is_err());
        assert!(
            MaintenanceStatus::Open
                .transition(MaintenanceStatus::Resolved)
                .is_ok()
        );
    }

    #[test]
    fn service_requests_cancel_until_completed() {
        assert!(
            ServiceRequestStatus::InProgress
                .transition(ServiceRequestStatus::Canceled)
                .is_ok()
        );
        assert!(
            ServiceRequestStatus::Completed
                .transition(ServiceRequestStatus::Canceled)
                .is_err()
        );
        assert!(
            ServiceRequestStatus::Canceled
                .transition(ServiceRequestStatus::Pending)
                .is_err()
        );
    }
}
