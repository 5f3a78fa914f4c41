string_enum! {
    RoomType {
        Single => "single",
        Double => "double",
        Suite => "suite",
        Deluxe => "deluxe",
    }
}

string_enum! {
    /// Occupancy state of a room. Other workflows push rooms between these.
    RoomStatus {
        Available => "available",
        Occupied => "occupied",
        Cleaning => "cleaning",
        Maintenance => "maintenance",
    }
}

impl RoomStatus {
    /// Counts toward the occupancy rate in reports.
    pub fn is_occupied(self) -> bool {
        self == RoomStatus::Occupied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_lists_every_status_once() {
        assert_eq!(RoomStatus::ALL.len(), 4);
        assert_eq!(
            RoomStatus::ALL
                .iter()
                .filter(|status| status.is_occupied())
                .count(),
            1
        );
    }
}
