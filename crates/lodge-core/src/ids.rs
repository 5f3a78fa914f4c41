//! UUID-backed identifiers for every stored record.
//!
//! Each id is its own type so a `RoomId` can never be passed where a
//! `BookingId` is expected. They serialize as bare UUID strings.
use crate::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! id_type {
    ($name:ident) => {
        #[derive(
            Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize, utoipa::ToSchema,
        )]
        #[serde(transparent)]
        #[schema(value_type = String, format = Uuid)]
        pub struct $name(Uuid);

        impl $name {
            // Fresh random id for a new record.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            // Wrap a UUID read back from storage.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(input: &str) -> Result<Self, Self::Err> {
                let uuid = Uuid::parse_str(input).map_err(|_| DomainError::UnknownValue {
                    kind: stringify!($name),
                    value: input.to_string(),
                })?;
                Ok(Self(uuid))
            }
        }
    };
}

id_type!(UserId);
id_type!(RoomId);
id_type!(BookingId);
id_type!(InvoiceId);
id_type!(TaskId);
id_type!(MaintenanceId);
id_type!(ServiceId);
id_type!(ServiceRequestId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_strings() {
        let id = RoomId::new();
        let parsed: RoomId = id.to_string().parse().expect("parse");
        assert_eq!(parsed, id);
        assert_eq!(parsed.as_uuid(), id.as_uuid());
    }

    #[test]
    fn ids_serialize_as_plain_uuid() {
        let uuid = Uuid::new_v4();
        let id = BookingId::from_uuid(uuid);
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, format!("\"{uuid}\""));
    }

    #[test]
    fn malformed_id_is_rejected() {
        let err = "not-a-uuid".parse::<UserId>().unwrap_err();
        assert!(matches!(err, DomainError::UnknownValue { kind: "UserId", .. }));
    }
}
