//! Opaque record identifiers.
//!
//! Identifiers travel as strings but must parse as UUIDs. Each collection gets
//! its own newtype so a trip id can never be passed where a user id is
//! expected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors raised when parsing an identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdValidationError {
    /// The identifier was empty.
    #[error("{kind} id must not be empty")]
    Empty {
        /// Record kind the identifier refers to.
        kind: &'static str,
    },
    /// The identifier was not a UUID.
    #[error("{kind} id must be a valid UUID, got `{value}`")]
    Malformed {
        /// Record kind the identifier refers to.
        kind: &'static str,
        /// Offending input.
        value: String,
    },
}

impl IdValidationError {
    /// Record kind the rejected identifier referred to.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Empty { kind } | Self::Malformed { kind, .. } => *kind,
        }
    }

    /// Input that was rejected. Empty for [`Self::Empty`].
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Empty { .. } => "",
            Self::Malformed { value, .. } => value.as_str(),
        }
    }
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident => $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(Uuid);

        impl $name {
            /// Record kind used in error messages.
            pub const KIND: &'static str = $kind;

            /// Validate and construct an identifier from borrowed input.
            pub fn new(id: impl AsRef<str>) -> Result<Self, IdValidationError> {
                let raw = id.as_ref();
                if raw.is_empty() {
                    return Err(IdValidationError::Empty { kind: Self::KIND });
                }
                if raw.trim() != raw {
                    return Err(IdValidationError::Malformed {
                        kind: Self::KIND,
                        value: raw.to_owned(),
                    });
                }
                Uuid::parse_str(raw)
                    .map(Self)
                    .map_err(|_| IdValidationError::Malformed {
                        kind: Self::KIND,
                        value: raw.to_owned(),
                    })
            }

            /// Generate a fresh random identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Access the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = IdValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = IdValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0.to_string()
            }
        }
    };
}

define_id! {
    /// Identifier of a registered user.
    UserId => "user"
}

define_id! {
    /// Identifier of a car-share group.
    CarShareId => "car-share"
}

define_id! {
    /// Identifier of a recorded trip.
    TripId => "trip"
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn parses_canonical_uuid() {
        let id = TripId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
        assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }

    #[rstest]
    #[case("", IdValidationError::Empty { kind: "user" })]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", IdValidationError::Malformed {
        kind: "user",
        value: " 3fa85f64-5717-4562-b3fc-2c963f66afa6".to_owned(),
    })]
    #[case("not-a-uuid", IdValidationError::Malformed {
        kind: "user",
        value: "not-a-uuid".to_owned(),
    })]
    fn rejects_invalid_input(#[case] raw: &str, #[case] expected: IdValidationError) {
        assert_eq!(UserId::new(raw), Err(expected));
    }

    #[rstest]
    fn error_names_the_record_kind() {
        let err = CarShareId::new("nope").expect_err("malformed");
        assert_eq!(err.kind(), "car-share");
        assert!(err.to_string().contains("car-share id"));
    }

    #[rstest]
    fn serde_uses_plain_strings() {
        let id = UserId::random();
        let encoded = serde_json::to_value(id).expect("serialises");
        assert_eq!(encoded, serde_json::Value::String(id.to_string()));

        let decoded: UserId = serde_json::from_value(encoded).expect("deserialises");
        assert_eq!(decoded, id);
    }
}
