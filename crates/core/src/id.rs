//! Strongly-typed identifiers used across the domain.
//!
//! Identifiers are store-assigned 64-bit integers. Newtypes keep an event id
//! from ever being passed where a rider id is expected.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a registered user (the token subject).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

/// Identifier of a race event.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(i64);

/// Identifier of a rider.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiderId(i64);

/// Identifier of an attendance row (event ↔ rider).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttendeeId(i64);

macro_rules! impl_int_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<i64> for $t {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$t> for i64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            /// Parses a path segment. Only strictly positive integers are ids.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value: i64 = s
                    .trim()
                    .parse()
                    .map_err(|_| DomainError::validation(format!("invalid {}: {s:?}", $name)))?;
                if value <= 0 {
                    return Err(DomainError::validation(format!("invalid {}: {s:?}", $name)));
                }
                Ok(Self(value))
            }
        }
    };
}

impl_int_newtype!(UserId, "user id");
impl_int_newtype!(EventId, "event id");
impl_int_newtype!(RiderId, "rider id");
impl_int_newtype!(AttendeeId, "attendee id");

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_positive_ids() {
        assert_eq!("42".parse::<EventId>().unwrap(), EventId::new(42));
        assert_eq!(" 7 ".parse::<RiderId>().unwrap().get(), 7);
    }

    #[test]
    fn rejects_zero_negative_and_garbage() {
        for raw in ["0", "-3", "abc", "", "1.5"] {
            let err = raw.parse::<EventId>().unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)), "{raw:?} -> {err:?}");
        }
    }

    #[test]
    fn serializes_as_bare_integer() {
        let json = serde_json::to_string(&UserId::new(9)).unwrap();
        assert_eq!(json, "9");
    }

    proptest! {
        #[test]
        fn display_then_parse_is_identity(n in 1i64..i64::MAX) {
            let id = RiderId::new(n);
            prop_assert_eq!(id.to_string().parse::<RiderId>().unwrap(), id);
        }
    }
}
