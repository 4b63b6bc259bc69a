//! Typed identifiers issued by the identity/data service.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::domain::{DomainError, ValidationKind};

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Wraps a UUID, rejecting the nil UUID.
            pub fn new(id: Uuid) -> Result<Self, DomainError> {
                if id.is_nil() {
                    return Err(DomainError::validation(
                        ValidationKind::NilIdentifier,
                        concat!(stringify!($name), " must not be nil"),
                    ));
                }
                Ok(Self(id))
            }

            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            pub fn is_nil(&self) -> bool {
                self.0.is_nil()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let id = Uuid::parse_str(s.trim()).map_err(|e| {
                    DomainError::validation(
                        ValidationKind::NilIdentifier,
                        format!(concat!("invalid ", stringify!($name), " '{}': {}"), s, e),
                    )
                })?;
                Self::new(id)
            }
        }
    };
}

uuid_id!(
    /// Stable user identifier (the identity service's subject).
    UserId
);
uuid_id!(
    /// Owning-company identifier.
    CompanyId
);
uuid_id!(ExpenseId);
