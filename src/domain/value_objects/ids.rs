//! # Identifier Types
//!
//! Newtype wrappers around database identifiers.
//!
//! Each aggregate gets its own id type so a [`UserId`] can never be passed
//! where a [`ProductId`] is expected. All ids wrap the relational store's
//! `BIGINT` primary key.
//!
//! # Examples
//!
//! ```
//! use pari_backoffice::domain::value_objects::ids::ProductId;
//!
//! let id = ProductId::new(42);
//! assert_eq!(id.value(), 42);
//! assert_eq!(id.to_string(), "42");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! define_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw database identifier.
            #[inline]
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the raw identifier value.
            #[inline]
            #[must_use]
            pub const fn value(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }
    };
}

define_id!(
    /// Identifier of a registered user.
    UserId
);
define_id!(
    /// Identifier of a role.
    RoleId
);
define_id!(
    /// Identifier of a company (tenant).
    CompanyId
);
define_id!(
    /// Identifier of a giro lookup record.
    GiroId
);
define_id!(
    /// Identifier of a catalog product.
    ProductId
);
define_id!(
    /// Identifier of a pre-order transaction.
    PreOrderId
);
define_id!(
    /// Identifier of an approval join record.
    ApprovalId
);
