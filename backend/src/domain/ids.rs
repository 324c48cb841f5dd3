//! Server-assigned numeric identifiers.
//!
//! Identifiers are allocated by the relational store and are never chosen by
//! clients, so the newtypes carry no validation beyond the integer itself.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw identifier.
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Raw identifier value.
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Category primary key.
    CategoryId
);
define_id!(
    /// Product primary key.
    ProductId
);
define_id!(
    /// Order primary key.
    OrderId
);
define_id!(
    /// Order detail primary key.
    OrderDetailId
);
