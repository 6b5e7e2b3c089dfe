//! Opaque ID newtypes for clusters and nets.
//!
//! [`ClusterId`] and [`NetId`] are thin `u32` wrappers. They are `Copy`,
//! `Ord` (so placements iterate deterministically), and serializable.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` value.
            pub const fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` value.
            pub const fn as_raw(self) -> u32 {
                self.0
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
    /// Stable identifier of a cluster (a pre-grouped set of netlist blocks).
    ClusterId
);

define_id!(
    /// Identifier of a collapsed, cluster-level net.
    NetId
);
