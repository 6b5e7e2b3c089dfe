//! Shared foundational types used across the quarry placement toolchain.
//!
//! This crate provides grid geometry primitives shared by the placer and the
//! diagnostics layer, plus the common internal-error result type.

#![warn(missing_docs)]

pub mod region;
pub mod result;

pub use region::{GridPos, Region};
pub use result::{InternalError, QuarryResult};
