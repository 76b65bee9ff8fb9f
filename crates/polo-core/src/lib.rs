//! polo-core — wire primitives for the POLO codec
//!
//! Prefix Ordered Lookup Offsets (POLO) is a deterministic, type-tagged
//! binary serialization scheme. This crate is the leaf layer: it knows
//! nothing about "documents" or typed values, only about the bytes —
//!
//! - [`varint`]: LEB128 length-prefixed unsigned integers.
//! - [`wire`]: the 4-bit [`WireType`] tag taxonomy.
//! - [`writer`]: [`WriteBuffer`], the dual head/body accumulator behind
//!   every compound wire.
//! - [`reader`]: [`Element`] and [`PackReader`], the read-side mirror.
//!
//! The typed `Polorizer`/`Depolorizer` API lives one layer up, in the
//! `polo` crate.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod error;
pub mod reader;
pub mod varint;
pub mod wire;
pub mod writer;

pub use error::{PoloError, Result};
pub use reader::{Element, PackReader};
pub use wire::WireType;
pub use writer::WriteBuffer;

/// Convenience re-exports for consumers of this crate.
pub mod prelude {
    pub use crate::{
        error::PoloError,
        reader::{Element, PackReader},
        wire::WireType,
        writer::WriteBuffer,
    };
}
