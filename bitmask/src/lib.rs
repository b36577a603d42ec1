//! Struct fields packed into a 64-bit flag mask.
//!
//! `bitmask` maps `bool` and integer fields of a struct onto single bits of
//! an `i64`, each field naming its 1-based bit position in a
//! `#[bitmask = "N"]` tag. Encoding sets a bit for every truthy field;
//! decoding writes `true` / `1` into every field whose bit is set.
//!
//! # Example
//!
//! ```
//! use bitmask::{BitMask, Record};
//!
//! #[derive(Record, Default, Debug, PartialEq)]
//! struct Order {
//!     #[bitmask = "1"]
//!     is_buy: bool,
//!     #[bitmask = "2"]
//!     is_ioc: bool,
//!     #[bitmask = "8"]
//!     retries: u8,
//!     // untagged, never part of the mask
//!     quantity: u64,
//! }
//!
//! // Pack
//! let order = Order { is_buy: true, is_ioc: false, retries: 3, quantity: 100 };
//! let mask = bitmask::encode(&order).unwrap();
//! assert_eq!(mask.raw(), 0b1000_0001);
//!
//! // Unpack into a zero-valued destination
//! let mut back = Order::default();
//! bitmask::decode(mask, &mut back).unwrap();
//! assert_eq!(back, Order { is_buy: true, is_ioc: false, retries: 1, quantity: 0 });
//! ```
//!
//! Decoding only ever sets fields. A field whose bit is clear keeps whatever
//! value it had, so decode into a zero-valued destination to mirror the mask.

#![no_std]
#![warn(missing_docs)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod codec;
mod error;
mod mask;
mod record;
mod target;

pub use codec::{Descriptor, decode, descriptors, encode};
pub use error::Error;
pub use mask::{BitMask, Positions};
pub use record::{Field, FlagValue, Kind, Record};
pub use target::{Resolved, ResolvedMut, Target};

#[cfg(feature = "derive")]
pub use bitmask_derive::Record;

#[doc(hidden)]
pub mod __private {
    pub use crate::record::{Inert, KindOf};
}

/// Attribute key that carries a field's bit position.
pub const TAG: &str = "bitmask";
