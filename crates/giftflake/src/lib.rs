//! # Workshop-unique gift identifiers
//!
//! `giftflake` generates 64-bit, time-ordered identifiers for gift objects
//! across a fleet of up to 1024 workshop instances, with no coordination
//! between instances. Each identifier packs, from most to least significant
//! bit:
//!
//! ```text
//!  Bit Index:  high bits                              low bits
//!              +---+----------------+-------------+----------+---+
//!  Field:      | 0 | timestamp (41) | workshop 10 | seq (11) | c |
//!              +---+----------------+-------------+----------+---+
//!              |<------- MSB ------ 64 bits ------ LSB ------->|
//! ```
//!
//! - bit 63 is reserved and always zero, so identifiers survive signed
//!   64-bit storage
//! - 41 bits of milliseconds since [`WORKSHOP_EPOCH`]
//! - a 10-bit workshop ID, assigned externally and immutable per process
//! - an 11-bit per-millisecond sequence
//! - a one-bit [`GiftClass`] routing tag (toy or coal)
//!
//! Identifiers from a single [`GiftIdGenerator`] are strictly increasing in
//! generation order; uniqueness across generators holds by construction as
//! long as workshop IDs are distinct.
//!
//! # Example
//!
//! ```
//! use giftflake::{GiftClass, GiftIdGenerator, SystemClock};
//!
//! let generator = GiftIdGenerator::new(1, SystemClock)?;
//! let id = generator.generate(GiftClass::Toy)?;
//! assert_eq!(id.workshop_id(), 1);
//! assert_eq!(id.gift_class(), GiftClass::Toy);
//! # Ok::<(), giftflake::Error>(())
//! ```
mod error;
mod generator;
mod id;
#[cfg(feature = "serde")]
mod serde;
mod time;

pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::time::*;
