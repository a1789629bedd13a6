use crate::{Error, Result, WORKSHOP_EPOCH_MS};
use core::fmt;
use core::str::FromStr;

/// One-bit routing tag embedded in every identifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
#[repr(u8)]
pub enum GiftClass {
    Toy = 0,
    Coal = 1,
}

impl GiftClass {
    pub const fn as_bit(self) -> u64 {
        self as u64
    }

    const fn from_bit(bit: u64) -> Self {
        if bit == 0 { Self::Toy } else { Self::Coal }
    }
}

impl From<GiftClass> for u64 {
    fn from(gift_class: GiftClass) -> Self {
        gift_class.as_bit()
    }
}

impl TryFrom<u64> for GiftClass {
    type Error = Error;

    /// Converts a raw field value; only 0 (toy) and 1 (coal) are valid.
    fn try_from(value: u64) -> Result<Self> {
        match value {
            0 => Ok(Self::Toy),
            1 => Ok(Self::Coal),
            _ => Err(Error::FieldOutOfRange {
                field: "gift_class",
                value,
                max: 1,
            }),
        }
    }
}

impl fmt::Display for GiftClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Toy => f.write_str("toy"),
            Self::Coal => f.write_str("coal"),
        }
    }
}

/// A packed 64-bit gift identifier.
///
/// ## Bit layout
///
/// The identifier is packed from **MSB to LSB**:
///
/// ```text
///  Bit Index:  high bits                                  low bits
///              +---+----------------+--------------+----------+---+
///  Field:      | 0 | timestamp (41) | workshop (10)| seq (11) | c |
///              +---+----------------+--------------+----------+---+
/// ```
///
/// Bit 63 is reserved and always zero, keeping identifiers positive when
/// stored in signed 64-bit columns. The layout is a wire contract: no field
/// may be widened without a format version bump.
///
/// The integer ordering of identifiers equals the generation order on a
/// single workshop instance.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GiftId {
    id: u64,
}

const _: () = assert!(
    GiftId::RESERVED_BITS
        + GiftId::TIMESTAMP_BITS
        + GiftId::WORKSHOP_BITS
        + GiftId::SEQUENCE_BITS
        + GiftId::CLASS_BITS
        == u64::BITS as u64,
    "gift ID layout must cover the backing integer exactly"
);

impl GiftId {
    pub const RESERVED_BITS: u64 = 1;
    pub const TIMESTAMP_BITS: u64 = 41;
    pub const WORKSHOP_BITS: u64 = 10;
    pub const SEQUENCE_BITS: u64 = 11;
    pub const CLASS_BITS: u64 = 1;

    pub const CLASS_SHIFT: u64 = 0;
    pub const SEQUENCE_SHIFT: u64 = Self::CLASS_SHIFT + Self::CLASS_BITS;
    pub const WORKSHOP_SHIFT: u64 = Self::SEQUENCE_SHIFT + Self::SEQUENCE_BITS;
    pub const TIMESTAMP_SHIFT: u64 = Self::WORKSHOP_SHIFT + Self::WORKSHOP_BITS;
    pub const RESERVED_SHIFT: u64 = Self::TIMESTAMP_SHIFT + Self::TIMESTAMP_BITS;

    pub const TIMESTAMP_MASK: u64 = (1 << Self::TIMESTAMP_BITS) - 1;
    pub const WORKSHOP_MASK: u64 = (1 << Self::WORKSHOP_BITS) - 1;
    pub const SEQUENCE_MASK: u64 = (1 << Self::SEQUENCE_BITS) - 1;
    pub const CLASS_MASK: u64 = (1 << Self::CLASS_BITS) - 1;

    /// Maximum representable epoch-relative timestamp, in milliseconds.
    pub const fn max_timestamp() -> u64 {
        Self::TIMESTAMP_MASK
    }

    /// Maximum workshop ID (1023).
    pub const fn max_workshop_id() -> u64 {
        Self::WORKSHOP_MASK
    }

    /// Maximum per-millisecond sequence value (2047).
    pub const fn max_sequence() -> u64 {
        Self::SEQUENCE_MASK
    }

    /// Packs the given components into an identifier, validating ranges.
    ///
    /// `timestamp` is milliseconds since [`WORKSHOP_EPOCH`]. The gift class
    /// is range-safe by type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FieldOutOfRange`] if any component exceeds its bit
    /// field.
    ///
    /// [`WORKSHOP_EPOCH`]: crate::WORKSHOP_EPOCH
    pub fn from_components(
        timestamp: u64,
        workshop_id: u64,
        sequence: u64,
        gift_class: GiftClass,
    ) -> Result<Self> {
        if timestamp > Self::max_timestamp() {
            return Err(Error::FieldOutOfRange {
                field: "timestamp",
                value: timestamp,
                max: Self::max_timestamp(),
            });
        }
        if workshop_id > Self::max_workshop_id() {
            return Err(Error::FieldOutOfRange {
                field: "workshop_id",
                value: workshop_id,
                max: Self::max_workshop_id(),
            });
        }
        if sequence > Self::max_sequence() {
            return Err(Error::FieldOutOfRange {
                field: "sequence",
                value: sequence,
                max: Self::max_sequence(),
            });
        }
        Ok(Self::from_parts(timestamp, workshop_id, sequence, gift_class))
    }

    /// Unchecked packing. Callers guarantee the components are in range.
    pub(crate) const fn from_parts(
        timestamp: u64,
        workshop_id: u64,
        sequence: u64,
        gift_class: GiftClass,
    ) -> Self {
        let t = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let w = (workshop_id & Self::WORKSHOP_MASK) << Self::WORKSHOP_SHIFT;
        let s = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        let c = gift_class.as_bit() << Self::CLASS_SHIFT;
        Self { id: t | w | s | c }
    }

    /// Reinterprets a raw integer as an identifier.
    ///
    /// Total on any `u64` with bit 63 clear.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReservedBitSet`] if bit 63 is nonzero.
    pub fn decode(raw: u64) -> Result<Self> {
        if raw >> Self::RESERVED_SHIFT != 0 {
            return Err(Error::ReservedBitSet { id: raw });
        }
        Ok(Self { id: raw })
    }

    /// Extracts the epoch-relative timestamp in milliseconds.
    pub const fn timestamp(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the workshop ID.
    pub const fn workshop_id(&self) -> u64 {
        (self.id >> Self::WORKSHOP_SHIFT) & Self::WORKSHOP_MASK
    }

    /// Extracts the per-millisecond sequence.
    pub const fn sequence(&self) -> u64 {
        (self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
    }

    /// Extracts the gift class tag.
    pub const fn gift_class(&self) -> GiftClass {
        GiftClass::from_bit((self.id >> Self::CLASS_SHIFT) & Self::CLASS_MASK)
    }

    /// The embedded timestamp as absolute milliseconds since the Unix epoch.
    pub const fn unix_millis(&self) -> i64 {
        self.timestamp() as i64 + WORKSHOP_EPOCH_MS
    }

    /// Converts this identifier into its raw integer representation.
    pub const fn to_raw(&self) -> u64 {
        self.id
    }
}

impl fmt::Display for GiftId {
    /// Formats the identifier as its decimal integer value.
    ///
    /// This is the external representation: values near `2^63` exceed the
    /// 53-bit mantissa of IEEE-754 doubles, so JSON and logs carry decimal
    /// strings rather than numbers.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.id, f)
    }
}

impl FromStr for GiftId {
    type Err = Error;

    /// Parses the decimal string representation produced by `Display`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedId`] if the string is not a decimal
    /// unsigned 64-bit integer, or [`Error::ReservedBitSet`] if the parsed
    /// value has bit 63 set.
    fn from_str(s: &str) -> Result<Self> {
        let raw: u64 = s.parse().map_err(|_| Error::MalformedId {
            input: s.to_owned(),
        })?;
        Self::decode(raw)
    }
}

impl fmt::Debug for GiftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GiftId")
            .field("timestamp", &self.timestamp())
            .field("workshop_id", &self.workshop_id())
            .field("sequence", &self.sequence())
            .field("gift_class", &self.gift_class())
            .finish()
    }
}
