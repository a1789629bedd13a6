use std::sync::{MutexGuard, PoisonError};

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for identifier encoding, decoding and generation.
#[derive(Clone, thiserror::Error, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// An encode component does not fit its bit field.
    #[error("{field} {value} out of range (max {max})")]
    FieldOutOfRange {
        field: &'static str,
        value: u64,
        max: u64,
    },

    /// A decoded identifier has the reserved sign bit set.
    #[error("identifier {id} has reserved bit 63 set")]
    ReservedBitSet { id: u64 },

    /// An identifier string is not a decimal unsigned integer.
    #[error("`{input}` is not a decimal identifier")]
    MalformedId { input: String },

    /// The wall clock reads earlier than the workshop epoch.
    #[error("wall clock is {delta_ms}ms before the workshop epoch")]
    ClockBeforeEpoch { delta_ms: i64 },

    /// The wall clock jumped backwards further than the engine tolerates.
    #[error("wall clock moved {delta_ms}ms backwards, beyond tolerance")]
    ClockRegression { delta_ms: i64 },

    /// The 41-bit timestamp field is exhausted. Requires an epoch rotation.
    #[error("timestamp field exhausted: {now_ms}ms since the workshop epoch")]
    EpochOverflow { now_ms: i64 },

    /// Construction-time failure: the workshop ID exceeds the 10-bit field.
    #[error("workshop ID {workshop_id} exceeds the 10-bit field")]
    WorkshopIdInvalid { workshop_id: u16 },

    /// A caller panicked while holding the generator lock.
    #[error("generator lock poisoned")]
    LockPoisoned,
}

// Convert all poisoned lock errors to a simplified `LockPoisoned`
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Error::LockPoisoned
    }
}
