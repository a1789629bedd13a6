use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Workshop epoch: Wednesday, January 1, 2025 00:00:00 UTC.
///
/// All embedded timestamps are measured in milliseconds from this instant.
/// The value is fixed at build time; changing it invalidates every
/// previously issued identifier.
pub const WORKSHOP_EPOCH: Duration = Duration::from_millis(1_735_689_600_000);

/// [`WORKSHOP_EPOCH`] as signed milliseconds since the Unix epoch.
pub const WORKSHOP_EPOCH_MS: i64 = WORKSHOP_EPOCH.as_millis() as i64;

/// A source of wall-clock time.
///
/// Identifiers must decode to timestamps that are meaningful across
/// processes and restarts, so implementations are expected to track UTC
/// wall time rather than a process-local monotonic counter. Small backward
/// adjustments (NTP steps) are tolerated by the generator itself.
///
/// The trait exists so tests can inject deterministic clocks.
///
/// # Example
///
/// ```
/// use giftflake::{TimeSource, WORKSHOP_EPOCH_MS};
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn unix_millis(&self) -> i64 {
///         WORKSHOP_EPOCH_MS + 1234
///     }
/// }
///
/// assert_eq!(FixedTime.workshop_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Current wall-clock milliseconds since the Unix epoch.
    fn unix_millis(&self) -> i64;

    /// Current wall-clock milliseconds since [`WORKSHOP_EPOCH`].
    ///
    /// Negative when the wall clock predates the epoch; callers treat that
    /// as a hard error.
    fn workshop_millis(&self) -> i64 {
        self.unix_millis() - WORKSHOP_EPOCH_MS
    }
}

/// The system wall clock.
///
/// Reads [`SystemTime`] on every call. Subject to NTP step adjustments,
/// which the generator absorbs up to its backward tolerance.
#[derive(Copy, Clone, Debug, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn unix_millis(&self) -> i64 {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(since_epoch) => since_epoch.as_millis() as i64,
            Err(before_epoch) => -(before_epoch.duration().as_millis() as i64),
        }
    }
}
