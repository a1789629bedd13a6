use crate::{Error, GiftClass, GiftId, Result, TimeSource};
use std::sync::{Arc, Mutex};

#[cfg(test)]
mod tests;

/// Tolerated backward clock jump, in milliseconds.
///
/// Regressions up to this bound are absorbed by waiting for the clock to
/// catch up inside the call; anything larger fails with
/// [`Error::ClockRegression`]. Sized for NTP slew on a disciplined host;
/// step adjustments typically exceed it and are surfaced to the operator.
pub const MAX_BACKWARD_MS: i64 = 5;

struct EngineState {
    /// Epoch-relative timestamp of the last successful generation, or -1
    /// before the first one.
    last_timestamp: i64,
    sequence: u64,
}

/// A lock-based gift identifier generator, one per process.
///
/// All calls serialise through a single [`Mutex`] around
/// `(last_timestamp, sequence)`. The critical section covers the clock
/// read, the state transition, and the encode, so identifier order equals
/// lock-acquisition order. The two waits the engine may perform (clock
/// catch-up after a tolerable regression, next-millisecond tick after
/// sequence exhaustion) happen inside the section and are bounded by one
/// millisecond plus [`MAX_BACKWARD_MS`].
///
/// The hot path performs no allocation and no I/O.
///
/// # Example
///
/// ```
/// use giftflake::{GiftClass, GiftIdGenerator, TimeSource, WORKSHOP_EPOCH_MS};
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn unix_millis(&self) -> i64 {
///         WORKSHOP_EPOCH_MS + 1_000
///     }
/// }
///
/// let generator = GiftIdGenerator::new(42, FixedTime)?;
/// let id = generator.generate(GiftClass::Coal)?;
/// assert_eq!(id.timestamp(), 1_000);
/// assert_eq!(id.workshop_id(), 42);
/// assert_eq!(id.sequence(), 0);
/// # Ok::<(), giftflake::Error>(())
/// ```
pub struct GiftIdGenerator<T> {
    state: Arc<Mutex<EngineState>>,
    time: T,
    workshop_id: u64,
}

impl<T> GiftIdGenerator<T>
where
    T: TimeSource,
{
    /// Creates a generator for the given workshop instance.
    ///
    /// The workshop ID is baked into every identifier this generator
    /// produces and is immutable afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WorkshopIdInvalid`] if `workshop_id` does not fit
    /// the 10-bit field.
    pub fn new(workshop_id: u16, time: T) -> Result<Self> {
        if u64::from(workshop_id) > GiftId::max_workshop_id() {
            return Err(Error::WorkshopIdInvalid { workshop_id });
        }
        Ok(Self {
            state: Arc::new(Mutex::new(EngineState {
                last_timestamp: -1,
                sequence: 0,
            })),
            time,
            workshop_id: u64::from(workshop_id),
        })
    }

    /// The workshop ID embedded in every identifier.
    pub fn workshop_id(&self) -> u16 {
        self.workshop_id as u16
    }

    /// Produces the next identifier for the given gift class.
    ///
    /// Identifiers are strictly increasing across successful calls. Within
    /// one millisecond the sequence counts up from 0; when the clock
    /// advances the sequence resets. On sequence exhaustion (2048
    /// identifiers in one millisecond) the call waits for the next tick.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockBeforeEpoch`] if the wall clock predates the
    ///   workshop epoch
    /// - [`Error::EpochOverflow`] if the 41-bit timestamp field is
    ///   exhausted
    /// - [`Error::ClockRegression`] if the clock moved backwards by more
    ///   than [`MAX_BACKWARD_MS`]
    /// - [`Error::LockPoisoned`] if a previous caller panicked mid-call
    ///
    /// No failure mutates the engine state.
    pub fn generate(&self, gift_class: GiftClass) -> Result<GiftId> {
        let mut state = self.state.lock()?;

        let mut now = self.time.workshop_millis();
        if now < 0 {
            return Err(Error::ClockBeforeEpoch { delta_ms: -now });
        }
        if now > GiftId::max_timestamp() as i64 {
            return Err(Error::EpochOverflow { now_ms: now });
        }

        if now < state.last_timestamp {
            now = self.wait_for_clock_catch_up(state.last_timestamp, now)?;
        }

        let sequence = if now == state.last_timestamp {
            if state.sequence < GiftId::max_sequence() {
                state.sequence + 1
            } else {
                now = self.wait_for_next_millis(state.last_timestamp)?;
                0
            }
        } else {
            0
        };

        state.last_timestamp = now;
        state.sequence = sequence;

        Ok(GiftId::from_parts(
            now as u64,
            self.workshop_id,
            sequence,
            gift_class,
        ))
    }

    /// The wall clock moved backwards. Within tolerance, wait (holding the
    /// lock) until it reaches `last` again and resume at `last`; beyond
    /// tolerance, fail without touching state.
    #[cold]
    #[inline(never)]
    fn wait_for_clock_catch_up(&self, last: i64, now: i64) -> Result<i64> {
        let delta_ms = last - now;
        if delta_ms > MAX_BACKWARD_MS {
            return Err(Error::ClockRegression { delta_ms });
        }
        while self.time.workshop_millis() < last {
            std::thread::yield_now();
        }
        Ok(last)
    }

    /// The per-millisecond sequence is exhausted. Spin until the clock
    /// passes `last`, re-checking the timestamp field on the way out.
    #[cold]
    #[inline(never)]
    fn wait_for_next_millis(&self, last: i64) -> Result<i64> {
        loop {
            let now = self.time.workshop_millis();
            if now > last {
                if now > GiftId::max_timestamp() as i64 {
                    return Err(Error::EpochOverflow { now_ms: now });
                }
                return Ok(now);
            }
            core::hint::spin_loop();
        }
    }
}
