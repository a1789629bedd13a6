use crate::{
    Error, GiftClass, GiftId, GiftIdGenerator, MAX_BACKWARD_MS, SystemClock, TimeSource,
    WORKSHOP_EPOCH_MS,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::scope;

/// A frozen clock, `millis` past the workshop epoch.
struct MockTime {
    millis: i64,
}

impl TimeSource for MockTime {
    fn unix_millis(&self) -> i64 {
        WORKSHOP_EPOCH_MS + self.millis
    }
}

/// A clock that steps through `values` (epoch-relative) one read at a time
/// and then stays on the final value. Lets a test drive the engine's
/// in-call waits deterministically: each spin iteration consumes one read.
struct StepTime {
    values: Vec<i64>,
    reads: AtomicUsize,
}

impl StepTime {
    fn new(values: Vec<i64>) -> Self {
        Self {
            values,
            reads: AtomicUsize::new(0),
        }
    }
}

impl TimeSource for StepTime {
    fn unix_millis(&self) -> i64 {
        let read = self.reads.fetch_add(1, Ordering::Relaxed);
        WORKSHOP_EPOCH_MS + self.values[read.min(self.values.len() - 1)]
    }
}

#[test]
fn first_call_takes_the_advance_path() {
    let generator = GiftIdGenerator::new(3, MockTime { millis: 42 }).unwrap();
    let id = generator.generate(GiftClass::Toy).unwrap();
    assert_eq!(id.timestamp(), 42);
    assert_eq!(id.sequence(), 0);
    assert_eq!(id.workshop_id(), 3);
}

#[test]
fn same_millisecond_increments_sequence() {
    let generator = GiftIdGenerator::new(1, MockTime { millis: 1_000 }).unwrap();

    let ids: Vec<GiftId> = (0..4)
        .map(|_| generator.generate(GiftClass::Toy).unwrap())
        .collect();

    for (expected_seq, id) in ids.iter().enumerate() {
        assert_eq!(id.timestamp(), 1_000);
        assert_eq!(id.sequence(), expected_seq as u64);
    }
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn clock_advance_resets_sequence() {
    let clock = StepTime::new(vec![1_000, 1_000, 1_001]);
    let generator = GiftIdGenerator::new(1, clock).unwrap();

    let a = generator.generate(GiftClass::Toy).unwrap();
    let b = generator.generate(GiftClass::Toy).unwrap();
    let c = generator.generate(GiftClass::Toy).unwrap();

    assert_eq!((a.timestamp(), a.sequence()), (1_000, 0));
    assert_eq!((b.timestamp(), b.sequence()), (1_000, 1));
    assert_eq!((c.timestamp(), c.sequence()), (1_001, 0));
}

#[test]
fn sequence_exhaustion_waits_for_the_next_tick() {
    // 2048 generation reads plus two wait-loop reads pinned at 1000, then
    // the harness lets the clock advance.
    let mut values = vec![1_000; 2_050];
    values.push(1_001);
    let generator = GiftIdGenerator::new(1, StepTime::new(values)).unwrap();

    let mut last = None;
    for expected_seq in 0..=GiftId::max_sequence() {
        let id = generator.generate(GiftClass::Toy).unwrap();
        assert_eq!(id.timestamp(), 1_000);
        assert_eq!(id.sequence(), expected_seq);
        last = Some(id);
    }

    let rolled = generator.generate(GiftClass::Toy).unwrap();
    assert_eq!(rolled.timestamp(), 1_001);
    assert_eq!(rolled.sequence(), 0);
    assert!(rolled > last.unwrap());
}

#[test]
fn regression_within_tolerance_waits_for_catch_up() {
    // Second call observes a 2ms backward jump; the harness walks the
    // clock back up to 1000 while the engine waits.
    let clock = StepTime::new(vec![1_000, 998, 999, 1_000]);
    let generator = GiftIdGenerator::new(1, clock).unwrap();

    let a = generator.generate(GiftClass::Toy).unwrap();
    let b = generator.generate(GiftClass::Toy).unwrap();

    assert_eq!((a.timestamp(), a.sequence()), (1_000, 0));
    assert_eq!((b.timestamp(), b.sequence()), (1_000, 1));
    assert!(b > a);
}

#[test]
fn regression_beyond_tolerance_fails_and_leaves_state_untouched() {
    let clock = StepTime::new(vec![1_000, 900, 1_000]);
    let generator = GiftIdGenerator::new(1, clock).unwrap();

    let a = generator.generate(GiftClass::Toy).unwrap();
    assert_eq!((a.timestamp(), a.sequence()), (1_000, 0));

    let err = generator.generate(GiftClass::Toy).unwrap_err();
    assert_eq!(err, Error::ClockRegression { delta_ms: 100 });

    // The failed call must not have consumed a sequence slot.
    let b = generator.generate(GiftClass::Toy).unwrap();
    assert_eq!((b.timestamp(), b.sequence()), (1_000, 1));
}

#[test]
fn workshop_id_validation() {
    assert_eq!(
        GiftIdGenerator::new(1024, MockTime { millis: 0 }).map(|_| ()),
        Err(Error::WorkshopIdInvalid { workshop_id: 1024 })
    );
    assert!(GiftIdGenerator::new(1023, MockTime { millis: 0 }).is_ok());
}

#[test]
fn clock_before_epoch_fails() {
    let generator = GiftIdGenerator::new(1, MockTime { millis: -5 }).unwrap();
    assert_eq!(
        generator.generate(GiftClass::Toy).unwrap_err(),
        Error::ClockBeforeEpoch { delta_ms: 5 }
    );
}

#[test]
fn epoch_overflow_fails_past_the_41_bit_horizon() {
    let max = GiftId::max_timestamp() as i64;

    let generator = GiftIdGenerator::new(1, MockTime { millis: max }).unwrap();
    let id = generator.generate(GiftClass::Toy).unwrap();
    assert_eq!(id.timestamp(), GiftId::max_timestamp());

    let generator = GiftIdGenerator::new(1, MockTime { millis: max + 1 }).unwrap();
    assert_eq!(
        generator.generate(GiftClass::Toy).unwrap_err(),
        Error::EpochOverflow { now_ms: max + 1 }
    );
}

#[test]
fn regression_tolerance_boundary_is_inclusive() {
    // Exactly MAX_BACKWARD_MS behind: wait, do not fail.
    let behind = 1_000 - MAX_BACKWARD_MS;
    let clock = StepTime::new(vec![1_000, behind, 1_000]);
    let generator = GiftIdGenerator::new(1, clock).unwrap();

    generator.generate(GiftClass::Toy).unwrap();
    let id = generator.generate(GiftClass::Toy).unwrap();
    assert_eq!((id.timestamp(), id.sequence()), (1_000, 1));
}

#[test]
fn gift_class_tags_both_classes() {
    let generator = GiftIdGenerator::new(9, MockTime { millis: 1_000 }).unwrap();
    let toy = generator.generate(GiftClass::Toy).unwrap();
    let coal = generator.generate(GiftClass::Coal).unwrap();
    assert_eq!(toy.gift_class(), GiftClass::Toy);
    assert_eq!(coal.gift_class(), GiftClass::Coal);
    assert!(toy < coal);
}

#[test]
fn monotonic_sweep_with_the_system_clock() {
    const TOTAL_IDS: usize = 100_000;

    let generator = GiftIdGenerator::new(7, SystemClock).unwrap();
    let mut last_raw = 0u64;
    let mut last_timestamp = 0u64;

    for _ in 0..TOTAL_IDS {
        let id = generator.generate(GiftClass::Toy).unwrap();

        assert!(id.to_raw() > last_raw);
        assert_eq!(id.to_raw() >> 63, 0);
        assert_eq!(id.workshop_id(), 7);
        if id.timestamp() > last_timestamp {
            assert_eq!(id.sequence(), 0);
        }

        last_raw = id.to_raw();
        last_timestamp = id.timestamp();
    }
}

#[test]
fn threaded_generation_is_unique() {
    const THREADS: usize = 8;
    const IDS_PER_THREAD: usize = 8_192;
    const TOTAL_IDS: usize = THREADS * IDS_PER_THREAD;

    let generator = Arc::new(GiftIdGenerator::new(1, SystemClock).unwrap());
    let seen_ids = Arc::new(std::sync::Mutex::new(HashSet::with_capacity(TOTAL_IDS)));

    scope(|s| {
        for _ in 0..THREADS {
            let generator = Arc::clone(&generator);
            let seen_ids = Arc::clone(&seen_ids);

            s.spawn(move || {
                let mut previous = None;
                for _ in 0..IDS_PER_THREAD {
                    let id = generator.generate(GiftClass::Toy).unwrap();
                    // Calls on one thread are causally ordered, so each ID
                    // must exceed the thread's previous one.
                    if let Some(previous) = previous {
                        assert!(id > previous);
                    }
                    previous = Some(id);
                    assert!(seen_ids.lock().unwrap().insert(id));
                }
            });
        }
    });

    let final_count = seen_ids.lock().unwrap().len();
    assert_eq!(final_count, TOTAL_IDS, "Expected {TOTAL_IDS} unique IDs");
}
