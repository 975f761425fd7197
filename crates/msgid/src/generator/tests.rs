use crate::{
    BasicMsgIdGenerator, LockMsgIdGenerator, MAX_SEQUENCE, MsgId, MsgIdGenerator, TimeSource,
    WallClock, system_time_to_millis,
};
use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::thread::scope;
use std::time::SystemTime;

const SPAWNER_ID: i32 = 3;

#[derive(Clone, Copy)]
struct MockTime {
    millis: i64,
}

impl TimeSource<i64> for MockTime {
    fn current_millis(&self) -> i64 {
        self.millis
    }
}

#[derive(Clone)]
struct SharedMockStepTime {
    clock: Rc<MockStepTime>,
}

impl TimeSource<i64> for SharedMockStepTime {
    fn current_millis(&self) -> i64 {
        self.clock.values[self.clock.index.get()]
    }
}

struct MockStepTime {
    values: Vec<i64>,
    index: Cell<usize>,
}

fn run_first_id_packs_spawner_and_sequence<G>(generator: &G)
where
    G: MsgIdGenerator,
{
    let id = generator.next_id();
    assert_eq!(id.millis(), 42);
    assert_eq!(id.packed(), (i64::from(SPAWNER_ID) << 32) | 1);
    assert_eq!(id.spawner_id(), SPAWNER_ID);
    assert_eq!(id.sequence(), 1);

    let decoded = MsgId::decode(&id.encode()).unwrap();
    assert_eq!(decoded.spawner_id(), SPAWNER_ID);
    assert_eq!(decoded.sequence(), 1);
}

fn run_sequence_increments_within_same_tick<G>(generator: &G)
where
    G: MsgIdGenerator,
{
    let id1 = generator.next_id();
    let id2 = generator.next_id();
    let id3 = generator.next_id();

    assert_eq!(id1.millis(), 42);
    assert_eq!(id2.millis(), 42);
    assert_eq!(id3.millis(), 42);
    assert_eq!(id1.sequence(), 1);
    assert_eq!(id2.sequence(), 2);
    assert_eq!(id3.sequence(), 3);
    assert!(id1 < id2 && id2 < id3);
}

fn run_sequence_ignores_clock_advance(generator: &impl MsgIdGenerator, time: &SharedMockStepTime) {
    let id1 = generator.next_id();
    time.clock.index.set(1);
    let id2 = generator.next_id();

    assert_eq!(id1.millis(), 42);
    assert_eq!(id2.millis(), 43);
    assert_eq!(id1.sequence(), 1);
    assert_eq!(id2.sequence(), 2);
}

fn run_generator_wraps_after_max_sequence<G>(generator: &G)
where
    G: MsgIdGenerator,
{
    assert_eq!(i64::from(generator.next_id().sequence()), MAX_SEQUENCE);

    let wrapped = generator.next_id();
    assert_eq!(wrapped.sequence(), 1);
    assert_eq!((wrapped.packed() as u32) >> 24, 0, "reserved byte must stay zero");

    assert_eq!(generator.next_id().sequence(), 2);
}

fn run_generator_keeps_spawner_id<G>(make_generator: impl Fn(i32) -> G)
where
    G: MsgIdGenerator,
{
    for spawner_id in [i32::MIN, i32::MIN + 1, -1, 0, 1, SPAWNER_ID, i32::MAX] {
        let generator = make_generator(spawner_id);
        assert_eq!(generator.spawner_id(), spawner_id);

        let id = generator.next_id();
        assert_eq!(id.spawner_id(), spawner_id);
        assert_eq!(id.sequence(), 1);
    }
}

fn run_generator_tracks_wall_clock<G>(generator: &G)
where
    G: MsgIdGenerator,
{
    const TOLERANCE_MS: i64 = 5;

    let before = system_time_to_millis(SystemTime::now());
    let id = generator.next_id();
    let after = system_time_to_millis(SystemTime::now());

    assert!(id.millis() >= before - TOLERANCE_MS, "{id:?} too early");
    assert!(id.millis() <= after + TOLERANCE_MS, "{id:?} too late");

    let time = system_time_to_millis(id.time());
    assert_eq!(time, id.millis());
}

fn run_token_roundtrip<G>(generator: &G)
where
    G: MsgIdGenerator,
{
    for _ in 0..1_000 {
        let id = generator.next_id();
        let decoded = MsgId::decode(&id.encode()).unwrap();
        assert_eq!(decoded, id);
    }

    let token = generator.next_token();
    assert_eq!(token.len(), 24);
    let decoded: MsgId = token.parse().unwrap();
    assert_eq!(decoded.spawner_id(), generator.spawner_id());
}

fn run_generator_unique<G>(generator: &G)
where
    G: MsgIdGenerator,
{
    const TOTAL_IDS: usize = 4096 * 64;

    let mut seen = HashSet::with_capacity(TOTAL_IDS);
    for _ in 0..TOTAL_IDS {
        assert!(seen.insert(generator.next_id()));
    }
}

fn run_generator_unique_threaded<G>(generator: G)
where
    G: MsgIdGenerator + Send + Sync,
{
    const THREADS: usize = 8;
    const TOTAL_IDS: usize = 4096 * 64;
    const IDS_PER_THREAD: usize = TOTAL_IDS / THREADS;

    let generator = Arc::new(generator);
    let seen_ids = Arc::new(Mutex::new(HashSet::with_capacity(TOTAL_IDS)));

    scope(|s| {
        for _ in 0..THREADS {
            let generator = Arc::clone(&generator);
            let seen_ids = Arc::clone(&seen_ids);

            s.spawn(move || {
                let ids: Vec<MsgId> = (0..IDS_PER_THREAD).map(|_| generator.next_id()).collect();
                let mut seen_ids = seen_ids.lock().unwrap();
                for id in ids {
                    assert!(seen_ids.insert(id), "duplicate id {id:?}");
                }
            });
        }
    });

    let seen_ids = seen_ids.lock().unwrap();
    assert_eq!(seen_ids.len(), TOTAL_IDS, "Expected {TOTAL_IDS} unique IDs");

    // Every sequence value was handed out exactly once.
    let sequences: HashSet<i32> = seen_ids.iter().map(MsgId::sequence).collect();
    assert_eq!(sequences.len(), TOTAL_IDS);
    assert!(sequences.iter().all(|&s| s >= 1 && s as usize <= TOTAL_IDS));
}

#[test]
fn basic_generator_first_id_test() {
    let generator = BasicMsgIdGenerator::with_time(SPAWNER_ID, MockTime { millis: 42 });
    run_first_id_packs_spawner_and_sequence(&generator);
}

#[test]
fn lock_generator_first_id_test() {
    let generator = LockMsgIdGenerator::with_time(SPAWNER_ID, MockTime { millis: 42 });
    run_first_id_packs_spawner_and_sequence(&generator);
}

#[test]
fn basic_generator_sequence_test() {
    let generator = BasicMsgIdGenerator::with_time(0, MockTime { millis: 42 });
    run_sequence_increments_within_same_tick(&generator);
}

#[test]
fn lock_generator_sequence_test() {
    let generator = LockMsgIdGenerator::with_time(0, MockTime { millis: 42 });
    run_sequence_increments_within_same_tick(&generator);
}

#[test]
fn basic_generator_clock_advance_test() {
    let shared_time = SharedMockStepTime {
        clock: Rc::new(MockStepTime {
            values: vec![42, 43],
            index: Cell::new(0),
        }),
    };
    let generator = BasicMsgIdGenerator::with_time(1, shared_time.clone());
    run_sequence_ignores_clock_advance(&generator, &shared_time);
}

#[test]
fn lock_generator_clock_advance_test() {
    let shared_time = SharedMockStepTime {
        clock: Rc::new(MockStepTime {
            values: vec![42, 43],
            index: Cell::new(0),
        }),
    };
    let generator = LockMsgIdGenerator::with_time(1, shared_time.clone());
    run_sequence_ignores_clock_advance(&generator, &shared_time);
}

#[test]
fn basic_generator_wraparound_test() {
    let generator =
        BasicMsgIdGenerator::from_components(SPAWNER_ID, MAX_SEQUENCE - 1, MockTime { millis: 0 });
    run_generator_wraps_after_max_sequence(&generator);
}

#[test]
fn lock_generator_wraparound_test() {
    let generator =
        LockMsgIdGenerator::from_components(SPAWNER_ID, MAX_SEQUENCE - 1, MockTime { millis: 0 });
    run_generator_wraps_after_max_sequence(&generator);
}

#[test]
fn basic_generator_spawner_id_test() {
    run_generator_keeps_spawner_id(BasicMsgIdGenerator::new);
}

#[test]
fn lock_generator_spawner_id_test() {
    run_generator_keeps_spawner_id(LockMsgIdGenerator::new);
}

#[test]
fn basic_generator_wall_clock_test() {
    run_generator_tracks_wall_clock(&BasicMsgIdGenerator::new(SPAWNER_ID));
}

#[test]
fn lock_generator_wall_clock_test() {
    run_generator_tracks_wall_clock(&LockMsgIdGenerator::new(SPAWNER_ID));
}

#[test]
fn basic_generator_token_roundtrip_test() {
    run_token_roundtrip(&BasicMsgIdGenerator::new(SPAWNER_ID));
}

#[test]
fn lock_generator_token_roundtrip_test() {
    run_token_roundtrip(&LockMsgIdGenerator::new(i32::MIN));
}

#[test]
fn basic_generator_unique_test() {
    run_generator_unique(&BasicMsgIdGenerator::new(SPAWNER_ID));
}

#[test]
fn lock_generator_unique_test() {
    run_generator_unique(&LockMsgIdGenerator::new(SPAWNER_ID));
}

#[test]
fn lock_generator_threaded_unique_within_one_millisecond() {
    run_generator_unique_threaded(LockMsgIdGenerator::with_time(
        SPAWNER_ID,
        MockTime { millis: 42 },
    ));
}

#[test]
fn lock_generator_threaded_unique_wall_clock() {
    run_generator_unique_threaded(LockMsgIdGenerator::new(SPAWNER_ID));
}

#[test]
fn lock_generator_clones_share_counter() {
    let generator = LockMsgIdGenerator::with_time(SPAWNER_ID, MockTime { millis: 42 });
    let handle = generator.clone();

    assert_eq!(generator.next_id().sequence(), 1);
    assert_eq!(handle.next_id().sequence(), 2);
    assert_eq!(generator.current_sequence(), 2);
    assert_eq!(handle.spawner_id(), SPAWNER_ID);
}

#[test]
fn separate_generators_have_separate_counters() {
    let a = LockMsgIdGenerator::with_time(1, MockTime { millis: 42 });
    let b = LockMsgIdGenerator::with_time(2, MockTime { millis: 42 });

    let id_a = a.next_id();
    let id_b = b.next_id();
    assert_eq!(id_a.sequence(), id_b.sequence());
    assert_ne!(id_a, id_b);
}

#[test]
fn wraparound_within_one_millisecond_reissues_ids() {
    // Known limitation: nothing waits for the clock after a wrap.
    let generator =
        BasicMsgIdGenerator::from_components(SPAWNER_ID, MAX_SEQUENCE, MockTime { millis: 7 });
    let fresh = BasicMsgIdGenerator::with_time(SPAWNER_ID, MockTime { millis: 7 });
    assert_eq!(generator.next_id(), fresh.next_id());
}

#[test]
fn from_components_clamps_sequence() {
    let generator = LockMsgIdGenerator::from_components(0, -10, WallClock);
    assert_eq!(generator.current_sequence(), 0);
    assert_eq!(generator.next_id().sequence(), 1);

    let generator = BasicMsgIdGenerator::from_components(0, i64::MAX, WallClock);
    assert_eq!(generator.current_sequence(), MAX_SEQUENCE);
    assert_eq!(generator.next_id().sequence(), 1);
}

#[test]
fn lock_generator_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<LockMsgIdGenerator>();
    assert_send_sync::<LockMsgIdGenerator<MockTime>>();
}

#[cfg(feature = "tracing")]
#[test]
fn wraparound_is_traced() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();

    let generator = LockMsgIdGenerator::from_components(SPAWNER_ID, MAX_SEQUENCE, WallClock);
    assert_eq!(generator.next_id().sequence(), 1);
}
