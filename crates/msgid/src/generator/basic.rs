use core::cell::Cell;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    generator::{
        MAX_SEQUENCE, MsgIdGenerator,
        counter::{clamp_sequence, next_sequence, on_wrap},
    },
    id::MsgId,
    time::{TimeSource, WallClock},
};

/// A *single-threaded* [`MsgId`] generator.
///
/// Same id layout and wraparound policy as [`LockMsgIdGenerator`], but the
/// counter is a plain [`Cell`], so the generator is `!Sync`. Use one per
/// thread (each with its own spawner id) when you want to skip the mutex.
///
/// ## Features
/// - ❌ Not thread-safe
/// - ✅ No locking on the hot path
///
/// ## See Also
/// - [`LockMsgIdGenerator`]
///
/// [`LockMsgIdGenerator`]: crate::LockMsgIdGenerator
#[derive(Debug)]
pub struct BasicMsgIdGenerator<T = WallClock>
where
    T: TimeSource<i64>,
{
    spawner_id: i32,
    sequence: Cell<i64>,
    time: T,
}

impl BasicMsgIdGenerator<WallClock> {
    /// Creates a generator for `spawner_id` reading the system wall clock.
    ///
    /// # Example
    ///
    /// ```
    /// use msgid::BasicMsgIdGenerator;
    ///
    /// let generator = BasicMsgIdGenerator::new(-7);
    /// let id = generator.next_id();
    /// assert_eq!(id.spawner_id(), -7);
    /// assert_eq!(id.sequence(), 1);
    /// ```
    pub fn new(spawner_id: i32) -> Self {
        Self::with_time(spawner_id, WallClock)
    }
}

impl<T> BasicMsgIdGenerator<T>
where
    T: TimeSource<i64>,
{
    /// Creates a generator for `spawner_id` using a custom [`TimeSource`].
    pub fn with_time(spawner_id: i32, time: T) -> Self {
        Self::from_components(spawner_id, 0, time)
    }

    /// Creates a generator whose counter resumes after `sequence`, clamped
    /// into `0..=MAX_SEQUENCE`.
    pub fn from_components(spawner_id: i32, sequence: i64, time: T) -> Self {
        Self {
            spawner_id,
            sequence: Cell::new(clamp_sequence(sequence)),
            time,
        }
    }

    pub const fn spawner_id(&self) -> i32 {
        self.spawner_id
    }

    pub fn current_sequence(&self) -> i64 {
        self.sequence.get()
    }

    #[cfg_attr(
        feature = "tracing",
        instrument(level = "trace", skip(self), fields(spawner_id = self.spawner_id))
    )]
    pub fn next_id(&self) -> MsgId {
        let millis = self.time.current_millis();
        let current = self.sequence.get();
        let sequence = next_sequence(current);
        self.sequence.set(sequence);
        if current == MAX_SEQUENCE {
            on_wrap();
        }
        MsgId::from_components(millis, self.spawner_id, sequence as i32)
    }

    pub fn next_token(&self) -> String {
        self.next_id().encode()
    }
}

impl<T> MsgIdGenerator for BasicMsgIdGenerator<T>
where
    T: TimeSource<i64>,
{
    fn spawner_id(&self) -> i32 {
        self.spawner_id()
    }

    fn next_id(&self) -> MsgId {
        self.next_id()
    }

    fn next_token(&self) -> String {
        self.next_token()
    }
}
