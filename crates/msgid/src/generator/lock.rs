use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    generator::{Counter, MsgIdGenerator},
    id::MsgId,
    time::{TimeSource, WallClock},
};

/// A lock-based [`MsgId`] generator suitable for multi-threaded
/// environments.
///
/// The sequence counter lives behind an [`Arc`] and a mutex, so one
/// generator can be shared across threads. Cloning the generator yields a
/// second handle onto the *same* counter; it does not start a new sequence.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Never blocks beyond the counter's critical section
///
/// ## Limitations
/// - The counter resets on restart and wraps after [`MAX_SEQUENCE`] ids. An
///   id can repeat if the counter wraps within a single millisecond, or if
///   the process restarts and reissues a sequence within the same
///   millisecond as before.
/// - Two generators with the same spawner id share a namespace and can
///   collide. Spawner ids must be assigned externally.
///
/// ## See Also
/// - [`BasicMsgIdGenerator`]
///
/// [`MAX_SEQUENCE`]: crate::MAX_SEQUENCE
/// [`BasicMsgIdGenerator`]: crate::BasicMsgIdGenerator
#[derive(Clone, Debug)]
pub struct LockMsgIdGenerator<T = WallClock>
where
    T: TimeSource<i64>,
{
    spawner_id: i32,
    counter: Arc<Counter>,
    time: T,
}

impl LockMsgIdGenerator<WallClock> {
    /// Creates a generator for `spawner_id` reading the system wall clock.
    ///
    /// Any `i32` is accepted, negative values included; it is stored as-is
    /// in the high half of every id's packed field.
    ///
    /// # Example
    ///
    /// ```
    /// use msgid::LockMsgIdGenerator;
    ///
    /// let generator = LockMsgIdGenerator::new(3);
    /// let id = generator.next_id();
    /// assert_eq!(id.packed(), (3 << 32) | 1);
    /// ```
    pub fn new(spawner_id: i32) -> Self {
        Self::with_time(spawner_id, WallClock)
    }
}

impl<T> LockMsgIdGenerator<T>
where
    T: TimeSource<i64>,
{
    /// Creates a generator for `spawner_id` using a custom [`TimeSource`].
    pub fn with_time(spawner_id: i32, time: T) -> Self {
        Self::from_components(spawner_id, 0, time)
    }

    /// Creates a generator whose counter resumes after `sequence`.
    ///
    /// This is mostly useful for restoring a counter or for exercising
    /// wraparound. `sequence` is clamped into `0..=MAX_SEQUENCE`.
    ///
    /// # Example
    ///
    /// ```
    /// use msgid::{LockMsgIdGenerator, WallClock, MAX_SEQUENCE};
    ///
    /// let generator = LockMsgIdGenerator::from_components(1, MAX_SEQUENCE, WallClock);
    /// assert_eq!(generator.next_id().sequence(), 1);
    /// ```
    ///
    /// [`MAX_SEQUENCE`]: crate::MAX_SEQUENCE
    pub fn from_components(spawner_id: i32, sequence: i64, time: T) -> Self {
        Self {
            spawner_id,
            counter: Arc::new(Counter::starting_at(sequence)),
            time,
        }
    }

    /// Returns the configured spawner id.
    pub const fn spawner_id(&self) -> i32 {
        self.spawner_id
    }

    /// The sequence value of the most recently generated id.
    pub fn current_sequence(&self) -> i64 {
        self.counter.current()
    }

    /// Generates the next id.
    ///
    /// The clock is read outside the lock; only the counter advance is
    /// serialized.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "trace", skip(self), fields(spawner_id = self.spawner_id))
    )]
    pub fn next_id(&self) -> MsgId {
        let millis = self.time.current_millis();
        let sequence = self.counter.next();
        // `Counter` never exceeds 23 bits, so the narrowing is lossless.
        MsgId::from_components(millis, self.spawner_id, sequence as i32)
    }

    /// Generates the next id and encodes it as a base64 token.
    pub fn next_token(&self) -> String {
        self.next_id().encode()
    }
}

impl<T> MsgIdGenerator for LockMsgIdGenerator<T>
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
