use crate::mutex::{Mutex, lock};

/// Largest sequence value a generator hands out: `2^23 - 1`.
///
/// The low half of [`MsgId::packed`] is 32 bits wide, but the top byte is
/// reserved and always zero, and one more bit is left unused. Counters cycle
/// through `1..=MAX_SEQUENCE`.
///
/// [`MsgId::packed`]: crate::MsgId::packed
pub const MAX_SEQUENCE: i64 = (1 << 23) - 1;

/// Returns the value following `current`, wrapping from [`MAX_SEQUENCE`] to
/// `1`. Never returns `0`.
#[inline]
pub(crate) const fn next_sequence(current: i64) -> i64 {
    if current == MAX_SEQUENCE { 1 } else { current + 1 }
}

#[inline]
pub(crate) const fn clamp_sequence(value: i64) -> i64 {
    if value < 0 {
        0
    } else if value > MAX_SEQUENCE {
        MAX_SEQUENCE
    } else {
        value
    }
}

/// A mutex-guarded sequence counter.
///
/// Each call to [`Counter::next`] returns a value no concurrent caller
/// observes, cycling through `1..=MAX_SEQUENCE`. The lock covers only the
/// compare, reset and increment of the stored value.
#[derive(Debug)]
pub struct Counter {
    #[cfg(feature = "cache-padded")]
    value: crossbeam_utils::CachePadded<Mutex<i64>>,
    #[cfg(not(feature = "cache-padded"))]
    value: Mutex<i64>,
}

impl Default for Counter {
    fn default() -> Self {
        Self::new()
    }
}

impl Counter {
    /// Creates a counter whose first [`Counter::next`] returns `1`.
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// Creates a counter as if `value` was the last sequence handed out.
    ///
    /// `value` is clamped into `0..=MAX_SEQUENCE`. Starting at
    /// [`MAX_SEQUENCE`] makes the next call wrap to `1`.
    pub fn starting_at(value: i64) -> Self {
        let value = Mutex::new(clamp_sequence(value));
        Self {
            #[cfg(feature = "cache-padded")]
            value: crossbeam_utils::CachePadded::new(value),
            #[cfg(not(feature = "cache-padded"))]
            value,
        }
    }

    /// Advances the counter and returns the new value.
    pub fn next(&self) -> i64 {
        let (next, wrapped) = {
            let mut current = lock(self.cell());
            let wrapped = *current == MAX_SEQUENCE;
            *current = next_sequence(*current);
            (*current, wrapped)
        };

        if wrapped {
            on_wrap();
        }
        next
    }

    /// The last value handed out, or the starting value if none was.
    pub fn current(&self) -> i64 {
        *lock(self.cell())
    }

    fn cell(&self) -> &Mutex<i64> {
        &self.value
    }
}

/// Called outside the critical section whenever a counter wraps.
#[cold]
#[inline(never)]
pub(crate) fn on_wrap() {
    #[cfg(feature = "tracing")]
    tracing::debug!(
        max_sequence = MAX_SEQUENCE,
        "sequence counter wrapped; values below the maximum will be reused"
    );
}
