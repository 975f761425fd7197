use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A trait for time sources that return a wall-clock timestamp.
///
/// This abstraction allows you to plug in the real system clock or a mocked
/// time source in tests.
///
/// The unit is expected to be **milliseconds** since the Unix epoch.
///
/// # Example
///
/// ```
/// use msgid::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource<i64> for FixedTime {
///     fn current_millis(&self) -> i64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1234);
/// ```
pub trait TimeSource<T> {
    /// Returns the current time in milliseconds since the Unix epoch.
    fn current_millis(&self) -> T;
}

/// The system wall clock, read through [`SystemTime::now`] on every call.
///
/// No skew correction is applied: if the host clock is stepped backwards the
/// millis reported here go backwards with it. Instants before the epoch are
/// reported as negative millis, and values outside the `i64` range saturate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WallClock;

impl TimeSource<i64> for WallClock {
    fn current_millis(&self) -> i64 {
        system_time_to_millis(SystemTime::now())
    }
}

/// Converts a [`SystemTime`] to signed milliseconds since the Unix epoch,
/// truncating sub-millisecond precision.
pub fn system_time_to_millis(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => i64::try_from(after.as_millis()).unwrap_or(i64::MAX),
        Err(before) => {
            // Round toward negative infinity so that the result never lies
            // after `time`.
            let before = before.duration();
            let mut millis = i64::try_from(before.as_millis()).unwrap_or(i64::MAX);
            if before.subsec_nanos() % 1_000_000 != 0 {
                millis = millis.saturating_add(1);
            }
            -millis
        }
    }
}

/// Converts signed milliseconds since the Unix epoch into a [`SystemTime`].
///
/// # Panics
///
/// Panics if the instant cannot be represented by [`SystemTime`] on this
/// platform. Unix targets cover the whole `i64` millisecond range.
pub fn millis_to_system_time(millis: i64) -> SystemTime {
    let offset = Duration::from_millis(millis.unsigned_abs());
    if millis >= 0 {
        UNIX_EPOCH + offset
    } else {
        UNIX_EPOCH - offset
    }
}
