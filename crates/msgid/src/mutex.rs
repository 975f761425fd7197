#[cfg(feature = "parking-lot")]
pub use parking_lot::{Mutex, MutexGuard};
#[cfg(not(feature = "parking-lot"))]
pub use std::sync::{Mutex, MutexGuard};

/// Acquires `mutex`, recovering the guard if a previous holder panicked.
///
/// Every critical section in this crate leaves the guarded value consistent
/// before it can unwind, so poisoning carries no information worth surfacing.
#[cfg(not(feature = "parking-lot"))]
#[inline]
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

#[cfg(feature = "parking-lot")]
#[inline]
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock()
}
