//! Non-reentrant lock for a pair's reserve-mutating entry points.

use core::cell::Cell;

use crate::error::AmmError;

/// Single-owner lock held for the duration of one entry-point call.
///
/// Acquiring returns an RAII [`LockGuard`]; the lock is released when the
/// guard drops, including on every early `?` return.
#[derive(Debug, Default)]
pub(crate) struct ReentrancyLock {
    locked: Cell<bool>,
}

impl ReentrancyLock {
    /// Takes the lock or fails with [`AmmError::Locked`] if it is held.
    pub(crate) fn acquire(&self) -> Result<LockGuard<'_>, AmmError> {
        if self.locked.replace(true) {
            return Err(AmmError::Locked);
        }
        Ok(LockGuard { lock: self })
    }

    #[must_use]
    pub(crate) fn is_locked(&self) -> bool {
        self.locked.get()
    }
}

/// Releases its [`ReentrancyLock`] on drop.
#[derive(Debug)]
pub(crate) struct LockGuard<'a> {
    lock: &'a ReentrancyLock,
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        self.lock.locked.set(false);
    }
}
