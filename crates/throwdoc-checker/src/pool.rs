//! Fixed-size free lists of reusable scratch values.
//!
//! Slots are claimed with `try_lock` only: a contended or empty pool never
//! blocks, the caller just gets a fresh value. Values are reset before they
//! go back, so a pooled value behaves exactly like a new one.

use std::ops::{Deref, DerefMut};
use std::sync::Mutex;

/// A value that can be recycled through a [`BuilderPool`].
pub trait Poolable: Default {
    /// Clear all state.
    fn reset(&mut self);

    /// Values that grew too large are dropped instead of pooled.
    fn is_reusable(&self) -> bool {
        true
    }
}

pub struct BuilderPool<T: Poolable> {
    slots: Box<[Mutex<Option<T>>]>,
}

impl<T: Poolable> BuilderPool<T> {
    pub fn new(size: usize) -> Self {
        Self {
            slots: (0..size).map(|_| Mutex::new(None)).collect(),
        }
    }

    /// Take a cleared value, allocating when no pooled value is free.
    pub fn take(&self) -> Pooled<'_, T> {
        let value = self.claim().unwrap_or_default();
        Pooled {
            value: Some(value),
            pool: self,
        }
    }

    fn claim(&self) -> Option<T> {
        self.slots
            .iter()
            .find_map(|slot| slot.try_lock().ok().and_then(|mut guard| guard.take()))
    }

    fn give_back(&self, mut value: T) {
        value.reset();
        if !value.is_reusable() {
            return;
        }
        for slot in self.slots.iter() {
            if let Ok(mut guard) = slot.try_lock()
                && guard.is_none()
            {
                *guard = Some(value);
                return;
            }
        }
    }

    /// Number of values currently parked in the pool.
    pub fn available(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.try_lock().is_ok_and(|guard| guard.is_some()))
            .count()
    }
}

impl<T: Poolable> Default for BuilderPool<T> {
    fn default() -> Self {
        Self::new(throwdoc_common::limits::BUILDER_POOL_SIZE)
    }
}

/// A value on loan from a pool; returned when dropped.
pub struct Pooled<'a, T: Poolable> {
    value: Option<T>,
    pool: &'a BuilderPool<T>,
}

impl<T: Poolable> Pooled<'_, T> {
    /// Keep the value instead of returning it.
    pub fn into_inner(mut self) -> T {
        self.value.take().unwrap_or_default()
    }
}

impl<T: Poolable> Deref for Pooled<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        match &self.value {
            Some(value) => value,
            None => unreachable!("pooled value accessed after release"),
        }
    }
}

impl<T: Poolable> DerefMut for Pooled<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        match &mut self.value {
            Some(value) => value,
            None => unreachable!("pooled value accessed after release"),
        }
    }
}

impl<T: Poolable> Drop for Pooled<'_, T> {
    fn drop(&mut self) {
        if let Some(value) = self.value.take() {
            self.pool.give_back(value);
        }
    }
}

#[cfg(test)]
#[path = "tests/pool_tests.rs"]
mod tests;
