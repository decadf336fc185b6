//! Unique contact id allocation.

use std::sync::atomic::{AtomicU64, Ordering};

use roster_core::ContactId;

/// Ids at or below this value are left to clients by convention.
pub const DEFAULT_ID_FLOOR: ContactId = 1000;

/// Monotonic id counter shared by all writers of one store.
///
/// Each call to [`next`](Self::next) hands out a value no other caller
/// receives, until the counter saturates at `ContactId::MAX`; from then on
/// every call returns `ContactId::MAX`.
#[derive(Debug)]
pub struct IdAllocator {
  next: AtomicU64,
}

impl IdAllocator {
  /// An allocator whose first id is `floor + 1`.
  pub fn above(floor: ContactId) -> Self {
    Self { next: AtomicU64::new(floor.saturating_add(1)) }
  }

  /// Take the next raw counter value.
  pub fn next(&self) -> ContactId {
    match self.next.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
      Some(n.saturating_add(1))
    }) {
      Ok(id) | Err(id) => id,
    }
  }

  /// Move the counter past `id`, so it is never generated later.
  ///
  /// Ids below the counter are left alone; the counter never moves back.
  pub fn observe(&self, id: ContactId) {
    self.next.fetch_max(id.saturating_add(1), Ordering::SeqCst);
  }

  /// Take the next counter value for which `in_use` is false.
  ///
  /// Returns `ContactId::MAX` once the counter is exhausted, whether or not
  /// that id is in use; the caller decides what to do with it.
  pub fn allocate(&self, in_use: impl Fn(ContactId) -> bool) -> ContactId {
    let mut id = self.next();
    while id < ContactId::MAX {
      if !in_use(id) {
        return id;
      }
      id = self.next();
    }
    id
  }
}

impl Default for IdAllocator {
  fn default() -> Self { Self::above(DEFAULT_ID_FLOOR) }
}
