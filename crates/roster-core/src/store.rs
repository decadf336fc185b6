//! The `ContactStore` trait and the outcome type of its conditional writes.
//!
//! The trait is implemented by storage backends (e.g. `roster-store-memory`).
//! The HTTP layer depends on this abstraction, not on any concrete backend.
//!
//! Reads hand out owned snapshots. All mutation goes through the store, and
//! every write that depends on the current state (existence, id collision,
//! precondition) is decided inside the same critical section as the write.

use std::future::Future;

use crate::{Contact, ContactId, Precondition};

// ─── Write outcome ───────────────────────────────────────────────────────────

/// The result of a write that the store may decline for a domain reason.
///
/// Backend failures are reported through the store's `Error` type instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome<T> {
  /// The write happened. Carries the entity as stored (or as removed).
  Applied(T),
  /// No contact exists under the requested id.
  Missing,
  /// A contact already exists under the requested id. Only `create`
  /// reports this.
  Taken,
  /// The request's precondition did not admit the current state.
  Refused,
}

impl<T> WriteOutcome<T> {
  pub fn is_applied(&self) -> bool { matches!(self, Self::Applied(_)) }

  pub fn applied(self) -> Option<T> {
    match self {
      Self::Applied(value) => Some(value),
      _ => None,
    }
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Roster contact store backend.
///
/// All methods return `Send` futures so the trait can be used from a
/// multi-threaded runtime (e.g. tokio with `axum`).
pub trait ContactStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Snapshot of the contact with `id`, if any.
  fn find(
    &self,
    id: ContactId,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + '_;

  /// Snapshot of every contact, in insertion order.
  fn find_all(
    &self,
  ) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + '_;

  /// Contacts whose title contains `needle`, compared literally and
  /// case-insensitively. Insertion order is kept.
  fn find_by_title<'a>(
    &'a self,
    needle: &'a str,
  ) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + 'a;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Insert or replace.
  ///
  /// An unassigned contact (`id == 0`) gets a freshly allocated id. A contact
  /// whose id is already stored replaces that entry in place; any other id is
  /// inserted as given. Returns the contact as stored.
  fn save(
    &self,
    contact: Contact,
  ) -> impl Future<Output = Result<Contact, Self::Error>> + Send + '_;

  /// Like [`save`](Self::save), but reports [`WriteOutcome::Taken`] instead
  /// of replacing when the contact names an id that is already stored.
  fn create(
    &self,
    contact: Contact,
  ) -> impl Future<Output = Result<WriteOutcome<Contact>, Self::Error>> + Send + '_;

  /// Apply the fields of `contact` onto the stored contact with the same id,
  /// provided `precondition` admits the stored contact's current state.
  ///
  /// Yields `Applied`, `Missing` or `Refused`; never `Taken`.
  fn update_if<'a>(
    &'a self,
    contact: Contact,
    precondition: &'a Precondition,
  ) -> impl Future<Output = Result<WriteOutcome<Contact>, Self::Error>> + Send + 'a;

  /// Remove the contact with `id`, provided `precondition` admits its
  /// current state. The removed contact is returned.
  ///
  /// Yields `Applied`, `Missing` or `Refused`; never `Taken`.
  fn delete_if<'a>(
    &'a self,
    id: ContactId,
    precondition: &'a Precondition,
  ) -> impl Future<Output = Result<WriteOutcome<Contact>, Self::Error>> + Send + 'a;

  // ── Unconditional forms ───────────────────────────────────────────────

  /// Apply `contact` onto the stored contact with the same id. `false` if no
  /// such contact exists, in which case nothing changes.
  fn update(
    &self,
    contact: Contact,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_ {
    async move {
      let precondition = Precondition::none();
      Ok(self.update_if(contact, &precondition).await?.is_applied())
    }
  }

  /// Remove the contact with `id`. `false` if it was not stored.
  fn delete(
    &self,
    id: ContactId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_ {
    async move {
      let precondition = Precondition::none();
      Ok(self.delete_if(id, &precondition).await?.is_applied())
    }
  }
}
