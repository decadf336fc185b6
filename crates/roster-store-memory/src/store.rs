//! [`MemoryStore`] — the in-memory implementation of [`ContactStore`].

use std::{future::Future, sync::Arc};

use parking_lot::RwLock;
use roster_core::{
  Contact, ContactId, ContactStore, Precondition, WriteOutcome,
};

use crate::{Error, Result, ids::IdAllocator};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A contact store held entirely in process memory.
///
/// Cloning is cheap — clones share the same contacts and id counter. Every
/// write takes the collection lock exclusively for the whole
/// find-check-mutate sequence, so concurrent writers to the same id are
/// serialised.
#[derive(Clone, Default)]
pub struct MemoryStore {
  inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
  contacts: RwLock<Vec<Contact>>,
  ids:      IdAllocator,
}

impl MemoryStore {
  /// An empty store allocating ids above [`DEFAULT_ID_FLOOR`](crate::DEFAULT_ID_FLOOR).
  pub fn new() -> Self { Self::default() }

  /// An empty store whose first generated id is `floor + 1`.
  pub fn with_id_floor(floor: ContactId) -> Self {
    Self {
      inner: Arc::new(Inner {
        contacts: RwLock::default(),
        ids:      IdAllocator::above(floor),
      }),
    }
  }

  pub fn len(&self) -> usize { self.inner.contacts.read().len() }

  pub fn is_empty(&self) -> bool { self.inner.contacts.read().is_empty() }

  /// Save every contact in order, as if by [`ContactStore::save`].
  pub fn import(&self, contacts: impl IntoIterator<Item = Contact>) -> Result<usize> {
    let mut stored = self.inner.contacts.write();
    let mut count = 0;
    for contact in contacts {
      self.save_locked(&mut stored, contact)?;
      count += 1;
    }
    tracing::debug!(count, "imported contacts");
    Ok(count)
  }

  /// Snapshot of every contact, in insertion order.
  pub fn export(&self) -> Vec<Contact> { self.inner.contacts.read().clone() }

  // ── Locked helpers ────────────────────────────────────────────────────

  fn find_sync(&self, id: ContactId) -> Option<Contact> {
    self.inner.contacts.read().iter().find(|c| c.id == id).cloned()
  }

  fn find_by_title_sync(&self, needle: &str) -> Vec<Contact> {
    self
      .inner
      .contacts
      .read()
      .iter()
      .filter(|c| c.title_contains(needle))
      .cloned()
      .collect()
  }

  fn save_locked(&self, contacts: &mut Vec<Contact>, mut contact: Contact) -> Result<Contact> {
    if !contact.is_assigned() {
      let id = self.inner.ids.allocate(|id| contacts.iter().any(|c| c.id == id));
      if contacts.iter().any(|c| c.id == id) {
        tracing::warn!(id, "id allocator exhausted");
        return Err(Error::IdsExhausted);
      }
      contact.id = id;
      contacts.push(contact.clone());
      return Ok(contact);
    }

    self.inner.ids.observe(contact.id);
    match contacts.iter_mut().find(|c| c.id == contact.id) {
      Some(slot) => *slot = contact.clone(),
      None => contacts.push(contact.clone()),
    }
    Ok(contact)
  }

  fn save_sync(&self, contact: Contact) -> Result<Contact> {
    let mut contacts = self.inner.contacts.write();
    self.save_locked(&mut contacts, contact)
  }

  fn create_sync(&self, contact: Contact) -> Result<WriteOutcome<Contact>> {
    let mut contacts = self.inner.contacts.write();
    if contact.is_assigned() && contacts.iter().any(|c| c.id == contact.id) {
      return Ok(WriteOutcome::Taken);
    }
    self.save_locked(&mut contacts, contact).map(WriteOutcome::Applied)
  }

  fn update_sync(&self, update: Contact, precondition: &Precondition) -> WriteOutcome<Contact> {
    let mut contacts = self.inner.contacts.write();
    let Some(stored) = contacts.iter_mut().find(|c| c.id == update.id) else {
      return WriteOutcome::Missing;
    };
    if !precondition.admits_contact(stored) {
      return WriteOutcome::Refused;
    }
    stored.apply_update(update);
    WriteOutcome::Applied(stored.clone())
  }

  fn delete_sync(&self, id: ContactId, precondition: &Precondition) -> WriteOutcome<Contact> {
    let mut contacts = self.inner.contacts.write();
    let Some(index) = contacts.iter().position(|c| c.id == id) else {
      return WriteOutcome::Missing;
    };
    if !precondition.admits_contact(&contacts[index]) {
      return WriteOutcome::Refused;
    }
    WriteOutcome::Applied(contacts.remove(index))
  }
}

// ─── ContactStore ────────────────────────────────────────────────────────────

impl ContactStore for MemoryStore {
  type Error = Error;

  fn find(
    &self,
    id: ContactId,
  ) -> impl Future<Output = Result<Option<Contact>>> + Send + '_ {
    async move { Ok(self.find_sync(id)) }
  }

  fn find_all(&self) -> impl Future<Output = Result<Vec<Contact>>> + Send + '_ {
    async move { Ok(self.export()) }
  }

  fn find_by_title<'a>(
    &'a self,
    needle: &'a str,
  ) -> impl Future<Output = Result<Vec<Contact>>> + Send + 'a {
    async move { Ok(self.find_by_title_sync(needle)) }
  }

  fn save(
    &self,
    contact: Contact,
  ) -> impl Future<Output = Result<Contact>> + Send + '_ {
    async move { self.save_sync(contact) }
  }

  fn create(
    &self,
    contact: Contact,
  ) -> impl Future<Output = Result<WriteOutcome<Contact>>> + Send + '_ {
    async move { self.create_sync(contact) }
  }

  fn update_if<'a>(
    &'a self,
    contact: Contact,
    precondition: &'a Precondition,
  ) -> impl Future<Output = Result<WriteOutcome<Contact>>> + Send + 'a {
    async move { Ok(self.update_sync(contact, precondition)) }
  }

  fn delete_if<'a>(
    &'a self,
    id: ContactId,
    precondition: &'a Precondition,
  ) -> impl Future<Output = Result<WriteOutcome<Contact>>> + Send + 'a {
    async move { Ok(self.delete_sync(id, precondition)) }
  }
}
