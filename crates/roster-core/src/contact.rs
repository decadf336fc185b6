//! The contact entity and its collection wrapper.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Identifier of a stored contact. `0` means "not yet assigned".
pub type ContactId = u64;

/// The id a contact carries before the store assigns one.
pub const UNASSIGNED: ContactId = 0;

// ─── Contact ─────────────────────────────────────────────────────────────────

/// A single address-book entry.
///
/// Once the store has assigned `id` it never changes; updates replace the
/// remaining fields in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Contact {
  pub id:           ContactId,
  /// Short label; the field searched by [`Contact::title_contains`].
  pub title:        String,
  pub name:         String,
  pub email:        String,
  /// Opaque phone or photo reference.
  pub phone_number: String,
}

impl Contact {
  /// A new, unassigned contact.
  pub fn new(
    title: impl Into<String>,
    name: impl Into<String>,
    email: impl Into<String>,
  ) -> Self {
    Self {
      id: UNASSIGNED,
      title: title.into(),
      name: name.into(),
      email: email.into(),
      phone_number: String::new(),
    }
  }

  pub fn with_id(mut self, id: ContactId) -> Self {
    self.id = id;
    self
  }

  pub fn with_phone_number(mut self, phone_number: impl Into<String>) -> Self {
    self.phone_number = phone_number.into();
    self
  }

  pub fn is_assigned(&self) -> bool { self.id != UNASSIGNED }

  /// Replace every mutable field with the one from `update`. `id` is kept.
  pub fn apply_update(&mut self, update: Contact) {
    self.title = update.title;
    self.name = update.name;
    self.email = update.email;
    self.phone_number = update.phone_number;
  }

  /// Case-insensitive, literal substring match against `title`.
  pub fn title_contains(&self, needle: &str) -> bool {
    self.title.to_lowercase().contains(&needle.to_lowercase())
  }
}

/// Parse a path segment into a [`ContactId`].
///
/// Only canonical positive decimals are accepted (`[1-9][0-9]*`), so `0`,
/// `007` and `+5` are all rejected.
pub fn parse_id(s: &str) -> Result<ContactId> {
  let mut chars = s.chars();
  let canonical = matches!(chars.next(), Some('1'..='9'))
    && chars.all(|c| c.is_ascii_digit());
  if !canonical {
    return Err(Error::InvalidId(s.to_owned()));
  }
  s.parse().map_err(|_| Error::InvalidId(s.to_owned()))
}

// ─── ContactList ─────────────────────────────────────────────────────────────

/// An ordered sequence of contacts, rebuilt for every collection response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactList {
  #[serde(default)]
  pub contacts: Vec<Contact>,
}

impl ContactList {
  pub fn len(&self) -> usize { self.contacts.len() }

  pub fn is_empty(&self) -> bool { self.contacts.is_empty() }
}

impl From<Vec<Contact>> for ContactList {
  fn from(contacts: Vec<Contact>) -> Self { Self { contacts } }
}

impl IntoIterator for ContactList {
  type Item = Contact;
  type IntoIter = std::vec::IntoIter<Contact>;

  fn into_iter(self) -> Self::IntoIter { self.contacts.into_iter() }
}
