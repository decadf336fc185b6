//! ETag computation for contacts.
//!
//! ETags are SHA-256 hashes over the id and every field of the contact, each
//! field length-prefixed so that moving text between fields changes the hash.
//! They are recomputed on every call and never stored.

use sha2::{Digest, Sha256};

use crate::Contact;

/// Compute the quoted ETag for the current state of `contact`.
pub fn compute(contact: &Contact) -> String {
  let mut hasher = Sha256::new();
  hasher.update(contact.id.to_le_bytes());
  for field in [
    &contact.title,
    &contact.name,
    &contact.email,
    &contact.phone_number,
  ] {
    hasher.update((field.len() as u64).to_le_bytes());
    hasher.update(field.as_bytes());
  }
  format!("\"{}\"", hex::encode(hasher.finalize()))
}

/// Strip surrounding double-quotes from an ETag value.
///
/// Clients send ETags with or without the quotes RFC 7232 requires; compare
/// the bare forms so both are accepted.
pub fn strip_quotes(s: &str) -> &str { s.trim_matches('"') }
