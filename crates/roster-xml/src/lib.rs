//! XML codec for Roster contacts.
//!
//! Converts between [`roster_core`] domain types and the XML shape used both
//! on the wire and in the contact file:
//!
//! ```xml
//! <contacts>
//!   <contact id="1001">
//!     <title>Work</title>
//!     <name>Ada Lovelace</name>
//!     <email>ada@example.com</email>
//!     <phoneNumber>555-0100</phoneNumber>
//!   </contact>
//! </contacts>
//! ```
//!
//! Every element is optional on input; a missing `id` attribute means the
//! contact is unassigned.

pub mod error;

pub use error::{Error, Result};
use roster_core::{Contact, ContactId, ContactList};
use serde::{Deserialize, Serialize};

/// Prolog written at the top of a standalone document.
pub const XML_DECLARATION: &str =
  r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename = "contact", default)]
struct XmlContact {
  #[serde(rename = "@id")]
  id:           ContactId,
  title:        String,
  name:         String,
  email:        String,
  #[serde(rename = "phoneNumber")]
  phone_number: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename = "contacts", default)]
struct XmlContactList {
  #[serde(rename = "contact")]
  contacts: Vec<XmlContact>,
}

impl From<XmlContact> for Contact {
  fn from(x: XmlContact) -> Self {
    Contact {
      id:           x.id,
      title:        x.title,
      name:         x.name,
      email:        x.email,
      phone_number: x.phone_number,
    }
  }
}

impl From<&Contact> for XmlContact {
  fn from(c: &Contact) -> Self {
    XmlContact {
      id:           c.id,
      title:        c.title.clone(),
      name:         c.name.clone(),
      email:        c.email.clone(),
      phone_number: c.phone_number.clone(),
    }
  }
}

// ─── Public API ──────────────────────────────────────────────────────────────

/// Parse a single `<contact>` element.
pub fn parse_contact(xml: &str) -> Result<Contact> {
  quick_xml::de::from_str::<XmlContact>(xml)
    .map(Contact::from)
    .map_err(|e| Error::Parse(e.to_string()))
}

/// Parse a `<contacts>` document.
pub fn parse_list(xml: &str) -> Result<ContactList> {
  let list: XmlContactList =
    quick_xml::de::from_str(xml).map_err(|e| Error::Parse(e.to_string()))?;
  Ok(ContactList::from(
    list.contacts.into_iter().map(Contact::from).collect::<Vec<_>>(),
  ))
}

/// Serialise a single contact as a `<contact>` element.
pub fn serialize_contact(contact: &Contact) -> Result<String> {
  quick_xml::se::to_string(&XmlContact::from(contact))
    .map_err(|e| Error::Serialize(e.to_string()))
}

/// Serialise contacts as a compact `<contacts>` element.
pub fn serialize_list(contacts: &[Contact]) -> Result<String> {
  quick_xml::se::to_string(&wire_list(contacts))
    .map_err(|e| Error::Serialize(e.to_string()))
}

/// Serialise contacts as an indented, standalone `<contacts>` document,
/// including the XML declaration. Used for the contact file.
pub fn serialize_document(contacts: &[Contact]) -> Result<String> {
  let mut body = String::new();
  let mut ser = quick_xml::se::Serializer::new(&mut body);
  ser.indent(' ', 2);
  wire_list(contacts)
    .serialize(ser)
    .map_err(|e| Error::Serialize(e.to_string()))?;
  Ok(format!("{XML_DECLARATION}\n{body}\n"))
}

fn wire_list(contacts: &[Contact]) -> XmlContactList {
  XmlContactList { contacts: contacts.iter().map(XmlContact::from).collect() }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
