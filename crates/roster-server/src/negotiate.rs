//! Content negotiation between XML and JSON bodies.
//!
//! Request bodies are read according to `Content-Type` (XML when absent);
//! responses are written according to `Accept` (XML unless JSON is asked
//! for first).

use axum::http::{HeaderMap, header};
use roster_core::{Contact, ContactList};

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
  Xml,
  Json,
}

impl Format {
  pub fn content_type(self) -> &'static str {
    match self {
      Format::Xml => "application/xml; charset=utf-8",
      Format::Json => "application/json",
    }
  }

  /// The format of the request body.
  pub fn of_request(headers: &HeaderMap) -> Result<Self, Error> {
    let Some(value) = headers.get(header::CONTENT_TYPE) else {
      return Ok(Format::Xml);
    };
    let value = value
      .to_str()
      .map_err(|_| Error::UnsupportedMediaType("unreadable Content-Type".into()))?;
    media_type(value)
      .ok_or_else(|| Error::UnsupportedMediaType(value.to_owned()))
  }

  /// The format to answer in. Media ranges are taken in the order listed;
  /// q-values are not weighed.
  pub fn preferred(headers: &HeaderMap) -> Self {
    headers
      .get(header::ACCEPT)
      .and_then(|v| v.to_str().ok())
      .and_then(|accept| accept.split(',').find_map(media_type))
      .unwrap_or(Format::Xml)
  }
}

fn media_type(value: &str) -> Option<Format> {
  let essence = value.split(';').next().unwrap_or_default().trim();
  match essence.to_ascii_lowercase().as_str() {
    "application/xml" | "text/xml" => Some(Format::Xml),
    "application/json" | "text/json" => Some(Format::Json),
    _ => None,
  }
}

// ─── Bodies ──────────────────────────────────────────────────────────────────

/// Decode a single contact from a request body.
pub fn decode_contact(headers: &HeaderMap, body: &[u8]) -> Result<Contact, Error> {
  let format = Format::of_request(headers)?;
  let text = std::str::from_utf8(body)
    .map_err(|_| Error::BadRequest("body is not valid UTF-8".to_string()))?;
  match format {
    Format::Xml => {
      roster_xml::parse_contact(text).map_err(|e| Error::BadRequest(e.to_string()))
    }
    Format::Json => {
      serde_json::from_str(text).map_err(|e| Error::BadRequest(e.to_string()))
    }
  }
}

pub fn encode_contact(format: Format, contact: &Contact) -> Result<String, Error> {
  match format {
    Format::Xml => {
      roster_xml::serialize_contact(contact).map_err(|e| Error::Encode(e.to_string()))
    }
    Format::Json => {
      serde_json::to_string(contact).map_err(|e| Error::Encode(e.to_string()))
    }
  }
}

pub fn encode_list(format: Format, list: &ContactList) -> Result<String, Error> {
  match format {
    Format::Xml => roster_xml::serialize_list(&list.contacts)
      .map_err(|e| Error::Encode(e.to_string())),
    Format::Json => {
      serde_json::to_string(list).map_err(|e| Error::Encode(e.to_string()))
    }
  }
}
