//! Evaluation of `If-Match` / `If-None-Match` request preconditions.
//!
//! The check is the same for every verb; only the status reported on failure
//! differs. A conditional GET that fails is "not modified", a PUT or DELETE
//! that fails is "precondition failed".

use crate::{
  Contact,
  etag::{self, strip_quotes},
};

/// The precondition headers carried by one request.
///
/// `if_match` and `if_none_match` are mutually exclusive in effect: when
/// `if_match` is present, `if_none_match` is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Precondition {
  pub if_match:      Option<String>,
  pub if_none_match: Option<String>,
}

impl Precondition {
  /// No precondition at all; admits every state.
  pub fn none() -> Self { Self::default() }

  pub fn if_match(etag: impl Into<String>) -> Self {
    Self { if_match: Some(etag.into()), if_none_match: None }
  }

  pub fn if_none_match(etag: impl Into<String>) -> Self {
    Self { if_match: None, if_none_match: Some(etag.into()) }
  }

  pub fn is_empty(&self) -> bool {
    self.if_match.is_none() && self.if_none_match.is_none()
  }

  /// Whether a request carrying this precondition may proceed against a
  /// resource whose current ETag is `current`.
  pub fn admits(&self, current: &str) -> bool {
    let current = strip_quotes(current);
    if let Some(expected) = &self.if_match {
      strip_quotes(expected) == current
    } else if let Some(unwanted) = &self.if_none_match {
      strip_quotes(unwanted) != current
    } else {
      true
    }
  }

  /// [`admits`](Self::admits) against the live state of `contact`.
  pub fn admits_contact(&self, contact: &Contact) -> bool {
    self.is_empty() || self.admits(&etag::compute(contact))
  }
}
